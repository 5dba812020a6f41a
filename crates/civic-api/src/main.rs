use civic_api::{run, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let addr = std::env::var("CIVIC_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());
    let state = AppState::from_env().expect("Failed to assemble pipeline");

    run(&addr, state).await;
}
