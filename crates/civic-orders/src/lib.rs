//! civic-orders: draft work orders for urgent repairs
//!
//! Turns a High or Critical priority decision into a structured
//! work-order draft: department routing, a budget line with
//! contingency, and a rendered plain-text directive with a content
//! hash for audit. Routine issues never generate drafts.

pub mod drafter;

pub use drafter::{Budget, Department, SiteLocation, WorkOrderDraft, WorkOrderDrafter};
