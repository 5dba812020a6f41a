//! Great-circle distance between report locations.

use civic_core::GeoPoint;

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters.
///
/// Accurate to well under a meter at the scales the duplicate index
/// cares about (tens of meters).
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint {
            lat: 12.9716,
            lon: 77.5946,
        };
        assert!(haversine_distance(&p, &p) < 1e-9);
    }

    #[test]
    fn test_small_offset_is_about_eleven_meters() {
        // 0.0001 degrees of latitude is ~11.1 m anywhere on earth
        let a = GeoPoint {
            lat: 12.9716,
            lon: 77.5946,
        };
        let b = GeoPoint {
            lat: 12.9717,
            lon: 77.5946,
        };
        let d = haversine_distance(&a, &b);
        assert!(d > 10.5 && d < 11.8, "got {d}");
    }

    #[test]
    fn test_symmetry() {
        let a = GeoPoint {
            lat: 40.7128,
            lon: -74.0060,
        };
        let b = GeoPoint {
            lat: 40.7130,
            lon: -74.0058,
        };
        let ab = haversine_distance(&a, &b);
        let ba = haversine_distance(&b, &a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_city_block_scale() {
        // Roughly one degree of longitude at the equator: ~111 km
        let a = GeoPoint { lat: 0.0, lon: 0.0 };
        let b = GeoPoint { lat: 0.0, lon: 1.0 };
        let d = haversine_distance(&a, &b);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }
}
