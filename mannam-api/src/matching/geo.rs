/// Haversine distance in km between two lat/lng points.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const R: f64 = 6371.0; // Earth radius in km
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    R * c
}

/// The cutoff is inclusive: a candidate sitting exactly at the preferred
/// distance is still eligible.
pub fn within_preferred_distance(distance_km: f64, preferred_distance_km: i32) -> bool {
    distance_km <= preferred_distance_km as f64
}

/// Distances are persisted at one-decimal precision.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEOUL: (f64, f64) = (37.5665, 126.978);
    const BUSAN: (f64, f64) = (35.1796, 129.0756);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(SEOUL.0, SEOUL.1, SEOUL.0, SEOUL.1), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(SEOUL.0, SEOUL.1, BUSAN.0, BUSAN.1);
        let ba = haversine_km(BUSAN.0, BUSAN.1, SEOUL.0, SEOUL.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn seoul_to_busan_is_about_325_km() {
        let km = haversine_km(SEOUL.0, SEOUL.1, BUSAN.0, BUSAN.1);
        assert!((km - 325.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn cutoff_is_inclusive() {
        assert!(within_preferred_distance(30.0, 30));
        assert!(within_preferred_distance(29.9, 30));
        assert!(!within_preferred_distance(30.01, 30));
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round1(12.35), 12.4);
    }
}
