//! Coastal reference locations for demo uploads and tests.

use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::synthetic::normal;

/// Well-known coastal sampling sites as `(latitude, longitude)`.
pub const COASTAL_SITES: &[(&str, f64, f64)] = &[
    ("New York", 40.7, -74.0),
    ("United Kingdom", 52.5, -2.0),
    ("Brittany", 48.8, -4.3),
    ("Buenos Aires", -34.6, -58.4),
    ("Sao Paulo", -23.5, -46.6),
    ("Rome", 41.9, 12.5),
    ("Gibraltar", 36.1, -5.4),
    ("Cape Town", -33.9, 18.4),
    ("Chennai", 13.0, 80.2),
    ("Tokyo", 35.7, 139.7),
    ("San Francisco", 37.8, -122.4),
    ("Los Angeles", 33.7, -118.2),
    ("Sydney", -33.8, 151.2),
];

/// Returns `n` points cycling through [`COASTAL_SITES`], each jittered by
/// N(0, 0.5) degrees.
#[must_use]
pub fn sample_locations(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    COASTAL_SITES
        .iter()
        .cycle()
        .take(n)
        .map(|(_, lat, lon)| {
            let lat = lat + normal(&mut rng, 0.0, 0.5);
            let lon = lon + normal(&mut rng, 0.0, 0.5);
            (lat, lon)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_requested_count() {
        assert_eq!(sample_locations(50, 1).len(), 50);
        assert!(sample_locations(0, 1).is_empty());
    }

    #[test]
    fn points_stay_near_their_site() {
        for ((_, lat, lon), (jlat, jlon)) in COASTAL_SITES.iter().zip(sample_locations(13, 3)) {
            assert!((lat - jlat).abs() < 5.0);
            assert!((lon - jlon).abs() < 5.0);
        }
    }

    #[test]
    fn seeded() {
        assert_eq!(sample_locations(20, 9), sample_locations(20, 9));
    }
}
