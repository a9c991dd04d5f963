//! Coordinate to region assignment.
//!
//! Regions are nested bounding boxes: a tropical band (|lat| <= 10), a
//! northern temperate band (10 < lat <= 60), a southern temperate band
//! (-60 <= lat < -10), each split by longitude, and everything poleward
//! collapsed into one polar bucket. Boundaries are inclusive on the first
//! matching box.

use microplastics_sample_models::Region;

/// Maps a coordinate pair to its [`Region`].
///
/// Pure and deterministic. `NaN` in either coordinate yields
/// [`Region::Unknown`].
#[must_use]
pub fn assign_region(latitude: f64, longitude: f64) -> Region {
    if latitude.is_nan() || longitude.is_nan() {
        return Region::Unknown;
    }

    if (-10.0..=10.0).contains(&latitude) {
        if (-180.0..=-30.0).contains(&longitude) {
            Region::SouthAmericaPacific
        } else if (-30.0..=60.0).contains(&longitude) {
            Region::Atlantic
        } else {
            Region::IndianOcean
        }
    } else if (10.0..=60.0).contains(&latitude) {
        if (-180.0..=0.0).contains(&longitude) {
            Region::NorthAmericaPacific
        } else if (0.0..=60.0).contains(&longitude) {
            Region::Europe
        } else {
            Region::AsiaPacific
        }
    } else if (-60.0..-10.0).contains(&latitude) {
        if (-180.0..=-110.0).contains(&longitude) {
            Region::SouthPacific
        } else if (-110.0..=20.0).contains(&longitude) {
            Region::SouthAtlantic
        } else {
            Region::IndianOcean
        }
    } else {
        Region::PolarRegions
    }
}

/// Whether a coordinate pair lies inside valid WGS84 ranges.
#[must_use]
pub fn in_range(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}
