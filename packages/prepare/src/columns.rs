//! Column naming for raw sample tables.
//!
//! Survey exports use a handful of abbreviated column names. They are
//! renamed to the canonical names before any other processing.

/// Canonical latitude column.
pub const LATITUDE: &str = "latitude";
/// Canonical longitude column.
pub const LONGITUDE: &str = "longitude";
/// Canonical concentration column.
pub const CONCENTRATION: &str = "concentration";
/// Canonical year column.
pub const YEAR: &str = "year";
/// Canonical polymer type column.
pub const POLYMER_TYPE: &str = "polymer_type";
/// Canonical source column.
pub const SOURCE: &str = "source";
/// Optional sample date column.
pub const SAMPLE_DATE: &str = "sample_date";
/// Optional sample identifier column.
pub const SAMPLE_ID: &str = "sample_id";

/// Columns every prepared table must have after backfilling.
pub const REQUIRED: &[&str] = &[LATITUDE, LONGITUDE, CONCENTRATION, YEAR, POLYMER_TYPE, SOURCE];

/// Alias -> canonical column name.
const ALIASES: &[(&str, &str)] = &[
    ("lat", LATITUDE),
    ("lon", LONGITUDE),
    ("conc", CONCENTRATION),
    ("sample_year", YEAR),
    ("poly_type", POLYMER_TYPE),
    ("source_type", SOURCE),
];

/// Maps a raw column name to its canonical name. Unknown names pass through
/// unchanged.
#[must_use]
pub fn canonical_name(raw: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map_or(raw, |(_, canonical)| canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_aliases() {
        assert_eq!(canonical_name("lat"), "latitude");
        assert_eq!(canonical_name("lon"), "longitude");
        assert_eq!(canonical_name("conc"), "concentration");
        assert_eq!(canonical_name("sample_year"), "year");
        assert_eq!(canonical_name("poly_type"), "polymer_type");
        assert_eq!(canonical_name("source_type"), "source");
    }

    #[test]
    fn passes_through_other_names() {
        assert_eq!(canonical_name("latitude"), "latitude");
        assert_eq!(canonical_name("depth"), "depth");
    }
}
