//! Read-only polymer reference profiles.
//!
//! Summarizes common uses, persistence, recyclability and the additives each
//! polymer is known to leach. Consumed by reporting layers next to sample
//! data; nothing in the computation core mutates it.

use serde::Serialize;

/// Risk scores on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskScores {
    /// Harm to marine organisms.
    pub marine_life: u8,
    /// Harm to people via food chain or direct contact.
    pub human_health: u8,
    /// Tendency to accumulate in tissue.
    pub bioaccumulation: u8,
}

/// A chemical additive found in a polymer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Additive {
    /// Additive name.
    pub name: &'static str,
    /// Qualitative toxicity.
    pub toxicity: &'static str,
    /// Effect once released into water.
    pub marine_impact: &'static str,
    /// Known human health concerns.
    pub human_health: &'static str,
}

/// Reference information for one polymer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolymerProfile {
    /// Polymer label, matching [`crate::SampleRecord::polymer_type`].
    pub polymer: &'static str,
    /// Typical products.
    pub uses: &'static str,
    /// Approximate time to degrade.
    pub degradation: &'static str,
    /// Recycling code / availability.
    pub recyclable: &'static str,
    /// Risk assessment.
    pub risks: RiskScores,
    /// Known additives.
    pub additives: &'static [Additive],
}

const PROFILES: &[PolymerProfile] = &[
    PolymerProfile {
        polymer: "Polyethylene (PE)",
        uses: "Packaging, bottles, films",
        degradation: "500+ years",
        recyclable: "Yes (Type 2)",
        risks: RiskScores {
            marine_life: 7,
            human_health: 4,
            bioaccumulation: 6,
        },
        additives: &[
            Additive {
                name: "Irganox 1010",
                toxicity: "Low",
                marine_impact: "Minimal leaching",
                human_health: "Food contact approved",
            },
            Additive {
                name: "Calcium Stearate",
                toxicity: "Low",
                marine_impact: "Biodegradable",
                human_health: "Generally recognized as safe",
            },
        ],
    },
    PolymerProfile {
        polymer: "Polypropylene (PP)",
        uses: "Containers, automotive parts",
        degradation: "400+ years",
        recyclable: "Yes (Type 5)",
        risks: RiskScores {
            marine_life: 6,
            human_health: 3,
            bioaccumulation: 5,
        },
        additives: &[Additive {
            name: "Tinuvin 770",
            toxicity: "Moderate",
            marine_impact: "UV stabilizer, slow release",
            human_health: "Skin contact concerns",
        }],
    },
    PolymerProfile {
        polymer: "Polystyrene (PS)",
        uses: "Foam packaging, disposable cups",
        degradation: "Never fully degrades",
        recyclable: "Yes (Type 6)",
        risks: RiskScores {
            marine_life: 9,
            human_health: 7,
            bioaccumulation: 8,
        },
        additives: &[
            Additive {
                name: "HBCD (Flame Retardant)",
                toxicity: "High",
                marine_impact: "Persistent organic pollutant",
                human_health: "Probable carcinogen",
            },
            Additive {
                name: "Styrene Monomer",
                toxicity: "High",
                marine_impact: "Toxic to aquatic life",
                human_health: "Neurotoxic, possible carcinogen",
            },
        ],
    },
    PolymerProfile {
        polymer: "Polyethylene terephthalate (PET)",
        uses: "Bottles, clothing fibers",
        degradation: "450+ years",
        recyclable: "Yes (Type 1)",
        risks: RiskScores {
            marine_life: 8,
            human_health: 6,
            bioaccumulation: 7,
        },
        additives: &[Additive {
            name: "Antimony Trioxide",
            toxicity: "High",
            marine_impact: "Toxic to aquatic organisms",
            human_health: "Possible carcinogen",
        }],
    },
    PolymerProfile {
        polymer: "Polyvinyl chloride (PVC)",
        uses: "Pipes, flooring, medical devices",
        degradation: "1000+ years",
        recyclable: "Limited (Type 3)",
        risks: RiskScores {
            marine_life: 10,
            human_health: 9,
            bioaccumulation: 9,
        },
        additives: &[
            Additive {
                name: "DEHP (Phthalate)",
                toxicity: "Very High",
                marine_impact: "Endocrine disruptor",
                human_health: "Reproductive toxicity",
            },
            Additive {
                name: "Lead Stabilizers",
                toxicity: "Extremely High",
                marine_impact: "Heavy metal contamination",
                human_health: "Neurotoxic",
            },
        ],
    },
];

/// Returns every known polymer profile.
#[must_use]
pub const fn all_profiles() -> &'static [PolymerProfile] {
    PROFILES
}

/// Looks up the profile for a polymer label (case-insensitive).
#[must_use]
pub fn polymer_profile(polymer: &str) -> Option<&'static PolymerProfile> {
    PROFILES
        .iter()
        .find(|p| p.polymer.eq_ignore_ascii_case(polymer.trim()))
}
