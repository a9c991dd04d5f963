//! Action phrases keyed by forecast increase.

const IMMEDIATE: &[&str] = &[
    "🚨 IMMEDIATE ACTION REQUIRED",
    "Schedule emergency cleanup operations",
    "Implement fishing restrictions in affected areas",
    "Notify international environmental agencies",
    "Conduct emergency impact assessments",
];

const HIGH_PRIORITY: &[&str] = &[
    "⚠️ HIGH PRIORITY",
    "Plan comprehensive cleanup campaigns",
    "Increase monitoring frequency to monthly",
    "Engage local communities in awareness programs",
    "Apply for emergency funding",
];

const MODERATE: &[&str] = &[
    "📈 CONCERN LEVEL: MODERATE",
    "Maintain current monitoring schedule",
    "Consider seasonal cleanup operations",
    "Enhance community reporting programs",
    "Evaluate long-term mitigation strategies",
];

const STABLE: &[&str] = &[
    "✅ CURRENT TREND: STABLE",
    "Continue regular monitoring",
    "Maintain community engagement",
    "Support ongoing research initiatives",
    "Share success stories to maintain awareness",
];

/// Returns the recommendation tier for a percentage increase: above 20,
/// above 10, above 5, or anything else.
#[must_use]
pub fn recommendations(percentage_increase: f64) -> Vec<String> {
    let tier = if percentage_increase > 20.0 {
        IMMEDIATE
    } else if percentage_increase > 10.0 {
        HIGH_PRIORITY
    } else if percentage_increase > 5.0 {
        MODERATE
    } else {
        STABLE
    };
    tier.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_by_threshold() {
        assert_eq!(recommendations(25.0)[0], IMMEDIATE[0]);
        assert_eq!(recommendations(20.0)[0], HIGH_PRIORITY[0]);
        assert_eq!(recommendations(10.5)[0], HIGH_PRIORITY[0]);
        assert_eq!(recommendations(10.0)[0], MODERATE[0]);
        assert_eq!(recommendations(5.000_000_1)[0], MODERATE[0]);
        assert_eq!(recommendations(5.0)[0], STABLE[0]);
        assert_eq!(recommendations(-3.0)[0], STABLE[0]);
    }

    #[test]
    fn each_tier_has_five_phrases() {
        for pct in [30.0, 15.0, 7.0, 0.0] {
            assert_eq!(recommendations(pct).len(), 5);
        }
    }
}
