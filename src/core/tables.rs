use super::types::Profession;

/// Fallback monthly pension used when the caller cannot estimate their own,
/// keyed by profession. Figures are statewide plan averages, frozen here as
/// static configuration.
pub(crate) fn default_monthly_pension(profession: Profession) -> f64 {
    match profession {
        Profession::Teacher => 2_850.0,
        Profession::Nurse => 2_400.0,
        Profession::FirstResponder => 3_100.0,
        Profession::StateLocalHero => 2_600.0,
    }
}

/// Relative benefit richness by profession, applied to the hidden-benefit
/// opportunity figure. Teacher plans are the 1.0 baseline.
pub(crate) fn profession_factor(profession: Profession) -> f64 {
    match profession {
        Profession::Teacher => 1.0,
        Profession::Nurse => 1.05,
        Profession::FirstResponder => 1.15,
        Profession::StateLocalHero => 0.95,
    }
}

/// Cost-of-living factor by two-letter state code (upper-cased). States not
/// listed get the neutral 1.0 factor from the caller.
pub(crate) fn state_factor(code: &str) -> Option<f64> {
    let factor = match code {
        "CA" => 1.30,
        "NY" => 1.25,
        "NJ" => 1.20,
        "MA" => 1.18,
        "CT" => 1.15,
        "WA" => 1.12,
        "MD" => 1.10,
        "OR" => 1.08,
        "CO" => 1.05,
        "IL" => 1.05,
        "VA" => 1.02,
        "FL" => 1.00,
        "MN" => 1.00,
        "NV" => 1.00,
        "PA" => 1.00,
        "AZ" => 0.98,
        "GA" => 0.95,
        "MI" => 0.95,
        "NC" => 0.95,
        "TX" => 0.95,
        "WI" => 0.95,
        "SC" => 0.93,
        "TN" => 0.92,
        "IN" => 0.90,
        "KY" => 0.90,
        "MO" => 0.90,
        "OH" => 0.90,
        "OK" => 0.88,
        "AL" => 0.88,
        "MS" => 0.85,
        _ => return None,
    };
    Some(factor)
}
