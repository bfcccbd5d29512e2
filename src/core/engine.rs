use super::tables;
use super::types::{
    BoolLike, GapBreakdown, GapDetail, GapReport, MoneyValue, Multipliers, Profession, RiskColor,
    RiskComponents, RiskLevel, UserData, Validation,
};

/// Fixed annualization horizon: 20 years of retirement, in months.
const HORIZON_MONTHS: f64 = 240.0;

const RETIREMENT_ORDER_ERROR: &str = "Retirement age must be greater than current age";

const MIN_SERVICE_YEARS: i64 = 5;
const MAX_SERVICE_YEARS: i64 = 40;
const MIN_CURRENT_AGE: i64 = 21;
const MAX_CURRENT_AGE: i64 = 80;
const MIN_RETIREMENT_AGE: i64 = 50;
const MAX_RETIREMENT_AGE: i64 = 80;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ColaChoice {
    Yes,
    No,
    Unsure,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum RetirementAgeBand {
    Early,
    OnTime,
    Late,
}

impl RetirementAgeBand {
    // Inclusive tests in ascending order; ages below the first band still
    // count as early retirement.
    fn for_age(age: i64) -> Self {
        if (55..=62).contains(&age) {
            Self::Early
        } else if (63..=67).contains(&age) {
            Self::OnTime
        } else if age >= 68 {
            Self::Late
        } else {
            Self::Early
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Early => "55-62",
            Self::OnTime => "63-67",
            Self::Late => "68+",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum HorizonBand {
    Near,
    Short,
    Mid,
    Long,
    Far,
}

impl HorizonBand {
    // Inclusive on both ends except the open top band; horizons under five
    // years plan on the shortest runway.
    fn for_years(years: i64) -> Self {
        if (5..=10).contains(&years) {
            Self::Near
        } else if (11..=15).contains(&years) {
            Self::Short
        } else if (16..=20).contains(&years) {
            Self::Mid
        } else if (21..=25).contains(&years) {
            Self::Long
        } else if years >= 26 {
            Self::Far
        } else {
            Self::Near
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Near => "5-10",
            Self::Short => "11-15",
            Self::Mid => "16-20",
            Self::Long => "21-25",
            Self::Far => "26+",
        }
    }

    /// Fixed stand-in for the band used by the contribution math instead of
    /// the exact year count.
    fn proxy_years(self) -> u32 {
        match self {
            Self::Near => 8,
            Self::Short => 13,
            Self::Mid => 18,
            Self::Long => 23,
            Self::Far => 28,
        }
    }
}

#[derive(Debug, Clone)]
struct CanonicalInput {
    profession: Profession,
    years_of_service: i64,
    state: String,
    current_age: Option<i64>,
    retirement_age: Option<i64>,
    monthly_pension: f64,
    cola: ColaChoice,
    survivor_covered: bool,
    other_savings: f64,
    financial_fears: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Derived {
    years_until_retirement: i64,
    age_band: RetirementAgeBand,
    horizon_band: HorizonBand,
    profession_factor: f64,
    state_factor: f64,
    coverage_level: f64,
    cola_value: f64,
}

#[derive(Debug, Clone, Copy)]
struct GapFigures {
    pension_gap: f64,
    tax_torpedo: f64,
    survivor_gap: f64,
    monthly_gap: f64,
    monthly_contribution: f64,
    lifetime_payout: f64,
    total_gap: f64,
    hidden_benefit_opportunity: f64,
}

/// Check raw input before submission. Never mutates the input and is
/// idempotent; warnings are advisory and never block calculation.
pub fn validate_user_data(data: &UserData) -> Validation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if non_empty(&data.profession).is_none() {
        errors.push("profession is required".to_string());
    }

    match data.years_of_service.map(truncate) {
        None => errors.push("yearsOfService is required".to_string()),
        Some(v) if !(MIN_SERVICE_YEARS..=MAX_SERVICE_YEARS).contains(&v) => {
            errors.push(format!(
                "yearsOfService must be between {MIN_SERVICE_YEARS} and {MAX_SERVICE_YEARS}"
            ));
        }
        Some(_) => {}
    }

    if non_empty(&data.state).is_none() {
        errors.push("state is required".to_string());
    }

    let current_age = data.current_age.map(truncate);
    match current_age {
        None => errors.push("currentAge is required".to_string()),
        Some(v) if !(MIN_CURRENT_AGE..=MAX_CURRENT_AGE).contains(&v) => {
            errors.push(format!(
                "currentAge must be between {MIN_CURRENT_AGE} and {MAX_CURRENT_AGE}"
            ));
        }
        Some(_) => {}
    }

    let retirement_age = data.retirement_age.map(truncate);
    match retirement_age {
        None => errors.push("retirementAge is required".to_string()),
        Some(v) if !(MIN_RETIREMENT_AGE..=MAX_RETIREMENT_AGE).contains(&v) => {
            errors.push(format!(
                "retirementAge must be between {MIN_RETIREMENT_AGE} and {MAX_RETIREMENT_AGE}"
            ));
        }
        Some(_) => {}
    }

    if let (Some(current), Some(retirement)) = (current_age, retirement_age) {
        if retirement <= current {
            errors.push("retirementAge must be greater than currentAge".to_string());
        } else {
            let years = retirement - current;
            if years > 50 {
                warnings.push(
                    "more than 50 years until retirement is outside the expected range"
                        .to_string(),
                );
            } else if years < 5 {
                warnings.push(
                    "fewer than 5 years until retirement leaves little room for catch-up savings"
                        .to_string(),
                );
            }
        }
    }

    if pension_is_unknown(data) || data.pension_estimate.is_none() {
        warnings.push("no pension estimate provided; a profession default will be used".to_string());
    } else if let Some(value) = &data.pension_estimate {
        match value.parse_amount() {
            Some(v) if v >= 0.0 => {
                if v > 20_000.0 {
                    warnings
                        .push("pension estimate above $20,000/mo is unusually high".to_string());
                }
            }
            _ => errors.push("pensionEstimate must be a non-negative number".to_string()),
        }
    }

    if let Some(value) = &data.other_savings {
        match value.parse_amount() {
            Some(v) if v >= 0.0 => {}
            _ => errors.push("currentSavings must be a non-negative number".to_string()),
        }
    }

    if data.inflation_protection.is_none() {
        warnings.push(
            "no inflation protection preference provided; scoring assumes no COLA".to_string(),
        );
    }
    if data.survivor_planning.is_none() {
        warnings.push(
            "no survivor planning preference provided; scoring assumes no coverage".to_string(),
        );
    }

    Validation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Turn raw input into a gap report. Total: never panics and never returns
/// an `Err` — the one domain failure (retirement age not after current age)
/// comes back as a fallback report with the `error` field set.
pub fn calculate_benefit_gaps(data: &UserData) -> GapReport {
    let mut trace = Vec::new();
    let canonical = normalize(data, &mut trace);
    match derive(&canonical, &mut trace) {
        Ok(derived) => {
            let (components, risk_score, risk_color) = score(&canonical, &derived);
            let figures = compute_gaps(&canonical, &derived);
            assemble(&derived, components, risk_score, risk_color, figures, trace)
        }
        Err(message) => fallback_report(message, trace),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn pension_is_unknown(data: &UserData) -> bool {
    data.pension_unknown.unwrap_or(false)
        || data
            .pension_estimate
            .as_ref()
            .is_some_and(MoneyValue::is_unknown_marker)
}

fn normalize(data: &UserData, trace: &mut Vec<String>) -> CanonicalInput {
    let profession = match non_empty(&data.profession).map(str::to_ascii_lowercase) {
        None => {
            trace.push("profession missing; defaulting to teacher".to_string());
            Profession::Teacher
        }
        Some(name) => match Profession::from_name(&name) {
            Some(p) => p,
            None => {
                trace.push(format!(
                    "unrecognized profession \"{name}\"; defaulting to teacher"
                ));
                Profession::Teacher
            }
        },
    };

    let years_of_service = match data.years_of_service {
        Some(v) if v.is_finite() => truncate(v),
        Some(_) => {
            trace.push("yearsOfService is not a number; defaulting to 0".to_string());
            0
        }
        None => {
            trace.push("yearsOfService missing; defaulting to 0".to_string());
            0
        }
    };

    let state = match non_empty(&data.state).map(str::to_ascii_uppercase) {
        Some(code) => code,
        None => {
            trace.push("state missing; using the neutral cost-of-living factor".to_string());
            String::new()
        }
    };

    let current_age = data.current_age.filter(|v| v.is_finite()).map(truncate);
    let retirement_age = data.retirement_age.filter(|v| v.is_finite()).map(truncate);

    let default_pension = tables::default_monthly_pension(profession);
    let monthly_pension = if pension_is_unknown(data) {
        trace.push(format!(
            "pension marked unknown; using the {profession} default of ${default_pension:.0}/mo"
        ));
        default_pension
    } else {
        match data
            .pension_estimate
            .as_ref()
            .and_then(MoneyValue::parse_amount)
        {
            Some(amount) => amount,
            None => {
                trace.push(format!(
                    "pension estimate missing or unparseable; using the {profession} default of ${default_pension:.0}/mo"
                ));
                default_pension
            }
        }
    };

    let cola = match data
        .inflation_protection
        .as_deref()
        .map(|s| s.trim().to_ascii_lowercase())
    {
        Some(answer) if answer == "yes" => ColaChoice::Yes,
        Some(answer) if answer == "unsure" => ColaChoice::Unsure,
        Some(_) => ColaChoice::No,
        None => {
            trace.push("no COLA preference given; treating as no".to_string());
            ColaChoice::No
        }
    };

    let survivor_covered = match data.survivor_planning.as_ref().and_then(BoolLike::as_bool) {
        Some(v) => v,
        None => {
            trace.push("no survivor planning preference given; treating as uncovered".to_string());
            false
        }
    };

    let other_savings = match &data.other_savings {
        None => {
            trace.push("no savings provided; defaulting to $0".to_string());
            0.0
        }
        Some(value) => match value.parse_amount() {
            Some(amount) => amount,
            None => {
                trace.push("savings amount unparseable; defaulting to $0".to_string());
                0.0
            }
        },
    };

    CanonicalInput {
        profession,
        years_of_service,
        state,
        current_age,
        retirement_age,
        monthly_pension,
        cola,
        survivor_covered,
        other_savings,
        financial_fears: data.financial_fears.clone(),
    }
}

fn derive(canonical: &CanonicalInput, trace: &mut Vec<String>) -> Result<Derived, String> {
    let (Some(current), Some(retirement)) = (canonical.current_age, canonical.retirement_age)
    else {
        return Err(RETIREMENT_ORDER_ERROR.to_string());
    };

    let years_until_retirement = retirement - current;
    if years_until_retirement <= 0 {
        return Err(RETIREMENT_ORDER_ERROR.to_string());
    }

    let age_band = RetirementAgeBand::for_age(retirement);
    if retirement < 55 {
        trace.push(format!(
            "retirement age {retirement} is below the 55-62 band; treating as early retirement"
        ));
    }
    trace.push(format!(
        "retirement age {retirement} banded as {}",
        age_band.label()
    ));

    let horizon_band = HorizonBand::for_years(years_until_retirement);
    if years_until_retirement < 5 {
        trace.push(format!(
            "{years_until_retirement} years until retirement is below the 5-10 band; using the shortest runway"
        ));
    }
    trace.push(format!(
        "{years_until_retirement} years until retirement banded as {} (proxy {} years)",
        horizon_band.label(),
        horizon_band.proxy_years()
    ));

    let state_factor = match tables::state_factor(&canonical.state) {
        Some(factor) => factor,
        None => {
            trace.push(format!(
                "state \"{}\" not in the cost-of-living table; using the neutral factor 1.0",
                canonical.state
            ));
            1.0
        }
    };

    Ok(Derived {
        years_until_retirement,
        age_band,
        horizon_band,
        profession_factor: tables::profession_factor(canonical.profession),
        state_factor,
        coverage_level: if canonical.survivor_covered { 0.3 } else { 1.0 },
        cola_value: if canonical.cola == ColaChoice::Yes {
            1.0
        } else {
            0.0
        },
    })
}

fn has_tax_surprise_fear(fears: &[String]) -> bool {
    fears
        .iter()
        .any(|fear| fear == "tax-surprises" || fear == "Tax-Surprises")
}

fn score(canonical: &CanonicalInput, derived: &Derived) -> (RiskComponents, u32, RiskColor) {
    let early_retire_bonus = if derived.age_band == RetirementAgeBand::Early {
        20.0
    } else {
        0.0
    };
    let tax_surprises_bonus = if has_tax_surprise_fear(&canonical.financial_fears) {
        30.0
    } else {
        0.0
    };

    let pension = (80.0 - 30.0 * derived.cola_value + early_retire_bonus).clamp(0.0, 100.0);
    let tax =
        ((canonical.other_savings / 100_000.0) * 25.0 + tax_surprises_bonus).clamp(0.0, 100.0);
    let survivor = (80.0 * derived.coverage_level).round();

    // Clamped independently of the component clamps; the composite must
    // stay inside 0-100 under any weighting.
    let composite = 0.5 * pension + 0.3 * tax + 0.2 * survivor;
    let risk_score = composite.round().clamp(0.0, 100.0) as u32;

    (
        RiskComponents {
            pension,
            tax,
            survivor,
        },
        risk_score,
        risk_color_for(risk_score),
    )
}

fn risk_color_for(score: u32) -> RiskColor {
    if score < 40 {
        RiskColor::Green
    } else if score <= 70 {
        RiskColor::Gold
    } else {
        RiskColor::Red
    }
}

fn risk_level_for(component: f64) -> RiskLevel {
    if component > 60.0 {
        RiskLevel::High
    } else if component > 30.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn compute_gaps(canonical: &CanonicalInput, derived: &Derived) -> GapFigures {
    let service_years = canonical.years_of_service as f64;
    let proxy_years = derived.horizon_band.proxy_years() as f64;

    let pension_gap = (canonical.monthly_pension * 0.03 * service_years).round();
    let tax_torpedo = (canonical.other_savings * 0.30).round();
    let survivor_gap = (canonical.monthly_pension * 0.40).round();
    let monthly_gap = pension_gap + survivor_gap + (tax_torpedo / HORIZON_MONTHS).round();
    // The band proxy stands in for the exact year count here.
    let monthly_contribution = ((monthly_gap * 12.0) / (proxy_years * 7.0)).round();
    let lifetime_payout = (monthly_contribution * 12.0 * proxy_years * 3.0).round();
    let total_gap = (pension_gap + survivor_gap) * HORIZON_MONTHS + tax_torpedo;
    let hidden_benefit_opportunity = (1800.0
        * (service_years / 28.0)
        * derived.profession_factor
        * derived.state_factor)
        .round();

    GapFigures {
        pension_gap,
        tax_torpedo,
        survivor_gap,
        monthly_gap,
        monthly_contribution,
        lifetime_payout,
        total_gap,
        hidden_benefit_opportunity,
    }
}

fn assemble(
    derived: &Derived,
    components: RiskComponents,
    risk_score: u32,
    risk_color: RiskColor,
    figures: GapFigures,
    trace: Vec<String>,
) -> GapReport {
    let gaps = GapBreakdown {
        pension: GapDetail {
            amount: figures.pension_gap * HORIZON_MONTHS,
            risk: risk_level_for(components.pension),
            description: "Projected pension shortfall over a 20-year retirement".to_string(),
        },
        tax: GapDetail {
            amount: figures.tax_torpedo,
            risk: risk_level_for(components.tax),
            description: "Estimated tax exposure on pre-tax savings at withdrawal".to_string(),
        },
        survivor: GapDetail {
            amount: figures.survivor_gap * HORIZON_MONTHS,
            risk: risk_level_for(components.survivor),
            description: "Household income at risk without survivor coverage".to_string(),
        },
    };

    GapReport {
        error: None,
        risk_score,
        risk_color,
        hidden_benefit_opportunity: figures.hidden_benefit_opportunity,
        pension_gap: figures.pension_gap,
        tax_torpedo: figures.tax_torpedo,
        survivor_gap: figures.survivor_gap,
        monthly_gap: figures.monthly_gap,
        monthly_contribution: figures.monthly_contribution,
        lifetime_payout: figures.lifetime_payout,
        total_gap: figures.total_gap,
        years_until_retirement: Some(derived.years_until_retirement),
        retirement_age_band: Some(derived.age_band.label().to_string()),
        years_until_retirement_band: Some(derived.horizon_band.label().to_string()),
        risk_components: components,
        multipliers: Multipliers {
            profession: derived.profession_factor,
            state: derived.state_factor,
            coverage: derived.coverage_level,
            cola: derived.cola_value as u8,
        },
        gaps,
        trace,
    }
}

fn fallback_report(message: String, trace: Vec<String>) -> GapReport {
    let zero_detail = |description: &str| GapDetail {
        amount: 0.0,
        risk: RiskLevel::Low,
        description: description.to_string(),
    };

    GapReport {
        error: Some(message),
        risk_score: 0,
        risk_color: RiskColor::Green,
        hidden_benefit_opportunity: 0.0,
        pension_gap: 0.0,
        tax_torpedo: 0.0,
        survivor_gap: 0.0,
        monthly_gap: 0.0,
        monthly_contribution: 0.0,
        lifetime_payout: 0.0,
        total_gap: 0.0,
        years_until_retirement: None,
        retirement_age_band: None,
        years_until_retirement_band: None,
        risk_components: RiskComponents {
            pension: 0.0,
            tax: 0.0,
            survivor: 0.0,
        },
        multipliers: Multipliers {
            profession: 1.0,
            state: 1.0,
            coverage: 1.0,
            cola: 0,
        },
        gaps: GapBreakdown {
            pension: zero_detail("Projected pension shortfall over a 20-year retirement"),
            tax: zero_detail("Estimated tax exposure on pre-tax savings at withdrawal"),
            survivor: zero_detail("Household income at risk without survivor coverage"),
        },
        trace,
    }
}
