use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw, loosely-typed caller input. Every field is optional; the normalizer
/// defaults what it can and the validator reports what it cannot.
///
/// Field aliases cover the synonym keys the intake forms send
/// (`cola`, `survivorIncome`, `currentSavings`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserData {
    pub profession: Option<String>,
    pub years_of_service: Option<f64>,
    pub state: Option<String>,
    pub current_age: Option<f64>,
    pub retirement_age: Option<f64>,
    pub pension_estimate: Option<MoneyValue>,
    pub pension_unknown: Option<bool>,
    #[serde(alias = "cola")]
    pub inflation_protection: Option<String>,
    #[serde(alias = "survivorIncome")]
    pub survivor_planning: Option<BoolLike>,
    #[serde(alias = "currentSavings")]
    pub other_savings: Option<MoneyValue>,
    pub financial_fears: Vec<String>,
}

/// A dollar amount that may arrive as a JSON number or as a string
/// (numeric text, or the `"unknown"` marker the pension field uses).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MoneyValue {
    Amount(f64),
    Text(String),
}

impl MoneyValue {
    /// Coerce to a finite dollar amount. Non-numeric and non-finite values
    /// yield `None`; sign is preserved for the validator to judge.
    pub fn parse_amount(&self) -> Option<f64> {
        match self {
            Self::Amount(v) => v.is_finite().then_some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn is_unknown_marker(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().eq_ignore_ascii_case("unknown"))
    }
}

/// A yes/no answer that may arrive as a JSON bool or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoolLike {
    Flag(bool),
    Text(String),
}

impl BoolLike {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(v) => Some(*v),
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "y" | "1" => Some(true),
                "no" | "false" | "n" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profession {
    Teacher,
    Nurse,
    FirstResponder,
    StateLocalHero,
}

impl Profession {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "teacher" => Some(Self::Teacher),
            "nurse" => Some(Self::Nurse),
            "first-responder" => Some(Self::FirstResponder),
            "state-local-hero" => Some(Self::StateLocalHero),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Nurse => "nurse",
            Self::FirstResponder => "first-responder",
            Self::StateLocalHero => "state-local-hero",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of the pre-submission input check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    Green,
    Gold,
    Red,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskComponents {
    pub pension: f64,
    pub tax: f64,
    pub survivor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Multipliers {
    pub profession: f64,
    pub state: f64,
    pub coverage: f64,
    pub cola: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapDetail {
    pub amount: f64,
    pub risk: RiskLevel,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapBreakdown {
    pub pension: GapDetail,
    pub tax: GapDetail,
    pub survivor: GapDetail,
}

/// Assembled engine output. When `error` is set the numeric fields hold
/// safe defaults and must not be trusted; `trace` is the ordered audit log
/// of every defaulting and banding decision made during the call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub error: Option<String>,
    pub risk_score: u32,
    pub risk_color: RiskColor,
    pub hidden_benefit_opportunity: f64,
    pub pension_gap: f64,
    pub tax_torpedo: f64,
    pub survivor_gap: f64,
    pub monthly_gap: f64,
    pub monthly_contribution: f64,
    pub lifetime_payout: f64,
    pub total_gap: f64,
    pub years_until_retirement: Option<i64>,
    pub retirement_age_band: Option<String>,
    pub years_until_retirement_band: Option<String>,
    pub risk_components: RiskComponents,
    pub multipliers: Multipliers,
    pub gaps: GapBreakdown,
    pub trace: Vec<String>,
}
