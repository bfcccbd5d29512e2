mod engine;
mod projector;
mod tables;
mod types;

pub use engine::{calculate_benefit_gaps, validate_user_data};
pub use projector::{ProjectionConfig, ScenarioOutcome, ScenarioProjection, project_scenarios};
pub use types::{
    BoolLike, GapBreakdown, GapDetail, GapReport, MoneyValue, Multipliers, Profession, RiskColor,
    RiskComponents, RiskLevel, UserData, Validation,
};
