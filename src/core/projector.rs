use serde::Serialize;

use super::types::GapReport;

/// Preset contribution scenarios projected against the recommended monthly
/// contribution: sit tight, follow the plan, or stretch past it.
const PRESETS: [(&str, f64); 3] = [
    ("do-nothing", 0.0),
    ("recommended", 1.0),
    ("stretch", 1.5),
];

#[derive(Debug, Clone, Copy)]
pub struct ProjectionConfig {
    /// Annual compound growth applied to the accumulating balance.
    pub annual_growth_rate: f64,
    /// Projection length in years; defaults to the report's own
    /// years-until-retirement figure.
    pub years: Option<u32>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            annual_growth_rate: 0.05,
            years: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub contribution_share: f64,
    pub monthly_contribution: f64,
    pub yearly_balances: Vec<f64>,
    pub terminal_balance: f64,
    pub gap_coverage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjection {
    pub years: u32,
    pub annual_growth_rate: f64,
    pub scenarios: Vec<ScenarioOutcome>,
}

/// Project the report's recommended contribution under the preset scenarios.
/// Deterministic compound growth, growth applied before the year's
/// contributions land.
pub fn project_scenarios(
    report: &GapReport,
    config: &ProjectionConfig,
) -> Result<ScenarioProjection, String> {
    if let Some(error) = &report.error {
        return Err(format!("cannot project a failed calculation: {error}"));
    }

    let years = match config.years {
        Some(v) => v,
        None => report
            .years_until_retirement
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| "projection years unavailable".to_string())?,
    };
    validate_config(config.annual_growth_rate, years)?;

    let scenarios = PRESETS
        .iter()
        .map(|&(name, share)| {
            let monthly_contribution = (report.monthly_contribution * share).round();
            let annual_contribution = monthly_contribution * 12.0;
            let mut balance = 0.0_f64;
            let mut yearly_balances = Vec::with_capacity(years as usize);
            for _ in 0..years {
                balance = balance * (1.0 + config.annual_growth_rate) + annual_contribution;
                yearly_balances.push(balance.round());
            }
            let terminal_balance = yearly_balances.last().copied().unwrap_or(0.0);
            let gap_coverage = (report.total_gap > 0.0)
                .then(|| terminal_balance / report.total_gap);

            ScenarioOutcome {
                scenario: name.to_string(),
                contribution_share: share,
                monthly_contribution,
                yearly_balances,
                terminal_balance,
                gap_coverage,
            }
        })
        .collect();

    Ok(ScenarioProjection {
        years,
        annual_growth_rate: config.annual_growth_rate,
        scenarios,
    })
}

fn validate_config(annual_growth_rate: f64, years: u32) -> Result<(), String> {
    if !annual_growth_rate.is_finite() || annual_growth_rate <= -1.0 {
        return Err("annualGrowthRate must be a finite rate above -100%".to_string());
    }
    if years == 0 || years > 60 {
        return Err("projectionYears must be between 1 and 60".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MoneyValue, UserData, calculate_benefit_gaps};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_report() -> GapReport {
        let input = UserData {
            profession: Some("nurse".to_string()),
            years_of_service: Some(20.0),
            state: Some("TX".to_string()),
            current_age: Some(50.0),
            retirement_age: Some(60.0),
            pension_estimate: Some(MoneyValue::Amount(2_500.0)),
            other_savings: Some(MoneyValue::Amount(80_000.0)),
            inflation_protection: Some("no".to_string()),
            ..UserData::default()
        };
        calculate_benefit_gaps(&input)
    }

    #[test]
    fn projects_over_the_report_horizon_by_default() {
        let report = sample_report();
        let projection =
            project_scenarios(&report, &ProjectionConfig::default()).expect("must project");

        assert_eq!(projection.years, 10);
        assert_eq!(projection.scenarios.len(), 3);
        for outcome in &projection.scenarios {
            assert_eq!(outcome.yearly_balances.len(), 10);
        }
    }

    #[test]
    fn do_nothing_scenario_accumulates_nothing() {
        let report = sample_report();
        let projection =
            project_scenarios(&report, &ProjectionConfig::default()).expect("must project");

        let idle = &projection.scenarios[0];
        assert_eq!(idle.scenario, "do-nothing");
        assert_close(idle.monthly_contribution, 0.0, 1e-9);
        assert_close(idle.terminal_balance, 0.0, 1e-9);
        assert!(idle.yearly_balances.iter().all(|b| *b == 0.0));
    }

    #[test]
    fn zero_growth_terminal_is_contributions_times_years() {
        let report = sample_report();
        let config = ProjectionConfig {
            annual_growth_rate: 0.0,
            years: Some(8),
        };
        let projection = project_scenarios(&report, &config).expect("must project");

        let recommended = &projection.scenarios[1];
        let expected = recommended.monthly_contribution * 12.0 * 8.0;
        assert_close(recommended.terminal_balance, expected, 1.0);
    }

    #[test]
    fn growth_compounds_before_contributions() {
        let report = sample_report();
        let config = ProjectionConfig {
            annual_growth_rate: 0.5,
            years: Some(2),
        };
        let projection = project_scenarios(&report, &config).expect("must project");

        let recommended = &projection.scenarios[1];
        let annual = recommended.monthly_contribution * 12.0;
        // Year one: C; year two: 1.5C + C = 2.5C.
        assert_close(recommended.yearly_balances[0], annual, 1.0);
        assert_close(recommended.yearly_balances[1], (2.5 * annual).round(), 1.0);
    }

    #[test]
    fn stretch_scenario_covers_more_of_the_gap() {
        let report = sample_report();
        let projection =
            project_scenarios(&report, &ProjectionConfig::default()).expect("must project");

        let recommended = projection.scenarios[1]
            .gap_coverage
            .expect("coverage expected");
        let stretch = projection.scenarios[2]
            .gap_coverage
            .expect("coverage expected");
        assert!(stretch > recommended);
    }

    #[test]
    fn rejects_invalid_growth_and_horizon() {
        let report = sample_report();

        let bad_growth = ProjectionConfig {
            annual_growth_rate: -1.5,
            years: Some(10),
        };
        assert!(project_scenarios(&report, &bad_growth).is_err());

        let bad_years = ProjectionConfig {
            annual_growth_rate: 0.05,
            years: Some(0),
        };
        assert!(project_scenarios(&report, &bad_years).is_err());
    }

    #[test]
    fn refuses_to_project_a_fallback_report() {
        let input = UserData {
            current_age: Some(65.0),
            retirement_age: Some(60.0),
            ..UserData::default()
        };
        let report = calculate_benefit_gaps(&input);
        assert!(report.error.is_some());

        let err = project_scenarios(&report, &ProjectionConfig::default())
            .expect_err("fallback must not project");
        assert!(err.contains("failed calculation"));
    }
}
