use axum::{
    Router,
    extract::Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    BoolLike, GapReport, MoneyValue, ProjectionConfig, ScenarioProjection, UserData, Validation,
    calculate_benefit_gaps, project_scenarios, validate_user_data,
};

/// One-shot calculation arguments for the `calc` entry point. Mirrors the
/// intake form: everything is optional and the engine reports what is
/// missing.
#[derive(Parser, Debug)]
#[command(
    name = "benefitgap",
    about = "Benefit gap estimator for public-service retirement planning"
)]
pub struct CalcArgs {
    #[arg(long, help = "teacher, nurse, first-responder, or state-local-hero")]
    profession: Option<String>,
    #[arg(long)]
    years_of_service: Option<f64>,
    #[arg(long, help = "Two-letter state code, e.g. CA")]
    state: Option<String>,
    #[arg(long)]
    current_age: Option<f64>,
    #[arg(long)]
    retirement_age: Option<f64>,
    #[arg(long, help = "Estimated monthly pension in dollars")]
    pension_estimate: Option<f64>,
    #[arg(long, help = "Use the profession default pension")]
    pension_unknown: bool,
    #[arg(long, help = "Inflation protection: yes, no, or unsure")]
    cola: Option<String>,
    #[arg(long, help = "Survivor income planned: yes or no")]
    survivor_planning: Option<String>,
    #[arg(long, help = "Other retirement savings in dollars")]
    current_savings: Option<f64>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated fear tags, e.g. tax-surprises"
    )]
    financial_fears: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(flatten)]
    user: UserData,
    /// Annual growth assumption in percent, e.g. 5 for 5%.
    annual_growth_rate: Option<f64>,
    projection_years: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    report: GapReport,
    projection: ScenarioProjection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalcOutput {
    validation: Validation,
    report: GapReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn user_data_from_args(args: CalcArgs) -> UserData {
    UserData {
        profession: args.profession,
        years_of_service: args.years_of_service,
        state: args.state,
        current_age: args.current_age,
        retirement_age: args.retirement_age,
        pension_estimate: args.pension_estimate.map(MoneyValue::Amount),
        pension_unknown: args.pension_unknown.then_some(true),
        inflation_protection: args.cola,
        survivor_planning: args.survivor_planning.map(BoolLike::Text),
        other_savings: args.current_savings.map(MoneyValue::Amount),
        financial_fears: args.financial_fears,
    }
}

/// Run the one-shot CLI path: validate, then calculate. Validation errors
/// abort with the joined error list; warnings ride along in the output.
pub fn run_calc(args: CalcArgs) -> Result<String, String> {
    let data = user_data_from_args(args);
    let validation = validate_user_data(&data);
    if !validation.is_valid {
        return Err(validation.errors.join("\n"));
    }

    let report = calculate_benefit_gaps(&data);
    serde_json::to_string_pretty(&CalcOutput { validation, report })
        .map_err(|e| format!("failed to serialize result: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/validate", post(validate_handler))
        .route("/api/calculate", post(calculate_handler))
        .route("/api/project", post(project_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("benefitgap HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn validate_handler(Json(payload): Json<UserData>) -> Response {
    json_response(StatusCode::OK, validate_user_data(&payload))
}

async fn calculate_handler(Json(payload): Json<UserData>) -> Response {
    // Total by contract: the fallback branch still serializes as a report,
    // with the error field as the signal.
    json_response(StatusCode::OK, calculate_benefit_gaps(&payload))
}

async fn project_handler(Json(payload): Json<ProjectPayload>) -> Response {
    let report = calculate_benefit_gaps(&payload.user);
    let config = projection_config_from_payload(&payload);
    match project_scenarios(&report, &config) {
        Ok(projection) => json_response(StatusCode::OK, ProjectResponse { report, projection }),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn projection_config_from_payload(payload: &ProjectPayload) -> ProjectionConfig {
    let mut config = ProjectionConfig::default();
    if let Some(rate_pct) = payload.annual_growth_rate {
        config.annual_growth_rate = rate_pct / 100.0;
    }
    if let Some(years) = payload.projection_years {
        config.years = Some(years);
    }
    config
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn user_data_from_json(json: &str) -> Result<UserData, String> {
    serde_json::from_str::<UserData>(json).map_err(|e| format!("Invalid JSON payload: {e}"))
}
