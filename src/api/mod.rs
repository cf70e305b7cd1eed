use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    ComparisonResult, ExtraPaymentSolveConfig, ExtraPaymentSolveResult, LoanInputs, SolveIteration,
    StrategyRow, compare_strategies, solve_extra_payment,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const GATE_PROMPT: &str =
    "Enter a loan amount and an interest rate above zero to compare payoff strategies.";

#[derive(Parser, Debug)]
#[command(
    name = "payoff",
    about = "Student loan payoff comparator (standard, extended, extra payment, lump sum)"
)]
struct Cli {
    #[arg(long, help = "Outstanding loan balance")]
    principal: f64,
    #[arg(long, help = "Annual interest rate in percent, e.g. 5")]
    annual_interest_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Extra amount added to every monthly payment of the standard plan"
    )]
    extra_payment: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "One-time payment applied to the balance before rescheduling"
    )]
    lump_sum: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    principal: Option<f64>,
    #[serde(alias = "annualRate", alias = "annual_interest_rate")]
    annual_interest_rate: Option<f64>,
    #[serde(alias = "extra")]
    extra_payment: Option<f64>,
    #[serde(alias = "lump")]
    lump_sum: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    principal: Option<f64>,
    #[serde(alias = "annualRate", alias = "annual_interest_rate")]
    annual_interest_rate: Option<f64>,
    target_months: Option<u32>,
    search_max: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    principal: f64,
    annual_interest_rate: f64,
    periodic_rate: f64,
    baseline_interest_paid: f64,
    rows: Vec<StrategyRow>,
    trajectories: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    target_months: u32,
    solved_extra_payment: Option<f64>,
    achieved_months: Option<u32>,
    converged: bool,
    feasible: bool,
    message: String,
    iterations: Vec<SolveIteration>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<LoanInputs, String> {
    if !cli.principal.is_finite() || cli.principal < 0.0 {
        return Err("--principal must be >= 0".to_string());
    }

    if !cli.annual_interest_rate.is_finite() || !(0.0..=100.0).contains(&cli.annual_interest_rate)
    {
        return Err("--annual-interest-rate must be between 0 and 100".to_string());
    }

    if !cli.extra_payment.is_finite() || cli.extra_payment < 0.0 {
        return Err("--extra-payment must be >= 0".to_string());
    }

    if !cli.lump_sum.is_finite() || cli.lump_sum < 0.0 {
        return Err("--lump-sum must be >= 0".to_string());
    }

    Ok(LoanInputs {
        principal: cli.principal,
        annual_interest_rate: cli.annual_interest_rate / 100.0,
        extra_payment: cli.extra_payment,
        lump_sum: cli.lump_sum,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Payoff HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_get_handler(Query(payload): Query<ComparePayload>) -> Response {
    compare_handler_impl(payload)
}

async fn compare_post_handler(Json(payload): Json<ComparePayload>) -> Response {
    compare_handler_impl(payload)
}

fn compare_handler_impl(payload: ComparePayload) -> Response {
    let inputs = match inputs_from_compare_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    if inputs.principal <= 0.0 || inputs.annual_interest_rate <= 0.0 {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, GATE_PROMPT);
    }

    let comparison = compare_strategies(&inputs);
    json_response(StatusCode::OK, build_compare_response(&inputs, comparison))
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

fn plan_handler_impl(payload: PlanPayload) -> Response {
    let (inputs, config) = match plan_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    if inputs.principal <= 0.0 || inputs.annual_interest_rate <= 0.0 {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, GATE_PROMPT);
    }

    match solve_extra_payment(&inputs, config) {
        Ok(result) => json_response(StatusCode::OK, build_plan_response(result)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
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
fn compare_inputs_from_json(json: &str) -> Result<LoanInputs, String> {
    let payload = serde_json::from_str::<ComparePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_compare_payload(payload)
}

fn inputs_from_compare_payload(payload: ComparePayload) -> Result<LoanInputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.annual_interest_rate {
        cli.annual_interest_rate = v;
    }
    if let Some(v) = payload.extra_payment {
        cli.extra_payment = v;
    }
    if let Some(v) = payload.lump_sum {
        cli.lump_sum = v;
    }

    build_inputs(cli)
}

fn plan_request_from_payload(
    payload: PlanPayload,
) -> Result<(LoanInputs, ExtraPaymentSolveConfig), String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.annual_interest_rate {
        cli.annual_interest_rate = v;
    }

    let inputs = build_inputs(cli)?;

    let Some(target_months) = payload.target_months else {
        return Err("targetMonths is required".to_string());
    };

    let config = ExtraPaymentSolveConfig {
        target_months,
        search_min: 0.0,
        search_max: payload.search_max.unwrap_or(5_000.0),
        tolerance: payload.tolerance.unwrap_or(1.0),
        max_iterations: payload.max_iterations.unwrap_or(32),
    };

    Ok((inputs, config))
}

fn default_cli_for_api() -> Cli {
    Cli {
        principal: 0.0,
        annual_interest_rate: 0.0,
        extra_payment: 0.0,
        lump_sum: 0.0,
    }
}

fn build_compare_response(inputs: &LoanInputs, comparison: ComparisonResult) -> CompareResponse {
    let baseline_interest_paid = comparison
        .rows
        .first()
        .map(|row| row.total_interest_paid)
        .unwrap_or(0.0);
    CompareResponse {
        principal: inputs.principal,
        annual_interest_rate: inputs.annual_interest_rate,
        periodic_rate: comparison.periodic_rate,
        baseline_interest_paid,
        rows: comparison.rows,
        trajectories: comparison.trajectories,
    }
}

fn build_plan_response(result: ExtraPaymentSolveResult) -> PlanResponse {
    PlanResponse {
        target_months: result.target_months,
        solved_extra_payment: result.solved_value,
        achieved_months: result.achieved_months,
        converged: result.converged,
        feasible: result.feasible,
        message: result.message,
        iterations: result.iterations,
    }
}
