use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    BudgetLine, CategorySeries, Debt, DebtPaymentRow, EngineError, ExpenseCategory, Goal,
    GoalProgress, PortfolioAllocation, ProjectionPoint, ScenarioTable, SnowballRow, SweepParams,
    TakeHomeBreakdown, TaxBracket, blended_rate, budget_vs_actual, debt_snowball,
    forecast_expenses, forecast_salary, future_value, marginal_rate, project_growth,
    project_with_contributions, sweep, take_home, track_debts, track_goals,
};

/// Cap on snowball rounds when the caller does not supply one: 50 years of
/// monthly payments.
const DEFAULT_MAX_ROUNDS: u32 = 600;

fn default_tax_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket {
            threshold: 10_000.0,
            rate: 0.1,
        },
        TaxBracket {
            threshold: 50_000.0,
            rate: 0.2,
        },
        TaxBracket {
            threshold: 100_000.0,
            rate: 0.3,
        },
        TaxBracket {
            threshold: f64::INFINITY,
            rate: 0.4,
        },
    ]
}

fn pct(value: f64) -> f64 {
    value / 100.0
}

#[derive(Parser, Debug)]
#[command(
    name = "fincast",
    about = "Deterministic personal finance projections (take-home pay, salary growth, retirement scenarios)"
)]
struct Cli {
    #[arg(long, help = "Annual gross salary")]
    salary: f64,
    #[arg(long, default_value_t = 0.0, help = "Total annual deductions")]
    deductions: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual salary growth in percent"
    )]
    salary_growth_rate: f64,
    #[arg(long, default_value_t = 5, help = "Number of years to forecast")]
    forecast_years: u32,
    #[arg(long, default_value_t = 0.0, help = "Current retirement savings")]
    current_savings: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual retirement contribution")]
    annual_contribution: f64,
    #[arg(long, default_value_t = 30, help = "Years until retirement")]
    years_to_retirement: u32,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Expected annual retirement growth rate in percent"
    )]
    growth_rate: f64,
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = vec![3.0, 5.0, 7.0, 10.0],
        help = "Scenario growth rates in percent, comma separated"
    )]
    scenario_rates: Vec<f64>,
}

#[derive(Debug, Clone)]
struct PlanInputs {
    salary: f64,
    deductions: f64,
    salary_growth_rate: f64,
    forecast_years: u32,
    current_savings: f64,
    annual_contribution: f64,
    years_to_retirement: u32,
    growth_rate: f64,
    scenario_rates: Vec<f64>,
    brackets: Vec<TaxBracket>,
}

fn build_plan_inputs(cli: Cli) -> Result<PlanInputs, String> {
    if !cli.salary.is_finite() || cli.salary < 0.0 {
        return Err("--salary must be >= 0".to_string());
    }

    if !cli.deductions.is_finite() || cli.deductions < 0.0 {
        return Err("--deductions must be >= 0".to_string());
    }

    if cli.forecast_years == 0 {
        return Err("--forecast-years must be >= 1".to_string());
    }

    if cli.years_to_retirement == 0 {
        return Err("--years-to-retirement must be >= 1".to_string());
    }

    for (name, rate) in [
        ("--salary-growth-rate", cli.salary_growth_rate),
        ("--growth-rate", cli.growth_rate),
    ] {
        if !rate.is_finite() || rate <= -100.0 {
            return Err(format!("{name} must be > -100"));
        }
    }

    if cli.scenario_rates.is_empty() {
        return Err("--scenario-rates must list at least one rate".to_string());
    }

    for rate in &cli.scenario_rates {
        if !rate.is_finite() || *rate <= -100.0 {
            return Err("--scenario-rates entries must be > -100".to_string());
        }
    }

    Ok(PlanInputs {
        salary: cli.salary,
        deductions: cli.deductions,
        salary_growth_rate: pct(cli.salary_growth_rate),
        forecast_years: cli.forecast_years,
        current_savings: cli.current_savings,
        annual_contribution: cli.annual_contribution,
        years_to_retirement: cli.years_to_retirement,
        growth_rate: pct(cli.growth_rate),
        scenario_rates: cli.scenario_rates.iter().map(|rate| pct(*rate)).collect(),
        brackets: default_tax_brackets(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    monthly_take_home: f64,
    breakdown: TakeHomeBreakdown,
    marginal_rate: f64,
    salary_projection: Vec<ProjectionPoint>,
    retirement_future_value: f64,
    scenarios: ScenarioTable,
}

fn run_plan(inputs: &PlanInputs) -> Result<PlanResponse, EngineError> {
    let (monthly_take_home, breakdown) =
        take_home(inputs.salary, inputs.deductions, &inputs.brackets)?;
    let marginal = marginal_rate(&inputs.brackets, inputs.salary)?;
    let salary_projection = project_growth(
        inputs.salary,
        inputs.salary_growth_rate,
        inputs.forecast_years,
    )?;
    let retirement_future_value = future_value(
        inputs.current_savings,
        inputs.growth_rate,
        inputs.years_to_retirement,
        inputs.annual_contribution,
    )?;
    let scenarios = sweep(
        &SweepParams {
            initial_value: inputs.current_savings,
            extra_per_period: inputs.annual_contribution,
            periods: inputs.years_to_retirement,
        },
        &inputs.scenario_rates,
    )?;

    Ok(PlanResponse {
        monthly_take_home,
        breakdown,
        marginal_rate: marginal,
        salary_projection,
        retirement_future_value,
        scenarios,
    })
}

/// One-shot CLI entry: parse flags, run every plan section, print JSON.
pub fn run_plan_cli(args: Vec<String>) -> Result<String, String> {
    let cli = Cli::parse_from(args);
    let inputs = build_plan_inputs(cli)?;
    let response = run_plan(&inputs).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BracketPayload {
    /// Upper income threshold; omit (or null) for the unbounded top bracket.
    threshold: Option<f64>,
    rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TakeHomePayload {
    salary: Option<f64>,
    deductions: Option<f64>,
    brackets: Option<Vec<BracketPayload>>,
}

#[derive(Debug)]
struct TakeHomeRequest {
    salary: f64,
    deductions: f64,
    brackets: Vec<TaxBracket>,
}

fn build_take_home_request(payload: TakeHomePayload) -> TakeHomeRequest {
    let brackets = payload
        .brackets
        .map(|brackets| {
            brackets
                .into_iter()
                .map(|bracket| TaxBracket {
                    threshold: bracket.threshold.unwrap_or(f64::INFINITY),
                    rate: bracket.rate,
                })
                .collect()
        })
        .unwrap_or_else(default_tax_brackets);

    TakeHomeRequest {
        salary: payload.salary.unwrap_or(0.0),
        deductions: payload.deductions.unwrap_or(0.0),
        brackets,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TakeHomeResponse {
    monthly_take_home: f64,
    breakdown: TakeHomeBreakdown,
    marginal_rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SalaryForecastPayload {
    salary: Option<f64>,
    /// Annual growth in percent.
    growth_rate: Option<f64>,
    years: Option<u32>,
    /// Raises keyed by 1-based forecast year; folded into the base salary.
    raises: Option<BTreeMap<u32, f64>>,
    /// One-off bonuses keyed by 1-based forecast year.
    bonuses: Option<BTreeMap<u32, f64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SalaryForecastResponse {
    series: Vec<ProjectionPoint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CategoryPayload {
    name: String,
    amount: Option<f64>,
    /// Annual inflation in percent.
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExpenseForecastPayload {
    years: Option<u32>,
    categories: Option<Vec<CategoryPayload>>,
}

fn build_expense_categories(payload: &ExpenseForecastPayload) -> Vec<ExpenseCategory> {
    match &payload.categories {
        Some(categories) => categories
            .iter()
            .map(|category| ExpenseCategory {
                name: category.name.clone(),
                amount: category.amount.unwrap_or(1_000.0),
                inflation_rate: pct(category.inflation_rate.unwrap_or(3.0)),
            })
            .collect(),
        None => ["Housing", "Food", "Transport", "Entertainment"]
            .into_iter()
            .map(|name| ExpenseCategory {
                name: name.to_string(),
                amount: 1_000.0,
                inflation_rate: 0.03,
            })
            .collect(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseForecastResponse {
    series: Vec<CategorySeries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AllocationPayload {
    name: String,
    /// Portfolio share in percent; shares are normalized by their total.
    weight: Option<f64>,
    /// Expected annual return in percent.
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestmentPayload {
    initial_investment: Option<f64>,
    years: Option<u32>,
    allocations: Option<Vec<AllocationPayload>>,
}

fn build_allocations(payload: &InvestmentPayload) -> Vec<PortfolioAllocation> {
    match &payload.allocations {
        Some(allocations) => allocations
            .iter()
            .map(|allocation| PortfolioAllocation {
                name: allocation.name.clone(),
                weight: allocation.weight.unwrap_or(0.0),
                expected_return: pct(allocation.expected_return.unwrap_or(0.0)),
            })
            .collect(),
        None => vec![
            PortfolioAllocation {
                name: "Stocks".to_string(),
                weight: 50.0,
                expected_return: 0.07,
            },
            PortfolioAllocation {
                name: "Bonds".to_string(),
                weight: 30.0,
                expected_return: 0.03,
            },
            PortfolioAllocation {
                name: "Mutual Funds".to_string(),
                weight: 20.0,
                expected_return: 0.05,
            },
        ],
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestmentResponse {
    blended_rate: f64,
    series: Vec<ProjectionPoint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_savings: Option<f64>,
    annual_contribution: Option<f64>,
    years_to_retirement: Option<u32>,
    /// Expected annual growth in percent.
    growth_rate: Option<f64>,
    /// Scenario growth rates in percent.
    scenario_rates: Option<Vec<f64>>,
}

#[derive(Debug)]
struct RetirementRequest {
    current_savings: f64,
    annual_contribution: f64,
    years_to_retirement: u32,
    growth_rate: f64,
    scenario_rates: Vec<f64>,
}

fn build_retirement_request(payload: RetirementPayload) -> RetirementRequest {
    RetirementRequest {
        current_savings: payload.current_savings.unwrap_or(0.0),
        annual_contribution: payload.annual_contribution.unwrap_or(0.0),
        years_to_retirement: payload.years_to_retirement.unwrap_or(30),
        growth_rate: pct(payload.growth_rate.unwrap_or(5.0)),
        scenario_rates: payload
            .scenario_rates
            .unwrap_or_else(|| vec![3.0, 5.0, 7.0, 10.0])
            .into_iter()
            .map(pct)
            .collect(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetirementResponse {
    future_value: f64,
    series: Vec<ProjectionPoint>,
    scenarios: ScenarioTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DebtPayload {
    name: String,
    balance: Option<f64>,
    /// Annual interest in percent (APR).
    interest_rate: Option<f64>,
    monthly_payment: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DebtPlanPayload {
    debts: Vec<DebtPayload>,
    max_rounds: Option<u32>,
}

fn build_debts(payload: &DebtPlanPayload) -> Vec<Debt> {
    payload
        .debts
        .iter()
        .map(|debt| Debt {
            name: debt.name.clone(),
            balance: debt.balance.unwrap_or(0.0),
            interest_rate: debt.interest_rate.unwrap_or(0.0),
            monthly_payment: debt.monthly_payment.unwrap_or(0.0),
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebtPlanResponse {
    snapshot: Vec<DebtPaymentRow>,
    schedule: Vec<SnowballRow>,
    total_rounds: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalPayload {
    name: String,
    target_amount: Option<f64>,
    current_amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalProgressPayload {
    goals: Vec<GoalPayload>,
}

fn build_goals(payload: &GoalProgressPayload) -> Vec<Goal> {
    payload
        .goals
        .iter()
        .map(|goal| Goal {
            name: goal.name.clone(),
            target_amount: goal.target_amount.unwrap_or(0.0),
            current_amount: goal.current_amount.unwrap_or(0.0),
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalProgressResponse {
    goals: Vec<GoalProgress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BudgetEntryPayload {
    category: String,
    budget: Option<f64>,
    actual: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BudgetPayload {
    entries: Vec<BudgetEntryPayload>,
}

fn split_budget_entries(payload: &BudgetPayload) -> (Vec<(String, f64)>, Vec<(String, f64)>) {
    let budget = payload
        .entries
        .iter()
        .map(|entry| (entry.category.clone(), entry.budget.unwrap_or(0.0)))
        .collect();
    let actual = payload
        .entries
        .iter()
        .filter_map(|entry| {
            entry
                .actual
                .map(|amount| (entry.category.clone(), amount))
        })
        .collect();
    (budget, actual)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetResponse {
    lines: Vec<BudgetLine>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/take-home",
            get(take_home_get_handler).post(take_home_post_handler),
        )
        .route("/api/salary-forecast", post(salary_forecast_handler))
        .route("/api/expense-forecast", post(expense_forecast_handler))
        .route("/api/investment", post(investment_handler))
        .route(
            "/api/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route("/api/debt-plan", post(debt_plan_handler))
        .route("/api/goal-progress", post(goal_progress_handler))
        .route("/api/budget", post(budget_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("fincast HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/take-home");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn take_home_get_handler(Query(payload): Query<TakeHomePayload>) -> Response {
    take_home_response(payload)
}

async fn take_home_post_handler(Json(payload): Json<TakeHomePayload>) -> Response {
    take_home_response(payload)
}

fn take_home_response(payload: TakeHomePayload) -> Response {
    let request = build_take_home_request(payload);
    let (monthly_take_home, breakdown) =
        match take_home(request.salary, request.deductions, &request.brackets) {
            Ok(result) => result,
            Err(err) => return engine_error_response(&err),
        };
    let marginal = match marginal_rate(&request.brackets, request.salary) {
        Ok(rate) => rate,
        Err(err) => return engine_error_response(&err),
    };

    json_response(
        StatusCode::OK,
        TakeHomeResponse {
            monthly_take_home,
            breakdown,
            marginal_rate: marginal,
        },
    )
}

async fn salary_forecast_handler(Json(payload): Json<SalaryForecastPayload>) -> Response {
    let salary = payload.salary.unwrap_or(0.0);
    let growth_rate = pct(payload.growth_rate.unwrap_or(3.0));
    let years = payload.years.unwrap_or(5);
    let raises = payload.raises.unwrap_or_default();
    let bonuses = payload.bonuses.unwrap_or_default();

    match forecast_salary(salary, growth_rate, &raises, &bonuses, years) {
        Ok(series) => json_response(StatusCode::OK, SalaryForecastResponse { series }),
        Err(err) => engine_error_response(&err),
    }
}

async fn expense_forecast_handler(Json(payload): Json<ExpenseForecastPayload>) -> Response {
    let categories = build_expense_categories(&payload);
    let years = payload.years.unwrap_or(5);

    match forecast_expenses(&categories, years) {
        Ok(series) => json_response(StatusCode::OK, ExpenseForecastResponse { series }),
        Err(err) => engine_error_response(&err),
    }
}

async fn investment_handler(Json(payload): Json<InvestmentPayload>) -> Response {
    let allocations = build_allocations(&payload);
    let initial_investment = payload.initial_investment.unwrap_or(0.0);
    let years = payload.years.unwrap_or(10);

    let rate = match blended_rate(&allocations) {
        Ok(rate) => rate,
        Err(err) => return engine_error_response(&err),
    };
    match project_growth(initial_investment, rate, years) {
        Ok(series) => json_response(
            StatusCode::OK,
            InvestmentResponse {
                blended_rate: rate,
                series,
            },
        ),
        Err(err) => engine_error_response(&err),
    }
}

async fn retirement_get_handler(Query(payload): Query<RetirementPayload>) -> Response {
    retirement_response(payload)
}

async fn retirement_post_handler(Json(payload): Json<RetirementPayload>) -> Response {
    retirement_response(payload)
}

fn retirement_response(payload: RetirementPayload) -> Response {
    let request = build_retirement_request(payload);

    let value = match future_value(
        request.current_savings,
        request.growth_rate,
        request.years_to_retirement,
        request.annual_contribution,
    ) {
        Ok(value) => value,
        Err(err) => return engine_error_response(&err),
    };
    let series = match project_with_contributions(
        request.current_savings,
        request.growth_rate,
        request.years_to_retirement,
        request.annual_contribution,
    ) {
        Ok(series) => series,
        Err(err) => return engine_error_response(&err),
    };
    let scenarios = match sweep(
        &SweepParams {
            initial_value: request.current_savings,
            extra_per_period: request.annual_contribution,
            periods: request.years_to_retirement,
        },
        &request.scenario_rates,
    ) {
        Ok(table) => table,
        Err(err) => return engine_error_response(&err),
    };

    json_response(
        StatusCode::OK,
        RetirementResponse {
            future_value: value,
            series,
            scenarios,
        },
    )
}

async fn debt_plan_handler(Json(payload): Json<DebtPlanPayload>) -> Response {
    let debts = build_debts(&payload);
    let max_rounds = payload.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS);

    let snapshot = match track_debts(&debts) {
        Ok(rows) => rows,
        Err(err) => return engine_error_response(&err),
    };
    let schedule = match debt_snowball(&debts, max_rounds) {
        Ok(rows) => rows,
        Err(err) => return engine_error_response(&err),
    };
    let total_rounds = schedule.last().map(|row| row.round).unwrap_or(0);

    json_response(
        StatusCode::OK,
        DebtPlanResponse {
            snapshot,
            schedule,
            total_rounds,
        },
    )
}

async fn goal_progress_handler(Json(payload): Json<GoalProgressPayload>) -> Response {
    let goals = build_goals(&payload);
    match track_goals(&goals) {
        Ok(goals) => json_response(StatusCode::OK, GoalProgressResponse { goals }),
        Err(err) => engine_error_response(&err),
    }
}

async fn budget_handler(Json(payload): Json<BudgetPayload>) -> Response {
    let (budget, actual) = split_budget_entries(&payload);
    match budget_vs_actual(&budget, &actual) {
        Ok(lines) => json_response(StatusCode::OK, BudgetResponse { lines }),
        Err(err) => engine_error_response(&err),
    }
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

fn engine_error_response(err: &EngineError) -> Response {
    let status = match err {
        EngineError::NonConvergence { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvalidInput(_) | EngineError::DivisionByZero(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        Cli {
            salary: 60_000.0,
            deductions: 5_000.0,
            salary_growth_rate: 3.0,
            forecast_years: 5,
            current_savings: 10_000.0,
            annual_contribution: 6_000.0,
            years_to_retirement: 30,
            growth_rate: 5.0,
            scenario_rates: vec![3.0, 5.0, 7.0, 10.0],
        }
    }

    #[test]
    fn build_plan_inputs_converts_percent_rates() {
        let inputs = build_plan_inputs(sample_cli()).expect("valid inputs");
        assert_approx(inputs.salary_growth_rate, 0.03);
        assert_approx(inputs.growth_rate, 0.05);
        assert_approx(inputs.scenario_rates[3], 0.10);
        assert_eq!(inputs.brackets.len(), 4);
    }

    #[test]
    fn build_plan_inputs_rejects_negative_salary() {
        let mut cli = sample_cli();
        cli.salary = -1.0;
        let err = build_plan_inputs(cli).expect_err("must reject negative salary");
        assert!(err.contains("--salary"));
    }

    #[test]
    fn build_plan_inputs_rejects_zero_forecast_years() {
        let mut cli = sample_cli();
        cli.forecast_years = 0;
        let err = build_plan_inputs(cli).expect_err("must reject zero years");
        assert!(err.contains("--forecast-years"));
    }

    #[test]
    fn build_plan_inputs_rejects_empty_scenario_rates() {
        let mut cli = sample_cli();
        cli.scenario_rates = Vec::new();
        let err = build_plan_inputs(cli).expect_err("must reject empty rates");
        assert!(err.contains("--scenario-rates"));
    }

    #[test]
    fn run_plan_reports_reference_take_home() {
        let inputs = build_plan_inputs(sample_cli()).expect("valid inputs");
        let plan = run_plan(&inputs).expect("plan computes");

        assert_approx(plan.breakdown.taxes, 4_500.0);
        assert_approx(plan.monthly_take_home, 50_500.0 / 12.0);
        assert_approx(plan.marginal_rate, 0.3);
        assert_eq!(plan.salary_projection.len(), 5);
        assert_eq!(plan.scenarios.columns.len(), 4);
        assert_eq!(plan.scenarios.periods.len(), 30);
    }

    #[test]
    fn take_home_request_defaults_to_reference_brackets() {
        let request = build_take_home_request(TakeHomePayload::default());
        assert_approx(request.salary, 0.0);
        assert_approx(request.deductions, 0.0);
        assert_eq!(request.brackets.len(), 4);
        assert_eq!(request.brackets[3].threshold, f64::INFINITY);
    }

    #[test]
    fn take_home_payload_parses_camel_case_with_unbounded_bracket() {
        let json = r#"{
          "salary": 60000,
          "deductions": 5000,
          "brackets": [
            {"threshold": 10000, "rate": 0.1},
            {"threshold": null, "rate": 0.4}
          ]
        }"#;
        let payload: TakeHomePayload = serde_json::from_str(json).expect("json should parse");
        let request = build_take_home_request(payload);

        assert_approx(request.salary, 60_000.0);
        assert_eq!(request.brackets.len(), 2);
        assert_eq!(request.brackets[1].threshold, f64::INFINITY);
        assert_approx(request.brackets[1].rate, 0.4);
    }

    #[test]
    fn retirement_request_applies_documented_defaults() {
        let request = build_retirement_request(RetirementPayload::default());
        assert_approx(request.growth_rate, 0.05);
        assert_eq!(request.years_to_retirement, 30);
        assert_eq!(request.scenario_rates.len(), 4);
        assert_approx(request.scenario_rates[0], 0.03);
    }

    #[test]
    fn debt_payload_parses_camel_case_fields() {
        let json = r#"{
          "debts": [
            {"name": "card", "balance": 1200, "interestRate": 12, "monthlyPayment": 100}
          ],
          "maxRounds": 120
        }"#;
        let payload: DebtPlanPayload = serde_json::from_str(json).expect("json should parse");
        let debts = build_debts(&payload);

        assert_eq!(debts.len(), 1);
        assert_approx(debts[0].balance, 1_200.0);
        assert_approx(debts[0].interest_rate, 12.0);
        assert_approx(debts[0].monthly_payment, 100.0);
        assert_eq!(payload.max_rounds, Some(120));
    }

    #[test]
    fn expense_categories_default_to_reference_set() {
        let categories = build_expense_categories(&ExpenseForecastPayload::default());
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[0].name, "Housing");
        assert_approx(categories[0].amount, 1_000.0);
        assert_approx(categories[0].inflation_rate, 0.03);
    }

    #[test]
    fn budget_entries_split_into_budget_and_present_actuals() {
        let json = r#"{
          "entries": [
            {"category": "Savings", "budget": 500, "actual": 450},
            {"category": "Utilities", "budget": 100}
          ]
        }"#;
        let payload: BudgetPayload = serde_json::from_str(json).expect("json should parse");
        let (budget, actual) = split_budget_entries(&payload);

        assert_eq!(budget.len(), 2);
        assert_eq!(actual.len(), 1);
        let lines = budget_vs_actual(&budget, &actual).expect("valid amounts");
        assert_approx(lines[1].actual, 0.0);
        assert_approx(lines[1].difference, -100.0);
    }

    #[test]
    fn allocations_default_to_reference_portfolio() {
        let allocations = build_allocations(&InvestmentPayload::default());
        let rate = blended_rate(&allocations).expect("valid allocations");
        assert_approx(rate, 0.054);
    }
}
