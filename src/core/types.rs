use serde::Serialize;

/// One progressive tax band: the income threshold the band starts above and
/// the rate applied to income over it. A bracket list must be sorted
/// ascending by threshold and end with an unbounded top band
/// (`threshold = f64::INFINITY`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeHomeBreakdown {
    pub gross_salary: f64,
    pub deductions: f64,
    pub taxes: f64,
    pub net_salary: f64,
}

/// One entry of a time-indexed projection. Periods are 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub period: u32,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseCategory {
    pub name: String,
    pub amount: f64,
    pub inflation_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    pub category: String,
    pub points: Vec<ProjectionPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioAllocation {
    pub name: String,
    pub weight: f64,
    pub expected_return: f64,
}

/// Base parameters shared by every variant of a scenario sweep; only the
/// growth rate varies per column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepParams {
    pub initial_value: f64,
    pub extra_per_period: f64,
    pub periods: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioColumn {
    /// Raw rate as a fraction, kept alongside the formatted label so columns
    /// stay distinguishable if two rates collide after formatting.
    pub rate: f64,
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTable {
    pub periods: Vec<u32>,
    pub columns: Vec<ScenarioColumn>,
}

/// A single debt. `interest_rate` is an annual percentage (12 means 12% APR).
#[derive(Clone, Debug, PartialEq)]
pub struct Debt {
    pub name: String,
    pub balance: f64,
    pub interest_rate: f64,
    pub monthly_payment: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPaymentRow {
    pub name: String,
    pub balance: f64,
    pub monthly_payment: f64,
    pub monthly_interest: f64,
    pub principal_payment: f64,
    pub new_balance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowballRow {
    pub round: u32,
    pub name: String,
    pub balance_before: f64,
    pub monthly_payment: f64,
    pub monthly_interest: f64,
    pub principal_payment: f64,
    pub balance_after: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Goal {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub remaining_amount: f64,
    pub progress_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub category: String,
    pub budget: f64,
    pub actual: f64,
    pub difference: f64,
}
