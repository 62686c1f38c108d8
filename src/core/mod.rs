mod debt;
mod engine;
mod error;
mod types;

pub use debt::{amortize_period, debt_snowball, track_debts};
pub use engine::{
    MAX_PERIODS, blended_rate, budget_vs_actual, forecast_expenses, forecast_salary, future_value,
    goal_progress, inflation_adjust, marginal_rate, project_growth, project_with_contributions,
    sweep, take_home, track_goals,
};
pub use error::EngineError;
pub use types::{
    BudgetLine, CategorySeries, Debt, DebtPaymentRow, ExpenseCategory, Goal, GoalProgress,
    PortfolioAllocation, ProjectionPoint, ScenarioColumn, ScenarioTable, SnowballRow, SweepParams,
    TakeHomeBreakdown, TaxBracket,
};
