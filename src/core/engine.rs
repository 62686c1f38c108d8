use std::collections::BTreeMap;

use super::error::EngineError;
use super::types::{
    BudgetLine, CategorySeries, ExpenseCategory, Goal, GoalProgress, PortfolioAllocation,
    ProjectionPoint, ScenarioColumn, ScenarioTable, SweepParams, TakeHomeBreakdown, TaxBracket,
};

/// Upper bound on projection horizons; keeps a malformed request from
/// allocating unbounded series.
pub const MAX_PERIODS: u32 = 10_000;

pub(crate) fn require_finite(name: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!("{name} must be finite")))
    }
}

pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!("{name} must be >= 0")))
    }
}

pub(crate) fn require_rate(name: &str, rate: f64) -> Result<(), EngineError> {
    if rate.is_finite() && rate > -1.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "{name} must be a finite rate > -100%"
        )))
    }
}

fn require_periods(periods: u32) -> Result<(), EngineError> {
    if periods == 0 {
        return Err(EngineError::InvalidInput("periods must be >= 1".to_string()));
    }
    if periods > MAX_PERIODS {
        return Err(EngineError::InvalidInput(format!(
            "periods must be <= {MAX_PERIODS}"
        )));
    }
    Ok(())
}

fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), EngineError> {
    let Some(last) = brackets.last() else {
        return Err(EngineError::InvalidInput(
            "tax brackets must not be empty".to_string(),
        ));
    };

    if last.threshold != f64::INFINITY {
        return Err(EngineError::InvalidInput(
            "the top tax bracket must be unbounded (threshold = infinity)".to_string(),
        ));
    }

    let mut previous: Option<f64> = None;
    for bracket in brackets {
        if bracket.threshold.is_nan() || bracket.threshold < 0.0 {
            return Err(EngineError::InvalidInput(
                "tax bracket thresholds must be >= 0".to_string(),
            ));
        }
        if !bracket.rate.is_finite() || !(0.0..=1.0).contains(&bracket.rate) {
            return Err(EngineError::InvalidInput(
                "tax bracket rates must be between 0 and 1".to_string(),
            ));
        }
        if let Some(prev) = previous {
            if bracket.threshold <= prev {
                return Err(EngineError::InvalidInput(
                    "tax brackets must be sorted ascending by threshold".to_string(),
                ));
            }
        }
        previous = Some(bracket.threshold);
    }

    Ok(())
}

/// Monthly take-home pay plus an auditable annual breakdown.
///
/// Brackets are walked in ascending threshold order: as soon as the taxable
/// base exceeds a threshold, the excess is taxed at that bracket's rate and
/// the base is clamped down to the threshold. `deductions > salary` yields a
/// negative taxable base, which is computed as-is (the walk then accrues no
/// tax); it is an ordinary real-value computation, not an error.
pub fn take_home(
    salary: f64,
    deductions: f64,
    brackets: &[TaxBracket],
) -> Result<(f64, TakeHomeBreakdown), EngineError> {
    require_non_negative("salary", salary)?;
    require_non_negative("deductions", deductions)?;
    validate_brackets(brackets)?;

    let mut taxable_income = salary - deductions;
    let mut taxes = 0.0;
    for bracket in brackets {
        if taxable_income > bracket.threshold {
            taxes += (taxable_income - bracket.threshold) * bracket.rate;
            taxable_income = bracket.threshold;
        } else {
            break;
        }
    }

    let annual_take_home = salary - taxes - deductions;
    let monthly_take_home = annual_take_home / 12.0;

    Ok((
        monthly_take_home,
        TakeHomeBreakdown {
            gross_salary: salary,
            deductions,
            taxes,
            net_salary: annual_take_home,
        },
    ))
}

/// Rate of the first bracket whose threshold is >= `income`, falling back to
/// the top bracket's rate. A display lookup only; tax amounts always come
/// from the cumulative walk in [`take_home`].
pub fn marginal_rate(brackets: &[TaxBracket], income: f64) -> Result<f64, EngineError> {
    validate_brackets(brackets)?;
    require_finite("income", income)?;

    let rate = brackets
        .iter()
        .find(|bracket| bracket.threshold >= income)
        .map(|bracket| bracket.rate)
        .unwrap_or_else(|| brackets[brackets.len() - 1].rate);
    Ok(rate)
}

/// Pure compounding: `value[i] = initial * (1 + rate)^i` for `i = 1..=periods`.
/// Each point is closed-form, so no state is threaded between periods.
pub fn project_growth(
    initial_value: f64,
    rate: f64,
    periods: u32,
) -> Result<Vec<ProjectionPoint>, EngineError> {
    require_non_negative("initial value", initial_value)?;
    require_rate("growth rate", rate)?;
    require_periods(periods)?;

    Ok((1..=periods)
        .map(|period| ProjectionPoint {
            period,
            value: initial_value * (1.0 + rate).powi(period as i32),
        })
        .collect())
}

/// Contribution-accumulating recurrence:
/// `value[i] = (value[i-1] + extra_per_period) * (1 + rate)`, `value[0] = initial`.
pub fn project_with_contributions(
    initial_value: f64,
    rate: f64,
    periods: u32,
    extra_per_period: f64,
) -> Result<Vec<ProjectionPoint>, EngineError> {
    require_non_negative("initial value", initial_value)?;
    require_non_negative("per-period contribution", extra_per_period)?;
    require_rate("growth rate", rate)?;
    require_periods(periods)?;

    let mut value = initial_value;
    let mut points = Vec::with_capacity(periods as usize);
    for period in 1..=periods {
        value = (value + extra_per_period) * (1.0 + rate);
        points.push(ProjectionPoint { period, value });
    }
    Ok(points)
}

/// Closed-form equivalent of [`project_with_contributions`] at the final
/// period. The geometric-series term divides by `rate`, so a zero rate takes
/// the linear fallback instead of dividing by zero.
pub fn future_value(
    initial_value: f64,
    rate: f64,
    periods: u32,
    extra_per_period: f64,
) -> Result<f64, EngineError> {
    require_non_negative("initial value", initial_value)?;
    require_non_negative("per-period contribution", extra_per_period)?;
    require_rate("growth rate", rate)?;
    require_periods(periods)?;

    if rate == 0.0 {
        return Ok(initial_value + extra_per_period * periods as f64);
    }

    let growth = (1.0 + rate).powi(periods as i32);
    Ok(initial_value * growth + extra_per_period * ((growth - 1.0) / rate))
}

/// Salary projection with scheduled raises and one-off bonuses, keyed by
/// 1-based period. Raises fold into the base salary and carry forward;
/// bonuses affect only their own period.
pub fn forecast_salary(
    salary: f64,
    growth_rate: f64,
    raises: &BTreeMap<u32, f64>,
    bonuses: &BTreeMap<u32, f64>,
    periods: u32,
) -> Result<Vec<ProjectionPoint>, EngineError> {
    require_non_negative("salary", salary)?;
    require_rate("salary growth rate", growth_rate)?;
    require_periods(periods)?;
    for (period, amount) in raises {
        require_finite(&format!("raise for period {period}"), *amount)?;
    }
    for (period, amount) in bonuses {
        require_finite(&format!("bonus for period {period}"), *amount)?;
    }

    let mut base = salary;
    let mut points = Vec::with_capacity(periods as usize);
    for period in 1..=periods {
        if let Some(raise) = raises.get(&period) {
            base += raise;
        }
        base *= 1.0 + growth_rate;
        let bonus = bonuses.get(&period).copied().unwrap_or(0.0);
        points.push(ProjectionPoint {
            period,
            value: base + bonus,
        });
    }
    Ok(points)
}

/// One independent compounding series per category, all indexed by the same
/// period sequence.
pub fn forecast_expenses(
    categories: &[ExpenseCategory],
    periods: u32,
) -> Result<Vec<CategorySeries>, EngineError> {
    require_periods(periods)?;

    let mut series = Vec::with_capacity(categories.len());
    for category in categories {
        require_non_negative(&format!("amount for {}", category.name), category.amount)?;
        require_rate(
            &format!("inflation rate for {}", category.name),
            category.inflation_rate,
        )?;
        series.push(CategorySeries {
            category: category.name.clone(),
            points: project_growth(category.amount, category.inflation_rate, periods)?,
        });
    }
    Ok(series)
}

pub fn inflation_adjust(amount: f64, inflation_rate: f64, periods: u32) -> f64 {
    amount * (1.0 + inflation_rate).powi(periods as i32)
}

/// Weight-normalized expected return of a portfolio allocation. Weights need
/// not sum to 1; they are scaled by their total.
pub fn blended_rate(allocations: &[PortfolioAllocation]) -> Result<f64, EngineError> {
    if allocations.is_empty() {
        return Err(EngineError::InvalidInput(
            "portfolio allocations must not be empty".to_string(),
        ));
    }

    let mut total_weight = 0.0;
    let mut weighted_return = 0.0;
    for allocation in allocations {
        require_non_negative(&format!("weight for {}", allocation.name), allocation.weight)?;
        require_rate(
            &format!("expected return for {}", allocation.name),
            allocation.expected_return,
        )?;
        total_weight += allocation.weight;
        weighted_return += allocation.weight * allocation.expected_return;
    }

    if total_weight <= 0.0 {
        return Err(EngineError::DivisionByZero(
            "portfolio weights sum to zero".to_string(),
        ));
    }
    Ok(weighted_return / total_weight)
}

/// Runs the contribution-accumulating recurrence once per rate variant and
/// assembles a period-aligned comparison table. All columns share the same
/// period range by construction, so the table has no holes.
pub fn sweep(params: &SweepParams, rate_variants: &[f64]) -> Result<ScenarioTable, EngineError> {
    if rate_variants.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one scenario rate is required".to_string(),
        ));
    }

    let mut columns = Vec::with_capacity(rate_variants.len());
    for &rate in rate_variants {
        let points = project_with_contributions(
            params.initial_value,
            rate,
            params.periods,
            params.extra_per_period,
        )?;
        columns.push(ScenarioColumn {
            rate,
            label: format!("{:.2}% growth", rate * 100.0),
            values: points.into_iter().map(|point| point.value).collect(),
        });
    }

    Ok(ScenarioTable {
        periods: (1..=params.periods).collect(),
        columns,
    })
}

/// Progress toward a single goal. An exceeded goal reports a negative
/// remaining amount as-is; a zero target is a division-by-zero failure
/// rather than a non-finite percentage.
pub fn goal_progress(goal: &Goal) -> Result<GoalProgress, EngineError> {
    require_non_negative(
        &format!("target amount for {}", goal.name),
        goal.target_amount,
    )?;
    require_non_negative(
        &format!("current amount for {}", goal.name),
        goal.current_amount,
    )?;
    if goal.target_amount == 0.0 {
        return Err(EngineError::DivisionByZero(format!(
            "target amount for {} is zero",
            goal.name
        )));
    }

    Ok(GoalProgress {
        name: goal.name.clone(),
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        remaining_amount: goal.target_amount - goal.current_amount,
        progress_percent: goal.current_amount / goal.target_amount * 100.0,
    })
}

/// Fails fast: one bad goal yields no rows.
pub fn track_goals(goals: &[Goal]) -> Result<Vec<GoalProgress>, EngineError> {
    goals.iter().map(goal_progress).collect()
}

/// Budget-versus-actual comparison in budget order. Categories without an
/// actual figure count as zero spent; `difference = actual - budget`.
pub fn budget_vs_actual(
    budget: &[(String, f64)],
    actual: &[(String, f64)],
) -> Result<Vec<BudgetLine>, EngineError> {
    for (category, amount) in budget.iter().chain(actual) {
        require_non_negative(&format!("amount for {category}"), *amount)?;
    }

    Ok(budget
        .iter()
        .map(|(category, budgeted)| {
            let spent = actual
                .iter()
                .find(|(name, _)| name == category)
                .map(|(_, amount)| *amount)
                .unwrap_or(0.0);
            BudgetLine {
                category: category.clone(),
                budget: *budgeted,
                actual: spent,
                difference: spent - budgeted,
            }
        })
        .collect())
}
