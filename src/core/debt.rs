use super::engine::require_non_negative;
use super::error::EngineError;
use super::types::{Debt, DebtPaymentRow, SnowballRow};

/// One period of amortization for a single debt. Returns
/// `(monthly_interest, principal_payment, new_balance)`.
///
/// The principal share may be negative when the payment does not cover the
/// accrued interest; the balance then grows. That shortfall is surfaced in
/// the returned split, never clamped away.
pub fn amortize_period(debt: &Debt) -> (f64, f64, f64) {
    let monthly_interest = debt.balance * (debt.interest_rate / 100.0) / 12.0;
    let principal_payment = debt.monthly_payment - monthly_interest;
    let new_balance = (debt.balance - principal_payment).max(0.0);
    (monthly_interest, principal_payment, new_balance)
}

fn validate_debts(debts: &[Debt]) -> Result<(), EngineError> {
    for debt in debts {
        require_non_negative(&format!("balance for {}", debt.name), debt.balance)?;
        require_non_negative(
            &format!("interest rate for {}", debt.name),
            debt.interest_rate,
        )?;
        require_non_negative(
            &format!("monthly payment for {}", debt.name),
            debt.monthly_payment,
        )?;
    }
    Ok(())
}

/// Single-period payment snapshot for each debt, in input order.
pub fn track_debts(debts: &[Debt]) -> Result<Vec<DebtPaymentRow>, EngineError> {
    validate_debts(debts)?;

    Ok(debts
        .iter()
        .map(|debt| {
            let (monthly_interest, principal_payment, new_balance) = amortize_period(debt);
            DebtPaymentRow {
                name: debt.name.clone(),
                balance: debt.balance,
                monthly_payment: debt.monthly_payment,
                monthly_interest,
                principal_payment,
                new_balance,
            }
        })
        .collect())
}

/// Full snowball payment schedule: debts are paid smallest balance first, and
/// the moment one retires its entire monthly payment rolls onto the first
/// remaining debt in the same ordering.
///
/// The input is copied before simulation; caller state is never touched. A
/// debt whose payment stays below its interest accrual would never retire, so
/// the simulation is capped at `max_rounds` and reports `NonConvergence` past
/// the cap instead of looping.
pub fn debt_snowball(debts: &[Debt], max_rounds: u32) -> Result<Vec<SnowballRow>, EngineError> {
    validate_debts(debts)?;
    if max_rounds == 0 {
        return Err(EngineError::InvalidInput(
            "max rounds must be >= 1".to_string(),
        ));
    }

    let mut working = debts.to_vec();
    // Stable sort: equal balances keep their input order.
    working.sort_by(|a, b| a.balance.total_cmp(&b.balance));

    let mut schedule = Vec::new();
    let mut round = 0u32;
    while working.iter().any(|debt| debt.balance > 0.0) {
        round += 1;
        if round > max_rounds {
            return Err(EngineError::NonConvergence { max_rounds });
        }
        working = run_round(working, round, &mut schedule);
    }

    Ok(schedule)
}

/// Advances every open debt by one period, producing the next debt state.
/// Payment reallocation happens inside the round, so a debt later in the
/// ordering already amortizes with the payment freed by an earlier payoff.
fn run_round(debts: Vec<Debt>, round: u32, schedule: &mut Vec<SnowballRow>) -> Vec<Debt> {
    let mut next = debts;
    for index in 0..next.len() {
        if next[index].balance <= 0.0 {
            continue;
        }

        let (monthly_interest, principal_payment, new_balance) = amortize_period(&next[index]);
        schedule.push(SnowballRow {
            round,
            name: next[index].name.clone(),
            balance_before: next[index].balance,
            monthly_payment: next[index].monthly_payment,
            monthly_interest,
            principal_payment,
            balance_after: new_balance,
        });
        next[index].balance = new_balance;

        if new_balance == 0.0 {
            let freed_payment = next[index].monthly_payment;
            if let Some(target) = next.iter_mut().find(|debt| debt.balance > 0.0) {
                target.monthly_payment += freed_payment;
            }
        }
    }
    next
}
