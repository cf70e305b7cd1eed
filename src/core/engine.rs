use super::types::{ComparisonResult, LoanInputs, ScheduleResult, StrategyRow};

pub const PAYOFF_CEILING_MONTHS: u32 = 1000;
pub const STANDARD_TERM_MONTHS: u32 = 120;
pub const EXTENDED_TERM_MONTHS: u32 = 300;

// Balances below half a cent count as paid off; an exact-annuity schedule
// otherwise leaves an order-1e-10 f64 residual and gains a dust month.
const BALANCE_EPSILON: f64 = 0.005;

pub fn standard_payment(principal: f64, periodic_rate: f64, term_periods: u32) -> f64 {
    let growth = (1.0 + periodic_rate).powi(term_periods as i32);
    principal * (periodic_rate * growth) / (growth - 1.0)
}

pub fn run_schedule(
    balance: f64,
    periodic_payment: f64,
    periodic_rate: f64,
    extra_payment: f64,
) -> ScheduleResult {
    let mut balance = balance;
    let mut months = 0u32;
    let mut total_interest = 0.0;
    let mut trajectory = vec![balance];

    while balance > BALANCE_EPSILON && months < PAYOFF_CEILING_MONTHS {
        let interest = balance * periodic_rate;
        let mut principal_portion = periodic_payment + extra_payment - interest;
        if principal_portion > balance {
            // Final partial period; never pay the balance below zero.
            principal_portion = balance;
        }
        balance -= principal_portion;
        total_interest += interest;
        months += 1;
        trajectory.push(balance);
    }

    ScheduleResult {
        months_to_payoff: months,
        total_interest_paid: total_interest,
        balance_trajectory: trajectory,
    }
}

pub fn compare_strategies(inputs: &LoanInputs) -> ComparisonResult {
    let periodic_rate = inputs.annual_interest_rate / 12.0;

    let payment_standard = standard_payment(inputs.principal, periodic_rate, STANDARD_TERM_MONTHS);
    let payment_extended = standard_payment(inputs.principal, periodic_rate, EXTENDED_TERM_MONTHS);

    let standard = run_schedule(inputs.principal, payment_standard, periodic_rate, 0.0);
    let extended = run_schedule(inputs.principal, payment_extended, periodic_rate, 0.0);
    let aggressive = run_schedule(
        inputs.principal,
        payment_standard,
        periodic_rate,
        inputs.extra_payment,
    );

    // The reduced balance is deliberately not clamped at zero; a lump sum
    // larger than the loan yields the immediate zero-month schedule.
    let reduced_principal = inputs.principal - inputs.lump_sum;
    let payment_lump = standard_payment(reduced_principal, periodic_rate, STANDARD_TERM_MONTHS);
    let lump = run_schedule(reduced_principal, payment_lump, periodic_rate, 0.0);

    let baseline_interest = standard.total_interest_paid;
    let rows = vec![
        build_row(
            "Standard 10-Year".to_string(),
            payment_standard,
            &standard,
            baseline_interest,
        ),
        build_row(
            "Extended 25-Year".to_string(),
            payment_extended,
            &extended,
            baseline_interest,
        ),
        build_row(
            format!("Aggressive +${:.0}", inputs.extra_payment),
            payment_standard + inputs.extra_payment,
            &aggressive,
            baseline_interest,
        ),
        build_row(
            format!("Lump Sum ${:.0}", inputs.lump_sum),
            payment_lump,
            &lump,
            baseline_interest,
        ),
    ];

    ComparisonResult {
        periodic_rate,
        rows,
        trajectories: vec![
            standard.balance_trajectory,
            extended.balance_trajectory,
            aggressive.balance_trajectory,
            lump.balance_trajectory,
        ],
    }
}

fn build_row(
    label: String,
    monthly_payment: f64,
    schedule: &ScheduleResult,
    baseline_interest: f64,
) -> StrategyRow {
    StrategyRow {
        label,
        monthly_payment,
        months_to_payoff: schedule.months_to_payoff,
        years_to_payoff: schedule.months_to_payoff as f64 / 12.0,
        total_interest_paid: schedule.total_interest_paid,
        interest_saved_vs_baseline: baseline_interest - schedule.total_interest_paid,
    }
}
