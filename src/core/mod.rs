mod engine;
mod solver;
mod types;

pub use engine::{
    EXTENDED_TERM_MONTHS, PAYOFF_CEILING_MONTHS, STANDARD_TERM_MONTHS, compare_strategies,
    run_schedule, standard_payment,
};
pub use solver::{
    ExtraPaymentSolveConfig, ExtraPaymentSolveResult, SolveIteration, solve_extra_payment,
};
pub use types::{ComparisonResult, LoanInputs, ScheduleResult, StrategyRow};
