use serde::Serialize;

use super::engine::{PAYOFF_CEILING_MONTHS, STANDARD_TERM_MONTHS, run_schedule, standard_payment};
use super::types::LoanInputs;

#[derive(Debug, Clone, Copy)]
pub struct ExtraPaymentSolveConfig {
    pub target_months: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub months_to_payoff: u32,
}

#[derive(Debug, Clone)]
pub struct ExtraPaymentSolveResult {
    pub target_months: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    pub solved_value: Option<f64>,
    pub achieved_months: Option<u32>,
    pub iterations: Vec<SolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

pub fn solve_extra_payment(
    inputs: &LoanInputs,
    config: ExtraPaymentSolveConfig,
) -> Result<ExtraPaymentSolveResult, String> {
    validate_config(inputs, config)?;

    let periodic_rate = inputs.annual_interest_rate / 12.0;
    let base_payment = standard_payment(inputs.principal, periodic_rate, STANDARD_TERM_MONTHS);
    // Months to payoff is monotone non-increasing in the extra payment, so
    // bisection over the extra amount is exact.
    let months_at = |extra: f64| {
        run_schedule(inputs.principal, base_payment, periodic_rate, extra).months_to_payoff
    };

    let mut iterations = Vec::with_capacity(config.max_iterations as usize);
    let low_months = months_at(config.search_min);
    let high_months = months_at(config.search_max);

    let mut solved_value = None;
    let mut converged = false;
    let feasible;
    let message;

    if low_months <= config.target_months {
        solved_value = Some(config.search_min);
        converged = true;
        feasible = true;
        message = "Already meets the target payoff at the lower extra-payment bound.".to_string();
    } else if high_months > config.target_months {
        feasible = false;
        message = "No extra payment within the search bounds reaches the target payoff.".to_string();
    } else {
        let mut lo = config.search_min;
        let mut hi = config.search_max;
        let mut it = 0;
        while it < config.max_iterations {
            it += 1;
            let mid = (lo + hi) * 0.5;
            let months = months_at(mid);
            iterations.push(SolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_value: mid,
                months_to_payoff: months,
            });

            if months <= config.target_months {
                hi = mid;
            } else {
                lo = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                solved_value = Some(hi);
                break;
            }
        }
        if solved_value.is_none() {
            solved_value = Some(hi);
        }
        feasible = true;
        message = if converged {
            "Solved required extra payment.".to_string()
        } else {
            "Reached max iterations before tolerance was met; returning best estimate.".to_string()
        };
    }

    let achieved_months = solved_value.map(months_at);

    Ok(ExtraPaymentSolveResult {
        target_months: config.target_months,
        search_min: config.search_min,
        search_max: config.search_max,
        tolerance: config.tolerance,
        max_iterations: config.max_iterations,
        solved_value,
        achieved_months,
        iterations,
        converged,
        feasible,
        message,
    })
}

fn validate_config(inputs: &LoanInputs, config: ExtraPaymentSolveConfig) -> Result<(), String> {
    if inputs.principal <= 0.0 {
        return Err("principal must be > 0".to_string());
    }
    if inputs.annual_interest_rate <= 0.0 {
        return Err("annual_interest_rate must be > 0".to_string());
    }
    if config.target_months == 0 {
        return Err("target_months must be > 0".to_string());
    }
    if config.target_months >= PAYOFF_CEILING_MONTHS {
        return Err("target_months must be below the payoff ceiling".to_string());
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return Err("search bounds must be finite".to_string());
    }
    if config.search_min < 0.0 {
        return Err("search_min must be >= 0".to_string());
    }
    if config.search_max <= config.search_min {
        return Err("search_max must be greater than search_min".to_string());
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err("tolerance must be > 0".to_string());
    }
    if config.max_iterations == 0 {
        return Err("max_iterations must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inputs() -> LoanInputs {
        LoanInputs {
            principal: 30_000.0,
            annual_interest_rate: 0.05,
            extra_payment: 0.0,
            lump_sum: 0.0,
        }
    }

    fn sample_config() -> ExtraPaymentSolveConfig {
        ExtraPaymentSolveConfig {
            target_months: 60,
            search_min: 0.0,
            search_max: 5_000.0,
            tolerance: 1.0,
            max_iterations: 32,
        }
    }

    #[test]
    fn solver_finds_extra_payment_for_five_year_target() {
        let result = solve_extra_payment(&sample_inputs(), sample_config()).expect("must solve");

        assert!(result.feasible);
        assert!(result.converged);
        let solved = result.solved_value.expect("value expected");
        assert!(solved > 0.0);
        let achieved = result.achieved_months.expect("months expected");
        assert!(achieved <= 60);
        assert!(!result.iterations.is_empty());

        // Just below the solved amount the target must be missed, otherwise
        // the bisection stopped on the wrong side.
        let rate = 0.05 / 12.0;
        let base_payment = standard_payment(30_000.0, rate, STANDARD_TERM_MONTHS);
        let short = run_schedule(30_000.0, base_payment, rate, solved - 2.0 * result.tolerance);
        assert!(short.months_to_payoff > 60);
    }

    #[test]
    fn solver_reports_lower_bound_when_already_on_target() {
        let mut config = sample_config();
        config.target_months = 120;

        let result = solve_extra_payment(&sample_inputs(), config).expect("must solve");
        assert!(result.feasible);
        assert!(result.converged);
        assert_eq!(result.solved_value, Some(0.0));
        assert_eq!(result.achieved_months, Some(120));
        assert!(result.iterations.is_empty());
    }

    #[test]
    fn solver_reports_infeasible_when_bounds_too_low() {
        let mut config = sample_config();
        config.target_months = 6;
        config.search_max = 100.0;

        let result = solve_extra_payment(&sample_inputs(), config).expect("must return result");
        assert!(!result.feasible);
        assert!(result.solved_value.is_none());
        assert!(result.achieved_months.is_none());
    }

    #[test]
    fn solver_rejects_gated_and_malformed_configs() {
        let inputs = sample_inputs();

        let mut zero_rate = inputs;
        zero_rate.annual_interest_rate = 0.0;
        assert!(solve_extra_payment(&zero_rate, sample_config()).is_err());

        let mut zero_principal = inputs;
        zero_principal.principal = 0.0;
        assert!(solve_extra_payment(&zero_principal, sample_config()).is_err());

        let mut bad_bounds = sample_config();
        bad_bounds.search_max = bad_bounds.search_min;
        assert!(solve_extra_payment(&inputs, bad_bounds).is_err());

        let mut bad_target = sample_config();
        bad_target.target_months = PAYOFF_CEILING_MONTHS;
        assert!(solve_extra_payment(&inputs, bad_target).is_err());

        let mut bad_tolerance = sample_config();
        bad_tolerance.tolerance = 0.0;
        assert!(solve_extra_payment(&inputs, bad_tolerance).is_err());
    }
}
