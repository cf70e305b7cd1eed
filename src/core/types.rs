use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct LoanInputs {
    pub principal: f64,
    pub annual_interest_rate: f64,
    pub extra_payment: f64,
    pub lump_sum: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleResult {
    pub months_to_payoff: u32,
    pub total_interest_paid: f64,
    pub balance_trajectory: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRow {
    pub label: String,
    pub monthly_payment: f64,
    pub months_to_payoff: u32,
    pub years_to_payoff: f64,
    pub total_interest_paid: f64,
    pub interest_saved_vs_baseline: f64,
}

#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub periodic_rate: f64,
    pub rows: Vec<StrategyRow>,
    pub trajectories: Vec<Vec<f64>>,
}
