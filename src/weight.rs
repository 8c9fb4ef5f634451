// ========================================================================================
//
//                              THE BENEFIT WEIGHT FUNCTION
//
// ========================================================================================
//
// This module is the sole authority on converting a tract's socioeconomic features
// plus a counterfactual attainment prediction into a scalar benefit value, in
// currency units. It is a pure function of its inputs: no I/O, no logging, no
// fallible paths. Defaulting for missing or unparseable predictions is the
// caller's responsibility (see `prepare`), which keeps this function total and
// trivially testable.

use crate::types::TractFeatures;
use clap::ValueEnum;

/// The reference annual income associated with crossing the attainment threshold.
///
/// This is a fixed constant from the upstream economic model: the median salary
/// of the population that has already attained the credential. A tract's benefit
/// is the expected income shift of moving `diff` of its earners from their
/// current salary figure to this reference.
pub const REFERENCE_SALARY: f64 = 50_516.0;

/// The two supported benefit accounting policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeightPolicy {
    /// Benefit per tract, independent of how many people live in it.
    PerTract,
    /// The per-tract expression scaled by the tract's total population.
    PopulationScaled,
}

/// Computes the credited benefit of intervening in one tract.
///
/// `diff` is the predicted gain in attainment fraction, floored at zero: a
/// predicted decrease earns no credit rather than a negative one. The benefit is
/// the expected post-intervention income minus the pre-existing salary figure,
/// so a tract whose prediction equals its baseline nets exactly zero.
///
/// The raw expression goes negative for a tract whose salary figure already
/// exceeds [`REFERENCE_SALARY`]. That is left visible here; the network floors
/// values at insertion, so negative credit never enters the optimization.
pub fn compute_weight(policy: WeightPolicy, features: &TractFeatures, predicted_pct: f64) -> f64 {
    let diff = (predicted_pct - features.baseline_pct).max(0.0);
    let benefit = features.salary_figure * (1.0 - diff) + REFERENCE_SALARY * diff
        - features.salary_figure;
    match policy {
        WeightPolicy::PerTract => benefit,
        WeightPolicy::PopulationScaled => benefit * features.population,
    }
}
