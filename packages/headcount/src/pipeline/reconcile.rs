//! Reconciliation: pick one best estimate from a company's observations.
//!
//! The steps run in a fixed order:
//!
//! 1. Stable-sort observations by count, ascending.
//! 2. Take the element at index `len / 2` as the reference value.
//! 3. Keep observations within 20% of the reference (the band). If the
//!    band would be empty, keep everything. A zero reference skips this.
//! 4. If any survivor is regional, keep only the regional survivors.
//! 5. Best is the first survivor, unless a regional LinkedIn observation
//!    survived, in which case the first of those wins.
//! 6. Alternates are every observation from step 1 except the best.

use tracing::{debug, warn};

use crate::error::Result;
use crate::types::observation::{CompanyQuery, Observation};
use crate::types::result::{Estimate, ReconciledResult};

/// Maximum relative distance from the reference count.
pub const BAND_TOLERANCE: f64 = 0.20;

/// Reconcile a company's observations into a single result.
///
/// Pure and deterministic: the same input always yields the same output.
pub fn reconcile(company: &CompanyQuery, observations: &[Observation]) -> ReconciledResult {
    if observations.is_empty() {
        debug!(company = %company, "No observations to reconcile");
        return ReconciledResult::not_found(company.clone());
    }

    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|o| o.count);

    let mut survivors: Vec<usize> = (0..sorted.len()).collect();

    let reference = sorted[sorted.len() / 2].count;
    if reference > 0 {
        let band: Vec<usize> = survivors
            .iter()
            .copied()
            .filter(|&i| within_band(sorted[i].count, reference))
            .collect();
        debug!(
            company = %company,
            reference,
            kept = band.len(),
            dropped = sorted.len() - band.len(),
            "Band filter applied"
        );
        if !band.is_empty() {
            survivors = band;
        }
    }

    let regional: Vec<usize> = survivors
        .iter()
        .copied()
        .filter(|&i| sorted[i].is_regional)
        .collect();
    if !regional.is_empty() {
        survivors = regional;
    }

    let best_index = survivors
        .iter()
        .copied()
        .find(|&i| sorted[i].is_authoritative())
        .unwrap_or(survivors[0]);
    let best = sorted[best_index].clone();

    let alternates = sorted
        .iter()
        .enumerate()
        .filter(|&(i, o)| i != best_index && *o != best)
        .map(|(_, o)| o.clone())
        .collect::<Vec<_>>();

    debug!(
        company = %company,
        count = best.count,
        source = %best.source,
        is_regional = best.is_regional,
        alternates = alternates.len(),
        "Best estimate chosen"
    );

    ReconciledResult {
        company: company.clone(),
        best: Estimate::Found(best),
        alternates,
    }
}

/// Reconcile the outcome of a research run, mapping failures to an error result.
pub fn reconcile_outcome(
    company: &CompanyQuery,
    outcome: Result<Vec<Observation>>,
) -> ReconciledResult {
    match outcome {
        Ok(observations) => reconcile(company, &observations),
        Err(e) => {
            warn!(company = %company, error = %e, "Research failed");
            ReconciledResult::error(company.clone(), e.to_string())
        }
    }
}

fn within_band(count: u64, reference: u64) -> bool {
    let reference = reference as f64;
    (count as f64 - reference).abs() / reference <= BAND_TOLERANCE
}
