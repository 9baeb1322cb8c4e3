use crate::common::Detection;

/// Drops candidates below the probability threshold.
///
/// Keeps `probability >= threshold`; a candidate sitting exactly on the
/// boundary survives. Order-preserving and idempotent.
pub fn filter_by_prob(mut candidates: Vec<Detection>, threshold: f32) -> Vec<Detection> {
    candidates.retain(|det| det.probability >= threshold);
    candidates
}
