//! Error-tolerant comparison primitives for the threshold folder.
//!
//! `mc-core`'s comparator (`spec.md` §4.4) never compares a computed
//! probability or reward directly against a formula's bound: the
//! numerical/statistical kernel that produced the value carries an
//! error bound, so the accepted region is widened by that error before
//! comparison. These functions implement exactly that widening, and
//! the "exact endpoint" exception for probabilities that are precisely
//! `0.0` or `1.0`.

/// Widens a `>` or `>=` bound downward by `eps`, matching MRMC's
/// `sortOutSingleValue`/error-bound recomputation: a value is accepted
/// if it would have cleared the bound under the true (unknown, but
/// `eps`-close) probability.
pub fn shift_lower(bound: f64, eps: f64) -> f64 {
    bound - eps
}

/// Widens a `<` or `<=` bound upward by `eps`.
pub fn shift_upper(bound: f64, eps: f64) -> f64 {
    bound + eps
}

/// Widens an interval `[left, right]` by `eps` on both ends.
///
/// Returns `(left - eps, right + eps)`.
pub fn widen_interval(left: f64, right: f64, eps: f64) -> (f64, f64) {
    (left - eps, right + eps)
}

/// Whether `v` is one of the two probability values MRMC treats as
/// *exactly* computed and therefore exempt from error-tolerant
/// widening (`spec.md` §3 invariant 7, §4.4 single-error mode).
///
/// Only meaningful for probability vectors; reward vectors have no
/// such exemption and callers must not apply it to them.
pub fn is_exact_probability_endpoint(v: f64) -> bool {
    v == 0.0 || v == 1.0
}

/// Clamps a probability into `[0, 1]`, absorbing the tiny overshoot
/// that numerical kernels occasionally produce at the boundary.
pub fn clamp_probability(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
