/// Numerically stable logistic function.
///
/// Split into positive/negative forms so neither branch ever evaluates
/// `exp` of a large positive argument; extreme logits saturate to 0 or 1
/// instead of overflowing. NaN input stays NaN and is dropped downstream.
pub(crate) fn sigmoid(x: f32) -> f32 {
    if x >= 0. {
        1. / (1. + (-x).exp())
    } else {
        let e = x.exp();
        e / (1. + e)
    }
}

// exp(50) ~ 5.2e21, still finite in f32 after the anchor multiply.
const EXP_CLAMP: f32 = 50.;

/// `exp` with the input clamped so the result stays finite.
///
/// NaN is passed through so the decoder can discard the whole candidate.
pub(crate) fn safe_exp(x: f32) -> f32 {
    if x.is_nan() {
        return f32::NAN;
    }
    x.min(EXP_CLAMP).exp()
}
