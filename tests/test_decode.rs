extern crate yolo_decode;

use half::f16;
use yolo_decode::common::ModelGeometry;
use yolo_decode::data::{upconvert_f16, TensorView};
use yolo_decode::decode::{decode, decode_with_threshold, filter_by_prob};

/// One 2x2 layer, one anchor, two classes, 64x64 input. Channel stride 7.
fn tiny_geometry() -> ModelGeometry {
    ModelGeometry::new(2, 1, 64, 64)
        .with_layer(2, &[(20., 20.)])
        .with_thresholds(0.5, 0.5)
}

/// Flat index of `(gy, gx, anchor, channel)` in the single 2x2 layer.
fn idx(gy: usize, gx: usize, channel: usize) -> usize {
    (gy * 2 + gx) * 7 + channel
}

#[test]
fn zero_activations_decode_to_quarter_probability() {
    let geometry = tiny_geometry();
    let buffer = vec![0.; geometry.inference_out_size()];
    let view = TensorView::new(&geometry, &buffer).unwrap();

    let candidates = decode(&geometry, &view);
    // 4 cells x 1 anchor x 2 classes.
    assert_eq!(candidates.len(), 8);
    for det in &candidates {
        // sigmoid(0) = 0.5 objectness, 0.5 class score => 0.25 fused.
        assert!((det.probability - 0.25).abs() < 1e-6);
        assert!((det.bbox.w - 20.).abs() < 1e-4);
        assert!((det.bbox.h - 20.).abs() < 1e-4);
    }
    // Cell centers land at (gx + 0.5) * 32.
    assert!((candidates[0].bbox.x - 16.).abs() < 1e-4);
    assert!((candidates[0].bbox.y - 16.).abs() < 1e-4);
}

#[test]
fn zero_activations_fail_a_half_threshold() {
    // Pins the gating convention: the filter sees the fused
    // objectness x class score, and 0.5 * 0.5 = 0.25 < 0.5.
    let geometry = tiny_geometry();
    let buffer = vec![0.; geometry.inference_out_size()];
    let view = TensorView::new(&geometry, &buffer).unwrap();

    assert!(decode_with_threshold(&geometry, &view, 0.5).is_empty());
    assert!(filter_by_prob(decode(&geometry, &view), 0.5).is_empty());
}

#[test]
fn filter_keeps_candidates_exactly_on_the_boundary() {
    let geometry = tiny_geometry();
    let buffer = vec![0.; geometry.inference_out_size()];
    let view = TensorView::new(&geometry, &buffer).unwrap();

    // All fused probabilities are exactly 0.25 here.
    let kept = filter_by_prob(decode(&geometry, &view), 0.25);
    assert_eq!(kept.len(), 8);
}

#[test]
fn strong_activation_decodes_the_expected_box() {
    let geometry = tiny_geometry();
    let mut buffer = vec![0.; geometry.inference_out_size()];

    // Cell (1, 1): sigmoid(ln 3) = 0.75, exp(ln 2) = 2.
    buffer[idx(1, 1, 0)] = 3f32.ln();
    buffer[idx(1, 1, 1)] = 3f32.ln();
    buffer[idx(1, 1, 2)] = 2f32.ln();
    buffer[idx(1, 1, 3)] = 2f32.ln();
    buffer[idx(1, 1, 4)] = 8.;
    buffer[idx(1, 1, 6)] = 8.; // class 1 logit

    let view = TensorView::new(&geometry, &buffer).unwrap();
    let candidates = decode_with_threshold(&geometry, &view, 0.5);
    assert_eq!(candidates.len(), 1);

    let det = &candidates[0];
    assert_eq!(det.class_id, 1);
    assert!((det.bbox.x - 56.).abs() < 1e-3); // (1 + 0.75) * 32
    assert!((det.bbox.y - 56.).abs() < 1e-3);
    assert!((det.bbox.w - 40.).abs() < 1e-3); // 20 * 2
    assert!((det.bbox.h - 40.).abs() < 1e-3);
    assert!(det.probability > 0.99);
}

#[test]
fn fused_threshold_matches_decode_then_filter() {
    let geometry = tiny_geometry();
    let buffer: Vec<f32> = (0..geometry.inference_out_size())
        .map(|i| ((i * 37) % 29) as f32 * 0.35 - 5.)
        .collect();
    let view = TensorView::new(&geometry, &buffer).unwrap();

    let fused = decode_with_threshold(&geometry, &view, 0.3);
    let staged = filter_by_prob(decode(&geometry, &view), 0.3);
    assert_eq!(fused, staged);
}

#[test]
fn nan_activations_drop_only_the_affected_candidates() {
    let geometry = tiny_geometry();
    let mut buffer = vec![0.; geometry.inference_out_size()];

    // NaN box size poisons both class candidates of cell (0, 0).
    buffer[idx(0, 0, 2)] = f32::NAN;
    // NaN class logit only drops that single candidate of cell (0, 1).
    buffer[idx(0, 1, 5)] = f32::NAN;

    let view = TensorView::new(&geometry, &buffer).unwrap();
    let candidates = decode(&geometry, &view);
    assert_eq!(candidates.len(), 5);
    assert!(candidates
        .iter()
        .all(|det| det.probability.is_finite() && det.bbox.w.is_finite()));
}

#[test]
fn extreme_logits_saturate_instead_of_overflowing() {
    let geometry = tiny_geometry();
    let mut buffer = vec![0.; geometry.inference_out_size()];
    buffer[idx(0, 0, 0)] = 1e4;
    buffer[idx(0, 0, 2)] = 1e4;
    buffer[idx(0, 0, 4)] = -1e4;

    let view = TensorView::new(&geometry, &buffer).unwrap();
    let candidates = decode(&geometry, &view);
    // Nothing crashed and nothing non-finite leaked through.
    assert!(candidates
        .iter()
        .all(|det| det.bbox.w.is_finite() && det.probability.is_finite()));
    // The clamped exp produced a huge-but-finite box, and the saturated
    // negative objectness collapsed that cell's probability to ~0.
    let poisoned: Vec<_> = candidates.iter().filter(|det| det.bbox.w > 1e6).collect();
    assert_eq!(poisoned.len(), 2);
    assert!(poisoned.iter().all(|det| det.probability < 1e-3));
}

#[test]
fn mismatched_buffer_length_is_rejected() {
    let geometry = tiny_geometry();
    let short = vec![0.; geometry.inference_out_size() - 1];
    assert!(TensorView::new(&geometry, &short).is_err());
    let long = vec![0.; geometry.inference_out_size() + 1];
    assert!(TensorView::new(&geometry, &long).is_err());
}

#[test]
fn second_layer_candidates_read_past_the_first_layer() {
    // Two layers (2x2 then 4x4), one class, one anchor. Channel stride 6.
    let geometry = ModelGeometry::new(1, 1, 64, 64)
        .with_layer(2, &[(10., 10.)])
        .with_layer(4, &[(5., 5.)]);
    let mut buffer = vec![-10.; geometry.inference_out_size()];

    // Layer 1, cell (gy=2, gx=3), right after the 24 floats of layer 0.
    let base = 24 + (2 * 4 + 3) * 6;
    buffer[base] = 0.; // tx
    buffer[base + 1] = 0.; // ty
    buffer[base + 2] = 0.; // tw
    buffer[base + 3] = 0.; // th
    buffer[base + 4] = 8.; // objectness
    buffer[base + 5] = 8.; // class 0

    let view = TensorView::new(&geometry, &buffer).unwrap();
    let candidates = decode_with_threshold(&geometry, &view, 0.5);
    assert_eq!(candidates.len(), 1);
    let det = &candidates[0];
    assert!((det.bbox.x - 56.).abs() < 1e-3); // (3 + 0.5) * 16
    assert!((det.bbox.y - 40.).abs() < 1e-3); // (2 + 0.5) * 16
    assert!((det.bbox.w - 5.).abs() < 1e-3);
}

#[test]
fn f16_buffers_upconvert_exactly() {
    let raw = [0., 1.5, -2.25, 8.];
    let half_buf: Vec<f16> = raw.iter().map(|&v| f16::from_f32(v)).collect();
    assert_eq!(upconvert_f16(&half_buf), raw.to_vec());
}
