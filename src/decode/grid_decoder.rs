use crate::common::{DetBox, Detection, ModelGeometry};
use crate::data::TensorView;
use crate::decode::activation::{safe_exp, sigmoid};

/// Decodes every anchor/cell/class combination into a candidate list.
///
/// Standard YOLO decode: box center is `(cell + sigmoid(t)) * stride`, box
/// size is `anchor * exp(t)` with anchors in model-input pixels, and the
/// candidate probability is `sigmoid(objectness) * sigmoid(class logit)`,
/// fused here before any thresholding.
///
/// Iteration order is layer, anchor, grid_y, grid_x, class. It is fixed:
/// the suppression pass breaks exact-probability ties by this order, so a
/// different walk would change which duplicate survives.
///
/// Candidates with a NaN activation anywhere in box or score are dropped on
/// the spot; one bad grid cell must not take down the frame.
pub fn decode(geometry: &ModelGeometry, view: &TensorView) -> Vec<Detection> {
    decode_impl(geometry, view, 0.)
}

/// Decode with the confidence gate fused into the pass.
///
/// Behaviorally identical to `decode` followed by `filter_by_prob` with the
/// same threshold, it just never materializes the rejected candidates.
pub fn decode_with_threshold(
    geometry: &ModelGeometry,
    view: &TensorView,
    threshold: f32,
) -> Vec<Detection> {
    decode_impl(geometry, view, threshold)
}

fn decode_impl(geometry: &ModelGeometry, view: &TensorView, threshold: f32) -> Vec<Detection> {
    let mut candidates = Vec::new();

    for (layer, &grid) in geometry.grids.iter().enumerate() {
        let g = grid as usize;
        let stride_x = geometry.model_width as f32 / grid as f32;
        let stride_y = geometry.model_height as f32 / grid as f32;

        for anchor in 0..geometry.num_bb {
            let (anchor_w, anchor_h) = geometry.anchors[layer][anchor];

            for gy in 0..g {
                for gx in 0..g {
                    let tx = view.at(layer, gy, gx, anchor, 0);
                    let ty = view.at(layer, gy, gx, anchor, 1);
                    let tw = view.at(layer, gy, gx, anchor, 2);
                    let th = view.at(layer, gy, gx, anchor, 3);
                    let tc = view.at(layer, gy, gx, anchor, 4);

                    let x = (gx as f32 + sigmoid(tx)) * stride_x;
                    let y = (gy as f32 + sigmoid(ty)) * stride_y;
                    let w = anchor_w * safe_exp(tw);
                    let h = anchor_h * safe_exp(th);
                    let objectness = sigmoid(tc);

                    if !(x.is_finite()
                        && y.is_finite()
                        && w.is_finite()
                        && h.is_finite()
                        && objectness.is_finite())
                    {
                        continue;
                    }

                    for class_id in 0..geometry.num_class {
                        let logit = view.at(layer, gy, gx, anchor, 5 + class_id);
                        let probability = objectness * sigmoid(logit);
                        if !probability.is_finite() || probability < threshold {
                            continue;
                        }
                        candidates.push(Detection::new(
                            DetBox::new(x, y, w, h),
                            class_id,
                            probability,
                        ));
                    }
                }
            }
        }
    }

    candidates
}
