use serde::{Deserialize, Serialize};

use crate::common::{Detection, LabeledBox};
use crate::data::LabelTable;

/// Affine map from model-input coordinates to output-image pixels.
///
/// The surrounding system knows how the frame was fitted into the model
/// input; it supplies either a per-axis `direct` stretch or a uniform
/// `letterbox` scale with centered padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelMapper {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl PixelMapper {
    /// Independent per-axis stretch from model size to output size.
    pub fn direct(model_width: u32, model_height: u32, output_width: u32, output_height: u32) -> Self {
        Self {
            scale_x: output_width as f32 / model_width as f32,
            scale_y: output_height as f32 / model_height as f32,
            offset_x: 0.,
            offset_y: 0.,
        }
    }

    /// Uniform scale with the model frame centered in the output image.
    pub fn letterbox(model_width: u32, model_height: u32, output_width: u32, output_height: u32) -> Self {
        let scale = (output_width as f32 / model_width as f32)
            .min(output_height as f32 / model_height as f32);
        Self {
            scale_x: scale,
            scale_y: scale,
            offset_x: (output_width as f32 - model_width as f32 * scale) / 2.,
            offset_y: (output_height as f32 - model_height as f32 * scale) / 2.,
        }
    }

    /// Maps a model-space point into output pixels.
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale_x + self.offset_x,
            y * self.scale_y + self.offset_y,
        )
    }
}

/// Converts surviving candidates into the externally consumed form:
/// top-left-origin integer pixel rectangles with resolved labels.
///
/// The label table was length-checked at startup, so every decoder-produced
/// class index resolves; the `get` fallback never fires in practice.
pub fn adapt(detections: &[Detection], labels: &LabelTable, mapper: &PixelMapper) -> Vec<LabeledBox> {
    detections
        .iter()
        .map(|det| {
            let (left, top) = mapper.map_point(det.bbox.x_min(), det.bbox.y_min());
            LabeledBox {
                label: labels.get(det.class_id).to_string(),
                x: left.round() as i32,
                y: top.round() as i32,
                width: (det.bbox.w * mapper.scale_x).round() as i32,
                height: (det.bbox.h * mapper.scale_y).round() as i32,
                score: det.probability,
            }
        })
        .collect()
}
