use serde::{Deserialize, Serialize};

/// Final per-frame detection handed to rendering/counting code.
///
/// Top-left-origin integer rectangle in the output image's pixel space, with
/// the class label already resolved.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledBox {
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub score: f32,
}

impl LabeledBox {
    pub fn new(label: String, x: i32, y: i32, width: i32, height: i32, score: f32) -> Self {
        Self {
            label,
            x,
            y,
            width,
            height,
            score,
        }
    }

    /// Returns the rectangle as `(x, y, w, h)`.
    pub fn xy_wh(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }
}
