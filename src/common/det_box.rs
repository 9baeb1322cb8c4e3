use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in center/size form.
///
/// Coordinates live in whatever space the producer used (model pixels for
/// decoded candidates); the adapter is the only place that converts them.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, PartialOrd)]
pub struct DetBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl DetBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the left edge of the box.
    pub fn x_min(&self) -> f32 {
        self.x - self.w / 2.
    }

    /// Returns the top edge of the box.
    pub fn y_min(&self) -> f32 {
        self.y - self.h / 2.
    }

    /// Returns the right edge of the box.
    pub fn x_max(&self) -> f32 {
        self.x + self.w / 2.
    }

    /// Returns the bottom edge of the box.
    pub fn y_max(&self) -> f32 {
        self.y + self.h / 2.
    }

    /// Computes the area of the box.
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Length of the overlap of two 1-D intervals given as center/size.
    ///
    /// Returns 0 when the intervals are disjoint.
    pub fn overlap(c1: f32, s1: f32, c2: f32, s2: f32) -> f32 {
        let left = (c1 - s1 / 2.).max(c2 - s2 / 2.);
        let right = (c1 + s1 / 2.).min(c2 + s2 / 2.);
        (right - left).max(0.)
    }

    /// Computes the intersection area between this box and another.
    pub fn intersect(&self, other: &DetBox) -> f32 {
        Self::overlap(self.x, self.w, other.x, other.w)
            * Self::overlap(self.y, self.h, other.y, other.h)
    }

    /// Computes the union area between this box and another.
    pub fn union_area(&self, other: &DetBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Computes the intersection over union (IoU) between this box and another.
    ///
    /// A zero or non-finite union maps to 0; degenerate zero-area boxes are
    /// common in letterboxed frames and must not poison the suppression pass.
    pub fn iou(&self, other: &DetBox) -> f32 {
        let union = self.union_area(other);
        if union <= 0. || !union.is_finite() {
            return 0.;
        }
        let ratio = self.intersect(other) / union;
        if ratio.is_finite() {
            ratio
        } else {
            0.
        }
    }
}
