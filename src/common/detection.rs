use serde::{Deserialize, Serialize};

use crate::common::DetBox;
use crate::decode::Nms;

/// One anchor/grid-cell/class candidate produced by the decoder.
///
/// `probability` is the fused score `objectness * sigmoid(class logit)`,
/// multiplied in the decoder before any thresholding. The confidence filter
/// and the suppression pass both gate on this combined value.
#[derive(Default, Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: DetBox,
    pub class_id: usize,
    pub probability: f32,
}

impl Nms for Detection {
    /// Computes the intersection over union (IoU) between this candidate and another.
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    /// Returns the fused confidence score of the candidate.
    fn confidence(&self) -> f32 {
        self.probability
    }

    /// Returns the class partition this candidate belongs to.
    fn class(&self) -> usize {
        self.class_id
    }
}

impl Detection {
    pub fn new(bbox: DetBox, class_id: usize, probability: f32) -> Self {
        Self {
            bbox,
            class_id,
            probability,
        }
    }

    /// Sets the candidate's box from `(cx, cy, w, h)`.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = DetBox::new(cx, cy, w, h);
        self
    }

    /// Sets the fused probability of the candidate.
    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }

    /// Sets the class index of the candidate.
    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }
}
