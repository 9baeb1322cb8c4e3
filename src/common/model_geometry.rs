use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Static decode geometry for one YOLO model variant.
///
/// Everything the decoder needs to interpret the raw accelerator buffer:
/// class count, anchors per cell, per-layer grid resolution, the per-layer
/// anchor table (in model-input pixels), thresholds and model input size.
/// Built once at startup, validated, then passed by reference per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGeometry {
    pub num_class: usize,
    pub num_bb: usize,
    pub grids: Vec<u32>,
    pub anchors: Vec<Vec<(f32, f32)>>,
    pub prob_threshold: f32,
    pub nms_threshold: f32,
    pub model_width: u32,
    pub model_height: u32,
}

impl Default for ModelGeometry {
    fn default() -> Self {
        Self {
            num_class: 80,
            num_bb: 3,
            grids: vec![],
            anchors: vec![],
            prob_threshold: 0.5,
            nms_threshold: 0.5,
            model_width: 416,
            model_height: 416,
        }
    }
}

impl ModelGeometry {
    pub fn new(num_class: usize, num_bb: usize, model_width: u32, model_height: u32) -> Self {
        Self {
            num_class,
            num_bb,
            model_width,
            model_height,
            ..Default::default()
        }
    }

    /// Full YOLOv3 geometry: three output layers at 13/26/52 with the nine
    /// COCO anchors, coarsest layer first taking the largest anchors.
    pub fn yolov3() -> Self {
        Self::new(80, 3, 416, 416)
            .with_layer(13, &[(116., 90.), (156., 198.), (373., 326.)])
            .with_layer(26, &[(30., 61.), (62., 45.), (59., 119.)])
            .with_layer(52, &[(10., 13.), (16., 30.), (33., 23.)])
    }

    /// Tiny-YOLOv3 geometry: two output layers at 13/26 with six anchors.
    pub fn tiny_yolov3() -> Self {
        Self::new(80, 3, 416, 416)
            .with_layer(13, &[(81., 82.), (135., 169.), (344., 319.)])
            .with_layer(26, &[(10., 14.), (23., 27.), (37., 58.)])
    }

    /// Appends an output layer with anchors given in model-input pixels.
    pub fn with_layer(mut self, grid: u32, anchors: &[(f32, f32)]) -> Self {
        self.grids.push(grid);
        self.anchors.push(anchors.to_vec());
        self
    }

    /// Appends an output layer with anchors given in grid units, scaling them
    /// into model-input pixels here rather than per cell in the decoder.
    pub fn with_layer_grid_units(self, grid: u32, anchors: &[(f32, f32)]) -> Self {
        let sx = self.model_width as f32 / grid as f32;
        let sy = self.model_height as f32 / grid as f32;
        let scaled: Vec<(f32, f32)> = anchors.iter().map(|&(w, h)| (w * sx, h * sy)).collect();
        self.with_layer(grid, &scaled)
    }

    pub fn with_num_class(mut self, num_class: usize) -> Self {
        self.num_class = num_class;
        self
    }

    pub fn with_thresholds(mut self, prob_threshold: f32, nms_threshold: f32) -> Self {
        self.prob_threshold = prob_threshold;
        self.nms_threshold = nms_threshold;
        self
    }

    pub fn with_model_size(mut self, width: u32, height: u32) -> Self {
        self.model_width = width;
        self.model_height = height;
        self
    }

    /// Loads and validates a geometry description from a JSON file.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model geometry file: {}", path))?;
        let geometry: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed model geometry file: {}", path))?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Startup sanity check. A geometry that disagrees with itself would
    /// silently mis-decode every frame, so this fails fast instead.
    pub fn validate(&self) -> Result<()> {
        if self.num_class == 0 {
            anyhow::bail!("Model geometry declares zero classes");
        }
        if self.num_bb == 0 {
            anyhow::bail!("Model geometry declares zero anchors per cell");
        }
        if self.grids.is_empty() {
            anyhow::bail!("Model geometry declares no output layers");
        }
        if self.grids.len() != self.anchors.len() {
            anyhow::bail!(
                "Anchor table covers {} layers but {} grids are declared",
                self.anchors.len(),
                self.grids.len()
            );
        }
        for (layer, &grid) in self.grids.iter().enumerate() {
            if grid == 0 {
                anyhow::bail!("Layer {} has a zero grid resolution", layer);
            }
            if self.anchors[layer].len() != self.num_bb {
                anyhow::bail!(
                    "Layer {} has {} anchors, expected {}",
                    layer,
                    self.anchors[layer].len(),
                    self.num_bb
                );
            }
        }
        if !(self.prob_threshold > 0. && self.prob_threshold <= 1.) {
            anyhow::bail!(
                "Probability threshold {} outside (0, 1]",
                self.prob_threshold
            );
        }
        if !(self.nms_threshold > 0. && self.nms_threshold <= 1.) {
            anyhow::bail!("NMS threshold {} outside (0, 1]", self.nms_threshold);
        }
        if self.model_width == 0 || self.model_height == 0 {
            anyhow::bail!(
                "Model input resolution {}x{} is degenerate",
                self.model_width,
                self.model_height
            );
        }
        Ok(())
    }

    /// Total float count of the concatenated per-layer output tensors.
    pub fn inference_out_size(&self) -> usize {
        self.grids
            .iter()
            .map(|&g| (g as usize) * (g as usize) * self.num_bb * (5 + self.num_class))
            .sum()
    }

    pub fn num_layers(&self) -> usize {
        self.grids.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} layers (grids {:?}), {} anchors/cell, {} classes, input {}x{}, \
             prob threshold {}, NMS threshold {}",
            self.num_layers(),
            self.grids,
            self.num_bb,
            self.num_class,
            self.model_width,
            self.model_height,
            self.prob_threshold,
            self.nms_threshold
        )
    }
}
