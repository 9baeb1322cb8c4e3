mod utils;
pub mod common;
pub mod data;
pub mod decode;

use anyhow::Result;
use half::f16;

use crate::common::{LabeledBox, ModelGeometry};
use crate::data::{upconvert_f16, LabelTable, TensorView};
use crate::decode::{adapt, decode_with_threshold, suppress, PixelMapper};

/// Per-frame decode/filter/suppress pipeline, assembled once at startup.
///
/// Holds only static configuration; `run` is a pure function of the raw
/// inference buffer, keeps no state between frames and takes `&self`, so
/// independent frames may be processed concurrently by the caller.
#[derive(Debug, Clone)]
pub struct YoloPostProcessor {
    geometry: ModelGeometry,
    labels: LabelTable,
    mapper: PixelMapper,
}

/// Validates the static configuration and builds the per-frame pipeline.
///
/// Geometry inconsistencies and a label table shorter than the class count
/// are fatal here; nothing is rechecked per frame.
pub fn init_postprocess(
    geometry: ModelGeometry,
    labels_path: &str,
    mapper: PixelMapper,
) -> Result<YoloPostProcessor> {
    geometry.validate()?;
    let labels = LabelTable::from_file(labels_path, geometry.num_class)?;
    log::info!("Initialized YOLO post-process: {}", geometry.summary());
    YoloPostProcessor::new(geometry, labels, mapper)
}

impl YoloPostProcessor {
    pub fn new(geometry: ModelGeometry, labels: LabelTable, mapper: PixelMapper) -> Result<Self> {
        geometry.validate()?;
        if labels.len() < geometry.num_class {
            anyhow::bail!(
                "Label table has {} entries but the model predicts {} classes",
                labels.len(),
                geometry.num_class
            );
        }
        Ok(Self {
            geometry,
            labels,
            mapper,
        })
    }

    /// Turns one frame's raw inference output into final labeled boxes.
    ///
    /// The buffer is only borrowed for the duration of the call. An empty
    /// result is a normal frame, not an error; the only error here is a
    /// buffer whose length disagrees with the geometry.
    pub fn run(&self, tensor: &[f32]) -> Result<Vec<LabeledBox>> {
        let view = TensorView::new(&self.geometry, tensor)?;
        let candidates = decode_with_threshold(&self.geometry, &view, self.geometry.prob_threshold);
        let survivors = suppress(&candidates, self.geometry.nms_threshold);
        log::debug!(
            "Frame decoded: {} candidates past threshold, {} after suppression",
            candidates.len(),
            survivors.len()
        );
        Ok(adapt(&survivors, &self.labels, &self.mapper))
    }

    /// `run` for accelerators that emit half-precision output.
    pub fn run_f16(&self, tensor: &[f16]) -> Result<Vec<LabeledBox>> {
        let widened = upconvert_f16(tensor);
        self.run(&widened)
    }

    pub fn geometry(&self) -> &ModelGeometry {
        &self.geometry
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn mapper(&self) -> &PixelMapper {
        &self.mapper
    }
}
