use anyhow::Result;
use half::f16;
use ndarray::ArrayView4;

use crate::common::ModelGeometry;

/// Borrowed, shape-checked view over one frame's raw inference output.
///
/// The flat buffer is the concatenation of one tensor per output layer, each
/// laid out as `(grid_y, grid_x, anchor, 5 + num_class)`. The view splits it
/// into per-layer `ArrayView4`s so the decoder indexes by position instead of
/// doing offset arithmetic. It only borrows the buffer; nothing is retained
/// past the decode call, the accelerator side is free to reuse the memory for
/// the next frame.
#[derive(Debug)]
pub struct TensorView<'a> {
    layers: Vec<ArrayView4<'a, f32>>,
}

impl<'a> TensorView<'a> {
    pub fn new(geometry: &ModelGeometry, buffer: &'a [f32]) -> Result<Self> {
        let expected = geometry.inference_out_size();
        if buffer.len() != expected {
            anyhow::bail!(
                "Inference buffer holds {} floats, geometry expects {}",
                buffer.len(),
                expected
            );
        }
        let channels = 5 + geometry.num_class;
        let mut layers = Vec::with_capacity(geometry.num_layers());
        let mut offset = 0usize;
        for &grid in &geometry.grids {
            let g = grid as usize;
            let len = g * g * geometry.num_bb * channels;
            let view = ArrayView4::from_shape(
                (g, g, geometry.num_bb, channels),
                &buffer[offset..offset + len],
            )?;
            layers.push(view);
            offset += len;
        }
        Ok(Self { layers })
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, layer: usize) -> &ArrayView4<'a, f32> {
        &self.layers[layer]
    }

    /// Raw activation at `(layer, grid_y, grid_x, anchor, channel)`.
    ///
    /// Channels 0..4 are tx, ty, tw, th; 4 is objectness; 5.. are the class
    /// logits.
    pub fn at(&self, layer: usize, gy: usize, gx: usize, anchor: usize, channel: usize) -> f32 {
        self.layers[layer][[gy, gx, anchor, channel]]
    }
}

/// Widens a half-precision accelerator buffer so it can be decoded as f32.
pub fn upconvert_f16(buffer: &[f16]) -> Vec<f32> {
    buffer.iter().map(|v| v.to_f32()).collect()
}
