mod activation;
mod adapter;
mod filter;
mod grid_decoder;
mod nms;

pub use adapter::{adapt, PixelMapper};
pub use filter::filter_by_prob;
pub use grid_decoder::{decode, decode_with_threshold};
pub use nms::{suppress, Nms};
