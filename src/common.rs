
mod det_box;
mod detection;
mod labeled_box;
mod model_geometry;

pub use det_box::*;
pub use detection::*;
pub use labeled_box::*;
pub use model_geometry::*;
