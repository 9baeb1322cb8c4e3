mod labels;
mod tensor_view;

pub use labels::LabelTable;
pub use tensor_view::{upconvert_f16, TensorView};
