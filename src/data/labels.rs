use anyhow::{Context, Result};

use crate::utils::file_to_vec;

/// Class-index to human-readable label mapping, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// Reads a newline-delimited label file and checks it covers the model's
    /// class range. A short table is a configuration error and fails here,
    /// not silently per frame.
    pub fn from_file(path: &str, num_class: usize) -> Result<Self> {
        let names =
            file_to_vec(path).with_context(|| format!("Failed to read label file: {}", path))?;
        Self::from_names(names, num_class)
    }

    pub fn from_names(names: Vec<String>, num_class: usize) -> Result<Self> {
        if names.len() < num_class {
            anyhow::bail!(
                "Label table has {} entries but the model predicts {} classes",
                names.len(),
                num_class
            );
        }
        Ok(Self { names })
    }

    /// Label for a class index. Indices are produced by the decoder and are
    /// always inside the validated range; anything else maps to "".
    pub fn get(&self, class_id: usize) -> &str {
        self.names.get(class_id).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
