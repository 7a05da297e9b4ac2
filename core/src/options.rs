use crate::ImageError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LABEL: &str = "DOOM";
pub const MAX_LABEL_LEN: usize = 11;

const FORBIDDEN_LABEL_CHARS: &str = "\"*+,./:;<=>?[\\]|";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    pub label: String,
    pub verify_after_build: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            verify_after_build: false,
        }
    }
}

impl BuildOptions {
    pub fn validate(&self) -> Result<(), ImageError> {
        validate_label(&self.label)
    }

    /// Label as written into the boot sector.
    pub fn volume_label(&self) -> String {
        self.label.to_ascii_uppercase()
    }
}

pub fn validate_label(label: &str) -> Result<(), ImageError> {
    if label.is_empty() {
        return Err(ImageError::InvalidInput("Volume label is empty".to_string()));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(ImageError::InvalidInput(format!(
            "Volume label '{}' is longer than {} characters",
            label, MAX_LABEL_LEN
        )));
    }
    if let Some(c) = label
        .chars()
        .find(|c| !c.is_ascii() || c.is_ascii_control() || FORBIDDEN_LABEL_CHARS.contains(*c))
    {
        return Err(ImageError::InvalidInput(format!(
            "Volume label '{}' contains invalid character {:?}",
            label, c
        )));
    }
    Ok(())
}
