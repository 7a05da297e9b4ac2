use crate::ImageError;
use std::fs;
use std::path::Path;

/// A file to place in the image: its base name and full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads a file from disk, keeping only its base name.
    pub fn read(path: &Path) -> Result<Self, ImageError> {
        if !path.is_file() {
            return Err(ImageError::InputFileNotFound(path.to_path_buf()));
        }
        let content = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ImageError::InvalidInput(format!("No file name in {}", path.display())))?;
        log::info!("Loaded: {} ({} bytes)", path.display(), content.len());
        Ok(Self { name, content })
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

pub fn read_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<InputFile>, ImageError> {
    paths.iter().map(|p| InputFile::read(p.as_ref())).collect()
}

pub fn total_bytes(inputs: &[InputFile]) -> u64 {
    inputs.iter().map(InputFile::len).sum()
}
