//! Seams for the two collaborators the builder drives: something that lays
//! down an empty FAT volume, and something that writes files into it.

use crate::{FatVariant, ImageError};
use std::io;
use std::path::Path;

/// Parameters for an empty volume.
#[derive(Debug, Clone, Copy)]
pub struct VolumeSpec<'a> {
    pub variant: FatVariant,
    pub label: &'a str,
    pub path: &'a Path,
    pub size_kb: u64,
}

pub trait VolumeFormatter: Send + Sync {
    fn name(&self) -> &'static str;
    fn requires_external_tools(&self) -> bool;
    fn required_tools(&self) -> Vec<String>;

    /// Returns `FormatterUnavailable` when this formatter cannot run here.
    fn check_available(&self) -> Result<(), ImageError>;

    /// Creates `spec.path` holding an empty volume. The path must not exist.
    fn format_empty_volume(&self, spec: &VolumeSpec<'_>) -> Result<(), ImageError>;
}

pub trait FatWriter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Opens an existing image read/write. Failure is `WriterUnavailable`.
    fn open(&self, image: &Path) -> Result<Box<dyn ImageSession>, ImageError>;
}

/// An image opened by a [`FatWriter`].
pub trait ImageSession {
    /// Writes `data` at `path` (e.g. `/DOOM.WAD`), replacing any existing file.
    fn write_file_into(&mut self, path: &str, data: &[u8]) -> io::Result<()>;

    fn read_file(&mut self, path: &str) -> io::Result<Vec<u8>>;

    /// Flushes and closes the image.
    fn finish(self: Box<Self>) -> Result<(), ImageError>;
}
