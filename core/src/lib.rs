//! Sizing policy and build orchestration for small FAT12/FAT16 images, such
//! as the asset filesystem flashed to QSPI storage.

pub mod backend;
pub mod builder;
pub mod error;
pub mod input;
pub mod options;
pub mod registry;
pub mod short_name;
pub mod sizing;

#[cfg(test)]
pub(crate) mod test_utils;

pub use backend::{FatWriter, ImageSession, VolumeFormatter, VolumeSpec};
pub use builder::{BuildPlan, BuildReport, ImageBuilder, PlannedEntry};
pub use error::ImageError;
pub use input::{read_inputs, total_bytes, InputFile};
pub use options::BuildOptions;
pub use registry::FormatterRegistry;
pub use short_name::derive_short_name;
pub use sizing::{
    compute_filesystem_size_kb, select_fat_variant, FatVariant, SizingDecision, KIB, MIB,
};
