//! Concrete collaborators for `fatimg-core`: formatters that lay down an
//! empty FAT volume and a writer that copies files into it.

pub mod fatfs_writer;
pub mod mkfs_vfat;
pub mod native;
pub mod registration;

pub use fatfs_writer::{FatfsSession, FatfsWriter};
pub use mkfs_vfat::MkfsVfatFormatter;
pub use native::NativeFatFormatter;
pub use registration::{register_builtin_formatters, resolve_formatter, AUTO, MKFS, NATIVE};
