use crate::{MkfsVfatFormatter, NativeFatFormatter};
use fatimg_core::{FormatterRegistry, ImageError, VolumeFormatter};
use log::info;
use std::path::Path;
use std::sync::Arc;

pub const MKFS: &str = "mkfs";
pub const NATIVE: &str = "native";
/// Picks `mkfs` when its program is installed, `native` otherwise.
pub const AUTO: &str = "auto";

pub fn register_builtin_formatters(registry: &mut FormatterRegistry, mkfs_program: &Path) {
    registry.register(
        MKFS,
        Arc::new(MkfsVfatFormatter::with_program(mkfs_program)) as Arc<dyn VolumeFormatter>,
    );
    registry.register(
        NATIVE,
        Arc::new(NativeFatFormatter) as Arc<dyn VolumeFormatter>,
    );
}

pub fn resolve_formatter(
    registry: &FormatterRegistry,
    name: &str,
) -> Result<Arc<dyn VolumeFormatter>, ImageError> {
    if name == AUTO {
        if let Some(mkfs) = registry.get_formatter(MKFS) {
            if mkfs.check_available().is_ok() {
                return Ok(mkfs);
            }
        }
        info!("{} not available, using the {} formatter", MKFS, NATIVE);
        return registry.require(NATIVE);
    }

    registry.require(name)
}
