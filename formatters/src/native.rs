// In-process formatter built on the fatfs crate, for hosts without dosfstools

use fatfs::{FatType, FormatVolumeOptions};
use fatimg_core::{FatVariant, ImageError, VolumeFormatter, VolumeSpec, KIB};
use log::info;
use std::fs::OpenOptions;

pub struct NativeFatFormatter;

impl NativeFatFormatter {
    fn fat_type(variant: FatVariant) -> FatType {
        match variant {
            FatVariant::Fat12 => FatType::Fat12,
            FatVariant::Fat16 => FatType::Fat16,
        }
    }

    /// Boot sector label: upper case, padded with spaces to 11 bytes.
    pub fn label_bytes(label: &str) -> [u8; 11] {
        let mut bytes = [b' '; 11];
        for (dst, src) in bytes.iter_mut().zip(label.bytes()) {
            *dst = src.to_ascii_uppercase();
        }
        bytes
    }
}

impl VolumeFormatter for NativeFatFormatter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn requires_external_tools(&self) -> bool {
        false
    }

    fn required_tools(&self) -> Vec<String> {
        vec![]
    }

    fn check_available(&self) -> Result<(), ImageError> {
        Ok(())
    }

    fn format_empty_volume(&self, spec: &VolumeSpec<'_>) -> Result<(), ImageError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(spec.path)?;
        file.set_len(spec.size_kb * KIB)?;

        let options = FormatVolumeOptions::new()
            .fat_type(Self::fat_type(spec.variant))
            .volume_label(Self::label_bytes(spec.label));
        fatfs::format_volume(&mut file, options).map_err(|e| ImageError::FormatterFailed {
            tool: "fatfs".to_string(),
            diagnostics: e.to_string(),
        })?;
        file.sync_all()?;

        info!("Formatted {} as {} ({} KiB)", spec.path.display(), spec.variant, spec.size_kb);
        Ok(())
    }
}
