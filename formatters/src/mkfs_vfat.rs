// FAT12/FAT16 volumes via dosfstools' mkfs.vfat

use fatimg_core::{ImageError, VolumeFormatter, VolumeSpec};
use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DEFAULT_PROGRAM: &str = "mkfs.vfat";

const INSTALL_HINT: &str = "Install it with:\n  \
    sudo apt install dosfstools  # Debian/Ubuntu\n  \
    sudo yum install dosfstools  # RHEL/CentOS\n  \
    brew install dosfstools      # macOS";

pub struct MkfsVfatFormatter {
    program: PathBuf,
}

impl MkfsVfatFormatter {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn locate(&self) -> Result<PathBuf, ImageError> {
        which::which(&self.program).map_err(|_| {
            ImageError::FormatterUnavailable(format!(
                "{} not found. {}",
                self.program.display(),
                INSTALL_HINT
            ))
        })
    }

    /// `-F <bits> -n <label> -C <image> <size in KiB>`
    pub fn command_args(spec: &VolumeSpec<'_>) -> Vec<OsString> {
        vec![
            "-F".into(),
            spec.variant.bits().to_string().into(),
            "-n".into(),
            spec.label.into(),
            "-C".into(),
            spec.path.as_os_str().to_owned(),
            spec.size_kb.to_string().into(),
        ]
    }
}

impl Default for MkfsVfatFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeFormatter for MkfsVfatFormatter {
    fn name(&self) -> &'static str {
        "mkfs.vfat"
    }

    fn requires_external_tools(&self) -> bool {
        true
    }

    fn required_tools(&self) -> Vec<String> {
        vec![self.program.display().to_string()]
    }

    fn check_available(&self) -> Result<(), ImageError> {
        self.locate().map(|_| ())
    }

    fn format_empty_volume(&self, spec: &VolumeSpec<'_>) -> Result<(), ImageError> {
        let program = self.locate()?;
        let args = Self::command_args(spec);
        debug!(
            "Running {} {}",
            program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|e| {
                ImageError::FormatterUnavailable(format!("Failed to run {}: {}", program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let diagnostics = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("exited with {}", output.status));
            return Err(ImageError::FormatterFailed {
                tool: self.program.display().to_string(),
                diagnostics,
            });
        }

        info!("Formatted {} as {} ({} KiB)", spec.path.display(), spec.variant, spec.size_kb);
        Ok(())
    }
}
