//! Drives a build: size the volume, format it, copy the inputs in.

use crate::input::total_bytes;
use crate::short_name::{derive_short_name, find_collisions, image_path};
use crate::{BuildOptions, FatWriter, ImageError, InputFile, SizingDecision, VolumeFormatter, VolumeSpec, MIB};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct PlannedEntry {
    pub source_name: String,
    pub short_name: String,
    pub image_path: String,
    pub size: u64,
}

/// What a build would do, computed without touching disk.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub sizing: SizingDecision,
    pub label: String,
    pub formatter: String,
    pub writer: String,
    pub required_tools: Vec<String>,
    pub entries: Vec<PlannedEntry>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub output: PathBuf,
    pub plan: BuildPlan,
    pub verified: bool,
}

pub struct ImageBuilder<'a> {
    formatter: &'a dyn VolumeFormatter,
    writer: &'a dyn FatWriter,
    options: BuildOptions,
}

impl<'a> ImageBuilder<'a> {
    pub fn new(formatter: &'a dyn VolumeFormatter, writer: &'a dyn FatWriter, options: BuildOptions) -> Self {
        Self {
            formatter,
            writer,
            options,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Dry run. A missing formatter shows up as a warning, not an error.
    pub fn plan(&self, inputs: &[InputFile]) -> Result<BuildPlan, ImageError> {
        let mut plan = self.layout(inputs)?;
        if let Err(e) = self.formatter.check_available() {
            plan.warnings.push(e.to_string());
        }
        Ok(plan)
    }

    pub fn build(&self, output: &Path, inputs: &[InputFile]) -> Result<BuildReport, ImageError> {
        let plan = self.layout(inputs)?;
        let sizing = plan.sizing;

        info!("Creating {} filesystem image: {}", sizing.variant, output.display());
        info!(
            "Total input size: {} bytes ({:.2} MB)",
            sizing.total_input_bytes,
            sizing.total_input_bytes as f64 / MIB as f64
        );
        info!(
            "Filesystem size: {} bytes ({:.2} MB)",
            sizing.size_bytes(),
            sizing.size_kb as f64 / 1024.0
        );
        for warning in &plan.warnings {
            warn!("{}", warning);
        }

        self.formatter.check_available()?;
        prepare_output(output)?;

        info!("Creating filesystem with {}", self.formatter.name());
        let spec = VolumeSpec {
            variant: sizing.variant,
            label: &plan.label,
            path: output,
            size_kb: sizing.size_kb,
        };
        self.formatter.format_empty_volume(&spec)?;

        let mut session = self.writer.open(output)?;
        for (input, entry) in inputs.iter().zip(&plan.entries) {
            info!("Adding: {} -> {} ({} bytes)", input.name, entry.short_name, entry.size);
            session
                .write_file_into(&entry.image_path, &input.content)
                .map_err(|source| ImageError::WriteFailed {
                    name: input.name.clone(),
                    source,
                })?;
        }
        session.finish()?;

        let verified = if self.options.verify_after_build {
            self.verify(output, inputs, &plan)?;
            true
        } else {
            false
        };

        info!("Filesystem created successfully: {} files in {}", inputs.len(), output.display());
        Ok(BuildReport {
            output: output.to_path_buf(),
            plan,
            verified,
        })
    }

    fn layout(&self, inputs: &[InputFile]) -> Result<BuildPlan, ImageError> {
        if inputs.is_empty() {
            return Err(ImageError::NoInputFiles);
        }
        self.options.validate()?;

        let sizing = SizingDecision::for_total(total_bytes(inputs));
        let entries = inputs
            .iter()
            .map(|input| {
                let short_name = derive_short_name(&input.name);
                PlannedEntry {
                    source_name: input.name.clone(),
                    image_path: image_path(&short_name),
                    short_name,
                    size: input.len(),
                }
            })
            .collect();

        let warnings = find_collisions(inputs.iter().map(|i| i.name.as_str()))
            .into_iter()
            .map(|(short_name, sources)| {
                format!(
                    "{} all map to {}; only the last one is kept",
                    sources.join(", "),
                    short_name
                )
            })
            .collect();

        Ok(BuildPlan {
            sizing,
            label: self.options.volume_label(),
            formatter: self.formatter.name().to_string(),
            writer: self.writer.name().to_string(),
            required_tools: self.formatter.required_tools(),
            entries,
            warnings,
        })
    }

    /// Reads every surviving entry back and compares it with its source.
    fn verify(&self, output: &Path, inputs: &[InputFile], plan: &BuildPlan) -> Result<(), ImageError> {
        info!("Verifying {}", output.display());

        // Later inputs overwrite earlier ones with the same short name.
        let mut last_writer: HashMap<&str, usize> = HashMap::new();
        for (index, entry) in plan.entries.iter().enumerate() {
            last_writer.insert(entry.image_path.as_str(), index);
        }
        let mut survivors: Vec<usize> = last_writer.into_values().collect();
        survivors.sort_unstable();

        let mut session = self.writer.open(output)?;
        for index in survivors {
            let entry = &plan.entries[index];
            let expected = &inputs[index].content;
            let actual = session
                .read_file(&entry.image_path)
                .map_err(|e| ImageError::VerifyFailed {
                    name: entry.source_name.clone(),
                    reason: e.to_string(),
                })?;
            if let Some(reason) = mismatch(expected, &actual) {
                return Err(ImageError::VerifyFailed {
                    name: entry.source_name.clone(),
                    reason,
                });
            }
            debug!("Verified {} ({} bytes)", entry.image_path, actual.len());
        }
        session.finish()
    }
}

fn mismatch(expected: &[u8], actual: &[u8]) -> Option<String> {
    if expected.len() != actual.len() {
        return Some(format!("expected {} bytes, read {}", expected.len(), actual.len()));
    }
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .map(|offset| format!("content differs at byte {}", offset))
}

/// Makes sure the parent directory exists and nothing is at `output`.
fn prepare_output(output: &Path) -> Result<(), ImageError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    match fs::remove_file(output) {
        Ok(()) => {
            info!("Removed existing file: {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
