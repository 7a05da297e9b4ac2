//! Recording mock collaborators for builder tests. Nothing here formats a
//! real volume: the mock formatter leaves an empty file behind and the mock
//! writer keeps file contents in memory.

use crate::{FatWriter, ImageError, ImageSession, VolumeFormatter, VolumeSpec};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockFormatter {
    unavailable: bool,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn failing(diagnostics: &str) -> Self {
        Self {
            failure: Some(diagnostics.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl VolumeFormatter for MockFormatter {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn requires_external_tools(&self) -> bool {
        false
    }

    fn required_tools(&self) -> Vec<String> {
        vec![]
    }

    fn check_available(&self) -> Result<(), ImageError> {
        if self.unavailable {
            Err(ImageError::FormatterUnavailable("mock formatter switched off".to_string()))
        } else {
            Ok(())
        }
    }

    fn format_empty_volume(&self, spec: &VolumeSpec<'_>) -> Result<(), ImageError> {
        self.calls.lock().unwrap().push(format!(
            "format {} {} {} {}",
            spec.variant,
            spec.label,
            spec.size_kb,
            spec.path.display()
        ));
        if let Some(diagnostics) = &self.failure {
            return Err(ImageError::FormatterFailed {
                tool: "mock".to_string(),
                diagnostics: diagnostics.clone(),
            });
        }
        OpenOptions::new().write(true).create_new(true).open(spec.path)?;
        Ok(())
    }
}

#[derive(Default)]
struct WriterState {
    files: BTreeMap<String, Vec<u8>>,
    written: Vec<String>,
    opened: usize,
    finished: usize,
}

#[derive(Default)]
pub struct MockWriter {
    unopenable: bool,
    fail_on: Option<String>,
    corrupt_reads: bool,
    state: Arc<Mutex<WriterState>>,
}

impl MockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unopenable() -> Self {
        Self {
            unopenable: true,
            ..Self::default()
        }
    }

    pub fn failing_on(path: &str) -> Self {
        Self {
            fail_on: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub fn corrupting_reads() -> Self {
        Self {
            corrupt_reads: true,
            ..Self::default()
        }
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn written_paths(&self) -> Vec<String> {
        self.state.lock().unwrap().written.clone()
    }

    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn finished(&self) -> usize {
        self.state.lock().unwrap().finished
    }
}

impl FatWriter for MockWriter {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn open(&self, image: &Path) -> Result<Box<dyn ImageSession>, ImageError> {
        if self.unopenable {
            return Err(ImageError::WriterUnavailable(format!(
                "cannot open {}",
                image.display()
            )));
        }
        self.state.lock().unwrap().opened += 1;
        Ok(Box::new(MockSession {
            fail_on: self.fail_on.clone(),
            corrupt_reads: self.corrupt_reads,
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockSession {
    fail_on: Option<String>,
    corrupt_reads: bool,
    state: Arc<Mutex<WriterState>>,
}

impl ImageSession for MockSession {
    fn write_file_into(&mut self, path: &str, data: &[u8]) -> io::Result<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(io::Error::new(io::ErrorKind::Other, "no space left in image"));
        }
        let mut state = self.state.lock().unwrap();
        state.written.push(path.to_string());
        state.files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn read_file(&mut self, path: &str) -> io::Result<Vec<u8>> {
        let mut data = self
            .state
            .lock()
            .unwrap()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))?;
        if self.corrupt_reads {
            for byte in &mut data {
                *byte ^= 0xFF;
            }
        }
        Ok(data)
    }

    fn finish(self: Box<Self>) -> Result<(), ImageError> {
        self.state.lock().unwrap().finished += 1;
        Ok(())
    }
}
