use crate::{ImageError, VolumeFormatter};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Formatters selectable by name, e.g. `mkfs` or `native`.
#[derive(Default)]
pub struct FormatterRegistry {
    by_name: BTreeMap<String, Arc<dyn VolumeFormatter>>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any formatter already registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, formatter: Arc<dyn VolumeFormatter>) {
        self.by_name.insert(name.into(), formatter);
    }

    pub fn get_formatter(&self, name: &str) -> Option<Arc<dyn VolumeFormatter>> {
        self.by_name.get(name).map(Arc::clone)
    }

    /// Like [`get_formatter`](Self::get_formatter), but an unknown name is an
    /// `InvalidInput` error listing what is registered.
    pub fn require(&self, name: &str) -> Result<Arc<dyn VolumeFormatter>, ImageError> {
        self.get_formatter(name).ok_or_else(|| {
            ImageError::InvalidInput(format!(
                "Unknown formatter '{}'. Available: {}",
                name,
                self.list_formatters().join(", ")
            ))
        })
    }

    /// Registered names in sorted order.
    pub fn list_formatters(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }

    pub fn is_supported(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Formatters usable on this host right now.
    pub fn available(&self) -> Vec<String> {
        self.by_name
            .iter()
            .filter(|(_, formatter)| formatter.check_available().is_ok())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockFormatter;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FormatterRegistry::new();
        registry.register("zeta", Arc::new(MockFormatter::new()));
        registry.register("alpha".to_string(), Arc::new(MockFormatter::new()));

        assert!(registry.is_supported("alpha"));
        assert!(!registry.is_supported("beta"));
        assert_eq!(registry.get_formatter("zeta").unwrap().name(), "mock");
        assert!(registry.get_formatter("beta").is_none());
        assert_eq!(registry.list_formatters(), ["alpha", "zeta"]);
    }

    #[test]
    fn test_require_unknown_lists_names() {
        let mut registry = FormatterRegistry::new();
        registry.register("mock", Arc::new(MockFormatter::new()));

        assert!(registry.require("mock").is_ok());
        match registry.require("ntfs") {
            Err(ImageError::InvalidInput(msg)) => assert!(msg.contains("Available: mock")),
            other => panic!("expected InvalidInput, got {:?}", other.map(|f| f.name())),
        }
    }

    #[test]
    fn test_available_skips_unusable_formatters() {
        let mut registry = FormatterRegistry::new();
        registry.register("ready", Arc::new(MockFormatter::new()));
        registry.register("missing", Arc::new(MockFormatter::unavailable()));

        assert_eq!(registry.available(), ["ready"]);
        assert_eq!(registry.list_formatters(), ["missing", "ready"]);
    }
}
