//! Front-end to legacy module name translation.

use std::collections::BTreeMap;

/// Maps a front-end module name (`accounts`) to its legacy name (`Accounts`).
pub trait ModuleNameMapper: Send + Sync {
    fn to_legacy(&self, module: &str) -> Option<String>;

    /// Reverse lookup.
    fn to_front_end(&self, legacy_name: &str) -> Option<String>;
}

/// Mapper backed by a fixed table, usually the `[modules]` configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticModuleNameMapper {
    modules: BTreeMap<String, String>,
}

impl StaticModuleNameMapper {
    pub fn new(modules: BTreeMap<String, String>) -> Self {
        Self { modules }
    }

    pub fn with_module(mut self, front_end: impl Into<String>, legacy: impl Into<String>) -> Self {
        self.modules.insert(front_end.into(), legacy.into());
        self
    }
}

impl ModuleNameMapper for StaticModuleNameMapper {
    fn to_legacy(&self, module: &str) -> Option<String> {
        self.modules.get(module).cloned()
    }

    fn to_front_end(&self, legacy_name: &str) -> Option<String> {
        self.modules
            .iter()
            .find(|(_, legacy)| legacy.as_str() == legacy_name)
            .map(|(front_end, _)| front_end.clone())
    }
}
