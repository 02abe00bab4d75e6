//! InMemoryConfig: flat configuration property map
//!
//! Backs the ConfigResolver contract for embedding and tests. Properties are
//! stored under their fully assembled key, `<prefix>.<infix>...<infix>.<suffix>`,
//! the same shape the resolver looks them up with.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use runway_core::{ConfigResolver, Result};

/// In-memory configuration property resolver
#[derive(Debug, Default)]
pub struct InMemoryConfig {
    properties: RwLock<BTreeMap<String, String>>,
}

impl InMemoryConfig {
    /// Create an empty resolver (every lookup answers "unconfigured")
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property under its fully assembled key
    ///
    /// ```
    /// use runway_store::InMemoryConfig;
    ///
    /// let config = InMemoryConfig::new();
    /// config.set_property("request.type.local.prefix", "L");
    /// config.set_property("request.prefix.L.maximum", "9999");
    /// ```
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.write().insert(key.into(), value.into());
    }

    /// Remove a property
    pub fn remove_property(&self, key: &str) {
        self.properties.write().remove(key);
    }

    fn assemble_key(prefix: &str, suffix: &str, infixes: &[&str]) -> String {
        let mut key = String::from(prefix);
        for infix in infixes {
            key.push('.');
            key.push_str(infix);
        }
        key.push('.');
        key.push_str(suffix);
        key
    }
}

impl ConfigResolver for InMemoryConfig {
    fn get_property(&self, prefix: &str, suffix: &str, infixes: &[&str]) -> Result<Option<String>> {
        let key = Self::assemble_key(prefix, suffix, infixes);
        Ok(self.properties.read().get(&key).cloned())
    }
}
