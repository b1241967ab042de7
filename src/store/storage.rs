use anyhow::Result;
use std::collections::HashMap;

/// String key/value persistence. Values are opaque to the storage; the store
/// JSON-encodes each collection before writing it.
pub(crate) trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Process-local storage. Used when the database cannot be opened, and in tests.
#[derive(Debug, Default)]
pub(crate) struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
