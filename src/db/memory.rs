use std::collections::HashMap;
use std::sync::Mutex;

use crate::db::KeyValueStore;
use crate::error::Result;

/// In-process store, contents are lost when it is dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.items.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock()?;
        Ok(items.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock()?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock()?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(!store.exists("k").unwrap());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(store.exists("k").unwrap());

        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_remove_missing_key() {
        let store = MemoryStore::new();
        store.remove("missing").unwrap();
    }

    #[test]
    fn test_get_object_falls_back_on_corrupt_json() {
        let store = MemoryStore::new();
        store.set("list", "[1, 2").unwrap();

        let value: Vec<i32> = store.get_object("list", vec![9]).unwrap();
        assert_eq!(value, vec![9]);
    }

    #[test]
    fn test_object_round_trip() {
        let store = MemoryStore::new();
        store.set_object("list", &vec!["a", "b"]).unwrap();

        let value: Vec<String> = store.get_object("list", Vec::new()).unwrap();
        assert_eq!(value, vec!["a", "b"]);
        assert_eq!(store.get("list").unwrap().as_deref(), Some(r#"["a","b"]"#));
    }
}
