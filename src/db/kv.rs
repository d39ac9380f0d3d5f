use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// String key-value storage holding whole serialized documents per key
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Load a JSON value, returns `default` if the key is missing or unparseable
    fn get_object<T>(&self, key: &str, default: T) -> Result<T>
    where
        Self: Sized,
        T: DeserializeOwned,
    {
        match self.get(key)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(value),
                Err(e) => {
                    log::error!("Error parsing store object {}, returning default: {}", key, e);
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// Serialize a value as JSON and store it under `key`
    fn set_object<T>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}
