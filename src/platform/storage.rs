//! Key/value storage backed by LocalStorage
//!
//! Native builds have no storage; every call reports `PersistenceUnavailable`.

use crate::Result;

#[cfg(target_arch = "wasm32")]
use crate::Error;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| Error::PersistenceUnavailable("localStorage not available".into()))
}

/// Read a value, `Ok(None)` when the key is absent
#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Result<Option<String>> {
    local_storage()?
        .get_item(key)
        .map_err(|e| Error::PersistenceUnavailable(format!("read {key}: {e:?}")))
}

#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) -> Result<()> {
    local_storage()?
        .set_item(key, value)
        .map_err(|e| Error::PersistenceUnavailable(format!("write {key}: {e:?}")))
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(_key: &str) -> Result<Option<String>> {
    Err(crate::Error::PersistenceUnavailable("no storage on native".into()))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(_key: &str, _value: &str) -> Result<()> {
    Err(crate::Error::PersistenceUnavailable("no storage on native".into()))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_native_storage_is_unavailable() {
        assert!(matches!(get_item("k"), Err(Error::PersistenceUnavailable(_))));
        assert!(matches!(set_item("k", "v"), Err(Error::PersistenceUnavailable(_))));
    }
}
