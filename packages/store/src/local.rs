//! Small synchronous string key-value storage for preferences and credential
//! descriptors. On the web this is `window.localStorage`; elsewhere it is
//! [`crate::FileStore`] or [`crate::MemoryStore`].

use crate::error::StoreResult;

/// Synchronous per-origin string store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web::LocalStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web {
    use super::KeyValueStore;
    use crate::error::{StoreError, StoreResult};

    /// `window.localStorage`, looked up on every call.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LocalStorage;

    impl LocalStorage {
        fn storage(&self) -> StoreResult<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| StoreError::Backend("localStorage unavailable".into()))
        }
    }

    fn js_err(err: wasm_bindgen::JsValue) -> StoreError {
        StoreError::Backend(format!("{err:?}"))
    }

    impl KeyValueStore for LocalStorage {
        fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
            self.storage()?.get_item(key).map_err(js_err)
        }

        fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
            self.storage()?.set_item(key, value).map_err(js_err)
        }

        fn remove_item(&self, key: &str) -> StoreResult<()> {
            self.storage()?.remove_item(key).map_err(js_err)
        }
    }
}
