pub mod biometric;
pub mod error;
pub mod local;
pub mod models;
pub mod offline;
pub mod prefs;

mod file_store;
mod memory;
pub use file_store::FileStore;
pub use memory::MemoryStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod idb;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use idb::IdbStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod webauthn;

pub use biometric::{
    BiometricAuth, BiometricCredential, BiometricError, NoAuthenticator, PlatformAuthenticator,
};
pub use error::{StoreError, StoreResult};
pub use local::KeyValueStore;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStorage;
pub use offline::{current_millis, OfflineCache, OfflineRecipe, RecipeSnapshotSource, SnapshotStore};
pub use prefs::{SessionDuration, SessionPreference};
