//! View State Management
//!
//! Persisted UI state and the key/value stores behind it.

pub mod error;
pub mod store;
pub mod view_state;

pub use error::{StoreError, StoreResult};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use view_state::{StorageKeys, ViewState, DEFAULT_KEY_PREFIX};
