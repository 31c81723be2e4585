//! View State
//!
//! Selected display currency and active tab. Restored once at load and
//! persisted on every change.

use serde::{Deserialize, Serialize};

use super::error::StoreResult;
use super::store::KeyValueStore;
use crate::currency::CurrencyMode;
use crate::layout::DashboardLayout;

/// Default prefix of persisted keys
pub const DEFAULT_KEY_PREFIX: &str = "planFactReport_";

/// Storage keys of the two persisted entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub currency: String,
    pub active_tab: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            currency: format!("{prefix}currencyIsUSD"),
            active_tab: format!("{prefix}activeTab"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// Currency mode and active tab of a dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub display_currency: CurrencyMode,
    pub active_tab: Option<String>,
}

impl ViewState {
    /// Restore from storage.
    ///
    /// Absent or unknown entries fall back to base currency and the layout's
    /// default tab. A persisted secondary mode is dropped when the secondary
    /// currency is unavailable.
    pub fn restore<S: KeyValueStore + ?Sized>(
        store: &S,
        keys: &StorageKeys,
        layout: &DashboardLayout,
        secondary_available: bool,
    ) -> Self {
        let usd = store.get(&keys.currency).as_deref() == Some("true");
        let display_currency = if usd && secondary_available {
            CurrencyMode::Secondary
        } else {
            if usd {
                tracing::info!("Persisted USD mode ignored, exchange rate unavailable");
            }
            CurrencyMode::Base
        };

        let active_tab = match store.get(&keys.active_tab) {
            Some(tab) if layout.has_tab(&tab) => Some(tab),
            Some(tab) => {
                tracing::debug!(tab = %tab, "Persisted tab not on this page");
                layout.default_tab().map(str::to_string)
            }
            None => layout.default_tab().map(str::to_string),
        };

        Self {
            display_currency,
            active_tab,
        }
    }

    pub fn persist_currency<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        keys: &StorageKeys,
    ) -> StoreResult<()> {
        let flag = if self.display_currency.is_secondary() {
            "true"
        } else {
            "false"
        };
        store.set(&keys.currency, flag)
    }

    pub fn persist_tab<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        keys: &StorageKeys,
    ) -> StoreResult<()> {
        match &self.active_tab {
            Some(tab) => store.set(&keys.active_tab, tab),
            None => store.remove(&keys.active_tab),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;

    #[test]
    fn test_keys() {
        let keys = StorageKeys::default();
        assert_eq!(keys.currency, "planFactReport_currencyIsUSD");
        assert_eq!(keys.active_tab, "planFactReport_activeTab");
    }

    #[test]
    fn test_restore_defaults() {
        let store = MemoryStore::new();
        let state = ViewState::restore(
            &store,
            &StorageKeys::default(),
            &DashboardLayout::default(),
            true,
        );
        assert_eq!(state.display_currency, CurrencyMode::Base);
        assert_eq!(state.active_tab.as_deref(), Some("#overview"));
    }

    #[test]
    fn test_persist_and_restore() {
        let keys = StorageKeys::default();
        let layout = DashboardLayout::default();
        let mut store = MemoryStore::new();

        let state = ViewState {
            display_currency: CurrencyMode::Secondary,
            active_tab: Some("#analysis".to_string()),
        };
        state.persist_currency(&mut store, &keys).unwrap();
        state.persist_tab(&mut store, &keys).unwrap();
        assert_eq!(store.get(&keys.currency).as_deref(), Some("true"));

        let restored = ViewState::restore(&store, &keys, &layout, true);
        assert_eq!(restored, state);
    }

    #[test]
    fn test_restore_ignores_unusable_rate_and_unknown_tab() {
        let keys = StorageKeys::default();
        let mut store = MemoryStore::new();
        store.set(&keys.currency, "true").unwrap();
        store.set(&keys.active_tab, "#gone").unwrap();

        let state = ViewState::restore(&store, &keys, &DashboardLayout::default(), false);
        assert_eq!(state.display_currency, CurrencyMode::Base);
        assert_eq!(state.active_tab.as_deref(), Some("#overview"));
    }
}
