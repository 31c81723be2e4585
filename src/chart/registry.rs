//! Chart Registry
//!
//! Owns at most one live chart per slot. A slot is absent (never rendered),
//! live in some display mode, or a placeholder. Placeholders are terminal
//! for the life of the page. An existing instance is always destroyed
//! before its replacement is created.

use serde::Serialize;
use std::collections::HashMap;

use super::backend::ChartBackend;
use super::descriptor::ChartDescriptor;
use crate::currency::{CurrencyMode, CurrencyProjector};

/// Observable state of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "mode", rename_all = "snake_case")]
pub enum SlotStatus {
    Absent,
    Live(CurrencyMode),
    Placeholder,
}

/// What a render call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    /// New instance created
    Created,
    /// Existing instance destroyed and rebuilt for a new mode
    Recreated,
    /// Nothing to do
    Unchanged,
    /// Placeholder shown instead of an empty chart
    PlaceholderShown,
    /// Surface not on the page
    Skipped,
}

enum SlotState<H> {
    Live {
        handle: H,
        mode: CurrencyMode,
        currency: bool,
    },
    Placeholder,
}

/// Registry of chart slots on one page
pub struct ChartRegistry<B: ChartBackend> {
    backend: B,
    slots: HashMap<String, SlotState<B::Handle>>,
}

impl<B: ChartBackend> ChartRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slots: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn status(&self, slot: &str) -> SlotStatus {
        match self.slots.get(slot) {
            None => SlotStatus::Absent,
            Some(SlotState::Live { mode, .. }) => SlotStatus::Live(*mode),
            Some(SlotState::Placeholder) => SlotStatus::Placeholder,
        }
    }

    /// Slots holding a live instance
    pub fn live_slots(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|(slot, state)| match state {
            SlotState::Live { .. } => Some(slot.as_str()),
            SlotState::Placeholder => None,
        })
    }

    /// Render or update a slot for `mode`
    pub fn render(
        &mut self,
        slot: &str,
        descriptor: &ChartDescriptor,
        projector: &CurrencyProjector,
        mode: CurrencyMode,
    ) -> RenderOutcome {
        let mode = if descriptor.currency {
            projector.effective_mode(mode)
        } else {
            CurrencyMode::Base
        };

        match self.slots.get(slot) {
            Some(SlotState::Placeholder) => return RenderOutcome::Unchanged,
            Some(SlotState::Live {
                mode: current,
                currency,
                ..
            }) => {
                if !*currency || *current == mode {
                    return RenderOutcome::Unchanged;
                }
            }
            None => {
                if !self.backend.has_surface(&descriptor.surface) {
                    tracing::debug!(slot, surface = %descriptor.surface, "Chart surface missing");
                    return RenderOutcome::Skipped;
                }

                if descriptor.is_empty() {
                    self.backend
                        .show_placeholder(&descriptor.surface, &descriptor.empty_message);
                    self.slots.insert(slot.to_string(), SlotState::Placeholder);
                    tracing::info!(slot, "No chart data, placeholder shown");
                    return RenderOutcome::PlaceholderShown;
                }
            }
        }

        let replaced = match self.slots.remove(slot) {
            Some(SlotState::Live { handle, .. }) => {
                self.backend.destroy(handle);
                true
            }
            _ => false,
        };

        let spec = descriptor.project(projector, mode);
        match self.backend.create(&spec) {
            Some(handle) => {
                self.slots.insert(
                    slot.to_string(),
                    SlotState::Live {
                        handle,
                        mode,
                        currency: descriptor.currency,
                    },
                );
                tracing::debug!(slot, ?mode, replaced, "Chart rendered");
                if replaced {
                    RenderOutcome::Recreated
                } else {
                    RenderOutcome::Created
                }
            }
            None => {
                tracing::warn!(slot, "Backend could not create chart");
                RenderOutcome::Skipped
            }
        }
    }

    /// Destroy a live slot; the slot becomes absent again.
    ///
    /// Placeholders stay in place. Returns whether an instance was released.
    pub fn destroy(&mut self, slot: &str) -> bool {
        if !matches!(self.slots.get(slot), Some(SlotState::Live { .. })) {
            return false;
        }
        match self.slots.remove(slot) {
            Some(SlotState::Live { handle, .. }) => {
                self.backend.destroy(handle);
                true
            }
            _ => false,
        }
    }

    /// Destroy every live slot
    pub fn destroy_all(&mut self) -> usize {
        let live: Vec<String> = self.live_slots().map(str::to_string).collect();
        live.iter().filter(|slot| self.destroy(slot)).count()
    }
}

impl<B: ChartBackend> Drop for ChartRegistry<B> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, SeriesDescriptor, SnapshotBackend};
    use crate::currency::{CurrencySettings, ExchangeRate};

    fn descriptor(values: Vec<f64>, currency: bool) -> ChartDescriptor {
        ChartDescriptor {
            surface: "canvas".to_string(),
            kind: ChartKind::Bar,
            labels: vec!["Jan".to_string(); values.len()],
            series: vec![SeriesDescriptor {
                label: "Факт".to_string(),
                kind: ChartKind::Bar,
                color: "#000".to_string(),
                values,
            }],
            currency,
            empty_message: "empty".to_string(),
        }
    }

    fn projector() -> CurrencyProjector {
        CurrencyProjector::new(ExchangeRate::new(100.0), CurrencySettings::default())
    }

    #[test]
    fn test_create_then_unchanged() {
        let mut registry = ChartRegistry::new(SnapshotBackend::open());
        let d = descriptor(vec![1000.0], true);
        let p = projector();

        assert_eq!(registry.render("s", &d, &p, CurrencyMode::Base), RenderOutcome::Created);
        assert_eq!(registry.render("s", &d, &p, CurrencyMode::Base), RenderOutcome::Unchanged);
        assert_eq!(registry.status("s"), SlotStatus::Live(CurrencyMode::Base));
        assert_eq!(registry.backend().created(), 1);
    }

    #[test]
    fn test_mode_change_recreates_currency_chart() {
        let mut registry = ChartRegistry::new(SnapshotBackend::open());
        let d = descriptor(vec![1000.0], true);
        let p = projector();

        registry.render("s", &d, &p, CurrencyMode::Base);
        assert_eq!(
            registry.render("s", &d, &p, CurrencyMode::Secondary),
            RenderOutcome::Recreated
        );
        let backend = registry.backend();
        assert_eq!(backend.destroyed(), 1);
        assert_eq!(backend.live_count(), 1);
        assert_eq!(backend.chart("canvas").unwrap().datasets[0].values, [10.0]);
    }

    #[test]
    fn test_non_currency_never_recreated() {
        let mut registry = ChartRegistry::new(SnapshotBackend::open());
        let d = descriptor(vec![3.0], false);
        let p = projector();

        registry.render("s", &d, &p, CurrencyMode::Base);
        assert_eq!(
            registry.render("s", &d, &p, CurrencyMode::Secondary),
            RenderOutcome::Unchanged
        );
        assert_eq!(registry.backend().destroyed(), 0);
    }

    #[test]
    fn test_placeholder_is_terminal() {
        let mut registry = ChartRegistry::new(SnapshotBackend::open());
        let d = descriptor(Vec::new(), true);
        let p = projector();

        assert_eq!(
            registry.render("s", &d, &p, CurrencyMode::Base),
            RenderOutcome::PlaceholderShown
        );
        for _ in 0..3 {
            assert_eq!(
                registry.render("s", &d, &p, CurrencyMode::Secondary),
                RenderOutcome::Unchanged
            );
        }
        assert_eq!(registry.status("s"), SlotStatus::Placeholder);
        assert_eq!(registry.backend().created(), 0);
        assert_eq!(registry.backend().placeholders_shown(), 1);
        assert!(!registry.destroy("s"));
    }

    #[test]
    fn test_missing_surface_skips() {
        let mut registry = ChartRegistry::new(SnapshotBackend::with_surfaces(["other"]));
        let d = descriptor(vec![1.0], true);
        assert_eq!(
            registry.render("s", &d, &projector(), CurrencyMode::Base),
            RenderOutcome::Skipped
        );
        assert_eq!(registry.status("s"), SlotStatus::Absent);
    }

    #[test]
    fn test_destroy_all() {
        let mut registry = ChartRegistry::new(SnapshotBackend::open());
        let p = projector();
        let mut a = descriptor(vec![1.0], true);
        a.surface = "a".to_string();
        let mut b = descriptor(vec![2.0], false);
        b.surface = "b".to_string();

        registry.render("a", &a, &p, CurrencyMode::Base);
        registry.render("b", &b, &p, CurrencyMode::Base);
        assert_eq!(registry.destroy_all(), 2);
        assert_eq!(registry.backend().live_count(), 0);
        assert_eq!(registry.status("a"), SlotStatus::Absent);
    }
}
