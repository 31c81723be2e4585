//! In-memory chart backend
//!
//! Records chart specs instead of drawing them. Used by the CLI to print
//! what a page would show, and by tests to observe registry behavior.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::backend::ChartBackend;
use super::descriptor::ChartSpec;

/// Handle to a recorded chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHandle {
    id: u64,
    surface: String,
}

/// Serializable view of everything currently on the page
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotView {
    pub charts: BTreeMap<String, ChartSpec>,
    pub placeholders: BTreeMap<String, String>,
    pub created: usize,
    pub destroyed: usize,
}

/// Chart backend keeping specs in memory
#[derive(Debug, Default)]
pub struct SnapshotBackend {
    /// Surfaces present on the page; `None` means every surface exists
    surfaces: Option<BTreeSet<String>>,
    live: BTreeMap<String, (u64, ChartSpec)>,
    placeholders: BTreeMap<String, String>,
    next_id: u64,
    created: usize,
    destroyed: usize,
    placeholders_shown: usize,
}

impl SnapshotBackend {
    /// Backend where every surface exists
    pub fn open() -> Self {
        Self::default()
    }

    /// Backend with a fixed set of surfaces
    pub fn with_surfaces<I, S>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            surfaces: Some(surfaces.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Live chart on a surface
    pub fn chart(&self, surface: &str) -> Option<&ChartSpec> {
        self.live.get(surface).map(|(_, spec)| spec)
    }

    pub fn placeholder(&self, surface: &str) -> Option<&str> {
        self.placeholders.get(surface).map(String::as_str)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub fn placeholders_shown(&self) -> usize {
        self.placeholders_shown
    }

    pub fn view(&self) -> SnapshotView {
        SnapshotView {
            charts: self
                .live
                .iter()
                .map(|(surface, (_, spec))| (surface.clone(), spec.clone()))
                .collect(),
            placeholders: self.placeholders.clone(),
            created: self.created,
            destroyed: self.destroyed,
        }
    }
}

impl ChartBackend for SnapshotBackend {
    type Handle = SnapshotHandle;

    fn has_surface(&self, surface: &str) -> bool {
        match &self.surfaces {
            Some(surfaces) => surfaces.contains(surface),
            None => true,
        }
    }

    fn create(&mut self, spec: &ChartSpec) -> Option<SnapshotHandle> {
        if !self.has_surface(&spec.surface) || self.placeholders.contains_key(&spec.surface) {
            return None;
        }

        // One live chart per surface
        if self.live.contains_key(&spec.surface) {
            tracing::warn!(surface = %spec.surface, "Surface already holds a chart");
            return None;
        }

        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(spec.surface.clone(), (id, spec.clone()));
        self.created += 1;
        Some(SnapshotHandle {
            id,
            surface: spec.surface.clone(),
        })
    }

    fn destroy(&mut self, handle: SnapshotHandle) {
        let owned = matches!(self.live.get(&handle.surface), Some((id, _)) if *id == handle.id);
        if owned {
            self.live.remove(&handle.surface);
            self.destroyed += 1;
        }
    }

    fn show_placeholder(&mut self, surface: &str, message: &str) {
        self.placeholders
            .insert(surface.to_string(), message.to_string());
        self.placeholders_shown += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::currency::{CurrencyMode, NumberLocale, ValueFormatter};

    fn spec(surface: &str) -> ChartSpec {
        ChartSpec {
            surface: surface.to_string(),
            kind: ChartKind::Line,
            labels: Vec::new(),
            datasets: Vec::new(),
            mode: CurrencyMode::Base,
            formatter: ValueFormatter::plain(NumberLocale::Ru),
        }
    }

    #[test]
    fn test_refuses_second_chart_on_surface() {
        let mut backend = SnapshotBackend::open();
        let first = backend.create(&spec("a")).unwrap();
        assert!(backend.create(&spec("a")).is_none());

        backend.destroy(first);
        assert!(backend.create(&spec("a")).is_some());
        assert_eq!(backend.created(), 2);
        assert_eq!(backend.destroyed(), 1);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut backend = SnapshotBackend::open();
        let first = backend.create(&spec("a")).unwrap();
        let stale = first.clone();
        backend.destroy(first);
        backend.create(&spec("a")).unwrap();

        backend.destroy(stale);
        assert_eq!(backend.live_count(), 1);
    }

    #[test]
    fn test_placeholder_blocks_surface() {
        let mut backend = SnapshotBackend::with_surfaces(["a"]);
        backend.show_placeholder("a", "Нет данных");
        assert_eq!(backend.placeholder("a"), Some("Нет данных"));
        assert!(backend.create(&spec("a")).is_none());
        assert!(!backend.has_surface("b"));
    }
}
