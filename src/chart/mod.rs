//! Charts
//!
//! Descriptors built from the payload, the slot registry enforcing one live
//! instance per slot, and the backend seam to a drawing surface.

pub mod backend;
pub mod descriptor;
pub mod registry;
pub mod snapshot;

pub use backend::ChartBackend;
pub use descriptor::{ChartDescriptor, ChartKind, ChartSpec, DatasetSpec, SeriesDescriptor};
pub use registry::{ChartRegistry, RenderOutcome, SlotStatus};
pub use snapshot::{SnapshotBackend, SnapshotHandle, SnapshotView};
