//! Chart backend seam
//!
//! The registry decides *when* a chart exists; a backend decides how it is
//! drawn. The browser front end draws on canvases, the CLI and tests record
//! specs in memory.

use super::descriptor::ChartSpec;

/// Rendering surface provider
pub trait ChartBackend {
    /// Live chart instance owned by the registry
    type Handle;

    /// Whether the surface exists on the current page
    fn has_surface(&self, surface: &str) -> bool;

    /// Create a chart; `None` when the surface cannot host one
    fn create(&mut self, spec: &ChartSpec) -> Option<Self::Handle>;

    /// Release a chart and everything it holds
    fn destroy(&mut self, handle: Self::Handle);

    /// Replace the surface with a static message
    fn show_placeholder(&mut self, surface: &str, message: &str);
}
