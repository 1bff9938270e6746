//! Presentation seam for drawn overlays.
//!
//! The map host implements [`OverlayPresenter`] and hands it to the
//! [`DrawingCanvas`](crate::DrawingCanvas). The canvas never renders
//! anything itself; it only tells the presenter what changed.

use fieldmap_core::{DrawnFeature, RenderHandle};

use crate::canvas::DrawingPreview;

/// Renders drawn features and the in-progress preview.
pub trait OverlayPresenter: Send {
    /// Draws a finalized feature and returns a handle for later removal.
    fn show_feature(&mut self, feature: &DrawnFeature) -> RenderHandle;

    /// Removes a previously drawn feature.
    fn remove_feature(&mut self, handle: RenderHandle);

    /// Replaces the preview with this one.
    fn show_preview(&mut self, preview: &DrawingPreview);

    fn clear_preview(&mut self);

    /// Toggles the host map's native double-click zoom.
    fn set_double_click_zoom(&mut self, enabled: bool);
}

/// Presenter for headless use: hands out handles and draws nothing.
#[derive(Debug, Default)]
pub struct NullPresenter {
    next_handle: u64,
}

impl NullPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayPresenter for NullPresenter {
    fn show_feature(&mut self, _feature: &DrawnFeature) -> RenderHandle {
        self.next_handle += 1;
        RenderHandle(self.next_handle)
    }

    fn remove_feature(&mut self, _handle: RenderHandle) {}

    fn show_preview(&mut self, _preview: &DrawingPreview) {}

    fn clear_preview(&mut self) {}

    fn set_double_click_zoom(&mut self, _enabled: bool) {}
}
