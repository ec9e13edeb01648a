//! UI presentation mode derived from the aggregate tracking signal.

/// Which guidance the UI layer should show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayMode {
    /// Nothing tracked: show the fit-to-scan guide, hide the reset button.
    #[default]
    FindImage,
    /// At least one image tracked: hide the guide, offer the reset button.
    ShowingContent,
}

impl OverlayMode {
    pub fn from_tracking(tracking: bool) -> Self {
        if tracking {
            OverlayMode::ShowingContent
        } else {
            OverlayMode::FindImage
        }
    }

    pub fn fit_to_scan_visible(self) -> bool {
        self == OverlayMode::FindImage
    }

    pub fn reset_button_visible(self) -> bool {
        self == OverlayMode::ShowingContent
    }
}
