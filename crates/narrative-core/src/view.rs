//! View mode selection.
//!
//! Two independent pieces of state compose the visible mode: the view the user last picked and
//! an external "show diff" override. The override wins while it is set but never overwrites the
//! remembered choice.

/// The three editor views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Editable buffer with suggestion overlays.
    #[default]
    Edit,
    /// Read-only rendering of the buffer.
    Preview,
    /// Side-by-side original vs. enhanced.
    Diff,
}

impl ViewMode {
    /// All views, in toolbar order.
    pub const ALL: [Self; 3] = [Self::Edit, Self::Preview, Self::Diff];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Preview => "preview",
            Self::Diff => "diff",
        }
    }
}

/// Remembered view plus the external diff override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    preferred: ViewMode,
    show_diff: bool,
}

impl ViewState {
    /// Start in [`ViewMode::Edit`] with the override off.
    pub fn new() -> Self {
        Self::default()
    }

    /// The view currently rendered.
    pub fn current(&self) -> ViewMode {
        if self.show_diff {
            ViewMode::Diff
        } else {
            self.preferred
        }
    }

    /// The last view the user picked.
    pub fn preferred(&self) -> ViewMode {
        self.preferred
    }

    /// Whether the external diff override is on.
    pub fn show_diff(&self) -> bool {
        self.show_diff
    }

    /// Record the user's choice. Returns `true` if the preference changed.
    pub fn select(&mut self, mode: ViewMode) -> bool {
        let changed = self.preferred != mode;
        self.preferred = mode;
        changed
    }

    /// Set the override. Returns `true` if it changed.
    pub fn set_show_diff(&mut self, show_diff: bool) -> bool {
        let changed = self.show_diff != show_diff;
        self.show_diff = show_diff;
        changed
    }

    /// Flip the override.
    pub fn toggle_show_diff(&mut self) {
        self.show_diff = !self.show_diff;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_keeps_preference() {
        let mut view = ViewState::new();
        view.select(ViewMode::Preview);
        view.set_show_diff(true);
        assert_eq!(view.current(), ViewMode::Diff);

        view.select(ViewMode::Edit);
        assert_eq!(view.current(), ViewMode::Diff);
        assert_eq!(view.preferred(), ViewMode::Edit);

        view.toggle_show_diff();
        assert_eq!(view.current(), ViewMode::Edit);
    }
}
