use crate::change::{Change, Notifier};

/// Presentation preferences that persist with the wardrobe.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    dark_mode: bool,
    notifier: Notifier,
}

impl Preferences {
    pub fn new(dark_mode: bool, notifier: Notifier) -> Self {
        Self {
            dark_mode,
            notifier,
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Setting the current value again is not a change.
    pub fn set_dark_mode(&mut self, on: bool) {
        if self.dark_mode != on {
            self.dark_mode = on;
            self.notifier.emit(Change::Preferences);
        }
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }
}
