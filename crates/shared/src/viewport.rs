use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which user interactions the map accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureSettings {
    pub drag_pan: bool,
    pub scroll_zoom: bool,
    pub double_click_zoom: bool,
    pub touch_zoom: bool,
    pub keyboard: bool,
    pub drag_rotate: bool,
    pub navigation_control: bool,
    pub scale_control: bool,
    /// Whether this call flipped the mode.
    #[serde(skip)]
    pub changed: bool,
}

impl GestureSettings {
    pub fn all(enabled: bool) -> Self {
        Self {
            drag_pan: enabled,
            scroll_zoom: enabled,
            double_click_zoom: enabled,
            touch_zoom: enabled,
            keyboard: enabled,
            drag_rotate: enabled,
            navigation_control: enabled,
            scale_control: enabled,
            changed: false,
        }
    }
}

/// Story mode locks the map; explore mode hands it to the user.
#[derive(Debug, Clone, Default)]
pub struct ViewportModeController {
    explore: bool,
}

impl ViewportModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_explore(&self) -> bool {
        self.explore
    }

    pub fn current(&self) -> GestureSettings {
        GestureSettings::all(self.explore)
    }

    pub fn apply(&mut self, explore: bool) -> GestureSettings {
        let changed = self.explore != explore;
        if changed {
            debug!(explore, "Viewport gestures switched");
        }
        self.explore = explore;
        GestureSettings {
            changed,
            ..GestureSettings::all(explore)
        }
    }
}
