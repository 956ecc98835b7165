//! Presentation settings and preferences
//!
//! Nothing here affects the simulation. Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

/// When to show the on-screen D-pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControllerMode {
    /// Only on touch devices
    #[default]
    Auto,
    Always,
    Never,
}

impl ControllerMode {
    /// Whether the D-pad should be visible on this device
    pub fn visible(&self, touch_device: bool) -> bool {
        match self {
            ControllerMode::Auto => touch_device,
            ControllerMode::Always => true,
            ControllerMode::Never => false,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background grid and player-to-enemy lines
    pub show_debug_overlay: bool,
    /// Health bars above damaged enemies
    pub enemy_health_bars: bool,
    /// Short trails behind projectiles
    pub projectile_trails: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// On-screen D-pad visibility
    pub controller: ControllerMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_debug_overlay: false,
            enemy_health_bars: true,
            projectile_trails: true,
            show_fps: true,
            controller: ControllerMode::Auto,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "survivor_arena_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_visibility() {
        assert!(ControllerMode::Auto.visible(true));
        assert!(!ControllerMode::Auto.visible(false));
        assert!(ControllerMode::Always.visible(false));
        assert!(!ControllerMode::Never.visible(true));
    }

    #[test]
    fn test_old_settings_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "show_debug_overlay": true }"#).unwrap();
        assert!(settings.show_debug_overlay);
        assert!(settings.projectile_trails);
        assert_eq!(settings.controller, ControllerMode::Auto);
    }
}
