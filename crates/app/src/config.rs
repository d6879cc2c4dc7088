//! Application configuration and UI link selection

use atelier_config::ViewportSettings;
use bevy::prelude::*;

/// Environment variable selecting how an external UI attaches
pub const UI_LINK_ENV_VAR: &str = "ATELIER_UI";

/// How UI panels talk to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiLinkMode {
    /// No external UI; outbound messages are only logged
    #[default]
    Headless,
    /// JSON lines: `UiToEditor` on stdin, `EditorToUi` on stdout
    Stdio,
}

impl UiLinkMode {
    /// Parse from environment variable ATELIER_UI
    pub fn from_env() -> Self {
        Self::parse(std::env::var(UI_LINK_ENV_VAR).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("stdio") => Self::Stdio,
            Some("headless") | None => Self::Headless,
            Some(other) => {
                warn!("Unknown {} value '{}', running headless", UI_LINK_ENV_VAR, other);
                Self::Headless
            }
        }
    }
}

/// Application configuration resource
#[derive(Resource, Clone)]
pub struct AtelierConfig {
    pub ui_link: UiLinkMode,
}

impl Default for AtelierConfig {
    fn default() -> Self {
        Self {
            ui_link: UiLinkMode::from_env(),
        }
    }
}

/// Viewport settings from ATELIER_SETTINGS, or the defaults if unset or unreadable
pub fn load_viewport_settings() -> ViewportSettings {
    match ViewportSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load viewport settings, using defaults: {}", e);
            ViewportSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_link_parsing() {
        assert_eq!(UiLinkMode::parse(Some("stdio")), UiLinkMode::Stdio);
        assert_eq!(UiLinkMode::parse(None), UiLinkMode::Headless);
        assert_eq!(UiLinkMode::parse(Some("websocket")), UiLinkMode::Headless);
    }
}
