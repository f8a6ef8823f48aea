use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// How the position tracker maps a scroll offset to a section index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionLayout {
    /// Every section is exactly one viewport tall
    #[default]
    FullPage,
    /// Sections may differ in height; nearest offset wins
    Variable,
}

/// Tuning for the input arbiter.
///
/// The thresholds are empirical. They are exposed here so they can be
/// validated against real trackpads and mice rather than baked in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Wheel events with a smaller absolute delta are treated as noise
    #[serde(default = "default_wheel_deadzone")]
    pub wheel_deadzone: f64,
    /// Window after a committed transition during which wheel input is dropped
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Scroll inactivity required before a native scroll is considered finished
    #[serde(default = "default_scroll_debounce_ms")]
    pub scroll_debounce_ms: u64,
    /// Distance from a section start below which no snap is performed
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
    /// Delay before the initial fragment jump, to let layout settle
    #[serde(default = "default_deep_link_delay_ms")]
    pub deep_link_delay_ms: u64,
    /// Section geometry model used by the position tracker
    #[serde(default)]
    pub layout: SectionLayout,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            wheel_deadzone: default_wheel_deadzone(),
            cooldown_ms: default_cooldown_ms(),
            scroll_debounce_ms: default_scroll_debounce_ms(),
            snap_tolerance: default_snap_tolerance(),
            deep_link_delay_ms: default_deep_link_delay_ms(),
            layout: SectionLayout::default(),
        }
    }
}

impl NavigationConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn deep_link_delay(&self) -> Duration {
        Duration::from_millis(self.deep_link_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate transitions instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Transition duration in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Frame rate while a transition is in flight
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Wheel delta reported for one mouse wheel notch
    #[serde(default = "default_wheel_notch_delta")]
    pub wheel_notch_delta: f64,
    /// Show dot indicators and arrows
    #[serde(default = "default_true")]
    pub show_indicators: bool,
    /// Transition animation settings
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            wheel_notch_delta: default_wheel_notch_delta(),
            show_indicators: default_true(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "G", "<C-e>" (Ctrl+e), "<S-Tab>" (Shift+Tab), "<Space>", "<PageDown>"
/// Each action accepts several keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Advance to the next section
    #[serde(default = "default_key_next")]
    pub next: Vec<String>,
    /// Go back to the previous section
    #[serde(default = "default_key_previous")]
    pub previous: Vec<String>,
    /// Jump to the first section
    #[serde(default = "default_key_first")]
    pub first: Vec<String>,
    /// Jump to the last section
    #[serde(default = "default_key_last")]
    pub last: Vec<String>,
    /// Scroll one row down without snapping immediately
    #[serde(default = "default_key_nudge_down")]
    pub nudge_down: Vec<String>,
    /// Scroll one row up without snapping immediately
    #[serde(default = "default_key_nudge_up")]
    pub nudge_up: Vec<String>,
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: Vec<String>,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            next: default_key_next(),
            previous: default_key_previous(),
            first: default_key_first(),
            last: default_key_last(),
            nudge_down: default_key_nudge_down(),
            nudge_up: default_key_nudge_up(),
            quit: default_key_quit(),
        }
    }
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

// Default keymap values (Vim-style notation)
fn default_key_next() -> Vec<String> { keys(&["<Down>", "<PageDown>", "<Space>", "j"]) }
fn default_key_previous() -> Vec<String> { keys(&["<Up>", "<PageUp>", "k"]) }
fn default_key_first() -> Vec<String> { keys(&["<Home>", "g"]) }
fn default_key_last() -> Vec<String> { keys(&["<End>", "G"]) }
fn default_key_nudge_down() -> Vec<String> { keys(&["<C-e>"]) }
fn default_key_nudge_up() -> Vec<String> { keys(&["<C-y>"]) }
fn default_key_quit() -> Vec<String> { keys(&["q"]) }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapdeck")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_wheel_deadzone() -> f64 {
    30.0
}

fn default_cooldown_ms() -> u64 {
    700 // covers one smooth transition plus the tail of a trackpad swipe
}

fn default_scroll_debounce_ms() -> u64 {
    150
}

fn default_snap_tolerance() -> f64 {
    4.0
}

fn default_deep_link_delay_ms() -> u64 {
    100
}

fn default_animation_duration() -> u64 {
    500
}

fn default_animation_fps() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

fn default_wheel_notch_delta() -> f64 {
    100.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaulting when it is absent
    pub fn load_from(config_path: &std::path::Path) -> crate::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path, creating parent directories
    pub fn save_to(&self, config_path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/snapdeck/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("snapdeck")
            .join("config.toml")
    }

    /// Get the log file path used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("snapdeck.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.navigation.cooldown_ms, 700);
        assert_eq!(config.navigation.scroll_debounce_ms, 150);
        assert_eq!(config.navigation.layout, SectionLayout::FullPage);
        assert!(config.ui.scroll.smooth_enabled);
        assert_eq!(config.keymap.first, vec!["<Home>", "g"]);
    }

    #[test]
    fn test_partial_navigation_section() {
        let config = AppConfig::from_toml(
            r#"
            [navigation]
            wheel_deadzone = 12.5
            layout = "variable"

            [ui.scroll]
            animation_fps = 30
            "#,
        )
        .unwrap();
        assert!((config.navigation.wheel_deadzone - 12.5).abs() < f64::EPSILON);
        assert_eq!(config.navigation.layout, SectionLayout::Variable);
        assert_eq!(config.navigation.cooldown(), Duration::from_millis(700));
        assert_eq!(config.ui.scroll.animation_fps, 30);
        assert_eq!(config.ui.scroll.animation_duration_ms, 500);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[navigation\ncooldown_ms = 1").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_round_trip_keeps_keymap() {
        let mut config = AppConfig::default();
        config.keymap.quit = vec!["q".into(), "<Esc>".into()];
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.keymap.quit, vec!["q", "<Esc>"]);
    }

    #[test]
    fn test_save_to_then_load_from() {
        let dir = std::env::temp_dir().join(format!("snapdeck-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.navigation.cooldown_ms = 900;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.navigation.cooldown_ms, 900);
        assert_eq!(
            AppConfig::load_from(&dir.join("missing.toml")).unwrap().navigation.cooldown_ms,
            700
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        let path = PathBuf::from("/var/lib/snapdeck");
        assert_eq!(expand_tilde(&path), path);
    }
}
