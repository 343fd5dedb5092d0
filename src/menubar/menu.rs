//! Menu configuration for the menu bar.
//!
//! Builds a platform-independent description of the dropdown menu from the
//! current cycle state. The macOS code turns it into native items.

use crate::alert::BreakMessage;
use crate::types::{CycleSnapshot, IntervalPreset};

use super::event::MenuItemId;
use super::icon::IconManager;

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Identifier reported on click
    pub id: MenuItemId,
    /// Display text
    pub text: String,
    /// Whether the item is clickable
    pub enabled: bool,
    /// Check mark state; None for plain items
    pub checked: Option<bool>,
}

impl MenuItemConfig {
    /// Creates a plain item.
    pub fn new(id: MenuItemId, text: impl Into<String>, enabled: bool) -> Self {
        Self {
            id,
            text: text.into(),
            enabled,
            checked: None,
        }
    }

    /// Creates an enabled item with a check mark.
    pub fn check(id: MenuItemId, text: impl Into<String>, checked: bool) -> Self {
        Self {
            id,
            text: text.into(),
            enabled: true,
            checked: Some(checked),
        }
    }

    /// Creates a disabled informational line.
    pub fn label(text: impl Into<String>) -> Self {
        Self::new(MenuItemId::Status, text, false)
    }

    /// Returns true if the item shows a check mark.
    pub fn is_checked(&self) -> bool {
        self.checked == Some(true)
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Status line (disabled)
    pub status: MenuItemConfig,
    /// Break message lines, empty outside a break
    pub break_lines: Vec<MenuItemConfig>,
    /// "Got it!", enabled only during a break
    pub acknowledge: MenuItemConfig,
    /// "Take a Break Now", enabled only while working
    pub take_break: MenuItemConfig,
    /// "Set Reminder Interval" submenu entries
    pub intervals: Vec<MenuItemConfig>,
    /// "Sound" submenu entries
    pub sounds: Vec<MenuItemConfig>,
    /// "Play Sound" mute toggle, first entry of the sound submenu
    pub play_sound: MenuItemConfig,
    pub notifications: MenuItemConfig,
    pub notification_settings: MenuItemConfig,
    pub launch_at_login: MenuItemConfig,
    pub about: MenuItemConfig,
    pub quit: MenuItemConfig,
}

impl MenuConfig {
    /// Title of the interval submenu.
    pub const INTERVAL_SUBMENU: &'static str = "Set Reminder Interval";
    /// Title of the sound submenu.
    pub const SOUND_SUBMENU: &'static str = "Sound";
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds [`MenuConfig`]s.
#[derive(Debug, Default)]
pub struct MenuBuilder {
    sound_names: Vec<String>,
}

impl MenuBuilder {
    /// Creates a builder offering the given sounds.
    pub fn new(sound_names: Vec<String>) -> Self {
        Self { sound_names }
    }

    /// Returns the sounds offered in the menu.
    pub fn sound_names(&self) -> &[String] {
        &self.sound_names
    }

    /// Builds the menu for the current state.
    pub fn build(
        &self,
        snapshot: &CycleSnapshot,
        break_message: Option<&BreakMessage>,
        launch_at_login: bool,
    ) -> MenuConfig {
        let in_break = snapshot.is_break();

        let break_lines = match break_message {
            Some(message) if in_break => message.lines().map(MenuItemConfig::label).collect(),
            _ => Vec::new(),
        };

        MenuConfig {
            status: MenuItemConfig::label(Self::status_text(snapshot)),
            break_lines,
            acknowledge: MenuItemConfig::new(MenuItemId::Acknowledge, "Got it!", in_break),
            take_break: MenuItemConfig::new(
                MenuItemId::TakeBreak,
                "Take a Break Now",
                snapshot.running && !in_break,
            ),
            intervals: self.build_interval_items(snapshot),
            sounds: self.build_sound_items(snapshot),
            play_sound: MenuItemConfig::check(
                MenuItemId::PlaySound,
                "Play Sound",
                snapshot.sound_enabled,
            ),
            notifications: MenuItemConfig::check(
                MenuItemId::Notifications,
                "Notifications",
                snapshot.notifications_enabled,
            ),
            notification_settings: MenuItemConfig::new(
                MenuItemId::NotificationSettings,
                "Notification Settings",
                true,
            ),
            launch_at_login: MenuItemConfig::check(
                MenuItemId::LaunchAtLogin,
                "Launch at Login",
                launch_at_login,
            ),
            about: MenuItemConfig::new(MenuItemId::About, "About EyesOff", true),
            quit: MenuItemConfig::new(MenuItemId::Quit, "Quit", true),
        }
    }

    fn status_text(snapshot: &CycleSnapshot) -> String {
        if snapshot.is_break() {
            format!(
                "Break: {} left",
                IconManager::format_time(snapshot.remaining_seconds)
            )
        } else if snapshot.running {
            format!(
                "Reminding every {}",
                describe_interval(snapshot.work_interval_seconds)
            )
        } else {
            "Paused".to_string()
        }
    }

    fn build_interval_items(&self, snapshot: &CycleSnapshot) -> Vec<MenuItemConfig> {
        let current = IntervalPreset::from_seconds(snapshot.work_interval_seconds);

        IntervalPreset::ALL
            .into_iter()
            .map(|preset| {
                MenuItemConfig::check(
                    MenuItemId::Interval(preset),
                    preset.label(),
                    current == Some(preset),
                )
            })
            .collect()
    }

    fn build_sound_items(&self, snapshot: &CycleSnapshot) -> Vec<MenuItemConfig> {
        self.sound_names
            .iter()
            .map(|name| {
                MenuItemConfig::check(
                    MenuItemId::Sound(name.clone()),
                    name.as_str(),
                    *name == snapshot.selected_sound_name,
                )
            })
            .collect()
    }
}

/// Describes an interval in words: "20 minutes", "1 minute", "45 seconds".
pub fn describe_interval(seconds: u64) -> String {
    match seconds {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}

// ============================================================================
// Tests
// ============================================================================
