//! Menu item identifiers, user actions and tray updates.
//!
//! Everything here is platform-independent. On macOS the string form of a
//! [`MenuItemId`] is used as the native menu item id, so a click event can
//! be mapped straight back to a [`MenuAction`].

use std::fmt;

use crate::alert::BreakMessage;
use crate::types::{CycleSnapshot, IntervalPreset};

// ============================================================================
// MenuAction
// ============================================================================

/// What the user asked for from the menu bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// End the current break now ("Got it!")
    Acknowledge,
    /// Start a break immediately
    TakeBreak,
    /// Switch to another work interval
    SetInterval(IntervalPreset),
    /// Select another alert sound
    SelectSound(String),
    /// Mute or unmute the alert sound
    ToggleSound,
    /// Turn notifications on or off
    ToggleNotifications,
    /// Open the system notification preferences
    OpenNotificationSettings,
    /// Install or remove the login item
    ToggleLaunchAtLogin,
    /// Show version information
    ShowAbout,
    /// Quit EyesOff
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Acknowledge => write!(f, "acknowledge"),
            MenuAction::TakeBreak => write!(f, "take-break"),
            MenuAction::SetInterval(preset) => write!(f, "set-interval({})", preset.minutes()),
            MenuAction::SelectSound(name) => write!(f, "select-sound({name})"),
            MenuAction::ToggleSound => write!(f, "toggle-sound"),
            MenuAction::ToggleNotifications => write!(f, "toggle-notifications"),
            MenuAction::OpenNotificationSettings => write!(f, "notification-settings"),
            MenuAction::ToggleLaunchAtLogin => write!(f, "toggle-launch-at-login"),
            MenuAction::ShowAbout => write!(f, "about"),
            MenuAction::Quit => write!(f, "quit"),
        }
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for menu items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    /// Status line (disabled)
    Status,
    /// "Got it!"
    Acknowledge,
    /// "Take a Break Now"
    TakeBreak,
    /// One entry of the interval submenu
    Interval(IntervalPreset),
    /// One entry of the sound submenu
    Sound(String),
    /// "Play Sound" toggle
    PlaySound,
    /// "Notifications" toggle
    Notifications,
    /// "Notification Settings…"
    NotificationSettings,
    /// "Launch at Login" toggle
    LaunchAtLogin,
    /// "About EyesOff"
    About,
    /// "Quit"
    Quit,
    /// Unknown or unhandled menu item
    Unknown,
}

const INTERVAL_PREFIX: &str = "interval:";
const SOUND_PREFIX: &str = "sound:";

impl MenuItemId {
    /// Returns the string used as native menu item id.
    pub fn as_id(&self) -> String {
        match self {
            MenuItemId::Status => "status".to_string(),
            MenuItemId::Acknowledge => "acknowledge".to_string(),
            MenuItemId::TakeBreak => "take_break".to_string(),
            MenuItemId::Interval(preset) => format!("{INTERVAL_PREFIX}{}", preset.minutes()),
            MenuItemId::Sound(name) => format!("{SOUND_PREFIX}{name}"),
            MenuItemId::PlaySound => "play_sound".to_string(),
            MenuItemId::Notifications => "notifications".to_string(),
            MenuItemId::NotificationSettings => "notification_settings".to_string(),
            MenuItemId::LaunchAtLogin => "launch_at_login".to_string(),
            MenuItemId::About => "about".to_string(),
            MenuItemId::Quit => "quit".to_string(),
            MenuItemId::Unknown => "unknown".to_string(),
        }
    }

    /// Parses a native menu item id.
    pub fn parse(id: &str) -> Self {
        if let Some(minutes) = id.strip_prefix(INTERVAL_PREFIX) {
            return minutes
                .parse()
                .ok()
                .and_then(IntervalPreset::from_minutes)
                .map_or(MenuItemId::Unknown, MenuItemId::Interval);
        }
        if let Some(name) = id.strip_prefix(SOUND_PREFIX) {
            return if name.is_empty() {
                MenuItemId::Unknown
            } else {
                MenuItemId::Sound(name.to_string())
            };
        }

        match id {
            "status" => MenuItemId::Status,
            "acknowledge" => MenuItemId::Acknowledge,
            "take_break" => MenuItemId::TakeBreak,
            "play_sound" => MenuItemId::PlaySound,
            "notifications" => MenuItemId::Notifications,
            "notification_settings" => MenuItemId::NotificationSettings,
            "launch_at_login" => MenuItemId::LaunchAtLogin,
            "about" => MenuItemId::About,
            "quit" => MenuItemId::Quit,
            _ => MenuItemId::Unknown,
        }
    }

    /// Converts a menu item ID to the corresponding action.
    ///
    /// Returns `None` for informational items.
    pub fn to_action(&self) -> Option<MenuAction> {
        match self {
            MenuItemId::Acknowledge => Some(MenuAction::Acknowledge),
            MenuItemId::TakeBreak => Some(MenuAction::TakeBreak),
            MenuItemId::Interval(preset) => Some(MenuAction::SetInterval(*preset)),
            MenuItemId::Sound(name) => Some(MenuAction::SelectSound(name.clone())),
            MenuItemId::PlaySound => Some(MenuAction::ToggleSound),
            MenuItemId::Notifications => Some(MenuAction::ToggleNotifications),
            MenuItemId::NotificationSettings => Some(MenuAction::OpenNotificationSettings),
            MenuItemId::LaunchAtLogin => Some(MenuAction::ToggleLaunchAtLogin),
            MenuItemId::About => Some(MenuAction::ShowAbout),
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::Status | MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Turns menu clicks into actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Maps a raw native menu id to an action.
    pub fn handle_click(&self, raw_id: &str) -> Option<MenuAction> {
        let action = MenuItemId::parse(raw_id).to_action();

        match &action {
            Some(action) => tracing::debug!(action = %action, "menu action"),
            None => tracing::trace!(id = raw_id, "menu click without action"),
        }

        action
    }
}

// ============================================================================
// TrayUpdate
// ============================================================================

/// Updates sent to the tray icon over a crossbeam channel.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// New cycle state; title and menu are rebuilt as needed
    Refresh(CycleSnapshot),
    /// A break alert was raised
    ShowBreak {
        message: BreakMessage,
        remaining_seconds: u32,
    },
    /// The break countdown changed
    Countdown(u32),
    /// The break alert was dismissed
    HideBreak,
    /// Remove the tray icon
    Shutdown,
}

// ============================================================================
// Tests
// ============================================================================
