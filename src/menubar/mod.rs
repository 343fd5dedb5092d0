//! Menu bar UI.
//!
//! - `icon.rs`: title text ("👁️", "👁️ 0:15")
//! - `menu.rs`: menu configuration
//! - `event.rs`: menu ids, actions and [`TrayUpdate`]s
//! - `panel.rs`: floating break panel (macOS)
//! - `dialog.rs`: modal alerts (macOS)
//! - `mod.rs`: [`TrayIconManager`], the native tray icon on macOS
//!
//! The manager runs on the main thread. Other parts of the app never touch
//! it directly; they send [`TrayUpdate`]s over a crossbeam channel and the
//! event loop calls [`TrayIconManager::process_pending_updates`].
//!
//! ```ignore
//! use crossbeam_channel::unbounded;
//! use eyesoff::menubar::{TrayIconManager, TrayUpdate};
//!
//! let (tx, rx) = unbounded();
//! let mut manager = TrayIconManager::new(snapshot, sound_names, rx);
//! manager.initialize()?;
//!
//! tx.send(TrayUpdate::Countdown(15))?;
//! manager.process_pending_updates();
//! ```

pub mod event;
pub mod icon;
pub mod menu;

#[cfg(target_os = "macos")]
mod dialog;
#[cfg(target_os = "macos")]
mod panel;
#[cfg(target_os = "macos")]
mod runloop;

pub use event::{EventHandler, MenuAction, MenuItemId, TrayUpdate};
pub use icon::IconManager;
pub use menu::{describe_interval, MenuBuilder, MenuConfig, MenuItemConfig};

#[cfg(target_os = "macos")]
pub use dialog::show_about_alert;

/// Shows a modal "About EyesOff" alert. There is none here, so this
/// always returns false.
#[cfg(not(target_os = "macos"))]
pub fn show_about_alert(_text: &str) -> bool {
    false
}

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::alert::BreakMessage;
use crate::types::CycleSnapshot;

// ============================================================================
// TrayIconManager
// ============================================================================

/// Owns the tray icon and the break panel and keeps them in sync with the
/// cycle.
///
/// On platforms without a menu bar it keeps the same bookkeeping but draws
/// nothing.
pub struct TrayIconManager {
    icon_manager: IconManager,
    menu_builder: MenuBuilder,
    event_handler: EventHandler,
    snapshot: CycleSnapshot,
    break_message: Option<BreakMessage>,
    launch_at_login: bool,
    title: String,
    update_rx: Receiver<TrayUpdate>,
    initialized: bool,
    menu_dirty: bool,
    panel_shown: bool,
    panel_tx: Sender<MenuAction>,
    panel_rx: Receiver<MenuAction>,
    #[cfg(target_os = "macos")]
    panel: Option<panel::BreakPanel>,
    #[cfg(target_os = "macos")]
    tray_icon: Option<tray_icon::TrayIcon>,
    #[cfg(target_os = "macos")]
    app: Option<objc2::rc::Retained<objc2_app_kit::NSApplication>>,
}

impl TrayIconManager {
    /// Creates a manager. Nothing is drawn until [`initialize`](Self::initialize).
    pub fn new(
        initial: CycleSnapshot,
        sound_names: Vec<String>,
        update_rx: Receiver<TrayUpdate>,
    ) -> Self {
        let mut icon_manager = IconManager::new();
        icon_manager.phase_changed(initial.phase);
        let title = icon_manager.generate_title(&initial);
        let (panel_tx, panel_rx) = unbounded();

        Self {
            icon_manager,
            menu_builder: MenuBuilder::new(sound_names),
            event_handler: EventHandler::new(),
            snapshot: initial,
            break_message: None,
            launch_at_login: false,
            title,
            update_rx,
            initialized: false,
            menu_dirty: false,
            panel_shown: false,
            panel_tx,
            panel_rx,
            #[cfg(target_os = "macos")]
            panel: None,
            #[cfg(target_os = "macos")]
            tray_icon: None,
            #[cfg(target_os = "macos")]
            app: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Last state received.
    pub fn snapshot(&self) -> &CycleSnapshot {
        &self.snapshot
    }

    /// Title currently shown.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Message of the break in progress, if any.
    pub fn break_message(&self) -> Option<&BreakMessage> {
        self.break_message.as_ref()
    }

    /// Returns true while the break panel should be on screen.
    pub fn is_panel_shown(&self) -> bool {
        self.panel_shown
    }

    /// Sender for clicks on the break panel; they come back out of
    /// [`poll_action`](Self::poll_action).
    pub fn panel_action_sender(&self) -> Sender<MenuAction> {
        self.panel_tx.clone()
    }

    pub fn launch_at_login(&self) -> bool {
        self.launch_at_login
    }

    /// Updates the "Launch at Login" check mark.
    pub fn set_launch_at_login(&mut self, enabled: bool) {
        if self.launch_at_login != enabled {
            self.launch_at_login = enabled;
            self.menu_dirty = true;
        }
    }

    pub fn generate_title(&self) -> String {
        self.icon_manager.generate_title(&self.snapshot)
    }

    pub fn generate_menu_config(&self) -> MenuConfig {
        self.menu_builder.build(
            &self.snapshot,
            self.break_message.as_ref(),
            self.launch_at_login,
        )
    }

    /// Applies every queued update and rebuilds the menu once if needed.
    ///
    /// Returns the number of updates processed.
    pub fn process_pending_updates(&mut self) -> usize {
        let mut processed = 0;

        loop {
            match self.update_rx.try_recv() {
                Ok(update) => {
                    self.handle_update(update);
                    processed += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("tray update channel closed");
                    break;
                }
            }
        }

        if self.menu_dirty && self.initialized {
            self.rebuild_menu();
        }

        processed
    }

    fn handle_update(&mut self, update: TrayUpdate) {
        match update {
            TrayUpdate::Refresh(snapshot) => {
                let phase_changed = self.icon_manager.phase_changed(snapshot.phase);
                let settings_changed = snapshot.work_interval_seconds
                    != self.snapshot.work_interval_seconds
                    || snapshot.selected_sound_name != self.snapshot.selected_sound_name
                    || snapshot.notifications_enabled != self.snapshot.notifications_enabled
                    || snapshot.sound_enabled != self.snapshot.sound_enabled
                    || snapshot.running != self.snapshot.running;

                self.snapshot = snapshot;
                if !self.snapshot.is_break() {
                    self.break_message = None;
                    self.hide_panel();
                }
                self.set_title(self.generate_title());
                self.menu_dirty |= phase_changed || settings_changed;
            }
            TrayUpdate::ShowBreak {
                message,
                remaining_seconds,
            } => {
                self.show_panel(&message, remaining_seconds);
                self.break_message = Some(message);
                self.snapshot.remaining_seconds = remaining_seconds;
                self.set_title(IconManager::countdown_title(remaining_seconds));
                self.menu_dirty = true;
            }
            TrayUpdate::Countdown(remaining_seconds) => {
                // Title only: rebuilding every second would close an open menu.
                self.snapshot.remaining_seconds = remaining_seconds;
                self.set_title(IconManager::countdown_title(remaining_seconds));

                #[cfg(target_os = "macos")]
                if let Some(panel) = &self.panel {
                    panel.set_remaining(remaining_seconds);
                }
            }
            TrayUpdate::HideBreak => {
                self.break_message = None;
                self.hide_panel();
                self.menu_dirty = true;
            }
            TrayUpdate::Shutdown => {
                tracing::info!("removing menu bar icon");
                self.shutdown();
            }
        }
    }

    fn set_title(&mut self, title: String) {
        if title == self.title {
            return;
        }
        tracing::trace!(title = %title, "menu bar title");

        #[cfg(target_os = "macos")]
        if let Some(tray_icon) = &self.tray_icon {
            tray_icon.set_title(Some(&title));
        }

        self.title = title;
    }

    fn show_panel(&mut self, message: &BreakMessage, remaining_seconds: u32) {
        self.panel_shown = true;

        #[cfg(target_os = "macos")]
        if let Some(panel) = &self.panel {
            panel.show(message, remaining_seconds);
        }
        #[cfg(not(target_os = "macos"))]
        let _ = (message, remaining_seconds);
    }

    fn hide_panel(&mut self) {
        if !self.panel_shown {
            return;
        }
        self.panel_shown = false;

        #[cfg(target_os = "macos")]
        if let Some(panel) = &self.panel {
            panel.hide();
        }
    }

    /// Returns the next action from the break panel or the menu.
    #[cfg(target_os = "macos")]
    pub fn poll_action(&self) -> Option<MenuAction> {
        use tray_icon::menu::MenuEvent;

        if let Ok(action) = self.panel_rx.try_recv() {
            tracing::debug!(action = %action, "panel action");
            return Some(action);
        }
        while let Ok(event) = MenuEvent::receiver().try_recv() {
            if let Some(action) = self.event_handler.handle_click(&event.id.0) {
                return Some(action);
            }
        }
        None
    }

    /// Returns the next action from the break panel.
    #[cfg(not(target_os = "macos"))]
    pub fn poll_action(&self) -> Option<MenuAction> {
        let _ = &self.event_handler;
        self.panel_rx.try_recv().ok()
    }

    /// Dispatches pending window-server events (macOS only).
    pub fn pump(&self) {
        #[cfg(target_os = "macos")]
        if let Some(app) = &self.app {
            runloop::pump_events(app);
        }
    }

    /// Removes the tray icon and the break panel.
    pub fn shutdown(&mut self) {
        self.hide_panel();
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            self.panel = None;
            self.tray_icon = None;
        }
    }

    /// Creates the tray icon and the break panel. Must run on the main
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        self.app = runloop::prepare_app();
        self.panel = objc2::MainThreadMarker::new()
            .map(|mtm| panel::BreakPanel::new(mtm, self.panel_tx.clone()));

        let menu = build_native_menu(&self.generate_menu_config())?;
        let tray_icon = TrayIconBuilder::new()
            .with_title(&self.title)
            .with_menu(Box::new(menu))
            .with_tooltip("EyesOff")
            .build()
            .context("failed to create menu bar icon")?;

        self.tray_icon = Some(tray_icon);
        self.initialized = true;
        self.menu_dirty = false;

        tracing::info!("menu bar icon ready");
        Ok(())
    }

    /// Initializes bookkeeping only; there is no menu bar here.
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        tracing::warn!("menu bar is only available on macOS; running headless");
        self.initialized = true;
        Ok(())
    }

    fn rebuild_menu(&mut self) {
        self.menu_dirty = false;

        #[cfg(target_os = "macos")]
        if let Some(tray_icon) = &self.tray_icon {
            match build_native_menu(&self.generate_menu_config()) {
                Ok(menu) => tray_icon.set_menu(Some(Box::new(menu))),
                Err(e) => tracing::warn!(error = %e, "failed to rebuild menu"),
            }
        }
    }
}

/// Builds a native menu from the configuration.
#[cfg(target_os = "macos")]
fn build_native_menu(config: &MenuConfig) -> anyhow::Result<tray_icon::menu::Menu> {
    use tray_icon::menu::{
        CheckMenuItem, IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu,
    };

    fn native(item: &MenuItemConfig) -> Box<dyn IsMenuItem> {
        let id = item.id.as_id();
        match item.checked {
            Some(checked) => Box::new(CheckMenuItem::with_id(
                id,
                &item.text,
                item.enabled,
                checked,
                None,
            )),
            None => Box::new(MenuItem::with_id(id, &item.text, item.enabled, None)),
        }
    }

    let menu = Menu::new();

    menu.append(native(&config.status).as_ref())?;
    for line in &config.break_lines {
        menu.append(native(line).as_ref())?;
    }
    menu.append(&PredefinedMenuItem::separator())?;

    menu.append(native(&config.acknowledge).as_ref())?;
    menu.append(native(&config.take_break).as_ref())?;
    menu.append(&PredefinedMenuItem::separator())?;

    let intervals = Submenu::new(MenuConfig::INTERVAL_SUBMENU, true);
    for item in &config.intervals {
        intervals.append(native(item).as_ref())?;
    }
    menu.append(&intervals)?;

    let sounds = Submenu::new(MenuConfig::SOUND_SUBMENU, true);
    sounds.append(native(&config.play_sound).as_ref())?;
    if !config.sounds.is_empty() {
        sounds.append(&PredefinedMenuItem::separator())?;
    }
    for item in &config.sounds {
        sounds.append(native(item).as_ref())?;
    }
    menu.append(&sounds)?;

    menu.append(native(&config.notifications).as_ref())?;
    menu.append(native(&config.launch_at_login).as_ref())?;
    menu.append(&PredefinedMenuItem::separator())?;

    menu.append(native(&config.notification_settings).as_ref())?;
    menu.append(&PredefinedMenuItem::separator())?;
    menu.append(native(&config.about).as_ref())?;
    menu.append(native(&config.quit).as_ref())?;

    Ok(menu)
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.initialized)
            .field("title", &self.title)
            .field("phase", &self.snapshot.phase)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CyclePhase;
    use crossbeam_channel::{unbounded, Sender};

    fn manager() -> (Sender<TrayUpdate>, TrayIconManager) {
        let (tx, rx) = unbounded();
        let snapshot = CycleSnapshot {
            running: true,
            ..CycleSnapshot::default()
        };
        let manager = TrayIconManager::new(snapshot, vec!["Submarine".to_string()], rx);
        (tx, manager)
    }

    fn break_snapshot(remaining_seconds: u32) -> CycleSnapshot {
        CycleSnapshot {
            phase: CyclePhase::CountingDown,
            remaining_seconds,
            running: true,
            ..CycleSnapshot::default()
        }
    }

    mod manager_tests {
        use super::*;

        #[test]
        fn test_new() {
            let (_, manager) = manager();
            assert!(!manager.is_initialized());
            assert_eq!(manager.title(), "👁️");
            assert!(manager.break_message().is_none());
        }

        #[test]
        fn test_process_empty_channel() {
            let (_, mut manager) = manager();
            assert_eq!(manager.process_pending_updates(), 0);
        }

        #[test]
        fn test_process_drains_all_updates() {
            let (tx, mut manager) = manager();
            tx.send(TrayUpdate::Countdown(9)).unwrap();
            tx.send(TrayUpdate::Countdown(8)).unwrap();

            assert_eq!(manager.process_pending_updates(), 2);
            assert_eq!(manager.title(), "👁️ 0:08");
        }

        #[test]
        fn test_break_lifecycle() {
            let (tx, mut manager) = manager();

            tx.send(TrayUpdate::ShowBreak {
                message: BreakMessage::for_break(3),
                remaining_seconds: 3,
            })
            .unwrap();
            tx.send(TrayUpdate::Refresh(break_snapshot(3))).unwrap();
            manager.process_pending_updates();

            assert_eq!(manager.title(), "👁️ 0:03");
            assert!(manager.break_message().is_some());
            assert!(manager.generate_menu_config().acknowledge.enabled);

            tx.send(TrayUpdate::Countdown(2)).unwrap();
            manager.process_pending_updates();
            assert_eq!(manager.title(), "👁️ 0:02");

            tx.send(TrayUpdate::HideBreak).unwrap();
            tx.send(TrayUpdate::Refresh(CycleSnapshot {
                running: true,
                breaks_completed: 1,
                ..CycleSnapshot::default()
            }))
            .unwrap();
            manager.process_pending_updates();

            assert_eq!(manager.title(), "👁️");
            assert!(manager.break_message().is_none());
            assert!(!manager.generate_menu_config().acknowledge.enabled);
        }

        #[test]
        fn test_refresh_outside_break_clears_message() {
            let (tx, mut manager) = manager();
            tx.send(TrayUpdate::ShowBreak {
                message: BreakMessage::for_break(3),
                remaining_seconds: 3,
            })
            .unwrap();
            tx.send(TrayUpdate::Refresh(CycleSnapshot {
                running: true,
                ..CycleSnapshot::default()
            }))
            .unwrap();
            manager.process_pending_updates();

            assert!(manager.break_message().is_none());
            assert!(!manager.is_panel_shown());
        }

        #[test]
        fn test_panel_follows_break() {
            let (tx, mut manager) = manager();
            assert!(!manager.is_panel_shown());

            tx.send(TrayUpdate::ShowBreak {
                message: BreakMessage::for_break(3),
                remaining_seconds: 3,
            })
            .unwrap();
            tx.send(TrayUpdate::Refresh(break_snapshot(3))).unwrap();
            tx.send(TrayUpdate::Countdown(2)).unwrap();
            manager.process_pending_updates();
            assert!(manager.is_panel_shown());

            tx.send(TrayUpdate::HideBreak).unwrap();
            manager.process_pending_updates();
            assert!(!manager.is_panel_shown());
        }

        #[test]
        fn test_panel_click_is_polled_as_acknowledge() {
            let (_, manager) = manager();
            let clicks = manager.panel_action_sender();

            clicks.send(MenuAction::Acknowledge).unwrap();

            assert_eq!(manager.poll_action(), Some(MenuAction::Acknowledge));
            assert_eq!(manager.poll_action(), None);
        }

        #[test]
        fn test_sound_toggle_reaches_menu() {
            let (tx, mut manager) = manager();
            manager.initialized = true;
            tx.send(TrayUpdate::Refresh(CycleSnapshot {
                running: true,
                sound_enabled: false,
                ..CycleSnapshot::default()
            }))
            .unwrap();
            manager.process_pending_updates();

            assert!(!manager.snapshot().sound_enabled);
            assert!(!manager.generate_menu_config().play_sound.is_checked());
        }

        #[test]
        fn test_launch_at_login_flag() {
            let (_, mut manager) = manager();
            manager.set_launch_at_login(true);
            assert!(manager.launch_at_login());
            assert!(manager.generate_menu_config().launch_at_login.is_checked());
        }

        #[test]
        fn test_shutdown() {
            let (tx, mut manager) = manager();
            manager.initialized = true;

            tx.send(TrayUpdate::ShowBreak {
                message: BreakMessage::for_break(3),
                remaining_seconds: 3,
            })
            .unwrap();
            tx.send(TrayUpdate::Shutdown).unwrap();
            manager.process_pending_updates();

            assert!(!manager.is_initialized());
            assert!(!manager.is_panel_shown());
        }

        #[test]
        fn test_disconnected_channel_is_harmless() {
            let (tx, mut manager) = manager();
            drop(tx);
            assert_eq!(manager.process_pending_updates(), 0);
        }

        #[test]
        fn test_debug() {
            let (_, manager) = manager();
            let debug = format!("{manager:?}");
            assert!(debug.contains("TrayIconManager"));
            assert!(debug.contains("initialized"));
        }
    }

    #[test]
    fn test_about_alert_requires_main_thread() {
        // Test threads are never the process main thread.
        assert!(!show_about_alert("EyesOff"));
    }

    #[cfg(not(target_os = "macos"))]
    mod non_macos_tests {
        use super::*;

        #[test]
        fn test_initialize_headless() {
            let (_, mut manager) = manager();
            assert!(manager.initialize().is_ok());
            assert!(manager.is_initialized());
            assert!(manager.poll_action().is_none());
            manager.pump();
        }
    }
}
