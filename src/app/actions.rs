//! Menu actions applied to the running cycle.

use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::cli::{about_text, Display};
use crate::cycle::{Clock, ReminderCycle};
use crate::launchagent;
use crate::menubar::{show_about_alert, MenuAction};
use crate::notification::Notifier;

/// System preferences pane for notifications.
pub const NOTIFICATION_SETTINGS_URL: &str =
    "x-apple.systempreferences:com.apple.preference.notifications";

/// Side effects outside the cycle that menu items can trigger.
pub trait HostActions {
    /// Opens a URL with the system handler.
    fn open_url(&self, url: &str) -> Result<()>;

    /// Returns whether EyesOff is registered to launch at login.
    fn launch_at_login(&self) -> bool;

    /// Registers or unregisters the login item.
    fn set_launch_at_login(&self, enabled: bool) -> Result<()>;

    /// Shows version information.
    ///
    /// Returns true if a dialog was shown, false if it went to the console.
    fn show_about(&self) -> bool;
}

/// [`HostActions`] backed by `open`, `launchctl` and AppKit alerts, with
/// the console as fallback.
#[derive(Debug, Default)]
pub struct SystemHost;

impl HostActions for SystemHost {
    fn open_url(&self, url: &str) -> Result<()> {
        let status = Command::new("open")
            .arg(url)
            .status()
            .with_context(|| format!("failed to run `open {url}`"))?;
        if !status.success() {
            bail!("`open {url}` exited with {status}");
        }
        Ok(())
    }

    fn launch_at_login(&self) -> bool {
        launchagent::is_installed()
    }

    fn set_launch_at_login(&self, enabled: bool) -> Result<()> {
        if enabled {
            launchagent::install(&[]).context("failed to enable launch at login")?;
        } else {
            launchagent::uninstall().context("failed to disable launch at login")?;
        }
        Ok(())
    }

    fn show_about(&self) -> bool {
        if show_about_alert(&about_text()) {
            return true;
        }
        Display::show_about();
        false
    }
}

/// What the event loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Continue,
    /// The login item changed; the menu check mark must follow.
    LaunchAtLoginChanged(bool),
    Quit,
}

/// Applies one menu action.
///
/// Failures are logged; none of them stops the cycle.
pub fn apply_menu_action<C: Clock>(
    cycle: &mut ReminderCycle<C>,
    action: MenuAction,
    notifier: &dyn Notifier,
    host: &dyn HostActions,
) -> ActionOutcome {
    tracing::debug!(%action, "menu action");

    match action {
        MenuAction::Acknowledge => {
            cycle.acknowledge();
        }
        MenuAction::TakeBreak => {
            cycle.trigger_break();
        }
        MenuAction::SetInterval(preset) => {
            if let Err(e) = cycle.change_interval(preset.seconds()) {
                warn!(error = %e, "interval not changed");
            }
        }
        MenuAction::SelectSound(name) => match cycle.select_sound(&name) {
            Ok(()) => cycle.preview_sound(),
            Err(e) => warn!(error = %e, "sound not changed"),
        },
        MenuAction::ToggleSound => {
            let enabled = !cycle.config().sound_enabled;
            cycle.set_sound_enabled(enabled);
        }
        MenuAction::ToggleNotifications => {
            let enabled = !cycle.config().notifications_enabled;
            if enabled {
                notifier.request_permission();
            }
            cycle.set_notifications_enabled(enabled);
        }
        MenuAction::OpenNotificationSettings => {
            if let Err(e) = host.open_url(NOTIFICATION_SETTINGS_URL) {
                warn!(error = %e, "could not open notification settings");
            }
        }
        MenuAction::ToggleLaunchAtLogin => {
            let enabled = !host.launch_at_login();
            return match host.set_launch_at_login(enabled) {
                Ok(()) => ActionOutcome::LaunchAtLoginChanged(enabled),
                Err(e) => {
                    warn!(error = %e, "launch at login unchanged");
                    ActionOutcome::LaunchAtLoginChanged(host.launch_at_login())
                }
            };
        }
        MenuAction::ShowAbout => {
            if !host.show_about() {
                tracing::debug!("about text printed to the console");
            }
        }
        MenuAction::Quit => return ActionOutcome::Quit,
    }

    ActionOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::MockAlertPresenter;
    use crate::cycle::{Collaborators, ManualClock};
    use crate::notification::MockNotifier;
    use crate::settings::{MemorySettingsStore, SettingsStore};
    use crate::sound::MockSoundPlayer;
    use crate::types::{CyclePhase, IntervalPreset, ReminderConfig};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct RecordingHost {
        opened: Mutex<Vec<String>>,
        installed: AtomicBool,
        fail_login_item: AtomicBool,
        about_shown: AtomicUsize,
    }

    impl HostActions for RecordingHost {
        fn open_url(&self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn launch_at_login(&self) -> bool {
            self.installed.load(Ordering::SeqCst)
        }

        fn set_launch_at_login(&self, enabled: bool) -> Result<()> {
            if self.fail_login_item.load(Ordering::SeqCst) {
                bail!("launchctl unavailable");
            }
            self.installed.store(enabled, Ordering::SeqCst);
            Ok(())
        }

        fn show_about(&self) -> bool {
            self.about_shown.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    struct Fixture {
        cycle: ReminderCycle<ManualClock>,
        clock: ManualClock,
        sound: Arc<MockSoundPlayer>,
        notifier: Arc<MockNotifier>,
        settings: Arc<MemorySettingsStore>,
        host: RecordingHost,
        _events: mpsc::UnboundedReceiver<crate::cycle::CycleEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = ManualClock::new();
            let sound = Arc::new(MockSoundPlayer::new());
            let notifier = Arc::new(MockNotifier::new());
            let settings = Arc::new(MemorySettingsStore::default());
            let (tx, rx) = mpsc::unbounded_channel();
            let collaborators = Collaborators {
                alert: Arc::new(MockAlertPresenter::new()),
                sound: sound.clone(),
                notifier: notifier.clone(),
                settings: settings.clone(),
            };
            let mut cycle =
                ReminderCycle::new(ReminderConfig::default(), clock.clone(), collaborators, tx)
                    .unwrap();
            cycle.start();

            Self {
                cycle,
                clock,
                sound,
                notifier,
                settings,
                host: RecordingHost::default(),
                _events: rx,
            }
        }

        fn apply(&mut self, action: MenuAction) -> ActionOutcome {
            apply_menu_action(&mut self.cycle, action, self.notifier.as_ref(), &self.host)
        }
    }

    #[test]
    fn test_quit() {
        let mut f = Fixture::new();
        assert_eq!(f.apply(MenuAction::Quit), ActionOutcome::Quit);
    }

    #[test]
    fn test_set_interval_rearms_work_timer() {
        let mut f = Fixture::new();
        assert_eq!(
            f.apply(MenuAction::SetInterval(IntervalPreset::Ten)),
            ActionOutcome::Continue
        );

        assert_eq!(f.cycle.config().work_interval_seconds, 600);
        let ids = f.clock.active_timer_ids();
        assert_eq!(ids.len(), 1);
        assert_eq!(
            f.clock.period_of(ids[0]),
            Some(std::time::Duration::from_secs(600))
        );
    }

    #[test]
    fn test_take_break_then_acknowledge() {
        let mut f = Fixture::new();
        f.apply(MenuAction::TakeBreak);
        assert_eq!(f.cycle.phase(), CyclePhase::CountingDown);

        f.apply(MenuAction::Acknowledge);
        assert_eq!(f.cycle.phase(), CyclePhase::Working);
    }

    #[test]
    fn test_select_sound_persists_and_previews() {
        let mut f = Fixture::new();
        f.apply(MenuAction::SelectSound("Glass".to_string()));

        assert_eq!(f.settings.selected_sound(), "Glass");
        assert_eq!(f.sound.played_names(), vec!["Glass".to_string()]);
    }

    #[test]
    fn test_toggle_notifications_requests_permission_when_enabling() {
        let mut f = Fixture::new();
        f.apply(MenuAction::ToggleNotifications);
        assert!(!f.cycle.config().notifications_enabled);
        assert_eq!(f.notifier.permission_requests(), 0);

        f.apply(MenuAction::ToggleNotifications);
        assert!(f.cycle.config().notifications_enabled);
        assert_eq!(f.notifier.permission_requests(), 1);
    }

    #[test]
    fn test_open_notification_settings() {
        let mut f = Fixture::new();
        f.apply(MenuAction::OpenNotificationSettings);
        assert_eq!(
            *f.host.opened.lock().unwrap(),
            vec![NOTIFICATION_SETTINGS_URL.to_string()]
        );
    }

    #[test]
    fn test_toggle_launch_at_login() {
        let mut f = Fixture::new();
        assert_eq!(
            f.apply(MenuAction::ToggleLaunchAtLogin),
            ActionOutcome::LaunchAtLoginChanged(true)
        );
        assert_eq!(
            f.apply(MenuAction::ToggleLaunchAtLogin),
            ActionOutcome::LaunchAtLoginChanged(false)
        );
    }

    #[test]
    fn test_launch_at_login_failure_reports_actual_state() {
        let mut f = Fixture::new();
        f.host.fail_login_item.store(true, Ordering::SeqCst);
        assert_eq!(
            f.apply(MenuAction::ToggleLaunchAtLogin),
            ActionOutcome::LaunchAtLoginChanged(false)
        );
    }

    #[test]
    fn test_show_about() {
        let mut f = Fixture::new();
        f.apply(MenuAction::ShowAbout);
        assert_eq!(f.host.about_shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_system_about_falls_back_to_console_off_main_thread() {
        assert!(!SystemHost.show_about());
    }

    #[test]
    fn test_toggle_sound_mutes_next_break() {
        let mut f = Fixture::new();
        f.apply(MenuAction::ToggleSound);
        assert!(!f.cycle.config().sound_enabled);

        f.apply(MenuAction::TakeBreak);
        assert_eq!(f.sound.play_count(), 0);
        f.apply(MenuAction::Acknowledge);

        f.apply(MenuAction::ToggleSound);
        assert!(f.cycle.config().sound_enabled);
        f.apply(MenuAction::TakeBreak);
        assert_eq!(f.sound.play_count(), 1);
    }

    #[test]
    fn test_panel_acknowledge_ends_break() {
        use crate::menubar::TrayIconManager;

        let mut f = Fixture::new();
        let (_tray_tx, tray_rx) = crossbeam_channel::unbounded();
        let tray = TrayIconManager::new(f.cycle.snapshot(), Vec::new(), tray_rx);

        f.apply(MenuAction::TakeBreak);
        tray.panel_action_sender()
            .send(MenuAction::Acknowledge)
            .unwrap();

        while let Some(action) = tray.poll_action() {
            f.apply(action);
        }
        assert_eq!(f.cycle.phase(), CyclePhase::Working);
        assert_eq!(f.cycle.breaks_completed(), 1);
    }
}
