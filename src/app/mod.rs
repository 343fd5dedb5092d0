//! Runtime wiring.
//!
//! [`run`] owns the [`ReminderCycle`] and is the only code that mutates
//! it. Timer fires, cycle events, menu clicks, notification responses and
//! Ctrl-C all arrive in one `select!` loop on the current-thread runtime.
//!
//! ```text
//!  TokioClock ──TimerId──┐
//!                        ▼
//!  menu / notifier ──▶ select! ──▶ ReminderCycle ──CycleEvent──▶ console
//!                        ▲                │                      └──▶ tray
//!  Ctrl-C ───────────────┘                └──TrayUpdate (alert)──▶ tray
//! ```

pub mod actions;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::alert::TrayAlertPresenter;
use crate::cli::{Display, RunArgs};
use crate::cycle::{Collaborators, CycleEvent, ReminderCycle, TokioClock};
use crate::menubar::{TrayIconManager, TrayUpdate};
use crate::notification::create_notifier;
use crate::settings::{JsonSettingsStore, SettingsStore};
use crate::sound::{available_sound_names, create_player};
use crate::types::ReminderConfig;

pub use actions::{apply_menu_action, ActionOutcome, HostActions, SystemHost};

/// How often the menu bar is serviced.
const UI_TICK: Duration = Duration::from_millis(50);

/// Runs the menu bar app until Quit or Ctrl-C.
///
/// # Errors
///
/// Fails only during startup (no home directory, invalid configuration).
pub async fn run(args: RunArgs) -> Result<()> {
    let settings = Arc::new(
        JsonSettingsStore::open_default(args.work_interval_seconds())
            .context("failed to open settings")?,
    );
    if let Some(sound) = &args.sound {
        if let Err(e) = settings.set_selected_sound(sound) {
            warn!(error = %e, "could not remember sound");
        }
    }
    let config = args.to_config(&settings.selected_sound());

    let (clock, mut fire_rx) = TokioClock::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<CycleEvent>();
    let (tray_tx, tray_rx) = crossbeam_channel::unbounded::<TrayUpdate>();

    let notifier = create_notifier();
    let collaborators = Collaborators {
        alert: Arc::new(TrayAlertPresenter::new(tray_tx.clone())),
        sound: create_player(),
        notifier: notifier.clone(),
        settings,
    };

    let mut cycle = ReminderCycle::new(config, clock, collaborators, event_tx)
        .context("invalid reminder configuration")?;
    let host = SystemHost;

    let mut tray = TrayIconManager::new(cycle.snapshot(), available_sound_names(), tray_rx);
    tray.set_launch_at_login(host.launch_at_login());
    if let Err(e) = tray.initialize() {
        warn!(error = %e, "menu bar unavailable; reminders continue without it");
    }

    if cycle.config().notifications_enabled {
        notifier.request_permission();
    }
    cycle.start();
    Display::show_started(&cycle.snapshot());

    let mut ui_tick = tokio::time::interval(UI_TICK);
    ui_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(id) = fire_rx.recv() => cycle.on_timer(id),
            Some(event) = event_rx.recv() => {
                Display::show_event(&event);
                let _ = tray_tx.send(TrayUpdate::Refresh(cycle.snapshot()));
            }
            _ = ui_tick.tick() => {
                tray.pump();
                tray.process_pending_updates();

                let mut quit = false;
                while let Some(action) = tray.poll_action() {
                    match apply_menu_action(&mut cycle, action, notifier.as_ref(), &host) {
                        ActionOutcome::Continue => {}
                        ActionOutcome::LaunchAtLoginChanged(enabled) => {
                            tray.set_launch_at_login(enabled);
                        }
                        ActionOutcome::Quit => quit = true,
                    }
                }
                if quit {
                    info!("quit requested from menu");
                    break;
                }

                while let Some(response) = notifier.try_recv_action() {
                    if response.acknowledges_break() {
                        cycle.acknowledge();
                    }
                }
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!(error = %e, "signal handler failed");
                }
                info!("interrupted");
                break;
            }
        }
    }

    cycle.stop();
    while let Ok(event) = event_rx.try_recv() {
        Display::show_event(&event);
    }
    let _ = tray_tx.send(TrayUpdate::Shutdown);
    tray.process_pending_updates();
    Ok(())
}

/// Prints the sounds that can be selected.
///
/// # Errors
///
/// Fails if the settings location cannot be determined.
pub fn list_sounds() -> Result<()> {
    let settings = JsonSettingsStore::open_default(ReminderConfig::DEFAULT_WORK_INTERVAL_SECONDS)
        .context("failed to open settings")?;
    Display::show_sounds(&available_sound_names(), &settings.selected_sound());
    Ok(())
}
