//! AppKit event pumping.
//!
//! The tokio loop owns the main thread, so `NSApplication::run` is never
//! called. Instead queued window-server events (status item clicks, menu
//! tracking) are drained on every UI tick.

use objc2::rc::Retained;
use objc2::MainThreadMarker;
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy, NSEventMask};
use objc2_foundation::NSDefaultRunLoopMode;

/// Sets up the shared application as a menu-bar-only app.
///
/// Returns None off the main thread.
#[allow(unused_unsafe)]
pub fn prepare_app() -> Option<Retained<NSApplication>> {
    let mtm = MainThreadMarker::new()?;
    let app = NSApplication::sharedApplication(mtm);

    // No Dock icon.
    let _ = app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
    unsafe { app.finishLaunching() };

    Some(app)
}

/// Dispatches every queued event without waiting.
#[allow(unused_unsafe)]
pub fn pump_events(app: &NSApplication) {
    loop {
        let event = unsafe {
            app.nextEventMatchingMask_untilDate_inMode_dequeue(
                NSEventMask::Any,
                None,
                NSDefaultRunLoopMode,
                true,
            )
        };

        let Some(event) = event else {
            break;
        };
        app.sendEvent(&event);
    }
}
