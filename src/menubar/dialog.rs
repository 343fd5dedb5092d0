//! Modal alerts.

use objc2::rc::Retained;
use objc2::{msg_send, MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{NSAlert, NSApplication};
use objc2_foundation::NSString;

/// Shows a modal "About EyesOff" alert with the given text.
///
/// Returns false without showing anything off the main thread. Timers keep
/// running while the alert is open; missed fires are delivered afterwards.
#[allow(unused_unsafe)]
pub fn show_about_alert(text: &str) -> bool {
    let Some(mtm) = MainThreadMarker::new() else {
        return false;
    };

    // Accessory apps are not frontmost; bring the alert above other apps.
    unsafe { NSApplication::sharedApplication(mtm).activateIgnoringOtherApps(true) };

    let alert: Retained<NSAlert> = unsafe { msg_send![NSAlert::alloc(mtm), init] };
    alert.setMessageText(&NSString::from_str("About EyesOff"));
    alert.setInformativeText(&NSString::from_str(text));
    let _ = alert.addButtonWithTitle(&NSString::from_str("OK"));
    let _ = alert.runModal();
    true
}
