//! Floating break panel.
//!
//! A small titled panel above normal windows showing the break message, a
//! live countdown and a "Got it!" button. Clicking the button sends
//! [`MenuAction::Acknowledge`] on the same path as the menu item.

use crossbeam_channel::Sender;
use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{
    define_class, msg_send, sel, ClassType, DefinedClass, MainThreadMarker, MainThreadOnly,
};
use objc2_app_kit::{
    NSBackingStoreType, NSButton, NSFont, NSPanel, NSStatusWindowLevel, NSTextAlignment,
    NSTextField, NSWindowCollectionBehavior, NSWindowStyleMask,
};
use objc2_foundation::{NSObject, NSObjectProtocol, NSPoint, NSRect, NSSize, NSString};

use super::event::MenuAction;
use crate::alert::{countdown_label, BreakMessage};

const PANEL_WIDTH: f64 = 400.0;
const PANEL_HEIGHT: f64 = 300.0;
const MARGIN: f64 = 20.0;

pub struct PanelButtonTargetIvars {
    action_tx: Sender<MenuAction>,
}

define_class!(
    /// Action target of the "Got it!" button.
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - `PanelButtonTarget` does not implement `Drop`.
    #[unsafe(super(NSObject))]
    #[ivars = PanelButtonTargetIvars]
    #[name = "EyesOffPanelButtonTarget"]
    #[thread_kind = MainThreadOnly]
    pub struct PanelButtonTarget;

    unsafe impl NSObjectProtocol for PanelButtonTarget {}

    impl PanelButtonTarget {
        #[unsafe(method(acknowledge:))]
        fn acknowledge(&self, _sender: Option<&AnyObject>) {
            if self.ivars().action_tx.send(MenuAction::Acknowledge).is_err() {
                tracing::debug!("panel click dropped, no receiver");
            }
        }
    }
);

impl PanelButtonTarget {
    fn new(mtm: MainThreadMarker, action_tx: Sender<MenuAction>) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(PanelButtonTargetIvars { action_tx });
        unsafe { msg_send![super(this), init] }
    }
}

/// The break panel. Built once and reused for every break.
pub struct BreakPanel {
    panel: Retained<NSPanel>,
    body: Retained<NSTextField>,
    countdown: Retained<NSTextField>,
    // Buttons hold their target weakly.
    _target: Retained<PanelButtonTarget>,
}

impl BreakPanel {
    /// Builds the (hidden) panel.
    #[allow(unused_unsafe)]
    pub fn new(mtm: MainThreadMarker, action_tx: Sender<MenuAction>) -> Self {
        let frame = NSRect::new(NSPoint::new(0.0, 0.0), NSSize::new(PANEL_WIDTH, PANEL_HEIGHT));
        let style = NSWindowStyleMask::Titled | NSWindowStyleMask::Closable;
        let panel: Retained<NSPanel> = unsafe {
            msg_send![
                NSPanel::alloc(mtm),
                initWithContentRect: frame
                styleMask: style
                backing: NSBackingStoreType::Buffered
                defer: false
            ]
        };

        unsafe {
            panel.setReleasedWhenClosed(false);
            panel.setFloatingPanel(true);
            // An accessory app is rarely active.
            panel.setHidesOnDeactivate(false);
        }
        panel.setLevel(NSStatusWindowLevel);
        panel.setCollectionBehavior(
            NSWindowCollectionBehavior::CanJoinAllSpaces | NSWindowCollectionBehavior::Stationary,
        );

        let content_width = PANEL_WIDTH - 2.0 * MARGIN;
        let body_frame = NSRect::new(
            NSPoint::new(MARGIN, 130.0),
            NSSize::new(content_width, 130.0),
        );
        let body = label(mtm, body_frame);
        body.setFont(Some(&NSFont::systemFontOfSize(15.0)));

        let countdown_frame = NSRect::new(
            NSPoint::new(MARGIN, 78.0),
            NSSize::new(content_width, 40.0),
        );
        let countdown = label(mtm, countdown_frame);
        countdown.setFont(Some(&NSFont::boldSystemFontOfSize(28.0)));

        let target = PanelButtonTarget::new(mtm, action_tx);
        let button = unsafe {
            NSButton::buttonWithTitle_target_action(
                &NSString::from_str("Got it!"),
                Some(target.as_super().as_super()),
                Some(sel!(acknowledge:)),
                mtm,
            )
        };
        button.setFrame(NSRect::new(
            NSPoint::new((PANEL_WIDTH - 120.0) / 2.0, 24.0),
            NSSize::new(120.0, 32.0),
        ));
        button.setKeyEquivalent(&NSString::from_str("\r"));

        if let Some(content_view) = panel.contentView() {
            content_view.addSubview(&body);
            content_view.addSubview(&countdown);
            content_view.addSubview(&button);
        }

        Self {
            panel,
            body,
            countdown,
            _target: target,
        }
    }

    /// Fills in the message and brings the panel to the front.
    pub fn show(&self, message: &BreakMessage, remaining_seconds: u32) {
        self.panel.setTitle(&NSString::from_str(&message.title));
        self.body.setStringValue(&NSString::from_str(&message.body));
        self.set_remaining(remaining_seconds);

        self.panel.center();
        self.panel.orderFrontRegardless();
        tracing::debug!(remaining_seconds, "break panel shown");
    }

    pub fn set_remaining(&self, remaining_seconds: u32) {
        self.countdown
            .setStringValue(&NSString::from_str(&countdown_label(remaining_seconds)));
    }

    pub fn hide(&self) {
        if self.panel.isVisible() {
            self.panel.orderOut(None);
            tracing::debug!("break panel hidden");
        }
    }
}

impl std::fmt::Debug for BreakPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakPanel")
            .field("visible", &self.panel.isVisible())
            .finish_non_exhaustive()
    }
}

/// Non-editable, centered, multi-line text.
fn label(mtm: MainThreadMarker, frame: NSRect) -> Retained<NSTextField> {
    let field = NSTextField::initWithFrame(NSTextField::alloc(mtm), frame);
    field.setBezeled(false);
    field.setDrawsBackground(false);
    field.setEditable(false);
    field.setSelectable(false);
    field.setAlignment(NSTextAlignment::Center);
    field.setUsesSingleLineMode(false);
    field
}
