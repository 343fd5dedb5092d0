//! `UNUserNotificationCenterDelegate` forwarding responses into a channel.

use std::sync::mpsc::Sender;

use block2::Block;
use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2::{define_class, msg_send, DefinedClass, MainThreadMarker, MainThreadOnly};
use objc2_foundation::{NSObject, NSObjectProtocol};
use objc2_user_notifications::{
    UNNotification, UNNotificationPresentationOptions, UNNotificationResponse,
    UNUserNotificationCenter, UNUserNotificationCenterDelegate,
};

use super::actions::NotificationActionEvent;

pub struct NotificationDelegateIvars {
    action_sender: Sender<NotificationActionEvent>,
}

define_class!(
    /// Receives notification callbacks on the main thread.
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - `NotificationDelegate` does not implement `Drop`.
    #[unsafe(super(NSObject))]
    #[ivars = NotificationDelegateIvars]
    #[name = "EyesOffNotificationDelegate"]
    #[thread_kind = MainThreadOnly]
    pub struct NotificationDelegate;

    unsafe impl NSObjectProtocol for NotificationDelegate {}

    unsafe impl UNUserNotificationCenterDelegate for NotificationDelegate {
        // A menu bar app is always "foreground", so banners must be requested.
        #[unsafe(method(userNotificationCenter:willPresentNotification:withCompletionHandler:))]
        fn will_present_notification(
            &self,
            _center: &UNUserNotificationCenter,
            _notification: &UNNotification,
            completion_handler: &Block<dyn Fn(UNNotificationPresentationOptions)>,
        ) {
            let options =
                UNNotificationPresentationOptions::Banner | UNNotificationPresentationOptions::Sound;
            completion_handler.call((options,));
        }

        #[unsafe(method(userNotificationCenter:didReceiveNotificationResponse:withCompletionHandler:))]
        fn did_receive_notification_response(
            &self,
            _center: &UNUserNotificationCenter,
            response: &UNNotificationResponse,
            completion_handler: &Block<dyn Fn()>,
        ) {
            let identifier = response.actionIdentifier().to_string();

            match NotificationActionEvent::from_identifier(&identifier) {
                Some(event) => {
                    if self.ivars().action_sender.send(event).is_err() {
                        tracing::debug!(?event, "notification response dropped, no receiver");
                    }
                }
                None => tracing::debug!(%identifier, "unknown notification action"),
            }

            completion_handler.call(());
        }
    }
);

impl NotificationDelegate {
    #[must_use]
    pub fn new(
        mtm: MainThreadMarker,
        action_sender: Sender<NotificationActionEvent>,
    ) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(NotificationDelegateIvars { action_sender });
        unsafe { msg_send![super(this), init] }
    }

    #[must_use]
    pub fn as_protocol(
        delegate: &Retained<Self>,
    ) -> Retained<ProtocolObject<dyn UNUserNotificationCenterDelegate>> {
        ProtocolObject::from_retained(delegate.clone())
    }
}
