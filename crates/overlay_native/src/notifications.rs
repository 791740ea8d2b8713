//! Notification delivery for native hosts without a toast surface.

use overlay_host::{NotificationFuture, NotificationService};

#[derive(Debug, Clone, Copy, Default)]
/// Emits notifications as `warn` events on the `overlay::notify` target.
///
/// Hosts with a tray or toast surface install a subscriber filter for that target.
pub struct LogNotificationService;

impl NotificationService for LogNotificationService {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            tracing::warn!(target: "overlay::notify", title, body, "user notification");
            Ok(())
        })
    }
}
