//! Notification service contracts and adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`NotificationService`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for non-modal, user-visible notifications.
pub trait NotificationService {
    /// Dispatches a notification message.
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Default)]
/// Notification service that records every `(title, body)` pair it receives.
pub struct MemoryNotificationService {
    sent: Rc<RefCell<Vec<(String, String)>>>,
}

impl MemoryNotificationService {
    /// Returns the notifications dispatched so far, oldest first.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }
}

impl NotificationService for MemoryNotificationService {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.sent
                .borrow_mut()
                .push((title.to_string(), body.to_string()));
            Ok(())
        })
    }
}
