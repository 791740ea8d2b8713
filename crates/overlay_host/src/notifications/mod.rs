//! User-visible notification contracts and adapters.

mod service;

pub use service::{MemoryNotificationService, NotificationFuture, NotificationService};
