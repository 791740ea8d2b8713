//! Shortcut launch host-service contracts.

use std::{cell::RefCell, collections::HashSet, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`LaunchService`].
pub type LaunchFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for launching an icon's target path with the OS default handler.
pub trait LaunchService {
    /// Launches `target`. A missing or unlaunchable target is reported as an error string.
    fn launch<'a>(&'a self, target: &'a str) -> LaunchFuture<'a, Result<(), String>>;
}

#[derive(Debug, Default)]
struct LaunchLog {
    launched: Vec<String>,
    missing: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
/// In-memory launch service that records launches and can simulate missing targets.
pub struct MemoryLaunchService {
    inner: Rc<RefCell<LaunchLog>>,
}

impl MemoryLaunchService {
    /// Marks `target` as missing so launching it fails.
    pub fn mark_missing(&self, target: impl Into<String>) {
        self.inner.borrow_mut().missing.insert(target.into());
    }

    /// Returns successfully launched targets, oldest first.
    pub fn launched(&self) -> Vec<String> {
        self.inner.borrow().launched.clone()
    }
}

impl LaunchService for MemoryLaunchService {
    fn launch<'a>(&'a self, target: &'a str) -> LaunchFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut log = self.inner.borrow_mut();
            if log.missing.contains(target) {
                return Err(format!("launch target `{target}` does not exist"));
            }
            log.launched.push(target.to_string());
            Ok(())
        })
    }
}
