//! Launching shortcut targets with the platform's default handler.

use std::path::Path;

use overlay_host::{LaunchFuture, LaunchService};

#[derive(Debug, Clone, Copy, Default)]
/// Launch service that hands targets to the OS default handler without waiting for it.
///
/// Paths go straight to the platform opener API, never through a shell command line.
pub struct ProcessLaunchService;

impl ProcessLaunchService {
    /// Checks `target` and opens it detached.
    pub fn launch_target(&self, target: &str) -> Result<(), String> {
        if target.trim().is_empty() {
            return Err("launch target must not be empty".to_string());
        }
        if !Path::new(target).exists() {
            return Err(format!("launch target `{target}` does not exist"));
        }
        open::that_detached(target).map_err(|err| format!("failed to launch `{target}`: {err}"))?;
        tracing::debug!(path = target, "target handed to opener");
        Ok(())
    }
}

impl LaunchService for ProcessLaunchService {
    fn launch<'a>(&'a self, target: &'a str) -> LaunchFuture<'a, Result<(), String>> {
        Box::pin(async move { self.launch_target(target) })
    }
}
