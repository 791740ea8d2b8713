//! Effect-queue executor for reducer-emitted side effects.

use crate::config::save_config;
use crate::persistence::save_workspace;
use crate::reducer::RuntimeEffect;
use crate::runtime_context::{OverlayRuntime, RuntimeNotice};

/// Drains the runtime's effect queue in order.
///
/// Workspace saves within one drain collapse into the first, since every save writes the same
/// current snapshot. With autosave off the workspace is only marked dirty.
pub(crate) async fn drain(runtime: &mut OverlayRuntime) {
    let mut saved_this_drain = false;
    while let Some(effect) = runtime.effects.pop_front() {
        match effect {
            RuntimeEffect::PersistWorkspace => {
                if saved_this_drain {
                    continue;
                }
                if !runtime.config.autosave {
                    runtime.dirty = true;
                    continue;
                }
                saved_this_drain = persist_workspace(runtime).await;
            }
            RuntimeEffect::PersistConfig => {
                if let Err(err) = save_config(runtime.host.prefs.as_ref(), &runtime.config).await {
                    tracing::warn!(error = %err, "config save failed");
                    runtime.notices.push(RuntimeNotice::SaveFailed { error: err.clone() });
                    runtime.notify_user("Settings not saved", &err).await;
                }
            }
            RuntimeEffect::LaunchTarget(target) => {
                match runtime.host.launcher.launch(&target).await {
                    Ok(()) => tracing::info!(path = %target, "shortcut launched"),
                    Err(err) => {
                        tracing::warn!(path = %target, error = %err, "shortcut launch failed");
                        runtime.notify_user("Could not open shortcut", &err).await;
                        runtime
                            .notices
                            .push(RuntimeNotice::LaunchFailed { target, error: err });
                    }
                }
            }
            RuntimeEffect::InvalidateBitmapCache => {
                runtime.host.bitmaps.invalidate_all();
                runtime.repaint.all = true;
            }
            RuntimeEffect::RepaintZone(zone_id) => {
                runtime.repaint.zones.insert(zone_id);
            }
            RuntimeEffect::RepaintAll => {
                runtime.repaint.all = true;
            }
        }
    }
}

/// Saves the workspace; on failure the in-memory state stays authoritative and the user is told.
async fn persist_workspace(runtime: &mut OverlayRuntime) -> bool {
    match save_workspace(runtime.host.app_state.as_ref(), runtime.manager.workspace()).await {
        Ok(()) => {
            runtime.dirty = false;
            true
        }
        Err(err) => {
            let error = err.to_string();
            runtime.dirty = true;
            tracing::warn!(error = %error, "workspace save failed");
            runtime.notify_user("Layout not saved", &error).await;
            runtime.notices.push(RuntimeNotice::SaveFailed { error });
            false
        }
    }
}
