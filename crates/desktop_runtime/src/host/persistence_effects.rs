use leptos::{logging, spawn_local, SignalGetUntracked};

use crate::{
    host::DesktopHostContext, persistence, reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

// Best-effort: the in-memory state stays authoritative when a write fails.
pub(super) fn persist_record(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
    effect: RuntimeEffect,
) {
    let state = runtime.state.get_untracked();
    spawn_local(async move {
        let app_state = host.app_state_store();
        let prefs = host.prefs_store();
        if let Err(err) =
            persistence::persist_for_effect(app_state.as_ref(), prefs.as_ref(), &state, &effect)
                .await
        {
            logging::warn!("{effect:?} failed: {err}");
        }
    });
}
