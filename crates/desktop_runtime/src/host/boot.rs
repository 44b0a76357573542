use leptos::{create_effect, spawn_local, Callable, Callback};

use crate::{host::DesktopHostContext, persistence, reducer::DesktopAction};

pub(super) fn install_boot_hydration(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    create_effect(move |_| {
        let host = host.clone();
        spawn_local(async move {
            let app_state = host.app_state_store();
            let prefs = host.prefs_store();
            let records =
                persistence::load_boot_records(app_state.as_ref(), prefs.as_ref()).await;
            for action in records.into_actions() {
                dispatch.call(action);
            }
        });
    });
}
