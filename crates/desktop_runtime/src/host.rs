//! Host-side runtime helpers for executing reducer effects against injected host services.
//!
//! The reducer stays pure; everything that touches a store or the view layer runs here, behind
//! trait objects that the entry layer injects and tests replace with in-memory adapters.

mod boot;
mod persistence_effects;

use std::rc::Rc;

use leptos::{Callback, SignalSet};
use platform_host::{
    AppStateStore, MemoryAppStateStore, MemoryPrefsStore, PassthroughPayloadCodecService,
    PayloadCodecService, PrefsStore,
};

use crate::{
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    app_state: Rc<dyn AppStateStore>,
    prefs: Rc<dyn PrefsStore>,
    codec: Rc<dyn PayloadCodecService>,
}

impl Default for DesktopHostContext {
    /// In-memory stores and a passthrough codec; nothing outlives the page.
    fn default() -> Self {
        Self::new(
            Rc::new(MemoryAppStateStore::default()),
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(PassthroughPayloadCodecService::default()),
        )
    }
}

impl DesktopHostContext {
    /// Bundles explicit host services.
    pub fn new(
        app_state: Rc<dyn AppStateStore>,
        prefs: Rc<dyn PrefsStore>,
        codec: Rc<dyn PayloadCodecService>,
    ) -> Self {
        Self {
            app_state,
            prefs,
            codec,
        }
    }

    /// Returns the configured app-state persistence service.
    pub fn app_state_store(&self) -> Rc<dyn AppStateStore> {
        self.app_state.clone()
    }

    /// Returns the configured lightweight preference service.
    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    /// Returns the binary payload encode/decode service handed to apps.
    pub fn payload_codec(&self) -> Rc<dyn PayloadCodecService> {
        self.codec.clone()
    }

    /// Installs boot hydration: loads the three durable records and dispatches them.
    pub fn install_boot_hydration(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::FocusWindowInput(window_id) => {
                runtime.focus_request.set(Some(window_id));
            }
            RuntimeEffect::PersistTree
            | RuntimeEffect::PersistFavourites
            | RuntimeEffect::PersistSettings => {
                persistence_effects::persist_record(self.clone(), runtime, effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{load_pref_with, save_pref_with, CodecRequest};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_host_shares_stores_across_handles() {
        let host = DesktopHostContext::default();
        let clone = host.clone();

        block_on(save_pref_with(host.prefs_store().as_ref(), "shared-key", &7_u8)).expect("save");
        let loaded: Option<u8> =
            block_on(load_pref_with(clone.prefs_store().as_ref(), "shared-key")).expect("load");
        assert_eq!(loaded, Some(7));

        let response = block_on(clone.payload_codec().decode(CodecRequest {
            request_id: 4,
            payload: "aGk=".to_string(),
        }))
        .expect("decode");
        assert_eq!(response.payload, "aGk=");
    }
}
