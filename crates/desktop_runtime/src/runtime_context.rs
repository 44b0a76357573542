//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, the runtime effect queue, and host bootstrap
//! wiring. Views read the signals; every change goes through [`DesktopRuntimeContext::dispatch`]
//! or [`DesktopRuntimeContext::try_dispatch`].

use desktop_app_contract::{
    AppLauncher, ApplicationId, LaunchError, OpenFileOptions, OpenedFile, WindowRuntimeId,
    WindowSettingsOverride,
};
use leptos::*;

use crate::{
    effect_executor,
    host::DesktopHostContext,
    model::{DesktopState, InteractionState, WindowId},
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and processed by the shell.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Window whose primary input should take keyboard focus next.
    pub focus_request: RwSignal<Option<WindowId>>,
    /// Reducer dispatch callback. Failures are logged.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Creates the runtime signals in the current reactive owner.
    ///
    /// Nothing runs until [`install`](Self::install) is called.
    pub fn new(host: DesktopHostContext) -> Self {
        let state = create_rw_signal(DesktopState::default());
        let interaction = create_rw_signal(InteractionState::default());
        let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

        let dispatch = Callback::new(move |action: DesktopAction| {
            if let Err(err) = apply_action(state, interaction, effects, action) {
                logging::warn!("desktop reducer error: {err}");
            }
        });

        Self {
            host: store_value(host),
            state,
            interaction,
            effects,
            focus_request: create_rw_signal(None),
            dispatch,
        }
    }

    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Dispatches an action and reports a rejection to the caller instead of logging it.
    ///
    /// # Errors
    ///
    /// Returns the reducer error; state is unchanged in that case.
    pub fn try_dispatch(&self, action: DesktopAction) -> Result<(), ReducerError> {
        apply_action(self.state, self.interaction, self.effects, action)
    }

    /// Starts boot hydration and the effect executor.
    pub fn install(self) {
        self.host.get_value().install_boot_hydration(self.dispatch);
        effect_executor::install(self);
    }

    fn active_window_id(&self) -> Option<WindowRuntimeId> {
        self.state
            .with_untracked(|state| state.registry.active_window)
            .map(Into::into)
    }
}

fn apply_action(
    state: RwSignal<DesktopState>,
    interaction: RwSignal<InteractionState>,
    effects: RwSignal<Vec<RuntimeEffect>>,
    action: DesktopAction,
) -> Result<(), ReducerError> {
    let mut desktop = state.get_untracked();
    let mut ui = interaction.get_untracked();
    let previous_desktop = desktop.clone();
    let previous_ui = ui.clone();

    let new_effects = reduce_desktop(&mut desktop, &mut ui, action)?;
    if desktop != previous_desktop {
        state.set(desktop);
    }
    if ui != previous_ui {
        interaction.set(ui);
    }
    if !new_effects.is_empty() {
        effects.update(|queue| queue.extend(new_effects));
    }
    Ok(())
}

fn into_launch_error(err: ReducerError) -> LaunchError {
    match err {
        ReducerError::Launch(err) => err,
        ReducerError::Fs(err) => LaunchError::Fs(err),
        ReducerError::UnknownApp(app_id) => LaunchError::UnknownApp(app_id),
        ReducerError::WindowNotFound => LaunchError::Rejected(err.to_string()),
    }
}

impl AppLauncher for DesktopRuntimeContext {
    fn launch(
        &self,
        app_id: &ApplicationId,
        overrides: WindowSettingsOverride,
    ) -> Result<WindowRuntimeId, LaunchError> {
        self.try_dispatch(DesktopAction::Launch {
            app_id: app_id.clone(),
            overrides,
        })
        .map_err(into_launch_error)?;
        self.active_window_id()
            .ok_or_else(|| LaunchError::Rejected(format!("no window opened for `{app_id}`")))
    }

    /// Opens the file at `file.path`. Contents are read from the live tree, not from `file.file`.
    fn open_file(
        &self,
        file: OpenedFile,
        options: OpenFileOptions,
    ) -> Result<WindowRuntimeId, LaunchError> {
        let path = file.path;
        self.try_dispatch(DesktopAction::OpenFile {
            path: path.clone(),
            options,
        })
        .map_err(into_launch_error)?;
        self.active_window_id()
            .ok_or_else(|| LaunchError::Rejected(format!("no window opened for `{path}`")))
    }
}

/// Creates the runtime, provides it as context, and starts it.
pub fn provide_desktop_runtime(host: DesktopHostContext) -> DesktopRuntimeContext {
    let runtime = DesktopRuntimeContext::new(host);
    provide_context(runtime);
    runtime.install();
    runtime
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Host services; in-memory adapters when omitted.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    children: Children,
) -> impl IntoView {
    provide_desktop_runtime(host.unwrap_or_default());
    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
