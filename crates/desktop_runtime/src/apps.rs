//! Built-in app catalog and window content dispatch.

use std::sync::OnceLock;

use desktop_app_contract::{
    ApplicationId, ContentFactoryRegistry, OpenedFile, WindowContentContext,
    WindowSettingsOverride,
};
use leptos::logging;
use serde::Deserialize;

use crate::model::{DesktopState, OpenWindowRequest, WindowId};

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Catalog window defaults for an app.
pub struct WindowDefaults {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub max_width: Option<i32>,
    #[serde(default)]
    pub max_height: Option<i32>,
    pub resizable: bool,
    pub scrollable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// One built-in app entry.
pub struct AppDescriptor {
    pub app_id: ApplicationId,
    pub display_name: String,
    pub icon_id: String,
    /// Launching again re-adds the existing window instead of opening a second one.
    pub single_instance: bool,
    pub show_on_desktop: bool,
    /// Whether the app can appear in a file's launcher list.
    pub handles_files: bool,
    pub window_defaults: WindowDefaults,
}

impl AppDescriptor {
    /// Builds an open request where `overrides` win over the catalog defaults.
    pub fn open_request(&self, overrides: WindowSettingsOverride) -> OpenWindowRequest {
        let defaults = &self.window_defaults;
        let mut request = OpenWindowRequest::new(self.app_id.clone(), self.display_name.clone());
        request.icon_id = self.icon_id.clone();
        request.settings = WindowSettingsOverride {
            initial_width: overrides.initial_width.or(Some(defaults.width)),
            initial_height: overrides.initial_height.or(Some(defaults.height)),
            max_width: overrides.max_width.or(defaults.max_width),
            max_height: overrides.max_height.or(defaults.max_height),
            resizeable: overrides.resizeable.or(Some(defaults.resizable)),
            scrollable: overrides.scrollable.or(Some(defaults.scrollable)),
            ..overrides
        };
        request
    }
}

/// Returns the build-time app catalog, sorted as declared.
pub fn app_catalog() -> &'static [AppDescriptor] {
    static CATALOG: OnceLock<Vec<AppDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| match serde_json::from_str(APP_CATALOG_JSON) {
        Ok(entries) => entries,
        Err(err) => {
            logging::warn!("app catalog parse failed: {err}");
            Vec::new()
        }
    })
}

pub fn app_descriptor(app_id: &ApplicationId) -> Option<&'static AppDescriptor> {
    app_catalog().iter().find(|entry| &entry.app_id == app_id)
}

pub fn desktop_icon_apps() -> Vec<&'static AppDescriptor> {
    app_catalog()
        .iter()
        .filter(|entry| entry.show_on_desktop)
        .collect()
}

/// Apps that can be offered as file launchers.
pub fn file_handler_apps() -> Vec<&'static AppDescriptor> {
    app_catalog()
        .iter()
        .filter(|entry| entry.handles_files)
        .collect()
}

/// Collects what a content factory needs to render `window_id`.
///
/// The opened file is read from the live tree, so it reflects edits made after the window opened.
/// A window whose file has since been removed gets no opened file.
pub fn window_content_context(
    state: &DesktopState,
    window_id: WindowId,
) -> Option<(WindowContentContext, Option<OpenedFile>)> {
    let window = state.registry.window(window_id)?;
    let context = WindowContentContext {
        window_id: window.id.into(),
        window_key: window.key.clone(),
        app_id: window.app_id.clone(),
        title: window.title.clone(),
    };
    let opened = window.opened_path.as_ref().and_then(|path| {
        state.fs.file(path).map(|file| OpenedFile {
            path: path.clone(),
            file: file.clone(),
        })
    });
    Some((context, opened))
}

/// Renders a window's content through its app's registered factory.
pub fn render_window_contents<V>(
    state: &DesktopState,
    factories: &ContentFactoryRegistry<V>,
    window_id: WindowId,
) -> Option<V> {
    let (context, opened) = window_content_context(state, window_id)?;
    factories.create(&context, opened.as_ref())
}
