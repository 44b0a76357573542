//! Shared contract types between the desktop window manager runtime and the apps it hosts.
//!
//! Apps are addressed by [`ApplicationId`]; the same ids name the launchers a file offers, so a
//! file's launcher list is a preference-ordered list of apps able to open it. The runtime exposes
//! the launch API through [`AppLauncher`] and builds window content through registered
//! [`WindowContentFactory`] implementations.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{collections::BTreeMap, rc::Rc};

use platform_host::{FileNode, FsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// Maximum length of an [`ApplicationId`].
pub const MAX_APPLICATION_ID_LEN: usize = 32;

/// Stable identifier for an app. Launcher ids are application ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId(String);

/// Launcher identifier carried in a file's launcher list.
pub type LauncherId = ApplicationId;

impl ApplicationId {
    /// Returns an id when `raw` matches `[a-z][a-z0-9-]*` and fits the length limit.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::InvalidLauncher`] for malformed ids.
    pub fn new(raw: impl Into<String>) -> Result<Self, LaunchError> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(LaunchError::InvalidLauncher(raw))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for trusted compile-time constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = LaunchError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ApplicationId> for String {
    fn from(id: ApplicationId) -> Self {
        id.0
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    match bytes.first() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    bytes.len() <= MAX_APPLICATION_ID_LEN
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures of the launch API.
pub enum LaunchError {
    /// The id is not a well-formed application id.
    #[error("invalid launcher id `{0}`")]
    InvalidLauncher(String),
    /// An explicit launcher was requested that the file does not offer.
    #[error("launcher `{launcher}` is not offered by `{file}`")]
    LauncherNotOffered {
        /// Requested launcher.
        launcher: String,
        /// Name of the file.
        file: String,
    },
    /// The file has an empty launcher list.
    #[error("`{file}` has no launcher")]
    NoLauncher {
        /// Name of the file.
        file: String,
    },
    /// No app with this id is registered.
    #[error("unknown app `{0}`")]
    UnknownApp(String),
    /// The file could not be read from the filesystem.
    #[error(transparent)]
    Fs(#[from] FsError),
    /// The runtime refused the request for another reason.
    #[error("launch rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// What happens when an explicit launcher is not in the file's launcher list.
pub enum LaunchPolicy {
    /// Open with the file's default launcher instead.
    #[default]
    FallbackToDefault,
    /// Fail with [`LaunchError::LauncherNotOffered`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Picks the launcher that opens a file.
pub struct LauncherResolver {
    /// Policy for explicit launchers the file does not offer.
    pub policy: LaunchPolicy,
}

impl LauncherResolver {
    /// Creates a resolver with an explicit policy.
    pub const fn new(policy: LaunchPolicy) -> Self {
        Self { policy }
    }

    /// Resolves the launcher for `file`.
    ///
    /// An explicit choice wins when the file offers it; otherwise the policy decides between the
    /// file's default launcher and an error.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::NoLauncher`] for files without launchers,
    /// [`LaunchError::LauncherNotOffered`] under [`LaunchPolicy::Reject`], and
    /// [`LaunchError::InvalidLauncher`] when the chosen id is malformed.
    pub fn resolve(
        &self,
        file: &FileNode,
        explicit: Option<&str>,
    ) -> Result<LauncherId, LaunchError> {
        if let Some(choice) = explicit {
            if file.launcher.iter().any(|offered| offered == choice) {
                return ApplicationId::new(choice);
            }
            if self.policy == LaunchPolicy::Reject {
                return Err(LaunchError::LauncherNotOffered {
                    launcher: choice.to_string(),
                    file: file.name.clone(),
                });
            }
        }
        let default = file.default_launcher().ok_or_else(|| LaunchError::NoLauncher {
            file: file.name.clone(),
        })?;
        ApplicationId::new(default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Per-launch window settings that win over the app's catalog defaults.
pub struct WindowSettingsOverride {
    /// Window title.
    pub title: Option<String>,
    /// Explicit left position; the window is centered when absent.
    pub x: Option<i32>,
    /// Explicit top position; the window is centered when absent.
    pub y: Option<i32>,
    /// Initial width.
    pub initial_width: Option<i32>,
    /// Initial height.
    pub initial_height: Option<i32>,
    /// Maximum width.
    pub max_width: Option<i32>,
    /// Maximum height.
    pub max_height: Option<i32>,
    /// Whether the window can be resized.
    pub resizeable: Option<bool>,
    /// Whether window content scrolls.
    pub scrollable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A file handed to an app together with the path it was opened from.
pub struct OpenedFile {
    /// Normalized path of the file.
    pub path: String,
    /// File contents at open time.
    pub file: FileNode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Options for [`AppLauncher::open_file`].
pub struct OpenFileOptions {
    /// Explicit launcher choice.
    pub launcher: Option<String>,
    /// Window settings for the opened window.
    #[serde(flatten)]
    pub overrides: WindowSettingsOverride,
}

/// Launch API consumed by apps.
pub trait AppLauncher {
    /// Opens a window for `app_id`, returning the id of the window that now shows it.
    ///
    /// Single-instance apps reuse their existing window.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::UnknownApp`] when `app_id` is not registered.
    fn launch(
        &self,
        app_id: &ApplicationId,
        overrides: WindowSettingsOverride,
    ) -> Result<WindowRuntimeId, LaunchError>;

    /// Opens `file` with the launcher picked by the runtime's [`LauncherResolver`].
    ///
    /// # Errors
    ///
    /// Returns an error when no launcher can be resolved or the launcher is not a registered app.
    fn open_file(
        &self,
        file: OpenedFile,
        options: OpenFileOptions,
    ) -> Result<WindowRuntimeId, LaunchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Window facts handed to a content factory.
pub struct WindowContentContext {
    /// Runtime window id.
    pub window_id: WindowRuntimeId,
    /// Process-unique view correlation key.
    pub window_key: String,
    /// App the window belongs to.
    pub app_id: ApplicationId,
    /// Current window title.
    pub title: String,
}

/// Builds the content of a window for one app.
///
/// `V` is the view type of the rendering layer.
pub trait WindowContentFactory<V> {
    /// Creates content for `window`, optionally showing `opened`.
    fn create(&self, window: &WindowContentContext, opened: Option<&OpenedFile>) -> V;
}

impl<V, F> WindowContentFactory<V> for F
where
    F: Fn(&WindowContentContext, Option<&OpenedFile>) -> V,
{
    fn create(&self, window: &WindowContentContext, opened: Option<&OpenedFile>) -> V {
        self(window, opened)
    }
}

/// Content factories keyed by app id.
pub struct ContentFactoryRegistry<V> {
    factories: BTreeMap<ApplicationId, Rc<dyn WindowContentFactory<V>>>,
}

impl<V> Default for ContentFactoryRegistry<V> {
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<V> Clone for ContentFactoryRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<V> ContentFactoryRegistry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `app_id`, replacing any earlier registration.
    pub fn register(
        &mut self,
        app_id: ApplicationId,
        factory: impl WindowContentFactory<V> + 'static,
    ) -> &mut Self {
        self.factories.insert(app_id, Rc::new(factory));
        self
    }

    /// Returns `true` when a factory exists for `app_id`.
    pub fn contains(&self, app_id: &ApplicationId) -> bool {
        self.factories.contains_key(app_id)
    }

    /// Builds content for `window` with its app's factory.
    pub fn create(&self, window: &WindowContentContext, opened: Option<&OpenedFile>) -> Option<V> {
        self.factories
            .get(&window.app_id)
            .map(|factory| factory.create(window, opened))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn file(launcher: &[&str]) -> FileNode {
        FileNode {
            name: "page".to_string(),
            data: "https://example.org".to_string(),
            launcher: launcher.iter().map(|id| id.to_string()).collect(),
            title: None,
        }
    }

    #[test]
    fn application_ids_are_lowercase_slugs() {
        assert!(ApplicationId::new("code").is_ok());
        assert!(ApplicationId::new("image-viewer2").is_ok());
        assert!(ApplicationId::new("Code").is_err());
        assert!(ApplicationId::new("2d").is_err());
        assert!(ApplicationId::new("").is_err());
        assert!(ApplicationId::new("a".repeat(33)).is_err());
        assert!(serde_json::from_str::<ApplicationId>("\"web\"").is_ok());
        assert!(serde_json::from_str::<ApplicationId>("\"no spaces\"").is_err());
    }

    #[test]
    fn explicit_choice_wins_when_offered() {
        let resolver = LauncherResolver::default();
        let file = file(&["web", "code"]);
        assert_eq!(
            resolver.resolve(&file, Some("code")),
            Ok(ApplicationId::trusted("code"))
        );
        assert_eq!(resolver.resolve(&file, None), Ok(ApplicationId::trusted("web")));
    }

    #[test]
    fn unoffered_choice_falls_back_by_default() {
        let resolver = LauncherResolver::default();
        assert_eq!(
            resolver.resolve(&file(&["web", "code"]), Some("image")),
            Ok(ApplicationId::trusted("web"))
        );
    }

    #[test]
    fn reject_policy_refuses_unoffered_choice() {
        let resolver = LauncherResolver::new(LaunchPolicy::Reject);
        assert_eq!(
            resolver.resolve(&file(&["web"]), Some("image")),
            Err(LaunchError::LauncherNotOffered {
                launcher: "image".to_string(),
                file: "page".to_string(),
            })
        );
    }

    #[test]
    fn empty_launcher_list_has_no_launcher() {
        let resolver = LauncherResolver::default();
        assert_eq!(
            resolver.resolve(&file(&[]), Some("code")),
            Err(LaunchError::NoLauncher {
                file: "page".to_string()
            })
        );
    }

    #[test]
    fn open_file_options_flatten_window_overrides() {
        let options: OpenFileOptions =
            serde_json::from_str(r#"{"launcher":"code","initialWidth":640,"scrollable":false}"#)
                .expect("decode");
        assert_eq!(options.launcher.as_deref(), Some("code"));
        assert_eq!(options.overrides.initial_width, Some(640));
        assert_eq!(options.overrides.scrollable, Some(false));
        assert_eq!(options.overrides.title, None);
    }

    #[test]
    fn registry_dispatches_on_app_id() {
        let mut registry = ContentFactoryRegistry::<String>::new();
        registry.register(
            ApplicationId::trusted("code"),
            |window: &WindowContentContext, opened: Option<&OpenedFile>| {
                format!(
                    "{}:{}",
                    window.title,
                    opened.map(|file| file.path.as_str()).unwrap_or("-")
                )
            },
        );
        let window = WindowContentContext {
            window_id: 1,
            window_key: "window-1".to_string(),
            app_id: ApplicationId::trusted("code"),
            title: "page".to_string(),
        };
        let opened = OpenedFile {
            path: "Documents/page".to_string(),
            file: file(&["code"]),
        };

        assert_eq!(
            registry.create(&window, Some(&opened)).as_deref(),
            Some("page:Documents/page")
        );
        let unknown = WindowContentContext {
            app_id: ApplicationId::trusted("terminal"),
            ..window
        };
        assert_eq!(registry.create(&unknown, None), None);
    }
}
