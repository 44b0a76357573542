//! Window manager, session state, and reactive runtime for the browser desktop.
//!
//! [`reducer::reduce_desktop`] is the single state transition function. It drives the window
//! registry ([`window_manager`]), drop-zone tiling ([`tiling`]), the virtual filesystem, and
//! settings, and reports side effects as [`reducer::RuntimeEffect`] values that the host layer
//! executes. [`runtime_context`] wraps it all in `leptos` signals for the view layer.

pub mod apps;
pub mod effect_executor;
pub mod fs_integration;
pub mod host;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod tiling;
pub mod window_manager;

pub use fs_integration::RuntimeFsIntegration;
pub use host::DesktopHostContext;
pub use model::*;
pub use persistence::{default_file_tree, load_boot_records, BootRecords};
pub use reducer::{reduce_desktop, DesktopAction, FsCommand, ReducerError, RuntimeEffect};
pub use runtime_context::{
    provide_desktop_runtime, use_desktop_runtime, DesktopProvider, DesktopRuntimeContext,
};
pub use tiling::DropZone;
