//! Host-domain contracts and the virtual filesystem model shared by the desktop runtime and apps.
//!
//! The crate owns everything that does not depend on a windowing or reactive layer: the rooted
//! virtual filesystem with its favourites list, path arithmetic, the filesystem integration
//! contract offered to applications, durable key-value storage contracts, and the payload codec
//! contract. Concrete browser adapters are out of scope; in-memory and no-op adapters ship here.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod codec;
pub mod fs;
pub mod storage;
pub mod time;

pub use codec::{
    split_into_chunks, ChunkAssembler, CodecRequest, CodecResponse, NoopPayloadCodecService,
    PassthroughPayloadCodecService, PayloadChunk, PayloadCodecFuture, PayloadCodecService,
    DEFAULT_MAX_CHUNK_LEN,
};
pub use fs::path::{
    base_name, is_same_or_descendant, join as join_path, normalize as normalize_path,
    parent_path, rebase as rebase_path, resolve as resolve_path, resolve_relative, truncate_name,
};
pub use fs::service::{FsIntegration, FsIntegrationFuture, MemoryFsIntegration, NoopFsIntegration};
pub use fs::tree::{FavouritesSnapshot, FileTree, FileTreeSnapshot};
pub use fs::types::{
    FileNode, FilePatch, FileStub, FolderNode, FsError, Node, NodeKind, DEFAULT_FILE_LAUNCHER,
    ROOT_FOLDER_NAME,
};
pub use storage::app_state::{
    build_app_state_envelope, load_app_state_with_migration, migrate_envelope_payload,
    save_app_state_with, AppStateEnvelope, AppStateStore, AppStateStoreFuture,
    MemoryAppStateStore, NoopAppStateStore, APP_STATE_ENVELOPE_VERSION,
    FS_FAVOURITES_STATE_NAMESPACE, FS_TREE_STATE_NAMESPACE,
};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
    PrefsStoreFuture, DESKTOP_SETTINGS_PREFS_KEY,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
