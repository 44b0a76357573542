use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowDefaults {
    width: i32,
    height: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_height: Option<i32>,
    resizable: bool,
    scrollable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogEntry {
    app_id: String,
    display_name: String,
    icon_id: String,
    single_instance: bool,
    show_on_desktop: bool,
    handles_files: bool,
    window_defaults: WindowDefaults,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    schema_version: u32,
    apps: Vec<CatalogEntry>,
}

fn is_valid_app_id(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= 32
        && bytes[0].is_ascii_lowercase()
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("app_catalog.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: Catalog = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if catalog.schema_version != 1 {
        panic!(
            "catalog schema mismatch in {}: expected 1 found {}",
            path.display(),
            catalog.schema_version
        );
    }

    let mut seen = BTreeSet::new();
    for entry in &catalog.apps {
        if !is_valid_app_id(&entry.app_id) {
            panic!("invalid app id `{}` in {}", entry.app_id, path.display());
        }
        if !seen.insert(entry.app_id.clone()) {
            panic!("duplicate app id `{}` in {}", entry.app_id, path.display());
        }
        let defaults = &entry.window_defaults;
        if defaults.width <= 0 || defaults.height <= 0 {
            panic!("non-positive window size for `{}`", entry.app_id);
        }
    }

    let json = serde_json::to_string_pretty(&catalog.apps).expect("serialize app catalog");
    let generated = format!(
        "/// Build-time generated app catalog JSON.\n\
pub const APP_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
