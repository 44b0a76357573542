//! Virtual filesystem model, path helpers, and the filesystem integration contract.

pub mod path;
pub mod service;
pub mod tree;
pub mod types;
