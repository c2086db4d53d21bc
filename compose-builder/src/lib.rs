#![allow(clippy::result_large_err)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
//! A command line tool to create, render and import Docker Compose files.
//!
//! Compose projects are edited as session files, which hold the serialized
//! [`ComposeDocument`](compose_document::ComposeDocument) in yaml, toml or json format, and are
//! rendered to Compose YAML with the `render` command. Existing Compose files, local or from the
//! Compose Store, can be imported with the `import` and `store import` commands.

pub mod cli;

pub mod config;
pub use config::*;

pub mod errors;
pub use errors::*;

mod fs;
pub(crate) use fs::*;

pub mod store;
