//! # scriv-export
//!
//! Converts a [Scrivener](https://www.literatureandlatte.com/scrivener) project into
//! an Obsidian-style vault of Markdown notes.
//!
//! ## What it does
//!
//! A `.scriv` project is a directory holding an XML index (`.scrivx`) that describes
//! the binder (folders and documents, their order, labels and statuses) and a
//! content store of RTF files keyed by each item's UUID. This crate reads the index
//! into a tree, walks it in binder order, and writes:
//!
//! - one directory per folder, and
//! - one `.md` file per text document, with YAML frontmatter (`title`, `synopsis`,
//!   `tags` derived from label/status, `include_in_compile`), the flattened body,
//!   and the document notes as an `> [!note]` callout.
//!
//! Every path segment is prefixed with its two-digit binder position (`01 Draft`,
//! `02 Research`) so the vault sorts the way the binder does. The Trash folder and
//! everything inside it are left out.
//!
//! The source project is only ever read.
//!
//! ## Usage
//!
//! ```sh
//! # Convert into ./Novel
//! scriv-export ~/Writing/Novel.scriv
//!
//! # Explicit destination, machine-readable report
//! scriv-export ~/Writing/Novel.scriv ~/Vaults/Novel --json
//! ```
//!
//! A default `output_root` can be persisted in `~/.config/scriv-export/config.toml`.
//!
//! ## Library
//!
//! ```no_run
//! use std::path::Path;
//!
//! let result = scriv_export::convert_project(
//!     Path::new("Novel.scriv"),
//!     Path::new("vault"),
//! );
//! println!("{}", result.summary());
//! ```

pub mod binder;
pub mod convert;
pub mod error;
pub mod importer;
pub mod planner;
pub mod project;
pub mod renderer;
pub mod rtf;
pub mod sanitize;
pub mod utils;

pub use convert::{ConversionResult, convert_project};
pub use error::{ProjectError, RtfError};
