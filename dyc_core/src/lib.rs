//! `dyc_core` is the engine behind [dyc](https://github.com/dyc-rs/dyc), a tool that finds undocumented file headers, classes and methods in source files and writes documentation blocks into them in place.
//!
//! ## Processing Pipeline
//!
//! ```text
//! dyc.toml format (per extension, per construct kind)
//!   → Pattern compiler (PatternSpec → Grammar)
//!   → Structural scanner (Grammar + file text → DocumentationSession of Candidates)
//!   → Documentation renderer (Candidate + DocText + FormatOptions → RenderedBlock)
//!   → File mutator (RenderedBlocks spliced bottom to top, one write per kind)
//! ```
//!
//! File headers, classes and methods run through the same stages. Only the
//! pattern shape and the placement of the block differ.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `dyc.toml` and the built-in Python format.
//! - [`project`]: File discovery honouring `.gitignore`, `[exclude]` and `[include]`.
//! - [`prompt`]: The [`PromptService`] seam that supplies docstring text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dyc_core::{DocumentOptions, Documenter, DycConfig, Pipelines, PlaceholderPrompt};
//! use std::path::PathBuf;
//!
//! let config = DycConfig::default();
//! let pipelines = Pipelines::compile(&config.formats());
//! let mut prompt = PlaceholderPrompt;
//! let mut documenter = Documenter::new(pipelines, &mut prompt, DocumentOptions::default());
//!
//! let summary = documenter
//!     .document_files(&[PathBuf::from("app.py")], None)
//!     .unwrap();
//! println!("{} block(s) written", summary.documented_count());
//! ```

pub use config::*;
pub use error::*;
pub use mutator::*;
pub use patch::*;
pub use pattern::*;
pub use pipeline::*;
pub use project::*;
pub use prompt::*;
pub use render::*;
pub use scanner::*;
pub use session::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
mod mutator;
mod patch;
mod pattern;
mod pipeline;
pub mod project;
pub mod prompt;
mod render;
mod scanner;
mod session;

#[cfg(test)]
mod __fixtures;
