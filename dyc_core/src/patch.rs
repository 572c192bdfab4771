use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DycError;
use crate::DycResult;

/// One changed region of a file: an inclusive, 1-indexed line range and the
/// literal text of the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchHunk {
	/// `[start_line, end_line]`, both inclusive.
	pub hunk: (usize, usize),
	/// The changed text.
	pub patch: String,
}

impl PatchHunk {
	pub fn new(start_line: usize, end_line: usize, patch: impl Into<String>) -> Self {
		Self {
			hunk: (start_line, end_line),
			patch: patch.into(),
		}
	}

	pub fn covers(&self, line: usize) -> bool {
		let (start, end) = self.hunk;
		start <= line && line <= end
	}
}

/// The hunks touching one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatch {
	pub path: PathBuf,
	#[serde(default)]
	pub additions: Vec<PatchHunk>,
}

impl FilePatch {
	/// Whether `text`, found at 1-indexed `line`, was part of this patch.
	///
	/// This is a text containment check: a hunk whose range covers the line
	/// must literally contain the text.
	pub fn touches(&self, line: usize, text: &str) -> bool {
		self.additions
			.iter()
			.any(|hunk| hunk.covers(line) && hunk.patch.contains(text))
	}
}

/// Every file patch of a change set, as read from a patch JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchSet {
	pub files: Vec<FilePatch>,
}

impl PatchSet {
	/// Load a JSON patch file.
	pub fn load(path: &Path) -> DycResult<Self> {
		let content = std::fs::read_to_string(path).map_err(|e| {
			DycError::PatchParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		Self::parse(&content).map_err(|e| {
			match e {
				DycError::PatchParse { reason, .. } => {
					DycError::PatchParse {
						path: path.display().to_string(),
						reason,
					}
				}
				other => other,
			}
		})
	}

	/// Parse patch JSON content.
	pub fn parse(content: &str) -> DycResult<Self> {
		serde_json::from_str(content).map_err(|e| {
			DycError::PatchParse {
				path: "<inline>".to_string(),
				reason: e.to_string(),
			}
		})
	}

	/// The patch of `path`. Paths match exactly, or when one is a suffix of
	/// the other (a relative patch path against an absolute file path).
	pub fn find(&self, path: &Path) -> Option<&FilePatch> {
		self.files
			.iter()
			.find(|patch| patch.path == path)
			.or_else(|| {
				self.files.iter().find(|patch| {
					!patch.path.as_os_str().is_empty()
						&& (path.ends_with(&patch.path) || patch.path.ends_with(path))
				})
			})
	}

	/// Paths of every patched file, in patch order.
	pub fn paths(&self) -> Vec<PathBuf> {
		self.files.iter().map(|patch| patch.path.clone()).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}
}
