use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::ConstructKind;
use crate::Placement;

/// One construct found by the scanner that has no documentation yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
	pub kind: ConstructKind,
	pub name: String,
	/// The construct text, from the indicator to the end token.
	pub text: String,
	/// Byte offset of the indicator in the original file text.
	pub start: usize,
	/// Byte offset just past the end token in the original file text.
	pub end: usize,
	/// 1-indexed line of `start`.
	pub line: usize,
	/// Indentation every line of the documentation block receives.
	pub indentation: String,
	/// Argument names, methods only.
	pub arguments: Vec<String>,
	pub placement: Placement,
	pub within_scope: bool,
	pub file: PathBuf,
	/// The documentation block, once rendered.
	#[serde(skip)]
	pub block: Option<RenderedBlock>,
}

impl Candidate {
	pub fn attach(&mut self, block: RenderedBlock) {
		self.block = Some(block);
	}
}

/// A documentation block ready to be spliced into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
	/// Fully indented block text, always ending with a newline.
	pub text: String,
	pub start: usize,
	pub end: usize,
	pub placement: Placement,
	pub within_scope: bool,
}

/// The candidates of one construct kind in one file, keyed by name.
///
/// Names are unique: inserting a candidate whose name is already present
/// replaces the earlier candidate and keeps its position.
#[derive(Debug, Clone)]
pub struct DocumentationSession {
	file: PathBuf,
	kind: ConstructKind,
	candidates: Vec<Candidate>,
	index: HashMap<String, usize>,
}

impl DocumentationSession {
	pub fn new(file: impl Into<PathBuf>, kind: ConstructKind) -> Self {
		Self {
			file: file.into(),
			kind,
			candidates: Vec::new(),
			index: HashMap::new(),
		}
	}

	pub fn file(&self) -> &Path {
		&self.file
	}

	pub fn kind(&self) -> ConstructKind {
		self.kind
	}

	/// Add a candidate. The last candidate found for a name wins.
	pub fn insert(&mut self, candidate: Candidate) {
		if let Some(&position) = self.index.get(&candidate.name) {
			self.candidates[position] = candidate;
		} else {
			self.index
				.insert(candidate.name.clone(), self.candidates.len());
			self.candidates.push(candidate);
		}
	}

	pub fn get(&self, name: &str) -> Option<&Candidate> {
		self.index
			.get(name)
			.map(|&position| &self.candidates[position])
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	pub fn names(&self) -> Vec<&str> {
		self.candidates.iter().map(|c| c.name.as_str()).collect()
	}

	pub fn candidates(&self) -> &[Candidate] {
		&self.candidates
	}

	pub fn candidates_mut(&mut self) -> &mut [Candidate] {
		&mut self.candidates
	}

	/// Rendered blocks of every candidate that has one.
	pub fn blocks(&self) -> Vec<&RenderedBlock> {
		self.candidates
			.iter()
			.filter_map(|candidate| candidate.block.as_ref())
			.collect()
	}

	/// Drop every candidate once the file has been written.
	pub fn clear(&mut self) {
		self.candidates.clear();
		self.index.clear();
	}
}
