use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::ConstructKind;
use crate::DycError;
use crate::DycResult;
use crate::FilePatch;
use crate::Grammar;
use crate::LineMap;
use crate::PatchSet;
use crate::PatternSpec;
use crate::config::ConstructConfig;
use crate::config::FormatConfig;
use crate::config::extension_of;
use crate::config::normalize_extension;
use crate::mutator::apply_blocks;
use crate::mutator::write_file;
use crate::prompt::PromptService;
use crate::prompt::collect_text;
use crate::render::FormatOptions;
use crate::render::render;
use crate::render::strip_review_markers;
use crate::render::wrap_for_review;
use crate::scanner::scan;
use crate::scanner::scan_mapped;
use crate::session::DocumentationSession;

/// How a documentation run behaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentOptions {
	/// Hand every rendered block to [`PromptService::review`] before it is
	/// written.
	pub review: bool,
	/// Compute the new content without writing anything.
	pub dry_run: bool,
}

/// The compiled grammar and layout of one construct kind.
#[derive(Debug, Clone)]
pub struct KindPipeline {
	pub grammar: Grammar,
	pub options: FormatOptions,
}

/// Every enabled construct kind of one extension, in processing order.
#[derive(Debug, Clone)]
pub struct FormatPipeline {
	pub extension: String,
	pub kinds: Vec<KindPipeline>,
}

/// Compiled pipelines of every configured extension.
///
/// Compilation never stops at the first error: a kind whose configuration is
/// invalid is left out and the error is kept for reporting.
#[derive(Debug, Default)]
pub struct Pipelines {
	formats: Vec<FormatPipeline>,
	errors: Vec<DycError>,
}

impl Pipelines {
	pub fn compile(formats: &[FormatConfig]) -> Self {
		let mut pipelines = Self::default();

		for format in formats {
			let extension = normalize_extension(&format.extension);
			let mut kinds = Vec::new();

			for kind in ConstructKind::ALL {
				let construct = format.construct(kind);
				if !construct.enabled || !is_configured(kind, construct) {
					continue;
				}

				let compiled =
					PatternSpec::from_config(kind, &extension, construct, &format.arguments)
						.and_then(PatternSpec::compile);

				match compiled {
					Ok(grammar) => {
						kinds.push(KindPipeline {
							grammar,
							options: FormatOptions::from_config(construct, &format.arguments),
						});
					}
					Err(error) => pipelines.errors.push(error),
				}
			}

			pipelines.formats.push(FormatPipeline { extension, kinds });
		}

		pipelines
	}

	/// Configuration errors found while compiling.
	pub fn errors(&self) -> &[DycError] {
		&self.errors
	}

	/// Move the configuration errors out, leaving none behind.
	pub fn take_errors(&mut self) -> Vec<DycError> {
		std::mem::take(&mut self.errors)
	}

	pub fn formats(&self) -> &[FormatPipeline] {
		&self.formats
	}

	/// The pipeline of the extension of `path`.
	pub fn for_path(&self, path: &Path) -> Option<&FormatPipeline> {
		let extension = extension_of(path)?;
		self.formats
			.iter()
			.find(|format| format.extension == extension)
	}

	pub fn supports(&self, path: &Path) -> bool {
		self.for_path(path).is_some()
	}

	/// Scan `path` for every kind without prompting or writing.
	pub fn scan_file(
		&self,
		path: &Path,
		patch: Option<&FilePatch>,
	) -> DycResult<Vec<DocumentationSession>> {
		let format = self
			.for_path(path)
			.ok_or_else(|| DycError::UnknownFormat(path.display().to_string()))?;
		let content =
			std::fs::read_to_string(path).map_err(|e| DycError::file_access(path, &e))?;

		Ok(format
			.kinds
			.iter()
			.map(|pipeline| scan(path, &content, &pipeline.grammar, patch))
			.collect())
	}
}

/// A kind record with neither an indicator nor delimiters was never
/// configured and is skipped without an error.
fn is_configured(kind: ConstructKind, construct: &ConstructConfig) -> bool {
	match kind {
		ConstructKind::Top => !construct.doc_open.is_empty() || !construct.doc_close.is_empty(),
		_ => {
			!construct.indicator.is_empty()
				|| !construct.doc_open.is_empty()
				|| !construct.doc_close.is_empty()
		}
	}
}

/// What happened to one construct kind of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
	pub kind: ConstructKind,
	/// Names of the documented candidates, in file order.
	pub documented: Vec<String>,
}

/// The outcome of documenting one file.
#[derive(Debug, Clone)]
pub struct FileReport {
	pub path: PathBuf,
	pub original: String,
	pub updated: String,
	/// One entry per kind that received at least one block.
	pub kinds: Vec<KindReport>,
}

impl FileReport {
	pub fn changed(&self) -> bool {
		self.original != self.updated
	}

	pub fn documented_count(&self) -> usize {
		self.kinds.iter().map(|kind| kind.documented.len()).sum()
	}
}

/// The outcome of documenting a list of files.
#[derive(Debug, Default)]
pub struct RunSummary {
	pub files: Vec<FileReport>,
	/// Files that could not be documented, with the reason.
	pub failures: Vec<(PathBuf, DycError)>,
	/// Files the prompt service declined.
	pub skipped: Vec<PathBuf>,
}

impl RunSummary {
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn documented_count(&self) -> usize {
		self.files.iter().map(FileReport::documented_count).sum()
	}
}

/// Runs the scan, render and mutate stages over files.
pub struct Documenter<'p> {
	pipelines: Pipelines,
	prompt: &'p mut dyn PromptService,
	options: DocumentOptions,
	announced: HashSet<PathBuf>,
}

impl<'p> Documenter<'p> {
	pub fn new(
		pipelines: Pipelines,
		prompt: &'p mut dyn PromptService,
		options: DocumentOptions,
	) -> Self {
		Self {
			pipelines,
			prompt,
			options,
			announced: HashSet::new(),
		}
	}

	pub fn pipelines(&self) -> &Pipelines {
		&self.pipelines
	}

	/// Document one file.
	///
	/// The file is read once. Each kind is scanned against the content left by
	/// the previous kind, and the file is written once per kind that received
	/// at least one block. Patch hunks keep referring to the lines of the file
	/// as it was read. Returns `None` when the prompt service declines the
	/// file.
	pub fn document_file(
		&mut self,
		path: &Path,
		patch: Option<&FilePatch>,
	) -> DycResult<Option<FileReport>> {
		let format = self
			.pipelines
			.for_path(path)
			.ok_or_else(|| DycError::UnknownFormat(path.display().to_string()))?;
		let original =
			std::fs::read_to_string(path).map_err(|e| DycError::file_access(path, &e))?;

		let mut content = original.clone();
		let mut kinds = Vec::new();
		let mut line_map = LineMap::default();

		for pipeline in &format.kinds {
			let mut session = scan_mapped(path, &content, &pipeline.grammar, patch, &line_map);
			if session.is_empty() {
				continue;
			}

			if self.announced.insert(path.to_path_buf()) {
				self.prompt.announce_file(path);
				if !self.prompt.confirm_file(path)? {
					tracing::debug!(file = %path.display(), "file declined");
					return Ok(None);
				}
			}

			for candidate in session.candidates_mut() {
				let text = collect_text(
					candidate,
					&mut *self.prompt,
					pipeline.options.arguments.add_type,
				)?;
				let mut block = render(candidate, &text, &pipeline.options)?;

				if self.options.review {
					let reviewed = self.prompt.review(&wrap_for_review(&block.text))?;
					block.text = strip_review_markers(&reviewed);
					if block.text.is_empty() {
						tracing::debug!(name = %candidate.name, "empty review, skipping");
						continue;
					}
				}

				candidate.attach(block);
			}

			let blocks = session.blocks();
			if blocks.is_empty() {
				continue;
			}

			line_map.record(&content, blocks.iter().copied());
			let updated = apply_blocks(&content, blocks);
			if !self.options.dry_run {
				write_file(path, &updated)?;
			}
			content = updated;

			kinds.push(KindReport {
				kind: session.kind(),
				documented: session
					.candidates()
					.iter()
					.filter(|candidate| candidate.block.is_some())
					.map(|candidate| candidate.name.clone())
					.collect(),
			});
			session.clear();
		}

		Ok(Some(FileReport {
			path: path.to_path_buf(),
			original,
			updated: content,
			kinds,
		}))
	}

	/// Document every file in order.
	///
	/// A file that fails is recorded and the run continues. Cancellation stops
	/// the run immediately; files already written stay written. With a patch
	/// set, only constructs touched by a hunk are documented and a file the
	/// set does not mention is documented in full.
	pub fn document_files(
		&mut self,
		files: &[PathBuf],
		patches: Option<&PatchSet>,
	) -> DycResult<RunSummary> {
		let mut summary = RunSummary::default();

		for path in files {
			let patch = match patches {
				Some(set) => {
					let found = set.find(path);
					if found.is_none() {
						tracing::warn!(
							file = %path.display(),
							"no patch found, documenting the whole file"
						);
					}
					found
				}
				None => None,
			};

			match self.document_file(path, patch) {
				Ok(Some(report)) => summary.files.push(report),
				Ok(None) => summary.skipped.push(path.clone()),
				Err(error) if error.is_cancelled() => return Err(error),
				Err(error) => {
					tracing::warn!(file = %path.display(), %error, "failed to document file");
					summary.failures.push((path.clone(), error));
				}
			}
		}

		Ok(summary)
	}
}
