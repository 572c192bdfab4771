use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::CONFIG_FILE_CANDIDATES;
use crate::DycConfig;
use crate::DycError;
use crate::DycResult;

/// Collect the files to document under `root`.
///
/// An explicit `file_list` in the config wins and is returned as is (joined
/// to `root`). Otherwise the tree is walked: files for which `supported`
/// returns true are kept unless `.gitignore` (when enabled) or the
/// `[exclude]` patterns match them, and files matching the `[include]`
/// patterns are added. The result is sorted and free of duplicates.
pub fn collect_files(
	root: &Path,
	config: &DycConfig,
	supported: impl Fn(&Path) -> bool,
) -> DycResult<Vec<PathBuf>> {
	if !config.file_list.is_empty() {
		return Ok(config
			.file_list
			.iter()
			.map(|file| root.join(file))
			.collect());
	}

	let gitignore = if config.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};

	let mut walker = Walker {
		root,
		gitignore: &gitignore,
		exclude: exclude_rules(root, &config.exclude.patterns)?,
		supported: &supported,
		visited: HashSet::new(),
		files: Vec::new(),
	};
	walker.walk(root, &Pass::Supported)?;

	if !config.include.patterns.is_empty() {
		let include = include_rules(&config.include.patterns)?;
		walker.visited.clear();
		walker.walk(root, &Pass::Included(&include))?;
	}

	let mut files = walker.files;
	files.sort();
	files.dedup();
	Ok(files)
}

/// What a walk keeps.
enum Pass<'g> {
	/// Files with a configured format that `.gitignore` does not hide.
	Supported,
	/// Files matching the `[include]` globs, gitignored or not.
	Included(&'g GlobSet),
}

struct Walker<'a, F: Fn(&Path) -> bool> {
	root: &'a Path,
	gitignore: &'a Gitignore,
	exclude: Gitignore,
	supported: &'a F,
	visited: HashSet<PathBuf>,
	files: Vec<PathBuf>,
}

impl<F: Fn(&Path) -> bool> Walker<'_, F> {
	fn walk(&mut self, dir: &Path, pass: &Pass<'_>) -> DycResult<()> {
		if !dir.is_dir() {
			return Ok(());
		}

		// Symlink cycles are detected through canonical paths.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !self.visited.insert(canonical) {
			tracing::debug!(dir = %dir.display(), "directory already visited");
			return Ok(());
		}

		let entries = std::fs::read_dir(dir).map_err(|e| DycError::file_access(dir, &e))?;

		for entry in entries {
			let path = entry?.path();
			let is_dir = path.is_dir();

			if self.skips(&path, is_dir, pass) {
				continue;
			}

			if is_dir {
				// A nested config marks a separate project.
				if has_project_config(&path) {
					continue;
				}
				self.walk(&path, pass)?;
			} else if self.keeps(&path, pass) {
				tracing::debug!(
					file = %path.strip_prefix(self.root).unwrap_or(&path).display(),
					"discovered file"
				);
				self.files.push(path);
			}
		}

		Ok(())
	}

	/// Hidden and tool directories, `[exclude]` matches and, outside the
	/// include pass, `.gitignore` matches are never entered.
	fn skips(&self, path: &Path, is_dir: bool, pass: &Pass<'_>) -> bool {
		let hidden = path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(is_ignored_directory_name);

		hidden
			|| self.exclude.matched(path, is_dir).is_ignore()
			|| (matches!(pass, Pass::Supported) && self.gitignore.matched(path, is_dir).is_ignore())
	}

	fn keeps(&self, path: &Path, pass: &Pass<'_>) -> bool {
		match pass {
			Pass::Supported => (self.supported)(path),
			Pass::Included(include) => {
				path.strip_prefix(self.root)
					.is_ok_and(|relative| include.is_match(relative))
			}
		}
	}
}

fn include_rules(patterns: &[String]) -> DycResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		builder.add(Glob::new(pattern).map_err(|e| rule_error("include", pattern, &e))?);
	}

	builder.build().map_err(|e| rule_error("include", "*", &e))
}

/// `[exclude]` patterns use `.gitignore` syntax relative to `root` and apply
/// on top of the project's `.gitignore`.
fn exclude_rules(root: &Path, patterns: &[String]) -> DycResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder
			.add_line(None, pattern)
			.map_err(|e| rule_error("exclude", pattern, &e))?;
	}

	builder.build().map_err(|e| rule_error("exclude", "*", &e))
}

fn rule_error(section: &str, pattern: &str, error: &dyn std::fmt::Display) -> DycError {
	DycError::ConfigParse(format!("invalid [{section}] pattern `{pattern}`: {error}"))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		if let Some(error) = builder.add(&gitignore_path) {
			tracing::warn!(%error, "failed to read .gitignore");
		}
	}

	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || matches!(name, "node_modules" | "target" | "__pycache__" | "venv")
}

fn has_project_config(dir: &Path) -> bool {
	CONFIG_FILE_CANDIDATES
		.iter()
		.any(|candidate| dir.join(candidate).is_file())
}
