use std::io;
use std::path::Path;
use std::path::PathBuf;

use dialoguer::Confirm;
use dialoguer::Editor;
use dialoguer::Input;
use dyc_core::Candidate;
use dyc_core::DycError;
use dyc_core::DycResult;
use dyc_core::PromptService;

/// Asks for documentation text on the terminal and opens the rendered block
/// in `$EDITOR` for review.
#[derive(Debug)]
pub struct TerminalPrompt {
	root: PathBuf,
	assume_yes: bool,
	/// Extension of the file being documented, used for editor highlighting.
	extension: String,
}

impl TerminalPrompt {
	pub fn new(root: impl Into<PathBuf>, assume_yes: bool) -> Self {
		Self {
			root: root.into(),
			assume_yes,
			extension: String::new(),
		}
	}

	fn relative<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
		path.strip_prefix(&self.root).unwrap_or(path).display()
	}

	fn ask(&self, prompt: String) -> DycResult<String> {
		Input::<String>::new()
			.with_prompt(prompt)
			.allow_empty(true)
			.interact_text()
			.map_err(prompt_error)
	}
}

impl PromptService for TerminalPrompt {
	fn docstring(&mut self, candidate: &Candidate) -> DycResult<String> {
		self.ask(format!(
			"Docstring for {} `{}` ({}:{})",
			candidate.kind,
			candidate.name,
			self.relative(&candidate.file),
			candidate.line
		))
	}

	fn argument_doc(&mut self, candidate: &Candidate, argument: &str) -> DycResult<String> {
		self.ask(format!("  `{argument}` of `{}`", candidate.name))
	}

	fn argument_type(&mut self, candidate: &Candidate, argument: &str) -> DycResult<String> {
		self.ask(format!("  Type of `{argument}` in `{}`", candidate.name))
	}

	fn review(&mut self, wrapped: &str) -> DycResult<String> {
		let mut editor = Editor::new();
		if !self.extension.is_empty() {
			editor.extension(&self.extension);
		}

		// Closing the editor without saving aborts the run.
		editor
			.edit(wrapped)
			.map_err(prompt_error)?
			.ok_or(DycError::Cancelled)
	}

	fn confirm_file(&mut self, path: &Path) -> DycResult<bool> {
		if self.assume_yes {
			return Ok(true);
		}

		Confirm::new()
			.with_prompt(format!("Document {}?", self.relative(path)))
			.default(true)
			.interact()
			.map_err(prompt_error)
	}

	fn announce_file(&mut self, path: &Path) {
		self.extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.map_or_else(String::new, |ext| format!(".{ext}"));
		println!();
		println!("{}", self.relative(path));
	}
}

/// Ctrl-C while prompting cancels the run; anything else is an IO failure.
fn prompt_error(error: dialoguer::Error) -> DycError {
	let dialoguer::Error::IO(error) = error;
	if error.kind() == io::ErrorKind::Interrupted {
		DycError::Cancelled
	} else {
		DycError::Io(error)
	}
}
