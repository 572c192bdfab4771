use std::path::Path;

use crate::DycResult;
use crate::render::ArgumentDoc;
use crate::render::DocText;
use crate::session::Candidate;

pub const PLACEHOLDER_DOCSTRING: &str = "<docstring>";
pub const PLACEHOLDER_ARGUMENT_DOC: &str = "<arg docstring>";
pub const PLACEHOLDER_TYPE: &str = "<type>";

/// Supplies the text of every documentation block.
///
/// Implementations may block on user input. Returning
/// [`DycError::Cancelled`](crate::DycError::Cancelled) from any method aborts
/// the run before the file in progress is written.
pub trait PromptService {
	/// Free text describing the candidate.
	fn docstring(&mut self, candidate: &Candidate) -> DycResult<String>;

	/// Free text describing one argument of a method.
	fn argument_doc(&mut self, candidate: &Candidate, argument: &str) -> DycResult<String>;

	/// The type of one argument. Only asked when types are enabled.
	fn argument_type(&mut self, candidate: &Candidate, argument: &str) -> DycResult<String>;

	/// Let the user edit a rendered block wrapped in review markers and
	/// return the edited text.
	fn review(&mut self, wrapped: &str) -> DycResult<String>;

	/// Whether `path` should be documented at all.
	fn confirm_file(&mut self, _path: &Path) -> DycResult<bool> {
		Ok(true)
	}

	/// Called once per file, before its first candidate is prompted for.
	fn announce_file(&mut self, _path: &Path) {}
}

/// Answers every prompt with fixed stand-in text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderPrompt;

impl PromptService for PlaceholderPrompt {
	fn docstring(&mut self, _candidate: &Candidate) -> DycResult<String> {
		Ok(PLACEHOLDER_DOCSTRING.to_string())
	}

	fn argument_doc(&mut self, _candidate: &Candidate, _argument: &str) -> DycResult<String> {
		Ok(PLACEHOLDER_ARGUMENT_DOC.to_string())
	}

	fn argument_type(&mut self, _candidate: &Candidate, _argument: &str) -> DycResult<String> {
		Ok(PLACEHOLDER_TYPE.to_string())
	}

	fn review(&mut self, wrapped: &str) -> DycResult<String> {
		Ok(wrapped.to_string())
	}
}

/// Ask `prompt` for the docstring and the per-argument text of `candidate`.
pub fn collect_text(
	candidate: &Candidate,
	prompt: &mut dyn PromptService,
	add_type: bool,
) -> DycResult<DocText> {
	let docstring = prompt.docstring(candidate)?;
	let mut arguments = Vec::with_capacity(candidate.arguments.len());

	for name in &candidate.arguments {
		let r#type = if add_type {
			Some(prompt.argument_type(candidate, name)?)
		} else {
			None
		};
		let doc = prompt.argument_doc(candidate, name)?;

		arguments.push(ArgumentDoc {
			name: name.clone(),
			r#type,
			doc,
		});
	}

	Ok(DocText {
		docstring,
		arguments,
	})
}
