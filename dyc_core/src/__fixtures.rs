use std::path::Path;
use std::path::PathBuf;

use crate::ConstructKind;
use crate::DycConfig;
use crate::DycError;
use crate::DycResult;
use crate::FormatConfig;
use crate::FormatOptions;
use crate::Grammar;
use crate::PatternSpec;
use crate::PromptService;
use crate::session::Candidate;

pub(crate) const JAVASCRIPT_CONFIG: &str = r#"
[[formats]]
extension = ".js"
language = "javascript"

[formats.method]
indicator = "function"
end = "{"
doc_open = "/**"
doc_close = " */"
doc_open_pattern = '/\*\*'
doc_close_pattern = '\*/'
before = true
indent_content = " * "

[formats.arguments]
prefix = "@param"
"#;

/// Ten lines with one undocumented function.
pub(crate) const GREET_SOURCE: &str = "import os


def greet(name):
    message = \"hello \" + name
    return message


if __name__ == \"__main__\":
    greet(\"world\")
";

pub(crate) const GREETER_SOURCE: &str = "import os


class Greeter(object):
    def greet(self, name):
        return name
";

pub(crate) fn python_format() -> FormatConfig {
	FormatConfig::python()
}

pub(crate) fn javascript_format() -> FormatConfig {
	let config = DycConfig::parse(JAVASCRIPT_CONFIG)
		.unwrap_or_else(|e| panic!("javascript config: {e}"));
	config
		.formats()
		.into_iter()
		.find(|format| format.extension == "js")
		.unwrap_or_else(|| panic!("javascript format missing"))
}

pub(crate) fn grammar(format: &FormatConfig, kind: ConstructKind) -> Grammar {
	PatternSpec::from_config(kind, &format.extension, format.construct(kind), &format.arguments)
		.and_then(PatternSpec::compile)
		.unwrap_or_else(|e| panic!("{kind} grammar: {e}"))
}

pub(crate) fn options(format: &FormatConfig, kind: ConstructKind) -> FormatOptions {
	FormatOptions::from_config(format.construct(kind), &format.arguments)
}

pub(crate) fn python_grammar(kind: ConstructKind) -> Grammar {
	grammar(&python_format(), kind)
}

pub(crate) fn python_options(kind: ConstructKind) -> FormatOptions {
	options(&python_format(), kind)
}

pub(crate) fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
	let path = dir.join(name);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

pub(crate) fn read_source(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read: {e}"))
}

/// A prompt service with canned answers that records what it was asked.
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
	pub docstring: String,
	pub cancel_on_docstring: bool,
	pub decline_files: bool,
	/// Replaces the review text when set.
	pub review_answer: Option<String>,
	pub reviews: Vec<String>,
	pub asked: Vec<String>,
	pub announced: Vec<PathBuf>,
}

impl ScriptedPrompt {
	pub(crate) fn answering(docstring: &str) -> Self {
		Self {
			docstring: docstring.to_string(),
			..Self::default()
		}
	}
}

impl PromptService for ScriptedPrompt {
	fn docstring(&mut self, candidate: &Candidate) -> DycResult<String> {
		if self.cancel_on_docstring {
			return Err(DycError::Cancelled);
		}
		self.asked.push(candidate.name.clone());
		Ok(self.docstring.clone())
	}

	fn argument_doc(&mut self, _candidate: &Candidate, argument: &str) -> DycResult<String> {
		Ok(format!("the {argument}"))
	}

	fn argument_type(&mut self, _candidate: &Candidate, _argument: &str) -> DycResult<String> {
		Ok("str".to_string())
	}

	fn review(&mut self, wrapped: &str) -> DycResult<String> {
		self.reviews.push(wrapped.to_string());
		Ok(self
			.review_answer
			.clone()
			.unwrap_or_else(|| wrapped.to_string()))
	}

	fn confirm_file(&mut self, _path: &Path) -> DycResult<bool> {
		Ok(!self.decline_files)
	}

	fn announce_file(&mut self, path: &Path) {
		self.announced.push(path.to_path_buf());
	}
}
