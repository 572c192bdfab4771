use serde::Serialize;

use crate::DycError;
use crate::DycResult;
use crate::config::ArgumentsConfig;
use crate::config::ConstructConfig;
use crate::config::convert_indent;
use crate::session::Candidate;
use crate::session::RenderedBlock;

/// Docstring used when the caller supplied no text.
pub const MISSING_DOCSTRING: &str = "Missing Docstring!";
/// First line of the text handed to the prompt service for review.
pub const REVIEW_HEADER: &str = "## CONFIRM: MODIFY DOCSTRING BETWEEN START AND END LINES ONLY";
pub const REVIEW_START: &str = "## START";
pub const REVIEW_END: &str = "## END";

/// Layout options of one construct kind.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct FormatOptions {
	pub doc_open: String,
	pub doc_close: String,
	/// `0` disables wrapping.
	pub words_per_line: usize,
	pub break_after_open: bool,
	pub break_after_docstring: bool,
	pub break_before_close: bool,
	/// Literal indent unit.
	pub indent: String,
	/// Literal inner indent for the lines between the delimiters.
	pub indent_content: String,
	pub arguments: ArgumentLayout,
	/// Custom minijinja template replacing the default layout.
	pub template: Option<String>,
}

/// Layout of the argument section of a method docstring.
#[derive(Debug, Clone, Default)]
pub struct ArgumentLayout {
	pub title: Option<String>,
	pub underline: bool,
	pub inline: bool,
	pub prefix: String,
	pub add_type: bool,
}

impl FormatOptions {
	pub fn from_config(construct: &ConstructConfig, arguments: &ArgumentsConfig) -> Self {
		Self {
			doc_open: construct.doc_open.clone(),
			doc_close: construct.doc_close.clone(),
			words_per_line: construct.words_per_line,
			break_after_open: construct.break_after_open,
			break_after_docstring: construct.break_after_docstring,
			break_before_close: construct.break_before_close,
			indent: convert_indent(&construct.indent),
			indent_content: construct.indent_content.resolve(&construct.indent),
			arguments: ArgumentLayout {
				title: arguments.title.clone().filter(|title| !title.is_empty()),
				underline: arguments.underline,
				inline: arguments.inline,
				prefix: arguments.prefix.clone(),
				add_type: arguments.add_type,
			},
			template: construct.template.clone(),
		}
	}
}

/// The text collected for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocText {
	pub docstring: String,
	pub arguments: Vec<ArgumentDoc>,
}

/// The text collected for one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentDoc {
	pub name: String,
	pub r#type: Option<String>,
	pub doc: String,
}

/// Regroup whitespace separated words into lines of at most `words_per_line`
/// words. `0` keeps every word on one line.
pub fn wrap_words(text: &str, words_per_line: usize) -> String {
	let words: Vec<&str> = text.split_whitespace().collect();
	if words_per_line == 0 {
		return words.join(" ");
	}

	words
		.chunks(words_per_line)
		.map(|line| line.join(" "))
		.collect::<Vec<_>>()
		.join("\n")
}

/// Lines of the argument section: optional title and underline, then the
/// argument entries. Empty without arguments.
pub fn argument_section(arguments: &[ArgumentDoc], layout: &ArgumentLayout) -> Vec<String> {
	if arguments.is_empty() {
		return Vec::new();
	}

	let mut lines = Vec::new();
	if let Some(title) = &layout.title {
		lines.push(title.clone());
		if layout.underline {
			lines.push("-".repeat(title.chars().count()));
		}
	}

	let entries = arguments.iter().map(|argument| argument_entry(argument, layout));
	if layout.inline {
		lines.push(entries.collect::<Vec<_>>().join(", "));
	} else {
		lines.extend(entries);
	}

	lines
}

/// `<prefix> <type> <name>: <doc>` with empty segments left out.
fn argument_entry(argument: &ArgumentDoc, layout: &ArgumentLayout) -> String {
	let r#type = if layout.add_type {
		argument.r#type.as_deref().unwrap_or_default()
	} else {
		""
	};
	let described = format!("{}: {}", argument.name, argument.doc.trim());

	[layout.prefix.trim(), r#type.trim(), described.trim()]
		.into_iter()
		.filter(|segment| !segment.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}

/// Lay the block out without any indentation.
pub fn layout_block(
	candidate: &Candidate,
	text: &DocText,
	options: &FormatOptions,
) -> DycResult<String> {
	let docstring = if text.docstring.trim().is_empty() {
		MISSING_DOCSTRING.to_string()
	} else {
		wrap_words(&text.docstring, options.words_per_line)
	};
	let section = argument_section(&text.arguments, &options.arguments);

	if let Some(template) = &options.template {
		return render_template(template, candidate, text, &docstring, &section, options);
	}

	let mut lines: Vec<String> = vec![options.doc_open.clone()];
	if options.break_after_open {
		lines.push(String::new());
	}
	lines.extend(docstring.split('\n').map(str::to_string));

	if options.break_after_docstring {
		lines.push(String::new());
	}
	if !section.is_empty() {
		lines.extend(section);
		if options.break_before_close {
			lines.push(String::new());
		}
	}
	lines.push(options.doc_close.clone());

	Ok(lines.join("\n"))
}

#[derive(Serialize)]
struct TemplateContext<'a> {
	doc_open: &'a str,
	doc_close: &'a str,
	name: &'a str,
	kind: &'a str,
	indent: &'a str,
	docstring: &'a str,
	arguments: &'a [ArgumentDoc],
	argument_section: String,
}

fn render_template(
	template: &str,
	candidate: &Candidate,
	text: &DocText,
	docstring: &str,
	section: &[String],
	options: &FormatOptions,
) -> DycResult<String> {
	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(false);
	env.add_template("__block__", template)
		.map_err(|e| DycError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template("__block__")
		.map_err(|e| DycError::TemplateRender(e.to_string()))?;

	let ctx = TemplateContext {
		doc_open: &options.doc_open,
		doc_close: &options.doc_close,
		name: &candidate.name,
		kind: candidate.kind.as_str(),
		indent: &options.indent,
		docstring,
		arguments: &text.arguments,
		argument_section: section.join("\n"),
	};

	let rendered = template
		.render(minijinja::Value::from_serialize(&ctx))
		.map_err(|e| DycError::TemplateRender(e.to_string()))?;

	Ok(rendered.trim_end_matches('\n').to_string())
}

/// Indent a laid out block.
///
/// Lines between the first and the last receive `inner`, then every line
/// receives `indentation`. Blank lines stay empty. The result ends with a
/// newline.
pub fn indent_block(block: &str, inner: &str, indentation: &str) -> String {
	let lines: Vec<&str> = block.split('\n').collect();
	let last = lines.len().saturating_sub(1);
	let mut result =
		String::with_capacity(block.len() + lines.len() * (indentation.len() + inner.len()) + 1);

	for (index, line) in lines.iter().enumerate() {
		if !line.trim().is_empty() {
			result.push_str(indentation);
			if index != 0 && index != last {
				result.push_str(inner);
			}
			result.push_str(line);
		}
		result.push('\n');
	}

	result
}

/// Render the documentation block of `candidate`.
pub fn render(
	candidate: &Candidate,
	text: &DocText,
	options: &FormatOptions,
) -> DycResult<RenderedBlock> {
	let laid_out = layout_block(candidate, text, options)?;
	let indented = indent_block(&laid_out, &options.indent_content, &candidate.indentation);

	Ok(RenderedBlock {
		text: indented,
		start: candidate.start,
		end: candidate.end,
		placement: candidate.placement,
		within_scope: candidate.within_scope,
	})
}

/// Surround a block with the review markers understood by
/// [`strip_review_markers`].
pub fn wrap_for_review(block: &str) -> String {
	let mut wrapped = format!("{REVIEW_HEADER}\n\n{REVIEW_START}\n{block}");
	if !block.ends_with('\n') {
		wrapped.push('\n');
	}
	wrapped.push_str(REVIEW_END);
	wrapped.push('\n');
	wrapped
}

/// Keep the lines strictly between the `## START` and `## END` markers.
///
/// The result ends with a newline unless nothing was kept.
pub fn strip_review_markers(reviewed: &str) -> String {
	let mut kept = Vec::new();
	let mut started = false;

	for line in reviewed.lines() {
		let marker = line.trim();
		if started && marker == REVIEW_END {
			break;
		}
		if started {
			kept.push(line);
		}
		if marker == REVIEW_START {
			started = true;
		}
	}

	if kept.is_empty() {
		return String::new();
	}

	let mut result = kept.join("\n");
	result.push('\n');
	result
}
