use std::collections::HashMap;
use std::path::Path;

use regex::Captures;

use crate::ConstructKind;
use crate::FilePatch;
use crate::Grammar;
use crate::LineMap;
use crate::session::Candidate;
use crate::session::DocumentationSession;

/// Scan `text` for undocumented constructs of the grammar's kind.
///
/// Matches that already carry a documentation delimiter next to them are
/// skipped. When `patch` is given, only constructs whose text was part of a
/// hunk covering their first line survive. The file is never touched.
pub fn scan(
	file: &Path,
	text: &str,
	grammar: &Grammar,
	patch: Option<&FilePatch>,
) -> DocumentationSession {
	scan_mapped(file, text, grammar, patch, &LineMap::default())
}

/// Like [`scan`] for content that already received blocks: patch hunks are
/// compared against the line each construct had before `line_map`'s
/// insertions.
pub fn scan_mapped(
	file: &Path,
	text: &str,
	grammar: &Grammar,
	patch: Option<&FilePatch>,
	line_map: &LineMap,
) -> DocumentationSession {
	let spec = grammar.spec();
	let mut session = DocumentationSession::new(file, spec.kind);
	let line_table = LineTable::new(text);
	let matches: Vec<Captures<'_>> = grammar.regex().captures_iter(text).collect();
	let anchors = line_anchors(grammar, &matches, &line_table);

	for captures in &matches {
		let Some((start, end)) = construct_bounds(grammar, captures) else {
			continue;
		};

		if is_documented(grammar, captures) {
			continue;
		}

		let line = line_table.line_of(start);

		let anchor = anchor_line(grammar, &line_table, start, end);
		if anchors.get(&anchor) != Some(&start) {
			tracing::debug!(
				file = %file.display(),
				line,
				"another {} owns this line, skipping",
				spec.kind
			);
			continue;
		}

		let name = match spec.kind {
			ConstructKind::Top => file.display().to_string(),
			_ => {
				captures
					.name("name")
					.map_or("", |m| m.as_str())
					.trim()
					.to_string()
			}
		};

		if spec.ignore.iter().any(|ignored| *ignored == name) {
			tracing::debug!(file = %file.display(), %name, "ignored {}", spec.kind);
			continue;
		}

		let construct_text = &text[start..end];

		if let Some(patch) = patch {
			if !patch.touches(line_map.original_line(line), construct_text) {
				continue;
			}
		}

		let arguments = match (spec.kind, captures.name("args")) {
			(ConstructKind::Method, Some(args)) => {
				let ignore = spec
					.arguments
					.as_ref()
					.map_or(&[][..], |arguments| &arguments.ignore[..]);
				extract_arguments(grammar.split_arguments(args.as_str()), ignore)
			}
			_ => Vec::new(),
		};

		let indentation = if spec.within_scope {
			body_indentation(text, end)
		} else {
			declaration_indentation(text, start)
		};

		tracing::debug!(file = %file.display(), %name, line, "found undocumented {}", spec.kind);

		session.insert(Candidate {
			kind: spec.kind,
			name,
			text: construct_text.to_string(),
			start,
			end,
			line,
			indentation,
			arguments,
			placement: spec.placement(),
			within_scope: spec.within_scope,
			file: file.to_path_buf(),
			block: None,
		});
	}

	session
}

/// The line a construct's block is inserted next to: the line holding its
/// start when documentation goes before it, the line holding its end
/// otherwise.
fn anchor_line(grammar: &Grammar, line_table: &LineTable, start: usize, end: usize) -> usize {
	if grammar.spec().before {
		line_table.line_of(start)
	} else {
		line_table.line_of(end)
	}
}

/// For every anchor line, the start of the one construct that may be
/// documented there: the first on the line for blocks placed before, the
/// last for blocks placed after. Only that construct ends up next to the
/// inserted block, documented or not.
fn line_anchors(
	grammar: &Grammar,
	matches: &[Captures<'_>],
	line_table: &LineTable,
) -> HashMap<usize, usize> {
	let before = grammar.spec().before;
	let mut anchors = HashMap::new();

	for (start, end) in matches
		.iter()
		.filter_map(|captures| construct_bounds(grammar, captures))
	{
		anchors
			.entry(anchor_line(grammar, line_table, start, end))
			.and_modify(|owner: &mut usize| {
				if !before {
					*owner = start;
				}
			})
			.or_insert(start);
	}

	anchors
}

/// Whether the delimiter group adjacent to the construct participated in
/// the match.
fn is_documented(grammar: &Grammar, captures: &Captures<'_>) -> bool {
	let spec = grammar.spec();
	let group = match spec.kind {
		ConstructKind::Top => "doc",
		_ if spec.before => "close",
		_ => "open",
	};

	captures.name(group).is_some()
}

/// Offsets from the start of the indicator to the end of the end token.
fn construct_bounds(grammar: &Grammar, captures: &Captures<'_>) -> Option<(usize, usize)> {
	if grammar.kind() == ConstructKind::Top {
		return Some((0, 0));
	}

	let start = captures.name("indicator")?.start();
	let end = captures.name("end")?.end();

	Some((start, end))
}

/// Turn raw argument tokens into argument names.
///
/// Blank tokens and tokens listed in `ignore` are dropped. The name is the
/// first run of word characters of the token; a token without one is
/// reported and skipped.
pub fn extract_arguments<'a>(
	tokens: impl IntoIterator<Item = &'a str>,
	ignore: &[String],
) -> Vec<String> {
	let is_ignored = |value: &str| ignore.iter().any(|ignored| ignored == value);
	let mut arguments = Vec::new();

	for token in tokens {
		let trimmed = token.trim();
		if trimmed.is_empty() || is_ignored(trimmed) {
			continue;
		}

		let Some(name) = first_identifier(trimmed) else {
			tracing::warn!(token = trimmed, "could not extract an argument name, skipping");
			continue;
		};

		if !is_ignored(name) {
			arguments.push(name.to_string());
		}
	}

	arguments
}

/// The first run of `[A-Za-z0-9_]` characters.
fn first_identifier(token: &str) -> Option<&str> {
	let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
	let start = token.find(is_word)?;
	let rest = &token[start..];
	let len = rest.find(|c: char| !is_word(c)).unwrap_or(rest.len());

	Some(&rest[..len])
}

/// Leading whitespace of the first non-blank line after the line holding
/// `end`. Empty when there is none.
pub fn body_indentation(text: &str, end: usize) -> String {
	let Some(newline) = text[end..].find('\n') else {
		return String::new();
	};

	text[end + newline + 1..]
		.split('\n')
		.find(|line| !line.trim().is_empty())
		.map_or_else(String::new, |line| leading_whitespace(line).to_string())
}

/// Leading whitespace of the line holding `start`, up to `start`.
pub fn declaration_indentation(text: &str, start: usize) -> String {
	let line_start = text[..start].rfind('\n').map_or(0, |index| index + 1);
	leading_whitespace(&text[line_start..start]).to_string()
}

fn leading_whitespace(line: &str) -> &str {
	let trimmed = line.trim_start_matches([' ', '\t']);
	&line[..line.len() - trimmed.len()]
}

/// Pre-computed table of line-start byte offsets for efficient
/// offset-to-line conversion.
pub(crate) struct LineTable {
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl LineTable {
	pub(crate) fn new(content: &str) -> Self {
		let mut line_starts = vec![0];
		for (i, byte) in content.bytes().enumerate() {
			if byte == b'\n' {
				line_starts.push(i + 1);
			}
		}
		Self { line_starts }
	}

	/// The 1-indexed line holding `offset`: one more than the number of
	/// newlines before it.
	pub(crate) fn line_of(&self, offset: usize) -> usize {
		match self.line_starts.binary_search(&offset) {
			Ok(exact) => exact + 1,
			Err(insert) => insert,
		}
	}
}
