use std::borrow::Cow;
use std::path::Path;

use crate::DycError;
use crate::DycResult;
use crate::Placement;
use crate::scanner::LineTable;
use crate::session::RenderedBlock;

/// Splice every block into `text` and return the new content.
///
/// Blocks are applied from the bottom of the file to the top so that each
/// insertion leaves the offsets of the remaining blocks valid. Blocks are
/// rendered with `\n` and written with the line ending of `text`.
pub fn apply_blocks<'a>(
	text: &str,
	blocks: impl IntoIterator<Item = &'a RenderedBlock>,
) -> String {
	let mut sorted: Vec<&RenderedBlock> = blocks.into_iter().collect();
	sorted.sort_by(|a, b| (b.start, b.end, &b.text).cmp(&(a.start, a.end, &a.text)));

	let newline = line_ending(text);
	let added: usize = sorted.iter().map(|block| block.text.len() * 2 + 2).sum();
	let mut result = text.to_string();

	for block in sorted {
		let (position, needs_newline) = insertion_point(&result, block);
		let mut buf = String::with_capacity(result.len() + added);
		buf.push_str(&result[..position]);
		if needs_newline {
			buf.push_str(newline);
		}
		buf.push_str(&with_line_ending(&block.text, newline));
		buf.push_str(&result[position..]);
		result = buf;
	}

	result
}

/// `"\r\n"` when the text already uses Windows line endings, `"\n"`
/// otherwise.
pub fn line_ending(text: &str) -> &'static str {
	match text.find('\n') {
		Some(index) if text[..index].ends_with('\r') => "\r\n",
		_ => "\n",
	}
}

fn with_line_ending<'t>(text: &'t str, newline: &str) -> Cow<'t, str> {
	if newline == "\n" || text.contains("\r\n") {
		Cow::Borrowed(text)
	} else {
		Cow::Owned(text.replace('\n', newline))
	}
}

/// The byte offset where `block` is inserted, and whether a newline must be
/// written first because the construct sits on the last unterminated line.
fn insertion_point(text: &str, block: &RenderedBlock) -> (usize, bool) {
	match block.placement {
		Placement::Before => {
			let start = block.start.min(text.len());
			let position = text[..start].rfind('\n').map_or(0, |index| index + 1);
			(position, false)
		}
		Placement::After => {
			let end = block.end.min(text.len());
			match text[end..].find('\n') {
				Some(index) => (end + index + 1, false),
				None => (text.len(), true),
			}
		}
	}
}

/// Tracks the lines inserted into a file so that a line of the current
/// content can be traced back to the line it had before any block was
/// written.
///
/// Each call to [`LineMap::record`] adds one layer, described in the
/// coordinates of the text the blocks were applied to.
#[derive(Debug, Clone, Default)]
pub struct LineMap {
	/// Per layer: `(first inserted line, number of inserted lines)`, sorted
	/// by line.
	layers: Vec<Vec<(usize, usize)>>,
}

impl LineMap {
	/// Remember the lines `blocks` add to `text`. Call before applying them.
	pub fn record<'a>(&mut self, text: &str, blocks: impl IntoIterator<Item = &'a RenderedBlock>) {
		let table = LineTable::new(text);
		let mut layer: Vec<(usize, usize)> = blocks
			.into_iter()
			.map(|block| {
				let (position, needs_newline) = insertion_point(text, block);
				let line = table.line_of(position) + usize::from(needs_newline);
				(line, block.text.lines().count())
			})
			.collect();
		layer.sort_unstable();
		self.layers.push(layer);
	}

	/// The line `line` of the current content had in the original content.
	pub fn original_line(&self, line: usize) -> usize {
		self.layers
			.iter()
			.rev()
			.fold(line, |line, layer| line_before_layer(layer, line))
	}

	pub fn is_empty(&self) -> bool {
		self.layers.iter().all(Vec::is_empty)
	}
}

/// Undo one layer of insertions for `line`.
fn line_before_layer(layer: &[(usize, usize)], line: usize) -> usize {
	let mut inserted = 0;

	for &(first, count) in layer {
		let shifted = first + inserted;
		if line < shifted + count {
			break;
		}
		inserted += count;
	}

	line - inserted
}

/// Overwrite `path` with `content`.
pub fn write_file(path: &Path, content: &str) -> DycResult<()> {
	std::fs::write(path, content).map_err(|e| DycError::file_access(path, &e))?;
	tracing::debug!(file = %path.display(), bytes = content.len(), "wrote file");

	Ok(())
}
