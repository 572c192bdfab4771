use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::DycError;
use crate::DycResult;
use crate::config::ArgumentsConfig;
use crate::config::ConstructConfig;

/// The three documentable construct kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructKind {
	/// The file header.
	Top,
	Class,
	Method,
}

impl ConstructKind {
	/// Every kind in processing order.
	pub const ALL: [Self; 3] = [Self::Top, Self::Class, Self::Method];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Top => "top",
			Self::Class => "class",
			Self::Method => "method",
		}
	}
}

impl fmt::Display for ConstructKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Where a documentation block goes relative to its construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
	/// On the line(s) above the construct.
	Before,
	/// On the line(s) below the construct signature.
	After,
}

/// Tokens delimiting and splitting a method's argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTokens {
	pub start: String,
	pub end: String,
	pub split: String,
	/// Tokens are already regular expressions.
	pub regex_enabled: bool,
	/// Argument tokens that are never documented.
	pub ignore: Vec<String>,
}

/// Immutable pattern configuration of one construct kind for one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
	pub kind: ConstructKind,
	pub extension: String,
	pub indicator: String,
	pub end: String,
	pub end_name: Option<String>,
	pub doc_open: String,
	pub doc_close: String,
	/// Pattern text used to detect an existing opening delimiter.
	pub doc_open_pattern: String,
	/// Pattern text used to detect an existing closing delimiter.
	pub doc_close_pattern: String,
	/// Present for methods only.
	pub arguments: Option<ArgumentTokens>,
	pub before: bool,
	pub within_scope: bool,
	pub regex_enabled: bool,
	/// Construct names that are never documented.
	pub ignore: Vec<String>,
}

impl PatternSpec {
	/// Build the spec of `kind` from its configuration record, validating that
	/// every token the kind needs is present.
	pub fn from_config(
		kind: ConstructKind,
		extension: &str,
		construct: &ConstructConfig,
		arguments: &ArgumentsConfig,
	) -> DycResult<Self> {
		let missing = |token: &str| {
			DycError::MissingToken {
				extension: extension.to_string(),
				kind: kind.to_string(),
				token: token.to_string(),
			}
		};

		if construct.doc_open.is_empty() {
			return Err(missing("doc_open"));
		}
		if construct.doc_close.is_empty() {
			return Err(missing("doc_close"));
		}

		if kind != ConstructKind::Top {
			if construct.indicator.is_empty() {
				return Err(missing("indicator"));
			}
			if construct.end.is_empty() {
				return Err(missing("end"));
			}
		}

		let arguments = if kind == ConstructKind::Method {
			if arguments.start_parameter.is_empty() {
				return Err(missing("start_parameter"));
			}
			if arguments.end_parameter.is_empty() {
				return Err(missing("end_parameter"));
			}
			if arguments.parameter_split.is_empty() {
				return Err(missing("parameter_split"));
			}

			Some(ArgumentTokens {
				start: arguments.start_parameter.clone(),
				end: arguments.end_parameter.clone(),
				split: arguments.parameter_split.clone(),
				regex_enabled: arguments.regex,
				ignore: arguments.ignore.clone(),
			})
		} else {
			None
		};

		// A file header is always written above everything else.
		let (before, within_scope) = match kind {
			ConstructKind::Top => (true, false),
			_ => (construct.before, construct.within_scope),
		};

		Ok(Self {
			kind,
			extension: extension.to_string(),
			indicator: construct.indicator.clone(),
			end: construct.end.clone(),
			end_name: construct
				.end_name
				.clone()
				.filter(|end_name| !end_name.is_empty()),
			doc_open: construct.doc_open.clone(),
			doc_close: construct.doc_close.clone(),
			doc_open_pattern: construct
				.doc_open_pattern
				.clone()
				.unwrap_or_else(|| construct.doc_open.clone()),
			doc_close_pattern: construct
				.doc_close_pattern
				.clone()
				.unwrap_or_else(|| construct.doc_close.clone()),
			arguments,
			before,
			within_scope,
			regex_enabled: construct.regex,
			ignore: construct.ignore.clone(),
		})
	}

	pub fn placement(&self) -> Placement {
		if self.before {
			Placement::Before
		} else {
			Placement::After
		}
	}

	/// The pattern source this spec compiles to.
	pub fn pattern(&self) -> String {
		if self.kind == ConstructKind::Top {
			return format!(r"(?s)\A\s*(?P<doc>{})?", self.doc_open_pattern);
		}

		let indicator = literal(&self.indicator, self.regex_enabled);
		let end = literal(&self.end, self.regex_enabled);

		let construct = match (&self.kind, &self.arguments) {
			(ConstructKind::Method, Some(arguments)) => {
				let start_parameter = literal(&arguments.start, arguments.regex_enabled);
				let end_parameter = literal(&arguments.end, arguments.regex_enabled);
				format!(
					r"(?P<indicator>{indicator})\s+(?P<name>.*?)\s*{start_parameter}(?P<args>.*?){end_parameter}\s*(?P<end>{end})"
				)
			}
			_ => {
				let end_name = self.end_name.as_deref().map_or_else(String::new, |end_name| {
					format!(
						"(?P<end_name>{}.*?)?",
						literal(end_name, self.regex_enabled)
					)
				});
				format!(r"(?P<indicator>{indicator})\s+(?P<name>\S+?)\s*{end_name}(?P<end>{end})")
			}
		};

		if self.before {
			format!(r"(?s)(?P<close>{})?\s*{construct}", self.doc_close_pattern)
		} else {
			format!(r"(?s){construct}\s*(?P<open>{})?", self.doc_open_pattern)
		}
	}

	/// Compile the spec into a matching grammar.
	pub fn compile(self) -> DycResult<Grammar> {
		let invalid = |reason: String| {
			DycError::Pattern {
				extension: self.extension.clone(),
				kind: self.kind.to_string(),
				reason,
			}
		};

		let regex = Regex::new(&self.pattern()).map_err(|e| invalid(e.to_string()))?;
		let splitter = match &self.arguments {
			Some(arguments) if arguments.regex_enabled => {
				Some(Splitter::Pattern(
					Regex::new(&arguments.split).map_err(|e| invalid(e.to_string()))?,
				))
			}
			Some(arguments) => Some(Splitter::Literal(arguments.split.clone())),
			None => None,
		};

		Ok(Grammar {
			spec: self,
			regex,
			splitter,
		})
	}
}

fn literal(token: &str, regex_enabled: bool) -> String {
	if regex_enabled {
		token.to_string()
	} else {
		regex::escape(token)
	}
}

#[derive(Debug, Clone)]
enum Splitter {
	Literal(String),
	Pattern(Regex),
}

/// A compiled [`PatternSpec`]. Read-only and reusable across files.
#[derive(Debug, Clone)]
pub struct Grammar {
	spec: PatternSpec,
	regex: Regex,
	splitter: Option<Splitter>,
}

impl Grammar {
	pub fn spec(&self) -> &PatternSpec {
		&self.spec
	}

	pub fn kind(&self) -> ConstructKind {
		self.spec.kind
	}

	pub fn regex(&self) -> &Regex {
		&self.regex
	}

	/// Split a captured argument list into raw argument tokens.
	pub fn split_arguments<'t>(&self, raw: &'t str) -> Vec<&'t str> {
		match &self.splitter {
			Some(Splitter::Literal(split)) => raw.split(split.as_str()).collect(),
			Some(Splitter::Pattern(split)) => split.split(raw).collect(),
			None => Vec::new(),
		}
	}
}
