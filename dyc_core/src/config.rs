use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ConstructKind;
use crate::DycError;
use crate::DycResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["dyc.toml", ".dyc.toml", ".config/dyc.toml"];

/// Default number of words per docstring line.
pub const DEFAULT_WORDS_PER_LINE: usize = 10;

/// Configuration loaded from a `dyc.toml` file.
///
/// ```toml
/// file_list = ["src/app.py"]
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["build/", "*_pb2.py"]
///
/// [include]
/// patterns = ["scripts/**/*.py"]
///
/// [[formats]]
/// extension = "py"
/// language = "python"
///
/// [formats.method]
/// indicator = "def"
/// end = ":"
/// doc_open = '"""'
/// doc_close = '"""'
/// within_scope = true
///
/// [formats.arguments]
/// ignore = ["self", "cls"]
/// add_type = true
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct DycConfig {
	/// Explicit list of files to document. When non-empty, file discovery is
	/// skipped entirely.
	#[serde(default)]
	pub file_list: Vec<PathBuf>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Inclusion configuration: additional glob patterns to scan.
	#[serde(default)]
	pub include: IncludeConfig,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
	/// Per-extension formats. An entry replaces the built-in format with the
	/// same extension.
	#[serde(default)]
	pub formats: Vec<FormatConfig>,
}

/// Configuration for excluding files and directories from discovery.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns, relative to the project root.
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Configuration for including additional files in discovery.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeConfig {
	/// Additional glob patterns for files to document, relative to the
	/// project root.
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Everything dyc knows about one file extension.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
	/// File extension without the leading dot (`"py"`).
	pub extension: String,
	/// Human readable language name, only used for reporting.
	#[serde(default)]
	pub language: Option<String>,
	/// File header documentation.
	#[serde(default)]
	pub top: ConstructConfig,
	/// Class documentation.
	#[serde(default)]
	pub class: ConstructConfig,
	/// Method and function documentation.
	#[serde(default)]
	pub method: ConstructConfig,
	/// Argument extraction and layout, shared by every method.
	#[serde(default)]
	pub arguments: ArgumentsConfig,
}

impl FormatConfig {
	/// The configuration record of one construct kind.
	pub fn construct(&self, kind: ConstructKind) -> &ConstructConfig {
		match kind {
			ConstructKind::Top => &self.top,
			ConstructKind::Class => &self.class,
			ConstructKind::Method => &self.method,
		}
	}

	/// The built-in Python format.
	pub fn python() -> Self {
		let docstring = ConstructConfig {
			doc_open: "\"\"\"".to_string(),
			doc_close: "\"\"\"".to_string(),
			..ConstructConfig::default()
		};

		Self {
			extension: "py".to_string(),
			language: Some("python".to_string()),
			top: docstring.clone(),
			class: ConstructConfig {
				indicator: "class".to_string(),
				end_name: Some("(".to_string()),
				end: ":".to_string(),
				within_scope: true,
				..docstring.clone()
			},
			method: ConstructConfig {
				indicator: "def".to_string(),
				end: ":".to_string(),
				within_scope: true,
				break_after_docstring: true,
				..docstring
			},
			arguments: ArgumentsConfig {
				ignore: vec!["self".to_string(), "cls".to_string()],
				add_type: true,
				title: Some("Parameters".to_string()),
				underline: true,
				..ArgumentsConfig::default()
			},
		}
	}
}

/// Pattern and layout options of one construct kind.
///
/// The same record describes file headers, classes and methods; fields that
/// do not apply to a kind are ignored (`end_name` only matters for classes,
/// `indicator` and `end` are unused by file headers).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConstructConfig {
	/// When false the kind is skipped for this extension.
	pub enabled: bool,
	/// Token that starts a construct (`def`, `class`, `function`).
	pub indicator: String,
	/// Token that ends the construct signature (`:`, `{`).
	pub end: String,
	/// Optional token that starts an inheritance clause (`(`, `extends`).
	pub end_name: Option<String>,
	/// Text that opens a documentation block.
	pub doc_open: String,
	/// Text that closes a documentation block.
	pub doc_close: String,
	/// Pattern used instead of `doc_open` when detecting existing
	/// documentation.
	pub doc_open_pattern: Option<String>,
	/// Pattern used instead of `doc_close` when detecting existing
	/// documentation.
	pub doc_close_pattern: Option<String>,
	/// Place documentation before the construct instead of after it.
	pub before: bool,
	/// Documentation goes inside the construct body and follows the body
	/// indentation.
	pub within_scope: bool,
	/// Tokens are regular expressions and must not be escaped.
	pub regex: bool,
	/// Maximum number of words per docstring line. `0` disables wrapping.
	pub words_per_line: usize,
	/// Indent unit: `"tab"`, `"N spaces"` or literal whitespace.
	pub indent: String,
	/// Indent applied to the lines between the delimiters.
	pub indent_content: IndentContent,
	/// Blank line after the opening delimiter.
	pub break_after_open: bool,
	/// Blank line after the docstring.
	pub break_after_docstring: bool,
	/// Blank line before the closing delimiter.
	pub break_before_close: bool,
	/// Construct names that are never documented.
	pub ignore: Vec<String>,
	/// Optional minijinja template replacing the default block layout.
	pub template: Option<String>,
}

impl Default for ConstructConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			indicator: String::new(),
			end: String::new(),
			end_name: None,
			doc_open: String::new(),
			doc_close: String::new(),
			doc_open_pattern: None,
			doc_close_pattern: None,
			before: false,
			within_scope: false,
			regex: false,
			words_per_line: DEFAULT_WORDS_PER_LINE,
			indent: "4 spaces".to_string(),
			indent_content: IndentContent::default(),
			break_after_open: false,
			break_after_docstring: false,
			break_before_close: false,
			ignore: Vec::new(),
			template: None,
		}
	}
}

/// Controls the indent of the lines between the documentation delimiters.
///
/// - `false`: no extra indent.
/// - `true`: one `indent` unit.
/// - a string: that unit (`"tab"`, `"2 spaces"` or literal whitespace).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum IndentContent {
	Enabled(bool),
	Unit(String),
}

impl Default for IndentContent {
	fn default() -> Self {
		Self::Enabled(false)
	}
}

impl IndentContent {
	/// Resolve to the literal inner indent given the configured indent unit.
	pub fn resolve(&self, indent: &str) -> String {
		match self {
			Self::Enabled(false) => String::new(),
			Self::Enabled(true) => convert_indent(indent),
			Self::Unit(unit) => convert_indent(unit),
		}
	}
}

/// Argument extraction and layout options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArgumentsConfig {
	/// Token opening the argument list.
	pub start_parameter: String,
	/// Token closing the argument list.
	pub end_parameter: String,
	/// Token separating arguments.
	pub parameter_split: String,
	/// Argument tokens are regular expressions and must not be escaped.
	pub regex: bool,
	/// Argument tokens that are never documented (`self`).
	pub ignore: Vec<String>,
	/// Ask for a type for each argument.
	pub add_type: bool,
	/// Title line of the argument section.
	pub title: Option<String>,
	/// Underline the title with dashes.
	pub underline: bool,
	/// Render every argument on a single line.
	pub inline: bool,
	/// Text placed before each argument entry.
	pub prefix: String,
}

impl Default for ArgumentsConfig {
	fn default() -> Self {
		Self {
			start_parameter: "(".to_string(),
			end_parameter: ")".to_string(),
			parameter_split: ",".to_string(),
			regex: false,
			ignore: Vec::new(),
			add_type: false,
			title: None,
			underline: false,
			inline: false,
			prefix: String::new(),
		}
	}
}

/// Translate an indent description into literal whitespace.
///
/// `"tab"` becomes a tab, `"4 spaces"` four spaces and anything else is used
/// verbatim.
pub fn convert_indent(indent: &str) -> String {
	let trimmed = indent.trim();
	if trimmed.eq_ignore_ascii_case("tab") || trimmed.eq_ignore_ascii_case("tabs") {
		return "\t".to_string();
	}

	let mut parts = trimmed.split_whitespace();
	if let (Some(count), Some(unit), None) = (parts.next(), parts.next(), parts.next()) {
		if matches!(unit, "space" | "spaces") {
			if let Ok(count) = count.parse::<usize>() {
				return " ".repeat(count);
			}
		}
	}

	indent.to_string()
}

impl DycConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> DycResult<Option<DycConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)
			.map_err(|e| DycError::file_access(&config_path, &e))?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Parse config file content.
	pub fn parse(content: &str) -> DycResult<DycConfig> {
		toml::from_str(content).map_err(|e| DycError::ConfigParse(e.to_string()))
	}

	/// The effective formats: the built-in ones, replaced or extended by the
	/// configured entries. Extensions are compared without a leading dot.
	pub fn formats(&self) -> Vec<FormatConfig> {
		let mut formats = vec![FormatConfig::python()];

		for configured in &self.formats {
			let mut configured = configured.clone();
			configured.extension = normalize_extension(&configured.extension);

			if let Some(existing) = formats
				.iter_mut()
				.find(|format| format.extension == configured.extension)
			{
				*existing = configured;
			} else {
				formats.push(configured);
			}
		}

		formats
	}
}

/// Strip a leading dot and lowercase an extension.
pub fn normalize_extension(extension: &str) -> String {
	extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// The normalized extension of a path, if any.
pub fn extension_of(path: &Path) -> Option<String> {
	path.extension()
		.and_then(|ext| ext.to_str())
		.map(normalize_extension)
}
