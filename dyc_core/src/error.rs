use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DycError {
	#[error(transparent)]
	#[diagnostic(code(dyc::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to access `{path}`: {reason}")]
	#[diagnostic(code(dyc::file_access))]
	FileAccess { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(dyc::config_parse),
		help("check that dyc.toml is valid TOML with one [[formats]] table per extension")
	)]
	ConfigParse(String),

	#[error("missing `{token}` token for {kind} patterns of `.{extension}` files")]
	#[diagnostic(
		code(dyc::missing_token),
		help("set `{token}` under [formats.{kind}] for this extension")
	)]
	MissingToken {
		extension: String,
		kind: String,
		token: String,
	},

	#[error("invalid {kind} pattern for `.{extension}` files: {reason}")]
	#[diagnostic(
		code(dyc::invalid_pattern),
		help(
			"delimiters are used as regular expressions; escape special characters or set \
			 `doc_open_pattern` / `doc_close_pattern`"
		)
	)]
	Pattern {
		extension: String,
		kind: String,
		reason: String,
	},

	#[error("no format configured for `{0}`")]
	#[diagnostic(
		code(dyc::unknown_format),
		help("add a [[formats]] entry with a matching `extension` to dyc.toml")
	)]
	UnknownFormat(String),

	#[error("failed to load patch file `{path}`: {reason}")]
	#[diagnostic(
		code(dyc::patch_parse),
		help("patches are a JSON array of {{ path, additions: [{{ hunk: [start, end], patch }}] }}")
	)]
	PatchParse { path: String, reason: String },

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(dyc::template_render))]
	TemplateRender(String),

	#[error("documentation cancelled")]
	#[diagnostic(
		code(dyc::cancelled),
		help("files documented before the cancellation were kept")
	)]
	Cancelled,
}

impl DycError {
	/// Returns true when the error is the prompt service's cancellation
	/// signal rather than a failure.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}

	pub(crate) fn file_access(path: &std::path::Path, error: &std::io::Error) -> Self {
		Self::FileAccess {
			path: path.display().to_string(),
			reason: error.to_string(),
		}
	}
}

pub type DycResult<T> = Result<T, DycError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
