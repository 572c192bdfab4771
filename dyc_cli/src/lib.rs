use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

pub use terminal::TerminalPrompt;

mod terminal;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Document your code: find undocumented classes and methods and write docstrings in place.",
	long_about = "dyc (document your code) scans source files for file headers, classes and \
	              methods that have no documentation yet, asks you for the text and writes the \
	              documentation blocks straight into the files.\n\nQuick start:\n  dyc init     \
	              Create a sample dyc.toml\n  dyc list     Show undocumented constructs\n  dyc \
	              start    Document every discovered file\n  dyc diff     Document only what a \
	              patch touched"
)]
pub struct DycCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `dyc.toml` in the project root.
	///
	/// The sample lists the built-in Python format and a commented
	/// JavaScript example. If a config file already exists, this command is
	/// a no-op and exits successfully.
	Init,
	/// Document every undocumented construct in the given files.
	///
	/// Without files, every file under the project root with a configured
	/// extension is processed, honouring `.gitignore` and the `[exclude]`
	/// and `[include]` patterns of `dyc.toml`. For each construct you are
	/// asked for a docstring (and argument descriptions for methods), then
	/// the rendered block opens in your editor for a final review.
	Start {
		/// Files to document, relative to the project root.
		files: Vec<PathBuf>,

		/// Insert placeholder text instead of asking for it. Nothing is
		/// prompted and no editor is opened.
		#[arg(long, default_value_t = false)]
		placeholders: bool,

		/// Do not ask for confirmation before documenting each file.
		#[arg(long, short, default_value_t = false)]
		yes: bool,

		/// Show the changes as a diff without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Document only the constructs touched by a patch.
	///
	/// The patch file is a JSON array of `{ path, additions: [{ hunk: [start,
	/// end], patch }] }` entries. A construct is documented when a hunk
	/// covers its first line and contains its text.
	Diff {
		/// Patch JSON file.
		#[arg(long)]
		patches: PathBuf,

		/// Insert placeholder text instead of asking for it.
		#[arg(long, default_value_t = false)]
		placeholders: bool,

		/// Do not ask for confirmation before documenting each file.
		#[arg(long, short, default_value_t = false)]
		yes: bool,

		/// Show the changes as a diff without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// List undocumented constructs without changing anything.
	List {
		/// Files to inspect, relative to the project root.
		files: Vec<PathBuf>,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each entry includes the
	/// file path, line, construct kind, name and argument names.
	Json,
}
