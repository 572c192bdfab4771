use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use dyc_cli::Commands;
use dyc_cli::DycCli;
use dyc_cli::OutputFormat;
use dyc_cli::TerminalPrompt;
use dyc_core::AnyEmptyResult;
use dyc_core::AnyError;
use dyc_core::CONFIG_FILE_CANDIDATES;
use dyc_core::DocumentOptions;
use dyc_core::Documenter;
use dyc_core::DycConfig;
use dyc_core::DycError;
use dyc_core::FileReport;
use dyc_core::PatchSet;
use dyc_core::Pipelines;
use dyc_core::PlaceholderPrompt;
use dyc_core::PromptService;
use dyc_core::RunSummary;
use dyc_core::collect_files;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

const EXIT_FAILURES: i32 = 1;
const EXIT_FATAL: i32 = 2;
const EXIT_CANCELLED: i32 = 130;

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DycCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminals without color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Start {
			files,
			placeholders,
			yes,
			dry_run,
		}) => run_start(&args, files, *placeholders, *yes, *dry_run),
		Some(Commands::Diff {
			patches,
			placeholders,
			yes,
			dry_run,
		}) => run_diff(&args, patches, *placeholders, *yes, *dry_run),
		Some(Commands::List { files, format }) => run_list(&args, files, *format),
		None => {
			eprintln!("No subcommand specified. Run `dyc --help` for usage.");
			process::exit(EXIT_FAILURES);
		}
	};

	if let Err(e) = result {
		match e.downcast::<DycError>() {
			Ok(dyc_err) if dyc_err.is_cancelled() => {
				eprintln!("{} documentation cancelled", colored!("aborted:", yellow));
				process::exit(EXIT_CANCELLED);
			}
			Ok(dyc_err) => {
				let report: miette::Report = (*dyc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(EXIT_FATAL);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
	let default_level = if verbose { "dyc=debug,dyc_core=debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.init();
}

fn resolve_root(args: &DycCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

const SAMPLE_CONFIG: &str = r#"# dyc configuration
#
# Python files are supported out of the box. Add a [[formats]] entry to
# support another extension, or to change how Python is documented.

# Explicit list of files to document. When set, discovery is skipped.
# file_list = ["src/app.py"]

# Gitignore-style patterns excluded from discovery.
[exclude]
patterns = []

# Extra glob patterns included in discovery.
[include]
patterns = []

# [[formats]]
# extension = "js"
# language = "javascript"
#
# [formats.method]
# indicator = "function"
# end = "{"
# doc_open = "/**"
# doc_close = " */"
# doc_open_pattern = '/\*\*'
# doc_close_pattern = '\*/'
# before = true
# indent_content = " * "
# words_per_line = 10
#
# [formats.arguments]
# prefix = "@param"
# ignore = []
"#;

fn run_init(args: &DycCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = DycConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", CONFIG_FILE_CANDIDATES[0]);
	println!();
	println!("Next steps:");
	println!("  1. Run `dyc list` to see what is undocumented");
	println!("  2. Run `dyc start` to write the documentation");

	Ok(())
}

/// Load the config and compile every format. Configuration errors are
/// reported together and end the run before any file is read.
fn load_pipelines(root: &Path) -> Result<(DycConfig, Pipelines), AnyError> {
	let config = DycConfig::load(root)?.unwrap_or_default();
	let mut pipelines = Pipelines::compile(&config.formats());

	let errors = pipelines.take_errors();
	if !errors.is_empty() {
		let count = errors.len();
		for error in errors {
			let report: miette::Report = error.into();
			eprintln!("{report:?}");
		}
		eprintln!("{} {count} configuration error(s) found", colored!("error:", red));
		process::exit(EXIT_FATAL);
	}

	Ok((config, pipelines))
}

fn resolve_files(
	root: &Path,
	files: &[PathBuf],
	config: &DycConfig,
	pipelines: &Pipelines,
) -> Result<Vec<PathBuf>, AnyError> {
	if files.is_empty() {
		return Ok(collect_files(root, config, |path| pipelines.supports(path))?);
	}

	Ok(files.iter().map(|file| root.join(file)).collect())
}

fn run_start(
	args: &DycCli,
	files: &[PathBuf],
	placeholders: bool,
	yes: bool,
	dry_run: bool,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (config, pipelines) = load_pipelines(&root)?;
	let files = resolve_files(&root, files, &config, &pipelines)?;

	document(&root, pipelines, &files, None, placeholders, yes, dry_run)
}

fn run_diff(
	args: &DycCli,
	patches: &Path,
	placeholders: bool,
	yes: bool,
	dry_run: bool,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (_, pipelines) = load_pipelines(&root)?;
	let patch_set = PatchSet::load(&root.join(patches))?;

	let files: Vec<PathBuf> = patch_set
		.paths()
		.into_iter()
		.map(|path| root.join(path))
		.filter(|path| pipelines.supports(path))
		.collect();

	document(
		&root,
		pipelines,
		&files,
		Some(&patch_set),
		placeholders,
		yes,
		dry_run,
	)
}

#[allow(clippy::fn_params_excessive_bools)]
fn document(
	root: &Path,
	pipelines: Pipelines,
	files: &[PathBuf],
	patches: Option<&PatchSet>,
	placeholders: bool,
	yes: bool,
	dry_run: bool,
) -> AnyEmptyResult {
	if files.is_empty() {
		println!("No files to document.");
		return Ok(());
	}

	let mut placeholder_prompt = PlaceholderPrompt;
	let mut terminal_prompt = TerminalPrompt::new(root, yes);
	let prompt: &mut dyn PromptService = if placeholders {
		&mut placeholder_prompt
	} else {
		&mut terminal_prompt
	};
	let options = DocumentOptions {
		review: !placeholders,
		dry_run,
	};
	tracing::debug!(files = files.len(), placeholders, dry_run, "documenting");

	let mut documenter = Documenter::new(pipelines, prompt, options);
	let summary = documenter.document_files(files, patches)?;

	print_summary(&summary, root, dry_run);

	if !summary.is_ok() {
		process::exit(EXIT_FAILURES);
	}

	Ok(())
}

fn print_summary(summary: &RunSummary, root: &Path, dry_run: bool) {
	let changed: Vec<&FileReport> = summary
		.files
		.iter()
		.filter(|report| report.changed())
		.collect();

	for report in &changed {
		let rel = make_relative(&report.path, root);
		let count = report.documented_count();
		if dry_run {
			println!("{} {rel} ({count} block(s))", colored!("Would document", yellow));
			print_diff(&report.original, &report.updated);
		} else {
			println!("{} {rel} ({count} block(s))", colored!("Documented", green));
		}
	}

	for path in &summary.skipped {
		println!("Skipped {}", make_relative(path, root));
	}

	for (path, error) in &summary.failures {
		eprintln!(
			"{} {}: {error}",
			colored!("error:", red),
			make_relative(path, root)
		);
	}

	if changed.is_empty() {
		println!("Nothing to document.");
	} else {
		let verb = if dry_run { "Would document" } else { "Documented" };
		println!(
			"\n{verb} {} construct(s) across {} file(s).",
			summary.documented_count(),
			changed.len()
		);
	}
}

fn run_list(args: &DycCli, files: &[PathBuf], format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (config, pipelines) = load_pipelines(&root)?;
	let files = resolve_files(&root, files, &config, &pipelines)?;

	let mut entries = Vec::new();
	for file in &files {
		let sessions = match pipelines.scan_file(file, None) {
			Ok(sessions) => sessions,
			Err(error) => {
				eprintln!(
					"{} {}: {error}",
					colored!("error:", red),
					make_relative(file, &root)
				);
				continue;
			}
		};

		for session in &sessions {
			for candidate in session.candidates() {
				entries.push(serde_json::json!({
					"file": make_relative(&candidate.file, &root),
					"line": candidate.line,
					"kind": candidate.kind,
					"name": make_name(candidate.kind, &candidate.name, &root),
					"arguments": candidate.arguments,
				}));
			}
		}
	}

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&entries)?);
		}
		OutputFormat::Text => {
			if entries.is_empty() {
				println!("Everything is documented.");
				return Ok(());
			}

			for entry in &entries {
				println!(
					"{}:{} {} {}",
					entry["file"].as_str().unwrap_or_default(),
					entry["line"],
					colored!(entry["kind"].as_str().unwrap_or_default(), bold),
					entry["name"].as_str().unwrap_or_default()
				);
			}
			println!("\nFound {} undocumented construct(s).", entries.len());
		}
	}

	Ok(())
}

/// File header candidates are named after their file; show it relative.
fn make_name(kind: dyc_core::ConstructKind, name: &str, root: &Path) -> String {
	match kind {
		dyc_core::ConstructKind::Top => make_relative(Path::new(name), root),
		_ => name.to_string(),
	}
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
