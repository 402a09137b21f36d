mod check_state;
mod cli;
mod dir_list;
mod pattern;
mod pattern_file;
mod selection_file;

use check_state::CheckStateStore;
use cli::{Cli, Command, LogLevel, ToggleArgs};
use pattern::build_pattern;
use pattern_file::WriteOutcome;
use selection_file::{SelectionFile, apply_toggles};
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Event, Level, Subscriber, debug, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

struct PickExitCode;

impl PickExitCode {
    /// Exit code used when the pattern file could not be created.
    fn not_created() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used for other errors (I/O errors, invalid arguments, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    // Change working directory if -C was specified
    if let Some(directory) = cli.directory
        && let Err(e) = std::env::set_current_dir(&directory)
    {
        error!(
            "Failed to change directory to {}: {}",
            directory.display(),
            e
        );
        return PickExitCode::any_error();
    }

    let result: anyhow::Result<ExitCode> = match cli.command {
        Command::Pick {
            root,
            output,
            toggles,
            dry_run,
        } => handle_pick(&root, output, &toggles, dry_run),
        Command::State {
            root,
            toggles,
            paths,
        } => handle_state(&root, &toggles, &paths),
        Command::Show { file } => handle_show(&file),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err}");
            PickExitCode::any_error()
        }
    }
}

/// Replay the selection file and then every `--set` into a fresh store.
fn build_store(root: &Path, args: &ToggleArgs) -> anyhow::Result<CheckStateStore> {
    let mut store = CheckStateStore::new();

    if let Some(selection_path) = &args.selection {
        let selection = SelectionFile::load(selection_path)?;
        info!(
            "Applying {} toggles from {}",
            selection.toggles.len(),
            selection_path.display()
        );
        apply_toggles(&mut store, root, &selection.toggles);
    }

    apply_toggles(&mut store, root, &args.set);

    if store.is_empty() {
        info!("No toggles given, every file resolves to unchecked");
    } else {
        info!("{} overrides in effect", store.len());
    }
    for (path, state) in store.overrides() {
        debug!("Override {} = {}", path.display(), state);
    }

    Ok(store)
}

fn handle_pick(
    root: &Path,
    output: Option<PathBuf>,
    toggles: &ToggleArgs,
    dry_run: bool,
) -> anyhow::Result<ExitCode> {
    let store = build_store(root, toggles)?;
    let document = build_pattern(root, &store)?;

    let counts = document.counts();
    info!(
        "Recorded {} files ({} keep, {} delete)",
        counts.keep + counts.delete,
        counts.keep,
        counts.delete
    );

    let destination = match output {
        Some(destination) if !dry_run => destination,
        _ => {
            print!("{}", pattern_file::to_json(&document)?);
            info!("DRY RUN - no files were written");
            return Ok(ExitCode::SUCCESS);
        }
    };

    match pattern_file::write(&document, &destination) {
        WriteOutcome::Created(path) => {
            println!("Pattern file created successfully: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        WriteOutcome::Failed => {
            error!("Pattern file creation was not successful. Please try again.");
            Ok(PickExitCode::not_created())
        }
    }
}

fn handle_state(root: &Path, toggles: &ToggleArgs, paths: &[PathBuf]) -> anyhow::Result<ExitCode> {
    let store = build_store(root, toggles)?;

    for path in paths {
        let state = store.effective_state(&root.join(path));
        println!("{}\t{}", state, path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn handle_show(file: &Path) -> anyhow::Result<ExitCode> {
    let document = pattern_file::load(file)?;
    if document.is_empty() {
        info!("{} records no directory", file.display());
    }

    for record in document.records() {
        println!("{}\t{}", record.state.as_str(), record.rel_path);
    }

    let counts = document.counts();
    println!();
    println!("{} keep, {} delete", counts.keep, counts.delete);

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    let explicit_level = match (log_level, verbose) {
        (Some(level), _) => Some(level.as_filter()),
        (None, 0) => None,
        (None, 1) => Some("info"),
        (None, _) => Some("debug"),
    };

    let filter = match explicit_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::DEBUG => write!(writer, "🔍 ")?,
                Level::INFO => write!(writer, "ℹ️ ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::ERROR => write!(writer, "❌️ ")?,
                _ => {}
            }
        } else {
            match *event.metadata().level() {
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => {}
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
