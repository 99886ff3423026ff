/*!
 * Command-line interface for dupsync
 */

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use dupsync::config::{Args, Config};
use dupsync::report::{Reporter, RunReport};
use dupsync::retention::select_from_directory;
use dupsync::sync::{SyncEvent, SyncPlan, SyncReporter, Synchronizer};
use dupsync::{logger, Result};

/// Turns synchronizer events into log lines, dry-run previews and progress
struct ConsoleReporter {
    progress: ProgressBar,
}

impl SyncReporter for ConsoleReporter {
    fn report(&self, event: &SyncEvent<'_>) {
        let message = event.describe();
        match event {
            SyncEvent::Keep { .. } => tracing::debug!("{}", message),
            SyncEvent::Delete { dry_run: true, .. } | SyncEvent::Copy { dry_run: true, .. } => {
                println!("{}", message)
            }
            SyncEvent::Delete { .. } => self.progress.suspend(|| tracing::info!("{}", message)),
            SyncEvent::Copy { destination, .. } => {
                self.progress.set_message(destination.display().to_string());
                self.progress.suspend(|| tracing::info!("{}", message));
            }
            SyncEvent::Copied { size, .. } => self.progress.inc(*size),
            SyncEvent::LimitReached { .. } => {
                self.progress.suspend(|| tracing::warn!("{}", message))
            }
        }
    }
}

fn create_progress_bar(config: &Config, total_bytes: u64) -> ProgressBar {
    if config.quiet || config.dry_run {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(total_bytes);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {wide_msg:.dim}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
    progress.set_prefix("Copying");
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn run(config: &Config) -> Result<u8> {
    config.validate()?;

    let selection = select_from_directory(&config.source_dir, config.nr_full)?;
    tracing::debug!(
        "Selected {} files from {} generations",
        selection.files.len(),
        selection.keys.len()
    );

    let plan = SyncPlan::compute(
        &config.source_dir,
        &config.destination_dir,
        &selection.files,
    )?;
    if plan.is_empty() {
        tracing::info!("{} is up to date", config.destination_dir.display());
    }

    let reporter = ConsoleReporter {
        progress: create_progress_bar(config, plan.bytes_to_copy()),
    };
    let outcome = Synchronizer::new(config.sync_options(), &reporter).apply(&plan)?;
    reporter.progress.finish_and_clear();

    if config.summary {
        let report = RunReport {
            generations: selection.keys.len(),
            full_backups: selection.full_backups,
            selected_files: selection.files.len(),
            max_total_bytes: config.max_total_bytes,
            outcome: outcome.clone(),
        };
        Reporter::new().print_report(&report);
    }

    Ok(outcome.status.exit_code() as u8)
}

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "dupsync", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = Config::from_args(args);
    logger::init(config.quiet);

    match run(&config) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
