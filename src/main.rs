/*!
 * Command-line interface for pastepack
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use pastepack::clipboard::ClipboardSink;
use pastepack::config::{Args, Config};
use pastepack::report::{BundleReport, ReportFormat, Reporter};
use pastepack::writer::{FileSink, OutputSink, StdoutSink};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "pastepack", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(args.quiet, args.verbose);

    // Create configuration
    let config = Config::from_args(args);

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {pos}/{len} {wide_msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    };

    let start_time = Instant::now();
    let result = match pastepack::pack(&config, Arc::new(progress.clone())) {
        Ok(result) => result,
        Err(e) => {
            progress.finish_and_clear();
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    progress.finish_and_clear();

    let artifact = result.artifact();
    let mut destinations = Vec::new();

    if let Some(out) = &config.output_file {
        let sink = FileSink::new(out);
        match sink.deliver(&artifact) {
            Ok(()) => {
                if !config.quiet {
                    eprintln!(
                        "Wrote {} chars to {}",
                        artifact.chars().count(),
                        sink.describe()
                    );
                }
                destinations.push(sink.describe());
            }
            Err(e) => log::error!("{}", e),
        }
    }

    let clipboard_ok = config.clip
        && match ClipboardSink.deliver(&artifact) {
            Ok(()) => {
                if !config.quiet {
                    eprintln!("Copied bundle to clipboard ✓");
                }
                destinations.push(ClipboardSink.describe());
                true
            }
            Err(e) => {
                log::error!("Clipboard copy failed: {}", e);
                false
            }
        };

    // Without the clipboard, the artifact always reaches stdout
    if !clipboard_ok {
        if let Err(e) = StdoutSink.deliver(&artifact) {
            eprintln!("Failed to print bundle: {}", e);
            return ExitCode::FAILURE;
        }
        destinations.push(StdoutSink.describe());
    }

    if !config.quiet {
        let report = BundleReport::from_result(&result, destinations, start_time.elapsed());
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

        if !result.warnings.is_empty() {
            eprintln!("\nWarnings:");
            for warning in &result.warnings {
                eprintln!("  - {}", warning);
            }
        }
    }

    ExitCode::SUCCESS
}

/// Install the terminal logger on stderr
fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    let log_config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .build();

    if let Err(e) = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
}
