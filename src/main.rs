// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use termguard::app_config::{self, Config};
use termguard::file_utils::FileManager;
use termguard::terminology::{EnforcementEngine, GlossarySnapshot};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enforce the glossary on a text file or standard input
    Enforce {
        /// Input text file; reads standard input when omitted
        #[arg(value_name = "INPUT_PATH")]
        input_path: Option<PathBuf>,

        /// Glossary file (overrides the configured path)
        #[arg(short, long)]
        glossary: Option<PathBuf>,

        /// Write the result here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the result next to the input as NAME.enforced.EXT
        #[arg(short, long, conflicts_with = "output")]
        write: bool,

        /// Print the enforced text together with the audit trail as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a glossary and print its statistics
    Check {
        /// Glossary file (overrides the configured path)
        #[arg(short, long)]
        glossary: Option<PathBuf>,
    },

    /// Generate shell completions for termguard
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// termguard - deterministic glossary enforcement for machine translations
#[derive(Parser, Debug)]
#[command(name = "termguard")]
#[command(version)]
#[command(about = "Enforce glossary terminology on translated text")]
#[command(long_about = "termguard rewrites translated text so that every glossary term renders as its prescribed target form.

EXAMPLES:
    termguard enforce -g glossary.tsv report.txt        # Print the enforced text
    termguard enforce --json < report.txt               # Enforced text and audit trail as JSON
    termguard enforce -o report.nl.txt report.txt       # Write the result to a file
    termguard enforce -w report.txt                     # Write report.enforced.txt
    termguard check -g glossary.tsv                     # Validate a glossary
    termguard completions bash > termguard.bash         # Generate bash completions

GLOSSARY FORMAT:
    One mapping per line: source term, a tab, target term.
    Blank lines and lines starting with the comment marker (default '#') are ignored.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "termguard.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so enforced text on stdout stays clean
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "termguard", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.into());

    config.validate().context("Configuration validation failed")?;
    debug!("Using configuration from {}", cli.config_path);

    match cli.command {
        Commands::Enforce {
            input_path,
            glossary,
            output,
            write,
            json,
        } => {
            let output = output_target(input_path.as_deref(), output, write)?;
            run_enforce(&config, glossary, input_path, output, json)
        }
        Commands::Check { glossary } => run_check(&config, glossary),
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_glossary(config: &Config, glossary: Option<PathBuf>) -> Result<GlossarySnapshot> {
    let path = glossary.unwrap_or_else(|| PathBuf::from(&config.glossary.path));
    GlossarySnapshot::load(&path, &config.glossary.load_options())
        .with_context(|| format!("Refusing to enforce with glossary {}", path.display()))
}

// Suffix of files written next to their input
const ENFORCED_SUFFIX: &str = "enforced";

/// Where the enforced text goes; `None` means standard output
fn output_target(input_path: Option<&Path>, output: Option<PathBuf>, write: bool) -> Result<Option<PathBuf>> {
    if !write {
        return Ok(output);
    }
    match input_path {
        Some(input) => Ok(Some(FileManager::generate_output_path(input, ENFORCED_SUFFIX))),
        None => bail!("--write needs an input file"),
    }
}

fn run_enforce(
    config: &Config,
    glossary: Option<PathBuf>,
    input_path: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if let Some(input) = &input_path {
        if !FileManager::file_exists(input) {
            bail!("Input file not found: {}", input.display());
        }
    }
    let snapshot = load_glossary(config, glossary)?;
    let text = FileManager::read_input(input_path.as_deref())?;

    let result = EnforcementEngine::new().enforce(&text, &snapshot);
    info!(
        "Applied {} glossary terms ({} unique)",
        result.applied_terms().len(),
        result.summary().unique_terms
    );

    let rendered = if json {
        let mut json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize enforcement result")?;
        json.push('\n');
        json
    } else {
        result.enforced_text().to_string()
    };

    match output {
        Some(path) => {
            FileManager::write_to_file(&path, &rendered)?;
            info!("Wrote result to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to standard output")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn run_check(config: &Config, glossary: Option<PathBuf>) -> Result<()> {
    let snapshot = load_glossary(config, glossary)?;
    let stats = snapshot.stats();

    println!("terms:         {}", stats.total_terms);
    println!("longest term:  {} chars", stats.longest_term);
    println!("shortest term: {} chars", stats.shortest_term);
    println!("fingerprint:   {}", snapshot.fingerprint());

    let conflicts = snapshot.idempotence_conflicts();
    if conflicts.is_empty() {
        println!("re-enforcing enforced text is stable");
    } else {
        for conflict in &conflicts {
            warn!(
                "Target '{}' (line {}) would be rewritten again by '{}' (line {})",
                conflict.entry.target_term(),
                conflict.entry.line(),
                conflict.reenforced_by.source_term(),
                conflict.reenforced_by.line()
            );
        }
        println!("{} targets would be rewritten by a second pass", conflicts.len());
    }

    Ok(())
}
