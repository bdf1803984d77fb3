//! CLI entry point for importguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `importguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use importguard_app::{
    CheckInput, ConfigSource, ExplainOutput, HostSession, load_policy, parse_report_json,
    render_annotations, render_markdown, render_text, run_check, run_explain,
    runtime_error_report, serialize_report, to_renderable, verdict_exit_code,
};
use importguard_settings::Overrides;
use importguard_types::ImportguardReport;
use std::io::Read;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "IMPORTGUARD_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "importguard",
    version,
    about = "Import-boundary policy guard for JavaScript and TypeScript codebases"
)]
struct Cli {
    /// Repository root; file globs are matched against paths relative to it.
    #[arg(long, global = true, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Path to importguard config TOML (relative to the repo root).
    #[arg(long, global = true, default_value = "importguard.toml")]
    config: Utf8PathBuf,

    /// Read the policy from the plugin entry of this tsconfig.json instead of --config.
    #[arg(long, global = true)]
    tsconfig: Option<Utf8PathBuf>,

    /// Override maximum findings to emit.
    #[arg(long, global = true)]
    max_findings: Option<u32>,

    /// Replace the configured include globs (repeatable).
    #[arg(long, global = true)]
    include: Vec<String>,

    /// Add exclude globs (repeatable).
    #[arg(long, global = true)]
    exclude: Vec<String>,

    /// Log more (-v debug, -vv trace). IMPORTGUARD_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Compiler-style diagnostics on stdout.
    Text,
    /// Nothing on stdout; the JSON report only.
    Quiet,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the repository, evaluate the import policy, and write artifacts.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/importguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/importguard/comment.md")]
        markdown_out: Utf8PathBuf,

        /// What to print on stdout.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/importguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/importguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (`imports.allowed`), code (`disallowed`), or numeric code (`2`).
        identifier: String,
    },

    /// Evaluate one host request (JSON on stdin) and print the merged diagnostics.
    Eval {
        /// Read the request from this file instead of stdin.
        #[arg(long)]
        input: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.cmd {
        Commands::Check {
            report_out,
            write_markdown,
            markdown_out,
            format,
        } => cmd_check(&cli, report_out, *write_markdown, markdown_out, *format),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
        Commands::Explain { identifier } => cmd_explain(identifier),
        Commands::Eval { input } => cmd_eval(&cli, input.as_deref()),
    }
}

/// Logs go to stderr; stdout carries reports and host responses.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_repo_root(cli: &Cli) -> Utf8PathBuf {
    cli.repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone())
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        max_findings: cli.max_findings,
        include: cli.include.clone(),
        exclude: cli.exclude.clone(),
    }
}

/// Policy text and its format. A missing TOML config is allowed (defaults apply);
/// an explicit --tsconfig must exist.
fn load_config(cli: &Cli, repo_root: &Utf8Path) -> anyhow::Result<(bool, String)> {
    if let Some(tsconfig) = &cli.tsconfig {
        let path = repo_root.join(tsconfig);
        let text =
            std::fs::read_to_string(&path).with_context(|| format!("read tsconfig: {}", path))?;
        return Ok((true, text));
    }

    let path = repo_root.join(&cli.config);
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok((false, text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(config = %path, "config not found; no import rules apply");
            Ok((false, String::new()))
        }
        Err(err) => Err(err).with_context(|| format!("read config: {}", path)),
    }
}

fn config_source(is_tsconfig: bool, text: &str) -> ConfigSource<'_> {
    if is_tsconfig {
        ConfigSource::Tsconfig(text)
    } else {
        ConfigSource::Toml(text)
    }
}

fn cmd_check(
    cli: &Cli,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let repo_root = resolve_repo_root(cli);

    let result = (|| -> anyhow::Result<i32> {
        if !repo_root.is_dir() {
            anyhow::bail!("repo root does not exist: {}", repo_root);
        }
        let (is_tsconfig, cfg_text) = load_config(cli, &repo_root)?;
        let config = config_source(is_tsconfig, &cfg_text);

        let output = run_check(CheckInput {
            repo_root: &repo_root,
            config,
            overrides: overrides(cli),
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;

        let renderable = to_renderable(&output.report);
        if write_markdown {
            let md = render_markdown(&renderable);
            write_text_file(markdown_out, &md).context("write markdown")?;
        }
        if format == OutputFormat::Text {
            print!("{}", render_text(&renderable));
        }

        Ok(verdict_exit_code(output.report.verdict.status))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Err(write_err) = write_report_file(report_out, &report) {
                tracing::warn!(error = %format!("{write_err:#}"), "could not write error report");
            }
            eprintln!("importguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &ImportguardReport) -> anyhow::Result<()> {
    let data = serialize_report(report).context("serialize report")?;
    write_bytes(path, &data).with_context(|| format!("write report: {}", path))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {}", path))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn read_report(report_path: &Utf8Path) -> anyhow::Result<ImportguardReport> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    parse_report_json(&report_text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{}", md),
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", importguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                importguard_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_eval(cli: &Cli, input: Option<&Utf8Path>) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<String> {
        let repo_root = resolve_repo_root(cli);
        let (is_tsconfig, cfg_text) = load_config(cli, &repo_root)?;
        let source = config_source(is_tsconfig, &cfg_text);
        let resolved = load_policy(source, overrides(cli))?;

        let request = match input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("read request: {}", path))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("read request from stdin")?;
                buf
            }
        };

        let session = HostSession::new(&resolved.policy, &repo_root);
        Ok(session.handle_json(&request)?)
    })();

    match result {
        Ok(response) => {
            println!("{}", response);
            Ok(())
        }
        Err(err) => {
            eprintln!("importguard error: {err:#}");
            std::process::exit(1);
        }
    }
}
