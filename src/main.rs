use anyhow::{Context, Result};
use bpaf::Bpaf;
use rs_optin::output::{render_json, render_text};
use rs_optin::resolve::check_sources;
use rs_optin::DiagnosticKind;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Format {
    #[default]
    Text,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(format!("unknown format '{}'; expected: text, json", s)),
        }
    }
}

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage)]
/// Experimental-API usage gate: checks opt-in/propagation rules for gated APIs
///
/// Each input file is checked as one module named after its file stem.
/// Exit status is nonzero when any error-severity usage is found.
enum Cmd {
    /// Check a set of modules for gated API usage
    #[bpaf(command)]
    Check {
        /// Output format [text (default), json]
        #[bpaf(short, long, argument("FORMAT"), fallback(Format::default()))]
        format: Format,

        /// Treat warning-severity usages as fatal
        #[bpaf(long)]
        deny_warnings: bool,

        /// Input files (each file is one module)
        #[bpaf(positional("FILE"))]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    use bpaf::Args;

    let cmd = match cmd().run_inner(Args::current_args()) {
        Ok(cmd) => cmd,
        Err(bpaf::ParseFailure::Stdout(msg, _)) => {
            print!("{}", msg);
            std::process::exit(0);
        }
        Err(bpaf::ParseFailure::Completion(c)) => {
            print!("{}", c);
            std::process::exit(0);
        }
        Err(bpaf::ParseFailure::Stderr(_)) => {
            // Show help on any parse error
            if let Err(bpaf::ParseFailure::Stdout(help, _)) =
                cmd().run_inner(Args::from(&["--help"]))
            {
                print!("{}", help);
            }
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cmd {
        Cmd::Check {
            format,
            deny_warnings,
            files,
        } => {
            if files.is_empty() {
                anyhow::bail!("at least one input file is required");
            }

            let mut modules = Vec::new();
            for path in &files {
                let source = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .with_context(|| format!("{} has no usable file stem", path.display()))?
                    .to_string();
                modules.push((name, source));
            }

            let (index, diagnostics) = check_sources(&modules)?;
            tracing::info!(
                "checked {} module(s), {} finding(s)",
                modules.len(),
                diagnostics.len()
            );

            match format {
                Format::Text => print!("{}", render_text(&index, &diagnostics)),
                Format::Json => println!("{}", render_json(&index, &diagnostics)),
            }

            let fatal = diagnostics.iter().any(|d| {
                d.kind.is_fatal() || (deny_warnings && d.kind == DiagnosticKind::UsageWarning)
            });
            if fatal {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
