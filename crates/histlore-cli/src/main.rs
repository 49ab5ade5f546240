mod cmd_aggregate;
mod cmd_diff;
mod cmd_generate;
mod cmd_import;
mod cmd_prepare;
mod cmd_prompt_export;
mod cmd_report;
mod cmd_run;
mod workspace;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "histlore",
    version,
    about = "Mine shell history into usage patterns and keep cheatsheets fresh"
)]
struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import histories from standard locations (bash/zsh/fish + $HISTFILE)
    Import,
    /// Parse histories and emit the normalized patterns snapshot
    Aggregate,
    /// Compare current patterns to state and plan regeneration
    Diff {
        /// Only consider the N most-used commands
        #[arg(long)]
        top_commands: Option<usize>,
    },
    /// Write per-command JSON prompts for generation
    Prepare {
        /// Cap the number of patterns included per command
        #[arg(long)]
        top_patterns_per_command: Option<usize>,
    },
    /// Write placeholder entries and update state (external generators are not wired)
    Generate {
        /// Generator mode: none or dry-run
        #[arg(long, default_value = "none")]
        generator: String,
        /// Cap the number of patterns included per command
        #[arg(long)]
        top_patterns_per_command: Option<usize>,
    },
    /// Emit a human-readable summary to stdout and output/report.txt
    Report {
        /// Limit for the top-commands table
        #[arg(long)]
        top_commands: Option<usize>,
        /// Limit for the top-flags table
        #[arg(long)]
        top_flags: Option<usize>,
        /// Limit for the top-options table
        #[arg(long)]
        top_options: Option<usize>,
    },
    /// Export web-ready prompts to output/prompts_web/
    PromptExport {
        /// Keep only the N most-used planned commands
        #[arg(long)]
        top_commands: Option<usize>,
        /// Cap the number of patterns included per command
        #[arg(long)]
        top_patterns_per_command: Option<usize>,
    },
    /// End-to-end aggregate -> diff -> prepare -> generate
    Run {
        /// Generator mode: none or dry-run
        #[arg(long, default_value = "none")]
        generator: String,
        /// Only consider the N most-used commands
        #[arg(long)]
        top_commands: Option<usize>,
        /// Cap the number of patterns included per command
        #[arg(long)]
        top_patterns_per_command: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.cmd {
        Command::Import => cmd_import::execute(&root),
        Command::Aggregate => cmd_aggregate::execute(&root),
        Command::Diff { top_commands } => cmd_diff::execute(&root, top_commands),
        Command::Prepare {
            top_patterns_per_command,
        } => cmd_prepare::execute(&root, top_patterns_per_command),
        Command::Generate {
            generator,
            top_patterns_per_command,
        } => cmd_generate::execute(&root, &generator, top_patterns_per_command),
        Command::Report {
            top_commands,
            top_flags,
            top_options,
        } => cmd_report::execute(
            &root,
            histlore_report::report::ReportLimits {
                top_commands,
                top_flags,
                top_options,
            },
        ),
        Command::PromptExport {
            top_commands,
            top_patterns_per_command,
        } => cmd_prompt_export::execute(&root, top_commands, top_patterns_per_command),
        Command::Run {
            generator,
            top_commands,
            top_patterns_per_command,
        } => cmd_run::execute(&root, &generator, top_commands, top_patterns_per_command),
    }
}
