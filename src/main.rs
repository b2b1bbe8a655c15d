//! CLI entry point for qbuild

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qbuild::{
    CommentStyle, GitCommand, Listing, NativeIgnore, OutputConfig, PathFilter, TreeFormatter,
    TreeWalker, WalkerConfig, output::cprintln, print_json,
};
use termcolor::{Color, ColorChoice, StandardStream};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            is_terminal
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "qbuild")]
#[command(about = "Filesystem and git helpers for assembling challenge builds")]
#[command(version)]
struct Args {
    /// Log debug output to stderr (otherwise QBUILD_LOG controls logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List files and directories recursively (.git is always skipped)
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print paths relative to PATH
        #[arg(short, long)]
        relative: bool,

        /// List files only
        #[arg(short = 'f', long = "only-files")]
        only_files: bool,

        /// Skip paths ignored by .gitignore (PATH must be inside a git repository)
        #[arg(short = 'g', long = "gitignore")]
        gitignore: bool,

        /// Match ignore rules in-process instead of running git
        #[arg(long, requires = "gitignore")]
        native: bool,

        /// Git executable used for ignore queries
        #[arg(long, env = "QBUILD_GIT", default_value = "git")]
        git: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Draw a directory tree
    Tree {
        /// File or directory to draw
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Label for the root line (defaults to the directory name)
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Remove comment markers from each line of a file
    Uncomment {
        /// A commented sample line, e.g. "// CODE" or "/* CODE */"
        #[arg(short, long)]
        style: String,

        /// Marker standing for the code in the sample line
        #[arg(short, long, default_value = "CODE")]
        placeholder: String,

        /// File to read (standard input when omitted)
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let choice = if should_use_color(args.color, io::stderr().is_terminal()) {
                ColorChoice::Always
            } else {
                ColorChoice::Never
            };
            let mut stderr = StandardStream::stderr(choice);
            let _ = cprintln(&mut stderr, &format!("qbuild: {:#}", e), Some(Color::Red));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("QBUILD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Ls {
            path,
            relative,
            only_files,
            gitignore,
            native,
            git,
            json,
        } => {
            let config = WalkerConfig {
                relative: *relative,
                only_files: *only_files,
                use_gitignore: *gitignore,
            };
            let mut walker = TreeWalker::new(config);
            if *gitignore {
                let filter = if *native {
                    PathFilter::new(NativeIgnore::new())
                } else {
                    PathFilter::new(GitCommand::with_program(git))
                };
                walker = walker.with_filter(filter);
            }
            debug!(?config, native = *native, "listing {}", path.display());

            let context = || format!("cannot list '{}'", path.display());
            if *json {
                let paths = walker.walk(path).with_context(context)?;
                print_json(&Listing {
                    root: path,
                    paths: &paths,
                })?;
            } else {
                let mut stdout = io::stdout().lock();
                walker
                    .walk_each(path, |entry| {
                        writeln!(stdout, "{}", entry.path.display())?;
                        Ok(())
                    })
                    .with_context(context)?;
            }
        }
        Command::Tree { path, label } => {
            let use_color = should_use_color(args.color, io::stdout().is_terminal());
            TreeFormatter::new(OutputConfig {
                use_color,
                root_label: label.clone(),
            })
            .print(path)
            .with_context(|| format!("cannot draw '{}'", path.display()))?;
        }
        Command::Uncomment {
            style,
            placeholder,
            file,
        } => {
            let style = CommentStyle::detect(style, placeholder)?;
            let text = match file {
                Some(file) => fs::read_to_string(file)
                    .with_context(|| format!("cannot read '{}'", file.display()))?,
                None => {
                    let mut text = String::new();
                    io::stdin()
                        .read_to_string(&mut text)
                        .context("cannot read standard input")?;
                    text
                }
            };
            let mut stdout = io::stdout().lock();
            stdout.write_all(style.uncomment_text(&text).as_bytes())?;
        }
    }
    Ok(())
}
