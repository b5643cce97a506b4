//! pgsqlfmt — format PostgreSQL queries
//!
//! # Usage
//!
//! ```bash
//! # Format SQL from an argument or stdin
//! pgsqlfmt format "select user_name from users where user_uuid = :user_uuid"
//! cat query.sql | pgsqlfmt format
//!
//! # Rewrite SQL constants in Rust sources
//! pgsqlfmt fix src/
//!
//! # Fail when any SQL constant is not formatted
//! pgsqlfmt check src/ --json
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use pgsqlfmt::prelude::*;
use pgsqlfmt::rewrite::{RewrittenConst, rust_files};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "pgsqlfmt")]
#[command(version)]
#[command(about = "Canonical PostgreSQL formatter", long_about = None)]
#[command(after_help = "EXAMPLES:
    pgsqlfmt format 'select * from users where id = $1'
    pgsqlfmt fix src/ --indent tab
    pgsqlfmt check src/ --json")]
struct Cli {
    /// Style config file (default: ./.pgsqlfmt.toml, then the user config dir)
    #[arg(short, long, global = true, env = "PGSQLFMT_CONFIG")]
    config: Option<PathBuf>,

    /// Indentation unit
    #[arg(long, value_enum, global = true)]
    indent: Option<IndentArg>,

    /// Casing of known function names
    #[arg(long, value_enum, global = true)]
    func_case: Option<FuncCaseArg>,

    /// Indentation before join keywords
    #[arg(long, value_enum, global = true)]
    join_start_indent: Option<JoinStartArg>,

    /// Put ON predicates on their own line
    #[arg(long, value_enum, global = true)]
    join_line_break: Option<JoinBreakArg>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format SQL and print it
    Format {
        /// SQL text; read from stdin when omitted
        sql: Option<String>,
    },
    /// Rewrite SQL constants in Rust files in place
    Fix {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Report Rust files with unformatted SQL constants
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum IndentArg {
    Tab,
    TwoSpaces,
}

#[derive(Clone, Copy, ValueEnum)]
enum FuncCaseArg {
    Lower,
    Upper,
}

#[derive(Clone, Copy, ValueEnum)]
enum JoinStartArg {
    None,
    OneSpace,
}

#[derive(Clone, Copy, ValueEnum)]
enum JoinBreakArg {
    OnClause,
    Off,
}

#[derive(Serialize)]
struct CheckReport {
    files: Vec<FileReport>,
}

#[derive(Serialize)]
struct FileReport {
    path: String,
    constants: Vec<RewrittenConst>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "pgsqlfmt=debug" } else { "pgsqlfmt=warn" };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        level
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::WARN.into()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `false` when `check` found unformatted constants.
fn run(cli: &Cli) -> Result<bool> {
    let config = style_config(cli)?;

    match &cli.command {
        Commands::Format { sql } => {
            let input = match sql {
                Some(sql) => sql.clone(),
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };
            print!("{}", format_with(&input, &config)?);
            Ok(true)
        }
        Commands::Fix { paths } => {
            let mut fixed = 0;
            for file in paths.iter().flat_map(|p| rust_files(p)) {
                let Some(rewrite) = rewrite_file(&file, &config)? else {
                    continue;
                };
                if !rewrite.changed() {
                    continue;
                }
                std::fs::write(&file, &rewrite.source)
                    .with_context(|| format!("failed to write {}", file.display()))?;
                fixed += 1;
                println!(
                    "{} {} ({} constants)",
                    "✓".green(),
                    file.display().to_string().cyan(),
                    rewrite.rewritten.len()
                );
            }
            if cli.verbose {
                println!("{} {} files rewritten", "Done:".dimmed(), fixed);
            }
            Ok(true)
        }
        Commands::Check { paths, json } => {
            let report = check(paths, &config)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for file in &report.files {
                    for constant in &file.constants {
                        println!(
                            "{} {}:{} {}",
                            "✗".red(),
                            file.path.cyan(),
                            constant.line,
                            constant.name.yellow()
                        );
                    }
                }
                if report.files.is_empty() {
                    println!("{} all SQL constants are formatted", "✓".green());
                }
            }
            Ok(report.files.is_empty())
        }
    }
}

fn check(paths: &[PathBuf], config: &StyleConfig) -> Result<CheckReport> {
    let mut files = Vec::new();
    for file in paths.iter().flat_map(|p| rust_files(p)) {
        if let Some(rewrite) = rewrite_file(&file, config)?
            && rewrite.changed()
        {
            files.push(FileReport {
                path: file.display().to_string(),
                constants: rewrite.rewritten,
            });
        }
    }
    Ok(CheckReport { files })
}

fn style_config(cli: &Cli) -> Result<StyleConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StyleConfig::discover()?,
    };
    if let Some(indent) = cli.indent {
        config = config.with_indent_type(match indent {
            IndentArg::Tab => IndentType::Tab,
            IndentArg::TwoSpaces => IndentType::TwoSpaces,
        });
    }
    if let Some(case) = cli.func_case {
        config = config.with_func_name_case(match case {
            FuncCaseArg::Lower => FuncNameCase::Lower,
            FuncCaseArg::Upper => FuncNameCase::Upper,
        });
    }
    if let Some(start) = cli.join_start_indent {
        config = config.with_join_start_indent(match start {
            JoinStartArg::None => JoinStartIndent::None,
            JoinStartArg::OneSpace => JoinStartIndent::OneSpace,
        });
    }
    if let Some(line_break) = cli.join_line_break {
        config = config.with_join_line_break(match line_break {
            JoinBreakArg::OnClause => JoinLineBreak::OnClause,
            JoinBreakArg::Off => JoinLineBreak::Off,
        });
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<StyleConfig> {
    StyleConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
}
