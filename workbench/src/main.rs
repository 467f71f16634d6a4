//! Command-line entry point for the project workbench.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use workbench::core::render::render_tree;
use workbench::exit_codes;
use workbench::io::config::{WorkbenchConfig, load_config, write_config};
use workbench::io::preview::BlobPreview;
use workbench::io::seed::load_project;
use workbench::logging;
use workbench::repl::run_repl;
use workbench::workspace::Workspace;

#[derive(Parser)]
#[command(
    name = "workbench",
    version,
    about = "In-memory project workbench with a simulated terminal"
)]
struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "workbench.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session on stdin/stdout.
    Repl,
    /// Run each line through the terminal, then print the transcript.
    Exec {
        /// Print the transcript as JSON lines instead of plain text.
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Print the project tree.
    Tree,
    /// Check a seed project file against the schema and tree invariants.
    Validate { path: PathBuf },
    /// Write a default config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Repl => cmd_repl(&cli.config),
        Command::Exec { json, lines } => cmd_exec(&cli.config, &lines, json),
        Command::Tree => cmd_tree(&cli.config),
        Command::Validate { path } => cmd_validate(&path),
        Command::InitConfig { force } => cmd_init_config(&cli.config, force),
    }
}

fn workspace(config_path: &Path) -> Result<Workspace<BlobPreview>> {
    let config = load_config(config_path)?;
    Workspace::from_config(&config)
}

fn cmd_repl(config_path: &Path) -> Result<()> {
    let mut workspace = workspace(config_path)?;
    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());
    run_repl(&mut workspace, stdin.lock(), &mut out)
}

fn cmd_exec(config_path: &Path, lines: &[String], json: bool) -> Result<()> {
    let mut workspace = workspace(config_path)?;
    for line in lines {
        workspace.submit(line);
    }

    let mut out = BufWriter::new(io::stdout().lock());
    for entry in workspace.transcript().entries() {
        if json {
            let payload = serde_json::to_string(entry).context("serialize transcript entry")?;
            writeln!(out, "{payload}").context("write transcript")?;
        } else {
            writeln!(out, "{}", entry.text).context("write transcript")?;
        }
    }
    out.flush().context("flush transcript")?;
    Ok(())
}

fn cmd_tree(config_path: &Path) -> Result<()> {
    let workspace = workspace(config_path)?;
    print!("{}", render_tree(workspace.tree().root()));
    Ok(())
}

fn cmd_validate(path: &Path) -> Result<()> {
    let tree = load_project(path)?;
    println!("ok: {} nodes", tree.nodes().len());
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &WorkbenchConfig::default())?;
    let written = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    println!("wrote {} ({} bytes)", path.display(), written.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exec_lines() {
        let cli = Cli::parse_from(["workbench", "exec", "ls", "pwd"]);
        match cli.command {
            Command::Exec { json, lines } => {
                assert!(!json);
                assert_eq!(lines, vec!["ls", "pwd"]);
            }
            _ => panic!("expected exec"),
        }
        assert_eq!(cli.config, PathBuf::from("workbench.toml"));
    }

    #[test]
    fn parse_global_config_after_subcommand() {
        let cli = Cli::parse_from(["workbench", "tree", "--config", "other.toml"]);
        assert!(matches!(cli.command, Command::Tree));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn parse_init_config_force() {
        let cli = Cli::parse_from(["workbench", "init-config", "--force"]);
        assert!(matches!(cli.command, Command::InitConfig { force: true }));
    }

    #[test]
    fn exec_requires_a_line() {
        assert!(Cli::try_parse_from(["workbench", "exec"]).is_err());
    }
}
