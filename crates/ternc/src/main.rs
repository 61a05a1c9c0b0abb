//! Tern compiler CLI

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tern_core::{print_unit, Compiler};

#[derive(Parser)]
#[command(name = "ternc")]
#[command(author, version, about = "Tern compiler", long_about = None)]
struct Cli {
    /// Enable verbose phase tracing
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the front-end over source files
    Check {
        /// Input file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit diagnostics as JSON records
        #[arg(long)]
        json: bool,
    },

    /// Parse a file and print it back
    Ast {
        /// Input file to parse
        file: PathBuf,

        /// Dump the raw arenas instead of surface syntax
        #[arg(long)]
        raw: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Check { files, json } => check(files, json),
        Commands::Ast { file, raw } => dump_ast(file, raw),
    }
}

fn check(files: Vec<PathBuf>, json: bool) -> Result<()> {
    let mut compiler = Compiler::new();
    let result = compiler.compile_files(&files);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&compiler.context().diagnostics)?
        );
    } else if !compiler.context().diagnostics.is_empty() {
        eprintln!("{}", compiler.render_diagnostics());
    }

    match result {
        Ok(units) => {
            let decls: usize = units.iter().map(|u| u.items.len()).sum();
            eprintln!("OK: {} declaration(s) in {} file(s)", decls, units.len());
            Ok(())
        }
        Err(e) => bail!("compilation failed: {}", e),
    }
}

fn dump_ast(file: PathBuf, raw: bool) -> Result<()> {
    let mut compiler = Compiler::new();
    let unit = match compiler.load_file(&file) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("{}", compiler.render_diagnostics());
            bail!("{}", e);
        }
    };

    if raw {
        println!("{:#?}", compiler.context().ast);
    } else {
        print!("{}", print_unit(compiler.context(), &unit));
    }
    Ok(())
}
