//! refman: extract the LuaRadio reference manual model from annotated Lua sources.
//!
//! Doc comments open with a bare `---` line and continue with `--` lines
//! carrying a description and `@tag` annotations. Two modes:
//!
//! - **stdin mode**: `refman < radio/blocks/signal/firfilter.lua`
//! - **file mode**: `refman -o refman.json radio/`

mod assemble;
mod error;
mod model;
mod parser;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "refman",
    version,
    about = "Extract reference documentation from annotated Lua source files"
)]
struct Cli {
    /// Input files, directories (searched recursively for .lua files) or
    /// glob patterns. If omitted, reads one file from stdin.
    paths: Vec<String>,

    /// Write output to a file instead of stdout. If this is a directory,
    /// writes refman.<format extension> inside it.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default) or dump
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Skip discovered files under a directory with this name.
    /// Can be specified multiple times.
    #[arg(long, default_value = "thirdparty")]
    exclude: Vec<String>,

    /// Also print the debug dump to stderr
    #[arg(long)]
    dump: bool,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let renderer = render::create_renderer(&cli.format)?;

    let docs = if cli.paths.is_empty() {
        stdin_mode()?
    } else {
        file_mode(&cli)?
    };

    let reference = assemble::organize(&docs)?;
    tracing::info!(
        "organized {} block categories, {} modules, {} datatypes",
        reference.blocks.len(),
        reference.modules.len(),
        reference.datatypes.len()
    );

    if cli.dump {
        eprint!("{}", render::dump::dump(&reference));
    }

    // Render fully before writing so a failure never leaves partial output.
    let output = renderer.render(&reference)?;

    match cli.output {
        Some(ref path) => {
            let path = if path.is_dir() {
                path.join(format!("refman.{}", renderer.file_extension()))
            } else {
                path.clone()
            };
            fs::write(&path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// stdin mode: document a single source read from stdin.
fn stdin_mode() -> Result<Vec<model::Doc>> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    document_file("<stdin>", &input)
}

/// file mode: document every discovered file, in sorted path order.
fn file_mode(cli: &Cli) -> Result<Vec<model::Doc>> {
    let input_files = expand_paths(&cli.paths, &cli.exclude)?;
    tracing::info!("scanning {} source files", input_files.len());

    let mut docs = Vec::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        docs.extend(document_file(&path.to_string_lossy(), &content)?);
    }

    Ok(docs)
}

/// Decode and assemble one file. Each file starts with no current namespace.
fn document_file(path: &str, content: &str) -> Result<Vec<model::Doc>> {
    let entries = parser::parse_file(path, content)?;
    tracing::debug!("{}: {} documentation records", path, entries.len());
    Ok(assemble::assemble(entries)?)
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["lua"];

/// Expand paths and glob patterns into a sorted list of source files.
/// Directories are searched recursively.
fn expand_paths(patterns: &[String], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let pattern = if path.is_dir() {
            format!("{}/**/*.{}", pattern.trim_end_matches('/'), SUPPORTED_EXTENSIONS[0])
        } else {
            pattern.clone()
        };

        let root = glob_root(&pattern);
        let matches: Vec<_> = glob::glob(&pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| {
                let relative = p.strip_prefix(&root).unwrap_or(p);
                p.is_file() && is_supported(p) && !is_excluded(relative, exclude)
            })
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Namespace assembly is order dependent; sort for reproducible output.
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Leading components of a glob pattern that contain no wildcards.
fn glob_root(pattern: &str) -> PathBuf {
    Path::new(pattern)
        .components()
        .take_while(|c| !c.as_os_str().to_string_lossy().contains(['*', '?', '[']))
        .collect()
}

/// True if any directory component of `path` is one of `exclude`.
fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    path.parent().is_some_and(|dir| {
        dir.components()
            .any(|c| exclude.iter().any(|e| c.as_os_str() == e.as_str()))
    })
}
