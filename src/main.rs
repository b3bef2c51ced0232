//! stylescope: terminal style-document editor.
//!
//! Loads the bundled interface styles and token palette (or files given on
//! the command line), then drops into an interactive editing REPL. Loading
//! failures degrade to built-in fallback data so the editor is never empty.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use stylescope::editor::EditorSession;
use stylescope::palette::TokenPalette;
use stylescope::parser;
use stylescope::repl::{ReplLine, ReplOutputKind, StyleRepl};
use stylescope::{BUNDLED_PALETTE, BUNDLED_STYLES, logging};

/// Interactive editor for hierarchical JSON style documents
#[derive(Parser, Debug)]
#[command(name = "stylescope", version, about = "Interactive style document editor")]
struct Args {
    /// Style document to edit (defaults to the bundled interface styles)
    #[arg(short, long)]
    styles: Option<PathBuf>,

    /// Semantic-token palette (defaults to the bundled palette)
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Run the given command(s) and exit instead of reading stdin
    #[arg(short, long)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init();

    let parsed = match &args.styles {
        Some(path) => parser::load_from_path(path),
        None => parser::load_from_str(BUNDLED_STYLES),
    }
    .unwrap_or_else(|e| {
        warn!("style document unavailable ({e}), using fallback sample");
        parser::fallback_document()
    });

    let palette = TokenPalette::load_or_fallback(args.palette.as_deref(), BUNDLED_PALETTE);

    println!("stylescope v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "{} component(s) loaded — type `help` for commands",
        parsed.components.len()
    );

    let mut session = EditorSession::new(parsed, palette);
    let mut repl = StyleRepl::new();

    if !args.command.is_empty() {
        for command in &args.command {
            print_lines(&repl.execute(command, &mut session));
            if repl.is_done() {
                break;
            }
        }
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        print_lines(&repl.execute(&line, &mut session));
        if repl.is_done() {
            break;
        }
    }

    Ok(())
}

fn print_lines(lines: &[ReplLine]) {
    for (text, kind) in lines {
        match kind {
            ReplOutputKind::Error => eprintln!("error: {text}"),
            _ => println!("{text}"),
        }
    }
}
