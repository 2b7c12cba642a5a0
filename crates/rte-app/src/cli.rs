use std::path::PathBuf;

use clap::Parser;

/// Smart RTE: a rich-text editor hosted in a native window.
#[derive(Parser, Debug)]
#[command(name = "rte", version, about)]
pub struct Args {
    /// HTML file loaded as the initial content.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// File rewritten with the document on every change (headless: once).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run without a window: load the content through the headless editor
    /// surface and print the normalised document.
    #[arg(long)]
    pub headless: bool,

    /// Emit Markdown instead of HTML.
    #[arg(long)]
    pub markdown: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
