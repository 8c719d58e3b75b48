//! Command-line interface
//!
//! Argument parsing for the `zqc` driver using clap.

use clap::{Parser as CliParser, ValueEnum};
use std::path::{Path, PathBuf};
use zqc::parser::parse::DEFAULT_MAX_NESTING;
use zqc::parser::ParserConfig;

/// What the driver writes once parsing succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The syntax tree as XML
    Tree,
    /// The token stream in the token file format (no parsing)
    Tokens,
    /// The syntax tree printed back as source
    Source,
}

#[derive(CliParser, Debug)]
#[clap(
    name = "zqc",
    version,
    about = "Parse a ZQC source file and report every syntax error"
)]
pub struct Cli {
    /// Input source file, or a token file with --tokens
    #[clap(value_parser)]
    pub input: PathBuf,

    /// Treat the input as a token file instead of source text
    #[clap(long)]
    pub tokens: bool,

    /// Output file (default: derived from the input name)
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// What to write
    #[clap(long, value_enum, default_value = "tree")]
    pub emit: Emit,

    /// Print diagnostics without colors
    #[clap(long)]
    pub no_color: bool,

    /// Deepest grammar nesting accepted before giving up on an item
    #[clap(long, value_name = "LEVELS", default_value_t = DEFAULT_MAX_NESTING)]
    pub max_nesting: usize,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            max_nesting: self.max_nesting,
        }
    }

    /// `-o`, or `<input>.xml` for tokens, `<input>_tree.xml` for the tree
    /// and `<input>_source.c` for source.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => with_suffix(
                &self.input,
                match self.emit {
                    Emit::Tree => "_tree.xml",
                    Emit::Tokens => ".xml",
                    Emit::Source => "_source.c",
                },
            ),
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
