// ZQC: parser front end with multi-error recovery

mod cli;

use std::fs;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as _;
use log::{info, LevelFilter};

use cli::{Cli, Emit};
use zqc::dump;
use zqc::parser::{lexer, Parser, Token};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

/// Returns `Ok(false)` when the input had syntax errors.
fn run(cli: &Cli) -> Result<bool> {
    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let tokens = if cli.tokens {
        dump::tokens::read_tokens(&text)
            .with_context(|| format!("malformed token file {}", cli.input.display()))?
    } else {
        lexer::tokenize(&text)
    };
    info!("{} tokens from {}", tokens.len(), cli.input.display());

    let rendered = match cli.emit {
        Emit::Tokens => dump::tokens::write_tokens(&tokens),
        Emit::Tree | Emit::Source => match parse(cli, tokens) {
            Some(rendered) => rendered,
            None => return Ok(false),
        },
    };

    let path = cli.output_path();
    fs::write(&path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("Output saved at {}", path.display());
    Ok(true)
}

/// Parse and render the tree, or print the diagnostics and return `None`.
fn parse(cli: &Cli, tokens: Vec<Token>) -> Option<String> {
    let parser = Parser::new(tokens).with_config(cli.parser_config());
    let tokens = parser.tokens().to_vec();
    let output = parser.parse();

    if output.has_errors() {
        let color = !cli.no_color && io::stderr().is_terminal();
        eprintln!("{}", output.diagnostics.render(&tokens, color));
        eprintln!();
        eprintln!("{} syntax error(s) in {}", output.diagnostics.len(), cli.input.display());
        return None;
    }

    info!("parsed {} top-level declarations", output.unit.declarations.len());
    Some(match cli.emit {
        Emit::Source => dump::source::render(&output.unit),
        _ => dump::tree::render(&output.unit),
    })
}
