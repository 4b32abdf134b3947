pub mod common;
pub mod domain;
pub mod error;
pub mod loader;
pub mod parsers;
pub mod utils;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::{
    io::{BufRead, Write, stdin, stdout},
    path::PathBuf,
};
use tracing::info;

use crate::{
    domain::view_state::{LoadState, LoadStatus, ViewState},
    error::ViewError,
    loader::Loader,
    utils::{write_csv_records, write_view_lines},
};

/// The parser implementation that will be used
#[derive(Clone, Copy, Debug, Default, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ParserImplOptions {
    /// Hand written quote aware scanner
    #[default]
    Scan,
    /// Use the csv crate to split rows
    /// Obs: skips empty lines and keeps carriage returns inside quotes
    Csv,
}

/// How the visible records are printed
#[derive(Clone, Copy, Debug, Default, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormatOptions {
    /// One `Fruit (Form): $price unit` line per record
    #[default]
    Lines,
    /// The visible records, all columns, as csv
    Csv,
}

serde_plain::derive_display_from_serialize!(ParserImplOptions);
serde_plain::derive_display_from_serialize!(OutputFormatOptions);

/// Input for the fruit_prices program
#[derive(Parser)]
pub struct ViewCsvInput {
    /// The relative path of the csv file
    pub file: PathBuf,
    #[clap(flatten)]
    pub view_options: ViewOptions,
}

#[derive(Clone, Parser)]
pub struct ViewOptions {
    /// Only show records whose Fruit or Form contains this text, ignoring case
    #[arg(short, long, default_value = "")]
    pub query: String,
    #[arg(long, default_value_t = ParserImplOptions::Scan)]
    pub parser: ParserImplOptions,
    #[arg(long, default_value_t = OutputFormatOptions::Lines)]
    pub output: OutputFormatOptions,
    /// Read one query per line from stdin. `:reload` reads the file again, `:quit` exits
    #[arg(short, long)]
    pub interactive: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            parser: ParserImplOptions::Scan,
            output: OutputFormatOptions::Lines,
            interactive: false,
        }
    }
}

const RELOAD_COMMAND: &str = ":reload";
const QUIT_COMMAND: &str = ":quit";

/// Renders the view in the requested format
///
/// # Errors
///
/// Failed to write to W
pub fn render_view<W: Write>(
    view: &ViewState,
    format: OutputFormatOptions,
    w: W,
) -> Result<(), ViewError> {
    match (format, view.load_state()) {
        (OutputFormatOptions::Csv, LoadState::Loaded(dataset)) => {
            write_csv_records(&dataset.headers, view.visible(), w)?
        }
        _ => write_view_lines(view, w)?,
    }
    Ok(())
}

/// Loads the csv, then renders it once or, in interactive mode, once per query read from
/// `queries`. Returns the final load status.
///
/// # Errors
///
/// Failed to read queries or write the output
pub fn run_view<R: BufRead, W: Write>(
    input: &ViewCsvInput,
    queries: R,
    mut w: W,
) -> Result<LoadStatus, ViewError> {
    let options = &input.view_options;
    let mut loader = Loader::new(options.parser);
    let mut view = ViewState::new();
    view.set_query(&options.query);

    info!(file = %input.file.display(), parser = %options.parser, "loading csv");
    loader.reload(&mut view, &input.file)?;
    render_view(&view, options.output, &mut w)?;

    if options.interactive {
        for line in queries.lines() {
            let line = line?;
            match line.trim() {
                QUIT_COMMAND => break,
                RELOAD_COMMAND => loader.reload(&mut view, &input.file)?,
                _ => view.set_query(&line),
            }
            render_view(&view, options.output, &mut w)?;
            w.flush()?;
        }
    }
    w.flush()?;

    Ok(view.status())
}

/// Process a csv and write the visible records to stdout
///
/// # Errors
///
/// Failed to read stdin or write stdout
pub fn view_csv(input: &ViewCsvInput) -> Result<LoadStatus, ViewError> {
    run_view(input, stdin().lock(), stdout().lock())
}
