use std::io::Write;

use crate::domain::{
    display::display_line,
    record::Record,
    view_state::{LoadState, ViewState},
};

pub const LOADING_MESSAGE: &str = "Loading…";
pub const NO_RESULTS_MESSAGE: &str = "No results match your search.";

/// Writes the header and then the records as a csv to the writer (W). The header is written
/// even when there are no records.
///
/// # Errors
///
/// Failed to write the csv
pub fn write_csv_records<'a, Input, W>(
    headers: &[String],
    records: Input,
    w: W,
) -> Result<(), csv::Error>
where
    Input: IntoIterator<Item = &'a Record>,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(w);

    wtr.write_record(headers)?;
    for record in records {
        wtr.write_record(headers.iter().map(|key| record.field(key)))?;
    }
    wtr.flush()?;

    Ok(())
}

/// Writes the status of the view, or one display line per visible record
///
/// # Errors
///
/// Failed to write to W
pub fn write_view_lines<W: Write>(view: &ViewState, mut w: W) -> std::io::Result<()> {
    match view.load_state() {
        LoadState::Idle => Ok(()),
        LoadState::Loading => writeln!(w, "{LOADING_MESSAGE}"),
        LoadState::Failed(err) => writeln!(w, "Error: {err}"),
        LoadState::Loaded(_) => {
            let visible = view.visible();
            if visible.is_empty() {
                return writeln!(w, "{NO_RESULTS_MESSAGE}");
            }
            for record in visible {
                writeln!(w, "{}", display_line(record))?;
            }
            Ok(())
        }
    }
}
