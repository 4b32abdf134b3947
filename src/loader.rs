use std::{
    path::{Path, PathBuf},
    thread::JoinHandle,
};

use tracing::{debug, trace};

use crate::{
    ParserImplOptions,
    domain::{
        record::{Dataset, to_dataset},
        view_state::{LoadTicket, ViewState},
    },
    error::LoadError,
    parsers::csv_parser::{CsvRowParserCrateImpl, CsvRowParserScanImpl, RowParserTrait},
};

/// The outcome of one load, tagged with the ticket it was issued under
#[derive(Debug)]
pub struct LoadMessage {
    pub ticket: LoadTicket,
    pub result: Result<Dataset, LoadError>,
}

/// Decodes raw bytes as UTF-8, replacing invalid sequences and dropping a leading byte order mark
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&*text).to_owned()
}

/// Parses `text` and builds its header and records
///
/// # Errors
///
/// The text has no rows at all
pub fn dataset_from_text<RowParser: RowParserTrait>(
    parser: &mut RowParser,
    text: &str,
) -> Result<Dataset, LoadError> {
    let rows = parser.parse_rows(text);
    trace!(rows = rows.len(), "parsed rows");

    Ok(to_dataset(rows)?)
}

/// Parses `text` with the selected parser implementation
pub fn load_text(text: &str, parser: ParserImplOptions) -> Result<Dataset, LoadError> {
    match parser {
        ParserImplOptions::Scan => dataset_from_text(&mut CsvRowParserScanImpl, text),
        ParserImplOptions::Csv => dataset_from_text(&mut CsvRowParserCrateImpl::default(), text),
    }
}

/// Reads, decodes and parses the file at `path`
pub fn load_file(path: &Path, parser: ParserImplOptions) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read csv");

    load_text(&decode_text(&bytes), parser)
}

/// Runs loads on worker threads and hands their results back over a channel. Every load gets
/// its own channel and only the worker holds the sender, so a worker that dies without reporting
/// closes the channel.
pub struct Loader {
    parser: ParserImplOptions,
    current: Option<kanal::Receiver<LoadMessage>>,
}

impl Loader {
    pub fn new(parser: ParserImplOptions) -> Self {
        Self {
            parser,
            current: None,
        }
    }

    /// Loads `path` in the background under `ticket`
    pub fn spawn(&mut self, path: PathBuf, ticket: LoadTicket) -> JoinHandle<()> {
        let parser = self.parser;
        self.spawn_with(ticket, move || load_file(&path, parser))
    }

    /// Runs `job` in the background under `ticket`. The receiver of any earlier load is dropped,
    /// so a superseded load never reaches the view.
    pub fn spawn_with<Job>(&mut self, ticket: LoadTicket, job: Job) -> JoinHandle<()>
    where
        Job: FnOnce() -> Result<Dataset, LoadError> + Send + 'static,
    {
        let (tx, rx) = kanal::bounded(1);
        if self.current.replace(rx).is_some() {
            debug!(generation = ticket.generation(), "superseded a load in flight");
        }

        std::thread::spawn(move || {
            let result = job();
            if tx.send(LoadMessage { ticket, result }).is_err() {
                debug!(
                    generation = ticket.generation(),
                    "load finished after it was superseded"
                );
            }
        })
    }

    /// Issues a new load of `path` and blocks until it is applied to `view`
    ///
    /// # Errors
    ///
    /// The worker stopped before the load reported
    pub fn reload(&mut self, view: &mut ViewState, path: &Path) -> Result<(), LoadError> {
        let ticket = view.begin_load();
        self.spawn(path.to_owned(), ticket);
        self.recv_current(view)
    }

    /// Blocks until the latest load reports and applies its result to `view`. The result is
    /// discarded if `view` began another load in the meantime.
    ///
    /// # Errors
    ///
    /// No load is in flight, or its worker stopped before reporting
    pub fn recv_current(&mut self, view: &mut ViewState) -> Result<(), LoadError> {
        let rx = self.current.take().ok_or(LoadError::Disconnected)?;
        let LoadMessage { ticket, result } = rx.recv().map_err(|_| LoadError::Disconnected)?;

        view.finish_load(ticket, result);
        Ok(())
    }

    /// Applies the latest result if it already arrived, without blocking. Returns how many
    /// results were applied.
    pub fn drain(&mut self, view: &mut ViewState) -> usize {
        let Some(rx) = self.current.take() else {
            return 0;
        };

        match rx.try_recv() {
            Ok(Some(LoadMessage { ticket, result })) => usize::from(view.finish_load(ticket, result)),
            Ok(None) => {
                self.current = Some(rx);
                0
            }
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::view_state::{LoadState, LoadStatus};

    #[test]
    fn test_decode_text_strips_bom() {
        assert_eq!(decode_text(b"\xef\xbb\xbfFruit\n"), "Fruit\n");
        assert_eq!(decode_text(b"Fruit\n"), "Fruit\n");
    }

    #[test]
    fn test_decode_text_is_lossy() {
        assert_eq!(decode_text(b"a\xffb"), "a\u{fffd}b");
    }

    #[test]
    fn test_load_text_empty() {
        assert!(matches!(
            load_text("", ParserImplOptions::Scan),
            Err(LoadError::Empty(_))
        ));
        assert!(matches!(
            load_text("", ParserImplOptions::Csv),
            Err(LoadError::Empty(_))
        ));
    }

    #[test]
    fn test_load_text_with_both_parsers() {
        let text = "Fruit,Form\nApples,Fresh\n";
        for parser in [ParserImplOptions::Scan, ParserImplOptions::Csv] {
            let dataset = load_text(text, parser).unwrap();
            assert_eq!(dataset.headers, ["Fruit", "Form"]);
            assert_eq!(dataset.records.len(), 1);
            assert_eq!(dataset.records[0].field("Form"), "Fresh");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("does/not/exist.csv"), ParserImplOptions::Scan).unwrap_err();

        assert!(matches!(err, LoadError::Read { .. }));
        assert!(
            err.to_string()
                .starts_with("Failed to load CSV: does/not/exist.csv: ")
        );
    }

    #[test]
    fn test_reload_missing_file_fails_view() {
        let mut loader = Loader::new(ParserImplOptions::Scan);
        let mut view = ViewState::new();

        loader
            .reload(&mut view, Path::new("does/not/exist.csv"))
            .unwrap();

        assert_eq!(view.status(), LoadStatus::Failed);
        assert!(matches!(view.load_state(), LoadState::Failed(LoadError::Read { .. })));
    }

    #[test]
    fn test_worker_exiting_without_result_disconnects() {
        let mut loader = Loader::new(ParserImplOptions::Scan);
        let mut view = ViewState::new();

        let ticket = view.begin_load();
        let handle = loader.spawn_with(ticket, || panic!("worker died before reporting"));

        assert!(matches!(
            loader.recv_current(&mut view),
            Err(LoadError::Disconnected)
        ));
        assert!(handle.join().is_err());
        assert_eq!(view.status(), LoadStatus::Loading);
    }

    #[test]
    fn test_recv_without_load_disconnects() {
        let mut loader = Loader::new(ParserImplOptions::Scan);
        let mut view = ViewState::new();

        assert!(matches!(
            loader.recv_current(&mut view),
            Err(LoadError::Disconnected)
        ));
        assert_eq!(loader.drain(&mut view), 0);
    }

    #[test]
    fn test_drain_applies_finished_load() {
        let mut loader = Loader::new(ParserImplOptions::Scan);
        let mut view = ViewState::new();

        let ticket = view.begin_load();
        loader
            .spawn_with(ticket, || load_text("Fruit\nPears\n", ParserImplOptions::Scan))
            .join()
            .unwrap();

        assert_eq!(loader.drain(&mut view), 1);
        assert_eq!(view.status(), LoadStatus::Loaded);
        assert_eq!(loader.drain(&mut view), 0);
    }
}
