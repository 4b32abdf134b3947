use serde::Serialize;
use strum::{EnumDiscriminants, IntoDiscriminant};
use tracing::{debug, info, warn};

use crate::{
    domain::{
        query::{Query, filter_records},
        record::{Dataset, Record},
    },
    error::LoadError,
};

/// Where the current data set is in its lifecycle. A reload replaces it wholesale.
#[derive(Debug, Default, EnumDiscriminants)]
#[strum_discriminants(
    name(LoadStatus),
    derive(Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(Dataset),
    Failed(LoadError),
}

serde_plain::derive_display_from_serialize!(LoadStatus);

/// Identifies one issued load. Only the ticket of the latest load may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Load state plus the query. The query only shapes the derived view and survives reloads.
#[derive(Debug, Default)]
pub struct ViewState {
    load: LoadState,
    query: Query,
    generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, superseding any load still in flight
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load = LoadState::Loading;
        debug!(generation = self.generation, "load started");

        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies the outcome of the load identified by `ticket`. Returns false, leaving the state
    /// untouched, if a newer load was issued in the meantime.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Dataset, LoadError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarded superseded load"
            );
            return false;
        }

        self.load = match result {
            Ok(dataset) => {
                info!(
                    columns = dataset.headers.len(),
                    records = dataset.records.len(),
                    "csv loaded"
                );
                LoadState::Loaded(dataset)
            }
            Err(err) => {
                warn!(error = %err, "csv load failed");
                LoadState::Failed(err)
            }
        };

        true
    }

    pub fn set_query(&mut self, raw: &str) {
        self.query = Query::new(raw);
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn status(&self) -> LoadStatus {
        self.load.discriminant()
    }

    /// The header columns, empty unless the last load succeeded
    pub fn headers(&self) -> &[String] {
        match &self.load {
            LoadState::Loaded(dataset) => &dataset.headers,
            _ => &[],
        }
    }

    /// All loaded records, empty unless the last load succeeded
    pub fn records(&self) -> &[Record] {
        match &self.load {
            LoadState::Loaded(dataset) => &dataset.records,
            _ => &[],
        }
    }

    /// The loaded records matching the current query
    pub fn visible(&self) -> Vec<&Record> {
        filter_records(self.records(), &self.query)
    }
}
