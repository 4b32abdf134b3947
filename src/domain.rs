pub mod display;
pub mod query;
pub mod record;
pub mod view_state;
