pub mod goal;
pub mod ledger;
pub mod month;
pub mod record;
pub mod settings;
pub mod snapshot;
pub mod summary;
