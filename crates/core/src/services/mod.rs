pub mod aggregation_service;
pub mod ledger_service;
