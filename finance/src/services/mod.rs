pub mod account_service;
pub mod ledger_service;
pub mod quote_service;
