// src/services/mod.rs
pub mod dashboard;
pub mod export;
pub mod formatter;
pub mod ledger;
pub mod provider;
pub mod quote;
pub mod yahoo;
