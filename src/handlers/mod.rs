// src/handlers/mod.rs
pub mod error;
pub mod export;
pub mod health;
pub mod quote;
pub mod recent;
