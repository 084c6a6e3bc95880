// src/fetch/mod.rs
pub mod filings;
pub mod urls;
