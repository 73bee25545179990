//! billbrief: AI headline and summary generation for legislative bills
//!
//! Selects bills that still lack a summary, asks a text generation service for a
//! news-style headline, a plain-language summary, policy categories and
//! orientation vote weights, and writes the result back to the shared store.
//! Runs are batched, paced, and rotate through a pool of API credentials when
//! one runs out of quota.

pub mod batch;
pub mod bill;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod journal;
pub mod logging;
pub mod ordering;
pub mod provider;
pub mod response;
pub mod store;
