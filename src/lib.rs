//! Terminal client for the AI Wiki Quiz service.
//!
//! The [`normalize`] module is usable on its own: it turns whatever JSON the
//! service returns into the canonical [`models`] records.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod services;
pub mod tui;
