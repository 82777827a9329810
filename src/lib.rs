//! Logosmith - LLM-assisted logo builder backend
//!
//! Generates logo symbols through a language model, sanitizes them, keeps a
//! version history and composes the selected symbol with logo and slogan
//! text into a single exportable SVG (or PNG).
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
