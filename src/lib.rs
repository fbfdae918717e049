//! Backend API for Oriento, a Gemini-backed financial advisor for SMBs.
//!
//! The crate relays user questions to Google Gemini, persisting one
//! conversation record per chat so callers can resume a multi-turn exchange,
//! and enforcing that every conversation is only usable by its owner.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]

/// Conversation resolution, storage and the session binder.
pub mod advisor;
/// Model provider abstraction and the Gemini client.
pub mod llm;
/// HTTP server and API routes.
pub mod server;
/// Entry helpers to start the API server.
pub mod start_oriento_api;
