//! Dua generation and Q&A over a text-completion service, plus a small curated catalog.
//!
//! The pipeline is prompt -> completion -> parse; see [`pipeline::Pipeline`].

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod transcript;
pub mod ux;
pub mod wire;
