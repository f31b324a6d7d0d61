//! Command handlers for the non-interactive CLI

pub mod bookmark;
pub mod config;
