//! Subcommand arguments and handlers

pub mod auth;
pub mod export;
pub mod records;
pub mod upload;
