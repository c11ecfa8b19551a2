//! Core configuration, languages and message records

pub mod config;
pub mod language;
pub mod models;
