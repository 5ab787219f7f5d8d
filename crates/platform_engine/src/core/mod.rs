//! Core engine infrastructure

pub mod config;
