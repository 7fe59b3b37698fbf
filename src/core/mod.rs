//! core
//!
//! Core domain types, configuration, and operations.
//!
//! # Modules
//!
//! - [`types`] - Strong types: AliasPath, SourcePath, LangCode, DomainId, Scope
//! - [`naming`] - Cleaning and word-safe truncation of aliases
//! - [`ops`] - File and per-scope locking
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for site-local storage
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Truncation counts characters, never bytes

pub mod config;
pub mod naming;
pub mod ops;
pub mod paths;
pub mod types;
