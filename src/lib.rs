//! domain-alias - Domain-scoped URL alias uniqueness and resolution
//!
//! On a multi-site content platform several domains share one alias table.
//! This crate keeps aliases unique per (domain, language) scope instead of
//! globally, so `/contact` can exist once on every domain, and resolves
//! incoming aliases against the domain a request belongs to.
//!
//! # Architecture
//!
//! - [`alias`] - Uniquifier, resolver, generator and validator
//! - [`store`] - The [`store::AliasStore`] trait with memory and JSON file backends
//! - [`core`] - Strong types, naming rules, configuration and locking
//! - [`cli`] - The `dalias` command-line interface
//! - [`logging`] - Subscriber setup for the binary
//!
//! # Correctness Invariants
//!
//! 1. Within a scope no two sources share an alias
//! 2. A store failure is never read as "alias is free"
//! 3. An empty alias is never stored
//! 4. Generated aliases never exceed the configured maximum length

pub mod alias;
pub mod cli;
pub mod core;
pub mod logging;
pub mod store;
