//! alias
//!
//! Domain-scoped alias uniqueness and resolution.
//!
//! # Modules
//!
//! - [`context`] - Tenant and language context for a request
//! - [`reservation`] - Static routes and reservation extensions
//! - [`uniquifier`] - Reservation checks and unique variants
//! - [`resolver`] - Alias to source path resolution
//! - [`generator`] - Clean, alter, uniquify and save
//! - [`validate`] - Conflict checks for manually entered aliases

pub mod context;
pub mod generator;
pub mod reservation;
pub mod resolver;
pub mod uniquifier;
pub mod validate;

pub use context::{ContentDomains, FixedLanguage, LanguageContext, TenantContext};
pub use generator::{
    AliasAlter, AliasContext, AliasGenerator, GenerateError, GenerateRequest, Generated, Operation,
};
pub use reservation::{
    FilesystemRoutes, PrefixReservation, ReservationExtension, RouteChecker, RouteSet,
    StaticRoutes,
};
pub use resolver::{AliasResolver, PathLookup, ResolveError, StoreLookup};
pub use uniquifier::{AliasUniquifier, Uniquified, UniquifyError, UniquifySettings};
pub use validate::{AliasValidator, Violation};
