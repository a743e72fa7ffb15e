//! # Query parsing and field resolution for JSON:API-style resources
//!
//! This crate holds the parts of a JSON:API-style resource layer that
//! do not depend on how data is stored or served:
//!
//! - [`request`] parses the query parameters of a request, in
//!   particular the two forms of sort expression, `sort=a,-b` and
//!   `sort[resource]=a,-b`, into an unambiguous structure.
//! - [`fields`] resolves the field set of a resource from the graph of
//!   models and relations, and the [`registry`] of which models are
//!   exposed as which resources.
//!
//! The two are independent: parsing needs no knowledge of resources,
//! and resolution needs no request. Models describe themselves through
//! the [`Model`](model::Model) trait, which can be derived.
//!
//! ```rust
//! use jsonapi_query::fields::FieldResolver;
//! use jsonapi_query::model::Model;
//! use jsonapi_query::registry::Registry;
//! use jsonapi_query::request::{QueryParser, SortField};
//! use jsonapi_query::resource::ResourceMeta;
//!
//! #[derive(Model)]
//! struct Author {
//!     name: String,
//! }
//!
//! #[derive(Model)]
//! struct Book {
//!     title: String,
//!     #[jsonapi(to_one = Author, related_name = "books")]
//!     author_id: i64,
//! }
//!
//! # fn main() -> Result<(), jsonapi_query::Error> {
//! let mut builder = Registry::builder();
//! builder
//!     .register(ResourceMeta::for_model::<Author>())?
//!     .register(ResourceMeta::for_model::<Book>())?;
//! let registry = builder.build();
//!
//! let fields = FieldResolver::new(&registry).resolve(Author::model_id())?;
//! assert_eq!(fields.get("books").unwrap().accessor(), "books");
//!
//! let query = QueryParser::parse_str("sort=-name&name__startswith=A")?;
//! let sort = query.sort().fields_for("author");
//! assert_eq!(sort, vec![SortField { name: "name", reverse: true }]);
//! assert_eq!(query.filters().count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod fields;
pub mod model;
pub mod registry;
pub mod request;
pub mod resource;

use thiserror::Error;

pub use crate::fields::{Field, FieldKind, FieldResolver, FieldSet, FieldSetCache};
pub use crate::model::{Model, ModelDescriptor, ModelId};
pub use crate::registry::{Registry, RegistryBuilder, SharedRegistry};
pub use crate::request::{ParsedQuery, QueryParser, RawQuery, SortDirective};
pub use crate::resource::{Method, ResourceDescriptor, ResourceMeta};

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid query: {0}")]
    Query(#[from] request::QueryError),
    #[error("invalid resource: {0}")]
    Resource(#[from] resource::ResourceError),
    #[error("invalid registration: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("cannot resolve fields: {0}")]
    Resolve(#[from] fields::ResolveError),
}
