//! # Describe models and the relations between them
//!
//! A model is an addressable entity type: it has a set of scalar
//! fields it owns, and a set of to-one relations pointing at other
//! models. To-many relations are never declared here; they are the
//! inverse of some other model's to-one relation, and are derived
//! when a [`Registry`](crate::registry::Registry) is consulted.
//!
//! ## Overview
//!
//! The main trait in this module is [`Model`], which has an
//! associated derive macro [`macro@Model`]. A [`Model`] can describe
//! its own fields and relations to a [`ModelVisitor`], and from that
//! description a [`ModelDescriptor`] can be built. Relations name
//! their target through the target's own [`Model`] implementation, so
//! a relation to a type that is not a model does not compile.
//!
//! Example:
//!
//! ```rust
//! use jsonapi_query::model::{Model, ModelDescriptor};
//!
//! #[derive(Model)]
//! struct Author {
//!     id: i64,
//!     name: String,
//! }
//!
//! #[derive(Model)]
//! struct Book {
//!     id: i64,
//!     title: String,
//!     #[jsonapi(to_one = Author)]
//!     author_id: i64,
//! }
//!
//! let book = ModelDescriptor::of::<Book>();
//! assert_eq!(book.id(), Book::model_id());
//! assert_eq!(book.id().name(), "Book");
//! assert_eq!(book.fields().collect::<Vec<_>>(), vec!["id", "title"]);
//!
//! let edge = book.relations().next().unwrap();
//! assert_eq!(edge.attribute(), "author_id");
//! assert_eq!(edge.target(), Author::model_id());
//! ```
//!
//! Descriptors can also be assembled by hand, for models which live
//! outside Rust's type system altogether:
//!
//! ```rust
//! use jsonapi_query::model::{ModelDescriptor, ModelId};
//!
//! let book = ModelDescriptor::new(ModelId::new("Book"))
//!     .field("title")
//!     .to_one("author_id", ModelId::new("Author"));
//! assert_eq!(book.relations().count(), 1);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use indexmap::IndexSet;

/// The field which identifies a record of any model.
///
/// It is always part of a model's own fields, whatever the
/// configuration of the resource exposing it says.
pub const IDENTITY_FIELD: &str = "id";

/// The identity of a model.
///
/// An identity carries a fully qualified path, which is what
/// identities are compared by, and a short name used for display and
/// for naming resources. Derived models use their module path, so two
/// structs called `Author` in different modules are distinct models.
#[derive(Debug, Clone, Copy)]
pub struct ModelId {
    path: &'static str,
    name: &'static str,
}

impl ModelId {
    /// Create a new identity called `name`, which is also its path.
    pub const fn new(name: &'static str) -> Self {
        Self { path: name, name }
    }

    /// Create an identity compared by `path`, but called `name`.
    pub const fn qualified(path: &'static str, name: &'static str) -> Self {
        Self { path, name }
    }

    /// The identity of the [`Model`] type `T`.
    pub fn of<T: Model>() -> Self {
        T::model_id()
    }

    /// The short name of the model.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The path which distinguishes this model from every other.
    pub fn path(&self) -> &'static str {
        self.path
    }
}

impl PartialEq for ModelId {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ModelId {}

impl Hash for ModelId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state)
    }
}

impl PartialOrd for ModelId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModelId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(other.path)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

/// A single-valued reference from one model to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    attribute: String,
    target: ModelId,
    related_name: Option<String>,
}

impl RelationEdge {
    /// A relation stored in the local attribute `attribute`, pointing
    /// at the model `target`.
    pub fn new(attribute: impl Into<String>, target: ModelId) -> Self {
        Self {
            attribute: attribute.into(),
            target,
            related_name: None,
        }
    }

    /// Declare the name by which the target reaches back to us.
    pub fn with_related_name(mut self, related_name: impl Into<String>) -> Self {
        self.related_name = Some(related_name.into());
        self
    }

    /// The local attribute holding the relation.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The model the relation points at.
    pub fn target(&self) -> ModelId {
        self.target
    }

    /// The declared reverse accessor, if there is one.
    pub fn related_name(&self) -> Option<&str> {
        self.related_name.as_deref()
    }
}

/// Receive a description of a model.
///
/// Each [`Model`] will accept a [`ModelVisitor`] and describe to it
/// its own fields and its to-one relations, in declaration order.
pub trait ModelVisitor {
    /// Receive an own scalar field called `name`.
    fn visit_field(&mut self, name: &str);

    /// Receive a to-one relation held in `attribute`, which points at
    /// the model `target`. If the relation declares the name by which
    /// `target` reaches back to this model, it is given as
    /// `related_name`.
    fn visit_to_one(&mut self, attribute: &str, target: ModelId, related_name: Option<&str>);
}

/// Something that can describe itself as a model.
///
/// This is the central trait of this module. It has a derive macro
/// which reads the markup on a struct and describes each of its named
/// fields.
pub trait Model {
    /// The identity of this model.
    fn model_id() -> ModelId;

    /// Abstract models can be inherited from, but never exposed.
    fn is_abstract() -> bool {
        false
    }

    /// `visitor` will receive a callback for each field and relation
    /// defined for this model.
    fn accept_visitor<V: ModelVisitor>(visitor: &mut V)
    where
        Self: Sized;
}

/// Everything that is known about one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    id: ModelId,
    fields: IndexSet<String>,
    relations: Vec<RelationEdge>,
    is_abstract: bool,
}

impl ModelDescriptor {
    /// Create an empty descriptor for the model `id`.
    pub fn new(id: ModelId) -> Self {
        Self {
            id,
            fields: IndexSet::new(),
            relations: Vec::new(),
            is_abstract: false,
        }
    }

    /// Build the descriptor of the [`Model`] type `T`.
    pub fn of<T: Model>() -> Self {
        let mut res = Self::new(T::model_id()).abstract_model(T::is_abstract());
        T::accept_visitor(&mut res);
        res
    }

    /// Add an own scalar field. Adding a field twice has no effect.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into());
        self
    }

    /// Add a to-one relation held in `attribute`, pointing at `target`.
    pub fn to_one(self, attribute: impl Into<String>, target: ModelId) -> Self {
        self.relation(RelationEdge::new(attribute, target))
    }

    /// Add a fully specified relation.
    pub fn relation(mut self, edge: RelationEdge) -> Self {
        self.relations.push(edge);
        self
    }

    /// Mark the model as abstract, or not.
    pub fn abstract_model(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// The own scalar fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// The outgoing to-one relations, in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &RelationEdge> {
        self.relations.iter()
    }

    /// The outgoing relations which point at `target`.
    pub fn relations_to(&self, target: ModelId) -> impl Iterator<Item = &RelationEdge> {
        self.relations.iter().filter(move |edge| edge.target == target)
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

impl ModelVisitor for ModelDescriptor {
    fn visit_field(&mut self, name: &str) {
        self.fields.insert(name.to_string());
    }

    fn visit_to_one(&mut self, attribute: &str, target: ModelId, related_name: Option<&str>) {
        let mut edge = RelationEdge::new(attribute, target);
        edge.related_name = related_name.map(str::to_string);
        self.relations.push(edge);
    }
}

pub use jsonapi_query_derive::Model;
