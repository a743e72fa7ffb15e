//! # Resolve the fields a resource exposes
//!
//! The fields of a resource come from three places:
//!
//! - its model's own scalar fields, always including the identity
//!   field `id`;
//! - its model's to-one relations, for those whose target is itself
//!   exposed. These are keyed by the target's resource name, and
//!   accessed through the local attribute holding the relation;
//! - the to-one relations of every other exposed model which point
//!   at it. Seen from this side they are to-many relations, keyed by
//!   the plural resource name of the model holding them, and accessed
//!   through that relation's reverse accessor, which defaults to
//!   `<resource name>_set`.
//!
//! The last category is never declared: it is found by scanning the
//! whole [`Registry`]. All three are collected into a single
//! [`FieldSet`], from which views by [`FieldKind`] are filtered.
//!
//! Example:
//!
//! ```rust
//! use jsonapi_query::fields::{FieldKind, FieldResolver};
//! use jsonapi_query::model::{ModelDescriptor, ModelId};
//! use jsonapi_query::registry::Registry;
//! use jsonapi_query::resource::ResourceMeta;
//!
//! let author = ModelDescriptor::new(ModelId::new("Author")).field("name");
//! let book = ModelDescriptor::new(ModelId::new("Book"))
//!     .field("title")
//!     .to_one("author_id", ModelId::new("Author"));
//!
//! let mut builder = Registry::builder();
//! builder
//!     .register(ResourceMeta::new().model_descriptor(author))
//!     .unwrap()
//!     .register(ResourceMeta::new().model_descriptor(book))
//!     .unwrap();
//! let registry = builder.build();
//!
//! let resolver = FieldResolver::new(&registry);
//! let fields = resolver.resolve(ModelId::new("Author")).unwrap();
//! assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["id", "name", "books"]);
//!
//! let books = fields.get("books").unwrap();
//! assert_eq!(books.kind(), FieldKind::ToMany);
//! assert_eq!(books.accessor(), "book_set");
//! ```
//!
//! Resolution depends only on the registry, which does not change
//! once built, so a [`FieldSetCache`] can resolve every model up front.

use indexmap::IndexMap;
use log::{trace, warn};
use serde_json::Value;
use thiserror::Error;

use crate::model::{ModelDescriptor, ModelId, IDENTITY_FIELD};
use crate::registry::Registry;
use crate::resource::{ResourceConfig, ResourceDescriptor};

/// Errors produced by field resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The model is not exposed by any registered resource.
    #[error("model {0} is not registered")]
    UnknownModel(ModelId),
}

/// The category a resolved field falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Own,
    ToOne,
    ToMany,
}

/// A resolved field: its kind, and the name under which a record
/// holds its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    kind: FieldKind,
    accessor: String,
}

impl Field {
    pub fn new(kind: FieldKind, accessor: impl Into<String>) -> Self {
        Self {
            kind,
            accessor: accessor.into(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn accessor(&self) -> &str {
        &self.accessor
    }
}

/// The fields of one resource, keyed by the name they are exposed as.
///
/// Own fields come first, then to-one fields in the order the model
/// declares them, then to-many fields in registration order of the
/// models holding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: IndexMap<String, Field>,
}

impl FieldSet {
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The fields of kind `kind`, in order.
    pub fn of_kind(&self, kind: FieldKind) -> impl Iterator<Item = (&str, &Field)> {
        self.iter().filter(move |(_, f)| f.kind == kind)
    }

    pub fn own(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.of_kind(FieldKind::Own)
    }

    pub fn to_one(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.of_kind(FieldKind::ToOne)
    }

    pub fn to_many(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.of_kind(FieldKind::ToMany)
    }

    /// Restrict the own fields to those named in `names`, as for a
    /// sparse fieldset request. The identity field is always kept, and
    /// relation fields are untouched. Unknown names are ignored.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> FieldSet {
        let fields = self
            .fields
            .iter()
            .filter(|(key, field)| {
                field.kind != FieldKind::Own
                    || key.as_str() == IDENTITY_FIELD
                    || names.iter().any(|n| n.as_ref() == key.as_str())
            })
            .map(|(key, field)| (key.clone(), field.clone()))
            .collect();
        FieldSet { fields }
    }

    /// Describe the fields as a JSON object, mapping each key to its
    /// `kind` and `accessor`.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::map::Map::new();
        for (key, field) in self.iter() {
            let mut entry = serde_json::map::Map::new();
            entry.insert(
                "kind".to_string(),
                Value::String(field.kind.as_ref().to_string()),
            );
            entry.insert(
                "accessor".to_string(),
                Value::String(field.accessor.clone()),
            );
            map.insert(key.to_string(), Value::Object(entry));
        }
        Value::Object(map)
    }

    fn insert(&mut self, key: &str, field: Field) {
        if let Some(existing) = self.fields.get(key) {
            warn!(
                "Field '{}' already resolved as {} via '{}', ignoring {} via '{}'",
                key, existing.kind, existing.accessor, field.kind, field.accessor
            );
            return;
        }
        self.fields.insert(key.to_string(), field);
    }
}

/// Resolve field sets against a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'r> {
    registry: &'r Registry,
}

impl<'r> FieldResolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Resolve the fields of the registered model `id`.
    pub fn resolve(&self, id: ModelId) -> Result<FieldSet, ResolveError> {
        let resource = self.registry.get(id).ok_or(ResolveError::UnknownModel(id))?;
        let model = resource.model().ok_or(ResolveError::UnknownModel(id))?;
        Ok(self.resolve_with_config(model, resource.config()))
    }

    /// Resolve the fields of `model`, which need not be registered
    /// itself. If it is, its resource's configuration applies.
    pub fn resolve_descriptor(&self, model: &ModelDescriptor) -> FieldSet {
        let default_config = ResourceConfig::default();
        let config = self
            .registry
            .get(model.id())
            .map(ResourceDescriptor::config)
            .unwrap_or(&default_config);
        self.resolve_with_config(model, config)
    }

    fn resolve_with_config(&self, model: &ModelDescriptor, config: &ResourceConfig) -> FieldSet {
        trace!("Resolving fields of model {}", model.id());
        let mut res = FieldSet::default();
        self.add_own(&mut res, model, config);
        self.add_to_one(&mut res, model);
        self.add_to_many(&mut res, model.id());
        res
    }

    fn add_own(&self, res: &mut FieldSet, model: &ModelDescriptor, config: &ResourceConfig) {
        res.insert(IDENTITY_FIELD, Field::new(FieldKind::Own, IDENTITY_FIELD));
        let names = model
            .fields()
            .chain(config.fieldnames_include().iter().map(String::as_str));
        for name in names {
            if name == IDENTITY_FIELD || config.is_excluded(name) || res.contains(name) {
                continue;
            }
            res.insert(name, Field::new(FieldKind::Own, name));
        }
    }

    fn add_to_one(&self, res: &mut FieldSet, model: &ModelDescriptor) {
        for edge in model.relations() {
            match self.registry.get(edge.target()) {
                Some(target) => {
                    res.insert(
                        target.name(),
                        Field::new(FieldKind::ToOne, edge.attribute()),
                    );
                }
                None => {
                    trace!(
                        "Skipping relation '{}' of {} to unexposed model {}",
                        edge.attribute(),
                        model.id(),
                        edge.target()
                    );
                }
            }
        }
    }

    fn add_to_many(&self, res: &mut FieldSet, id: ModelId) {
        // A model's relations to itself are only reachable as to-one.
        for (owner, owner_model) in self.registry.models().filter(|(_, m)| m.id() != id) {
            for edge in owner_model.relations_to(id) {
                let accessor = match edge.related_name() {
                    Some(name) => name.to_string(),
                    None => format!("{}_set", owner.name()),
                };
                res.insert(owner.name_plural(), Field::new(FieldKind::ToMany, accessor));
            }
        }
    }
}

/// Field sets for every model in a [`Registry`], resolved once.
#[derive(Debug, Clone, Default)]
pub struct FieldSetCache {
    fields: IndexMap<ModelId, FieldSet>,
}

impl FieldSetCache {
    /// Resolve every model exposed by `registry`.
    pub fn new(registry: &Registry) -> Self {
        let resolver = FieldResolver::new(registry);
        let fields = registry
            .models()
            .map(|(resource, model)| {
                (
                    model.id(),
                    resolver.resolve_with_config(model, resource.config()),
                )
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, id: ModelId) -> Result<&FieldSet, ResolveError> {
        self.fields.get(&id).ok_or(ResolveError::UnknownModel(id))
    }
}
