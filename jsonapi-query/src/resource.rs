//! # Declare the resources an API exposes
//!
//! A resource is an API-exposed entity type with a name, a plural
//! name and a field set. Most resources expose a model, in which case
//! their name defaults to the lower-cased name of the model; resources
//! without a model must be named explicitly.
//!
//! Resources are configured with [`ResourceMeta`] layers. A layer
//! only holds the options it sets, and a list of layers is merged in
//! order, base first, with later layers overriding earlier ones. This
//! lets a family of resources share a base configuration:
//!
//! ```rust
//! use jsonapi_query::model::{ModelDescriptor, ModelId};
//! use jsonapi_query::resource::{Method, ResourceDescriptor, ResourceMeta};
//!
//! let base = ResourceMeta::new()
//!     .page_size(20)
//!     .allowed_methods([Method::Get, Method::Post]);
//! let author = ResourceMeta::new()
//!     .model_descriptor(ModelDescriptor::new(ModelId::new("Author")))
//!     .page_size(50);
//!
//! let meta = ResourceMeta::merge([base, author]);
//! let resource = ResourceDescriptor::from_meta(meta).unwrap();
//! assert_eq!(resource.name(), "author");
//! assert_eq!(resource.name_plural(), "authors");
//! assert_eq!(resource.config().page_size(), Some(50));
//! assert!(resource.config().allows(Method::Post));
//! ```
//!
//! Plural names are formed by appending `s` to the name. That gets
//! irregular words wrong, but clients rely on the exact keys, so it
//! is kept; set [`name_plural`](ResourceMeta::name_plural) where it
//! matters.

use std::str::FromStr;

use thiserror::Error;

use crate::model::{Model, ModelDescriptor, ModelId};

/// Errors produced when declaring resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource has neither a name nor a model to take one from.
    #[error("either name or model should be provided for a resource")]
    MissingName,
    /// Abstract models cannot be exposed.
    #[error("abstract model {0} could not be resource")]
    AbstractModel(ModelId),
    /// An allowed method could not be parsed.
    #[error("unknown method in allowed methods: {0}")]
    UnknownMethod(#[from] strum::ParseError),
}

/// The operations a resource can permit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// One layer of resource configuration.
///
/// Every option is unset until a setter is called, and only set
/// options take part in a [`merge`](Self::merge).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMeta {
    name: Option<String>,
    name_plural: Option<String>,
    model: Option<ModelDescriptor>,
    fieldnames_include: Option<Vec<String>>,
    fieldnames_exclude: Option<Vec<String>>,
    page_size: Option<usize>,
    allowed_methods: Option<Vec<Method>>,
}

impl ResourceMeta {
    pub fn new() -> Self {
        Default::default()
    }

    /// A layer exposing the [`Model`] type `T`.
    pub fn for_model<T: Model>() -> Self {
        Self::new().model::<T>()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the `name + "s"` plural.
    pub fn name_plural(mut self, name_plural: impl Into<String>) -> Self {
        self.name_plural = Some(name_plural.into());
        self
    }

    pub fn model<T: Model>(self) -> Self {
        self.model_descriptor(ModelDescriptor::of::<T>())
    }

    pub fn model_descriptor(mut self, model: ModelDescriptor) -> Self {
        self.model = Some(model);
        self
    }

    /// Extra own fields to expose, beyond those the model declares.
    pub fn fieldnames_include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fieldnames_include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Own fields to hide. The identity field cannot be hidden.
    pub fn fieldnames_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fieldnames_exclude = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn allowed_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.allowed_methods = Some(methods.into_iter().collect());
        self
    }

    /// Set the allowed methods from a comma-separated list such as
    /// `"get,post"`.
    pub fn parse_allowed_methods(self, methods: &str) -> Result<Self, ResourceError> {
        let methods = methods
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(Method::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.allowed_methods(methods))
    }

    /// Lay `other` over this layer: every option `other` sets wins.
    pub fn overlay(self, other: ResourceMeta) -> Self {
        Self {
            name: other.name.or(self.name),
            name_plural: other.name_plural.or(self.name_plural),
            model: other.model.or(self.model),
            fieldnames_include: other.fieldnames_include.or(self.fieldnames_include),
            fieldnames_exclude: other.fieldnames_exclude.or(self.fieldnames_exclude),
            page_size: other.page_size.or(self.page_size),
            allowed_methods: other.allowed_methods.or(self.allowed_methods),
        }
    }

    /// Merge `layers` in order, base first.
    pub fn merge(layers: impl IntoIterator<Item = ResourceMeta>) -> Self {
        layers
            .into_iter()
            .fold(ResourceMeta::new(), ResourceMeta::overlay)
    }
}

/// The settled configuration of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    fieldnames_include: Vec<String>,
    fieldnames_exclude: Vec<String>,
    page_size: Option<usize>,
    allowed_methods: Vec<Method>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            fieldnames_include: Vec::new(),
            fieldnames_exclude: Vec::new(),
            page_size: None,
            allowed_methods: vec![Method::Get],
        }
    }
}

impl ResourceConfig {
    pub fn fieldnames_include(&self) -> &[String] {
        &self.fieldnames_include
    }

    pub fn fieldnames_exclude(&self) -> &[String] {
        &self.fieldnames_exclude
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.fieldnames_exclude.iter().any(|n| n == name)
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    pub fn allows(&self, method: Method) -> bool {
        self.allowed_methods.contains(&method)
    }
}

/// A resource ready to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    name: String,
    name_plural: String,
    model: Option<ModelDescriptor>,
    config: ResourceConfig,
}

impl ResourceDescriptor {
    /// Settle a merged [`ResourceMeta`] into a resource.
    pub fn from_meta(meta: ResourceMeta) -> Result<Self, ResourceError> {
        let ResourceMeta {
            name,
            name_plural,
            model,
            fieldnames_include,
            fieldnames_exclude,
            page_size,
            allowed_methods,
        } = meta;

        if let Some(model) = &model {
            if model.is_abstract() {
                return Err(ResourceError::AbstractModel(model.id()));
            }
        }

        let name = match (name, &model) {
            (Some(name), _) => name,
            (None, Some(model)) => model.id().name().to_lowercase(),
            (None, None) => return Err(ResourceError::MissingName),
        };
        let name_plural = name_plural.unwrap_or_else(|| format!("{}s", name));

        let defaults = ResourceConfig::default();
        let config = ResourceConfig {
            fieldnames_include: fieldnames_include.unwrap_or(defaults.fieldnames_include),
            fieldnames_exclude: fieldnames_exclude.unwrap_or(defaults.fieldnames_exclude),
            page_size: page_size.or(defaults.page_size),
            allowed_methods: allowed_methods.unwrap_or(defaults.allowed_methods),
        };

        Ok(Self {
            name,
            name_plural,
            model,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_plural(&self) -> &str {
        &self.name_plural
    }

    pub fn model(&self) -> Option<&ModelDescriptor> {
        self.model.as_ref()
    }

    pub fn is_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }
}
