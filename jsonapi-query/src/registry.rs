//! # Register the resources an API exposes
//!
//! A [`Registry`] maps each exposed model to the resource exposing
//! it. It is assembled once, at startup, by a [`RegistryBuilder`],
//! and never changes afterwards, so it can be shared freely between
//! threads. Models that have no entry are not exposed, and relations
//! pointing at them are invisible.
//!
//! ```rust
//! use jsonapi_query::model::{ModelDescriptor, ModelId};
//! use jsonapi_query::registry::Registry;
//! use jsonapi_query::resource::ResourceMeta;
//!
//! let author = ModelDescriptor::new(ModelId::new("Author")).field("name");
//!
//! let mut builder = Registry::builder();
//! builder
//!     .register(ResourceMeta::new().model_descriptor(author))
//!     .unwrap()
//!     .register(ResourceMeta::new().name("status"))
//!     .unwrap();
//! let registry = builder.build();
//!
//! assert_eq!(registry.get(ModelId::new("Author")).unwrap().name(), "author");
//! assert!(registry.get_by_name("status").is_some());
//! assert!(registry.get(ModelId::new("Book")).is_none());
//! ```
//!
//! Should the set of resources need to change while requests are
//! being served, build a new [`Registry`] and publish it through a
//! [`SharedRegistry`]; readers holding the previous snapshot keep a
//! consistent view of it.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::model::{ModelDescriptor, ModelId};
use crate::resource::{ResourceDescriptor, ResourceError, ResourceMeta};

/// Errors produced while registering resources.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// Two resources expose the same model.
    #[error("model {0} is already exposed by resource '{1}'")]
    DuplicateModel(ModelId, String),
    /// Two resources share a name.
    #[error("resource '{0}' is already registered")]
    DuplicateResource(String),
}

/// An immutable mapping from models to the resources exposing them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: Vec<ResourceDescriptor>,
    by_model: IndexMap<ModelId, usize>,
    by_name: IndexMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The resource exposing the model `id`.
    pub fn get(&self, id: ModelId) -> Option<&ResourceDescriptor> {
        self.by_model.get(&id).map(|ix| &self.resources[*ix])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.by_name.get(name).map(|ix| &self.resources[*ix])
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.by_model.contains_key(&id)
    }

    /// Every resource, in registration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.iter()
    }

    /// Every exposed model with its resource, in registration order.
    pub fn models(&self) -> impl Iterator<Item = (&ResourceDescriptor, &ModelDescriptor)> {
        self.resources
            .iter()
            .filter_map(|r| r.model().map(|m| (r, m)))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Assemble a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register the resource described by `meta`.
    pub fn register(&mut self, meta: ResourceMeta) -> Result<&mut Self, RegistryError> {
        self.register_resource(ResourceDescriptor::from_meta(meta)?)
    }

    /// Register the resource described by merging `layers`, base first.
    pub fn register_layers(
        &mut self,
        layers: impl IntoIterator<Item = ResourceMeta>,
    ) -> Result<&mut Self, RegistryError> {
        self.register(ResourceMeta::merge(layers))
    }

    pub fn register_resource(
        &mut self,
        resource: ResourceDescriptor,
    ) -> Result<&mut Self, RegistryError> {
        let registry = &mut self.registry;
        if registry.by_name.contains_key(resource.name()) {
            return Err(RegistryError::DuplicateResource(resource.name().to_string()));
        }
        let ix = registry.resources.len();
        if let Some(model) = resource.model() {
            if let Some(existing) = registry.get(model.id()) {
                return Err(RegistryError::DuplicateModel(
                    model.id(),
                    existing.name().to_string(),
                ));
            }
            registry.by_model.insert(model.id(), ix);
        }
        debug!("Registered resource '{}'", resource.name());
        registry.by_name.insert(resource.name().to_string(), ix);
        registry.resources.push(resource);
        Ok(self)
    }

    pub fn build(self) -> Registry {
        debug!("Registry built with {} resources", self.registry.len());
        self.registry
    }
}

/// A [`Registry`] which can be replaced wholesale while in use.
///
/// Readers [`load`](Self::load) the current snapshot, which never
/// changes under them; a new snapshot is published with
/// [`publish`](Self::publish).
pub struct SharedRegistry {
    current: ArcSwap<Registry>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
        }
    }

    pub fn load(&self) -> Arc<Registry> {
        self.current.load_full()
    }

    pub fn publish(&self, registry: Registry) {
        debug!("Publishing registry with {} resources", registry.len());
        self.current.store(Arc::new(registry));
    }
}
