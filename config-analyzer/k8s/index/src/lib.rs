//! Configuration snapshot
//!
//! A [`Snapshot`] holds an immutable view of the cluster resources an analysis pass reads. Each
//! supported resource type is a [`Kind`] stored in its own [`Collection`]:
//!
//! - `Gateway` resources (`istio/networking/v1alpha3/gateways`) declare listeners and select the
//!   workloads that serve them.
//! - `Pod` resources (`k8s/core/v1/pods`) carry the labels gateways select on.
//! - `Secret` resources (`k8s/core/v1/secrets`) hold the TLS credentials listeners reference.
//!
//! Entries are keyed by namespace and name, so iteration order is deterministic and independent of
//! the order in which resources were loaded.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod collection;
pub mod load;

pub use self::{collection::Collection, load::Loader};
use mesh_config_analyzer_k8s_api::{self as k8s, Resource, ResourceExt, ResourceId};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::trace;

/// A resource type that may be stored in a [`Snapshot`].
pub trait Kind:
    Resource<DynamicType = ()> + DeserializeOwned + std::fmt::Debug + Send + Sync + 'static
{
    const COLLECTION: Collection;

    fn index(snapshot: &Snapshot) -> &Index<Self>;

    fn index_mut(snapshot: &mut Snapshot) -> &mut Index<Self>;
}

/// Holds all resources of a single kind.
#[derive(Debug)]
pub struct Index<K> {
    entries: BTreeMap<ResourceId, K>,

    /// Set when the collection was provided to the snapshot, even if it holds no entries.
    available: bool,
}

/// A typed view of a single snapshot entry.
#[derive(Debug)]
pub struct Entry<'a, K> {
    pub id: &'a ResourceId,
    pub resource: &'a K,
}

#[derive(Debug, Default)]
pub struct Snapshot {
    gateways: Index<k8s::Gateway>,
    pods: Index<k8s::Pod>,
    secrets: Index<k8s::Secret>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{kind} resource is missing a name")]
    MissingName { kind: String },

    #[error("{kind} {name} is missing a namespace")]
    MissingNamespace { kind: String, name: String },
}

// === impl Snapshot ===

impl Snapshot {
    /// Marks a collection as provided without adding any entries to it.
    pub fn enable(&mut self, collection: Collection) {
        match collection {
            Collection::Gateways => self.gateways.available = true,
            Collection::Pods => self.pods.available = true,
            Collection::Secrets => self.secrets.available = true,
        }
    }

    pub fn is_available(&self, collection: Collection) -> bool {
        match collection {
            Collection::Gateways => self.gateways.available,
            Collection::Pods => self.pods.available,
            Collection::Secrets => self.secrets.available,
        }
    }

    /// Stores a resource under `id`, returning the resource it replaced, if any.
    pub fn insert<K: Kind>(&mut self, id: ResourceId, resource: K) -> Option<K> {
        trace!(collection = %K::COLLECTION, %id, "Inserting");
        let index = K::index_mut(self);
        index.available = true;
        index.entries.insert(id, resource)
    }

    /// Stores a resource under the namespace and name in its metadata.
    pub fn apply<K: Kind>(&mut self, resource: K) -> Result<Option<K>, Error> {
        let kind = K::kind(&()).to_string();
        let name = resource
            .meta()
            .name
            .clone()
            .ok_or_else(|| Error::MissingName { kind: kind.clone() })?;
        let namespace = resource
            .namespace()
            .ok_or_else(|| Error::MissingNamespace {
                kind,
                name: name.clone(),
            })?;
        Ok(self.insert(ResourceId::new(namespace, name), resource))
    }

    /// Iterates over all resources of a kind, ordered by namespace and name.
    pub fn entries<K: Kind>(&self) -> impl Iterator<Item = Entry<'_, K>> + '_ {
        K::index(self)
            .entries
            .iter()
            .map(|(id, resource)| Entry { id, resource })
    }

    #[cfg(test)]
    pub(crate) fn get<K: Kind>(&self, id: &ResourceId) -> Option<&K> {
        K::index(self).entries.get(id)
    }

    pub fn exists<K: Kind>(&self, id: &ResourceId) -> bool {
        K::index(self).entries.contains_key(id)
    }

    pub fn len<K: Kind>(&self) -> usize {
        K::index(self).entries.len()
    }

    /// The number of resources across all collections.
    pub fn total_len(&self) -> usize {
        self.len::<k8s::Gateway>() + self.len::<k8s::Pod>() + self.len::<k8s::Secret>()
    }
}

// === impl Index ===

impl<K> Default for Index<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            available: false,
        }
    }
}

// === impl Entry ===

impl<K> Clone for Entry<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Entry<'_, K> {}

// === impl Kind ===

impl Kind for k8s::Gateway {
    const COLLECTION: Collection = Collection::Gateways;

    fn index(snapshot: &Snapshot) -> &Index<Self> {
        &snapshot.gateways
    }

    fn index_mut(snapshot: &mut Snapshot) -> &mut Index<Self> {
        &mut snapshot.gateways
    }
}

impl Kind for k8s::Pod {
    const COLLECTION: Collection = Collection::Pods;

    fn index(snapshot: &Snapshot) -> &Index<Self> {
        &snapshot.pods
    }

    fn index_mut(snapshot: &mut Snapshot) -> &mut Index<Self> {
        &mut snapshot.pods
    }
}

impl Kind for k8s::Secret {
    const COLLECTION: Collection = Collection::Secrets;

    fn index(snapshot: &Snapshot) -> &Index<Self> {
        &snapshot.secrets
    }

    fn index_mut(snapshot: &mut Snapshot) -> &mut Index<Self> {
        &mut snapshot.secrets
    }
}
