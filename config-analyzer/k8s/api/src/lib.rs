#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod gateway;
pub mod labels;
mod resource_id;

pub use self::{
    gateway::Gateway,
    labels::Selector,
    resource_id::ResourceId,
};
pub use k8s_openapi::api::{
    self,
    core::v1::{Pod, Secret},
};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
pub use kube::{core::TypeMeta, Resource, ResourceExt};
