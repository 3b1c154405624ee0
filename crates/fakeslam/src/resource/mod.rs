//! Resource naming, configuration, and the service registry.
//!
//! These are the host-facing types a module deals in: an [`Api`] says *what*
//! a resource is (here always `rdk:service:slam`), a [`Model`] says *which*
//! implementation provides it, and a [`ResourceConfig`] carries the
//! host-assigned name and raw attributes for one instance.
//!
//! ## Structure
//!
//! - [`registry`] - process-wide table of constructors keyed by API and model.

mod registry;

pub use registry::*;

use crate::{Error, Result, SlamService};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A resource API triple, rendered `namespace:kind:subtype`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Api {
    pub namespace: String,
    pub kind: String,
    pub subtype: String,
}

impl Api {
    pub fn new(namespace: &str, kind: &str, subtype: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            kind: kind.to_owned(),
            subtype: subtype.to_owned(),
        }
    }

    /// The built-in SLAM service API, `rdk:service:slam`.
    pub fn slam() -> Self {
        Self::new("rdk", "service", "slam")
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.kind, self.subtype)
    }
}

/// A model triple, rendered `namespace:family:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Model {
    pub namespace: String,
    pub family: String,
    pub name: String,
}

impl Model {
    pub fn new(namespace: &str, family: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            family: family.to_owned(),
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.family, self.name)
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [namespace, family, name]
                if parts.iter().all(|p| !p.trim().is_empty()) =>
            {
                Ok(Self::new(namespace, family, name))
            }
            _ => Err(Error::InvalidModel {
                input: s.to_owned(),
            }),
        }
    }
}

/// The host-assigned identity of one resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName {
    pub api: Api,
    pub name: String,
}

impl ResourceName {
    pub fn new(api: Api, name: &str) -> Self {
        Self {
            api,
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api, self.name)
    }
}

/// Configuration the host sends when constructing or rebuilding a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    pub api: Api,
    pub model: Model,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl ResourceConfig {
    pub fn new(name: &str, api: Api, model: Model) -> Self {
        Self {
            name: name.to_owned(),
            api,
            model,
            attributes: serde_json::Map::new(),
        }
    }

    /// Adds one attribute, replacing any previous value under `key`.
    pub fn with_attribute(mut self, key: &str, value: serde_json::Value) -> Self {
        self.attributes.insert(key.to_owned(), value);
        self
    }

    pub fn resource_name(&self) -> ResourceName {
        ResourceName::new(self.api.clone(), &self.name)
    }
}

/// Other resources a constructor may depend on.
pub type Dependencies = HashMap<ResourceName, Arc<dyn SlamService>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_round_trips_through_triple_form() {
        let model: Model = "ncs:slam:nickslam".parse().unwrap();
        assert_eq!(model, Model::new("ncs", "slam", "nickslam"));
        assert_eq!(model.to_string(), "ncs:slam:nickslam");
    }

    #[test]
    fn model_rejects_wrong_arity_and_empty_parts() {
        for input in ["", "ncs:slam", "a:b:c:d", "ncs::nickslam", " :slam:x"] {
            assert_eq!(
                input.parse::<Model>(),
                Err(Error::InvalidModel {
                    input: input.to_owned()
                }),
                "{input:?}"
            );
        }
    }

    #[test]
    fn resource_name_renders_api_and_name() {
        let cfg = ResourceConfig::new("slam1", Api::slam(), Model::new("ncs", "slam", "nickslam"));
        assert_eq!(cfg.resource_name().to_string(), "rdk:service:slam/slam1");
    }

    #[test]
    fn config_attributes_default_to_empty() {
        let cfg: ResourceConfig = serde_json::from_str(
            r#"{
                "name": "slam1",
                "api": {"namespace": "rdk", "kind": "service", "subtype": "slam"},
                "model": {"namespace": "ncs", "family": "slam", "name": "nickslam"}
            }"#,
        )
        .unwrap();
        assert!(cfg.attributes.is_empty());
        assert_eq!(cfg.api, Api::slam());
    }
}
