use super::{Api, Dependencies, Model, ResourceConfig, ResourceName};
use crate::{Error, Result, SlamService};
use core::fmt;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tokio_util::sync::CancellationToken;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Typed resource attributes for one service model.
pub trait ServiceConfig: DeserializeOwned + Send + 'static {
    /// Checks the decoded attributes and returns the names of any resources
    /// this instance implicitly depends on.
    ///
    /// `path` is the resource name, for use in error messages.
    fn validate(&self, path: &str) -> Result<Vec<String>>;
}

type Validator = dyn Fn(&ResourceConfig) -> Result<Vec<String>> + Send + Sync;
type Constructor = dyn Fn(&CancellationToken, &Dependencies, &ResourceConfig) -> Result<Arc<dyn SlamService>>
    + Send
    + Sync;

/// How the host validates and builds instances of one model.
///
/// Built from a constructor over a typed [`ServiceConfig`]; the raw JSON
/// attributes are decoded once per call before the constructor runs.
#[derive(Clone)]
pub struct Registration {
    validator: Arc<Validator>,
    constructor: Arc<Constructor>,
}

impl Registration {
    pub fn new<C, F>(constructor: F) -> Self
    where
        C: ServiceConfig,
        F: Fn(&CancellationToken, &Dependencies, ResourceName, C) -> Result<Arc<dyn SlamService>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            validator: Arc::new(|cfg: &ResourceConfig| {
                let native: C = decode_attributes(cfg)?;
                native.validate(&cfg.name)
            }),
            constructor: Arc::new(
                move |ctx: &CancellationToken, deps: &Dependencies, cfg: &ResourceConfig| {
                    let native: C = decode_attributes(cfg)?;
                    constructor(ctx, deps, cfg.resource_name(), native)
                },
            ),
        }
    }

    /// Decodes and validates `cfg`, returning implicit dependency names.
    pub fn validate(&self, cfg: &ResourceConfig) -> Result<Vec<String>> {
        (self.validator)(cfg)
    }

    /// Decodes `cfg` and runs the constructor.
    pub fn construct(
        &self,
        ctx: &CancellationToken,
        deps: &Dependencies,
        cfg: &ResourceConfig,
    ) -> Result<Arc<dyn SlamService>> {
        (self.constructor)(ctx, deps, cfg)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}

fn decode_attributes<C: DeserializeOwned>(cfg: &ResourceConfig) -> Result<C> {
    serde_json::from_value(serde_json::Value::Object(cfg.attributes.clone())).map_err(|e| {
        Error::InvalidConfig {
            path: cfg.name.clone(),
            reason: e.to_string(),
        }
    })
}

/// Table of service registrations keyed by API and model.
///
/// A module registers its models once at startup, then the bridge looks them
/// up whenever the host asks for a new instance. [`Registry::global`] is the
/// process-wide table; tests build private ones with [`Registry::new`].
///
/// Clones share the same table.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: Arc<RwLock<HashMap<(Api, Model), Registration>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Registers `registration` under `api` and `model`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRegistered`] if the pair is taken. The existing
    /// registration is left untouched.
    pub fn register_service(&self, api: Api, model: Model, registration: Registration) -> Result<()> {
        let mut entries = self.entries.write();
        let key = (api, model);
        if entries.contains_key(&key) {
            let (api, model) = key;
            return Err(Error::AlreadyRegistered { api, model });
        }
        tracing::debug!(api = %key.0, model = %key.1, "Registered service model");
        entries.insert(key, registration);
        Ok(())
    }

    pub fn lookup(&self, api: &Api, model: &Model) -> Option<Registration> {
        self.entries
            .read()
            .get(&(api.clone(), model.clone()))
            .cloned()
    }

    pub fn contains(&self, api: &Api, model: &Model) -> bool {
        self.entries
            .read()
            .contains_key(&(api.clone(), model.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
