//! In-process bridge between the host and the registered services.
//!
//! The host launches the module process with the address it listens on, the
//! module advertises which models it can build, and from then on the host
//! drives instance construction, rebuilding and removal through this bridge.
//! Transport framing is the host's business; the bridge only exposes the
//! calls.
//!
//! ## States
//!
//! `Created -> Serving -> Closed`. Closing is idempotent and also happens when
//! the [`Module`] is dropped, so every exit path releases live instances.

use crate::{
    Api, Dependencies, Error, Model, Registry, ResourceConfig, ResourceName, Result, SlamService,
};
use core::fmt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Longest parent socket path accepted, leaving room for the terminating NUL
/// in `sun_path` on every supported platform.
pub const MAX_SOCKET_PATH_LEN: usize = 103;

/// Arguments the host passes when launching the module process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArgs {
    /// Unix socket the host listens on.
    pub socket_path: PathBuf,
}

impl ModuleArgs {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        let len = self.socket_path.as_os_str().len();
        if len == 0 {
            return Err(Error::InvalidArgs {
                reason: "socket path must not be empty".to_string(),
            });
        }
        if len > MAX_SOCKET_PATH_LEN {
            return Err(Error::InvalidArgs {
                reason: format!(
                    "socket path is {len} bytes, exceeding the {MAX_SOCKET_PATH_LEN} byte limit"
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Created,
    Serving,
    Closed,
}

impl ModuleState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Serving => "serving",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The module side of the host connection.
pub struct Module {
    args: ModuleArgs,
    registry: Registry,
    models: RwLock<Vec<(Api, Model)>>,
    // Lock order: `state` before `resources`.
    state: RwLock<ModuleState>,
    resources: RwLock<HashMap<ResourceName, Arc<dyn SlamService>>>,
}

impl Module {
    /// Builds a module from process arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgs`] if the socket path is empty or too long.
    pub fn from_args(args: ModuleArgs, registry: Registry) -> Result<Self> {
        args.validate()?;
        Ok(Self {
            args,
            registry,
            models: RwLock::new(Vec::new()),
            state: RwLock::new(ModuleState::Created),
            resources: RwLock::new(HashMap::new()),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.args.socket_path
    }

    pub fn state(&self) -> ModuleState {
        *self.state.read()
    }

    /// Advertises a registered model. Advertising the same pair twice is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::ModelNotRegistered`] if the registry lacks the pair.
    /// - [`Error::InvalidState`] once the module is closed.
    pub fn add_model_from_registry(&self, api: &Api, model: &Model) -> Result<()> {
        let state = self.state();
        if state == ModuleState::Closed {
            return Err(Error::InvalidState {
                expected: "created or serving",
                actual: state.as_str(),
            });
        }
        if !self.registry.contains(api, model) {
            return Err(Error::ModelNotRegistered {
                api: api.clone(),
                model: model.clone(),
            });
        }

        let mut models = self.models.write();
        if !models.iter().any(|(a, m)| a == api && m == model) {
            tracing::debug!(%api, %model, "Advertising model");
            models.push((api.clone(), model.clone()));
        }
        Ok(())
    }

    /// The handshake answer: every advertised API/model pair.
    pub fn ready(&self) -> Result<Vec<(Api, Model)>> {
        let _serving = self.serving()?;
        Ok(self.models.read().clone())
    }

    /// Begins accepting host calls.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless the module is freshly created.
    /// - [`Error::NoModels`] if nothing has been advertised.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.write();
        if *state != ModuleState::Created {
            return Err(Error::InvalidState {
                expected: ModuleState::Created.as_str(),
                actual: state.as_str(),
            });
        }
        if self.models.read().is_empty() {
            return Err(Error::NoModels);
        }

        *state = ModuleState::Serving;
        tracing::info!(
            socket = %self.args.socket_path.display(),
            models = self.models.read().len(),
            "Module serving"
        );
        Ok(())
    }

    /// Closes every live instance and stops accepting host calls.
    ///
    /// Safe to call repeatedly and from any state.
    pub fn close(&self) {
        let mut state = self.state.write();
        if *state == ModuleState::Closed {
            return;
        }

        let drained: Vec<_> = self.resources.write().drain().collect();
        let ctx = CancellationToken::new();
        for (name, resource) in drained {
            if let Err(e) = resource.close(&ctx) {
                tracing::warn!(resource = %name, "Error closing resource: {e}");
            }
        }

        *state = ModuleState::Closed;
        tracing::info!(socket = %self.args.socket_path.display(), "Module closed");
    }

    /// Decodes and validates a config without building anything, returning
    /// implicit dependency names.
    pub fn validate_config(&self, cfg: &ResourceConfig) -> Result<Vec<String>> {
        let _serving = self.serving()?;
        self.registration_for(cfg)?.validate(cfg)
    }

    /// Builds a new instance from `cfg`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceExists`] if the name is already live; rebuilding
    /// goes through [`Module::reconfigure_resource`].
    #[tracing::instrument(level = "debug", skip_all, fields(resource = %cfg.name, model = %cfg.model))]
    pub fn add_resource(&self, ctx: &CancellationToken, cfg: &ResourceConfig) -> Result<ResourceName> {
        let _serving = self.serving()?;
        let name = cfg.resource_name();
        let exists = || Error::ResourceExists {
            name: name.to_string(),
        };
        if self.resources.read().contains_key(&name) {
            return Err(exists());
        }

        let resource = self
            .registration_for(cfg)?
            .construct(ctx, &Dependencies::new(), cfg)?;

        // Another add may have won while this one was constructing.
        let mut resources = self.resources.write();
        if resources.contains_key(&name) {
            drop(resources);
            close_discarded(ctx, &name, resource.as_ref());
            return Err(exists());
        }
        resources.insert(name.clone(), resource);
        Ok(name)
    }

    /// Rebuilds an existing instance from a new config.
    ///
    /// The replacement is constructed first; the old instance is closed only
    /// after the swap, so a failed rebuild leaves the old one serving.
    #[tracing::instrument(level = "debug", skip_all, fields(resource = %cfg.name, model = %cfg.model))]
    pub fn reconfigure_resource(
        &self,
        ctx: &CancellationToken,
        cfg: &ResourceConfig,
    ) -> Result<ResourceName> {
        let _serving = self.serving()?;
        let name = cfg.resource_name();
        if !self.resources.read().contains_key(&name) {
            return Err(Error::ResourceNotFound {
                name: name.to_string(),
            });
        }

        let rebuilt = self
            .registration_for(cfg)?
            .construct(ctx, &Dependencies::new(), cfg)?;

        // The instance may have been removed while the rebuild was running.
        let mut resources = self.resources.write();
        if !resources.contains_key(&name) {
            drop(resources);
            close_discarded(ctx, &name, rebuilt.as_ref());
            return Err(Error::ResourceNotFound {
                name: name.to_string(),
            });
        }
        let old = resources.insert(name.clone(), rebuilt);
        drop(resources);

        if let Some(old) = old {
            if let Err(e) = old.close(ctx) {
                tracing::warn!(resource = %name, "Error closing rebuilt resource: {e}");
            }
        }
        Ok(name)
    }

    pub fn remove_resource(&self, ctx: &CancellationToken, name: &ResourceName) -> Result<()> {
        let _serving = self.serving()?;
        let removed = self.resources.write().remove(name);
        match removed {
            Some(resource) => resource.close(ctx),
            None => Err(Error::ResourceNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Returns a live instance for capability calls.
    pub fn resource(&self, name: &ResourceName) -> Result<Arc<dyn SlamService>> {
        let _serving = self.serving()?;
        self.resources
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound {
                name: name.to_string(),
            })
    }

    pub fn resources(&self) -> Result<Vec<ResourceName>> {
        let _serving = self.serving()?;
        Ok(self.resources.read().keys().cloned().collect())
    }

    // Holding the returned guard keeps `close` from running mid-call.
    fn serving(&self) -> Result<parking_lot::RwLockReadGuard<'_, ModuleState>> {
        let state = self.state.read();
        if *state != ModuleState::Serving {
            return Err(Error::NotServing);
        }
        Ok(state)
    }

    fn registration_for(&self, cfg: &ResourceConfig) -> Result<crate::Registration> {
        let advertised = self
            .models
            .read()
            .iter()
            .any(|(a, m)| *a == cfg.api && *m == cfg.model);
        let not_registered = || Error::ModelNotRegistered {
            api: cfg.api.clone(),
            model: cfg.model.clone(),
        };
        if !advertised {
            return Err(not_registered());
        }
        self.registry
            .lookup(&cfg.api, &cfg.model)
            .ok_or_else(not_registered)
    }
}

fn close_discarded(ctx: &CancellationToken, name: &ResourceName, resource: &dyn SlamService) {
    tracing::debug!(resource = %name, "Discarding instance built for a stale request");
    if let Err(e) = resource.close(ctx) {
        tracing::warn!(resource = %name, "Error closing discarded resource: {e}");
    }
}

impl Drop for Module {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("socket_path", &self.args.socket_path)
            .field("state", &self.state())
            .field("models", &self.models.read().len())
            .field("resources", &self.resources.read().len())
            .finish()
    }
}
