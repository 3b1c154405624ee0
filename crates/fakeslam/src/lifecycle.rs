//! Process lifecycle of the module: register, serve until told to stop, close.

use crate::{FakeSlam, Module, ModuleArgs, Registry, Result};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Registers the fake SLAM model with `registry`.
///
/// # Errors
///
/// Returns [`crate::Error::AlreadyRegistered`] if the model is already
/// present.
pub fn register(registry: &Registry) -> Result<()> {
    registry.register_service(FakeSlam::api(), FakeSlam::model(), FakeSlam::registration())
}

/// Registers the model, builds the module from `args`, advertises the model
/// and starts serving.
pub fn start_module(registry: &Registry, args: ModuleArgs) -> Result<Module> {
    register(registry)?;
    let module = Module::from_args(args, registry.clone())?;
    module.add_model_from_registry(&FakeSlam::api(), &FakeSlam::model())?;
    module.start()?;
    Ok(module)
}

/// Runs the module until `ctx` is cancelled, then closes it.
///
/// Any startup failure is returned before serving begins; the module is
/// closed on every exit path.
#[instrument(skip_all, fields(socket = %args.socket_path.display()))]
pub async fn run(registry: &Registry, args: ModuleArgs, ctx: CancellationToken) -> Result<()> {
    let module = start_module(registry, args)?;
    tracing::info!(api = %FakeSlam::api(), model = %FakeSlam::model(), "Module ready");

    ctx.cancelled().await;

    tracing::info!("Shutdown requested");
    module.close();
    Ok(())
}

/// [`run`] against the process-wide registry.
pub async fn run_global(args: ModuleArgs, ctx: CancellationToken) -> Result<()> {
    run(Registry::global(), args, ctx).await
}
