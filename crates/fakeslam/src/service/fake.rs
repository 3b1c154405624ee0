use crate::{
    Api, Artifact, ArtifactStore, ChunkStream, CommandMap, Error, FaultInjector, Model, Pose,
    Properties, Quaternion, Registration, ResourceName, Result, SlamConfig, SlamService, Vector3,
};
use parking_lot::Mutex;
use portable_atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The pose every fake instance reports.
pub const FAKE_POSE: Pose = Pose::new(Vector3::new(255.0, 255.0, 0.0), Quaternion::IDENTITY);

/// Snapshot of dispatch activity on one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    /// Dispatch bodies executing right now.
    pub in_flight: usize,
    /// Highest `in_flight` ever observed. Stays at 1 while dispatch is
    /// serialized.
    pub peak_in_flight: usize,
    /// Dispatch calls that returned normally.
    pub completed: u64,
}

/// A deterministic SLAM service instance.
///
/// The artifact is chosen once from [`SlamConfig::big`] and never changes;
/// reconfiguring means building a new instance. Read-only queries touch only
/// that immutable state and run without locking. Command dispatch is
/// serialized by a per-instance lock held for the whole body, including the
/// crash path.
pub struct FakeSlam {
    name: ResourceName,
    artifact: Artifact,
    fault: FaultInjector,
    dispatch_lock: Mutex<()>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    completed: AtomicU64,
}

impl FakeSlam {
    /// The model triple this service registers under, `ncs:slam:nickslam`.
    pub fn model() -> Model {
        Model::new("ncs", "slam", "nickslam")
    }

    /// The SLAM API this service implements.
    pub fn api() -> Api {
        Api::slam()
    }

    /// Registration building a [`FakeSlam`] from [`SlamConfig`] attributes.
    pub fn registration() -> Registration {
        Registration::new(|_ctx, _deps, name, cfg: SlamConfig| {
            Ok(Arc::new(Self::new(name, cfg)) as Arc<dyn SlamService>)
        })
    }

    /// Builds an instance serving one of the embedded maps.
    pub fn new(name: ResourceName, config: SlamConfig) -> Self {
        let artifact = ArtifactStore::global().select(config.big);
        Self::with_parts(name, artifact, FaultInjector::process())
    }

    pub fn with_parts(name: ResourceName, artifact: Artifact, fault: FaultInjector) -> Self {
        tracing::info!(
            resource = %name,
            artifact = %artifact.size(),
            bytes = artifact.len(),
            "Constructed fake SLAM service"
        );
        Self {
            name,
            artifact,
            fault,
            dispatch_lock: Mutex::new(()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            completed: AtomicU64::new(0),
        }
    }

    pub const fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn dispatch_stats(&self) -> DispatchStats {
        DispatchStats {
            in_flight: self.in_flight.load(Ordering::Acquire),
            peak_in_flight: self.peak_in_flight.load(Ordering::Acquire),
            completed: self.completed.load(Ordering::Relaxed),
        }
    }
}

/// Marks one dispatch body as executing for as long as it lives.
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::AcqRel) + 1;
        peak.fetch_max(now, Ordering::AcqRel);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}

impl SlamService for FakeSlam {
    fn name(&self) -> &ResourceName {
        &self.name
    }

    #[tracing::instrument(level = "debug", skip_all, fields(resource = %self.name))]
    fn position(&self, _ctx: &CancellationToken) -> Result<Pose> {
        Ok(FAKE_POSE)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(resource = %self.name))]
    fn point_cloud_map(
        &self,
        _ctx: &CancellationToken,
        _return_edited_map: bool,
    ) -> Result<ChunkStream> {
        Ok(ChunkStream::new(self.artifact.clone()))
    }

    fn internal_state(&self, _ctx: &CancellationToken) -> Result<ChunkStream> {
        Err(Error::Unimplemented {
            capability: "InternalState",
        })
    }

    fn properties(&self, _ctx: &CancellationToken) -> Result<Properties> {
        Ok(Properties::default())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(resource = %self.name, keys = cmd.len()))]
    fn do_command(&self, ctx: &CancellationToken, cmd: CommandMap) -> Result<CommandMap> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let _guard = self.dispatch_lock.lock();
        let _active = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        if FaultInjector::is_fault_command(&cmd) {
            // Terminates with the lock held; other dispatchers stay parked
            // until the process is gone.
            self.fault.crash(&self.name);
        }

        self.completed.fetch_add(1, Ordering::Relaxed);
        Ok(CommandMap::new())
    }
}
