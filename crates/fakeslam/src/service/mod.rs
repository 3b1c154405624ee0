//! The SLAM capability set and its fake implementation.
//!
//! [`SlamService`] is the surface the host drives once an instance exists.
//! [`FakeSlam`] answers it with canned data: a fixed pose, an embedded point
//! cloud streamed in chunks, an empty properties record, and a command
//! dispatcher whose only behaviour is the `boom` fault-injection hook.
//!
//! ## Structure
//!
//! - [`config`] - the `big` attribute and its lenient decoding.
//! - [`fault`] - process termination, kept apart from ordinary dispatch.
//! - [`fake`] - the service instance.

mod config;
mod fake;
mod fault;

pub use config::*;
pub use fake::*;
pub use fault::*;

use crate::{ChunkStream, CommandMap, Pose, Properties, ResourceName, Result};
use tokio_util::sync::CancellationToken;

/// Capabilities of a SLAM service instance.
///
/// Every call takes the caller's execution context. Implementations that do
/// blocking work must check it and return [`Error::Cancelled`] promptly.
///
/// [`Error::Cancelled`]: crate::Error::Cancelled
pub trait SlamService: Send + Sync {
    /// The host-assigned name of this instance.
    fn name(&self) -> &ResourceName;

    /// Current pose in the map frame.
    fn position(&self, ctx: &CancellationToken) -> Result<Pose>;

    /// Opens a fresh chunked stream over the current point-cloud map.
    fn point_cloud_map(&self, ctx: &CancellationToken, return_edited_map: bool)
    -> Result<ChunkStream>;

    /// Opens a chunked stream over the algorithm's internal state.
    fn internal_state(&self, ctx: &CancellationToken) -> Result<ChunkStream>;

    fn properties(&self, ctx: &CancellationToken) -> Result<Properties>;

    /// Generic command dispatch over open key/value payloads.
    fn do_command(&self, ctx: &CancellationToken, cmd: CommandMap) -> Result<CommandMap>;

    /// Releases resources held by the instance.
    fn close(&self, _ctx: &CancellationToken) -> Result<()> {
        Ok(())
    }
}
