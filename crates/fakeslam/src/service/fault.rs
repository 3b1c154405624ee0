use crate::{CommandMap, ResourceName};
use core::fmt;
use std::sync::Arc;

/// Dispatch key that triggers the injected crash.
pub const BOOM_COMMAND: &str = "boom";

/// Exit code of the injected crash.
pub const FAULT_EXIT_CODE: i32 = 1;

/// Ends the hosting process.
///
/// Production code uses [`ProcessExit`]. Tests substitute an implementation
/// that panics so the crash path can be observed in-process.
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32) -> !;
}

/// Exits the process immediately without unwinding or running destructors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// The fault-injection hook.
///
/// Lets external harnesses verify how a supervisor handles an unrecoverable
/// crash. The crash is not an error return: [`FaultInjector::crash`] never
/// returns.
#[derive(Clone)]
pub struct FaultInjector {
    terminator: Arc<dyn Terminator>,
}

impl FaultInjector {
    /// An injector that really exits the process.
    pub fn process() -> Self {
        Self::with_terminator(Arc::new(ProcessExit))
    }

    pub fn with_terminator(terminator: Arc<dyn Terminator>) -> Self {
        Self { terminator }
    }

    /// Whether `cmd` requests the injected crash. Only the key matters.
    pub fn is_fault_command(cmd: &CommandMap) -> bool {
        cmd.contains_key(BOOM_COMMAND)
    }

    pub fn crash(&self, resource: &ResourceName) -> ! {
        tracing::info!(resource = %resource, "Boom");
        self.terminator.terminate(FAULT_EXIT_CODE)
    }
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::process()
    }
}

impl fmt::Debug for FaultInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjector").finish_non_exhaustive()
    }
}
