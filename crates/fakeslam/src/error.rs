//! Error types for the fake SLAM service and its host bridge.
//!
//! This module defines the central `Error` enum, which captures every
//! reportable failure of the service, the resource registry, and the module
//! bridge. Two terminal conditions are not errors:
//!
//! - Stream exhaustion is [`ChunkStatus::Exhausted`], a normal end of sequence.
//! - The `boom` fault-injection command never returns; it terminates the
//!   process.
//!
//! ## Error Cases
//! - `Unimplemented`: The capability exists in the interface but this service
//!   does not provide it.
//! - `Cancelled`: The caller's execution context was cancelled.
//! - `ArtifactRead`: Reading from an artifact failed. In-memory artifacts never
//!   produce this.
//! - `InvalidConfig`: Resource attributes could not be decoded.
//! - `InvalidModel`, `InvalidArgs`: Malformed model triple or process
//!   arguments.
//! - `AlreadyRegistered`, `ModelNotRegistered`, `NoModels`: Registry and model
//!   advertisement failures.
//! - `InvalidState`, `NotServing`, `ResourceNotFound`, `ResourceExists`:
//!   Module bridge misuse.
//!
//! [`ChunkStatus::Exhausted`]: crate::ChunkStatus::Exhausted

use crate::{Api, Model};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the fake SLAM service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The capability is part of the service interface but not provided.
    #[error("{capability} unimplemented")]
    Unimplemented { capability: &'static str },

    /// The execution context was cancelled before the operation completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Reading from the bound artifact failed.
    #[error("Artifact read error: {context}")]
    ArtifactRead { context: String },

    /// Resource attributes could not be decoded into the service config.
    #[error("Invalid config at {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    /// A model string was not a `namespace:family:name` triple.
    #[error("Invalid model {input:?}: expected namespace:family:name")]
    InvalidModel { input: String },

    /// The module could not be built from its process arguments.
    #[error("Invalid module arguments: {reason}")]
    InvalidArgs { reason: String },

    /// A registration for this API/model pair already exists.
    #[error("{api} {model} is already registered")]
    AlreadyRegistered { api: Api, model: Model },

    /// No registration exists for this API/model pair.
    #[error("{api} {model} is not registered")]
    ModelNotRegistered { api: Api, model: Model },

    /// The module was started without advertising any model.
    #[error("Module has no models to serve")]
    NoModels,

    /// The module was driven through an invalid state transition.
    #[error("Module is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// A host call arrived while the module was not serving.
    #[error("Module is not serving")]
    NotServing,

    /// The named resource is not live in this module.
    #[error("Resource {name} not found")]
    ResourceNotFound { name: String },

    /// A resource with this name is already live in this module.
    #[error("Resource {name} already exists")]
    ResourceExists { name: String },
}
