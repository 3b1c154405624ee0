#![doc = include_str!("../README.md")]

mod artifact;
mod error;
mod lifecycle;
mod module;
mod resource;
mod service;
mod stream;
pub mod tables;
mod types;
mod value;

pub use crate::artifact::*;
pub use crate::error::*;
pub use crate::lifecycle::*;
pub use crate::module::*;
pub use crate::resource::*;
pub use crate::service::*;
pub use crate::stream::*;
pub use crate::types::*;
pub use crate::value::*;
