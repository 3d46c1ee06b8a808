//! Generic binding contract for kafka-binding.
//!
//! A binding connects an external message system to a generic
//! invoke/read interface. This crate holds the pieces that are shared
//! between a host and a concrete binding:
//!
//! - [`Metadata`] - name and property bag handed to a binding at init
//! - [`OperationKind`], [`InvokeRequest`], [`InvokeResponse`] - the output direction
//! - [`ReadResponse`], [`Handler`] - the input direction
//! - [`Binding`], [`InputBinding`], [`OutputBinding`] - lifecycle traits
//! - [`spec`] - the static metadata document a binding publishes about itself
//!
//! # Dependency Direction
//!
//! Concrete bindings (the root `kafka-binding` crate) depend on this crate.
//! Nothing here knows about Kafka.

mod binding;
pub mod error;
mod metadata;
mod operation;
mod request;
pub mod spec;

pub use binding::{Binding, InputBinding, OutputBinding};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use operation::OperationKind;
pub use request::{handler_fn, Handler, InvokeRequest, InvokeResponse, ReadResponse};
pub use spec::{SpecMetadata, SpecYaml};
