use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{Handler, InvokeRequest, InvokeResponse, Metadata, OperationKind};

/// Lifecycle shared by input and output bindings.
#[async_trait]
pub trait Binding: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Initialize the binding from its property bag. Called once, before any
    /// `read` or `invoke`.
    async fn init(&mut self, metadata: Metadata) -> Result<(), Self::Error>;
}

/// A binding that receives inbound events and forwards them to the host.
#[async_trait]
pub trait InputBinding: Binding {
    /// Start delivering events to `handler`.
    ///
    /// Runs until the binding decides to stop or `shutdown` is cancelled.
    /// Returning `Ok(())` is the normal way out.
    async fn read(&self, handler: Handler, shutdown: CancellationToken)
        -> Result<(), Self::Error>;
}

/// A binding that performs operations on request.
#[async_trait]
pub trait OutputBinding: Binding {
    /// Operation kinds accepted by `invoke`.
    fn operations(&self) -> Vec<OperationKind>;

    /// Perform a single operation. `Ok(None)` means success without a body.
    async fn invoke(&self, request: InvokeRequest) -> Result<Option<InvokeResponse>, Self::Error>;
}
