use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::OperationKind;

/// A request to an output binding.
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
    pub operation: OperationKind,
}

impl InvokeRequest {
    pub fn new(operation: OperationKind, data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            metadata: HashMap::new(),
            operation,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Response body of an output binding invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeResponse {
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
    pub content_type: Option<String>,
}

impl InvokeResponse {
    /// A response carrying an already encoded JSON body.
    pub fn json(data: Vec<u8>) -> Self {
        Self {
            data,
            metadata: HashMap::new(),
            content_type: Some("application/json".to_string()),
        }
    }
}

/// An inbound event delivered by an input binding to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadResponse {
    pub data: Vec<u8>,
    pub metadata: HashMap<String, String>,
    pub content_type: Option<String>,
}

/// Host callback for inbound events.
///
/// The returned bytes are an optional reply the host may hand back to the
/// binding; an error tells the binding the event was not processed.
pub type Handler =
    Arc<dyn Fn(ReadResponse) -> BoxFuture<'static, anyhow::Result<Option<Vec<u8>>>> + Send + Sync>;

/// Box an async closure into a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(ReadResponse) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<Vec<u8>>>> + Send + 'static,
{
    Arc::new(move |response: ReadResponse| f(response).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_handler_fn_forwards_response() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = {
            let calls = Arc::clone(&calls);
            handler_fn(move |response: ReadResponse| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(response.data))
                }
            })
        };

        let reply = handler(ReadResponse {
            data: b"hello".to_vec(),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(reply, Some(b"hello".to_vec()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invoke_request_builder() {
        let request = InvokeRequest::new(OperationKind::Create, "{\"id\":1}")
            .with_metadata("partitionKey", "order-1");

        assert_eq!(request.data, b"{\"id\":1}");
        assert_eq!(request.metadata["partitionKey"], "order-1");
    }
}
