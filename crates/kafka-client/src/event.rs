use futures::future::{BoxFuture, FutureExt};
use rdkafka::message::{Headers, Message as RdkafkaMessage};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

pub const KEY_METADATA: &str = "__key";
pub const TOPIC_METADATA: &str = "__topic";
pub const PARTITION_METADATA: &str = "__partition";
pub const OFFSET_METADATA: &str = "__offset";
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// A message received from a subscribed topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub topic: String,
    pub data: Vec<u8>,
    /// Message headers plus the `__key`, `__topic`, `__partition` and
    /// `__offset` entries
    pub metadata: HashMap<String, String>,
    pub content_type: Option<String>,
}

impl Event {
    /// Build an event from a received Kafka message.
    ///
    /// Header values and the key are decoded lossily as UTF-8; headers
    /// without a value are dropped.
    pub fn from_message<M: RdkafkaMessage>(message: &M) -> Self {
        let mut metadata = HashMap::new();

        if let Some(headers) = message.headers() {
            for header in headers.iter() {
                if let Some(value) = header.value {
                    metadata.insert(
                        header.key.to_string(),
                        String::from_utf8_lossy(value).into_owned(),
                    );
                }
            }
        }

        if let Some(key) = message.key() {
            metadata.insert(
                KEY_METADATA.to_string(),
                String::from_utf8_lossy(key).into_owned(),
            );
        }
        metadata.insert(TOPIC_METADATA.to_string(), message.topic().to_string());
        metadata.insert(
            PARTITION_METADATA.to_string(),
            message.partition().to_string(),
        );
        metadata.insert(OFFSET_METADATA.to_string(), message.offset().to_string());

        let content_type = metadata.get(CONTENT_TYPE_HEADER).cloned();

        Self {
            topic: message.topic().to_string(),
            data: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
            metadata,
            content_type,
        }
    }
}

/// Per-topic callback invoked for each received [`Event`].
///
/// An error means the event was not processed; what happens next depends on
/// the consume retry policy.
pub type EventHandler = Arc<dyn Fn(Event) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Box an async closure into an [`EventHandler`].
pub fn event_handler<F, Fut>(f: F) -> EventHandler
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |event: Event| f(event).boxed())
}
