use async_trait::async_trait;
use rdkafka::producer::FutureProducer;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::consumer;
use crate::error::{Error, Result};
use crate::event::EventHandler;
use crate::metadata::KafkaMetadata;
use crate::producer;
use crate::retry::ConsumeRetry;

/// Operations a Kafka binding needs from the client component.
#[async_trait]
pub trait KafkaClient: Send + Sync {
    /// Parse component properties and prepare the producer.
    fn init(&mut self, properties: &HashMap<String, String>) -> Result<()>;

    /// Publish one message and wait for the broker to acknowledge it.
    async fn publish(
        &self,
        topic: &str,
        data: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<()>;

    /// Route events from `topic` to `handler`. A later registration for the
    /// same topic replaces the earlier one.
    async fn add_topic_handler(&self, topic: &str, handler: EventHandler);

    /// Subscribe to every topic with a handler and start consuming in the
    /// background. Returns once the subscription is in place; consumption
    /// stops when `cancel` fires.
    async fn subscribe(&self, cancel: CancellationToken) -> Result<()>;

    /// Wait for consumption started by `subscribe` to finish, including any
    /// handler call in flight. Only returns once the subscription token has
    /// been cancelled.
    async fn close(&self) {}
}

/// rdkafka backed [`KafkaClient`].
pub struct Kafka {
    metadata: Option<KafkaMetadata>,
    producer: Option<FutureProducer>,
    handlers: RwLock<HashMap<String, EventHandler>>,
    consumers: TaskTracker,
    /// Used when the `consumeRetryEnabled` property is not set. Must be set
    /// before `init`.
    pub default_consume_retry_enabled: bool,
}

impl Default for Kafka {
    fn default() -> Self {
        Self::new()
    }
}

impl Kafka {
    pub fn new() -> Self {
        Self {
            metadata: None,
            producer: None,
            handlers: RwLock::new(HashMap::new()),
            consumers: TaskTracker::new(),
            default_consume_retry_enabled: true,
        }
    }

    /// Parsed metadata, once initialized.
    pub fn metadata(&self) -> Option<&KafkaMetadata> {
        self.metadata.as_ref()
    }

    fn initialized(&self) -> Result<(&KafkaMetadata, &FutureProducer)> {
        match (&self.metadata, &self.producer) {
            (Some(metadata), Some(producer)) => Ok((metadata, producer)),
            _ => Err(Error::NotInitialized),
        }
    }
}

#[async_trait]
impl KafkaClient for Kafka {
    fn init(&mut self, properties: &HashMap<String, String>) -> Result<()> {
        let metadata =
            KafkaMetadata::from_properties(properties, self.default_consume_retry_enabled)?;

        let producer: FutureProducer = metadata.producer_config().create()?;

        info!(
            brokers = %metadata.brokers.join(","),
            client_id = %metadata.client_id,
            security_protocol = metadata.security_protocol(),
            "Kafka client initialized"
        );

        self.metadata = Some(metadata);
        self.producer = Some(producer);
        Ok(())
    }

    async fn publish(
        &self,
        topic: &str,
        data: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<()> {
        let (_, producer) = self.initialized()?;
        producer::send(producer, topic, data, metadata).await
    }

    async fn add_topic_handler(&self, topic: &str, handler: EventHandler) {
        self.handlers.write().await.insert(topic.to_string(), handler);
    }

    async fn subscribe(&self, cancel: CancellationToken) -> Result<()> {
        let (metadata, _) = self.initialized()?;
        let group_id = metadata
            .consumer_group
            .as_deref()
            .ok_or(Error::MissingConsumerGroup)?;

        // Handlers registered after this point are not picked up
        let handlers = self.handlers.read().await.clone();
        let consumer = consumer::subscribe(metadata, group_id, &handlers)?;

        let retry = ConsumeRetry {
            enabled: metadata.consume_retry_enabled,
            interval: metadata.consume_retry_interval,
        };
        self.consumers.spawn(consumer::run(consumer, handlers, retry, cancel));

        Ok(())
    }

    async fn close(&self) {
        self.consumers.close();
        self.consumers.wait().await;
        self.consumers.reopen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::event_handler;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_publish_before_init() {
        let kafka = Kafka::new();
        let err = kafka
            .publish("orders", b"{}", &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }

    #[test]
    fn test_init_fails_without_brokers() {
        let mut kafka = Kafka::new();
        let err = kafka.init(&props(&[("topics", "orders")])).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata { .. }));
        assert!(kafka.metadata().is_none());
    }

    #[test]
    fn test_init_applies_default_consume_retry() {
        let mut kafka = Kafka::new();
        kafka.default_consume_retry_enabled = false;
        kafka.init(&props(&[("brokers", "localhost:9092")])).unwrap();

        assert!(!kafka.metadata().unwrap().consume_retry_enabled);
    }

    #[tokio::test]
    async fn test_publish_requires_topic() {
        let mut kafka = Kafka::new();
        kafka.init(&props(&[("brokers", "localhost:9092")])).unwrap();

        let err = kafka.publish("", b"{}", &HashMap::new()).await.unwrap_err();
        assert!(matches!(err, Error::MissingTopic));
    }

    #[tokio::test]
    async fn test_subscribe_requires_consumer_group() {
        let mut kafka = Kafka::new();
        kafka.init(&props(&[("brokers", "localhost:9092")])).unwrap();
        kafka
            .add_topic_handler("orders", event_handler(|_event| async { Ok(()) }))
            .await;

        let err = kafka.subscribe(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, Error::MissingConsumerGroup));
    }

    #[tokio::test]
    async fn test_subscribe_requires_handlers() {
        let mut kafka = Kafka::new();
        kafka
            .init(&props(&[
                ("brokers", "localhost:9092"),
                ("consumerGroup", "group-1"),
            ]))
            .unwrap();

        let err = kafka.subscribe(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, Error::NoTopicHandlers));
    }

    #[tokio::test]
    async fn test_subscribe_rejects_empty_topic() {
        let mut kafka = Kafka::new();
        kafka
            .init(&props(&[
                ("brokers", "localhost:9092"),
                ("consumerGroup", "group-1"),
            ]))
            .unwrap();
        kafka
            .add_topic_handler("", event_handler(|_event| async { Ok(()) }))
            .await;

        let err = kafka.subscribe(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, Error::MissingTopic));
    }

    #[tokio::test]
    async fn test_close_waits_for_running_consumer() {
        let kafka = Kafka::new();
        let finished = Arc::new(AtomicBool::new(false));
        {
            let finished = Arc::clone(&finished);
            kafka.consumers.spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                finished.store(true, Ordering::SeqCst);
            });
        }

        kafka.close().await;

        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_close_without_subscription() {
        let kafka = Kafka::new();

        tokio::time::timeout(Duration::from_secs(5), kafka.close())
            .await
            .expect("close blocked with nothing running");
    }
}
