use rdkafka::consumer::{Consumer as RdkafkaConsumer, StreamConsumer as RdkafkaStreamConsumer};
use rdkafka::message::Message as RdkafkaMessage;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::event::{Event, EventHandler};
use crate::metadata::KafkaMetadata;
use crate::retry::ConsumeRetry;

/// Create a consumer in `group_id` and subscribe it to every topic that has
/// a handler.
pub fn subscribe(
    metadata: &KafkaMetadata,
    group_id: &str,
    handlers: &HashMap<String, EventHandler>,
) -> Result<RdkafkaStreamConsumer> {
    if handlers.is_empty() {
        return Err(Error::NoTopicHandlers);
    }
    let mut topics: Vec<&str> = handlers.keys().map(String::as_str).collect();
    if topics.iter().any(|topic| topic.is_empty()) {
        return Err(Error::MissingTopic);
    }
    topics.sort_unstable();

    let consumer: RdkafkaStreamConsumer = metadata
        .consumer_config(group_id)
        .create()
        .map_err(|e| Error::Consumer(format!("Failed to create consumer: {e}")))?;

    consumer
        .subscribe(&topics)
        .map_err(|e| Error::Consumer(format!("Failed to subscribe to topics: {e}")))?;

    info!(group_id, topics = ?topics, "Subscribed to Kafka topics");
    Ok(consumer)
}

/// Receive messages until `cancel` fires, dispatching each to its topic's
/// handler.
///
/// The offset of a message is stored once its handler has finished, whether
/// it succeeded or not, so a failing message never blocks its partition.
/// With retry enabled the handler only finishes unsuccessfully when the
/// subscription is cancelled.
pub async fn run(
    consumer: RdkafkaStreamConsumer,
    handlers: HashMap<String, EventHandler>,
    retry: ConsumeRetry,
    cancel: CancellationToken,
) {
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = consumer.recv() => received,
        };

        let message = match received {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Error receiving Kafka message");
                continue;
            }
        };

        let Some(handler) = handlers.get(message.topic()) else {
            warn!(topic = message.topic(), "No handler for topic, skipping message");
            continue;
        };

        let event = Event::from_message(&message);
        debug!(
            topic = message.topic(),
            partition = message.partition(),
            offset = message.offset(),
            "Dispatching Kafka message"
        );

        if let Err(e) = retry.deliver(handler, event, &cancel).await {
            error!(
                topic = message.topic(),
                partition = message.partition(),
                offset = message.offset(),
                error = %e,
                "Handler failed to process message"
            );
            if cancel.is_cancelled() {
                // Leave the offset unstored so the message is redelivered
                break;
            }
        }

        if let Err(e) = consumer.store_offset_from_message(&message) {
            warn!(error = %e, "Failed to store offset");
        }
    }

    info!("Kafka consumer stopped");
}
