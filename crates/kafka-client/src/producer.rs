use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Metadata keys that select the message key instead of becoming headers.
/// The first one present wins.
pub const KEY_PROPERTIES: [&str; 2] = ["partitionKey", "key"];

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Split publish metadata into the message key and the remaining headers.
///
/// Headers are sorted by name so the wire order does not depend on map
/// iteration order.
pub fn split_publish_metadata(
    metadata: &HashMap<String, String>,
) -> (Option<&str>, Vec<(&str, &str)>) {
    let key_property = KEY_PROPERTIES
        .into_iter()
        .find(|property| metadata.contains_key(*property));

    let key = key_property.and_then(|property| metadata.get(property).map(String::as_str));

    let mut headers: Vec<(&str, &str)> = metadata
        .iter()
        .filter(|(name, _)| Some(name.as_str()) != key_property)
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    headers.sort_unstable();

    (key, headers)
}

/// Send one message and wait for the broker acknowledgement.
pub async fn send(
    producer: &FutureProducer,
    topic: &str,
    data: &[u8],
    metadata: &HashMap<String, String>,
) -> Result<()> {
    if topic.is_empty() {
        return Err(Error::MissingTopic);
    }

    let (key, header_pairs) = split_publish_metadata(metadata);

    let mut headers = OwnedHeaders::new_with_capacity(header_pairs.len());
    for (name, value) in header_pairs {
        headers = headers.insert(Header {
            key: name,
            value: Some(value),
        });
    }

    let record: FutureRecord<'_, str, [u8]> = FutureRecord {
        topic,
        partition: None,
        payload: Some(data),
        key,
        timestamp: None,
        headers: Some(headers),
    };

    producer
        .send(record, SEND_TIMEOUT)
        .await
        .map_err(|(source, _)| Error::Publish {
            topic: topic.to_string(),
            source,
        })?;

    debug!(topic, keyed = key.is_some(), bytes = data.len(), "Published message");
    Ok(())
}
