use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Invalid metadata '{property}': {message}")]
    InvalidMetadata { property: String, message: String },

    #[error("Kafka client is not initialized")]
    NotInitialized,

    #[error("Topic is empty or not configured")]
    MissingTopic,

    #[error("No topic handlers registered, nothing to subscribe to")]
    NoTopicHandlers,

    #[error("consumerGroup is required to subscribe")]
    MissingConsumerGroup,

    #[error("Failed to publish to topic '{topic}': {source}")]
    Publish {
        topic: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    #[error("Consumer error: {0}")]
    Consumer(String),
}

impl Error {
    pub(crate) fn invalid(property: &str, message: impl Into<String>) -> Self {
        Error::InvalidMetadata {
            property: property.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
