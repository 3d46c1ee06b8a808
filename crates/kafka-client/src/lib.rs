//! Kafka client component for kafka-binding.
//!
//! Bindings delegate all Kafka work to this crate:
//!
//! - Metadata: parse and validate the component property bag (brokers,
//!   consumer group, SASL/mTLS auth, initial offset, consume retry)
//! - Publishing: one message per call, with the `partitionKey` metadata entry
//!   as message key and everything else as headers
//! - Subscribing: one consumer in the configured group, per-topic handlers,
//!   offsets stored after each handler finishes
//!
//! Bindings talk to the component through the [`KafkaClient`] trait so they
//! can be tested without a broker.

/// [`KafkaClient`] trait and the rdkafka backed [`Kafka`] implementation
pub mod client;

/// Consumer group subscription and the receive/dispatch loop
pub mod consumer;
pub mod error;
pub mod event;
pub mod metadata;
pub mod producer;
pub mod retry;

pub use client::{Kafka, KafkaClient};
pub use error::{Error, Result};
pub use event::{event_handler, Event, EventHandler};
pub use metadata::KafkaMetadata;
pub use retry::ConsumeRetry;
