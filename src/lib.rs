//! Kafka input/output binding
//!
//! Bridges a host that speaks the generic binding contract (see the
//! `bindings` crate) to a Kafka cluster through the `kafka-client`
//! component.
//!
//! - Output: the `create` operation publishes the request payload to the
//!   configured `publishTopic`; the `metadata` operation returns the
//!   binding's own spec document as JSON.
//! - Input: `read` subscribes to the comma-separated `topics` and forwards
//!   every received message to the host handler until a termination signal
//!   arrives or the host cancels.
//!
//! # CLI Usage
//!
//! ```bash
//! # Describe the binding
//! kafka-binding metadata
//!
//! # Publish one message
//! kafka-binding --component component.yaml publish --data '{"id":1}' --meta partitionKey=order-1
//!
//! # Consume until SIGINT/SIGTERM
//! kafka-binding --property brokers=localhost:9092 --property topics=orders \
//!   --property consumerGroup=group1 read
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod signal;
pub mod spec;

pub use binding::KafkaBinding;
pub use config::ComponentOpts;
pub use error::{Error, Result};
pub use signal::{TerminationSignal, TerminationSignals};
pub use spec::KAFKA_SPEC_YAML;
