//! Kafka input/output binding.
//!
//! The binding owns no Kafka logic. It reads two properties of its own
//! (`publishTopic`, `topics`), hands the whole property bag to a
//! [`KafkaClient`], and translates between the generic binding contract and
//! the client's calls.

use async_trait::async_trait;
use bindings::{
    Binding, Handler, InputBinding, InvokeRequest, InvokeResponse, Metadata, OperationKind,
    OutputBinding, ReadResponse, SpecYaml,
};
use futures::FutureExt;
use kafka_client::{Event, EventHandler, Kafka, KafkaClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::signal::TerminationSignals;
use crate::spec::KAFKA_SPEC_YAML;

/// Property naming the single output topic.
pub const PUBLISH_TOPIC: &str = "publishTopic";
/// Property holding the comma-separated input topics.
pub const TOPICS: &str = "topics";

pub struct KafkaBinding<C = Kafka> {
    kafka: C,
    publish_topic: Option<String>,
    topics: Vec<String>,
    spec: SpecYaml,
}

impl KafkaBinding<Kafka> {
    /// Binding over the rdkafka client, with consumer retry off unless the
    /// component asks for it.
    pub fn new() -> Self {
        let mut kafka = Kafka::new();
        kafka.default_consume_retry_enabled = false;
        Self::with_client(kafka)
    }
}

impl Default for KafkaBinding<Kafka> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: KafkaClient> KafkaBinding<C> {
    pub fn with_client(kafka: C) -> Self {
        Self {
            kafka,
            publish_topic: None,
            topics: Vec::new(),
            spec: KAFKA_SPEC_YAML,
        }
    }

    /// Replace the document returned by the `metadata` operation.
    pub fn with_spec(mut self, spec: SpecYaml) -> Self {
        self.spec = spec;
        self
    }

    pub fn publish_topic(&self) -> Option<&str> {
        self.publish_topic.as_deref()
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn client(&self) -> &C {
        &self.kafka
    }
}

#[async_trait]
impl<C: KafkaClient> Binding for KafkaBinding<C> {
    type Error = Error;

    async fn init(&mut self, metadata: Metadata) -> Result<()> {
        self.kafka.init(&metadata.properties)?;

        self.publish_topic = metadata.property(PUBLISH_TOPIC).map(str::to_string);
        // Empty segments are kept; the client decides what to do with them
        self.topics = metadata
            .property(TOPICS)
            .map(|topics| topics.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        debug!(
            name = %metadata.name,
            publish_topic = ?self.publish_topic,
            topics = ?self.topics,
            "Kafka binding initialized"
        );
        Ok(())
    }
}

#[async_trait]
impl<C: KafkaClient> OutputBinding for KafkaBinding<C> {
    fn operations(&self) -> Vec<OperationKind> {
        vec![OperationKind::Create, OperationKind::Metadata]
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<Option<InvokeResponse>> {
        match request.operation {
            OperationKind::Create => {
                let topic = self.publish_topic.as_deref().unwrap_or_default();
                self.kafka
                    .publish(topic, &request.data, &request.metadata)
                    .await?;
                Ok(None)
            }
            OperationKind::Metadata => {
                let spec = self.spec.parse()?;
                Ok(Some(InvokeResponse::json(spec.to_json()?)))
            }
            other => Err(bindings::Error::UnsupportedOperation(other).into()),
        }
    }
}

#[async_trait]
impl<C: KafkaClient> InputBinding for KafkaBinding<C> {
    async fn read(&self, handler: Handler, shutdown: CancellationToken) -> Result<()> {
        if self.topics.is_empty() {
            warn!("kafka binding: no topic defined, input bindings will not be started");
            return Ok(());
        }

        // Listen before subscribing so an early signal is not lost
        let mut signals = TerminationSignals::register().map_err(Error::Signal)?;

        let adapted = adapt_handler(handler);
        for topic in &self.topics {
            self.kafka.add_topic_handler(topic, Arc::clone(&adapted)).await;
        }

        let subscription = shutdown.child_token();
        self.kafka.subscribe(subscription.clone()).await?;
        info!(topics = ?self.topics, "Kafka input binding started");

        tokio::select! {
            signal = signals.recv() => {
                info!(%signal, "Received termination signal, stopping Kafka input binding");
            }
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, stopping Kafka input binding");
            }
        }

        subscription.cancel();
        self.kafka.close().await;
        Ok(())
    }
}

/// Wrap a host handler so the Kafka client can call it. The event is passed
/// through unchanged; the host's reply bytes are dropped.
fn adapt_handler(handler: Handler) -> EventHandler {
    Arc::new(move |event: Event| {
        let reply = handler(ReadResponse {
            data: event.data,
            metadata: event.metadata,
            content_type: event.content_type,
        });
        async move { reply.await.map(|_| ()) }.boxed()
    })
}
