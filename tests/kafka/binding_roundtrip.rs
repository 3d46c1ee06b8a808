//! Publish through one binding, consume through another.
//!
//! Test flow:
//! 1. Create a fresh topic
//! 2. Invoke `create` on an output binding with a key and a header
//! 3. Run `read` on an input binding reading from the oldest offset
//! 4. Verify the delivered event, then cancel the input binding

use bindings::{
    handler_fn, Binding, InputBinding, InvokeRequest, Metadata, OperationKind, OutputBinding,
    ReadResponse,
};
use kafka_binding::KafkaBinding;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn brokers() -> String {
    std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string())
}

fn test_id() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

async fn create_topic(brokers: &str, topic: &str) -> anyhow::Result<()> {
    let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .create()?;
    let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));
    for result in admin
        .create_topics(&[NewTopic::new(topic, 1, TopicReplication::Fixed(1))], &opts)
        .await?
    {
        if let Err((name, err)) = result {
            anyhow::bail!("Failed to create topic {name}: {err}");
        }
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires a Kafka broker at KAFKA_BROKERS"]
async fn test_publish_then_read() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("kafka_binding=debug,kafka_client=debug")
        .try_init()
        .ok();

    let brokers = brokers();
    let id = test_id();
    let topic = format!("test-orders-{id}");
    create_topic(&brokers, &topic).await?;

    // Output side
    let mut output = KafkaBinding::new();
    output
        .init(
            Metadata::new("orders-out")
                .with_property("brokers", brokers.as_str())
                .with_property("publishTopic", topic.as_str()),
        )
        .await?;
    let response = output
        .invoke(
            InvokeRequest::new(OperationKind::Create, "{\"id\":1}")
                .with_metadata("partitionKey", "order-1")
                .with_metadata("traceparent", "00-abc-def-01"),
        )
        .await?;
    assert_eq!(response, None);

    // Input side
    let mut input = KafkaBinding::new();
    input
        .init(
            Metadata::new("orders-in")
                .with_property("brokers", brokers.as_str())
                .with_property("topics", topic.as_str())
                .with_property("consumerGroup", format!("test-group-{id}"))
                .with_property("initialOffset", "oldest"),
        )
        .await?;
    let input = Arc::new(input);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler = handler_fn(move |response: ReadResponse| {
        let tx = tx.clone();
        async move {
            tx.send(response)?;
            Ok(None)
        }
    });

    let shutdown = CancellationToken::new();
    let task = {
        let input = Arc::clone(&input);
        let shutdown = shutdown.clone();
        tokio::spawn(async move { input.read(handler, shutdown).await })
    };

    let event = tokio::time::timeout(Duration::from_secs(30), rx.recv())
        .await?
        .expect("handler channel closed");

    assert_eq!(event.data, b"{\"id\":1}");
    assert_eq!(event.metadata["__key"], "order-1");
    assert_eq!(event.metadata["__topic"], topic);
    assert_eq!(event.metadata["traceparent"], "00-abc-def-01");
    assert!(!event.metadata.contains_key("partitionKey"));

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(10), task).await???;
    Ok(())
}
