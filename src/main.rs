//! Command-line interface for kafka-binding
//!
//! # Usage Examples
//!
//! ```bash
//! # Print the binding's metadata document as JSON
//! kafka-binding metadata
//!
//! # Publish a payload to the component's publishTopic
//! kafka-binding --component component.yaml publish \
//!   --data '{"id":1}' --meta partitionKey=order-1
//!
//! # Publish stdin
//! cat order.json | kafka-binding --component component.yaml publish
//!
//! # Consume the component's topics, one JSON line per message
//! kafka-binding --component component.yaml --property consumerGroup=group1 read
//! ```
//!
//! Log output is controlled with `RUST_LOG` (e.g. `RUST_LOG=kafka_binding=debug`).

use anyhow::Context;
use bindings::{
    handler_fn, Binding, InputBinding, InvokeRequest, OperationKind, OutputBinding, ReadResponse,
};
use clap::{Parser, Subcommand};
use kafka_binding::config::parse_key_val;
use kafka_binding::{ComponentOpts, KafkaBinding};
use std::io::Write;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "kafka-binding")]
#[command(about = "Publish to and consume from Kafka through the binding contract")]
#[command(long_about = None)]
struct Cli {
    /// Component configuration
    #[command(flatten)]
    component: ComponentOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the binding's metadata document as JSON
    Metadata,

    /// Publish one message to the configured publishTopic (create operation)
    Publish {
        /// Message payload; read from stdin when omitted
        #[arg(long)]
        data: Option<String>,

        /// Request metadata (format: name=value); partitionKey or key sets the message key
        #[arg(long = "meta", value_name = "NAME=VALUE", value_parser = parse_key_val)]
        metadata: Vec<(String, String)>,
    },

    /// Consume the configured topics and print each message as a JSON line
    Read,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Metadata => {
            // Describing the binding needs no broker
            let binding = KafkaBinding::new();
            let response = binding
                .invoke(InvokeRequest::new(OperationKind::Metadata, Vec::new()))
                .await?
                .context("Metadata operation returned no response")?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&response.data)?;
            writeln!(stdout)?;
        }
        Commands::Publish { data, metadata } => {
            let binding = init_binding(&cli.component).await?;

            let data = match data {
                Some(data) => data.into_bytes(),
                None => {
                    let mut buf = Vec::new();
                    tokio::io::stdin()
                        .read_to_end(&mut buf)
                        .await
                        .context("Failed to read payload from stdin")?;
                    buf
                }
            };

            let mut request = InvokeRequest::new(OperationKind::Create, data);
            request.metadata.extend(metadata);
            binding
                .invoke(request)
                .await
                .with_context(|| match binding.publish_topic() {
                    Some(topic) => format!("Failed to publish to {topic}"),
                    None => "Failed to publish: publishTopic is not set".to_string(),
                })?;
            info!(topic = ?binding.publish_topic(), "Message published");
        }
        Commands::Read => {
            let binding = init_binding(&cli.component).await?;

            let handler = handler_fn(|response: ReadResponse| async move {
                let line = serde_json::json!({
                    "data": String::from_utf8_lossy(&response.data),
                    "metadata": response.metadata,
                    "contentType": response.content_type,
                });
                println!("{line}");
                Ok(None)
            });

            binding
                .read(handler, CancellationToken::new())
                .await
                .context("Kafka input binding failed")?;
        }
    }

    Ok(())
}

async fn init_binding(opts: &ComponentOpts) -> anyhow::Result<KafkaBinding> {
    let metadata = opts.load_metadata()?;
    let mut binding = KafkaBinding::new();
    binding
        .init(metadata)
        .await
        .context("Failed to initialize Kafka binding")?;
    Ok(binding)
}
