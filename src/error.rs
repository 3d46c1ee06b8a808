use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Binding(#[from] bindings::Error),

    #[error(transparent)]
    Kafka(#[from] kafka_client::Error),

    #[error("Failed to listen for termination signals: {0}")]
    Signal(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
