//! Kafka binding E2E tests
//!
//! These need a running broker and are ignored by default. Point
//! `KAFKA_BROKERS` at one and run with `cargo test --test kafka -- --ignored`.

mod binding_roundtrip;
