//! The Kafka binding's own spec metadata, compiled into the binary.

use bindings::SpecYaml;

/// `spec/spec.yaml`, embedded at build time and never modified.
pub static KAFKA_SPEC_YAML: SpecYaml = SpecYaml(include_bytes!("../spec/spec.yaml"));

#[cfg(test)]
mod tests {
    use super::*;
    use bindings::spec::{BindingDirection, SupportLevel};

    #[test]
    fn test_embedded_spec_parses() {
        let spec = KAFKA_SPEC_YAML.parse().unwrap();

        assert_eq!(spec.name, "kafka");
        assert!(spec.supports(BindingDirection::Input));
        assert!(spec.supports(BindingDirection::Output));

        let operations: Vec<&str> = spec.operations.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(operations, vec!["create", "metadata"]);
    }

    #[test]
    fn test_embedded_spec_covers_binding_properties() {
        let spec = KAFKA_SPEC_YAML.parse().unwrap();

        let publish_topic = spec.connection_field("publishTopic").unwrap();
        assert_eq!(publish_topic.binding_support.input, SupportLevel::Unsupported);
        assert_eq!(publish_topic.binding_support.output, SupportLevel::Required);

        let topics = spec.connection_field("topics").unwrap();
        assert_eq!(topics.binding_support.input, SupportLevel::Required);

        for property in [
            kafka_client::metadata::BROKERS,
            kafka_client::metadata::CONSUMER_GROUP,
            kafka_client::metadata::AUTH_TYPE,
            kafka_client::metadata::CONSUME_RETRY_ENABLED,
            kafka_client::metadata::SKIP_VERIFY,
        ] {
            assert!(
                spec.connection_field(property).is_some(),
                "{property} missing from spec.yaml"
            );
        }
    }
}
