//! Component metadata: the property bag a Kafka client is initialized with.
//!
//! Property names follow the binding's `spec.yaml` (camelCase). Everything
//! is validated up front so that a bad value fails `init` instead of the
//! first publish or subscribe.

use rdkafka::config::ClientConfig;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{Error, Result};

pub const BROKERS: &str = "brokers";
pub const CONSUMER_GROUP: &str = "consumerGroup";
pub const CLIENT_ID: &str = "clientID";
pub const AUTH_TYPE: &str = "authType";
pub const AUTH_REQUIRED: &str = "authRequired";
pub const SASL_USERNAME: &str = "saslUsername";
pub const SASL_PASSWORD: &str = "saslPassword";
pub const SASL_MECHANISM: &str = "saslMechanism";
pub const INITIAL_OFFSET: &str = "initialOffset";
pub const MAX_MESSAGE_BYTES: &str = "maxMessageBytes";
pub const CONSUME_RETRY_ENABLED: &str = "consumeRetryEnabled";
pub const CONSUME_RETRY_INTERVAL: &str = "consumeRetryInterval";
pub const DISABLE_TLS: &str = "disableTls";
pub const CA_CERT: &str = "caCert";
pub const CLIENT_CERT: &str = "clientCert";
pub const CLIENT_KEY: &str = "clientKey";
pub const SKIP_VERIFY: &str = "skipVerify";

const DEFAULT_CLIENT_ID: &str = "kafka-binding";
const DEFAULT_CONSUME_RETRY_INTERVAL: Duration = Duration::from_millis(100);
const SESSION_TIMEOUT_MS: &str = "6000";

/// How the client authenticates against the brokers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    Password {
        username: String,
        password: String,
        mechanism: SaslMechanism,
    },
    /// Mutual TLS with `clientCert`/`clientKey`
    Mtls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaslMechanism {
    Plain,
    ScramSha256,
    ScramSha512,
}

impl SaslMechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaslMechanism::Plain => "PLAIN",
            SaslMechanism::ScramSha256 => "SCRAM-SHA-256",
            SaslMechanism::ScramSha512 => "SCRAM-SHA-512",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "PLAIN" => Ok(SaslMechanism::Plain),
            "SCRAM-SHA-256" | "SHA-256" => Ok(SaslMechanism::ScramSha256),
            "SCRAM-SHA-512" | "SHA-512" => Ok(SaslMechanism::ScramSha512),
            other => Err(Error::invalid(
                SASL_MECHANISM,
                format!("unknown mechanism '{other}', expected PLAIN, SCRAM-SHA-256 or SCRAM-SHA-512"),
            )),
        }
    }
}

/// Where a new consumer group starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialOffset {
    Newest,
    Oldest,
}

impl InitialOffset {
    /// Value for librdkafka's `auto.offset.reset`.
    pub fn auto_offset_reset(&self) -> &'static str {
        match self {
            InitialOffset::Newest => "latest",
            InitialOffset::Oldest => "earliest",
        }
    }
}

/// TLS material. Certificates are PEM strings, not paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    pub disabled: bool,
    pub ca_cert: Option<String>,
    pub client_cert: Option<String>,
    pub client_key: Option<String>,
    pub skip_verify: bool,
}

/// Parsed Kafka component metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaMetadata {
    pub brokers: Vec<String>,
    pub consumer_group: Option<String>,
    pub client_id: String,
    pub auth: Auth,
    pub initial_offset: InitialOffset,
    pub max_message_bytes: Option<usize>,
    pub consume_retry_enabled: bool,
    pub consume_retry_interval: Duration,
    pub tls: TlsConfig,
}

impl KafkaMetadata {
    /// Parse component properties.
    ///
    /// `default_consume_retry_enabled` applies when `consumeRetryEnabled` is
    /// not set; bindings and pubsub components pick different defaults.
    pub fn from_properties(
        properties: &HashMap<String, String>,
        default_consume_retry_enabled: bool,
    ) -> Result<Self> {
        let get = |key: &str| {
            properties
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let brokers: Vec<String> = get(BROKERS)
            .ok_or_else(|| Error::invalid(BROKERS, "at least one broker is required"))?
            .split(',')
            .map(str::trim)
            .filter(|broker| !broker.is_empty())
            .map(str::to_string)
            .collect();
        if brokers.is_empty() {
            return Err(Error::invalid(BROKERS, "at least one broker is required"));
        }

        let tls = TlsConfig {
            disabled: parse_bool(DISABLE_TLS, get(DISABLE_TLS))?.unwrap_or(false),
            ca_cert: get(CA_CERT).map(str::to_string),
            client_cert: get(CLIENT_CERT).map(str::to_string),
            client_key: get(CLIENT_KEY).map(str::to_string),
            skip_verify: parse_bool(SKIP_VERIFY, get(SKIP_VERIFY))?.unwrap_or(false),
        };

        let auth_type = match get(AUTH_TYPE) {
            Some(auth_type) => auth_type.to_ascii_lowercase(),
            // Older manifests only carry authRequired
            None if parse_bool(AUTH_REQUIRED, get(AUTH_REQUIRED))?.unwrap_or(false) => {
                "password".to_string()
            }
            None => "none".to_string(),
        };

        let auth = match auth_type.as_str() {
            "none" => Auth::None,
            "password" => Auth::Password {
                username: get(SASL_USERNAME)
                    .ok_or_else(|| Error::invalid(SASL_USERNAME, "required for password auth"))?
                    .to_string(),
                password: get(SASL_PASSWORD)
                    .ok_or_else(|| Error::invalid(SASL_PASSWORD, "required for password auth"))?
                    .to_string(),
                mechanism: get(SASL_MECHANISM)
                    .map(SaslMechanism::parse)
                    .transpose()?
                    .unwrap_or(SaslMechanism::Plain),
            },
            "mtls" => {
                if tls.disabled {
                    return Err(Error::invalid(DISABLE_TLS, "cannot disable TLS with mtls auth"));
                }
                if tls.client_cert.is_none() {
                    return Err(Error::invalid(CLIENT_CERT, "required for mtls auth"));
                }
                if tls.client_key.is_none() {
                    return Err(Error::invalid(CLIENT_KEY, "required for mtls auth"));
                }
                Auth::Mtls
            }
            other => {
                return Err(Error::invalid(
                    AUTH_TYPE,
                    format!("unknown auth type '{other}', expected none, password or mtls"),
                ))
            }
        };

        let initial_offset = match get(INITIAL_OFFSET).map(str::to_ascii_lowercase).as_deref() {
            None | Some("newest") => InitialOffset::Newest,
            Some("oldest") => InitialOffset::Oldest,
            Some(other) => {
                return Err(Error::invalid(
                    INITIAL_OFFSET,
                    format!("unknown offset '{other}', expected newest or oldest"),
                ))
            }
        };

        let max_message_bytes = get(MAX_MESSAGE_BYTES)
            .map(|value| {
                value
                    .parse::<usize>()
                    .map_err(|e| Error::invalid(MAX_MESSAGE_BYTES, e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            brokers,
            consumer_group: get(CONSUMER_GROUP).map(str::to_string),
            client_id: get(CLIENT_ID).unwrap_or(DEFAULT_CLIENT_ID).to_string(),
            auth,
            initial_offset,
            max_message_bytes,
            consume_retry_enabled: parse_bool(
                CONSUME_RETRY_ENABLED,
                get(CONSUME_RETRY_ENABLED),
            )?
            .unwrap_or(default_consume_retry_enabled),
            consume_retry_interval: get(CONSUME_RETRY_INTERVAL)
                .map(|value| parse_interval(CONSUME_RETRY_INTERVAL, value))
                .transpose()?
                .unwrap_or(DEFAULT_CONSUME_RETRY_INTERVAL),
            tls,
        })
    }

    /// librdkafka `security.protocol` for this auth/TLS combination.
    pub fn security_protocol(&self) -> &'static str {
        match self.auth {
            Auth::Mtls => "ssl",
            Auth::Password { .. } if self.tls.disabled => "sasl_plaintext",
            Auth::Password { .. } => "sasl_ssl",
            Auth::None if !self.tls.disabled && self.tls.ca_cert.is_some() => "ssl",
            Auth::None => "plaintext",
        }
    }

    /// Settings shared by the producer and the consumer.
    fn base_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.brokers.join(","))
            .set("client.id", &self.client_id)
            .set("security.protocol", self.security_protocol());

        if let Auth::Password {
            username,
            password,
            mechanism,
        } = &self.auth
        {
            config
                .set("sasl.mechanism", mechanism.as_str())
                .set("sasl.username", username)
                .set("sasl.password", password);
        }

        if self.security_protocol().contains("ssl") {
            if let Some(ca_cert) = &self.tls.ca_cert {
                config.set("ssl.ca.pem", ca_cert);
            }
            if let Some(client_cert) = &self.tls.client_cert {
                config.set("ssl.certificate.pem", client_cert);
            }
            if let Some(client_key) = &self.tls.client_key {
                config.set("ssl.key.pem", client_key);
            }
            if self.tls.skip_verify {
                config
                    .set("enable.ssl.certificate.verification", "false")
                    .set("ssl.endpoint.identification.algorithm", "none");
            }
        }

        config
    }

    pub fn producer_config(&self) -> ClientConfig {
        let mut config = self.base_config();
        if let Some(max) = self.max_message_bytes {
            config.set("message.max.bytes", max.to_string());
        }
        config
    }

    /// Consumer settings. Offsets are stored by hand once a handler finishes
    /// and committed in the background.
    pub fn consumer_config(&self, group_id: &str) -> ClientConfig {
        let mut config = self.base_config();
        config
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("enable.auto.offset.store", "false")
            .set("auto.offset.reset", self.initial_offset.auto_offset_reset())
            .set("session.timeout.ms", SESSION_TIMEOUT_MS)
            .set("enable.partition.eof", "false");
        config
    }
}

fn parse_bool(property: &str, value: Option<&str>) -> Result<Option<bool>> {
    value
        .map(|value| match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(Error::invalid(property, format!("'{other}' is not a boolean"))),
        })
        .transpose()
}

/// Parse an interval like "250ms", "2s", "1m" or a bare number of milliseconds.
fn parse_interval(property: &str, value: &str) -> Result<Duration> {
    let invalid = || Error::invalid(property, format!("'{value}' is not a valid interval"));

    if let Some(ms) = value.strip_suffix("ms") {
        return ms.trim().parse().map(Duration::from_millis).map_err(|_| invalid());
    }
    if let Some(secs) = value.strip_suffix('s') {
        return secs.trim().parse().map(Duration::from_secs).map_err(|_| invalid());
    }
    if let Some(mins) = value.strip_suffix('m') {
        return mins
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|mins| mins.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or_else(invalid);
    }
    value.parse().map(Duration::from_millis).map_err(|_| invalid())
}
