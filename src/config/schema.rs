//! Configuration structs for the backend checks.
//!
//! One struct per backend, plain data with defaults. These deliberately do
//! not derive `Serialize`: they carry credentials, and nothing in the crate
//! needs to emit them.

use std::time::Duration;

/// Default per-check timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the HTTP check.
#[cfg(feature = "http-check")]
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// URL to request. Must use an `http` or `https` scheme.
    pub url: String,

    /// Optional basic-auth username.
    pub username: Option<String>,

    /// Optional basic-auth password.
    pub password: Option<String>,

    /// Verify TLS certificates.
    pub verify_ssl: bool,

    /// Follow redirects.
    pub follow_redirects: bool,

    /// Reject URLs whose host is (or resolves to) localhost or a private
    /// address. Guards health checks built from untrusted configuration.
    pub block_private_hosts: bool,

    /// Round-trip timeout.
    pub timeout: Duration,
}

#[cfg(feature = "http-check")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            password: None,
            verify_ssl: true,
            follow_redirects: true,
            block_private_hosts: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for the Redis check.
#[cfg(feature = "redis")]
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to.
    pub port: u16,

    /// Database index.
    pub database: i64,

    /// Optional username.
    pub user: Option<String>,

    /// Optional password.
    pub password: Option<String>,

    /// Connect over TLS.
    pub ssl: bool,

    /// Round-trip timeout.
    pub timeout: Duration,
}

#[cfg(feature = "redis")]
impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            database: 0,
            user: None,
            password: None,
            ssl: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// libpq-style TLS mode for PostgreSQL connections.
#[cfg(feature = "postgres")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    /// No TLS.
    #[default]
    Disable,
    /// Prefer plaintext, allow TLS.
    Allow,
    /// Prefer TLS, allow plaintext.
    Prefer,
    /// Require TLS without certificate verification.
    Require,
    /// Require TLS and verify the certificate authority.
    VerifyCa,
    /// Require TLS and verify CA plus hostname.
    VerifyFull,
}

#[cfg(feature = "postgres")]
impl SslMode {
    /// The libpq spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }

    /// Parse the libpq spelling, rejecting anything else.
    pub fn parse(mode: &str) -> crate::error::Result<Self> {
        match mode {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            other => Err(crate::error::HealthError::dsn(format!(
                "invalid sslmode: {other:?}"
            ))),
        }
    }
}

/// Configuration for the PostgreSQL check.
#[cfg(feature = "postgres")]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to.
    pub port: u16,

    /// Optional username.
    pub user: Option<String>,

    /// Optional password.
    pub password: Option<String>,

    /// Optional database name.
    pub database: Option<String>,

    /// TLS mode.
    pub ssl_mode: SslMode,

    /// Path to the CA certificate.
    pub ssl_root_cert: Option<String>,

    /// Path to the client certificate.
    pub ssl_client_cert: Option<String>,

    /// Path to the client key.
    pub ssl_client_key: Option<String>,

    /// Round-trip timeout.
    pub timeout: Duration,
}

#[cfg(feature = "postgres")]
impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: None,
            password: None,
            database: None,
            ssl_mode: SslMode::Disable,
            ssl_root_cert: None,
            ssl_client_cert: None,
            ssl_client_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for the MongoDB check.
#[cfg(feature = "mongodb")]
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Hosts, each `host` or `host:port`.
    pub hosts: Vec<String>,

    /// Port applied to hosts given without one.
    pub port: Option<u16>,

    /// Optional username.
    pub user: Option<String>,

    /// Optional password.
    pub password: Option<String>,

    /// Database to ping. Falls back to `auth_source`.
    pub database: Option<String>,

    /// Authentication database.
    pub auth_source: String,

    /// Server-selection and round-trip timeout.
    pub timeout: Duration,
}

#[cfg(feature = "mongodb")]
impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["localhost".to_string()],
            port: Some(27017),
            user: None,
            password: None,
            database: None,
            auth_source: "admin".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for the RabbitMQ check.
///
/// The default `guest`/`guest` credentials match the broker's development
/// defaults; set real credentials for anything non-local.
#[cfg(feature = "rabbitmq")]
#[derive(Debug, Clone)]
pub struct RabbitMqConfig {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to.
    pub port: u16,

    /// Username.
    pub user: String,

    /// Password.
    pub password: String,

    /// Virtual host.
    pub vhost: String,

    /// Connect over TLS.
    pub secure: bool,

    /// Connect timeout.
    pub timeout: Duration,
}

#[cfg(feature = "rabbitmq")]
impl Default for RabbitMqConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5672,
            user: "guest".to_string(),
            password: "guest".to_string(),
            vhost: "/".to_string(),
            secure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Broker security protocol for Kafka.
#[cfg(feature = "kafka")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityProtocol {
    /// No TLS, no SASL.
    #[default]
    Plaintext,
    /// TLS without SASL.
    Ssl,
    /// SASL over plaintext.
    SaslPlaintext,
    /// SASL over TLS.
    SaslSsl,
}

#[cfg(feature = "kafka")]
impl SecurityProtocol {
    /// The librdkafka `security.protocol` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintext => "PLAINTEXT",
            Self::Ssl => "SSL",
            Self::SaslPlaintext => "SASL_PLAINTEXT",
            Self::SaslSsl => "SASL_SSL",
        }
    }

    /// Whether this protocol carries SASL credentials.
    pub fn uses_sasl(&self) -> bool {
        matches!(self, Self::SaslPlaintext | Self::SaslSsl)
    }
}

/// SASL mechanism for Kafka.
#[cfg(feature = "kafka")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaslMechanism {
    /// SASL/PLAIN.
    #[default]
    Plain,
    /// Kerberos.
    Gssapi,
    /// SCRAM-SHA-256.
    ScramSha256,
    /// SCRAM-SHA-512.
    ScramSha512,
    /// OAuth bearer tokens.
    OauthBearer,
}

#[cfg(feature = "kafka")]
impl SaslMechanism {
    /// The librdkafka `sasl.mechanisms` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::Gssapi => "GSSAPI",
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::ScramSha512 => "SCRAM-SHA-512",
            Self::OauthBearer => "OAUTHBEARER",
        }
    }
}

/// Configuration for the Kafka check.
#[cfg(feature = "kafka")]
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated `host:port` bootstrap servers.
    pub bootstrap_servers: String,

    /// Broker security protocol.
    pub security_protocol: SecurityProtocol,

    /// SASL mechanism, used when the protocol carries SASL.
    pub sasl_mechanism: SaslMechanism,

    /// SASL username.
    pub sasl_username: Option<String>,

    /// SASL password.
    pub sasl_password: Option<String>,

    /// Metadata-fetch timeout.
    pub timeout: Duration,
}

#[cfg(feature = "kafka")]
impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:9092".to_string(),
            security_protocol: SecurityProtocol::Plaintext,
            sasl_mechanism: SaslMechanism::Plain,
            sasl_username: None,
            sasl_password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for the OpenSearch check.
#[cfg(feature = "opensearch")]
#[derive(Debug, Clone)]
pub struct OpenSearchConfig {
    /// Hosts, each `host:port`. The first entry is used.
    pub hosts: Vec<String>,

    /// Optional basic-auth username.
    pub username: Option<String>,

    /// Optional basic-auth password.
    pub password: Option<String>,

    /// Connect over TLS.
    pub use_ssl: bool,

    /// Verify TLS certificates.
    pub verify_certs: bool,

    /// Round-trip timeout.
    pub timeout: Duration,
}

#[cfg(feature = "opensearch")]
impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["localhost:9200".to_string()],
            username: None,
            password: None,
            use_ssl: false,
            verify_certs: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "postgres")]
    #[test]
    fn test_sslmode_parse_round_trip() {
        use super::SslMode;

        for mode in [
            SslMode::Disable,
            SslMode::Allow,
            SslMode::Prefer,
            SslMode::Require,
            SslMode::VerifyCa,
            SslMode::VerifyFull,
        ] {
            assert_eq!(SslMode::parse(mode.as_str()).unwrap(), mode);
        }
        assert!(SslMode::parse("strict").is_err());
    }

    #[cfg(feature = "kafka")]
    #[test]
    fn test_security_protocol_sasl_detection() {
        use super::SecurityProtocol;

        assert!(SecurityProtocol::SaslSsl.uses_sasl());
        assert!(!SecurityProtocol::Plaintext.uses_sasl());
        assert_eq!(SecurityProtocol::SaslPlaintext.as_str(), "SASL_PLAINTEXT");
    }
}
