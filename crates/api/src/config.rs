use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub limits: LimitsConfig,
    pub dealership: DealershipConfig,
    /// Email service configuration
    #[serde(default)]
    pub email: EmailConfig,
    /// SMS (Twilio) configuration
    #[serde(default)]
    pub sms: SmsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        persistence::db::DatabaseConfig {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Contact form submissions allowed per client IP per window. 0 disables.
    #[serde(default = "default_contact_rate_limit")]
    pub contact_rate_limit: u32,

    #[serde(default = "default_contact_rate_window")]
    pub contact_rate_window_secs: u64,

    /// Admin key (`dk_...`) upserted at startup. Empty means none.
    #[serde(default)]
    pub bootstrap_admin_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Redis URL for the shared tier. Empty keeps the cache in-process only.
    #[serde(default)]
    pub redis_url: String,

    #[serde(default = "default_cache_ttl")]
    pub default_ttl_secs: u64,

    #[serde(default = "default_cache_max_items")]
    pub max_memory_items: usize,

    #[serde(default = "default_cache_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    #[serde(default = "default_stale_multiplier")]
    pub stale_ttl_multiplier: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: String::new(),
            default_ttl_secs: default_cache_ttl(),
            max_memory_items: default_cache_max_items(),
            cleanup_interval_secs: default_cache_cleanup_interval(),
            stale_ttl_multiplier: default_stale_multiplier(),
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn settings(&self) -> persistence::cache::CacheSettings {
        persistence::cache::CacheSettings {
            default_ttl: self.default_ttl(),
            max_memory_items: self.max_memory_items,
            stale_ttl_multiplier: self.stale_ttl_multiplier,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,

    #[serde(default = "default_similar_vehicles")]
    pub similar_vehicle_count: i64,

    #[serde(default = "default_featured_vehicles")]
    pub featured_vehicle_count: i64,

    #[serde(default = "default_public_testimonials")]
    pub public_testimonial_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DealershipConfig {
    #[serde(default = "default_dealership_name")]
    pub name: String,

    /// Where lead notifications are emailed. Empty disables them.
    #[serde(default)]
    pub notification_email: String,

    /// Sales line that receives inquiry SMS. Empty disables them.
    #[serde(default)]
    pub sales_phone: String,

    /// Public site URL used in customer-facing links, without trailing slash.
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,
}

/// Email service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email sending is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: console (for development) or sendgrid
    #[serde(default = "default_email_provider")]
    pub provider: String,

    /// SendGrid API key (for sendgrid provider)
    #[serde(default)]
    pub sendgrid_api_key: String,

    /// Sender email address (From header)
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Sender name (From header)
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    #[serde(default = "default_outbound_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            sendgrid_api_key: String::new(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
            timeout_ms: default_outbound_timeout_ms(),
        }
    }
}

/// Twilio SMS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub twilio_account_sid: String,

    #[serde(default)]
    pub twilio_auth_token: String,

    /// Sending number in E.164 format.
    #[serde(default)]
    pub from_number: String,

    #[serde(default = "default_outbound_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            twilio_account_sid: String::new(),
            twilio_auth_token: String::new(),
            from_number: String::new(),
            timeout_ms: default_outbound_timeout_ms(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_contact_rate_limit() -> u32 {
    5
}
fn default_contact_rate_window() -> u64 {
    3600
}
fn default_true() -> bool {
    true
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_cache_max_items() -> usize {
    1000
}
fn default_cache_cleanup_interval() -> u64 {
    60
}
fn default_stale_multiplier() -> u32 {
    6
}
fn default_page_size() -> i64 {
    shared::pagination::DEFAULT_PAGE_SIZE
}
fn default_max_page_size() -> i64 {
    shared::pagination::MAX_PAGE_SIZE
}
fn default_similar_vehicles() -> i64 {
    4
}
fn default_featured_vehicles() -> i64 {
    6
}
fn default_public_testimonials() -> i64 {
    20
}
fn default_dealership_name() -> String {
    "Our Dealership".to_string()
}
fn default_site_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_sender_email() -> String {
    "noreply@dealership.test".to_string()
}
fn default_sender_name() -> String {
    "Dealership".to_string()
}
fn default_outbound_timeout_ms() -> u64 {
    10_000
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with DEALER__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("DEALER")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds from embedded defaults so tests do not depend on config files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 5

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            contact_rate_limit = 5
            contact_rate_window_secs = 3600

            [cache]
            enabled = true
            default_ttl_secs = 300

            [limits]
            default_page_size = 12
            max_page_size = 100

            [dealership]
            name = "Test Motors"
            site_base_url = "https://cars.test"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Validation is left to the caller so partial configs can be inspected
        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "DEALER__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.limits.default_page_size < 1 || self.limits.max_page_size < self.limits.default_page_size {
            return Err(ConfigValidationError::InvalidValue(
                "max_page_size must be at least default_page_size (and both positive)".to_string(),
            ));
        }

        if !self.security.bootstrap_admin_key.is_empty()
            && !shared::crypto::is_well_formed_key(&self.security.bootstrap_admin_key)
        {
            return Err(ConfigValidationError::InvalidValue(
                "bootstrap_admin_key must start with dk_ followed by at least 8 characters"
                    .to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
