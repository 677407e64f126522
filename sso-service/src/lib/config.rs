use std::env;
use std::path::Path;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub env: Env,
    pub storage: StorageConfig,
    pub grpc: GrpcConfig,
    pub token: TokenConfig,
    pub hashing: HashingConfig,
}

/// Deployment environment, selects the log output format.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Local,
    Dev,
    Prod,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrpcConfig {
    pub port: u16,
    pub timeout_secs: u64,
}

impl GrpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub ttl_minutes: i64,
}

impl TokenConfig {
    /// Token lifetime. `ttl_minutes` is range checked when the config is loaded.
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.ttl_minutes) {
            return Err(ConfigError::Message(format!(
                "token.ttl_minutes must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_MINUTES, self.ttl_minutes
            )));
        }
        Ok(())
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SSO_GRPC__PORT, SSO_STORAGE__URL, etc.)
    /// 2. File named by CONFIG_PATH, when set
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "local".to_string());

        let mut builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Ok(path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&path).required(true));
        }

        let configuration = builder
            // Example: SSO_STORAGE__URL=sqlite://... overrides storage.url
            .add_source(Environment::with_prefix("SSO").separator("__"))
            .build()?;

        Self::from_source(configuration)
    }

    /// Load configuration from a single file, without overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        Self::from_source(configuration)
    }

    fn from_source(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Self = configuration.try_deserialize()?;
        config.token.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn test_load_test_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/local_tests.toml");

        let config = Config::load_from(path).expect("Failed to load config");

        assert_eq!(config.env, Env::Local);
        assert_eq!(config.grpc.port, 44044);
        assert_eq!(config.grpc.timeout(), Duration::from_secs(10));
        assert_eq!(config.token.ttl(), chrono::Duration::hours(1));
        assert_eq!(config.hashing.memory_kib, 8);
    }

    #[test]
    fn test_load_default_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");

        let config = Config::load_from(path).expect("Failed to load config");

        assert_eq!(config.env, Env::Local);
        assert!(config.storage.url.starts_with("sqlite://"));
        assert_eq!(config.hashing.memory_kib, 19 * 1024);
    }

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Config::from_source(configuration)
    }

    fn with_ttl(ttl_minutes: i64) -> String {
        format!(
            r#"
            env = "local"
            [storage]
            url = "sqlite::memory:"
            [grpc]
            port = 44044
            timeout_secs = 10
            [token]
            ttl_minutes = {}
            [hashing]
            memory_kib = 8
            iterations = 1
            parallelism = 1
            "#,
            ttl_minutes
        )
    }

    #[test]
    fn test_ttl_bounds_accepted() {
        assert!(parse(&with_ttl(1)).is_ok());

        let config = parse(&with_ttl(MAX_TOKEN_TTL_MINUTES)).expect("Failed to parse config");
        assert_eq!(config.token.ttl(), chrono::Duration::days(365));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        for ttl in [0, -5] {
            let result = parse(&with_ttl(ttl));
            assert!(
                matches!(result, Err(ConfigError::Message(ref msg)) if msg.contains("token.ttl_minutes")),
                "ttl {} should be rejected",
                ttl
            );
        }
    }

    #[test]
    fn test_huge_ttl_rejected() {
        for ttl in [MAX_TOKEN_TTL_MINUTES + 1, i64::MAX] {
            let result = parse(&with_ttl(ttl));
            assert!(matches!(result, Err(ConfigError::Message(_))), "ttl {} should be rejected", ttl);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load_from("config/does_not_exist.toml");
        assert!(result.is_err());
    }
}
