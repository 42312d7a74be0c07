use chrono::Duration;
use config::Config;
use serde::Deserialize;

use crate::core::error::ConfigError;

const MIN_SECRET_LEN: usize = 32;

#[derive(Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) secret: String,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) log_level: String,
    pub(crate) database_url: Option<String>,
    pub(crate) max_connections: u32,
    pub(crate) session_ttl_secs: i64,
    pub(crate) refresh_ttl_secs: i64,
    pub(crate) refresh_threshold_secs: i64,
    pub(crate) bcrypt_cost: u32,
}

impl Args {
    /// Reads `tokengate.toml` (optional) and `TOKENGATE_*` environment variables,
    /// the latter taking precedence.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("log_level", "info")?
            .set_default("max_connections", 5)?
            .set_default("session_ttl_secs", 120)?
            .set_default("refresh_ttl_secs", 300)?
            .set_default("refresh_threshold_secs", 30)?
            .set_default("bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .add_source(config::File::with_name("tokengate").required(false))
            .add_source(config::Environment::with_prefix("TOKENGATE"))
            .build()?
            .try_deserialize::<Args>()
            .map_err(ConfigError::Config)
    }
}

/// Validated, immutable settings shared by every component after startup.
#[derive(Clone)]
pub(crate) struct Settings {
    pub(crate) secret: String,
    pub(crate) session_ttl: Duration,
    pub(crate) refresh_ttl: Duration,
    pub(crate) refresh_threshold: Duration,
    pub(crate) bcrypt_cost: u32,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("session_ttl", &self.session_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("refresh_threshold", &self.refresh_threshold)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl TryFrom<&Args> for Settings {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        if args.secret.is_empty() {
            return Err(ConfigError::Invalid("secret must not be empty".into()));
        }

        if args.secret.len() < MIN_SECRET_LEN {
            tracing::warn!(
                "signing secret is shorter than {} bytes, consider a longer one",
                MIN_SECRET_LEN
            );
        }

        if args.session_ttl_secs <= 0 || args.refresh_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("token ttls must be positive".into()));
        }

        if args.refresh_threshold_secs < 0 {
            return Err(ConfigError::Invalid(
                "refresh threshold must not be negative".into(),
            ));
        }

        if args.refresh_ttl_secs <= args.refresh_threshold_secs {
            return Err(ConfigError::Invalid(
                "refresh ttl must be longer than the refresh threshold".into(),
            ));
        }

        if !(4..=31).contains(&args.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "bcrypt cost {} is outside 4..=31",
                args.bcrypt_cost
            )));
        }

        Ok(Settings {
            secret: args.secret.clone(),
            session_ttl: Duration::seconds(args.session_ttl_secs),
            refresh_ttl: Duration::seconds(args.refresh_ttl_secs),
            refresh_threshold: Duration::seconds(args.refresh_threshold_secs),
            bcrypt_cost: args.bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            secret: "a-test-secret-that-is-long-enough-123".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            log_level: "info".into(),
            database_url: None,
            max_connections: 5,
            session_ttl_secs: 120,
            refresh_ttl_secs: 300,
            refresh_threshold_secs: 30,
            bcrypt_cost: 4,
        }
    }

    #[test]
    fn test_valid_args_convert() {
        let settings = Settings::try_from(&make_args()).unwrap();

        assert_eq!(settings.session_ttl, Duration::seconds(120));
        assert_eq!(settings.refresh_ttl, Duration::minutes(5));
        assert_eq!(settings.refresh_threshold, Duration::seconds(30));
        assert_eq!(settings.bcrypt_cost, 4);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let args = Args {
            secret: String::new(),
            ..make_args()
        };

        assert!(matches!(
            Settings::try_from(&args),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_refresh_ttl_must_exceed_threshold() {
        let args = Args {
            refresh_ttl_secs: 30,
            ..make_args()
        };
        assert!(Settings::try_from(&args).is_err());

        let args = Args {
            refresh_ttl_secs: 31,
            ..make_args()
        };
        assert!(Settings::try_from(&args).is_ok());
    }

    #[test]
    fn test_non_positive_ttls_rejected() {
        let args = Args {
            session_ttl_secs: 0,
            ..make_args()
        };
        assert!(Settings::try_from(&args).is_err());

        let args = Args {
            refresh_threshold_secs: -1,
            ..make_args()
        };
        assert!(Settings::try_from(&args).is_err());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let args = Args {
            bcrypt_cost: 3,
            ..make_args()
        };
        assert!(Settings::try_from(&args).is_err());

        let args = Args {
            bcrypt_cost: 32,
            ..make_args()
        };
        assert!(Settings::try_from(&args).is_err());
    }
}
