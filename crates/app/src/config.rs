//! Command-line and environment configuration

use clap::{Args, ValueEnum};

use crate::domain::checkout::pricing::RedemptionPolicy;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub database_max_connections: u32,
}

/// Checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// How to handle a redemption larger than the balance (clamp, reject)
    #[arg(long, env = "REDEMPTION_POLICY", value_enum, default_value_t = RedemptionPolicy::Clamp)]
    pub redemption_policy: RedemptionPolicy,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        logging: LoggingConfig,

        #[command(flatten)]
        database: DatabaseConfig,

        #[command(flatten)]
        checkout: CheckoutConfig,
    }

    #[test]
    fn defaults_apply_when_only_url_given() -> Result<(), clap::Error> {
        let harness = Harness::try_parse_from([
            "alma-app",
            "--database-url",
            "postgres://localhost/alma",
            "--log-level",
            "debug",
        ])?;

        assert_eq!(harness.logging.log_format, LogFormat::Compact);
        assert_eq!(harness.database.database_max_connections, 10);
        assert_eq!(harness.checkout.redemption_policy, RedemptionPolicy::Clamp);

        Ok(())
    }

    #[test]
    fn value_enums_parse_lowercase_names() -> Result<(), clap::Error> {
        let harness = Harness::try_parse_from([
            "alma-app",
            "--database-url",
            "postgres://localhost/alma",
            "--log-format",
            "json",
            "--redemption-policy",
            "reject",
        ])?;

        assert_eq!(harness.logging.log_format, LogFormat::Json);
        assert_eq!(harness.checkout.redemption_policy, RedemptionPolicy::Reject);

        Ok(())
    }
}
