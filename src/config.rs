use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                // Used only for debugging/observability. If unset, fall back to
                // HOSTNAME if present (e.g. Docker/Kubernetes), otherwise "unknown".
                instance_id: env::var("INSTANCE_ID")
                    .or_else(|_| env::var("HOSTNAME"))
                    .unwrap_or_else(|_| "unknown".to_string()),
            },
            log: LogConfig {
                format: parse_log_format(
                    &env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
                )?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.to_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "text" | "plain" | "pretty" => Ok(LogFormat::Text),
        other => anyhow::bail!("LOG_FORMAT must be 'json' or 'text', got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                instance_id: "test-instance".to_string(),
            },
            log: LogConfig {
                format: LogFormat::Json,
            },
        };

        assert_eq!(config.server_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format("json").unwrap(), LogFormat::Json);
        assert_eq!(parse_log_format("JSON").unwrap(), LogFormat::Json);
        assert_eq!(parse_log_format("text").unwrap(), LogFormat::Text);
        assert_eq!(parse_log_format("pretty").unwrap(), LogFormat::Text);
        assert!(parse_log_format("yaml").is_err());
    }
}
