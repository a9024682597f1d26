use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

#[derive(Debug, Clone, Parser)]
#[command(name = "tracker-api", version, about = "HTTP API for feature tracker projects")]
pub struct Config {
    /// Directory holding one <name>.json file per project [default: ~/.feature-tracker/data]
    #[arg(long, env = "TRACKER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "TRACKER_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Browser origin allowed to call the API (repeatable)
    #[arg(
        long = "allowed-origin",
        env = "TRACKER_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "TRACKER_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(tracker_core::default_data_dir)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        cors_layer(&self.allowed_origins)
    }
}

/// Credentials are allowed, so methods and headers are mirrored from the
/// preflight rather than sent as `*`.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("ignoring invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    fn declared_default(id: &str) -> Vec<String> {
        Config::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .unwrap()
            .get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect()
    }

    // Compare declared defaults, not parsed values: TRACKER_* in the
    // environment would override the latter.
    #[test]
    fn defaults() {
        assert_eq!(declared_default("bind"), ["127.0.0.1:8000"]);
        assert!(declared_default("bind")[0].parse::<SocketAddr>().is_ok());
        assert_eq!(declared_default("allowed_origins"), ["http://localhost:5173"]);
        assert!(declared_default("data_dir").is_empty());
        assert!(tracker_core::default_data_dir().ends_with("data"));
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "tracker-api",
            "--data-dir",
            "/srv/tracker",
            "--bind",
            "0.0.0.0:9000",
            "--allowed-origin",
            "http://a.test,http://b.test",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/srv/tracker"));
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.allowed_origins, ["http://a.test", "http://b.test"]);
        assert!(config.log_json);
    }
}
