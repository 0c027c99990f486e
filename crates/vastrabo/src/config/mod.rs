use crate::kommun::links::{
    parse_fixed_url, TemplateError, UrlTemplate, DEFAULT_BOPLATS_URL,
    DEFAULT_DIRECTIONS_TEMPLATE, DEFAULT_HOMEQ_TEMPLATE, DEFAULT_LANDLORD_SEARCH_TEMPLATE,
    DEFAULT_QASA_TEMPLATE,
};
use crate::kommun::PortalTemplates;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub portals: PortalTemplates,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data_dir = env::var("APP_CATALOG_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig { data_dir },
            portals: load_portal_templates()?,
        })
    }
}

fn load_portal_templates() -> Result<PortalTemplates, ConfigError> {
    Ok(PortalTemplates {
        homeq: template_var("PORTAL_HOMEQ_TEMPLATE", DEFAULT_HOMEQ_TEMPLATE)?,
        qasa: template_var("PORTAL_QASA_TEMPLATE", DEFAULT_QASA_TEMPLATE)?,
        directions: template_var("PORTAL_DIRECTIONS_TEMPLATE", DEFAULT_DIRECTIONS_TEMPLATE)?,
        landlord_search: template_var(
            "PORTAL_LANDLORD_SEARCH_TEMPLATE",
            DEFAULT_LANDLORD_SEARCH_TEMPLATE,
        )?,
        boplats_filter: {
            let raw = env::var("PORTAL_BOPLATS_URL")
                .unwrap_or_else(|_| DEFAULT_BOPLATS_URL.to_string());
            parse_fixed_url(&raw).map_err(|source| ConfigError::InvalidPortal {
                variable: "PORTAL_BOPLATS_URL",
                source,
            })?
        },
    })
}

fn template_var(variable: &'static str, default: &str) -> Result<UrlTemplate, ConfigError> {
    let raw = env::var(variable).unwrap_or_else(|_| default.to_string());
    UrlTemplate::parse(&raw).map_err(|source| ConfigError::InvalidPortal { variable, source })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the municipality table comes from; `None` means the embedded copy.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPortal {
        variable: &'static str,
        source: TemplateError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPortal { variable, source } => {
                write!(f, "{variable} is not a usable portal url: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPortal { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_CATALOG_DIR",
            "PORTAL_HOMEQ_TEMPLATE",
            "PORTAL_QASA_TEMPLATE",
            "PORTAL_DIRECTIONS_TEMPLATE",
            "PORTAL_LANDLORD_SEARCH_TEMPLATE",
            "PORTAL_BOPLATS_URL",
        ] {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.catalog.data_dir.is_none());
        assert_eq!(config.portals.homeq.as_str(), DEFAULT_HOMEQ_TEMPLATE);
        assert_eq!(config.portals.boplats_filter, DEFAULT_BOPLATS_URL);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn portal_templates_can_be_overridden() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "PORTAL_QASA_TEMPLATE",
            "https://qasa.se/p2/sv/find-home?searchAreas={query}",
        );
        env::set_var("APP_CATALOG_DIR", "/srv/vastrabo/data");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.portals.qasa.render("Lerums_kommun~~se"),
            "https://qasa.se/p2/sv/find-home?searchAreas=Lerums_kommun~~se"
        );
        assert_eq!(
            config.catalog.data_dir,
            Some(PathBuf::from("/srv/vastrabo/data"))
        );
        reset_env();
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PORTAL_HOMEQ_TEMPLATE", "https://www.homeq.se/search");
        let err = AppConfig::load().expect_err("template rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidPortal {
                variable: "PORTAL_HOMEQ_TEMPLATE",
                ..
            }
        ));
        reset_env();
    }
}
