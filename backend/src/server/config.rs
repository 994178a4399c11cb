//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_LOCATION_TTL_MINUTES: u32 = 10;

/// Deployment settings loaded from `TAGPET_*` environment variables, CLI
/// flags and configuration files.
///
/// Every external collaborator is optional. Missing values select the
/// in-process fallbacks described on each field.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TAGPET")]
pub struct AppSettings {
    /// Listen address.
    #[ortho_config(default = "0.0.0.0:8080".to_owned())]
    pub bind_addr: String,
    /// Public site root encoded in QR artwork.
    pub base_url: Option<String>,
    /// PostgreSQL URL. Without it data lives in memory.
    pub database_url: Option<String>,
    /// Supabase project URL for identity and storage.
    pub supabase_url: Option<String>,
    /// Supabase API key.
    pub supabase_key: Option<String>,
    /// Resend API key. Without it the notification endpoint reports
    /// `email_not_configured`.
    pub resend_api_key: Option<String>,
    /// Sender shown on notification emails.
    pub resend_from: Option<String>,
    /// OpenCage API key. Without it captured locations carry no address.
    pub opencage_key: Option<String>,
    /// Account allowed to issue tags.
    pub operator_email: Option<String>,
    /// Minutes a captured finder location stays usable.
    #[ortho_config(default = 10)]
    pub location_ttl_minutes: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            base_url: None,
            database_url: None,
            supabase_url: None,
            supabase_key: None,
            resend_api_key: None,
            resend_from: None,
            opencage_key: None,
            operator_email: None,
            location_ttl_minutes: DEFAULT_LOCATION_TTL_MINUTES,
        }
    }
}

impl AppSettings {
    /// Return the configured listen address; a blank value selects the default.
    ///
    /// # Errors
    /// Returns the parse error when the configured address is malformed.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        Some(self.bind_addr.trim())
            .filter(|addr| !addr.is_empty())
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Return the configured base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Return how long captured finder locations remain usable.
    pub fn location_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.location_ttl_minutes))
    }

    /// A value that is present and not blank.
    pub fn present(value: Option<&String>) -> Option<&str> {
        value.map(|v| v.trim()).filter(|v| !v.is_empty())
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) settings: AppSettings,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from session and application settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, settings: AppSettings) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            bind_addr,
            settings,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, the server uses the Diesel repositories instead of the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "TAGPET_BIND_ADDR",
        "TAGPET_BASE_URL",
        "TAGPET_LOCATION_TTL_MINUTES",
        "TAGPET_OPERATOR_EMAIL",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("tagpet")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.location_ttl(), Duration::minutes(10));
        assert!(settings.operator_email.is_none());
    }

    #[rstest]
    fn struct_defaults_match_loaded_defaults() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let loaded = load_from_empty_args();
        let built = AppSettings::default();
        assert_eq!(loaded.bind_addr, built.bind_addr);
        assert_eq!(loaded.location_ttl_minutes, built.location_ttl_minutes);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TAGPET_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("TAGPET_BASE_URL", Some("https://tagpet.example/".to_owned())),
            ("TAGPET_LOCATION_TTL_MINUTES", Some("3".to_owned())),
            ("TAGPET_OPERATOR_EMAIL", Some("ops@tagpet.example".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.base_url(), "https://tagpet.example");
        assert_eq!(settings.location_ttl(), Duration::minutes(3));
        assert_eq!(
            settings.operator_email.as_deref(),
            Some("ops@tagpet.example")
        );
    }

    #[rstest]
    fn malformed_bind_addresses_are_reported() {
        let settings = AppSettings {
            bind_addr: "not an address".to_owned(),
            ..AppSettings::default()
        };
        assert!(settings.bind_addr().is_err());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    #[case(Some(" key "), Some("key"))]
    fn blank_values_count_as_absent(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let value = raw.map(str::to_owned);
        assert_eq!(AppSettings::present(value.as_ref()), expected);
    }
}
