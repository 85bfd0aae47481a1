use serde::Deserialize;

use murmur_core::config::Config;

/// Social service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct SocialConfig {
    /// Database connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120). Env var: `SOCIAL_PORT`.
    #[serde(default = "default_social_port")]
    pub social_port: u16,
    /// `Domain` attribute for the remember cookie. Env var: `COOKIE_DOMAIN`.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// Mark the remember cookie `Secure` (default true). Env var: `COOKIE_SECURE`.
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
}

fn default_social_port() -> u16 {
    3120
}

fn default_cookie_secure() -> bool {
    true
}

impl Config for SocialConfig {}
