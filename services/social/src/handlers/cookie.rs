//! Remember-credential cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::domain::types::RememberToken;

/// Cookie name for the remember credential.
pub const REMEMBER_COOKIE: &str = "murmur_remember";

/// Cookie Max-Age in days (20 years, a "permanent" cookie).
pub const REMEMBER_COOKIE_DAYS: i64 = 20 * 365;

/// Deployment-specific cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// `None` means a host-only cookie.
    pub domain: Option<String>,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            domain: None,
            secure: true,
        }
    }
}

fn build(settings: &CookieSettings, value: String, max_age: Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((REMEMBER_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax);
    if let Some(ref domain) = settings.domain {
        builder = builder.domain(domain.clone());
    }
    builder.build()
}

pub fn set_remember_cookie(
    jar: CookieJar,
    settings: &CookieSettings,
    token: &RememberToken,
) -> CookieJar {
    jar.add(build(
        settings,
        token.to_string(),
        Duration::days(REMEMBER_COOKIE_DAYS),
    ))
}

/// Expire the cookie by setting Max-Age to 0.
pub fn clear_remember_cookie(jar: CookieJar, settings: &CookieSettings) -> CookieJar {
    jar.add(build(settings, String::new(), Duration::ZERO))
}

/// The parsed remember token, if the jar carries a well-formed one.
pub fn remember_token(jar: &CookieJar) -> Option<RememberToken> {
    jar.get(REMEMBER_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}
