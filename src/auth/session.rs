use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration as TimeDuration, OffsetDateTime};

use super::jwt::SESSION_TTL;

/// Name of the session cookie the browser carries on every request.
pub const SESSION_COOKIE: &str = "token";

fn same_site(production: bool) -> SameSite {
    // The front-end is served from another origin in production, so the
    // browser only sends the cookie under SameSite=None; Secure.
    if production {
        SameSite::None
    } else {
        SameSite::Lax
    }
}

/// Build the session cookie carrying a freshly minted token.
pub fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(same_site(production))
        .max_age(TimeDuration::seconds(SESSION_TTL.as_secs() as i64))
        .build()
}

/// Build an expired cookie that evicts the session. The attributes must
/// match the ones used at set time or browsers keep the original cookie.
pub fn removal_cookie(production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(same_site(production))
        .max_age(TimeDuration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Read the raw token out of the request's cookie jar.
pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}
