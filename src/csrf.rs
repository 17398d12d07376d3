// anti-forgery tokens: cookie value must come back in the posted form
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const COOKIE_NAME: &str = "csrf_token";
pub const FIELD_NAME: &str = "CsrfToken";

/// Reuses the visitor's token, or sets a fresh one.
pub fn issue(cookies: &Cookies) -> String {
	if let Some(existing) = cookies.get(COOKIE_NAME) {
		if !existing.value().is_empty() {
			return existing.value().to_string();
		}
	}

	let token = Uuid::new_v4().to_string();
	let cookie = Cookie::build((COOKIE_NAME, token.clone()))
		.path("/")
		.http_only(true)
		.same_site(SameSite::Strict);
	cookies.add(cookie.into());
	token
}

pub fn verify(cookies: &Cookies, submitted: &str) -> Result<()> {
	let matches = cookies.get(COOKIE_NAME)
		.is_some_and(|expected| !submitted.is_empty() && expected.value() == submitted);
	if !matches {
		tracing::warn!("rejected post with missing or bad anti-forgery token");
		return Err(AppError::Csrf);
	}
	Ok(())
}
