// src/auth.rs

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::app_state::AppState;
use crate::config::Config;
use crate::token;

/// Name of the edit-capability cookie.
pub const EDIT_COOKIE: &str = "board_edit";

#[derive(Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

/// True when a secret is configured and the caller presents a valid,
/// unexpired edit token. Expiry is detected lazily, right here.
pub fn can_edit(req: &HttpRequest, config: &Config) -> bool {
    let secret = match config.edit_password.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => return false,
    };
    match req.cookie(EDIT_COOKIE) {
        Some(cookie) => token::verify(cookie.value(), secret).is_some(),
        None => false,
    }
}

/// Precondition guard for mutation handlers.
pub fn require_edit(req: &HttpRequest, config: &Config) -> Result<(), HttpResponse> {
    if can_edit(req, config) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(serde_json::json!({ "error": "forbidden" })))
    }
}

fn edit_cookie(value: String, expires: OffsetDateTime) -> Cookie<'static> {
    Cookie::build(EDIT_COOKIE, value)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(false) // local http deployment
        .path("/")
        .expires(expires)
        .finish()
}

/// GET /api/auth
pub async fn auth_status(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let can_edit = can_edit(&req, &data.config);
    HttpResponse::Ok().json(serde_json::json!({ "canEdit": can_edit }))
}

/// POST /api/auth
/// Issues the edit cookie iff the password matches the configured secret
/// exactly. With no secret configured this always fails.
pub async fn unlock(data: web::Data<AppState>, payload: web::Json<UnlockRequest>) -> impl Responder {
    let secret = match data.config.edit_password.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => return HttpResponse::Unauthorized().json(serde_json::json!({ "ok": false })),
    };

    let matches: bool = payload
        .password
        .as_bytes()
        .ct_eq(secret.as_bytes())
        .into();
    if !matches {
        return HttpResponse::Unauthorized().json(serde_json::json!({ "ok": false }));
    }

    let (token, claims) = match token::issue(secret) {
        Some(issued) => issued,
        None => return HttpResponse::Unauthorized().json(serde_json::json!({ "ok": false })),
    };
    let expires = match OffsetDateTime::from_unix_timestamp(claims.exp as i64) {
        Ok(t) => t,
        Err(e) => {
            error!("Invalid token expiry: {}", e);
            return HttpResponse::InternalServerError().body("Error issuing token");
        }
    };

    info!("Board unlocked for editing");
    HttpResponse::Ok()
        .cookie(edit_cookie(token, expires))
        .json(serde_json::json!({ "ok": true }))
}

/// DELETE /api/auth
/// Expires the cookie client-side. Idempotent; an already-issued token is
/// not revoked server-side.
pub async fn lock() -> impl Responder {
    HttpResponse::Ok()
        .cookie(edit_cookie(String::new(), OffsetDateTime::UNIX_EPOCH))
        .json(serde_json::json!({ "ok": true }))
}
