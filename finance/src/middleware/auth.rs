use actix_web::{dev::Payload, http::header, web, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt::SessionKeys;

/// Nom du cookie qui porte le jeton de session
pub const SESSION_COOKIE: &str = "session";

/// Structure qui contient les infos de l'utilisateur connecté
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

/// Implémentation de FromRequest pour AuthUser
/// Sans session valide, la requête est redirigée vers /login
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Clés de session injectées au démarrage
        let keys = match req.app_data::<web::Data<SessionKeys>>() {
            Some(keys) => keys,
            None => {
                tracing::error!("SessionKeys missing from app data");
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "session keys not configured",
                )));
            }
        };

        // 2. Jeton: cookie de session, sinon header "Authorization: Bearer <token>"
        let token = match session_token(req) {
            Some(token) => token,
            None => return ready(Err(redirect_to_login())),
        };

        // 3. Vérifier le jeton
        match keys.verify(&token) {
            Ok(claims) => ready(Ok(AuthUser {
                user_id: claims.sub,
                username: claims.username,
            })),
            Err(e) => {
                tracing::debug!(error = %e, "rejected session");
                ready(Err(redirect_to_login()))
            }
        }
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn redirect_to_login() -> Error {
    let response = HttpResponse::Found()
        .insert_header((header::LOCATION, "/login"))
        .finish();
    actix_web::error::InternalError::from_response("login required", response).into()
}
