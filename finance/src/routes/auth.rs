use actix_web::{get, post, web, HttpResponse, ResponseError};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::error::AppError;
use crate::middleware::SESSION_COOKIE;
use crate::models::dto::{LoginForm, RegisterForm};
use crate::routes::redirect_home;
use crate::services::account_service::AccountService;
use crate::utils::jwt::SessionKeys;

/// POST /register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    form: web::Form<RegisterForm>,
    db: web::Data<DatabaseConnection>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, AppError> {
    AccountService::register(db.get_ref(), &form, settings.starting_cash).await?;

    // Pas de connexion automatique: "/" renvoie vers /login
    Ok(redirect_home())
}

/// POST /login - Se connecter (PUBLIC)
/// Toute session existante est oubliée, même si la connexion échoue
#[post("/login")]
pub async fn login(
    form: web::Form<LoginForm>,
    db: web::Data<DatabaseConnection>,
    keys: web::Data<SessionKeys>,
) -> HttpResponse {
    let result = match AccountService::authenticate(db.get_ref(), &form).await {
        Ok(user) => keys.issue(user.id, &user.username),
        Err(e) => Err(e),
    };

    match result {
        Ok(token) => HttpResponse::Found()
            .insert_header((header::LOCATION, "/"))
            .cookie(session_cookie(token))
            .finish(),
        Err(e) => {
            let mut response = e.error_response();
            if let Err(err) = response.add_removal_cookie(&session_cookie(String::new())) {
                tracing::error!(error = %err, "failed to clear session cookie");
            }
            response
        }
    }
}

/// GET /logout - Oublier la session
#[get("/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout);
}
