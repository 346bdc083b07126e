pub mod auth;

pub use auth::{AuthUser, SESSION_COOKIE};

use actix_web::middleware::DefaultHeaders;

/// En-têtes anti-cache: soldes et positions changent à chaque ordre
pub fn no_cache_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
        .add(("Expires", "0"))
        .add(("Pragma", "no-cache"))
}
