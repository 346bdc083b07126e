use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{QuoteForm, TradeForm};
use crate::routes::redirect_home;
use crate::services::ledger_service::LedgerService;
use crate::services::quote_service::{normalize_symbol, Quote, QuoteProvider};

/// POST /buy - Acheter des actions au prix courant (PROTÉGÉE)
#[post("/buy")]
pub async fn buy(
    auth_user: AuthUser,
    form: web::Form<TradeForm>,
    db: web::Data<DatabaseConnection>,
    quotes: web::Data<dyn QuoteProvider>,
) -> Result<HttpResponse, AppError> {
    let quote = resolve(quotes.get_ref(), &form.symbol).await?;
    let shares = parse_shares(&form.shares)?;

    LedgerService::buy(db.get_ref(), auth_user.user_id, &quote, shares).await?;
    Ok(redirect_home())
}

/// GET /sell - Positions vendables (PROTÉGÉE)
#[get("/sell")]
pub async fn sellable(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let holdings = LedgerService::holdings(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(holdings))
}

/// POST /sell - Vendre des actions détenues (PROTÉGÉE)
#[post("/sell")]
pub async fn sell(
    auth_user: AuthUser,
    form: web::Form<TradeForm>,
    db: web::Data<DatabaseConnection>,
    quotes: web::Data<dyn QuoteProvider>,
) -> Result<HttpResponse, AppError> {
    let shares = parse_shares(&form.shares)?;
    let quote = resolve(quotes.get_ref(), &form.symbol).await?;

    LedgerService::sell(db.get_ref(), auth_user.user_id, &quote, shares).await?;
    Ok(redirect_home())
}

/// POST /quote - Cotation courante d'un symbole (PROTÉGÉE)
#[post("/quote")]
pub async fn lookup_quote(
    _auth_user: AuthUser,
    form: web::Form<QuoteForm>,
    quotes: web::Data<dyn QuoteProvider>,
) -> Result<HttpResponse, AppError> {
    let quote = resolve(quotes.get_ref(), &form.symbol).await?;
    Ok(HttpResponse::Ok().json(quote))
}

async fn resolve(quotes: &dyn QuoteProvider, raw_symbol: &str) -> Result<Quote, AppError> {
    let Some(symbol) = normalize_symbol(raw_symbol) else {
        return Err(AppError::UnknownSymbol(raw_symbol.to_string()));
    };

    match quotes.lookup(&symbol).await {
        Ok(Some(quote)) => Ok(quote),
        Ok(None) => Err(AppError::UnknownSymbol(symbol)),
        Err(e) => {
            tracing::warn!(symbol = %symbol, error = ?e, "quote lookup failed");
            Err(e)
        }
    }
}

/// Nombre d'actions: entier strictement positif
fn parse_shares(raw: &str) -> Result<i64, AppError> {
    let shares: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Shares must be a whole number.".to_string()))?;

    if shares <= 0 {
        return Err(AppError::Validation("Input amount greater than 0.".to_string()));
    }
    Ok(shares)
}

pub fn trade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(buy)
        .service(sellable)
        .service(sell)
        .service(lookup_quote);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use rust_decimal::Decimal;

    use crate::routes::testing::{decimal, location, login_request, register_request, session_cookie, TestContext};

    #[actix_web::test]
    async fn test_parse_shares() {
        assert_eq!(parse_shares(" 12 ").unwrap(), 12);
        assert!(matches!(parse_shares("0"), Err(AppError::Validation(_))));
        assert!(matches!(parse_shares("-4"), Err(AppError::Validation(_))));
        assert!(matches!(parse_shares("1.5"), Err(AppError::Validation(_))));
        assert!(matches!(parse_shares(""), Err(AppError::Validation(_))));
    }

    fn trade(uri: &str, symbol: &str, shares: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .set_form([("symbol", symbol), ("shares", shares)])
    }

    #[actix_web::test]
    async fn test_buy_and_sell_through_http() {
        let ctx = TestContext::new().await;
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;
        test::call_service(&app, register_request("alice", "hunter2").to_request()).await;
        let cookie = session_cookie(&test::call_service(&app, login_request("alice", "hunter2").to_request()).await);

        // Achat 10 @ 50, symbole saisi en minuscules
        let resp = test::call_service(&app, trade("/buy", "acme", "10").cookie(cookie.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/");

        // Vente 4 @ 60
        ctx.quotes.set("ACME", "Acme Corp", Decimal::from(60));
        let resp = test::call_service(&app, trade("/sell", "ACME", "4").cookie(cookie.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let req = test::TestRequest::get().uri("/").cookie(cookie.clone()).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(decimal(&body["cash"]), Decimal::from(9_740));
        assert_eq!(body["holdings"][0]["symbol"], "ACME");
        assert_eq!(body["holdings"][0]["name"], "Acme Corp");
        assert_eq!(body["holdings"][0]["shares"], 6);

        let req = test::TestRequest::get().uri("/history").cookie(cookie.clone()).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["transaction_type"], "BUY");
        assert_eq!(body[0]["amount"], 10);
        assert_eq!(body[1]["transaction_type"], "SELL");
        assert_eq!(body[1]["amount"], -4);
        assert_eq!(decimal(&body[1]["total"]), Decimal::from(-240));

        let req = test::TestRequest::get().uri("/sell").cookie(cookie).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["shares"], 6);
    }

    #[actix_web::test]
    async fn test_rejections_leave_state_unchanged() {
        let ctx = TestContext::new().await;
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;
        test::call_service(&app, register_request("alice", "hunter2").to_request()).await;
        let cookie = session_cookie(&test::call_service(&app, login_request("alice", "hunter2").to_request()).await);

        let cases = [
            ("/buy", "ZZZZ", "1", "No such symbol."),
            ("/buy", "", "1", "No such symbol."),
            ("/buy", "ACME", "abc", "Shares must be a whole number."),
            ("/buy", "ACME", "0", "Input amount greater than 0."),
            // 201 * 50 > 10000
            ("/buy", "ACME", "201", "Balance too low."),
            ("/sell", "ACME", "1", "Not enough shares."),
        ];

        for (uri, symbol, shares, message) in cases {
            let resp = test::call_service(&app, trade(uri, symbol, shares).cookie(cookie.clone()).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} {} {}", uri, symbol, shares);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], message);
        }

        let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(decimal(&body["cash"]), Decimal::from(10_000));
        assert_eq!(body["holdings"].as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn test_quote() {
        let ctx = TestContext::new().await;
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;
        test::call_service(&app, register_request("alice", "hunter2").to_request()).await;
        let cookie = session_cookie(&test::call_service(&app, login_request("alice", "hunter2").to_request()).await);

        let req = test::TestRequest::post()
            .uri("/quote")
            .cookie(cookie.clone())
            .set_form([("symbol", "acme")])
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["symbol"], "ACME");
        assert_eq!(body["name"], "Acme Corp");
        assert_eq!(decimal(&body["price"]), Decimal::from(50));

        let req = test::TestRequest::post()
            .uri("/quote")
            .cookie(cookie)
            .set_form([("symbol", "nope")])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
