use sea_orm::*;
use sea_orm::sea_query::Expr;
use rust_decimal::Decimal;
use chrono::Utc;
use std::collections::BTreeMap;
use crate::error::AppError;
use crate::models::{deposits, purchases, users};
use crate::models::dto::{Holding, PortfolioResponse};
use crate::models::purchases::TransactionType;
use crate::services::quote_service::Quote;
use crate::utils::money;

/// Plafond d'une recharge de cash
pub const MAX_TOP_UP: i64 = 1_000_000;

pub struct LedgerService;

impl LedgerService {
    /// Achète `shares` actions au prix de la cotation.
    ///
    /// Le débit est un UPDATE conditionnel (`cash >= total`) dans la même
    /// transaction que l'écriture du ledger: pas de lecture puis écriture
    /// du solde, donc pas de mise à jour perdue entre deux requêtes.
    pub async fn buy(
        db: &DatabaseConnection,
        user_id: i32,
        quote: &Quote,
        shares: i64,
    ) -> Result<purchases::Model, AppError> {
        Self::ensure_positive(shares)?;
        let price = money::to_minor(quote.price)?;

        // Total hors de portée d'un i64: forcément au-delà de tout solde
        let Some(total) = price.checked_mul(shares) else {
            let available = Self::cash(db, user_id).await?;
            let required = quote.price.checked_mul(Decimal::from(shares)).unwrap_or(Decimal::MAX);
            return Err(AppError::InsufficientFunds { available, required });
        };

        let txn = db.begin().await?;

        // 1. Débiter seulement si le solde couvre le total (entiers, comparaison exacte)
        let debit = users::Entity::update_many()
            .col_expr(users::Column::Cash, Expr::col(users::Column::Cash).sub(total))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Cash.gte(total))
            .exec(&txn)
            .await?;

        if debit.rows_affected == 0 {
            let available = Self::cash(&txn, user_id).await?;
            let required = money::from_minor(total);
            txn.rollback().await?;
            tracing::warn!(user_id, symbol = %quote.symbol, %available, %required, "buy rejected: balance too low");
            return Err(AppError::InsufficientFunds { available, required });
        }

        // 2. Écriture positive dans le ledger
        let entry = Self::record(&txn, user_id, quote, price, shares, TransactionType::Buy).await?;
        txn.commit().await?;

        tracing::info!(user_id, symbol = %entry.stock_symbol, shares, total = %money::from_minor(entry.total), "buy recorded");
        Ok(entry)
    }

    /// Vend `shares` actions au prix de la cotation.
    /// Refusé si la position nette (somme des `amount`) est insuffisante.
    pub async fn sell(
        db: &DatabaseConnection,
        user_id: i32,
        quote: &Quote,
        shares: i64,
    ) -> Result<purchases::Model, AppError> {
        Self::ensure_positive(shares)?;
        let price = money::to_minor(quote.price)?;
        let total = price
            .checked_mul(shares)
            .ok_or_else(|| AppError::Validation("Amount out of range.".to_string()))?;

        let txn = db.begin().await?;

        // 1. Créditer d'abord: l'UPDATE verrouille la ligne du compte jusqu'au
        //    commit, ce qui sérialise les ventes concurrentes du même utilisateur
        let credit = users::Entity::update_many()
            .col_expr(users::Column::Cash, Expr::col(users::Column::Cash).add(total))
            .filter(users::Column::Id.eq(user_id))
            .exec(&txn)
            .await?;

        if credit.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::AccountNotFound(user_id));
        }

        // 2. Vérifier la position, annuler le crédit si elle ne suffit pas
        let held = Self::position(&txn, user_id, &quote.symbol).await?;
        if shares > held {
            txn.rollback().await?;
            tracing::warn!(user_id, symbol = %quote.symbol, held, requested = shares, "sell rejected: not enough shares");
            return Err(AppError::InsufficientShares { held, requested: shares });
        }

        // 3. Écriture négative: l'opposé d'un achat équivalent
        let entry = Self::record(&txn, user_id, quote, price, -shares, TransactionType::Sell).await?;
        txn.commit().await?;

        tracing::info!(user_id, symbol = %entry.stock_symbol, shares, total = %money::from_minor(entry.total), "sell recorded");
        Ok(entry)
    }

    /// Recharge manuelle du cash (0 à 1 000 000).
    /// Pas d'écriture dans le ledger des achats; la recharge est tracée dans `deposits`.
    pub async fn top_up(
        db: &DatabaseConnection,
        user_id: i32,
        amount: i64,
    ) -> Result<deposits::Model, AppError> {
        if !(0..=MAX_TOP_UP).contains(&amount) {
            return Err(AppError::Validation("Enter a reasonable amount.".to_string()));
        }
        let amount = money::whole_to_minor(amount)?;

        let txn = db.begin().await?;

        let credit = users::Entity::update_many()
            .col_expr(users::Column::Cash, Expr::col(users::Column::Cash).add(amount))
            .filter(users::Column::Id.eq(user_id))
            .exec(&txn)
            .await?;

        if credit.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::AccountNotFound(user_id));
        }

        let deposit = deposits::ActiveModel {
            user_id: Set(user_id),
            amount: Set(amount),
            time: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(user_id, amount = %money::from_minor(amount), "balance topped up");
        Ok(deposit)
    }

    /// Portefeuille: positions agrégées depuis le ledger + valeur totale
    /// (cash + somme de tous les `total`)
    pub async fn portfolio(db: &DatabaseConnection, user_id: i32) -> Result<PortfolioResponse, AppError> {
        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or(AppError::AccountNotFound(user_id))?;

        let entries = Self::history(db, user_id).await?;
        let invested: i64 = entries.iter().map(|e| e.total).sum();

        let holdings = Self::aggregate(&entries)
            .into_iter()
            .filter(|h| h.shares != 0)
            .collect();

        Ok(PortfolioResponse {
            username: user.username,
            total: money::from_minor(user.cash + invested),
            cash: money::from_minor(user.cash),
            holdings,
        })
    }

    /// Positions non nulles de l'utilisateur (ce que propose le formulaire de vente)
    pub async fn holdings(db: &DatabaseConnection, user_id: i32) -> Result<Vec<Holding>, AppError> {
        let entries = Self::history(db, user_id).await?;

        Ok(Self::aggregate(&entries)
            .into_iter()
            .filter(|h| h.shares != 0)
            .collect())
    }

    /// Toutes les écritures de l'utilisateur, dans l'ordre d'insertion
    pub async fn history(db: &DatabaseConnection, user_id: i32) -> Result<Vec<purchases::Model>, AppError> {
        Ok(purchases::Entity::find()
            .filter(purchases::Column::UserId.eq(user_id))
            .order_by_asc(purchases::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn deposits(db: &DatabaseConnection, user_id: i32) -> Result<Vec<deposits::Model>, AppError> {
        Ok(deposits::Entity::find()
            .filter(deposits::Column::UserId.eq(user_id))
            .order_by_asc(deposits::Column::Id)
            .all(db)
            .await?)
    }

    /// Position nette sur un symbole: somme des `amount`
    pub async fn position<C: ConnectionTrait>(db: &C, user_id: i32, symbol: &str) -> Result<i64, AppError> {
        let entries = purchases::Entity::find()
            .filter(purchases::Column::UserId.eq(user_id))
            .filter(purchases::Column::StockSymbol.eq(symbol))
            .all(db)
            .await?;

        Ok(entries.iter().map(|e| e.amount).sum())
    }

    pub async fn cash<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Decimal, AppError> {
        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or(AppError::AccountNotFound(user_id))?;
        Ok(money::from_minor(user.cash))
    }

    // Regroupe par symbole; le nom retenu est celui de la dernière écriture
    fn aggregate(entries: &[purchases::Model]) -> Vec<Holding> {
        let mut positions: BTreeMap<&str, Holding> = BTreeMap::new();

        for e in entries {
            let holding = positions.entry(e.stock_symbol.as_str()).or_insert_with(|| Holding {
                symbol: e.stock_symbol.clone(),
                name: e.stock_name.clone(),
                shares: 0,
                cost: Decimal::ZERO,
            });
            holding.name = e.stock_name.clone();
            holding.shares += e.amount;
            holding.cost += money::from_minor(e.total);
        }

        positions.into_values().collect()
    }

    async fn record<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        quote: &Quote,
        price: i64,
        amount: i64,
        transaction_type: TransactionType,
    ) -> Result<purchases::Model, AppError> {
        // |price * amount| déjà vérifié par l'appelant
        let entry = purchases::ActiveModel {
            user_id: Set(user_id),
            stock_symbol: Set(quote.symbol.clone()),
            stock_name: Set(quote.name.clone()),
            amount: Set(amount),
            price: Set(price),
            total: Set(price * amount),
            transaction_type: Set(transaction_type),
            time: Set(Utc::now()),
            ..Default::default()
        };

        Ok(entry.insert(db).await?)
    }

    fn ensure_positive(shares: i64) -> Result<(), AppError> {
        if shares <= 0 {
            return Err(AppError::Validation("Input amount greater than 0.".to_string()));
        }
        Ok(())
    }
}
