use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Sens d'une écriture du ledger
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[sea_orm(string_value = "BUY")]
    Buy,
    #[sea_orm(string_value = "SELL")]
    Sell,
}

/// Écriture du ledger (append-only, jamais modifiée après insertion).
///
/// `amount` et `total` sont signés: une vente est enregistrée comme l'opposé
/// d'un achat équivalent, donc la somme par symbole donne directement la
/// position nette et le coût net.
///
/// Exemple:
/// - Achat 10 AAPL à 50 → amount=+10, total=+500
/// - Vente 4 AAPL à 60  → amount=-4,  total=-240
/// - Position nette     → 6
///
/// `price` et `total` sont en dix-millièmes (voir `utils::money`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub stock_symbol: String,
    pub stock_name: String,
    pub amount: i64,
    #[serde(with = "crate::utils::money::minor_units")]
    pub price: i64,
    #[serde(with = "crate::utils::money::minor_units")]
    pub total: i64,
    pub transaction_type: TransactionType,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
