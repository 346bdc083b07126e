// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Entités SeaORM (une par table) et DTO des formulaires / réponses.
//
// Liste des modules:
//   - users : Comptes (identifiants + cash)
//   - purchases : Ledger signé des achats/ventes (append-only)
//   - deposits : Recharges de cash (hors ledger)
//   - dto : Formulaires reçus et réponses JSON
//   - health : Health check
//
// Points d'attention:
//   - Mêmes noms de tables que finance.db (users, purchases)
//   - Les positions ne sont jamais stockées: elles se recalculent en
//     sommant purchases.amount par symbole
//
// ============================================================================

pub mod users;
pub mod purchases;
pub mod deposits;
pub mod dto;
pub mod health;
