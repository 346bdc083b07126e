// Montants stockés en entiers: dix-millièmes de dollar.
// SQLite range les DECIMAL en REAL; les soldes et la garde `cash >= total`
// doivent rester exacts, donc la base ne voit que des i64.
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::AppError;

/// Nombre de décimales conservées (4, comme les cotations)
pub const SCALE: u32 = 4;
const UNIT: i64 = 10_000;

/// Décimal → unités mineures (arrondi à 4 décimales)
pub fn to_minor(value: Decimal) -> Result<i64, AppError> {
    value
        .round_dp(SCALE)
        .checked_mul(Decimal::from(UNIT))
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| AppError::Validation("Amount out of range.".to_string()))
}

pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, SCALE).normalize()
}

/// Unités entières (recharges, config) → unités mineures
pub fn whole_to_minor(units: i64) -> Result<i64, AppError> {
    units
        .checked_mul(UNIT)
        .ok_or_else(|| AppError::Validation("Amount out of range.".to_string()))
}

/// Sérialise une colonne i64 en montant décimal dans le JSON
/// (`"12.5"` plutôt que `125000`)
pub mod minor_units {
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(minor: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&super::from_minor(*minor), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        super::to_minor(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(to_minor(Decimal::new(1, 1)).unwrap(), 1_000);
        assert_eq!(to_minor(Decimal::new(51225, 2)).unwrap(), 5_122_500);
        assert_eq!(to_minor(Decimal::new(123456, 5)).unwrap(), 12_346);
        assert_eq!(from_minor(97_400_000), Decimal::from(9_740));
        assert_eq!(from_minor(-2_400_000), Decimal::from(-240));
        assert_eq!(whole_to_minor(2_500).unwrap(), 25_000_000);
    }

    #[test]
    fn test_out_of_range() {
        assert!(to_minor(Decimal::MAX).is_err());
        assert!(whole_to_minor(i64::MAX).is_err());
    }

    #[test]
    fn test_json_shape() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Row {
            #[serde(with = "crate::utils::money::minor_units")]
            cash: i64,
        }

        let json = serde_json::to_value(Row { cash: 1_000 }).unwrap();
        assert_eq!(json["cash"], "0.1");

        let row: Row = serde_json::from_value(json).unwrap();
        assert_eq!(row.cash, 1_000);
    }
}
