use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single position: asset identifier, average purchase price and quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset_id: String,
    pub avg_buy_price: Decimal,
    pub quantity: Decimal,
}

impl Holding {
    pub fn new(asset_id: impl Into<String>, avg_buy_price: Decimal, quantity: Decimal) -> Self {
        Self {
            asset_id: asset_id.into(),
            avg_buy_price,
            quantity,
        }
    }
}

/// Portfolio state at one instant
///
/// `holdings` keeps the order the producer supplied; every per-asset output
/// follows it. `quotes` may cover assets that are not held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub balance: Decimal,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub quotes: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub timestamp: i64,
}

impl PortfolioSnapshot {
    pub fn new(balance: Decimal, timestamp: i64) -> Self {
        Self {
            balance,
            holdings: Vec::new(),
            quotes: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn with_holding(
        mut self,
        asset_id: impl Into<String>,
        avg_buy_price: Decimal,
        quantity: Decimal,
    ) -> Self {
        self.holdings
            .push(Holding::new(asset_id, avg_buy_price, quantity));
        self
    }

    pub fn with_quote(mut self, asset_id: impl Into<String>, price: Decimal) -> Self {
        self.quotes.insert(asset_id.into(), price);
        self
    }

    pub fn quote(&self, asset_id: &str) -> Option<Decimal> {
        self.quotes.get(asset_id).copied()
    }
}

/// Per-holding evaluation against its own average purchase price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEvaluation {
    pub asset_id: String,
    pub avg_buy_price: Decimal,
    pub current_price: Decimal,
    pub quantity: Decimal,
    pub evaluation_pct: Decimal,
}

/// Performance at one instant, relative to the baseline snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub balance: Decimal,
    pub cumulative_return_pct: Decimal,
    pub asset_evaluations: Vec<AssetEvaluation>,
    /// Quote change since the baseline, held assets only
    pub price_change_pct: BTreeMap<String, Decimal>,
    pub timestamp: i64,
}

impl ScoreRecord {
    pub fn evaluation(&self, asset_id: &str) -> Option<&AssetEvaluation> {
        self.asset_evaluations
            .iter()
            .find(|e| e.asset_id == asset_id)
    }

    pub fn price_change(&self, asset_id: &str) -> Option<Decimal> {
        self.price_change_pct.get(asset_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_builder_preserves_holding_order() {
        let snapshot = PortfolioSnapshot::new(dec!(100), 7)
            .with_holding("mango", dec!(10), dec!(1))
            .with_holding("apple", dec!(20), dec!(2))
            .with_quote("apple", dec!(21));

        let ids: Vec<&str> = snapshot
            .holdings
            .iter()
            .map(|h| h.asset_id.as_str())
            .collect();
        assert_eq!(ids, vec!["mango", "apple"]);
        assert_eq!(snapshot.quote("apple"), Some(dec!(21)));
        assert_eq!(snapshot.quote("mango"), None);
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let snapshot: PortfolioSnapshot = serde_json::from_str(r#"{"balance": "1000"}"#).unwrap();
        assert_eq!(snapshot.balance, dec!(1000));
        assert!(snapshot.holdings.is_empty());
        assert!(snapshot.quotes.is_empty());
        assert_eq!(snapshot.timestamp, 0);
    }
}
