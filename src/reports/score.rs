use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Result, ScoreError};
use crate::records::{AssetEvaluation, PortfolioSnapshot, ScoreRecord};
use crate::utils::{round_pct, Precision};

/// Cash plus every holding valued at the snapshot's own quotes.
///
/// A holding without a quote contributes nothing; assets that are quoted
/// but not held never contribute. Fails with [`ScoreError::Overflow`] when
/// the sum leaves the `Decimal` range.
pub fn total_value(snapshot: &PortfolioSnapshot) -> Result<Decimal> {
    snapshot.holdings.iter().try_fold(snapshot.balance, |acc, h| {
        let price = snapshot.quote(&h.asset_id).unwrap_or(Decimal::ZERO);
        h.quantity
            .checked_mul(price)
            .and_then(|value| acc.checked_add(value))
            .ok_or_else(|| overflow(format!("value of '{}'", h.asset_id)))
    })
}

fn overflow(figure: String) -> ScoreError {
    ScoreError::Overflow { figure }
}

/// Score `current` against `baseline`.
///
/// Total value on each side uses that side's own quotes. Per-asset figures
/// follow `current.holdings` in order; the baseline only supplies starting
/// quotes. An asset the baseline never quoted starts at its current price,
/// so its price change reads as 0%.
///
/// Fails with [`ScoreError::MissingQuote`] when a current holding has no
/// quote in `current.quotes`, and with [`ScoreError::Overflow`] when a
/// value or percentage does not fit in a `Decimal`.
pub fn compute_score(
    baseline: &PortfolioSnapshot,
    current: &PortfolioSnapshot,
    precision: Precision,
) -> Result<ScoreRecord> {
    let start_value = total_value(baseline)?;
    let end_value = total_value(current)?;
    let cumulative_return_pct = round_pct(start_value, end_value, precision)
        .ok_or_else(|| overflow("cumulative return".to_string()))?;

    let mut asset_evaluations = Vec::with_capacity(current.holdings.len());
    let mut price_change_pct = BTreeMap::new();

    for holding in &current.holdings {
        let asset_id = &holding.asset_id;
        let current_price = current
            .quote(asset_id)
            .ok_or_else(|| ScoreError::MissingQuote {
                asset_id: asset_id.clone(),
            })?;

        let evaluation_pct = round_pct(holding.avg_buy_price, current_price, precision)
            .ok_or_else(|| overflow(format!("evaluation of '{}'", asset_id)))?;
        asset_evaluations.push(AssetEvaluation {
            asset_id: asset_id.clone(),
            avg_buy_price: holding.avg_buy_price,
            current_price,
            quantity: holding.quantity,
            evaluation_pct,
        });

        let start_price = baseline.quote(asset_id).unwrap_or(current_price);
        let change = round_pct(start_price, current_price, precision)
            .ok_or_else(|| overflow(format!("price change of '{}'", asset_id)))?;
        price_change_pct.insert(asset_id.clone(), change);
    }

    debug!(
        "Scored snapshot at {}: start value {}, end value {}, return {}%",
        current.timestamp, start_value, end_value, cumulative_return_pct
    );

    Ok(ScoreRecord {
        balance: current.balance,
        cumulative_return_pct,
        asset_evaluations,
        price_change_pct,
        timestamp: current.timestamp,
    })
}
