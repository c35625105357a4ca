//! Output formatting module for CLI display
//!
//! Score records are computed by the library; this module only renders
//! them, as terminal tables or JSON.

use chrono::DateTime;
use colored::Colorize;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use scorecard::records::ScoreRecord;
use scorecard::utils::{format_amount, format_pct};

/// Format score records for JSON output
pub fn format_scores_json(records: &[ScoreRecord]) -> String {
    serde_json::to_string_pretty(records)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Timestamps are opaque; with `as_date` they are read as Unix seconds
pub fn format_timestamp(timestamp: i64, as_date: bool) -> String {
    if !as_date {
        return timestamp.to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn colored_pct(value: Decimal) -> String {
    let text = format_pct(value);
    if value > Decimal::ZERO {
        text.green().to_string()
    } else if value < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

/// One summary row per record, then the per-asset breakdown of the latest
pub fn format_scores_table(records: &[ScoreRecord], dates: bool) -> String {
    let Some(latest) = records.last() else {
        return format_empty_scores();
    };

    let mut output = String::new();
    output.push_str(&format!(
        "\n{} Score history ({} records)\n\n",
        "📈".cyan().bold(),
        records.len()
    ));

    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Timestamp")]
        timestamp: String,
        #[tabled(rename = "Balance")]
        balance: String,
        #[tabled(rename = "Holdings")]
        holdings: usize,
        #[tabled(rename = "Return %")]
        cumulative_return: String,
    }

    let rows: Vec<SummaryRow> = records
        .iter()
        .enumerate()
        .map(|(i, r)| SummaryRow {
            index: i,
            timestamp: format_timestamp(r.timestamp, dates),
            balance: format_amount(r.balance, 0),
            holdings: r.asset_evaluations.len(),
            cumulative_return: colored_pct(r.cumulative_return_pct),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');

    output.push_str(&format_record_detail(latest, dates));
    output
}

/// Per-asset breakdown of a single record
pub fn format_record_detail(record: &ScoreRecord, dates: bool) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{} Holdings at {}\n\n",
        "📊".cyan().bold(),
        format_timestamp(record.timestamp, dates)
    ));

    if record.asset_evaluations.is_empty() {
        output.push_str("  (no holdings)\n");
    } else {
        #[derive(Tabled)]
        struct AssetRow {
            #[tabled(rename = "Asset")]
            asset: String,
            #[tabled(rename = "Quantity")]
            quantity: String,
            #[tabled(rename = "Avg Price")]
            avg_price: String,
            #[tabled(rename = "Price")]
            price: String,
            #[tabled(rename = "Eval %")]
            evaluation: String,
            #[tabled(rename = "Change %")]
            price_change: String,
        }

        let rows: Vec<AssetRow> = record
            .asset_evaluations
            .iter()
            .map(|e| AssetRow {
                asset: e.asset_id.clone(),
                quantity: format_amount(e.quantity, 0),
                avg_price: format_amount(e.avg_buy_price, 0),
                price: format_amount(e.current_price, 0),
                evaluation: colored_pct(e.evaluation_pct),
                price_change: record
                    .price_change(&e.asset_id)
                    .map(colored_pct)
                    .unwrap_or_else(|| "N/A".to_string()),
            })
            .collect();

        let mut table = Table::new(&rows);
        table.with(Style::modern());
        table.modify(Columns::new(1..), Alignment::right());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&format!("\n{} Summary", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Balance:".bold(),
        format_amount(record.balance, 0)
    ));
    output.push_str(&format!(
        "\n{:<20} {}\n",
        "Cumulative Return:".bold(),
        colored_pct(record.cumulative_return_pct)
    ));
    output
}

/// Message for a replay that produced no records
pub fn format_empty_scores() -> String {
    format!(
        "{} No score records\nProvide at least one snapshot, e.g.: {} replay <file>\n",
        "ℹ".blue().bold(),
        "scorecard".bold()
    )
}
