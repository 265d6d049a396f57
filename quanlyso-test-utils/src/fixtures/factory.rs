//! Entity factories with fixed test values.

use chrono::{DateTime, Utc};
use quanlyso::model::{
    Channel, Code, CostFactor, Factor, Style, TransactionDetails, Transactions, Types,
};

pub fn mock_channel(id: i64, name: &str, open_day: &str) -> Channel {
    Channel {
        id: Some(id),
        name: Some(name.to_string()),
        code: Some(format!("CH{id}")),
        open_day: Some(open_day.to_string()),
    }
}

pub fn mock_code(id: i64, channels_id: i64) -> Code {
    Code {
        id: Some(id),
        code: Some("12345".to_string()),
        open_date: Some(open_date()),
        channels_id: Some(channels_id),
        channels_name: None,
    }
}

pub fn mock_factor(id: i64, name: &str) -> Factor {
    Factor {
        id: Some(id),
        name: Some(name.to_string()),
    }
}

pub fn mock_style(id: i64, name: &str) -> Style {
    Style {
        id: Some(id),
        name: Some(name.to_string()),
    }
}

pub fn mock_types(id: i64, name: &str) -> Types {
    Types {
        id: Some(id),
        name: Some(name.to_string()),
    }
}

/// A cost factor referencing style `styles_id`, without its style name.
pub fn mock_cost_factor(id: i64, styles_id: i64) -> CostFactor {
    CostFactor {
        id: Some(id),
        rate: Some(0.75),
        factors_id: Some(1),
        styles_id: Some(styles_id),
        styles_name: None,
        types_id: Some(1),
    }
}

pub fn mock_transaction_details(amount: f64) -> TransactionDetails {
    TransactionDetails {
        amount: Some(amount),
        channels_id: Some(1),
        factors_id: Some(1),
        styles_id: Some(1),
        types_id: Some(1),
        ..Default::default()
    }
}

/// A saved transaction for client `clients_id` with `lines` line items.
pub fn mock_transactions(id: i64, clients_id: i64, lines: usize) -> Transactions {
    Transactions {
        id: Some(id),
        chosen_number: Some(27),
        open_date: Some(open_date()),
        net_value: None,
        transaction_details_id: None,
        clients_id: Some(clients_id),
        clients_name: None,
        transaction_details_dtos: (0..lines)
            .map(|i| mock_transaction_details(10.0 * (i + 1) as f64))
            .collect(),
    }
}

/// Saturday 2017-06-17, midnight UTC.
pub fn open_date() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2017-06-17T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}
