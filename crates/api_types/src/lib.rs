use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Tells a missing field (`None`) apart from an explicit `null`
/// (`Some(None)`). Use with `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum WalletKind {
        Savings,
        Credit,
        #[default]
        Cash,
        EWallet,
        Investment,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum PaymentNetwork {
        Mastercard,
        Visa,
        Jcb,
        Amex,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        pub description: Option<String>,
        #[serde(default)]
        pub kind: WalletKind,
        pub payment_network: Option<PaymentNetwork>,
        /// Opening balance, decimal string (`"120.50"`). Must be >= 0.
        pub balance: Decimal,
    }

    /// Partial update. Absent fields are left unchanged; `null` clears
    /// `description` and `payment_network`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WalletUpdate {
        pub name: Option<String>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        pub kind: Option<WalletKind>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub payment_network: Option<Option<PaymentNetwork>>,
        /// Sets the balance directly, bypassing transactions.
        pub balance: Option<Decimal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub kind: WalletKind,
        pub payment_network: Option<PaymentNetwork>,
        pub balance: Decimal,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletsResponse {
        pub wallets: Vec<WalletView>,
    }
}

pub mod recipient {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum RecipientKind {
        Biller,
        Peer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientNew {
        pub name: String,
        pub description: Option<String>,
        pub kind: RecipientKind,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecipientUpdate {
        pub name: Option<String>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        pub kind: Option<RecipientKind>,
    }

    /// Query string of `GET /recipients`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecipientList {
        pub kind: Option<RecipientKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub kind: RecipientKind,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientsResponse {
        pub recipients: Vec<RecipientView>,
    }
}

pub mod stats {
    use super::*;

    /// Query string of `GET /stats`. `from` inclusive, `to` exclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatisticQuery {
        pub from: Option<DateTime<FixedOffset>>,
        pub to: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub total_balance: Decimal,
        pub wallet_count: u64,
        pub total_income: Decimal,
        pub total_expenses: Decimal,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionKind {
        Expense,
        Income,
        Transfer,
    }

    /// Body of `POST /transactions`.
    ///
    /// At most one of `internal_wallet_id` and `recipient_id` may be set;
    /// transfers need exactly one.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub wallet_id: Uuid,
        pub kind: TransactionKind,
        /// Decimal string, must be > 0.
        pub amount: Decimal,
        pub internal_wallet_id: Option<Uuid>,
        pub recipient_id: Option<Uuid>,
        /// Short title, must not be blank.
        pub name: String,
        pub description: Option<String>,
        /// RFC3339 timestamp, including timezone offset. Defaults to now.
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    /// Body of `PATCH /transactions/{id}`.
    ///
    /// Replaces the transaction; only `occurred_at` is kept when absent.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub wallet_id: Uuid,
        pub kind: TransactionKind,
        pub amount: Decimal,
        pub internal_wallet_id: Option<Uuid>,
        pub recipient_id: Option<Uuid>,
        /// Short title, must not be blank.
        pub name: String,
        pub description: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    /// Body of `POST /transactions/list`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        /// Only transactions moving this wallet (as primary or internal
        /// counterparty).
        pub wallet_id: Option<Uuid>,
        pub from: Option<DateTime<FixedOffset>>,
        pub to: Option<DateTime<FixedOffset>>,
        pub kinds: Option<Vec<TransactionKind>>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub wallet_name: Option<String>,
        pub kind: TransactionKind,
        pub amount: Decimal,
        pub internal_wallet_id: Option<Uuid>,
        pub internal_wallet_name: Option<String>,
        pub recipient_id: Option<Uuid>,
        pub recipient_name: Option<String>,
        pub name: String,
        pub description: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn amounts_travel_as_strings() {
        let json = r#"{"name":"Card","balance":"120.50","kind":"E_WALLET"}"#;
        let wallet: wallet::WalletNew = serde_json::from_str(json).unwrap();
        assert_eq!(wallet.balance, dec!(120.50));
        assert_eq!(wallet.kind, wallet::WalletKind::EWallet);

        let stat = stats::Statistic {
            total_balance: dec!(10.25),
            wallet_count: 1,
            total_income: dec!(0),
            total_expenses: dec!(0),
        };
        let out = serde_json::to_value(&stat).unwrap();
        assert_eq!(out["total_balance"], "10.25");
    }

    #[test]
    fn update_tells_null_from_missing() {
        let cleared: wallet::WalletUpdate =
            serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.payment_network, None);

        let set: wallet::WalletUpdate =
            serde_json::from_str(r#"{"payment_network":"VISA"}"#).unwrap();
        assert_eq!(
            set.payment_network,
            Some(Some(wallet::PaymentNetwork::Visa))
        );
    }

    #[test]
    fn transaction_new_requires_name() {
        let json = r#"{"wallet_id":"67e55044-10b1-426f-9247-bb680e5fe0c8","kind":"EXPENSE","amount":"12.5","name":"Lunch"}"#;
        let tx: transaction::TransactionNew = serde_json::from_str(json).unwrap();
        assert_eq!(tx.name, "Lunch");
        assert_eq!(tx.amount, dec!(12.5));
        assert_eq!(tx.occurred_at, None);

        let missing = r#"{"wallet_id":"67e55044-10b1-426f-9247-bb680e5fe0c8","kind":"EXPENSE","amount":"12.5"}"#;
        assert!(serde_json::from_str::<transaction::TransactionNew>(missing).is_err());
    }
}
