//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

/// What kind of money container a wallet represents.
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

impl WalletKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Savings => "SAVINGS",
            Self::Credit => "CREDIT",
            Self::Cash => "CASH",
            Self::EWallet => "E_WALLET",
            Self::Investment => "INVESTMENT",
        }
    }
}

impl TryFrom<&str> for WalletKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "SAVINGS" => Ok(Self::Savings),
            "CREDIT" => Ok(Self::Credit),
            "CASH" => Ok(Self::Cash),
            "E_WALLET" => Ok(Self::EWallet),
            "INVESTMENT" => Ok(Self::Investment),
            other => Err(EngineError::Validation(format!(
                "invalid wallet kind: {other}"
            ))),
        }
    }
}

/// Card network printed on a wallet backed by a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentNetwork {
    Mastercard,
    Visa,
    Jcb,
    Amex,
}

impl PaymentNetwork {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mastercard => "MASTERCARD",
            Self::Visa => "VISA",
            Self::Jcb => "JCB",
            Self::Amex => "AMEX",
        }
    }
}

impl TryFrom<&str> for PaymentNetwork {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "MASTERCARD" => Ok(Self::Mastercard),
            "VISA" => Ok(Self::Visa),
            "JCB" => Ok(Self::Jcb),
            "AMEX" => Ok(Self::Amex),
            other => Err(EngineError::Validation(format!(
                "invalid payment network: {other}"
            ))),
        }
    }
}

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account, a card or
/// anything else where money are kept. Applying a debit and setting the
/// balance by hand both refuse to go below zero; reversing or deleting a
/// transaction may still leave the balance negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable identifier for this wallet.
    pub id: Uuid,
    /// Username of the owner.
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: WalletKind,
    pub payment_network: Option<PaymentNetwork>,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(
        user_id: String,
        name: String,
        description: Option<String>,
        kind: WalletKind,
        payment_network: Option<PaymentNetwork>,
        balance: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            kind,
            payment_network,
            balance,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub payment_network: Option<String>,
    pub balance: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            payment_network: ActiveValue::Set(
                value.payment_network.map(|n| n.as_str().to_string()),
            ),
            balance: ActiveValue::Set(value.balance.to_storage()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            kind: WalletKind::try_from(model.kind.as_str())?,
            payment_network: model
                .payment_network
                .as_deref()
                .map(PaymentNetwork::try_from)
                .transpose()?,
            balance: Money::from_storage(&model.balance)?,
            created_at: model.created_at,
        })
    }
}
