//! Transaction primitives.
//!
//! A `Transaction` is a recorded money movement filed under a primary wallet.
//! Its effect on balances is derived from its kind, amount and counterparty
//! (see [`BalanceEffect`](crate::BalanceEffect)).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    util::{normalize_required_name, parse_uuid},
};

pub(crate) const BOTH_COUNTERPARTIES: &str = "Only provide either Wallet or Recipient";
pub(crate) const MISSING_COUNTERPARTY: &str = "Either Wallet or Recipient required";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "EXPENSE",
            Self::Income => "INCOME",
            Self::Transfer => "TRANSFER",
        }
    }

    /// Whether the primary wallet loses money.
    pub fn is_debit(self) -> bool {
        matches!(self, Self::Expense | Self::Transfer)
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "EXPENSE" => Ok(Self::Expense),
            "INCOME" => Ok(Self::Income),
            "TRANSFER" => Ok(Self::Transfer),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// The other side of a transaction.
///
/// Storage and the HTTP API carry two nullable ids; the engine only deals
/// with this enum so that "both set" cannot be represented past the boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Counterparty {
    #[default]
    None,
    /// Another wallet of the same user, moved opposite to the primary one.
    Wallet(Uuid),
    /// An external biller or peer.
    Recipient(Uuid),
}

impl Counterparty {
    /// Builds a counterparty out of the two optional references.
    pub fn from_parts(
        internal_wallet_id: Option<Uuid>,
        recipient_id: Option<Uuid>,
    ) -> ResultEngine<Self> {
        match (internal_wallet_id, recipient_id) {
            (Some(_), Some(_)) => Err(EngineError::Validation(BOTH_COUNTERPARTIES.to_string())),
            (Some(wallet_id), None) => Ok(Self::Wallet(wallet_id)),
            (None, Some(recipient_id)) => Ok(Self::Recipient(recipient_id)),
            (None, None) => Ok(Self::None),
        }
    }

    pub fn internal_wallet(self) -> Option<Uuid> {
        match self {
            Self::Wallet(id) => Some(id),
            _ => None,
        }
    }

    pub fn recipient(self) -> Option<Uuid> {
        match self {
            Self::Recipient(id) => Some(id),
            _ => None,
        }
    }
}

/// Checks the kind/counterparty combination and the amount sign.
///
/// - transfers need exactly one counterparty
/// - only transfers may name an internal wallet, and it must not be the
///   primary wallet
pub(crate) fn validate_shape(
    wallet_id: Uuid,
    kind: TransactionKind,
    amount: Money,
    counterparty: Counterparty,
) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    match (kind, counterparty) {
        (TransactionKind::Transfer, Counterparty::None) => {
            Err(EngineError::Validation(MISSING_COUNTERPARTY.to_string()))
        }
        (TransactionKind::Transfer, Counterparty::Wallet(internal)) if internal == wallet_id => Err(
            EngineError::Validation("wallet and internal wallet must differ".to_string()),
        ),
        (TransactionKind::Expense | TransactionKind::Income, Counterparty::Wallet(_)) => {
            Err(EngineError::Validation(
                "internal wallet is only allowed on transfers".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    pub counterparty: Counterparty,
    /// Short title shown in listings; trimmed and never empty.
    pub name: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: String,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        counterparty: Counterparty,
        name: &str,
        description: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        validate_shape(wallet_id, kind, amount, counterparty)?;
        let name = normalize_required_name(name, "transaction")?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            wallet_id,
            kind,
            amount,
            counterparty,
            name,
            description,
            occurred_at,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub kind: String,
    pub amount: String,
    pub internal_wallet_id: Option<String>,
    pub recipient_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount: ActiveValue::Set(tx.amount.to_storage()),
            internal_wallet_id: ActiveValue::Set(
                tx.counterparty.internal_wallet().map(|id| id.to_string()),
            ),
            recipient_id: ActiveValue::Set(tx.counterparty.recipient().map(|id| id.to_string())),
            name: ActiveValue::Set(tx.name.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let internal_wallet_id = model
            .internal_wallet_id
            .as_deref()
            .map(|id| parse_uuid(id, "wallet"))
            .transpose()?;
        let recipient_id = model
            .recipient_id
            .as_deref()
            .map(|id| parse_uuid(id, "recipient"))
            .transpose()?;
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            user_id: model.user_id,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: Money::from_storage(&model.amount)?,
            counterparty: Counterparty::from_parts(internal_wallet_id, recipient_id)?,
            name: model.name,
            description: model.description,
            occurred_at: model.occurred_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
