//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Money, PaymentNetwork, RecipientKind, TransactionKind, WalletKind};

/// Record a new transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: String,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    pub name: String,
    pub internal_wallet_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        name: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            wallet_id,
            kind,
            amount,
            name: name.into(),
            internal_wallet_id: None,
            recipient_id: None,
            description: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn internal_wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.internal_wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn recipient_id(mut self, recipient_id: Uuid) -> Self {
        self.recipient_id = Some(recipient_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Replace an existing transaction with a new intent.
///
/// Every field except `occurred_at` is a full replacement: the edited
/// transaction is exactly what the command describes.
#[derive(Clone, Debug)]
pub struct EditTransactionCmd {
    pub transaction_id: Uuid,
    pub user_id: String,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    pub name: String,
    pub internal_wallet_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub description: Option<String>,
    /// `None` keeps the stored date.
    pub occurred_at: Option<DateTime<Utc>>,
}

impl EditTransactionCmd {
    #[must_use]
    pub fn new(
        transaction_id: Uuid,
        user_id: impl Into<String>,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        name: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id,
            user_id: user_id.into(),
            wallet_id,
            kind,
            amount,
            name: name.into(),
            internal_wallet_id: None,
            recipient_id: None,
            description: None,
            occurred_at: None,
        }
    }

    #[must_use]
    pub fn internal_wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.internal_wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn recipient_id(mut self, recipient_id: Uuid) -> Self {
        self.recipient_id = Some(recipient_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}

/// Create a wallet.
#[derive(Clone, Debug)]
pub struct NewWalletCmd {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: WalletKind,
    pub payment_network: Option<PaymentNetwork>,
    pub balance: Money,
}

impl NewWalletCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, balance: Money) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            kind: WalletKind::default(),
            payment_network: None,
            balance,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: WalletKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn payment_network(mut self, network: PaymentNetwork) -> Self {
        self.payment_network = Some(network);
        self
    }
}

/// Partial wallet update. `None` leaves the field unchanged.
///
/// `description` and `payment_network` take `Some(None)` to clear the value.
#[derive(Clone, Debug, Default)]
pub struct WalletPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<WalletKind>,
    pub payment_network: Option<Option<PaymentNetwork>>,
    pub balance: Option<Money>,
}

impl WalletPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: WalletKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn payment_network(mut self, network: Option<PaymentNetwork>) -> Self {
        self.payment_network = Some(network);
        self
    }

    #[must_use]
    pub fn balance(mut self, balance: Money) -> Self {
        self.balance = Some(balance);
        self
    }
}

/// Create a recipient.
#[derive(Clone, Debug)]
pub struct NewRecipientCmd {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: RecipientKind,
}

impl NewRecipientCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, kind: RecipientKind) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            kind,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial recipient update. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default)]
pub struct RecipientPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<RecipientKind>,
}

impl RecipientPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: RecipientKind) -> Self {
        self.kind = Some(kind);
        self
    }
}
