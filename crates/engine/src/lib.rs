pub use commands::{
    EditTransactionCmd, NewRecipientCmd, NewTransactionCmd, NewWalletCmd, RecipientPatch,
    WalletPatch,
};
pub use effects::{BalanceEffect, BalanceSheet};
pub use error::EngineError;
pub use money::Money;
pub use ops::{
    Engine, EngineBuilder, Statistics, TransactionListFilter, TransactionRow, TransactionsPage,
};
pub use recipients::{Recipient, RecipientKind};
pub use transactions::{Counterparty, Transaction, TransactionKind};
pub use wallets::{PaymentNetwork, Wallet, WalletKind};

mod commands;
mod effects;
mod error;
mod money;
mod ops;
mod recipients;
mod transactions;
mod users;
mod util;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
