use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, recipients, transactions, wallets,
};

use super::super::{Engine, with_tx};

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, acts as an allow-list of kinds to return.
    pub kinds: Option<Vec<TransactionKind>>,
}

/// A transaction joined with the names of everything it references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub transaction: Transaction,
    pub wallet_name: String,
    pub internal_wallet_name: Option<String>,
    pub recipient_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionsPage {
    pub items: Vec<TransactionRow>,
    /// Opaque cursor for the next (older) page, `None` on the last page.
    pub next_cursor: Option<String>,
}

pub(crate) fn validate_list_filter(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from >= to
    {
        return Err(EngineError::Validation(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lt(to));
        }
        if let Some(kinds) = &filter.kinds {
            let kinds: Vec<String> = kinds.iter().map(|k| k.as_str().to_string()).collect();
            self = self.filter(transactions::Column::Kind.is_in(kinds));
        }
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    occurred_at: DateTime<Utc>,
    transaction_id: String,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }
}

impl Engine {
    /// Returns one transaction with its wallet and recipient names.
    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<TransactionRow> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, transaction_id, user_id)
                .await?;
            let tx = Transaction::try_from(model)?;
            let mut rows = self.join_names(&db_tx, user_id, vec![tx]).await?;
            rows.pop()
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
        })
    }

    /// Lists the user's transactions, newest first, with cursor-based
    /// pagination.
    ///
    /// Pagination is newest → older by `(occurred_at DESC, transaction_id
    /// DESC)`.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<TransactionsPage> {
        with_tx!(self, |db_tx| {
            self.list_page(&db_tx, user_id, None, limit, cursor, filter)
                .await
        })
    }

    /// Lists transactions that move a given wallet, either as primary wallet
    /// or as internal counterparty of a transfer.
    pub async fn list_transactions_for_wallet(
        &self,
        wallet_id: Uuid,
        user_id: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<TransactionsPage> {
        with_tx!(self, |db_tx| {
            self.require_wallet_owned(&db_tx, wallet_id, user_id)
                .await?;
            self.list_page(&db_tx, user_id, Some(wallet_id), limit, cursor, filter)
                .await
        })
    }

    async fn list_page(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        wallet_id: Option<Uuid>,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<TransactionsPage> {
        validate_list_filter(filter.from, filter.to)?;
        if filter.kinds.as_ref().is_some_and(|k| k.is_empty()) {
            return Err(EngineError::Validation(
                "kinds must not be empty".to_string(),
            ));
        }
        if limit == 0 {
            return Err(EngineError::Validation("limit must be > 0".to_string()));
        }

        let limit_plus_one = limit.saturating_add(1);
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit_plus_one);

        if let Some(wallet_id) = wallet_id {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::WalletId.eq(wallet_id.to_string()))
                    .add(transactions::Column::InternalWalletId.eq(wallet_id.to_string())),
            );
        }
        if let Some(cursor) = cursor {
            let cursor = TransactionsCursor::decode(cursor)?;
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::OccurredAt.lt(cursor.occurred_at))
                    .add(
                        Condition::all()
                            .add(transactions::Column::OccurredAt.eq(cursor.occurred_at))
                            .add(transactions::Column::Id.lt(cursor.transaction_id)),
                    ),
            );
        }
        query = query.apply_tx_filters(filter);

        let rows: Vec<transactions::Model> = query.all(db_tx).await?;
        let has_more = rows.len() > limit as usize;

        let mut out: Vec<Transaction> = Vec::with_capacity(rows.len().min(limit as usize));
        for tx_model in rows.into_iter().take(limit as usize) {
            out.push(Transaction::try_from(tx_model)?);
        }

        let next_cursor = out.last().map(|tx| TransactionsCursor {
            occurred_at: tx.occurred_at,
            transaction_id: tx.id.to_string(),
        });
        let next_cursor = if has_more {
            next_cursor.map(|c| c.encode()).transpose()?
        } else {
            None
        };

        let items = self.join_names(db_tx, user_id, out).await?;
        Ok(TransactionsPage { items, next_cursor })
    }

    /// Attaches wallet and recipient names to a batch of transactions.
    async fn join_names(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        txs: Vec<Transaction>,
    ) -> ResultEngine<Vec<TransactionRow>> {
        let mut wallet_ids: HashSet<String> = HashSet::new();
        let mut recipient_ids: HashSet<String> = HashSet::new();
        for tx in &txs {
            wallet_ids.insert(tx.wallet_id.to_string());
            if let Some(id) = tx.counterparty.internal_wallet() {
                wallet_ids.insert(id.to_string());
            }
            if let Some(id) = tx.counterparty.recipient() {
                recipient_ids.insert(id.to_string());
            }
        }

        let wallet_names: HashMap<String, String> = if wallet_ids.is_empty() {
            HashMap::new()
        } else {
            wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .filter(wallets::Column::Id.is_in(wallet_ids))
                .all(db_tx)
                .await?
                .into_iter()
                .map(|m| (m.id, m.name))
                .collect()
        };
        let recipient_names: HashMap<String, String> = if recipient_ids.is_empty() {
            HashMap::new()
        } else {
            recipients::Entity::find()
                .filter(recipients::Column::UserId.eq(user_id.to_string()))
                .filter(recipients::Column::Id.is_in(recipient_ids))
                .all(db_tx)
                .await?
                .into_iter()
                .map(|m| (m.id, m.name))
                .collect()
        };

        Ok(txs
            .into_iter()
            .map(|tx| TransactionRow {
                wallet_name: wallet_names
                    .get(&tx.wallet_id.to_string())
                    .cloned()
                    .unwrap_or_default(),
                internal_wallet_name: tx
                    .counterparty
                    .internal_wallet()
                    .and_then(|id| wallet_names.get(&id.to_string()).cloned()),
                recipient_name: tx
                    .counterparty
                    .recipient()
                    .and_then(|id| recipient_names.get(&id.to_string()).cloned()),
                transaction: tx,
            })
            .collect())
    }
}
