use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Counterparty, EngineError, Money, ResultEngine, Transaction, TransactionKind, transactions,
    wallets,
};

use super::{Engine, transactions::validate_list_filter, with_tx};

const TOTAL_OVERFLOW: &str = "total out of range";

fn accumulate(total: &mut Money, amount: Money) -> ResultEngine<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| EngineError::Validation(TOTAL_OVERFLOW.to_string()))?;
    Ok(())
}

/// User totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Sum of every wallet balance.
    pub total_balance: Money,
    pub wallet_count: u64,
    /// Sum of `Income` transactions in range.
    pub total_income: Money,
    /// Sum of `Expense` transactions and transfers paid to a recipient, in
    /// range.
    pub total_expenses: Money,
}

impl Engine {
    /// Returns balance and income/expense totals for a user.
    ///
    /// Internal wallet-to-wallet transfers are excluded from income/expense
    /// totals. Amounts are stored as decimal text, so totals are summed here
    /// rather than in SQL.
    pub async fn statistics(
        &self,
        user_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<Statistics> {
        validate_list_filter(from, to)?;
        with_tx!(self, |db_tx| {
            let wallet_models = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            let mut total_balance = Money::ZERO;
            for model in &wallet_models {
                accumulate(&mut total_balance, Money::from_storage(&model.balance)?)?;
            }

            let mut query =
                transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id.to_string()));
            if let Some(from) = from {
                query = query.filter(transactions::Column::OccurredAt.gte(from));
            }
            if let Some(to) = to {
                query = query.filter(transactions::Column::OccurredAt.lt(to));
            }

            let mut total_income = Money::ZERO;
            let mut total_expenses = Money::ZERO;
            for model in query.all(&db_tx).await? {
                let tx = Transaction::try_from(model)?;
                match (tx.kind, tx.counterparty) {
                    (TransactionKind::Income, _) => accumulate(&mut total_income, tx.amount)?,
                    (TransactionKind::Expense, _)
                    | (TransactionKind::Transfer, Counterparty::Recipient(_)) => {
                        accumulate(&mut total_expenses, tx.amount)?;
                    }
                    (TransactionKind::Transfer, _) => {}
                }
            }

            Ok(Statistics {
                total_balance,
                wallet_count: wallet_models.len() as u64,
                total_income,
                total_expenses,
            })
        })
    }
}
