use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    BalanceEffect, BalanceSheet, Counterparty, EditTransactionCmd, Money, NewTransactionCmd,
    ResultEngine, Transaction, transactions, transactions::validate_shape,
    util::{normalize_optional_text, normalize_required_name},
    wallets,
};

use super::super::{Engine, with_tx};

impl Engine {
    /// Records a new transaction and applies its balance effect.
    ///
    /// Debit-like kinds (`Expense`, `Transfer`) require the primary wallet to
    /// hold at least `amount`. The wallet rows and the transaction row are
    /// written in one database transaction.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let counterparty = Counterparty::from_parts(cmd.internal_wallet_id, cmd.recipient_id)?;
        with_tx!(self, |db_tx| {
            let mut sheet = BalanceSheet::new();
            self.stage_wallet(&db_tx, &mut sheet, cmd.wallet_id, &cmd.user_id)
                .await?;
            let tx = Transaction::new(
                cmd.user_id,
                cmd.wallet_id,
                cmd.kind,
                cmd.amount,
                counterparty,
                &cmd.name,
                normalize_optional_text(cmd.description.as_deref()),
                cmd.occurred_at,
            )?;
            self.stage_apply(&db_tx, &mut sheet, &tx).await?;
            self.persist_balances(&db_tx, &sheet).await?;

            let model: transactions::ActiveModel = (&tx).into();
            model.insert(&db_tx).await?;
            tracing::debug!(
                transaction_id = %tx.id,
                wallet_id = %tx.wallet_id,
                kind = tx.kind.as_str(),
                amount = %tx.amount,
                "transaction created"
            );
            Ok(tx)
        })
    }

    /// Replaces a stored transaction with a new intent.
    ///
    /// The stored effect is reversed first, then the new one is applied
    /// against the post-reversal balances. If the new intent fails any check
    /// nothing is written.
    pub async fn edit_transaction(&self, cmd: EditTransactionCmd) -> ResultEngine<Transaction> {
        let counterparty = Counterparty::from_parts(cmd.internal_wallet_id, cmd.recipient_id)?;
        let name = normalize_required_name(&cmd.name, "transaction")?;
        let user_id = cmd.user_id.as_str();
        with_tx!(self, |db_tx| {
            let stored = self
                .require_transaction_owned(&db_tx, cmd.transaction_id, user_id)
                .await?;
            let stored = Transaction::try_from(stored)?;

            let mut sheet = BalanceSheet::new();
            self.stage_reverse(&db_tx, &mut sheet, &stored).await?;

            self.stage_wallet(&db_tx, &mut sheet, cmd.wallet_id, user_id)
                .await?;
            validate_shape(cmd.wallet_id, cmd.kind, cmd.amount, counterparty)?;
            let edited = Transaction {
                wallet_id: cmd.wallet_id,
                kind: cmd.kind,
                amount: cmd.amount,
                counterparty,
                name,
                description: normalize_optional_text(cmd.description.as_deref()),
                occurred_at: cmd.occurred_at.unwrap_or(stored.occurred_at),
                updated_at: Utc::now(),
                ..stored.clone()
            };
            self.stage_apply(&db_tx, &mut sheet, &edited).await?;
            self.persist_balances(&db_tx, &sheet).await?;

            let mut model: transactions::ActiveModel = (&edited).into();
            model.id = ActiveValue::Unchanged(edited.id.to_string());
            model.user_id = ActiveValue::Unchanged(edited.user_id.clone());
            model.created_at = ActiveValue::Unchanged(edited.created_at);
            model.update(&db_tx).await?;
            tracing::debug!(
                transaction_id = %edited.id,
                from_amount = %stored.amount,
                to_amount = %edited.amount,
                "transaction edited"
            );
            Ok(edited)
        })
    }

    /// Reverses a stored transaction's effect and removes it.
    ///
    /// Never fails for lack of balance. Returns the deleted transaction.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let stored = self
                .require_transaction_owned(&db_tx, transaction_id, user_id)
                .await?;
            let stored = Transaction::try_from(stored)?;

            let mut sheet = BalanceSheet::new();
            self.stage_reverse(&db_tx, &mut sheet, &stored).await?;
            self.persist_balances(&db_tx, &sheet).await?;

            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::debug!(transaction_id = %stored.id, "transaction deleted");
            Ok(stored)
        })
    }

    /// Locks an owned wallet and registers its balance in `sheet`.
    async fn stage_wallet(
        &self,
        db_tx: &DatabaseTransaction,
        sheet: &mut BalanceSheet,
        wallet_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        if sheet.contains(wallet_id) {
            return Ok(());
        }
        let model = self.lock_wallet_owned(db_tx, wallet_id, user_id).await?;
        sheet.load(wallet_id, Money::from_storage(&model.balance)?);
        Ok(())
    }

    async fn stage_apply(
        &self,
        db_tx: &DatabaseTransaction,
        sheet: &mut BalanceSheet,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        if let Counterparty::Recipient(recipient_id) = tx.counterparty {
            self.require_recipient_owned(db_tx, recipient_id, &tx.user_id)
                .await?;
        }
        let effect = BalanceEffect::from_transaction(tx);
        for wallet_id in effect.wallet_ids() {
            self.stage_wallet(db_tx, sheet, wallet_id, &tx.user_id)
                .await?;
        }
        sheet.apply(&effect)
    }

    async fn stage_reverse(
        &self,
        db_tx: &DatabaseTransaction,
        sheet: &mut BalanceSheet,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        let effect = BalanceEffect::from_transaction(tx);
        for wallet_id in effect.wallet_ids() {
            self.stage_wallet(db_tx, sheet, wallet_id, &tx.user_id)
                .await?;
        }
        sheet.reverse(&effect)
    }

    async fn persist_balances(
        &self,
        db_tx: &DatabaseTransaction,
        sheet: &BalanceSheet,
    ) -> ResultEngine<()> {
        for (wallet_id, balance) in sheet.iter() {
            let active = wallets::ActiveModel {
                id: ActiveValue::Unchanged(wallet_id.to_string()),
                balance: ActiveValue::Set(balance.to_storage()),
                ..Default::default()
            };
            active.update(db_tx).await?;
        }
        Ok(())
    }
}
