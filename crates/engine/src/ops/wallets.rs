use uuid::Uuid;

use sea_orm::{
    ActiveValue, Condition, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, NewWalletCmd, ResultEngine, Wallet, WalletPatch, transactions,
    util::{normalize_optional_text, normalize_required_name, validate_opening_balance},
    wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, wallet_id: Uuid, user_id: &str) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet_owned(&db_tx, wallet_id, user_id).await?;
            Wallet::try_from(model)
        })
    }

    /// Lists the user's wallets in creation order.
    pub async fn list_wallets(&self, user_id: &str) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            let models = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(wallets::Column::CreatedAt)
                .order_by_asc(wallets::Column::Id)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Wallet::try_from).collect()
        })
    }

    /// Add a new wallet with an opening balance.
    ///
    /// The opening balance is not a transaction: it is the base every later
    /// transaction effect is applied on.
    pub async fn new_wallet(&self, cmd: NewWalletCmd) -> ResultEngine<Wallet> {
        let name = normalize_required_name(&cmd.name, "wallet")?;
        validate_opening_balance(cmd.balance)?;
        let wallet = Wallet::new(
            cmd.user_id,
            name,
            normalize_optional_text(cmd.description.as_deref()),
            cmd.kind,
            cmd.payment_network,
            cmd.balance,
        );
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &wallet.user_id).await?;
            let model: wallets::ActiveModel = (&wallet).into();
            model.insert(&db_tx).await?;
            tracing::debug!(wallet_id = %wallet.id, user_id = %wallet.user_id, "wallet created");
            Ok(wallet)
        })
    }

    /// Updates wallet metadata and/or sets its balance directly.
    ///
    /// A direct balance edit replaces the stored balance; it does not touch
    /// any transaction.
    pub async fn update_wallet(
        &self,
        wallet_id: Uuid,
        user_id: &str,
        patch: WalletPatch,
    ) -> ResultEngine<Wallet> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "wallet"))
            .transpose()?;
        if let Some(balance) = patch.balance {
            validate_opening_balance(balance)?;
        }
        with_tx!(self, |db_tx| {
            let model = self.lock_wallet_owned(&db_tx, wallet_id, user_id).await?;
            let mut wallet = Wallet::try_from(model)?;
            if let Some(name) = name {
                wallet.name = name;
            }
            if let Some(description) = patch.description {
                wallet.description = normalize_optional_text(description.as_deref());
            }
            if let Some(kind) = patch.kind {
                wallet.kind = kind;
            }
            if let Some(network) = patch.payment_network {
                wallet.payment_network = network;
            }
            if let Some(balance) = patch.balance {
                wallet.balance = balance;
            }

            let active = wallets::ActiveModel {
                id: ActiveValue::Unchanged(wallet.id.to_string()),
                name: ActiveValue::Set(wallet.name.clone()),
                description: ActiveValue::Set(wallet.description.clone()),
                kind: ActiveValue::Set(wallet.kind.as_str().to_string()),
                payment_network: ActiveValue::Set(
                    wallet.payment_network.map(|n| n.as_str().to_string()),
                ),
                balance: ActiveValue::Set(wallet.balance.to_storage()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(wallet)
        })
    }

    /// Deletes a wallet that no transaction references.
    pub async fn delete_wallet(&self, wallet_id: Uuid, user_id: &str) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.lock_wallet_owned(&db_tx, wallet_id, user_id).await?;
            let referenced = transactions::Entity::find()
                .filter(
                    Condition::any()
                        .add(transactions::Column::WalletId.eq(wallet_id.to_string()))
                        .add(transactions::Column::InternalWalletId.eq(wallet_id.to_string())),
                )
                .count(&db_tx)
                .await?;
            if referenced > 0 {
                return Err(EngineError::Validation(
                    "wallet still has transactions".to_string(),
                ));
            }

            let wallet = Wallet::try_from(model)?;
            wallets::Entity::delete_by_id(wallet_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::debug!(wallet_id = %wallet_id, user_id, "wallet deleted");
            Ok(wallet)
        })
    }
}
