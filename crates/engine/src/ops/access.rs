use sea_orm::{DatabaseTransaction, QueryFilter, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, recipients, transactions, users, wallets};

use super::Engine;

/// Generates a `require_*` method returning the model of a user-owned row.
///
/// Rows owned by someone else are reported exactly like missing rows.
macro_rules! impl_require_owned {
    ($require_fn:ident, $entity:path, $model:path, $user_col:expr, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .filter($user_col.eq(user_id.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_owned!(
        require_recipient_owned,
        recipients::Entity,
        recipients::Model,
        recipients::Column::UserId,
        "recipient not exists"
    );

    impl_require_owned!(
        require_transaction_owned,
        transactions::Entity,
        transactions::Model,
        transactions::Column::UserId,
        "transaction not exists"
    );

    impl_require_owned!(
        require_wallet_owned,
        wallets::Entity,
        wallets::Model,
        wallets::Column::UserId,
        "wallet not exists"
    );

    /// Same as `require_wallet_owned`, but locks the row for the rest of the
    /// database transaction. Used before reading a balance that will be
    /// written back.
    pub(super) async fn lock_wallet_owned(
        &self,
        db: &DatabaseTransaction,
        wallet_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<wallets::Model> {
        wallets::Entity::find_by_id(wallet_id.to_string())
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .lock_exclusive()
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }
}
