use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a user able to authenticate against the HTTP API.
    ///
    /// The username is trimmed; the password is stored as given.
    pub async fn new_user(&self, username: &str, password: &str) -> ResultEngine<String> {
        let username = normalize_required_name(username, "user")?;
        if password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::Validation(format!(
                    "user already exists: {username}"
                )));
            }
            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password.to_string()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(username = %username, "user created");
            Ok(username)
        })
    }
}
