use uuid::Uuid;

use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, NewRecipientCmd, Recipient, RecipientKind, RecipientPatch, ResultEngine,
    recipients, transactions,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn recipient(&self, recipient_id: Uuid, user_id: &str) -> ResultEngine<Recipient> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_recipient_owned(&db_tx, recipient_id, user_id)
                .await?;
            Recipient::try_from(model)
        })
    }

    /// Lists the user's recipients in creation order, optionally only one kind
    /// (peers or billers).
    pub async fn list_recipients(
        &self,
        user_id: &str,
        kind: Option<RecipientKind>,
    ) -> ResultEngine<Vec<Recipient>> {
        with_tx!(self, |db_tx| {
            let mut query =
                recipients::Entity::find().filter(recipients::Column::UserId.eq(user_id.to_string()));
            if let Some(kind) = kind {
                query = query.filter(recipients::Column::Kind.eq(kind.as_str()));
            }
            let models = query
                .order_by_asc(recipients::Column::CreatedAt)
                .order_by_asc(recipients::Column::Id)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Recipient::try_from).collect()
        })
    }

    pub async fn new_recipient(&self, cmd: NewRecipientCmd) -> ResultEngine<Recipient> {
        let name = normalize_required_name(&cmd.name, "recipient")?;
        let recipient = Recipient::new(
            cmd.user_id,
            name,
            normalize_optional_text(cmd.description.as_deref()),
            cmd.kind,
        );
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &recipient.user_id).await?;
            let model: recipients::ActiveModel = (&recipient).into();
            model.insert(&db_tx).await?;
            tracing::debug!(recipient_id = %recipient.id, user_id = %recipient.user_id, "recipient created");
            Ok(recipient)
        })
    }

    pub async fn update_recipient(
        &self,
        recipient_id: Uuid,
        user_id: &str,
        patch: RecipientPatch,
    ) -> ResultEngine<Recipient> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "recipient"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_recipient_owned(&db_tx, recipient_id, user_id)
                .await?;
            let mut recipient = Recipient::try_from(model)?;
            if let Some(name) = name {
                recipient.name = name;
            }
            if let Some(description) = patch.description {
                recipient.description = normalize_optional_text(description.as_deref());
            }
            if let Some(kind) = patch.kind {
                recipient.kind = kind;
            }

            let active = recipients::ActiveModel {
                id: ActiveValue::Unchanged(recipient.id.to_string()),
                name: ActiveValue::Set(recipient.name.clone()),
                description: ActiveValue::Set(recipient.description.clone()),
                kind: ActiveValue::Set(recipient.kind.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(recipient)
        })
    }

    /// Deletes a recipient that no transaction references.
    pub async fn delete_recipient(
        &self,
        recipient_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Recipient> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_recipient_owned(&db_tx, recipient_id, user_id)
                .await?;
            let referenced = transactions::Entity::find()
                .filter(transactions::Column::RecipientId.eq(recipient_id.to_string()))
                .count(&db_tx)
                .await?;
            if referenced > 0 {
                return Err(EngineError::Validation(
                    "recipient still has transactions".to_string(),
                ));
            }

            let recipient = Recipient::try_from(model)?;
            recipients::Entity::delete_by_id(recipient_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(recipient)
        })
    }
}
