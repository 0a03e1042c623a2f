//! External counterparties (billers and peers).
//!
//! A recipient has no balance: a transaction that pays or is paid by a
//! recipient only moves its primary wallet.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecipientKind {
    Biller,
    Peer,
}

impl RecipientKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Biller => "BILLER",
            Self::Peer => "PEER",
        }
    }
}

impl TryFrom<&str> for RecipientKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "BILLER" => Ok(Self::Biller),
            "PEER" => Ok(Self::Peer),
            other => Err(EngineError::Validation(format!(
                "invalid recipient kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: RecipientKind,
    pub created_at: DateTime<Utc>,
}

impl Recipient {
    pub fn new(
        user_id: String,
        name: String,
        description: Option<String>,
        kind: RecipientKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            kind,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Recipient> for ActiveModel {
    fn from(value: &Recipient) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Recipient {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "recipient")?,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            kind: RecipientKind::try_from(model.kind.as_str())?,
            created_at: model.created_at,
        })
    }
}
