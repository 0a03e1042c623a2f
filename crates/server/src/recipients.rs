//! Recipients (billers and peers) API endpoints.

use api_types::recipient::{
    RecipientKind as ApiKind, RecipientList, RecipientNew, RecipientUpdate, RecipientView,
    RecipientsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewRecipientCmd, Recipient, RecipientKind, RecipientPatch};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn kind_from_api(kind: ApiKind) -> RecipientKind {
    match kind {
        ApiKind::Biller => RecipientKind::Biller,
        ApiKind::Peer => RecipientKind::Peer,
    }
}

fn view(recipient: Recipient) -> RecipientView {
    RecipientView {
        id: recipient.id,
        name: recipient.name,
        description: recipient.description,
        kind: match recipient.kind {
            RecipientKind::Biller => ApiKind::Biller,
            RecipientKind::Peer => ApiKind::Peer,
        },
        created_at: recipient.created_at,
    }
}

/// `GET /recipients?kind=PEER|BILLER`
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<RecipientList>,
) -> Result<Json<RecipientsResponse>, ServerError> {
    let recipients = state
        .engine
        .list_recipients(&user.username, query.kind.map(kind_from_api))
        .await?;
    Ok(Json(RecipientsResponse {
        recipients: recipients.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipientView>, ServerError> {
    let recipient = state.engine.recipient(id, &user.username).await?;
    Ok(Json(view(recipient)))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecipientNew>,
) -> Result<(StatusCode, Json<RecipientView>), ServerError> {
    let mut cmd = NewRecipientCmd::new(&user.username, payload.name, kind_from_api(payload.kind));
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    let recipient = state.engine.new_recipient(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(recipient))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipientUpdate>,
) -> Result<Json<RecipientView>, ServerError> {
    let patch = RecipientPatch {
        name: payload.name,
        description: payload.description,
        kind: payload.kind.map(kind_from_api),
    };
    let recipient = state
        .engine
        .update_recipient(id, &user.username, patch)
        .await?;
    Ok(Json(view(recipient)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipientView>, ServerError> {
    let recipient = state.engine.delete_recipient(id, &user.username).await?;
    Ok(Json(view(recipient)))
}
