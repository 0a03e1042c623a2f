//! Transactions API endpoints

use api_types::transaction::{
    TransactionKind as ApiKind, TransactionList, TransactionListResponse, TransactionNew,
    TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    EditTransactionCmd, Money, NewTransactionCmd, Transaction, TransactionKind,
    TransactionListFilter, TransactionRow,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
        TransactionKind::Transfer => ApiKind::Transfer,
    }
}

fn kind_from_api(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
        ApiKind::Transfer => TransactionKind::Transfer,
    }
}

fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        wallet_name: None,
        kind: map_kind(tx.kind),
        amount: tx.amount.value(),
        internal_wallet_id: tx.counterparty.internal_wallet(),
        internal_wallet_name: None,
        recipient_id: tx.counterparty.recipient(),
        recipient_name: None,
        name: tx.name,
        description: tx.description,
        occurred_at: tx.occurred_at,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

fn row_view(row: TransactionRow) -> TransactionView {
    TransactionView {
        wallet_name: Some(row.wallet_name),
        internal_wallet_name: row.internal_wallet_name,
        recipient_name: row.recipient_name,
        ..view(row.transaction)
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let occurred_at = payload
        .occurred_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));
    let mut cmd = NewTransactionCmd::new(
        &user.username,
        payload.wallet_id,
        kind_from_api(payload.kind),
        Money::new(payload.amount),
        payload.name,
        occurred_at,
    );
    cmd.internal_wallet_id = payload.internal_wallet_id;
    cmd.recipient_id = payload.recipient_id;
    cmd.description = payload.description;

    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn edit(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = EditTransactionCmd::new(
        id,
        &user.username,
        payload.wallet_id,
        kind_from_api(payload.kind),
        Money::new(payload.amount),
        payload.name,
    );
    cmd.internal_wallet_id = payload.internal_wallet_id;
    cmd.recipient_id = payload.recipient_id;
    cmd.description = payload.description;
    cmd.occurred_at = payload.occurred_at.map(|dt| dt.with_timezone(&Utc));

    let tx = state.engine.edit_transaction(cmd).await?;
    Ok(Json(view(tx)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.delete_transaction(id, &user.username).await?;
    Ok(Json(view(tx)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let row = state.engine.transaction(id, &user.username).await?;
    Ok(Json(row_view(row)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let engine = &state.engine;

    let limit = payload.limit.unwrap_or(50);
    let filter = TransactionListFilter {
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
        kinds: payload
            .kinds
            .map(|kinds| kinds.into_iter().map(kind_from_api).collect()),
    };

    let page = match payload.wallet_id {
        Some(wallet_id) => {
            engine
                .list_transactions_for_wallet(
                    wallet_id,
                    &user.username,
                    limit,
                    payload.cursor.as_deref(),
                    &filter,
                )
                .await?
        }
        None => {
            engine
                .list_transactions(&user.username, limit, payload.cursor.as_deref(), &filter)
                .await?
        }
    };

    Ok(Json(TransactionListResponse {
        transactions: page.items.into_iter().map(row_view).collect(),
        next_cursor: page.next_cursor,
    }))
}
