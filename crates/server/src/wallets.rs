//! Wallets API endpoints.

use api_types::wallet::{
    PaymentNetwork as ApiNetwork, WalletKind as ApiKind, WalletNew, WalletUpdate, WalletView,
    WalletsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Money, NewWalletCmd, PaymentNetwork, Wallet, WalletKind, WalletPatch};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn kind_from_api(kind: ApiKind) -> WalletKind {
    match kind {
        ApiKind::Savings => WalletKind::Savings,
        ApiKind::Credit => WalletKind::Credit,
        ApiKind::Cash => WalletKind::Cash,
        ApiKind::EWallet => WalletKind::EWallet,
        ApiKind::Investment => WalletKind::Investment,
    }
}

fn map_kind(kind: WalletKind) -> ApiKind {
    match kind {
        WalletKind::Savings => ApiKind::Savings,
        WalletKind::Credit => ApiKind::Credit,
        WalletKind::Cash => ApiKind::Cash,
        WalletKind::EWallet => ApiKind::EWallet,
        WalletKind::Investment => ApiKind::Investment,
    }
}

fn network_from_api(network: ApiNetwork) -> PaymentNetwork {
    match network {
        ApiNetwork::Mastercard => PaymentNetwork::Mastercard,
        ApiNetwork::Visa => PaymentNetwork::Visa,
        ApiNetwork::Jcb => PaymentNetwork::Jcb,
        ApiNetwork::Amex => PaymentNetwork::Amex,
    }
}

fn map_network(network: PaymentNetwork) -> ApiNetwork {
    match network {
        PaymentNetwork::Mastercard => ApiNetwork::Mastercard,
        PaymentNetwork::Visa => ApiNetwork::Visa,
        PaymentNetwork::Jcb => ApiNetwork::Jcb,
        PaymentNetwork::Amex => ApiNetwork::Amex,
    }
}

fn view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        description: wallet.description,
        kind: map_kind(wallet.kind),
        payment_network: wallet.payment_network.map(map_network),
        balance: wallet.balance.value(),
        created_at: wallet.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<WalletsResponse>, ServerError> {
    let wallets = state.engine.list_wallets(&user.username).await?;
    Ok(Json(WalletsResponse {
        wallets: wallets.into_iter().map(view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(id, &user.username).await?;
    Ok(Json(view(wallet)))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let mut cmd = NewWalletCmd::new(&user.username, payload.name, Money::new(payload.balance))
        .kind(kind_from_api(payload.kind));
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(network) = payload.payment_network {
        cmd = cmd.payment_network(network_from_api(network));
    }

    let wallet = state.engine.new_wallet(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(wallet))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WalletUpdate>,
) -> Result<Json<WalletView>, ServerError> {
    let patch = WalletPatch {
        name: payload.name,
        description: payload.description,
        kind: payload.kind.map(kind_from_api),
        payment_network: payload
            .payment_network
            .map(|network| network.map(network_from_api)),
        balance: payload.balance.map(Money::new),
    };
    let wallet = state
        .engine
        .update_wallet(id, &user.username, patch)
        .await?;
    Ok(Json(view(wallet)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.delete_wallet(id, &user.username).await?;
    Ok(Json(view(wallet)))
}
