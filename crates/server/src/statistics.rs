//! Statistics API endpoints

use api_types::stats::{Statistic, StatisticQuery};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::{ServerError, server::ServerState, user};

/// Handle requests for user statistics
pub async fn get_stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<StatisticQuery>,
) -> Result<Json<Statistic>, ServerError> {
    let stats = state
        .engine
        .statistics(
            &user.username,
            query.from.map(|dt| dt.with_timezone(&Utc)),
            query.to.map(|dt| dt.with_timezone(&Utc)),
        )
        .await?;

    Ok(Json(Statistic {
        total_balance: stats.total_balance.value(),
        wallet_count: stats.wallet_count,
        total_income: stats.total_income.value(),
        total_expenses: stats.total_expenses.value(),
    }))
}
