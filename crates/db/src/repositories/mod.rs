//! Postgres implementation of the store traits.
//!
//! One `SeaOrmStore` implements every store trait; the impls are split by
//! table. Expense mutations lock the affected plan rows and recompute
//! their `total_cost` inside the same transaction.

mod convert;
mod expense;
mod plan;
mod user;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, SqlErr,
};
use tracing::debug;
use tripwise_core::expense::recompute_total_cost;
use tripwise_core::store::StoreError;
use tripwise_shared::{Money, TravelPlanId, UserId};

use crate::entities::{expenses, travel_plans};

/// Store backed by a `SeaORM` connection pool.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Creates a store over an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Maps driver errors, surfacing constraint violations.
pub(crate) fn db_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::NotFound(detail),
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Loads a plan row if `owner` has it.
pub(crate) async fn owned_plan_row<C: ConnectionTrait>(
    conn: &C,
    owner: UserId,
    id: TravelPlanId,
) -> Result<Option<travel_plans::Model>, StoreError> {
    travel_plans::Entity::find_by_id(id.into_inner())
        .filter(travel_plans::Column::UserId.eq(owner.into_inner()))
        .one(conn)
        .await
        .map_err(db_err)
}

/// Same as [`owned_plan_row`] but takes a row lock for the rest of the
/// transaction.
pub(crate) async fn lock_owned_plan<C: ConnectionTrait>(
    conn: &C,
    owner: UserId,
    id: TravelPlanId,
) -> Result<Option<travel_plans::Model>, StoreError> {
    travel_plans::Entity::find_by_id(id.into_inner())
        .filter(travel_plans::Column::UserId.eq(owner.into_inner()))
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(db_err)
}

/// Rewrites a plan's `total_cost` from its expense rows.
///
/// Fails with `StoreError::Invalid` when the sum no longer fits the column.
pub(crate) async fn recompute_plan_total<C: ConnectionTrait>(
    conn: &C,
    plan_id: TravelPlanId,
) -> Result<Money, StoreError> {
    let amounts: Vec<rust_decimal::Decimal> = expenses::Entity::find()
        .select_only()
        .column(expenses::Column::Amount)
        .filter(expenses::Column::TravelPlanId.eq(plan_id.into_inner()))
        .into_tuple()
        .all(conn)
        .await
        .map_err(db_err)?;

    // An unstorable total aborts the caller's transaction before commit.
    let total = recompute_total_cost(amounts.into_iter().map(Money::new))?;

    travel_plans::Entity::update_many()
        .col_expr(travel_plans::Column::TotalCost, Expr::value(total.amount()))
        .filter(travel_plans::Column::Id.eq(plan_id.into_inner()))
        .exec(conn)
        .await
        .map_err(db_err)?;

    debug!(plan_id = %plan_id, total = %total, "Recomputed plan total");
    Ok(total)
}
