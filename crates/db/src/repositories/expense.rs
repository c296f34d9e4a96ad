//! Expense queries. Every mutation runs in one transaction together with
//! the total-cost recomputation of the plans it touches.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use tracing::info;
use tripwise_core::expense::{Expense, ExpenseCategory, ExpensePatch, NewExpense};
use tripwise_core::store::{ExpenseStore, StoreError};
use tripwise_shared::{ExpenseId, TravelPlanId, UserId};

use super::convert::expense_to_active;
use super::{SeaOrmStore, db_err, lock_owned_plan, owned_plan_row, recompute_plan_total};
use crate::entities::{expenses, travel_plans};

/// Loads an expense row whose plan belongs to `owner`.
async fn owned_expense_row<C: ConnectionTrait>(
    conn: &C,
    owner: UserId,
    id: ExpenseId,
) -> Result<Option<expenses::Model>, StoreError> {
    expenses::Entity::find_by_id(id.into_inner())
        .join(JoinType::InnerJoin, expenses::Relation::TravelPlans.def())
        .filter(travel_plans::Column::UserId.eq(owner.into_inner()))
        .one(conn)
        .await
        .map_err(db_err)
}

#[async_trait]
impl ExpenseStore for SeaOrmStore {
    async fn create_expense(
        &self,
        owner: UserId,
        expense: NewExpense,
    ) -> Result<Option<Expense>, StoreError> {
        let plan_id = expense.travel_plan_id;
        let txn = self.db.begin().await.map_err(db_err)?;

        if lock_owned_plan(&txn, owner, plan_id).await?.is_none() {
            return Ok(None);
        }

        let draft = expense.into_expense(ExpenseId::new(0), Utc::now());
        let row = expense_to_active(&draft)
            .insert(&txn)
            .await
            .map_err(db_err)?;
        recompute_plan_total(&txn, plan_id).await?;

        txn.commit().await.map_err(db_err)?;

        info!(expense_id = row.id, plan_id = %plan_id, "Expense recorded");
        Ok(Some(row.into()))
    }

    async fn find_expense(
        &self,
        owner: UserId,
        id: ExpenseId,
    ) -> Result<Option<Expense>, StoreError> {
        Ok(owned_expense_row(&self.db, owner, id).await?.map(Expense::from))
    }

    async fn list_plan_expenses(
        &self,
        owner: UserId,
        plan: TravelPlanId,
        category: Option<ExpenseCategory>,
    ) -> Result<Option<Vec<Expense>>, StoreError> {
        if owned_plan_row(&self.db, owner, plan).await?.is_none() {
            return Ok(None);
        }

        let mut query = expenses::Entity::find()
            .filter(expenses::Column::TravelPlanId.eq(plan.into_inner()));
        if let Some(category) = category {
            query = query.filter(expenses::Column::Category.eq(category.as_str()));
        }

        let rows = query
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(Some(rows.into_iter().map(Expense::from).collect()))
    }

    async fn list_user_expenses(&self, owner: UserId) -> Result<Vec<Expense>, StoreError> {
        let rows = expenses::Entity::find()
            .join(JoinType::InnerJoin, expenses::Relation::TravelPlans.def())
            .filter(travel_plans::Column::UserId.eq(owner.into_inner()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn update_expense(
        &self,
        owner: UserId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, StoreError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(row) = owned_expense_row(&txn, owner, id).await? else {
            return Ok(None);
        };
        let mut expense = Expense::from(row);
        let previous_plan = expense.travel_plan_id;

        lock_owned_plan(&txn, owner, previous_plan).await?;
        if let Some(target) = patch.travel_plan_id.filter(|t| *t != previous_plan) {
            if lock_owned_plan(&txn, owner, target).await?.is_none() {
                return Err(StoreError::NotFound(format!("travel plan {target}")));
            }
        }

        patch.apply_to(&mut expense, Utc::now());
        let row = expense_to_active(&expense)
            .update(&txn)
            .await
            .map_err(db_err)?;

        recompute_plan_total(&txn, previous_plan).await?;
        if expense.travel_plan_id != previous_plan {
            recompute_plan_total(&txn, expense.travel_plan_id).await?;
        }

        txn.commit().await.map_err(db_err)?;

        info!(expense_id = %id, "Expense updated");
        Ok(Some(row.into()))
    }

    async fn delete_expense(&self, owner: UserId, id: ExpenseId) -> Result<bool, StoreError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(row) = owned_expense_row(&txn, owner, id).await? else {
            return Ok(false);
        };
        let plan_id = TravelPlanId::new(row.travel_plan_id);
        lock_owned_plan(&txn, owner, plan_id).await?;

        expenses::Entity::delete_by_id(row.id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        recompute_plan_total(&txn, plan_id).await?;

        txn.commit().await.map_err(db_err)?;

        info!(expense_id = %id, plan_id = %plan_id, "Expense deleted");
        Ok(true)
    }
}
