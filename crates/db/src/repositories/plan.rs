//! Travel plan queries.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;
use tripwise_core::plan::{NewTravelPlan, PlanStatus, TravelPlan, TravelPlanPatch};
use tripwise_core::store::{PlanStore, StoreError};
use tripwise_shared::{TravelPlanId, UserId};

use super::convert::{plan_from_row, plan_to_active};
use super::{SeaOrmStore, db_err, lock_owned_plan, owned_plan_row};
use crate::entities::travel_plans;

#[async_trait]
impl PlanStore for SeaOrmStore {
    async fn create_plan(
        &self,
        owner: UserId,
        plan: NewTravelPlan,
    ) -> Result<TravelPlan, StoreError> {
        let draft = plan.into_plan(TravelPlanId::new(0), owner, Utc::now());
        let row = plan_to_active(&draft)?
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        info!(plan_id = row.id, user_id = %owner, "Travel plan created");
        plan_from_row(row)
    }

    async fn find_plan(
        &self,
        owner: UserId,
        id: TravelPlanId,
    ) -> Result<Option<TravelPlan>, StoreError> {
        owned_plan_row(&self.db, owner, id)
            .await?
            .map(plan_from_row)
            .transpose()
    }

    async fn list_plans(
        &self,
        owner: UserId,
        status: Option<PlanStatus>,
    ) -> Result<Vec<TravelPlan>, StoreError> {
        let mut query =
            travel_plans::Entity::find().filter(travel_plans::Column::UserId.eq(owner.into_inner()));
        if let Some(status) = status {
            query = query.filter(travel_plans::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(travel_plans::Column::CreatedAt)
            .order_by_desc(travel_plans::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(plan_from_row)
            .collect()
    }

    async fn update_plan(
        &self,
        owner: UserId,
        id: TravelPlanId,
        patch: TravelPlanPatch,
    ) -> Result<Option<TravelPlan>, StoreError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(row) = lock_owned_plan(&txn, owner, id).await? else {
            return Ok(None);
        };
        let mut plan = plan_from_row(row)?;
        patch.apply_to(&mut plan, Utc::now());

        // total_cost belongs to the expense writers.
        let mut active = plan_to_active(&plan)?;
        active.total_cost = NotSet;
        let row = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(plan_id = %id, "Travel plan updated");
        plan_from_row(row).map(Some)
    }

    async fn delete_plan(&self, owner: UserId, id: TravelPlanId) -> Result<bool, StoreError> {
        let result = travel_plans::Entity::delete_many()
            .filter(travel_plans::Column::Id.eq(id.into_inner()))
            .filter(travel_plans::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected > 0 {
            info!(plan_id = %id, "Travel plan deleted");
        }
        Ok(result.rows_affected > 0)
    }

    async fn count_plans(&self, owner: UserId) -> Result<u64, StoreError> {
        travel_plans::Entity::find()
            .filter(travel_plans::Column::UserId.eq(owner.into_inner()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
