//! `SeaORM` Entity for expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub travel_plan_id: i64,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub expense_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::travel_plans::Entity",
        from = "Column::TravelPlanId",
        to = "super::travel_plans::Column::Id",
        on_delete = "Cascade"
    )]
    TravelPlans,
}

impl Related<super::travel_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TravelPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
