//! `SeaORM` entity definitions.

pub mod expenses;
pub mod travel_plans;
pub mod users;
