//! Travel budget allocation and spend analysis.
//!
//! The engine is pure: callers fetch the plan budget and its expenses, then
//! hand them to [`BudgetAnalyzer`].

pub mod allocation;
pub mod analysis;
pub mod types;

#[cfg(test)]
mod tests;

pub use allocation::CategoryAllocation;
pub use analysis::BudgetAnalyzer;
pub use types::{BudgetReport, CategoryBreakdown, SpendRecord};
