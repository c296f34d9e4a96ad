//! In-process store.
//!
//! Mirrors the database store's semantics, including total-cost
//! recomputation and cascade on plan deletion, so HTTP tests can run
//! without Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tripwise_shared::{ExpenseId, Money, TravelPlanId, UserId};

use super::{ExpenseStore, PlanStore, StoreError, UserStore};
use crate::auth::{NewUser, User, UserPatch};
use crate::expense::{
    Expense, ExpenseCategory, ExpensePatch, NewExpense, recompute_total_cost,
};
use crate::plan::{NewTravelPlan, PlanStatus, TravelPlan, TravelPlanPatch};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    plans: BTreeMap<TravelPlanId, TravelPlan>,
    expenses: BTreeMap<ExpenseId, Expense>,
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn owned_plan(&self, owner: UserId, id: TravelPlanId) -> Option<&TravelPlan> {
        self.plans.get(&id).filter(|p| p.user_id == owner)
    }

    fn owned_expense(&self, owner: UserId, id: ExpenseId) -> Option<&Expense> {
        let expense = self.expenses.get(&id)?;
        self.owned_plan(owner, expense.travel_plan_id)?;
        Some(expense)
    }

    fn total_for(&self, plan_id: TravelPlanId) -> Result<Money, StoreError> {
        Ok(recompute_total_cost(
            self.expenses
                .values()
                .filter(|e| e.travel_plan_id == plan_id)
                .map(|e| e.amount),
        )?)
    }

    fn set_total(&mut self, plan_id: TravelPlanId, total: Money) {
        if let Some(plan) = self.plans.get_mut(&plan_id) {
            plan.total_cost = total;
        }
    }
}

/// Store holding everything in memory behind one lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {} is taken", user.email)));
        }
        if state.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "username {} is taken",
                user.username
            )));
        }
        let id = UserId::new(state.next_id());
        let user = user.into_user(id, Utc::now());
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let mut state = self.state.write().await;
        if let Some(username) = &patch.username {
            if state.users.values().any(|u| u.id != id && &u.username == username) {
                return Err(StoreError::Conflict(format!("username {username} is taken")));
            }
        }
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(user, Utc::now());
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl PlanStore for InMemoryStore {
    async fn create_plan(
        &self,
        owner: UserId,
        plan: NewTravelPlan,
    ) -> Result<TravelPlan, StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&owner) {
            return Err(StoreError::NotFound(format!("user {owner}")));
        }
        let id = TravelPlanId::new(state.next_id());
        let plan = plan.into_plan(id, owner, Utc::now());
        state.plans.insert(id, plan.clone());
        Ok(plan)
    }

    async fn find_plan(
        &self,
        owner: UserId,
        id: TravelPlanId,
    ) -> Result<Option<TravelPlan>, StoreError> {
        Ok(self.state.read().await.owned_plan(owner, id).cloned())
    }

    async fn list_plans(
        &self,
        owner: UserId,
        status: Option<PlanStatus>,
    ) -> Result<Vec<TravelPlan>, StoreError> {
        let state = self.state.read().await;
        let mut plans: Vec<TravelPlan> = state
            .plans
            .values()
            .filter(|p| p.user_id == owner)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(plans)
    }

    async fn update_plan(
        &self,
        owner: UserId,
        id: TravelPlanId,
        patch: TravelPlanPatch,
    ) -> Result<Option<TravelPlan>, StoreError> {
        let mut state = self.state.write().await;
        let Some(plan) = state.plans.get_mut(&id).filter(|p| p.user_id == owner) else {
            return Ok(None);
        };
        patch.apply_to(plan, Utc::now());
        Ok(Some(plan.clone()))
    }

    async fn delete_plan(&self, owner: UserId, id: TravelPlanId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if state.owned_plan(owner, id).is_none() {
            return Ok(false);
        }
        state.plans.remove(&id);
        state.expenses.retain(|_, e| e.travel_plan_id != id);
        Ok(true)
    }

    async fn count_plans(&self, owner: UserId) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state.plans.values().filter(|p| p.user_id == owner).count() as u64)
    }
}

#[async_trait]
impl ExpenseStore for InMemoryStore {
    async fn create_expense(
        &self,
        owner: UserId,
        expense: NewExpense,
    ) -> Result<Option<Expense>, StoreError> {
        let mut state = self.state.write().await;
        let plan_id = expense.travel_plan_id;
        if state.owned_plan(owner, plan_id).is_none() {
            return Ok(None);
        }
        let id = ExpenseId::new(state.next_id());
        let expense = expense.into_expense(id, Utc::now());
        state.expenses.insert(id, expense.clone());
        match state.total_for(plan_id) {
            Ok(total) => state.set_total(plan_id, total),
            Err(err) => {
                state.expenses.remove(&id);
                return Err(err);
            }
        }
        Ok(Some(expense))
    }

    async fn find_expense(
        &self,
        owner: UserId,
        id: ExpenseId,
    ) -> Result<Option<Expense>, StoreError> {
        Ok(self.state.read().await.owned_expense(owner, id).cloned())
    }

    async fn list_plan_expenses(
        &self,
        owner: UserId,
        plan: TravelPlanId,
        category: Option<ExpenseCategory>,
    ) -> Result<Option<Vec<Expense>>, StoreError> {
        let state = self.state.read().await;
        if state.owned_plan(owner, plan).is_none() {
            return Ok(None);
        }
        let mut expenses: Vec<Expense> = state
            .expenses
            .values()
            .filter(|e| e.travel_plan_id == plan)
            .filter(|e| category.is_none_or(|c| e.category.known() == Some(c)))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.expense_date.cmp(&a.expense_date).then(b.id.cmp(&a.id)));
        Ok(Some(expenses))
    }

    async fn list_user_expenses(&self, owner: UserId) -> Result<Vec<Expense>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .expenses
            .values()
            .filter(|e| state.owned_plan(owner, e.travel_plan_id).is_some())
            .cloned()
            .collect())
    }

    async fn update_expense(
        &self,
        owner: UserId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, StoreError> {
        let mut state = self.state.write().await;
        let Some(previous_plan) = state.owned_expense(owner, id).map(|e| e.travel_plan_id) else {
            return Ok(None);
        };
        if let Some(target) = patch.travel_plan_id {
            if state.owned_plan(owner, target).is_none() {
                return Err(StoreError::NotFound(format!("travel plan {target}")));
            }
        }

        let Some(expense) = state.expenses.get_mut(&id) else {
            return Ok(None);
        };
        let before = expense.clone();
        patch.apply_to(expense, Utc::now());
        let updated = expense.clone();

        let totals = state.total_for(previous_plan).and_then(|previous| {
            Ok((previous, state.total_for(updated.travel_plan_id)?))
        });
        let (previous_total, target_total) = match totals {
            Ok(totals) => totals,
            Err(err) => {
                state.expenses.insert(id, before);
                return Err(err);
            }
        };
        state.set_total(previous_plan, previous_total);
        state.set_total(updated.travel_plan_id, target_total);
        Ok(Some(updated))
    }

    async fn delete_expense(&self, owner: UserId, id: ExpenseId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let Some(plan_id) = state.owned_expense(owner, id).map(|e| e.travel_plan_id) else {
            return Ok(false);
        };
        state.expenses.remove(&id);
        let total = state.total_for(plan_id)?;
        state.set_total(plan_id, total);
        Ok(true)
    }
}

impl InMemoryStore {
    /// Cached total of a plan regardless of owner, for assertions.
    pub async fn total_cost(&self, plan: TravelPlanId) -> Option<Money> {
        self.state.read().await.plans.get(&plan).map(|p| p.total_cost)
    }
}
