//! Account queries.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tracing::info;
use tripwise_core::auth::{NewUser, User, UserPatch};
use tripwise_core::store::{StoreError, UserStore};
use tripwise_shared::UserId;

use super::convert::to_db_time;
use super::{SeaOrmStore, db_err};
use crate::entities::users;

impl SeaOrmStore {
    async fn user_exists(&self, column: users::Column, value: &str) -> Result<bool, StoreError> {
        let count = users::Entity::find()
            .filter(column.eq(value))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }
}

#[async_trait]
impl UserStore for SeaOrmStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        if self.user_exists(users::Column::Email, &user.email).await? {
            return Err(StoreError::Conflict(format!("email {} is taken", user.email)));
        }
        if self.user_exists(users::Column::Username, &user.username).await? {
            return Err(StoreError::Conflict(format!(
                "username {} is taken",
                user.username
            )));
        }

        let now = to_db_time(Utc::now());
        let row = users::ActiveModel {
            email: Set(user.email),
            username: Set(user.username),
            hashed_password: Set(user.hashed_password),
            phone: Set(user.phone),
            avatar: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(user_id = row.id, "User created");
        Ok(row.into())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(User::from))
    }

    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, StoreError> {
        if let Some(username) = &patch.username {
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .filter(users::Column::Id.ne(id.into_inner()))
                .count(&self.db)
                .await
                .map_err(db_err)?;
            if taken > 0 {
                return Err(StoreError::Conflict(format!("username {username} is taken")));
            }
        }

        let Some(row) = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut user = User::from(row.clone());
        patch.apply_to(&mut user, Utc::now());

        let mut active: users::ActiveModel = row.into();
        active.username = Set(user.username);
        active.phone = Set(user.phone);
        active.avatar = Set(user.avatar);
        active.hashed_password = Set(user.hashed_password);
        active.updated_at = Set(to_db_time(user.updated_at));

        let row = active.update(&self.db).await.map_err(db_err)?;
        info!(user_id = %id, "User updated");
        Ok(Some(row.into()))
    }
}
