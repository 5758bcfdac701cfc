//! Database repository for categories.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::categories::{CategoryCreateDBRequest, CategoryDBResponse, CategoryUpdateDBRequest},
};
use crate::types::{CategoryId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing categories: always scoped to one owner
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    pub user_id: UserId,
}

impl CategoryFilter {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

pub struct Categories<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Categories<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Categories<'c> {
    type CreateRequest = CategoryCreateDBRequest;
    type UpdateRequest = CategoryUpdateDBRequest;
    type Response = CategoryDBResponse;
    type Id = CategoryId;
    type Filter = CategoryFilter;

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let category_id = Uuid::new_v4();

        let category = sqlx::query_as::<_, CategoryDBResponse>(
            r#"
            INSERT INTO categories (id, user_id, name, color)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(category_id)
        .bind(request.user_id)
        .bind(&request.name)
        .bind(&request.color)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(category)
    }

    #[instrument(skip(self), fields(category_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let category = sqlx::query_as::<_, CategoryDBResponse>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(category)
    }

    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let categories =
            sqlx::query_as::<_, CategoryDBResponse>("SELECT * FROM categories WHERE user_id = $1 ORDER BY created_at ASC, id ASC")
                .bind(filter.user_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(categories)
    }

    #[instrument(skip(self), fields(category_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(category_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let category = sqlx::query_as::<_, CategoryDBResponse>(
            r#"
            UPDATE categories SET name = $2, color = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.color)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_crud_roundtrip(pool: PgPool) {
        let user = create_test_user(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Categories::new(&mut conn);

        let created = repo
            .create(&CategoryCreateDBRequest {
                user_id: user.id,
                name: "Work".to_string(),
                color: Some("#ff0000".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Work");
        assert_eq!(created.user_id, user.id);

        let updated = repo
            .update(
                created.id,
                &CategoryUpdateDBRequest {
                    name: "Job".to_string(),
                    color: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Job");
        assert_eq!(updated.color, None);

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_is_scoped_to_owner(pool: PgPool) {
        let alice = create_test_user(&pool).await;
        let bob = create_test_user(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Categories::new(&mut conn);

        for name in ["Home", "Work"] {
            repo.create(&CategoryCreateDBRequest {
                user_id: alice.id,
                name: name.to_string(),
                color: None,
            })
            .await
            .unwrap();
        }
        repo.create(&CategoryCreateDBRequest {
            user_id: bob.id,
            name: "Secret".to_string(),
            color: None,
        })
        .await
        .unwrap();

        let alices = repo.list(&CategoryFilter::new(alice.id)).await.unwrap();
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|c| c.user_id == alice.id));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_missing_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Categories::new(&mut conn);

        let err = repo
            .update(
                Uuid::new_v4(),
                &CategoryUpdateDBRequest {
                    name: "Nope".to_string(),
                    color: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
