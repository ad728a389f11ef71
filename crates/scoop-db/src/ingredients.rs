//! Ingredient repository

use async_trait::async_trait;
use sqlx::PgPool;

use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_models::ingredient::Ingredient;

use crate::catalog::IngredientCatalog;
use crate::repository::{RepositoryError, RepositoryResult};

/// Ingredient repository implementation
#[derive(Clone)]
pub struct IngredientRepository {
    pool: PgPool,
}

impl IngredientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientCatalog for IngredientRepository {
    async fn search(
        &self,
        pagination: &Pagination,
        terms: &[String],
    ) -> RepositoryResult<Vec<Ingredient>> {
        let (limit, offset) = pagination.clamped();

        let rows: Vec<(i64, String)> = if terms.is_empty() {
            sqlx::query_as(
                "SELECT id, name FROM ingredients ORDER BY name LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            // case-insensitive substring match on any term
            let patterns: Vec<String> = terms.iter().map(|t| format!("%{}%", t)).collect();
            sqlx::query_as(
                r#"
                SELECT id, name FROM ingredients
                 WHERE name ILIKE ANY($1)
                 ORDER BY name
                 LIMIT $2 OFFSET $3
                "#,
            )
            .bind(&patterns)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows
            .into_iter()
            .map(|(id, name)| Ingredient { id: Some(id), name })
            .collect())
    }

    async fn get(&self, id: Id) -> RepositoryResult<Ingredient> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM ingredients WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id, name)| Ingredient { id: Some(id), name })
            .ok_or_else(|| RepositoryError::NotFound(format!("ingredient {}", id)))
    }
}
