//! Flavor repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_models::flavor::{Flavor, NewFlavor};
use scoop_models::ingredient::Ingredient;

use crate::catalog::FlavorCatalog;
use crate::repository::{RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
struct FlavorRow {
    id: i64,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<FlavorRow> for Flavor {
    fn from(row: FlavorRow) -> Self {
        Flavor {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            ingredients: vec![],
            created_at: Some(row.created_at),
        }
    }
}

/// Flavor repository implementation
#[derive(Clone)]
pub struct FlavorRepository {
    pool: PgPool,
}

impl FlavorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ingredients_for(&self, flavor_id: Id) -> RepositoryResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT i.id, i.name
              FROM ingredients AS i
              JOIN flavor_ingredients AS fi ON fi.ingredient_id = i.id
             WHERE fi.flavor_id = $1
             ORDER BY i.name
            "#,
        )
        .bind(flavor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Ingredient { id: Some(id), name })
            .collect())
    }
}

#[async_trait]
impl FlavorCatalog for FlavorRepository {
    async fn list(&self, pagination: &Pagination) -> RepositoryResult<Vec<Flavor>> {
        let (limit, offset) = pagination.clamped();
        let rows = sqlx::query_as::<_, FlavorRow>(
            "SELECT id, name, description, created_at FROM flavors ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut flavors = Vec::with_capacity(rows.len());
        for row in rows {
            let mut flavor = Flavor::from(row);
            flavor.ingredients = self.ingredients_for(flavor.id.unwrap_or_default()).await?;
            flavors.push(flavor);
        }
        Ok(flavors)
    }

    async fn get(&self, id: Id) -> RepositoryResult<Flavor> {
        let row = sqlx::query_as::<_, FlavorRow>(
            "SELECT id, name, description, created_at FROM flavors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("flavor {}", id)))?;

        let mut flavor = Flavor::from(row);
        flavor.ingredients = self.ingredients_for(id).await?;
        Ok(flavor)
    }

    async fn insert(&self, new: NewFlavor) -> RepositoryResult<Flavor> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, FlavorRow>(
            r#"
            INSERT INTO flavors (name, description, created_at)
            VALUES ($1, $2, NOW())
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(&mut *tx)
        .await?;

        // unknown ingredient names are created on the fly
        for name in &new.ingredients {
            let ingredient_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO ingredients (name)
                VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO flavor_ingredients (flavor_id, ingredient_id) VALUES ($1, $2)",
            )
            .bind(row.id)
            .bind(ingredient_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.get(row.id).await
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flavors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
