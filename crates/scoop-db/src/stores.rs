//! Store repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_models::store::{NewStore, Store};

use crate::catalog::StoreCatalog;
use crate::repository::{RepositoryError, RepositoryResult};

const STORE_COLUMNS: &str =
    "id, name, phone, email, url, address, city, state, zip, lat, lng, created_at";

#[derive(Debug, Clone, FromRow)]
struct StoreRow {
    id: i64,
    name: String,
    phone: String,
    email: String,
    url: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    lat: f64,
    lng: f64,
    created_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Store {
            id: Some(row.id),
            name: row.name,
            phone: row.phone,
            email: row.email,
            url: row.url,
            address: row.address,
            city: row.city,
            state: row.state,
            zip: row.zip,
            lat: row.lat,
            lng: row.lng,
            created_at: Some(row.created_at),
        }
    }
}

/// Store repository implementation
#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreCatalog for StoreRepository {
    async fn list(&self, pagination: &Pagination) -> RepositoryResult<Vec<Store>> {
        let order = match pagination.sort_by.as_deref() {
            Some("name") => "name",
            Some("city") => "city",
            _ => "created_at",
        };
        let (limit, offset) = pagination.clamped();

        let rows = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores ORDER BY {order} LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Store::from).collect())
    }

    async fn get(&self, id: Id) -> RepositoryResult<Store> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("store {}", id)))?;

        Ok(row.into())
    }

    async fn insert(&self, new: NewStore) -> RepositoryResult<Store> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r#"
            INSERT INTO stores (name, phone, email, url, address, city, state, zip, lat, lng, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            RETURNING {STORE_COLUMNS}
            "#,
        ))
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.url)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip)
        .bind(new.lat)
        .bind(new.lng)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Id, new: NewStore) -> RepositoryResult<Store> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r#"
            UPDATE stores SET
                name = $2, phone = $3, email = $4, url = $5,
                address = $6, city = $7, state = $8, zip = $9,
                lat = $10, lng = $11
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.url)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip)
        .bind(new.lat)
        .bind(new.lng)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("store {}", id)))?;

        Ok(row.into())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
