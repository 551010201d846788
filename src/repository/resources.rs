//! Resources repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::resource::Resource,
};

#[derive(Clone)]
pub struct ResourcesRepository {
    pool: Pool<Postgres>,
}

impl ResourcesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a resource by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Resource> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource with id {} not found", id)))
    }

    /// List active resources, optionally filtered by kind
    pub async fn list_active(&self, kind: Option<i16>) -> AppResult<Vec<Resource>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query_as::<_, Resource>(
                    "SELECT * FROM resources WHERE active AND kind = $1 ORDER BY name",
                )
                .bind(kind)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Resource>(
                    "SELECT * FROM resources WHERE active ORDER BY kind, name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }
}
