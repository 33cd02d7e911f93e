use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use uuid::Uuid;

use shared::domain::{Capabilities, CategoryId, Did, UserId};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("referenced {0} does not exist")]
    MissingReference(&'static str),
    #[error("stored row is malformed: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user_id: UserId,
    pub did: Did,
    pub name: String,
    pub capabilities: Capabilities,
    pub pizza_uuid: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPizza {
    pub uuid: Uuid,
    pub name: String,
    pub price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCategory {
    pub category_id: CategoryId,
    pub name: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run storage migrations")?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Creates the user, or renames it when the DID is already known.
    pub async fn create_user(&self, did: &Did, name: &str) -> Result<UserId, StorageError> {
        let rec = sqlx::query(
            "INSERT INTO users (did, name) VALUES (?, ?)
             ON CONFLICT(did) DO UPDATE SET name=excluded.name
             RETURNING id",
        )
        .bind(did.as_str())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(UserId(rec.get::<i64, _>(0)))
    }

    pub async fn set_capabilities(
        &self,
        did: &Did,
        capabilities: Capabilities,
    ) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET lab = ?, admin = ? WHERE did = ?")
            .bind(capabilities.lab)
            .bind(capabilities.admin)
            .bind(did.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("user"));
        }
        Ok(())
    }

    pub async fn find_user_by_did(&self, did: &Did) -> Result<Option<StoredUser>, StorageError> {
        let row = sqlx::query(
            "SELECT id, did, name, lab, admin, pizza_uuid FROM users WHERE did = ?",
        )
        .bind(did.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| user_from_row(&row)).transpose()
    }

    /// Points the user's order at `pizza_uuid`. Writing the same value twice
    /// leaves the row unchanged.
    pub async fn select_pizza(&self, did: &Did, pizza_uuid: Uuid) -> Result<UserId, StorageError> {
        let row = sqlx::query("UPDATE users SET pizza_uuid = ? WHERE did = ? RETURNING id")
            .bind(pizza_uuid.to_string())
            .bind(did.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify_write_error(e, "pizza"))?;
        row.map(|r| UserId(r.get::<i64, _>(0)))
            .ok_or(StorageError::NotFound("user"))
    }

    pub async fn create_pizza(&self, name: &str, price_cents: i64) -> Result<Uuid, StorageError> {
        let uuid = Uuid::new_v4();
        sqlx::query("INSERT INTO pizzas (uuid, name, price_cents) VALUES (?, ?, ?)")
            .bind(uuid.to_string())
            .bind(name)
            .bind(price_cents)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_write_error(e, "pizza"))?;
        Ok(uuid)
    }

    pub async fn list_pizzas(&self) -> Result<Vec<StoredPizza>, StorageError> {
        let rows = sqlx::query(
            "SELECT uuid, name, price_cents FROM pizzas ORDER BY price_cents ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| -> Result<StoredPizza, StorageError> {
                Ok(StoredPizza {
                    uuid: parse_uuid(row.get::<String, _>(0))?,
                    name: row.get::<String, _>(1),
                    price_cents: row.get::<i64, _>(2),
                })
            })
            .collect()
    }

    /// Category names are unique ignoring ASCII case; a duplicate is reported
    /// as [`StorageError::Conflict`].
    pub async fn create_page_category(
        &self,
        name: &str,
        created_by: UserId,
    ) -> Result<StoredCategory, StorageError> {
        let created_at = Utc::now();
        let rec = sqlx::query(
            "INSERT INTO page_categories (name, created_by, created_at) VALUES (?, ?, ?)
             RETURNING id",
        )
        .bind(name)
        .bind(created_by.0)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_write_error(e, "user"))?;
        Ok(StoredCategory {
            category_id: CategoryId(rec.get::<i64, _>(0)),
            name: name.to_string(),
            created_by,
            created_at,
        })
    }

    pub async fn list_page_categories(&self) -> Result<Vec<StoredCategory>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, name, created_by, created_at FROM page_categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| StoredCategory {
                category_id: CategoryId(row.get::<i64, _>(0)),
                name: row.get::<String, _>(1),
                created_by: UserId(row.get::<i64, _>(2)),
                created_at: row.get::<DateTime<Utc>, _>(3),
            })
            .collect())
    }
}

fn user_from_row(row: &SqliteRow) -> Result<StoredUser, StorageError> {
    let pizza_uuid = row
        .get::<Option<String>, _>(5)
        .map(parse_uuid)
        .transpose()?;
    Ok(StoredUser {
        user_id: UserId(row.get::<i64, _>(0)),
        did: Did(row.get::<String, _>(1)),
        name: row.get::<String, _>(2),
        capabilities: Capabilities {
            lab: row.get::<bool, _>(3),
            admin: row.get::<bool, _>(4),
        },
        pizza_uuid,
    })
}

fn parse_uuid(raw: String) -> Result<Uuid, StorageError> {
    Uuid::parse_str(&raw).map_err(|e| StorageError::Corrupt(format!("uuid '{raw}': {e}")))
}

fn classify_write_error(err: sqlx::Error, referenced: &'static str) -> StorageError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return StorageError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() {
            return StorageError::MissingReference(referenced);
        }
    }
    StorageError::Database(err)
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
