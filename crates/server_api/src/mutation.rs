//! Single-write mutations behind the form actions. Each runs exactly one
//! storage write scoped by the caller's identity and is never retried.

use shared::{
    domain::UserId,
    error::{ApiError, ErrorCode},
    protocol::CategorySummary,
};
use storage::StorageError;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    auth::Identity,
    forms::{PageCategoryInput, PizzaSelectionInput},
    store::Store,
};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Transient(String),
}

impl From<StorageError> for PersistenceError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(what) | StorageError::MissingReference(what) => {
                PersistenceError::NotFound(what)
            }
            StorageError::Conflict(detail) => PersistenceError::Conflict(detail),
            other @ (StorageError::Corrupt(_) | StorageError::Database(_)) => {
                PersistenceError::Transient(other.to_string())
            }
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::NotFound("pizza") => ApiError::form(
                ErrorCode::NotFound,
                "The selected pizza is no longer available.",
            ),
            PersistenceError::NotFound(_) => {
                ApiError::form(ErrorCode::NotFound, "Your account could not be found.")
            }
            PersistenceError::Conflict(_) => ApiError::form(
                ErrorCode::Conflict,
                "A category with this name already exists.",
            ),
            PersistenceError::Transient(detail) => {
                error!(%detail, "persistence failure");
                ApiError::form(
                    ErrorCode::Internal,
                    "Your changes could not be saved. Please try again.",
                )
            }
        }
    }
}

/// Stores the caller's lunch order. Repeating it with the same pizza leaves
/// the same end state.
pub async fn select_pizza(
    store: &dyn Store,
    identity: &Identity,
    input: &PizzaSelectionInput,
) -> Result<UserId, PersistenceError> {
    let user_id = store.select_pizza(&identity.did, input.pizza_uuid).await?;
    info!(did = %identity.did, pizza = %input.pizza_uuid, "pizza selection stored");
    Ok(user_id)
}

/// Inserts a new category; a duplicate name yields [`PersistenceError::Conflict`].
pub async fn create_page_category(
    store: &dyn Store,
    identity: &Identity,
    input: &PageCategoryInput,
) -> Result<CategorySummary, PersistenceError> {
    let stored = store
        .create_page_category(&input.name, identity.user_id)
        .await?;
    info!(
        did = %identity.did,
        category_id = stored.category_id.0,
        name = %stored.name,
        "page category created"
    );
    Ok(CategorySummary {
        category_id: stored.category_id,
        name: stored.name,
        created_at: stored.created_at,
    })
}

#[cfg(test)]
#[path = "tests/mutation_tests.rs"]
mod tests;
