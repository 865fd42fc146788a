use thiserror::Error;

use crate::model::Id;

/// Failures that end a request. Field-level validation problems are not
/// errors here: they come back as a rejected submission and are answered
/// inside the request that produced them.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Id },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: &Id) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.clone(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
