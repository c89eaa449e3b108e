//! Catalogue error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::filter::FilterError;
use crate::models::EntityKind;
use crate::repository::RepositoryError;

/// Errors surfaced by the catalogue services.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("{kind} was not found by id: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for CatalogueError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogueError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogueError::Unauthorized => StatusCode::UNAUTHORIZED,
            CatalogueError::Repository(RepositoryError::Filter(_)) => StatusCode::BAD_REQUEST,
            CatalogueError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            CatalogueError::Repository(RepositoryError::Filter(e)) => e.to_string(),
            CatalogueError::Repository(e) => {
                tracing::error!(error = %e, "repository error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

impl From<FilterError> for CatalogueError {
    fn from(e: FilterError) -> Self {
        CatalogueError::Repository(RepositoryError::Filter(e))
    }
}

/// Result type alias using CatalogueError.
pub type CatalogueResult<T> = Result<T, CatalogueError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn not_found_message_names_kind_and_id() {
        let err = CatalogueError::NotFound {
            kind: EntityKind::Vendor,
            id: "DOES-NOT-EXIST".to_string(),
        };
        assert_eq!(err.to_string(), "Vendor was not found by id: DOES-NOT-EXIST");
    }

    #[test]
    fn status_codes() {
        let cases = [
            (
                CatalogueError::NotFound {
                    kind: EntityKind::Product,
                    id: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (CatalogueError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                CatalogueError::from(FilterError::UnknownField {
                    table: "product".to_string(),
                    field: "colour".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                CatalogueError::Repository(RepositoryError::Store(StoreError::Decode(
                    "bad".to_string(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
