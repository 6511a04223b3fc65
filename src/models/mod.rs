use serde::{Deserialize, Serialize};
use crate::error::ApiError;

pub const DEFAULT_SKIP: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 100;

/// A row of the `movies` table.
///
/// The serialized form (`id, title, language, status, rating`) is the
/// representation returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub language: String,
    pub status: String,
    pub rating: f64,
}

/// A validated movie that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub language: String,
    pub status: String,
    pub rating: f64,
}

// Body of POST /movies
#[derive(Debug, Default, Deserialize)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl CreateMovieRequest {
    pub fn validate(self) -> Result<NewMovie, ApiError> {
        match (self.title, self.language, self.status, self.rating) {
            (Some(title), Some(language), Some(status), Some(rating)) => {
                require_text("title", &title)?;
                require_text("language", &language)?;
                require_text("status", &status)?;

                Ok(NewMovie {
                    title,
                    language,
                    status,
                    rating,
                })
            }
            (title, language, status, rating) => {
                let missing: Vec<&str> = [
                    ("title", title.is_none()),
                    ("language", language.is_none()),
                    ("status", status.is_none()),
                    ("rating", rating.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();

                Err(ApiError::BadRequest(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

// Body of PUT /movies/{id}; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMovieRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl UpdateMovieRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(language) = &self.language {
            require_text("language", language)?;
        }
        if let Some(status) = &self.status {
            require_text("status", status)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

// Query parameters for listing movies
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesQuery {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListMoviesQuery {
    /// Returns `(skip, limit)` with defaults applied.
    pub fn resolve(&self) -> Result<(i64, i64), ApiError> {
        let skip = self.skip.unwrap_or(DEFAULT_SKIP);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);

        if skip < 0 {
            return Err(ApiError::BadRequest("skip must not be negative".into()));
        }
        if limit < 0 {
            return Err(ApiError::BadRequest("limit must not be negative".into()));
        }

        Ok((skip, limit))
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
