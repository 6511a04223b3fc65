use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use sqlx::sqlite::SqlitePool;
use crate::db::{self, UnitOfWork};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateMovieRequest, ListMoviesQuery, MessageResponse, Movie, UpdateMovieRequest,
};

// POST /movies - Create a movie; all four fields are required
pub async fn create_movie(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> ApiResult<Json<Movie>> {
    let Json(payload) = payload?;
    let new_movie = payload.validate()?;

    let mut uow = UnitOfWork::begin(&pool).await?;
    let movie = db::insert_movie(uow.conn(), &new_movie).await?;
    uow.commit().await?;

    tracing::info!(movie_id = movie.id, title = %movie.title, "Created movie");
    Ok(Json(movie))
}

// GET /movies?skip=&limit= - List movies in storage order
pub async fn get_movies(
    State(pool): State<SqlitePool>,
    params: Result<Query<ListMoviesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Movie>>> {
    let Query(params) = params?;
    let (skip, limit) = params.resolve()?;

    let movies = db::list_movies(&pool, skip, limit).await?;

    tracing::debug!(skip, limit, count = movies.len(), "Listed movies");
    Ok(Json(movies))
}

// GET /movies/{id} - Get movie by ID
pub async fn get_movie(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Movie>> {
    let Path(movie_id) = id?;

    let movie = db::get_movie_by_id(&pool, movie_id)
        .await?
        .ok_or(ApiError::NotFound(movie_id))?;

    tracing::debug!(movie_id, "Fetched movie");
    Ok(Json(movie))
}

// PUT /movies/{id} - Update the fields present in the body
pub async fn update_movie(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> ApiResult<Json<Movie>> {
    let Path(movie_id) = id?;
    let Json(changes) = payload?;
    changes.validate()?;

    let mut uow = UnitOfWork::begin(&pool).await?;
    let movie = db::update_movie(uow.conn(), movie_id, &changes)
        .await?
        .ok_or(ApiError::NotFound(movie_id))?;
    uow.commit().await?;

    tracing::info!(movie_id, "Updated movie");
    Ok(Json(movie))
}

// DELETE /movies/{id} - Remove a movie permanently
pub async fn delete_movie(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(movie_id) = id?;

    let mut uow = UnitOfWork::begin(&pool).await?;
    if !db::delete_movie(uow.conn(), movie_id).await? {
        return Err(ApiError::NotFound(movie_id));
    }
    uow.commit().await?;

    tracing::info!(movie_id, "Deleted movie");
    Ok(Json(MessageResponse {
        message: "Movie deleted".to_string(),
    }))
}
