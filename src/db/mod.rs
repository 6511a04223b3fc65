use std::str::FromStr;

use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Executor;
use crate::models::{Movie, NewMovie, UpdateMovieRequest};

mod unit_of_work;

pub use unit_of_work::UnitOfWork;

/// Open a pool against `database_url`, creating the database file if needed.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Create the `movies` table if it does not exist yet.
///
/// AUTOINCREMENT keeps ids of deleted rows from being handed out again.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS movies (
               id       INTEGER PRIMARY KEY AUTOINCREMENT,
               title    TEXT NOT NULL,
               language TEXT NOT NULL,
               status   TEXT NOT NULL,
               rating   REAL NOT NULL
           )"#
    )
    .execute(pool)
    .await?;

    Ok(())
}

// Movie queries

pub async fn insert_movie<'e, E>(executor: E, movie: &NewMovie) -> Result<Movie, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Movie>(
        r#"INSERT INTO movies (title, language, status, rating)
           VALUES (?, ?, ?, ?)
           RETURNING id, title, language, status, rating"#
    )
    .bind(&movie.title)
    .bind(&movie.language)
    .bind(&movie.status)
    .bind(movie.rating)
    .fetch_one(executor)
    .await
}

/// Movies in storage (primary key) order, skipping `skip` rows and returning at most `limit`.
pub async fn list_movies<'e, E>(executor: E, skip: i64, limit: i64) -> Result<Vec<Movie>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Movie>(
        r#"SELECT id, title, language, status, rating FROM movies
           ORDER BY id
           LIMIT ? OFFSET ?"#
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(executor)
    .await
}

pub async fn get_movie_by_id<'e, E>(executor: E, movie_id: i64) -> Result<Option<Movie>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Movie>(
        r#"SELECT id, title, language, status, rating FROM movies WHERE id = ?"#
    )
    .bind(movie_id)
    .fetch_optional(executor)
    .await
}

/// Apply the fields present in `changes` and return the updated row, or
/// `None` when no row has that id.
///
/// A single statement, so inside a transaction the write lock is taken up
/// front rather than upgraded from a read snapshot.
pub async fn update_movie<'e, E>(
    executor: E,
    movie_id: i64,
    changes: &UpdateMovieRequest,
) -> Result<Option<Movie>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Movie>(
        r#"UPDATE movies
           SET title    = COALESCE(?, title),
               language = COALESCE(?, language),
               status   = COALESCE(?, status),
               rating   = COALESCE(?, rating)
           WHERE id = ?
           RETURNING id, title, language, status, rating"#
    )
    .bind(changes.title.as_deref())
    .bind(changes.language.as_deref())
    .bind(changes.status.as_deref())
    .bind(changes.rating)
    .bind(movie_id)
    .fetch_optional(executor)
    .await
}

/// Returns `false` when no row had that id.
pub async fn delete_movie<'e, E>(executor: E, movie_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(r#"DELETE FROM movies WHERE id = ?"#)
        .bind(movie_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn new_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.into(),
            language: "en".into(),
            status: "released".into(),
            rating: 7.5,
        }
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let pool = memory_pool().await;
        ensure_schema(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let pool = memory_pool().await;

        let first = insert_movie(&pool, &new_movie("Alien")).await.unwrap();
        assert!(delete_movie(&pool, first.id).await.unwrap());

        let second = insert_movie(&pool, &new_movie("Aliens")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn uncommitted_unit_of_work_rolls_back() {
        let pool = memory_pool().await;

        {
            let mut uow = UnitOfWork::begin(&pool).await.unwrap();
            insert_movie(uow.conn(), &new_movie("Heat")).await.unwrap();
        }

        assert!(list_movies(&pool, 0, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_unit_of_work_persists() {
        let pool = memory_pool().await;

        let mut uow = UnitOfWork::begin(&pool).await.unwrap();
        let movie = insert_movie(uow.conn(), &new_movie("Heat")).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(get_movie_by_id(&pool, movie.id).await.unwrap(), Some(movie));
    }

    #[tokio::test]
    async fn update_only_touches_present_fields() {
        let pool = memory_pool().await;

        let movie = insert_movie(&pool, &new_movie("Ran")).await.unwrap();
        let changes = UpdateMovieRequest {
            status: Some("restored".into()),
            ..Default::default()
        };
        let updated = update_movie(&pool, movie.id, &changes).await.unwrap().unwrap();

        assert_eq!(
            updated,
            Movie {
                status: "restored".into(),
                ..movie
            }
        );
        assert_eq!(get_movie_by_id(&pool, updated.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_missing_row_returns_none() {
        let pool = memory_pool().await;
        let changes = UpdateMovieRequest {
            rating: Some(1.0),
            ..Default::default()
        };
        assert_eq!(update_movie(&pool, 9999, &changes).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_missing_row_reports_false() {
        let pool = memory_pool().await;
        assert!(!delete_movie(&pool, 9999).await.unwrap());
    }
}
