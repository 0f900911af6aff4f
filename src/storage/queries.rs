// Biblio - Library Catalog Core
// Copyright (C) 2026 Biblio contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Database query functions
//!
//! Repository-style functions per entity. Mutating functions are generic
//! over [`sqlx::Executor`] so the same call runs against the pool or inside
//! a workflow transaction; `find_*` functions return `Option` and leave the
//! NotFound decision to the caller.

use crate::error::Result;
use crate::storage::models::*;
use sqlx::{Executor, Sqlite, SqlitePool};

/// Listing filters for the book list view; filters compose with AND
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Restrict to books associated with this genre
    pub genre_id: Option<i64>,
    /// Case-insensitive substring match on the title
    pub search: Option<String>,
}

// ============================================================================
// AUTHOR QUERIES
// ============================================================================

/// Insert a new author, returning its id
pub async fn insert_author<'e, E>(executor: E, author: &NewAuthor) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO authors (name, bio, birth_date) VALUES (?, ?, ?)")
        .bind(&author.name)
        .bind(&author.bio)
        .bind(author.birth_date)
        .execute(executor)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Find author by id
pub async fn find_author_by_id<'e, E>(executor: E, author_id: i64) -> Result<Option<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let author = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE author_id = ?")
        .bind(author_id)
        .fetch_optional(executor)
        .await?;

    Ok(author)
}

/// List all authors ordered by name
pub async fn list_authors(pool: &SqlitePool) -> Result<Vec<Author>> {
    let authors = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY name, author_id")
        .fetch_all(pool)
        .await?;

    Ok(authors)
}

/// List an author's books, newest first
pub async fn list_books_by_author(pool: &SqlitePool, author_id: i64) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE author_id = ? ORDER BY created_at DESC, book_id DESC",
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

// ============================================================================
// GENRE QUERIES
// ============================================================================

/// Insert a new genre, returning its id
pub async fn insert_genre<'e, E>(executor: E, genre: &NewGenre) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO genres (name, description) VALUES (?, ?)")
        .bind(&genre.name)
        .bind(&genre.description)
        .execute(executor)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Find genre by id
pub async fn find_genre_by_id<'e, E>(executor: E, genre_id: i64) -> Result<Option<Genre>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let genre = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE genre_id = ?")
        .bind(genre_id)
        .fetch_optional(executor)
        .await?;

    Ok(genre)
}

/// List all genres ordered by name
pub async fn list_genres(pool: &SqlitePool) -> Result<Vec<Genre>> {
    let genres = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name, genre_id")
        .fetch_all(pool)
        .await?;

    Ok(genres)
}

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book row, returning its id
///
/// Genre associations are separate rows; see [`add_book_genre`].
pub async fn insert_book<'e, E>(executor: E, book: &NewBook) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO books (
            title, author_id, publication_year, annotation, cover_path, pages, isbn
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.title)
    .bind(book.author_id)
    .bind(book.publication_year)
    .bind(&book.annotation)
    .bind(&book.cover_path)
    .bind(book.pages)
    .bind(&book.isbn)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Update an existing book in place
///
/// `created_at` is never written; `updated_at` refreshes via trigger.
pub async fn update_book<'e, E>(executor: E, book_id: i64, book: &NewBook) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE books SET
            title = ?, author_id = ?, publication_year = ?, annotation = ?,
            cover_path = ?, pages = ?, isbn = ?
        WHERE book_id = ?
        "#,
    )
    .bind(&book.title)
    .bind(book.author_id)
    .bind(book.publication_year)
    .bind(&book.annotation)
    .bind(&book.cover_path)
    .bind(book.pages)
    .bind(&book.isbn)
    .bind(book_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Find book by id
pub async fn find_book_by_id<'e, E>(executor: E, book_id: i64) -> Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = ?")
        .bind(book_id)
        .fetch_optional(executor)
        .await?;

    Ok(book)
}

/// Delete a book; reviews and genre associations cascade
pub async fn delete_book<'e, E>(executor: E, book_id: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM books WHERE book_id = ?")
        .bind(book_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Associate a book with a genre
pub async fn add_book_genre<'e, E>(executor: E, book_id: i64, genre_id: i64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT OR IGNORE INTO book_genres (book_id, genre_id) VALUES (?, ?)")
        .bind(book_id)
        .bind(genre_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Remove all genre associations for a book
pub async fn clear_book_genres<'e, E>(executor: E, book_id: i64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM book_genres WHERE book_id = ?")
        .bind(book_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Genres associated with a book, name-ordered
pub async fn find_genres_by_book<'e, E>(executor: E, book_id: i64) -> Result<Vec<Genre>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let genres = sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.* FROM genres g
        INNER JOIN book_genres bg ON g.genre_id = bg.genre_id
        WHERE bg.book_id = ?
        ORDER BY g.name, g.genre_id
        "#,
    )
    .bind(book_id)
    .fetch_all(executor)
    .await?;

    Ok(genres)
}

/// List books with author name and aggregated genre names
///
/// Optional genre and title-substring filters compose with AND. The title
/// match folds case via SQL `lower()`, which handles ASCII only, the same
/// behavior the rest of the stack gets from SQLite `LIKE`. No filters
/// returns the whole catalog, newest first.
pub async fn list_books(pool: &SqlitePool, filter: &BookFilter) -> Result<Vec<BookSummary>> {
    let books = sqlx::query_as::<_, BookSummary>(
        r#"
        WITH book_genre_names AS (
            SELECT
                bg.book_id,
                GROUP_CONCAT(g.name, ', ') AS genres
            FROM book_genres bg
            JOIN genres g ON bg.genre_id = g.genre_id
            GROUP BY bg.book_id
        )
        SELECT
            b.book_id,
            b.title,
            b.author_id,
            a.name AS author_name,
            b.publication_year,
            b.annotation,
            b.cover_path,
            b.pages,
            b.isbn,
            b.created_at,
            b.updated_at,
            bgn.genres AS genres_str
        FROM books b
        JOIN authors a ON b.author_id = a.author_id
        LEFT JOIN book_genre_names bgn ON b.book_id = bgn.book_id
        WHERE (? IS NULL OR EXISTS (
                SELECT 1 FROM book_genres bg
                WHERE bg.book_id = b.book_id AND bg.genre_id = ?
            ))
          AND (? IS NULL OR lower(b.title) LIKE '%' || lower(?) || '%')
        ORDER BY b.created_at DESC, b.book_id DESC
        "#,
    )
    .bind(filter.genre_id)
    .bind(filter.genre_id)
    .bind(&filter.search)
    .bind(&filter.search)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

// ============================================================================
// REVIEW QUERIES
// ============================================================================

/// Insert a new review for a (book, user) pair, returning its id
///
/// The UNIQUE(book_id, user_id) index rejects a second row for the pair.
pub async fn insert_review<'e, E>(
    executor: E,
    book_id: i64,
    user_id: i64,
    review: &NewReview,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO reviews (book_id, user_id, rating, text) VALUES (?, ?, ?, ?)")
        .bind(book_id)
        .bind(user_id)
        .bind(review.rating)
        .bind(&review.text)
        .execute(executor)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Update an existing review's rating and text
pub async fn update_review<'e, E>(executor: E, review_id: i64, review: &NewReview) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE reviews SET rating = ?, text = ? WHERE review_id = ?")
        .bind(review.rating)
        .bind(&review.text)
        .bind(review_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Find review by id
pub async fn find_review_by_id<'e, E>(executor: E, review_id: i64) -> Result<Option<Review>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE review_id = ?")
        .bind(review_id)
        .fetch_optional(executor)
        .await?;

    Ok(review)
}

/// Find the review a user left on a book, if any
pub async fn find_review_for_book_user<'e, E>(
    executor: E,
    book_id: i64,
    user_id: i64,
) -> Result<Option<Review>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let review =
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE book_id = ? AND user_id = ?")
            .bind(book_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await?;

    Ok(review)
}

/// Reviews for a book joined with their reviewing users, newest first
pub async fn list_reviews_with_users(
    pool: &SqlitePool,
    book_id: i64,
) -> Result<Vec<ReviewWithUser>> {
    let reviews = sqlx::query_as::<_, ReviewWithUser>(
        r#"
        SELECT
            r.review_id,
            r.book_id,
            r.user_id,
            u.username,
            r.rating,
            r.text,
            r.created_at,
            r.updated_at
        FROM reviews r
        JOIN users u ON r.user_id = u.user_id
        WHERE r.book_id = ?
        ORDER BY r.created_at DESC, r.review_id DESC
        "#,
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

/// Arithmetic mean of a book's review ratings; `None` with zero reviews
pub async fn average_rating_for_book<'e, E>(executor: E, book_id: i64) -> Result<Option<f64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE book_id = ?")
        .bind(book_id)
        .fetch_one(executor)
        .await?;

    Ok(avg)
}

// ============================================================================
// USER QUERIES
// ============================================================================

/// Insert or find user by username
///
/// Returns the user_id (either existing or newly created). Identity itself
/// is managed outside the core; this backs it with a row reviews can
/// reference.
pub async fn upsert_user(pool: &SqlitePool, username: &str) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT user_id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO users (username) VALUES (?)")
        .bind(username)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Find user by id
pub async fn find_user_by_id<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

// ============================================================================
// COUNTS
// ============================================================================

/// Count total books
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Count total authors
pub async fn count_authors(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Count total genres
pub async fn count_genres(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Count total reviews
pub async fn count_reviews(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
