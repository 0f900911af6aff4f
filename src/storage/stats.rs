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


//! Catalog-wide statistics
//!
//! Aggregates for the statistics view. Every aggregate computed over zero
//! rows is `None`; counts are plain zeros. Ranking ties break on lowest id
//! so repeated runs return identical results.

use crate::error::Result;
use crate::storage::models::Book;
use crate::storage::queries;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// How many recently created books the statistics view shows
const RECENT_BOOKS_LIMIT: i64 = 5;
/// How many most-reviewed books the statistics view shows
const MOST_REVIEWED_LIMIT: i64 = 3;

/// Genre ranked by how many books carry it
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GenrePopularity {
    pub genre_id: i64,
    pub name: String,
    pub book_count: i64,
}

/// Book ranked by review count
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookReviewCount {
    pub book_id: i64,
    pub title: String,
    pub review_count: i64,
}

/// Everything the statistics view renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub book_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
    pub review_count: i64,

    /// Genre with the most associated books; `None` when no genre has any
    pub popular_genre: Option<GenrePopularity>,

    pub oldest_year: Option<i32>,
    pub newest_year: Option<i32>,
    pub average_year: Option<f64>,

    /// Mean of all review ratings; `None` with zero reviews
    pub average_rating: Option<f64>,

    /// Most recently created books, newest first
    pub recent_books: Vec<Book>,

    /// Books with the most reviews (at least one), descending
    pub most_reviewed: Vec<BookReviewCount>,
}

/// Compute the full statistics view in one pass over the store
pub async fn gather(pool: &SqlitePool) -> Result<CatalogStatistics> {
    let book_count = queries::count_books(pool).await?;
    let author_count = queries::count_authors(pool).await?;
    let genre_count = queries::count_genres(pool).await?;
    let review_count = queries::count_reviews(pool).await?;

    let popular_genre = popular_genre(pool).await?;
    let (oldest_year, newest_year, average_year) = year_aggregates(pool).await?;
    let average_rating = average_rating(pool).await?;
    let recent_books = recent_books(pool).await?;
    let most_reviewed = most_reviewed_books(pool).await?;

    Ok(CatalogStatistics {
        book_count,
        author_count,
        genre_count,
        review_count,
        popular_genre,
        oldest_year,
        newest_year,
        average_year,
        average_rating,
        recent_books,
        most_reviewed,
    })
}

/// Genre with the highest associated book count; ties break on lowest id
async fn popular_genre(pool: &SqlitePool) -> Result<Option<GenrePopularity>> {
    let genre = sqlx::query_as::<_, GenrePopularity>(
        r#"
        SELECT g.genre_id, g.name, COUNT(bg.book_id) AS book_count
        FROM genres g
        INNER JOIN book_genres bg ON g.genre_id = bg.genre_id
        GROUP BY g.genre_id
        ORDER BY book_count DESC, g.genre_id ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(genre)
}

/// Min, max, and mean publication year over all books
async fn year_aggregates(pool: &SqlitePool) -> Result<(Option<i32>, Option<i32>, Option<f64>)> {
    let row: (Option<i32>, Option<i32>, Option<f64>) = sqlx::query_as(
        "SELECT MIN(publication_year), MAX(publication_year), AVG(publication_year) FROM books",
    )
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Mean rating over all reviews
async fn average_rating(pool: &SqlitePool) -> Result<Option<f64>> {
    let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM reviews")
        .fetch_one(pool)
        .await?;

    Ok(avg)
}

/// The most recently created books, newest first
async fn recent_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM books ORDER BY created_at DESC, book_id DESC LIMIT ?",
    )
    .bind(RECENT_BOOKS_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

/// Books ranked by review count; only books with at least one review
async fn most_reviewed_books(pool: &SqlitePool) -> Result<Vec<BookReviewCount>> {
    let books = sqlx::query_as::<_, BookReviewCount>(
        r#"
        SELECT b.book_id, b.title, COUNT(r.review_id) AS review_count
        FROM books b
        INNER JOIN reviews r ON b.book_id = r.book_id
        GROUP BY b.book_id
        ORDER BY review_count DESC, b.book_id ASC
        LIMIT ?
        "#,
    )
    .bind(MOST_REVIEWED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(books)
}
