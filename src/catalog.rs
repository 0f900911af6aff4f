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


//! Read-side catalog views
//!
//! The query/aggregation layer: everything the rendering collaborator shows
//! is assembled here from the storage queries. These functions never mutate
//! the store and need no identity.

use crate::error::{CatalogError, Result};
use crate::storage::models::{Author, Book, BookSummary, Genre, ReviewWithUser};
use crate::storage::queries::{self, BookFilter};
use crate::storage::stats::{self, CatalogStatistics};
use crate::storage::Database;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A book with everything its detail page shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub genres: Vec<Genre>,
    pub reviews: Vec<ReviewWithUser>,
    /// Mean review rating; `None` when the book has no reviews
    pub average_rating: Option<f64>,
}

/// An author with their books, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

/// List books, optionally restricted by genre and/or title substring
///
/// Filters compose with AND; with no filter the whole catalog comes back
/// ordered by creation time, newest first.
pub async fn list_books(db: &Database, filter: &BookFilter) -> Result<Vec<BookSummary>> {
    let books = queries::list_books(db.pool(), filter).await?;
    debug!(
        count = books.len(),
        genre_id = ?filter.genre_id,
        search = ?filter.search,
        "book list assembled"
    );
    Ok(books)
}

/// Full detail view for one book
///
/// Fails with NotFound when the id does not exist.
pub async fn book_detail(db: &Database, book_id: i64) -> Result<BookDetail> {
    let book = queries::find_book_by_id(db.pool(), book_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("book", book_id))?;

    let author = queries::find_author_by_id(db.pool(), book.author_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("author", book.author_id))?;

    let genres = queries::find_genres_by_book(db.pool(), book_id).await?;
    let reviews = queries::list_reviews_with_users(db.pool(), book_id).await?;
    let average_rating = queries::average_rating_for_book(db.pool(), book_id).await?;

    Ok(BookDetail {
        book,
        author,
        genres,
        reviews,
        average_rating,
    })
}

/// Detail view for one author
pub async fn author_detail(db: &Database, author_id: i64) -> Result<AuthorDetail> {
    let author = queries::find_author_by_id(db.pool(), author_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("author", author_id))?;

    let books = queries::list_books_by_author(db.pool(), author_id).await?;

    Ok(AuthorDetail { author, books })
}

/// All authors, name-ordered (for form dropdowns and admin views)
pub async fn list_authors(db: &Database) -> Result<Vec<Author>> {
    queries::list_authors(db.pool()).await
}

/// All genres, name-ordered
pub async fn list_genres(db: &Database) -> Result<Vec<Genre>> {
    queries::list_genres(db.pool()).await
}

/// The statistics view
pub async fn statistics(db: &Database) -> Result<CatalogStatistics> {
    stats::gather(db.pool()).await
}
