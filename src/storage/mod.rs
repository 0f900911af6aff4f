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


//! Database storage and models
//!
//! All persistence for the catalog lives here, on SQLite via sqlx.
//!
//! # Database Schema
//! - authors: book creators (cascade-deletes their books)
//! - genres: many-to-many with books
//! - books: core catalog records
//! - users: rows backing external identities
//! - reviews: one per (book, user), unique at the store level
//! - book_genres: Book↔Genre junction table
//!
//! # Usage Example
//! ```no_run
//! use biblio_core::storage::{queries, Database, NewAuthor, NewBook};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./catalog.db").await?;
//!
//! let author_id = queries::insert_author(db.pool(), &NewAuthor::new("Джордж Оруэлл".into())).await?;
//! let book_id = queries::insert_book(
//!     db.pool(),
//!     &NewBook::new("1984".into(), author_id, 1949, "Антиутопия".into()),
//! )
//! .await?;
//!
//! let book = queries::find_book_by_id(db.pool(), book_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod stats;

// Re-export commonly used types
pub use database::Database;
pub use models::{
    Author, Book, BookSummary, Genre, NewAuthor, NewBook, NewGenre, NewReview, Review,
    ReviewWithUser, User,
};
pub use queries::BookFilter;
pub use stats::{BookReviewCount, CatalogStatistics, GenrePopularity};
