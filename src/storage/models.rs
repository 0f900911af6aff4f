//! Database models for the catalog
//!
//! Entity structs mapped 1:1 onto the SQLite schema, plus the `New*` structs
//! used for inserts and the denormalized view models the read side returns.
//!
//! # SQLite Adaptations
//! - DateTime stored as TEXT, assigned by the database (DEFAULT / trigger)
//! - Dates stored as TEXT in ISO 8601 format
//! - The Book↔Genre many-to-many uses the `book_genres` junction table
//! - Listing views aggregate genre names with GROUP_CONCAT into one column

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// Author entity
///
/// Owns zero or more books; deleting an author cascades to its books.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub author_id: i64,
    pub name: String,
    #[sqlx(default)]
    pub bio: Option<String>,
    #[sqlx(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Genre entity, many-to-many with books
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Genre {
    pub genre_id: i64,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
}

/// Book entity - core catalog record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub author_id: i64,
    pub publication_year: i32,
    pub annotation: String,
    /// Reference path into the media store, e.g. "covers/<uuid>.jpg"
    #[sqlx(default)]
    pub cover_path: Option<String>,
    pub pages: i32,
    #[sqlx(default)]
    pub isbn: Option<String>,

    // Server-assigned timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User row backing an external identity
///
/// Authentication lives outside the core; this table exists so reviews have
/// a foreign key to point at.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
}

/// Review entity - one per (book, user) pair
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub review_id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// VIEW MODELS
// ============================================================================

/// Review joined with its reviewing user, for the book detail view
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReviewWithUser {
    pub review_id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub username: String,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book listing row with author name and aggregated genre names
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookSummary {
    pub book_id: i64,
    pub title: String,
    pub author_id: i64,
    pub author_name: String,
    pub publication_year: i32,
    pub annotation: String,
    #[sqlx(default)]
    pub cover_path: Option<String>,
    pub pages: i32,
    #[sqlx(default)]
    pub isbn: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Genre names as a comma-separated string (GROUP_CONCAT)
    #[sqlx(default)]
    pub genres_str: Option<String>,
}

impl BookSummary {
    /// Parse the aggregated genre column into a vector of names
    pub fn genre_names(&self) -> Vec<String> {
        self.genres_str
            .as_ref()
            .map(|s| {
                s.split(", ")
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// NEW RECORD STRUCTS (for inserts and edits)
// ============================================================================

/// Proposed book values for create/edit workflows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author_id: i64,
    /// Genres to associate; may be empty
    pub genre_ids: Vec<i64>,
    pub publication_year: i32,
    pub annotation: String,
    pub cover_path: Option<String>,
    pub pages: i32,
    pub isbn: Option<String>,
}

impl NewBook {
    pub fn new(title: String, author_id: i64, publication_year: i32, annotation: String) -> Self {
        Self {
            title,
            author_id,
            genre_ids: Vec::new(),
            publication_year,
            annotation,
            cover_path: None,
            pages: 0,
            isbn: None,
        }
    }
}

/// Proposed author values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl NewAuthor {
    pub fn new(name: String) -> Self {
        Self {
            name,
            bio: None,
            birth_date: None,
        }
    }
}

/// Proposed genre values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
    pub description: Option<String>,
}

impl NewGenre {
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: None,
        }
    }
}

/// Proposed review values; the (book, user) pair comes from the workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub rating: i32,
    pub text: String,
}
