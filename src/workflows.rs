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


//! Mutation workflows
//!
//! The write-side operations of the catalog. Every workflow:
//!
//! 1. requires an [`Identity`] and fails `Unauthorized` before anything else
//! 2. validates proposed values, refusing to write on any failure
//! 3. runs its fetch-then-write sequence inside one transaction
//!
//! The store's own constraints (the composite unique review index, the
//! foreign keys) remain the final guard: a racing writer that slips past an
//! application-level check surfaces as `ConstraintViolation`, never as a
//! duplicate row or a panic.

use crate::error::{CatalogError, Result};
use crate::storage::models::{NewAuthor, NewBook, NewReview};
use crate::storage::{queries, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An authenticated caller, as handed over by the identity collaborator
///
/// The core never authenticates anyone; it only checks that an identity is
/// present and uses its `user_id` to scope reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// Upsert the user row backing an external identity
///
/// Callers that manage accounts elsewhere use this to obtain an [`Identity`]
/// whose `user_id` reviews can reference.
pub async fn register_identity(db: &Database, username: &str) -> Result<Identity> {
    let user_id = queries::upsert_user(db.pool(), username).await?;
    Ok(Identity {
        user_id,
        username: username.to_string(),
    })
}

fn require_identity(identity: Option<&Identity>) -> Result<&Identity> {
    identity.ok_or(CatalogError::Unauthorized)
}

/// Create a book with its genre associations
///
/// Returns the new book id. On validation failure nothing is written and the
/// caller receives the full field-error list.
pub async fn create_book(
    db: &Database,
    identity: Option<&Identity>,
    input: &NewBook,
) -> Result<i64> {
    let identity = require_identity(identity)?;

    let errors = crate::validation::validate_book(input);
    if !errors.is_empty() {
        return Err(CatalogError::validation(errors));
    }

    let mut tx = db.pool().begin().await?;

    // Author must exist; a dangling reference is a user-visible not-found,
    // not a constraint blowup.
    if queries::find_author_by_id(&mut *tx, input.author_id)
        .await?
        .is_none()
    {
        return Err(CatalogError::not_found("author", input.author_id));
    }

    let book_id = queries::insert_book(&mut *tx, input).await?;
    for genre_id in &input.genre_ids {
        queries::add_book_genre(&mut *tx, book_id, *genre_id).await?;
    }

    tx.commit().await?;

    info!(book_id, user = %identity.username, "book created");
    Ok(book_id)
}

/// Edit a book in place, replacing its genre associations
///
/// `created_at` is preserved; `updated_at` refreshes on commit.
pub async fn edit_book(
    db: &Database,
    identity: Option<&Identity>,
    book_id: i64,
    input: &NewBook,
) -> Result<()> {
    let identity = require_identity(identity)?;

    let mut tx = db.pool().begin().await?;

    if queries::find_book_by_id(&mut *tx, book_id).await?.is_none() {
        return Err(CatalogError::not_found("book", book_id));
    }

    let errors = crate::validation::validate_book(input);
    if !errors.is_empty() {
        return Err(CatalogError::validation(errors));
    }

    if queries::find_author_by_id(&mut *tx, input.author_id)
        .await?
        .is_none()
    {
        return Err(CatalogError::not_found("author", input.author_id));
    }

    queries::update_book(&mut *tx, book_id, input).await?;
    queries::clear_book_genres(&mut *tx, book_id).await?;
    for genre_id in &input.genre_ids {
        queries::add_book_genre(&mut *tx, book_id, *genre_id).await?;
    }

    tx.commit().await?;

    info!(book_id, user = %identity.username, "book updated");
    Ok(())
}

/// Delete a book; its reviews and genre associations cascade with it
pub async fn delete_book(db: &Database, identity: Option<&Identity>, book_id: i64) -> Result<()> {
    let identity = require_identity(identity)?;

    let mut tx = db.pool().begin().await?;

    if queries::find_book_by_id(&mut *tx, book_id).await?.is_none() {
        return Err(CatalogError::not_found("book", book_id));
    }

    queries::delete_book(&mut *tx, book_id).await?;

    tx.commit().await?;

    info!(book_id, user = %identity.username, "book deleted");
    Ok(())
}

/// Create an author
pub async fn create_author(
    db: &Database,
    identity: Option<&Identity>,
    input: &NewAuthor,
) -> Result<i64> {
    let identity = require_identity(identity)?;

    let errors = crate::validation::validate_author(input);
    if !errors.is_empty() {
        return Err(CatalogError::validation(errors));
    }

    let author_id = queries::insert_author(db.pool(), input).await?;

    info!(author_id, user = %identity.username, "author created");
    Ok(author_id)
}

/// Create or update the caller's review of a book
///
/// Each user has at most one review per book: a second submission updates
/// the existing review's rating and text instead of inserting a row.
/// Returns the review id. If two upserts for the same (book, user) race,
/// the store's unique index rejects the loser, which surfaces as
/// `ConstraintViolation`.
pub async fn upsert_review(
    db: &Database,
    identity: Option<&Identity>,
    book_id: i64,
    input: &NewReview,
) -> Result<i64> {
    let identity = require_identity(identity)?;

    let mut tx = db.pool().begin().await?;

    if queries::find_book_by_id(&mut *tx, book_id).await?.is_none() {
        return Err(CatalogError::not_found("book", book_id));
    }

    let errors = crate::validation::validate_review(input);
    if !errors.is_empty() {
        return Err(CatalogError::validation(errors));
    }

    let existing = queries::find_review_for_book_user(&mut *tx, book_id, identity.user_id).await?;

    let review_id = match existing {
        Some(review) => {
            queries::update_review(&mut *tx, review.review_id, input).await?;
            debug!(review_id = review.review_id, "existing review updated");
            review.review_id
        }
        None => {
            let id = queries::insert_review(&mut *tx, book_id, identity.user_id, input).await?;
            debug!(review_id = id, "new review inserted");
            id
        }
    };

    tx.commit().await?;

    info!(book_id, review_id, user = %identity.username, "review upserted");
    Ok(review_id)
}
