// Biblio - Library Catalog Core
// Copyright (C) 2026 Biblio contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Field-level validation
//!
//! Pure functions from proposed field values to accepted values or
//! [`FieldError`]s. Nothing here touches the store; workflows run these
//! checks first and refuse to write when any rule fails.
//!
//! Length rules count Unicode scalars, not bytes; catalog data is largely
//! Cyrillic and a 200-character title is routinely 400 bytes.

use crate::storage::models::{NewAuthor, NewBook, NewGenre, NewReview};
use serde::{Deserialize, Serialize};

/// Minimum title length in characters
pub const TITLE_MIN_CHARS: usize = 2;
/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 200;
/// Earliest accepted publication year
pub const YEAR_MIN: i32 = 1000;
/// Latest accepted publication year
pub const YEAR_MAX: i32 = 2030;
/// Rating scale bounds (inclusive)
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;
/// Minimum review length in non-whitespace characters
pub const REVIEW_MIN_CHARS: usize = 10;
/// Maximum author name length in characters
pub const AUTHOR_NAME_MAX_CHARS: usize = 100;
/// Maximum genre name length in characters
pub const GENRE_NAME_MAX_CHARS: usize = 50;
/// Maximum ISBN length in characters
pub const ISBN_MAX_CHARS: usize = 13;

/// A single failed validation rule, addressed to one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Input field the failure belongs to (e.g. "title")
    pub field: String,
    /// Display-ready failure message
    pub message: String,
}

impl FieldError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a proposed book
///
/// Collects every failed rule rather than stopping at the first, so the
/// rendering collaborator can mark all offending fields at once.
pub fn validate_book(book: &NewBook) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let title_chars = book.title.chars().count();
    if title_chars < TITLE_MIN_CHARS {
        errors.push(FieldError::new("title", "title too short"));
    } else if title_chars > TITLE_MAX_CHARS {
        errors.push(FieldError::new("title", "title too long"));
    }

    if book.publication_year < YEAR_MIN || book.publication_year > YEAR_MAX {
        errors.push(FieldError::new(
            "publication_year",
            "invalid publication year",
        ));
    }

    if book.pages < 0 {
        errors.push(FieldError::new("pages", "negative page count"));
    }

    if book.annotation.trim().is_empty() {
        errors.push(FieldError::new("annotation", "annotation required"));
    }

    if let Some(isbn) = &book.isbn {
        if isbn.chars().count() > ISBN_MAX_CHARS {
            errors.push(FieldError::new("isbn", "isbn too long"));
        }
    }

    errors
}

/// Validate a proposed author
pub fn validate_author(author: &NewAuthor) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if author.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name required"));
    } else if author.name.chars().count() > AUTHOR_NAME_MAX_CHARS {
        errors.push(FieldError::new("name", "name too long"));
    }

    errors
}

/// Validate a proposed genre
pub fn validate_genre(genre: &NewGenre) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if genre.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name required"));
    } else if genre.name.chars().count() > GENRE_NAME_MAX_CHARS {
        errors.push(FieldError::new("name", "name too long"));
    }

    errors
}

/// Validate a proposed review
pub fn validate_review(review: &NewReview) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if review.rating < RATING_MIN || review.rating > RATING_MAX {
        errors.push(FieldError::new("rating", "rating out of range"));
    }

    // Whitespace does not count toward the minimum length.
    let meaningful = review.text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < REVIEW_MIN_CHARS {
        errors.push(FieldError::new("text", "review too short"));
    }

    errors
}
