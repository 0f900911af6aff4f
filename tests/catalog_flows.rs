//! End-to-end catalog scenarios
//!
//! Drives the public surface the way a request collaborator would: register
//! an identity, run mutation workflows, then read everything back through
//! the catalog views.

use biblio_core::error::CatalogError;
use biblio_core::storage::models::{NewAuthor, NewBook, NewGenre, NewReview};
use biblio_core::storage::{queries, BookFilter, Database};
use biblio_core::workflows::{self, Identity};
use biblio_core::catalog;

async fn new_catalog() -> (Database, Identity) {
    let db = Database::new_in_memory()
        .await
        .expect("Failed to create database");
    let identity = workflows::register_identity(&db, "librarian")
        .await
        .expect("Failed to register identity");
    (db, identity)
}

async fn add_author(db: &Database, identity: &Identity, name: &str) -> i64 {
    workflows::create_author(db, Some(identity), &NewAuthor::new(name.to_string()))
        .await
        .expect("Failed to create author")
}

async fn add_book(db: &Database, identity: &Identity, title: &str, author_id: i64, year: i32) -> i64 {
    workflows::create_book(
        db,
        Some(identity),
        &NewBook::new(title.to_string(), author_id, year, "Аннотация".to_string()),
    )
    .await
    .expect("Failed to create book")
}

#[tokio::test]
async fn statistics_track_publication_years() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;

    for (title, year) in [("1984", 1949), ("Преступление и наказание", 1866), ("Мастер и Маргарита", 1966)] {
        add_book(&db, &identity, title, author, year).await;
    }

    let stats = catalog::statistics(&db).await.unwrap();
    assert_eq!(stats.book_count, 3);
    assert_eq!(stats.oldest_year, Some(1866));
    assert_eq!(stats.newest_year, Some(1966));
}

#[tokio::test]
async fn statistics_pick_most_popular_genre() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;

    let roman = queries::insert_genre(db.pool(), &NewGenre::new("Роман".to_string()))
        .await
        .unwrap();
    let dystopia = queries::insert_genre(db.pool(), &NewGenre::new("Антиутопия".to_string()))
        .await
        .unwrap();

    for (title, genre) in [("Первая", roman), ("Вторая", roman), ("Третья", dystopia)] {
        let mut book = NewBook::new(title.to_string(), author, 2000, "Текст".to_string());
        book.genre_ids = vec![genre];
        workflows::create_book(&db, Some(&identity), &book).await.unwrap();
    }

    let stats = catalog::statistics(&db).await.unwrap();
    let popular = stats.popular_genre.expect("No popular genre");
    assert_eq!(popular.name, "Роман");
    assert_eq!(popular.book_count, 2);
}

#[tokio::test]
async fn empty_catalog_statistics_are_sentinels_and_zeros() {
    let (db, _identity) = new_catalog().await;

    let stats = catalog::statistics(&db).await.unwrap();
    assert_eq!(
        (stats.book_count, stats.author_count, stats.genre_count, stats.review_count),
        (0, 0, 0, 0)
    );
    assert!(stats.popular_genre.is_none());
    assert!(stats.oldest_year.is_none());
    assert!(stats.newest_year.is_none());
    assert!(stats.average_year.is_none());
    assert!(stats.average_rating.is_none());
    assert!(stats.recent_books.is_empty());
    assert!(stats.most_reviewed.is_empty());
}

#[tokio::test]
async fn search_matches_title_substring_case_insensitively() {
    let (db, identity) = new_catalog().await;
    let orwell = add_author(&db, &identity, "Джордж Оруэлл").await;
    let bulgakov = add_author(&db, &identity, "Михаил Булгаков").await;

    add_book(&db, &identity, "1984", orwell, 1949).await;
    add_book(&db, &identity, "Скотный двор: Animal Farm", orwell, 1945).await;
    add_book(&db, &identity, "Мастер и Маргарита", bulgakov, 1966).await;

    let hits = catalog::list_books(
        &db,
        &BookFilter {
            genre_id: None,
            search: Some("1984".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "1984");

    // ASCII case folding
    let hits = catalog::list_books(
        &db,
        &BookFilter {
            genre_id: None,
            search: Some("animal farm".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Скотный двор: Animal Farm");

    // No filters: all three, newest insertion first
    let all = catalog::list_books(&db, &BookFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "Мастер и Маргарита");
}

#[tokio::test]
async fn genre_and_search_filters_compose_with_and() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;

    let dystopia = queries::insert_genre(db.pool(), &NewGenre::new("Антиутопия".to_string()))
        .await
        .unwrap();

    let mut in_genre = NewBook::new("1984".to_string(), author, 1949, "Текст".to_string());
    in_genre.genre_ids = vec![dystopia];
    workflows::create_book(&db, Some(&identity), &in_genre).await.unwrap();

    // Title matches but genre does not
    add_book(&db, &identity, "1984: комментарий", author, 1984).await;

    let hits = catalog::list_books(
        &db,
        &BookFilter {
            genre_id: Some(dystopia),
            search: Some("1984".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "1984");
}

#[tokio::test]
async fn deleting_a_book_removes_its_reviews() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;
    let book_id = add_book(&db, &identity, "Книга", author, 2000).await;

    let mut review_ids = Vec::new();
    for name in ["alice", "bob", "carol"] {
        let reader = workflows::register_identity(&db, name).await.unwrap();
        let id = workflows::upsert_review(
            &db,
            Some(&reader),
            book_id,
            &NewReview {
                rating: 4,
                text: format!("Рецензия от {name} на книгу"),
            },
        )
        .await
        .unwrap();
        review_ids.push(id);
    }
    assert_eq!(queries::count_reviews(db.pool()).await.unwrap(), 3);

    workflows::delete_book(&db, Some(&identity), book_id).await.unwrap();

    for id in review_ids {
        assert!(
            queries::find_review_by_id(db.pool(), id).await.unwrap().is_none(),
            "review {id} survived its book"
        );
    }
    let err = catalog::book_detail(&db, book_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { entity: "book", .. }));
}

#[tokio::test]
async fn repeated_review_submission_updates_in_place() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;
    let book_id = add_book(&db, &identity, "Книга", author, 2000).await;
    let reader = workflows::register_identity(&db, "reader").await.unwrap();

    workflows::upsert_review(
        &db,
        Some(&reader),
        book_id,
        &NewReview {
            rating: 2,
            text: "Не осилил с первого раза".to_string(),
        },
    )
    .await
    .unwrap();

    workflows::upsert_review(
        &db,
        Some(&reader),
        book_id,
        &NewReview {
            rating: 5,
            text: "Со второго раза шедевр".to_string(),
        },
    )
    .await
    .unwrap();

    let detail = catalog::book_detail(&db, book_id).await.unwrap();
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.reviews[0].rating, 5);
    assert_eq!(detail.reviews[0].text, "Со второго раза шедевр");
    assert_eq!(detail.average_rating, Some(5.0));
}

#[tokio::test]
async fn rating_and_title_boundaries_enforced_end_to_end() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;
    let book_id = add_book(&db, &identity, "Книга", author, 2000).await;
    let reader = workflows::register_identity(&db, "reader").await.unwrap();

    for rating in [0, 6] {
        let err = workflows::upsert_review(
            &db,
            Some(&reader),
            book_id,
            &NewReview {
                rating,
                text: "Достаточно длинный текст".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }), "rating {rating} accepted");
    }
    for rating in [1, 5] {
        workflows::upsert_review(
            &db,
            Some(&reader),
            book_id,
            &NewReview {
                rating,
                text: "Достаточно длинный текст".to_string(),
            },
        )
        .await
        .unwrap_or_else(|e| panic!("rating {rating} rejected: {e}"));
    }

    // Titles: 1 rejected, 2 and 200 accepted, 201 rejected
    for (len, ok) in [(1usize, false), (2, true), (200, true), (201, false)] {
        let input = NewBook::new("т".repeat(len), author, 2000, "Текст".to_string());
        let result = workflows::create_book(&db, Some(&identity), &input).await;
        assert_eq!(result.is_ok(), ok, "title of length {len}");
    }
}

#[tokio::test]
async fn detail_view_reflects_last_write() {
    let (db, identity) = new_catalog().await;
    let orwell = add_author(&db, &identity, "Джордж Оруэлл").await;
    let bulgakov = add_author(&db, &identity, "Михаил Булгаков").await;

    let roman = queries::insert_genre(db.pool(), &NewGenre::new("Роман".to_string()))
        .await
        .unwrap();
    let satire = queries::insert_genre(db.pool(), &NewGenre::new("Сатира".to_string()))
        .await
        .unwrap();

    let mut input = NewBook::new("Черновик".to_string(), orwell, 1949, "Текст".to_string());
    input.genre_ids = vec![roman];
    let book_id = workflows::create_book(&db, Some(&identity), &input).await.unwrap();

    let before = catalog::book_detail(&db, book_id).await.unwrap();

    input.title = "Мастер и Маргарита".to_string();
    input.author_id = bulgakov;
    input.genre_ids = vec![roman, satire];
    input.publication_year = 1966;
    input.pages = 480;
    workflows::edit_book(&db, Some(&identity), book_id, &input).await.unwrap();

    let after = catalog::book_detail(&db, book_id).await.unwrap();
    assert_eq!(after.book.title, "Мастер и Маргарита");
    assert_eq!(after.author.name, "Михаил Булгаков");
    assert_eq!(after.book.pages, 480);
    let names: Vec<&str> = after.genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Роман", "Сатира"]);
    assert_eq!(after.book.created_at, before.book.created_at);
}

#[tokio::test]
async fn unauthorized_callers_cannot_mutate() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;
    let book_id = add_book(&db, &identity, "Книга", author, 2000).await;

    let input = NewBook::new("Другое".to_string(), author, 2001, "Текст".to_string());
    assert!(matches!(
        workflows::edit_book(&db, None, book_id, &input).await.unwrap_err(),
        CatalogError::Unauthorized
    ));
    assert!(matches!(
        workflows::create_author(&db, None, &NewAuthor::new("Кто-то".to_string()))
            .await
            .unwrap_err(),
        CatalogError::Unauthorized
    ));

    // Nothing changed
    let detail = catalog::book_detail(&db, book_id).await.unwrap();
    assert_eq!(detail.book.title, "Книга");
    assert_eq!(queries::count_authors(db.pool()).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_upserts_never_duplicate_a_review() {
    let (db, identity) = new_catalog().await;
    let author = add_author(&db, &identity, "Автор").await;
    let book_id = add_book(&db, &identity, "Книга", author, 2000).await;
    let reader = workflows::register_identity(&db, "reader").await.unwrap();

    let mut handles = Vec::new();
    for attempt in 0..4 {
        let db = db.clone();
        let reader = reader.clone();
        handles.push(tokio::spawn(async move {
            workflows::upsert_review(
                &db,
                Some(&reader),
                book_id,
                &NewReview {
                    rating: 1 + attempt % 5,
                    text: format!("Попытка номер {attempt} из многих"),
                },
            )
            .await
        }));
    }

    for handle in handles {
        // A losing racer may surface ConstraintViolation; a duplicate row may not exist
        match handle.await.expect("task panicked") {
            Ok(_) => {}
            Err(CatalogError::ConstraintViolation(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(queries::count_reviews(db.pool()).await.unwrap(), 1);
}
