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


use anyhow::Context;
use biblio_core::storage::models::{NewAuthor, NewBook, NewGenre, NewReview};
use biblio_core::storage::{queries, BookFilter, Database};
use biblio_core::{catalog, workflows};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "biblio-cli")]
#[command(about = "Biblio CLI - Desktop testing tool for the catalog core", long_about = None)]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and run migrations
    Init,
    /// Populate the catalog with a small sample library
    Seed,
    /// List books, optionally filtered
    List {
        /// Restrict to one genre id
        #[arg(long)]
        genre_id: Option<i64>,
        /// Case-insensitive title substring
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one book with reviews
    Show {
        /// Book id
        id: i64,
    },
    /// Print catalog statistics
    Stats,
    /// Add an author
    AddAuthor {
        /// Author name
        name: String,
        /// Short biography
        #[arg(long)]
        bio: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let db_path = cli.database.unwrap_or_else(Database::get_default_path);
    let db = Database::new(&db_path)
        .await
        .with_context(|| format!("opening database at {}", db_path.display()))?;

    match cli.command {
        Commands::Init => {
            println!("Database ready at {}", db_path.display());
        }
        Commands::Seed => {
            seed(&db).await?;
            println!("Sample catalog created.");
        }
        Commands::List { genre_id, search } => {
            let filter = BookFilter { genre_id, search };
            let books = catalog::list_books(&db, &filter).await?;
            if books.is_empty() {
                println!("No books found.");
            }
            for book in books {
                let genres = book.genre_names().join(", ");
                println!(
                    "#{:<4} {} — {} ({}) [{}]",
                    book.book_id, book.title, book.author_name, book.publication_year, genres
                );
            }
        }
        Commands::Show { id } => {
            let detail = catalog::book_detail(&db, id).await?;
            println!("{} — {}", detail.book.title, detail.author.name);
            println!("Год издания: {}", detail.book.publication_year);
            if detail.book.pages > 0 {
                println!("Страниц: {}", detail.book.pages);
            }
            if !detail.genres.is_empty() {
                let names: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
                println!("Жанры: {}", names.join(", "));
            }
            println!("\n{}\n", detail.book.annotation);
            match detail.average_rating {
                Some(avg) => println!("Средний рейтинг: {avg:.1} ({} рецензий)", detail.reviews.len()),
                None => println!("Рецензий пока нет."),
            }
            for review in &detail.reviews {
                println!("  [{}/5] {}: {}", review.rating, review.username, review.text);
            }
        }
        Commands::Stats => {
            let stats = catalog::statistics(&db).await?;
            println!("Книг: {}", stats.book_count);
            println!("Авторов: {}", stats.author_count);
            println!("Жанров: {}", stats.genre_count);
            println!("Рецензий: {}", stats.review_count);
            if let Some(genre) = &stats.popular_genre {
                println!("Популярный жанр: {} ({} книг)", genre.name, genre.book_count);
            }
            if let (Some(oldest), Some(newest)) = (stats.oldest_year, stats.newest_year) {
                println!("Годы издания: {oldest}–{newest}");
            }
            if let Some(avg) = stats.average_rating {
                println!("Средний рейтинг: {avg:.1}");
            }
            if !stats.most_reviewed.is_empty() {
                println!("Самые обсуждаемые:");
                for entry in &stats.most_reviewed {
                    println!("  {} — {} рецензий", entry.title, entry.review_count);
                }
            }
        }
        Commands::AddAuthor { name, bio } => {
            let identity = workflows::register_identity(&db, "cli").await?;
            let author = NewAuthor { name, bio, birth_date: None };
            let id = workflows::create_author(&db, Some(&identity), &author).await?;
            println!("Author #{id} created.");
        }
    }

    Ok(())
}

/// Insert the sample library: three classics, their genres, one review each
async fn seed(db: &Database) -> anyhow::Result<()> {
    let identity = workflows::register_identity(db, "reader").await?;

    let entries = [
        (
            "Мастер и Маргарита",
            "Михаил Булгаков",
            "Роман",
            1966,
            "Великий роман о добре и зле, любви и творчестве.",
            "Один из величайших романов XX века. Перечитываю каждый год.",
        ),
        (
            "1984",
            "Джордж Оруэлл",
            "Антиутопия",
            1949,
            "Антиутопия о тоталитарном обществе будущего.",
            "Пугающе актуально в наше время. Обязательно к прочтению.",
        ),
        (
            "Преступление и наказание",
            "Федор Достоевский",
            "Психологический роман",
            1866,
            "Психологический роман о преступлении и его последствиях.",
            "Глубокое исследование человеческой души. Классика!",
        ),
    ];

    for (title, author, genre, year, annotation, review) in entries {
        let author_id = workflows::create_author(
            db,
            Some(&identity),
            &NewAuthor::new(author.to_string()),
        )
        .await?;
        let genre_id = queries::insert_genre(db.pool(), &NewGenre::new(genre.to_string())).await?;

        let mut book = NewBook::new(title.to_string(), author_id, year, annotation.to_string());
        book.genre_ids = vec![genre_id];
        let book_id = workflows::create_book(db, Some(&identity), &book).await?;

        workflows::upsert_review(
            db,
            Some(&identity),
            book_id,
            &NewReview {
                rating: 5,
                text: review.to_string(),
            },
        )
        .await?;
    }

    Ok(())
}
