//! # Book Repository
//!
//! Database operations for the catalog: books, their variants (`bookType`)
//! and gallery images (`bookImages`).
//!
//! ## Cascading Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    add(book) / remove(id)                               │
//! │                                                                         │
//! │  add:                                  remove:                         │
//! │  BEGIN                                 BEGIN                            │
//! │  ├── duplicate name+author? → error    ├── book exists? → else error   │
//! │  ├── INSERT books           → id       ├── DELETE bookType   (book_id) │
//! │  ├── INSERT bookType   × N             ├── DELETE bookImages (book_id) │
//! │  ├── INSERT bookImages × M             ├── DELETE books      (id)      │
//! │  COMMIT                                COMMIT                           │
//! │                                                                         │
//! │  Any failure drops the transaction: nothing is left half-written.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bookshop_core::validation;
use bookshop_core::{
    Book, BookDetails, BookImage, BookType, CatalogEntry, NewBook, NewBookImage, NewBookType,
};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.books();
///
/// let added = repo.add(&new_book).await?;
/// let details = repo.get(added.book.id).await?;
/// repo.remove(added.book.id).await?;
/// ```
///
/// The repository has no `close` of its own: it shares the connection of
/// the [`Database`](crate::Database) it came from, which `Database::close`
/// releases for every repository at once.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Gets every book with its variants and images, ordered by id.
    pub async fn get_all(&self) -> DbResult<Vec<BookDetails>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, name, author, description, image
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut types: HashMap<i64, Vec<BookType>> = HashMap::new();
        for book_type in sqlx::query_as::<_, BookType>(
            r#"
            SELECT
                id,
                book_id,
                COALESCE(price_mu, 0) AS price_mu,
                ean,
                COALESCE(type, 'paperback') AS binding,
                COALESCE(condition, 'new') AS condition,
                COALESCE(qty, 0) AS qty,
                weight_gm
            FROM bookType
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        {
            types.entry(book_type.book_id).or_default().push(book_type);
        }

        let mut images: HashMap<i64, Vec<BookImage>> = HashMap::new();
        for image in sqlx::query_as::<_, BookImage>(
            r#"
            SELECT
                id,
                book_id,
                image_thumbnail_name AS thumbnail,
                image_fullsize_name AS fullsize
            FROM bookImages
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        {
            images.entry(image.book_id).or_default().push(image);
        }

        let details: Vec<BookDetails> = books
            .into_iter()
            .map(|book| BookDetails {
                types: types.remove(&book.id).unwrap_or_default(),
                images: images.remove(&book.id).unwrap_or_default(),
                book,
            })
            .collect();

        debug!(count = details.len(), "Loaded all books");
        Ok(details)
    }

    /// Gets a book with its variants and images.
    ///
    /// ## Returns
    /// * `Ok(BookDetails)` - Book found
    /// * `Err(DbError::NotFound)` - `book id "<id>" not found`
    pub async fn get(&self, id: i64) -> DbResult<BookDetails> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, name, author, description, image
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("book", id))?;

        let types = self.get_types(id).await?;
        let images = self.get_images(id).await?;

        Ok(BookDetails {
            book,
            types,
            images,
        })
    }

    /// Gets the variants of a book (empty for an unknown book).
    pub async fn get_types(&self, book_id: i64) -> DbResult<Vec<BookType>> {
        let types = sqlx::query_as::<_, BookType>(
            r#"
            SELECT
                id,
                book_id,
                COALESCE(price_mu, 0) AS price_mu,
                ean,
                COALESCE(type, 'paperback') AS binding,
                COALESCE(condition, 'new') AS condition,
                COALESCE(qty, 0) AS qty,
                weight_gm
            FROM bookType
            WHERE book_id = ?1
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    /// Gets the gallery images of a book (empty for an unknown book).
    pub async fn get_images(&self, book_id: i64) -> DbResult<Vec<BookImage>> {
        let images = sqlx::query_as::<_, BookImage>(
            r#"
            SELECT
                id,
                book_id,
                image_thumbnail_name AS thumbnail,
                image_fullsize_name AS fullsize
            FROM bookImages
            WHERE book_id = ?1
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    /// Lists every variant joined with its book, one row per variant.
    ///
    /// Books without variants are not listed: there is nothing to buy.
    pub async fn catalog(&self) -> DbResult<Vec<CatalogEntry>> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT
                b.id AS book_id,
                b.name,
                b.author,
                b.image,
                t.id AS book_type_id,
                COALESCE(t.price_mu, 0) AS price_mu,
                COALESCE(t.type, 'paperback') AS binding,
                COALESCE(t.condition, 'new') AS condition,
                COALESCE(t.qty, 0) AS qty
            FROM books b
            INNER JOIN bookType t ON t.book_id = b.id
            ORDER BY b.name, b.id, t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = entries.len(), "Loaded catalog");
        Ok(entries)
    }

    /// Adds a book together with its variants and images.
    ///
    /// ## Errors
    /// * `missing book name` - name absent or blank
    /// * `book "<name>" by author "<author>" is already added` - duplicate
    /// * validation errors from any variant or image
    pub async fn add(&self, book: &NewBook) -> DbResult<BookDetails> {
        validation::validate_new_book(book)?;

        debug!(
            name = %book.name,
            types = book.types.len(),
            images = book.images.len(),
            "Adding book"
        );

        let mut tx = self.pool.begin().await?;

        let author = book.author.as_deref();
        if count_same_title(&mut *tx, &book.name, author, None).await? > 0 {
            return Err(duplicate_title(&book.name, author));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO books (name, author, description, image)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(book.name.as_str())
        .bind(author)
        .bind(book.description.as_deref())
        .bind(book.image.as_deref())
        .execute(&mut *tx)
        .await?;
        let book_id = result.last_insert_rowid();

        let mut types = Vec::with_capacity(book.types.len());
        for book_type in &book.types {
            types.push(insert_book_type(&mut *tx, book_id, book_type).await?);
        }

        let mut images = Vec::with_capacity(book.images.len());
        for image in &book.images {
            images.push(insert_book_image(&mut *tx, book_id, image).await?);
        }

        tx.commit().await?;

        debug!(id = book_id, "Book added");
        Ok(BookDetails {
            book: Book {
                id: book_id,
                name: book.name.clone(),
                author: book.author.clone(),
                description: book.description.clone(),
                image: book.image.clone(),
            },
            types,
            images,
        })
    }

    /// Adds a variant to an existing book.
    pub async fn add_book_type(&self, book_id: i64, book_type: &NewBookType) -> DbResult<BookType> {
        validation::validate_book_type(book_type)?;
        debug!(book_id = book_id, price_mu = book_type.price_mu, "Adding book type");

        let mut tx = self.pool.begin().await?;
        if !book_exists(&mut *tx, book_id).await? {
            return Err(DbError::not_found("book", book_id));
        }
        let inserted = insert_book_type(&mut *tx, book_id, book_type).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    /// Adds a gallery image to an existing book.
    pub async fn add_book_images(&self, book_id: i64, image: &NewBookImage) -> DbResult<BookImage> {
        validation::validate_book_image(image)?;
        debug!(book_id = book_id, "Adding book image");

        let mut tx = self.pool.begin().await?;
        if !book_exists(&mut *tx, book_id).await? {
            return Err(DbError::not_found("book", book_id));
        }
        let inserted = insert_book_image(&mut *tx, book_id, image).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    /// Overwrites every scalar column of an existing book.
    ///
    /// ## Errors
    /// * `missing book id` - id is zero or negative
    /// * `book id "<id>" not found` - checked before the name
    /// * `missing book name` - name blank
    /// * duplicate - another book already has this name+author
    pub async fn update(&self, book: &Book) -> DbResult<()> {
        validation::validate_id("book id", book.id)?;

        debug!(id = book.id, "Updating book");

        let mut tx = self.pool.begin().await?;

        if !book_exists(&mut *tx, book.id).await? {
            return Err(DbError::not_found("book", book.id));
        }
        validation::validate_book_name(&book.name)?;

        let author = book.author.as_deref();
        if count_same_title(&mut *tx, &book.name, author, Some(book.id)).await? > 0 {
            return Err(duplicate_title(&book.name, author));
        }

        sqlx::query(
            r#"
            UPDATE books SET
                name = ?2,
                author = ?3,
                description = ?4,
                image = ?5
            WHERE id = ?1
            "#,
        )
        .bind(book.id)
        .bind(book.name.as_str())
        .bind(author)
        .bind(book.description.as_deref())
        .bind(book.image.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Overwrites every column of an existing variant.
    ///
    /// The variant may be moved to another book, which must exist.
    pub async fn update_book_type(&self, book_type: &BookType) -> DbResult<()> {
        validation::validate_id("book type id", book_type.id)?;
        validation::validate_id("book id", book_type.book_id)?;
        validation::validate_book_type(&NewBookType::from(book_type))?;

        debug!(id = book_type.id, book_id = book_type.book_id, "Updating book type");

        let mut tx = self.pool.begin().await?;

        if !book_type_exists(&mut *tx, book_type.id).await? {
            return Err(DbError::not_found("book type", book_type.id));
        }
        if !book_exists(&mut *tx, book_type.book_id).await? {
            return Err(DbError::not_found("book", book_type.book_id));
        }

        sqlx::query(
            r#"
            UPDATE bookType SET
                book_id = ?2,
                price_mu = ?3,
                ean = ?4,
                type = ?5,
                condition = ?6,
                qty = ?7,
                weight_gm = ?8
            WHERE id = ?1
            "#,
        )
        .bind(book_type.id)
        .bind(book_type.book_id)
        .bind(book_type.price_mu)
        .bind(book_type.ean.as_deref())
        .bind(book_type.binding)
        .bind(book_type.condition)
        .bind(book_type.qty)
        .bind(book_type.weight_gm)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Overwrites both file names of an existing gallery image.
    pub async fn update_book_images(&self, image: &BookImage) -> DbResult<()> {
        validation::validate_id("book image id", image.id)?;
        validation::validate_id("book id", image.book_id)?;
        validation::validate_book_image(&NewBookImage::from(image))?;

        debug!(id = image.id, book_id = image.book_id, "Updating book image");

        let mut tx = self.pool.begin().await?;

        if !book_image_exists(&mut *tx, image.id).await? {
            return Err(DbError::not_found("book image", image.id));
        }
        if !book_exists(&mut *tx, image.book_id).await? {
            return Err(DbError::not_found("book", image.book_id));
        }

        sqlx::query(
            r#"
            UPDATE bookImages SET
                book_id = ?2,
                image_thumbnail_name = ?3,
                image_fullsize_name = ?4
            WHERE id = ?1
            "#,
        )
        .bind(image.id)
        .bind(image.book_id)
        .bind(image.thumbnail.as_deref())
        .bind(image.fullsize.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Removes a book with its variants and images.
    ///
    /// Children are deleted before the parent, inside one transaction.
    ///
    /// ## Returns
    /// * `Ok(true)` - Book removed
    /// * `Err(DbError::NotFound)` - nothing was changed
    pub async fn remove(&self, id: i64) -> DbResult<bool> {
        debug!(id = id, "Removing book");

        let mut tx = self.pool.begin().await?;

        if !book_exists(&mut *tx, id).await? {
            return Err(DbError::not_found("book", id));
        }

        let types = sqlx::query("DELETE FROM bookType WHERE book_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let images = sqlx::query("DELETE FROM bookImages WHERE book_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            id = id,
            types = types.rows_affected(),
            images = images.rows_affected(),
            "Book removed"
        );
        Ok(true)
    }

    /// Counts books in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Statement helpers
// =============================================================================
// Generic over the executor so they run on the pool or inside a transaction.

async fn book_exists<'e, E>(executor: E, id: i64) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ?1")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(count > 0)
}

async fn book_type_exists<'e, E>(executor: E, id: i64) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookType WHERE id = ?1")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(count > 0)
}

async fn book_image_exists<'e, E>(executor: E, id: i64) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookImages WHERE id = ?1")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(count > 0)
}

/// Counts books sharing `name` and `author`, optionally ignoring one id.
///
/// `IS` compares NULL authors as equal.
async fn count_same_title<'e, E>(
    executor: E,
    name: &str,
    author: Option<&str>,
    exclude_id: Option<i64>,
) -> DbResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM books
        WHERE name = ?1 AND author IS ?2 AND id IS NOT ?3
        "#,
    )
    .bind(name)
    .bind(author)
    .bind(exclude_id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

async fn insert_book_type<'e, E>(
    executor: E,
    book_id: i64,
    book_type: &NewBookType,
) -> DbResult<BookType>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO bookType (book_id, price_mu, ean, type, condition, qty, weight_gm)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(book_id)
    .bind(book_type.price_mu)
    .bind(book_type.ean.as_deref())
    .bind(book_type.binding)
    .bind(book_type.condition)
    .bind(book_type.qty)
    .bind(book_type.weight_gm)
    .execute(executor)
    .await?;

    Ok(BookType {
        id: result.last_insert_rowid(),
        book_id,
        price_mu: book_type.price_mu,
        ean: book_type.ean.clone(),
        binding: book_type.binding,
        condition: book_type.condition,
        qty: book_type.qty,
        weight_gm: book_type.weight_gm,
    })
}

async fn insert_book_image<'e, E>(
    executor: E,
    book_id: i64,
    image: &NewBookImage,
) -> DbResult<BookImage>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO bookImages (book_id, image_thumbnail_name, image_fullsize_name)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(book_id)
    .bind(image.thumbnail.as_deref())
    .bind(image.fullsize.as_deref())
    .execute(executor)
    .await?;

    Ok(BookImage {
        id: result.last_insert_rowid(),
        book_id,
        thumbnail: image.thumbnail.clone(),
        fullsize: image.fullsize.clone(),
    })
}

fn duplicate_title(name: &str, author: Option<&str>) -> DbError {
    match author {
        Some(author) => DbError::already_exists(format!("book \"{name}\" by author \"{author}\"")),
        None => DbError::already_exists(format!("book \"{name}\"")),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
