//! Catalog store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist items and lazily created categories.
//! - Serve list/get/search reads joined with category display names.
//!
//! # Invariants
//! - At most one `categories` row exists per exact name (UNIQUE + upsert).
//! - An item insert and the category resolve it depends on commit together.
//! - Search folds case with Unicode rules on both sides; the connection must
//!   come from `db::open_db*`, which registers the folding function.

use crate::db::{DbError, LOWER_FN};
use crate::model::item::{
    validate_category_name, Category, CategoryId, ItemId, ItemRecord, ItemValidationError,
    NewItem,
};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const ITEM_SELECT_SQL: &str = "SELECT
    items.id AS id,
    items.name AS name,
    categories.name AS category,
    items.image_name AS image_name
FROM items
JOIN categories ON items.category_id = categories.id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Catalog store interface.
///
/// Every call may block on storage I/O.
pub trait CatalogRepository {
    /// Returns the id for `name`, creating the category on first use.
    fn resolve_category(&self, name: &str) -> RepoResult<CategoryId>;
    /// Validates and inserts one item; commits before returning.
    fn create_item(&self, item: &NewItem) -> RepoResult<ItemId>;
    fn list_items(&self) -> RepoResult<Vec<ItemRecord>>;
    fn get_item(&self, id: ItemId) -> RepoResult<ItemRecord>;
    /// Case-insensitive substring match on item name or category name.
    fn search_items(&self, keyword: &str) -> RepoResult<Vec<ItemRecord>>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn resolve_category(&self, name: &str) -> RepoResult<CategoryId> {
        validate_category_name(name)?;
        resolve_category_on(self.conn, name)
    }

    fn create_item(&self, item: &NewItem) -> RepoResult<ItemId> {
        item.validate()?;

        let started_at = Instant::now();
        let result = (|| -> RepoResult<ItemId> {
            // IMMEDIATE takes the write lock up front so the busy timeout covers it.
            let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
            let category_id = resolve_category_on(&tx, &item.category)?;
            tx.execute(
                "INSERT INTO items (name, category_id, image_name) VALUES (?1, ?2, ?3);",
                params![item.name.as_str(), category_id, item.image_name.as_deref()],
            )?;
            let item_id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(item_id)
        })();

        match &result {
            Ok(item_id) => info!(
                "event=item_create module=repo status=ok item_id={} has_image={} duration_ms={}",
                item_id,
                item.image_name.is_some(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=item_create module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn list_items(&self) -> RepoResult<Vec<ItemRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY items.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<ItemRecord> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE items.id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_item_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn search_items(&self, keyword: &str) -> RepoResult<Vec<ItemRecord>> {
        let needle = keyword.to_lowercase();
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE ?1 = ''
                OR instr({LOWER_FN}(items.name), ?1) > 0
                OR instr({LOWER_FN}(categories.name), ?1) > 0
             ORDER BY items.id ASC;"
        ))?;
        let mut rows = stmt.query([needle])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id ASC;")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get("id")?,
                    name: row.get("name")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

/// Atomic get-or-insert keyed by the UNIQUE `categories.name` constraint.
///
/// Two writers racing on an unseen name both end up with the same id.
fn resolve_category_on(conn: &Connection, name: &str) -> RepoResult<CategoryId> {
    let inserted = conn.execute(
        "INSERT INTO categories (name) VALUES (?1) ON CONFLICT(name) DO NOTHING;",
        [name],
    )?;

    let id = conn
        .query_row(
            "SELECT id FROM categories WHERE name = ?1;",
            [name],
            |row| row.get::<_, CategoryId>(0),
        )
        .optional()?
        .ok_or_else(|| {
            RepoError::InvalidData("category row missing right after upsert".to_string())
        })?;

    info!(
        "event=category_resolve module=repo status=ok category_id={} created={}",
        id,
        inserted > 0
    );
    Ok(id)
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<ItemRecord> {
    Ok(ItemRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        category: row.get("category")?,
        image_name: row.get("image_name")?,
    })
}
