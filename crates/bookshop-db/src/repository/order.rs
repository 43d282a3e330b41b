//! # Order Repository
//!
//! Database operations for orders and their items.
//!
//! ## Order Placement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        add(order)                                       │
//! │                                                                         │
//! │  validate (user id, amount, status, items)                             │
//! │  BEGIN                                                                  │
//! │  ├── INSERT orders      → order id                                     │
//! │  ├── INSERT orderItems  × N  (order_id = order id)                     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Reads join orders ⋈ orderItems: one OrderLine per item.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The amount is stored as given. Stock levels are not touched and the
//! referenced account and book variants are not looked up unless SQLite
//! foreign key enforcement is switched on.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bookshop_core::validation;
use bookshop_core::{NewOrder, NewOrderItem, Order, OrderDetails, OrderItem, OrderLine};

const ORDER_LINE_SELECT: &str = r#"
    SELECT
        o.id,
        o.user_id,
        COALESCE(o.amount_mu, 0) AS amount_mu,
        COALESCE(o.status, 'pending') AS status,
        i.id AS order_item_id,
        i.book_type_id,
        i.qty
    FROM orders o
    INNER JOIN orderItems i ON i.order_id = o.id
"#;

/// Repository for order database operations.
///
/// Released through the [`Database`](crate::Database) handle it came from;
/// `Database::close` closes the shared connection.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order with all of its items.
    ///
    /// ## Errors
    /// * `missing user id`, `missing order items`, `qty must be positive`, ...
    /// * `DbError::ForeignKeyViolation` - unknown user or variant, only when
    ///   foreign keys are enforced; nothing is written
    pub async fn add(&self, order: &NewOrder) -> DbResult<OrderDetails> {
        validation::validate_new_order(order)?;

        debug!(
            user_id = order.user_id,
            amount_mu = order.amount_mu,
            items = order.items.len(),
            "Adding order"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (user_id, amount_mu, status)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(order.user_id)
        .bind(order.amount_mu)
        .bind(order.status.as_str())
        .execute(&mut *tx)
        .await?;
        let order_id = result.last_insert_rowid();

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            items.push(insert_order_item(&mut *tx, order_id, item).await?);
        }

        tx.commit().await?;

        debug!(id = order_id, "Order added");
        Ok(OrderDetails {
            order: Order {
                id: order_id,
                user_id: order.user_id,
                amount_mu: order.amount_mu,
                status: order.status.clone(),
            },
            items,
        })
    }

    /// Appends an item to an existing order.
    ///
    /// The order's `amount_mu` is left as it was.
    ///
    /// ## Errors
    /// * `missing order id`, `missing book type id`, `qty must be positive`
    /// * `order id "<id>" not found`
    pub async fn add_order_item(&self, order_id: i64, item: &NewOrderItem) -> DbResult<OrderItem> {
        validation::validate_id("order id", order_id)?;
        validation::validate_order_item(item)?;

        debug!(order_id = order_id, book_type_id = item.book_type_id, "Adding order item");

        let mut tx = self.pool.begin().await?;
        if !order_exists(&mut *tx, order_id).await? {
            return Err(DbError::not_found("order", order_id));
        }
        let inserted = insert_order_item(&mut *tx, order_id, item).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    /// Gets an order as one row per item.
    ///
    /// ## Returns
    /// * `Ok(Vec<OrderLine>)` - Order found
    /// * `Err(DbError::NotFound)` - `order id "<id>" not found`
    pub async fn get(&self, id: i64) -> DbResult<Vec<OrderLine>> {
        if !order_exists(&self.pool, id).await? {
            return Err(DbError::not_found("order", id));
        }

        let sql = format!("{ORDER_LINE_SELECT} WHERE o.id = ?1 ORDER BY i.id");
        let lines = sqlx::query_as::<_, OrderLine>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Gets every order as one row per item, ordered by order then item.
    pub async fn get_all(&self) -> DbResult<Vec<OrderLine>> {
        let sql = format!("{ORDER_LINE_SELECT} ORDER BY o.id, i.id");
        let lines = sqlx::query_as::<_, OrderLine>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = lines.len(), "Loaded all order lines");
        Ok(lines)
    }

    /// Gets the orders placed by one account, without items.
    pub async fn get_by_user(&self, user_id: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT
                id,
                user_id,
                COALESCE(amount_mu, 0) AS amount_mu,
                COALESCE(status, 'pending') AS status
            FROM orders
            WHERE user_id = ?1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}

// =============================================================================
// Statement helpers
// =============================================================================

async fn insert_order_item<'e, E>(
    executor: E,
    order_id: i64,
    item: &NewOrderItem,
) -> DbResult<OrderItem>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO orderItems (order_id, book_type_id, qty)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(order_id)
    .bind(item.book_type_id)
    .bind(item.qty)
    .execute(executor)
    .await?;

    Ok(OrderItem {
        id: result.last_insert_rowid(),
        order_id,
        book_type_id: item.book_type_id,
        qty: item.qty,
    })
}

async fn order_exists<'e, E>(executor: E, id: i64) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = ?1")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(count > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bookshop_core::{Binding, Money, NewBook, NewBookType};

    fn two_item_order(user_id: i64) -> NewOrder {
        NewOrder {
            user_id,
            amount_mu: 1852,
            items: vec![
                NewOrderItem {
                    book_type_id: 1,
                    qty: 2,
                },
                NewOrderItem {
                    book_type_id: 2,
                    qty: 1,
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_and_get_order() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.orders();

        let added = repo.add(&two_item_order(1)).await.unwrap();
        assert_eq!(added.order.status, "pending");
        assert_eq!(added.items.len(), 2);
        assert!(added.items.iter().all(|i| i.order_id == added.order.id));

        let lines = repo.get(added.order.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.id == added.order.id && l.amount_mu == 1852));
        assert_eq!(lines[0].order_item_id, added.items[0].id);
        assert_eq!(lines[0].qty, 2);
        assert_eq!(lines[1].book_type_id, 2);
    }

    #[tokio::test]
    async fn test_add_order_item() {
        let repo = Database::in_memory().await.unwrap().orders();
        let added = repo.add(&two_item_order(1)).await.unwrap();

        let item = NewOrderItem {
            book_type_id: 3,
            qty: 4,
        };
        let inserted = repo.add_order_item(added.order.id, &item).await.unwrap();
        assert_eq!(inserted.order_id, added.order.id);

        let lines = repo.get(added.order.id).await.unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].order_item_id, inserted.id);
        assert_eq!(lines[2].qty, 4);
        assert_eq!(lines[2].amount_mu, 1852);
    }

    #[tokio::test]
    async fn test_add_order_item_to_unknown_order_fails() {
        let repo = Database::in_memory().await.unwrap().orders();
        let item = NewOrderItem {
            book_type_id: 3,
            qty: 1,
        };

        let err = repo.add_order_item(77, &item).await.unwrap_err();
        assert_eq!(err.to_string(), "order id \"77\" not found");

        let err = repo.add_order_item(0, &item).await.unwrap_err();
        assert_eq!(err.to_string(), "missing order id");

        let added = repo.add(&two_item_order(1)).await.unwrap();
        let err = repo
            .add_order_item(added.order.id, &NewOrderItem { book_type_id: 3, qty: 0 })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "qty must be positive");
        assert_eq!(repo.get(added.order.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_order_fails() {
        let repo = Database::in_memory().await.unwrap().orders();
        let err = repo.get(77).await.unwrap_err();
        assert_eq!(err.to_string(), "order id \"77\" not found");
    }

    #[tokio::test]
    async fn test_get_all_orders_in_order() {
        let repo = Database::in_memory().await.unwrap().orders();
        let first = repo.add(&two_item_order(1)).await.unwrap();
        let second = repo
            .add(&NewOrder {
                user_id: 2,
                amount_mu: 132,
                status: "shipped".to_string(),
                items: vec![NewOrderItem {
                    book_type_id: 3,
                    qty: 1,
                }],
            })
            .await
            .unwrap();

        let lines = repo.get_all().await.unwrap();
        let ids: Vec<i64> = lines.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![first.order.id, first.order.id, second.order.id]);
        assert_eq!(lines[2].status, "shipped");

        let by_user = repo.get_by_user(2).await.unwrap();
        assert_eq!(by_user.len(), 1);
        assert_eq!(by_user[0].amount().to_string(), "1.32");
    }

    #[tokio::test]
    async fn test_amount_is_stored_as_given() {
        let repo = Database::in_memory().await.unwrap().orders();
        let order = NewOrder {
            amount_mu: 1,
            ..two_item_order(1)
        };
        let added = repo.add(&order).await.unwrap();
        assert_eq!(repo.get(added.order.id).await.unwrap()[0].amount_mu, 1);
    }

    #[tokio::test]
    async fn test_invalid_orders_are_rejected() {
        let repo = Database::in_memory().await.unwrap().orders();

        let err = repo.add(&NewOrder::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "missing user id");

        let no_items = NewOrder {
            user_id: 1,
            ..Default::default()
        };
        let err = repo.add(&no_items).await.unwrap_err();
        assert_eq!(err.to_string(), "missing order items");

        let mut zero_qty = two_item_order(1);
        zero_qty.items[1].qty = 0;
        let err = repo.add(&zero_qty).await.unwrap_err();
        assert_eq!(err.to_string(), "qty must be positive");

        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enforced_foreign_keys_roll_back_order() {
        let db = Database::new(DbConfig::in_memory().enforce_foreign_keys(true))
            .await
            .unwrap();

        let err = db.orders().add(&two_item_order(999)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // Known user, unknown variant: the order row is rolled back too.
        let account = db
            .accounts()
            .register("doej", "password123", "doej@example.com")
            .await
            .unwrap();
        let err = db.orders().add(&two_item_order(account.id)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.orders().get_by_user(account.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_for_catalog_variants() {
        let db = Database::in_memory().await.unwrap();
        let account = db
            .accounts()
            .register("doej", "password123", "doej@example.com")
            .await
            .unwrap();
        let book = db
            .books()
            .add(&NewBook {
                name: "Julius Caesar".to_string(),
                author: Some("William Shakespeare".to_string()),
                types: vec![NewBookType {
                    price_mu: 132,
                    binding: Binding::Paperback,
                    qty: 12,
                    ..Default::default()
                }],
                ..Default::default()
            })
            .await
            .unwrap();

        let variant = &book.types[0];
        let qty = 3;
        let order = NewOrder {
            user_id: account.id,
            amount_mu: (variant.price() * qty).minor(),
            items: vec![NewOrderItem {
                book_type_id: variant.id,
                qty,
            }],
            ..Default::default()
        };
        let added = db.orders().add(&order).await.unwrap();

        let lines = db.orders().get(added.order.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].user_id, account.id);
        assert_eq!(Money::from_minor(lines[0].amount_mu).to_string(), "3.96");

        // Stock is not decremented by an order.
        assert_eq!(db.books().get_types(book.book.id).await.unwrap()[0].qty, 12);
    }
}
