//! SQLite ProductRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::helpers::{BindValue, build_limit_offset_clause, build_order_clause, build_where_clause};
use crate::db::utils::{current_timestamp, normalize_timestamp};
use crate::db::{
    DEFAULT_RATING, DbResult, NewProduct, Product, ProductDocument, ProductQuery,
    ProductRepository,
};

const PRODUCT_COLUMNS: &str = "id, name, price, featured, rating, created_at, company";

/// SQLx-backed product repository.
pub struct SqliteProductRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn product_from_row(row: &SqliteRow) -> Product {
    let company: Option<String> = row.get("company");
    Product {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        featured: row.get("featured"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
        company: company.and_then(|c| c.parse().ok()),
    }
}

impl<'a> ProductRepository for SqliteProductRepository<'a> {
    async fn find(&self, query: &ProductQuery) -> DbResult<Vec<ProductDocument>> {
        let (where_clause, binds) = build_where_clause(&query.filter);
        let order_clause = build_order_clause(&query.sort);
        let limit_clause = build_limit_offset_clause(query.pagination.as_ref());

        let sql = format!(
            "SELECT {} FROM product {} {}{}",
            PRODUCT_COLUMNS, where_clause, order_clause, limit_clause
        );
        debug!(%sql, "finding products");

        let mut sql_query = sqlx::query(&sql);
        for value in binds {
            sql_query = match value {
                BindValue::Text(s) => sql_query.bind(s),
                BindValue::Real(n) => sql_query.bind(n),
                BindValue::Bool(b) => sql_query.bind(b),
            };
        }

        let rows = sql_query.fetch_all(self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| product_from_row(row).project(&query.projection))
            .collect())
    }

    async fn replace_all(&self, products: &[NewProduct]) -> DbResult<usize> {
        for product in products {
            product.validate()?;
        }

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM product")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        debug!(deleted, "cleared product collection");

        for product in products {
            let created_at = product
                .created_at
                .as_deref()
                .and_then(normalize_timestamp)
                .unwrap_or_else(current_timestamp);

            sqlx::query(
                "INSERT INTO product (name, name_folded, price, featured, rating, created_at, company) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&product.name)
            .bind(product.name.to_lowercase())
            .bind(product.price)
            .bind(product.featured)
            .bind(product.rating.unwrap_or(DEFAULT_RATING))
            .bind(&created_at)
            .bind(&product.company)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(products.len())
    }
}
