//! `PostgreSQL` cart store.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::Db,
    domain::{
        carts::{
            records::{CartItemRecord, CartRecord},
            store::{CartStore, CartStoreError, VersionConflict},
        },
        owners::OwnerId,
    },
};

const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const UPDATE_CART_SQL: &str = include_str!("../sql/update_cart.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");

/// Cart store backed by the `carts` table, one JSONB row per owner.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: Db,
}

impl PgCartStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn get_cart(&self, owner: &OwnerId) -> Result<Option<CartRecord>, CartStoreError> {
        let cart = query_as::<Postgres, CartRecord>(GET_CART_SQL)
            .bind(owner.as_str())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(cart)
    }

    async fn create_cart(&self, cart: &CartRecord) -> Result<CartRecord, CartStoreError> {
        let created = query_as::<Postgres, CartRecord>(CREATE_CART_SQL)
            .bind(cart.owner.as_str())
            .bind(Json(&cart.items))
            .bind(amount_to_i64(cart.total, "total")?)
            .bind(SqlxTimestamp::from(cart.updated_at))
            .fetch_optional(self.db.pool())
            .await?;

        created.ok_or_else(|| VersionConflict::AlreadyExists.into())
    }

    async fn update_cart(
        &self,
        cart: &CartRecord,
        expected_version: u64,
    ) -> Result<CartRecord, CartStoreError> {
        let updated = query_as::<Postgres, CartRecord>(UPDATE_CART_SQL)
            .bind(cart.owner.as_str())
            .bind(Json(&cart.items))
            .bind(amount_to_i64(cart.total, "total")?)
            .bind(SqlxTimestamp::from(cart.updated_at))
            .bind(amount_to_i64(expected_version, "version")?)
            .fetch_optional(self.db.pool())
            .await?;

        updated.ok_or_else(|| {
            VersionConflict::Stale {
                expected: expected_version,
            }
            .into()
        })
    }

    async fn delete_cart(&self, owner: &OwnerId) -> Result<bool, CartStoreError> {
        let result = query(DELETE_CART_SQL)
            .bind(owner.as_str())
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let owner: String = row.try_get("owner")?;

        let owner = OwnerId::parse(owner).map_err(|e| sqlx::Error::ColumnDecode {
            index: "owner".to_string(),
            source: Box::new(e),
        })?;

        let Json(items): Json<Vec<CartItemRecord>> = row.try_get("items")?;

        Ok(Self {
            owner,
            items,
            total: try_get_amount(row, "total")?,
            version: try_get_amount(row, "version")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

fn amount_to_i64(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
