pub mod models;
pub mod schema;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::ownership::matching_owner_ids;

pub use models::{Owner, OwnershipRow, Property, PropertyUpdate};

/// Errors from the data access layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Property {0} already exists")]
    DuplicateAsset(i64),

    #[error("Property {0} not found")]
    PropertyNotFound(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub(crate) const PROPERTY_COLUMNS: &str = "asset_num, legal_description, location, account_number, \
     name_on_account, mailing_address, management_notes, status, exemption, \
     county, owned_by, current_appraisal, square_footage, acres, total_acreage_percent";

/// Data access layer for the parcel tables. Holds the connection pool; every
/// query in the system flows through here.
#[derive(Clone)]
pub struct PropertyStore {
    pool: PgPool,
}

impl PropertyStore {
    /// Connect a new pool using the configured limits.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;

        info!("Connected database pool ({} max connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tests and the import tool).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All owners, id ascending. The roster is static so this never pages.
    pub async fn list_owners(&self) -> Result<Vec<Owner>, StoreError> {
        let owners = sqlx::query_as::<_, Owner>(
            "SELECT owner_id, owner_name FROM owners ORDER BY owner_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(owners)
    }

    /// Properties ordered by asset number; when `owner_id` is given, only
    /// those linked to that owner through `property_ownership`.
    pub async fn list_properties(&self, owner_id: Option<i64>) -> Result<Vec<Property>, StoreError> {
        let properties = match owner_id {
            Some(owner_id) => {
                sqlx::query_as::<_, Property>(
                    "SELECT p.* FROM properties p \
                     JOIN property_ownership po ON p.asset_num = po.property_id \
                     WHERE po.owner_id = $1 \
                     ORDER BY p.asset_num",
                )
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Property>(&format!(
                    "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY asset_num"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(properties)
    }

    /// Insert a property and fan its `owned_by` text out into ownership
    /// rows, all in one transaction. A duplicate `asset_num` surfaces as
    /// `DuplicateAsset` and nothing is persisted.
    pub async fn insert_property(&self, prop: &Property) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        schema::insert_property_row(&mut *tx, prop)
            .await
            .map_err(|e| classify_insert_error(e, prop.asset_num))?;

        let owned_by = prop.owned_by.as_deref().unwrap_or("");
        for owner_id in matching_owner_ids(owned_by) {
            sqlx::query("INSERT INTO property_ownership (property_id, owner_id) VALUES ($1, $2)")
                .bind(prop.asset_num)
                .bind(owner_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Added property {}", prop.asset_num);
        Ok(prop.asset_num)
    }

    /// Update the editable subset of fields on an existing property.
    ///
    /// Only `legal_description`, `location`, `owned_by`, `management_notes`
    /// and `status` are written; everything else in `changes` is ignored.
    /// Ownership rows are not recomputed even when `owned_by` changes;
    /// ownership reflects the text at creation time.
    pub async fn update_property(
        &self,
        asset_num: i64,
        changes: &PropertyUpdate,
    ) -> Result<Property, StoreError> {
        let updated = sqlx::query_as::<_, Property>(&format!(
            "UPDATE properties SET \
                 legal_description = $2, \
                 location = $3, \
                 owned_by = $4, \
                 management_notes = $5, \
                 status = $6 \
             WHERE asset_num = $1 \
             RETURNING {PROPERTY_COLUMNS}"
        ))
        .bind(asset_num)
        .bind(&changes.legal_description)
        .bind(&changes.location)
        .bind(&changes.owned_by)
        .bind(&changes.management_notes)
        .bind(&changes.status)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(StoreError::PropertyNotFound(asset_num))
    }

    /// Delete a property together with all of its ownership rows in one
    /// transaction. Returns the number of property rows removed (0 or 1);
    /// callers treat both as success.
    pub async fn delete_property(&self, asset_num: i64) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM property_ownership WHERE property_id = $1")
            .bind(asset_num)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM properties WHERE asset_num = $1")
            .bind(asset_num)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if deleted == 0 {
            debug!("Delete of property {} matched no rows", asset_num);
        } else {
            info!("Deleted property {}", asset_num);
        }
        Ok(deleted)
    }
}

fn classify_insert_error(e: sqlx::Error, asset_num: i64) -> StoreError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            StoreError::DuplicateAsset(asset_num)
        }
        _ => StoreError::Sqlx(e),
    }
}
