//! Drop-and-recreate DDL for the three tables.
//!
//! Only the import tool (and integration tests) call into this module; the
//! running service never touches table definitions. The drop-and-recreate
//! semantics are destructive on purpose and are guarded at the CLI layer.

use sqlx::PgConnection;

use crate::ownership::OWNER_ABBREVIATIONS;
use crate::store::models::Property;
use crate::store::PROPERTY_COLUMNS;

/// Drop and recreate all three tables inside the caller's transaction.
pub async fn recreate_tables(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("DROP TABLE IF EXISTS property_ownership")
        .execute(&mut *conn)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS properties")
        .execute(&mut *conn)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS owners")
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "CREATE TABLE properties (
            asset_num BIGINT PRIMARY KEY,
            legal_description TEXT,
            location TEXT,
            account_number TEXT,
            name_on_account TEXT,
            mailing_address TEXT,
            management_notes TEXT,
            status TEXT,
            exemption TEXT,
            county TEXT,
            owned_by TEXT,
            current_appraisal DOUBLE PRECISION,
            square_footage DOUBLE PRECISION,
            acres DOUBLE PRECISION,
            total_acreage_percent DOUBLE PRECISION
        )",
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "CREATE TABLE owners (
            owner_id BIGINT PRIMARY KEY,
            owner_name TEXT NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await?;

    // No uniqueness constraint on (property_id, owner_id): the historical
    // table allowed duplicates and downstream consumers tolerate them.
    sqlx::query(
        "CREATE TABLE property_ownership (
            property_id BIGINT NOT NULL,
            owner_id BIGINT NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Insert one property row on an existing connection. Shared by the service
/// insert path and the bulk import (which derives ownership separately for
/// the whole batch).
pub async fn insert_property_row(
    conn: &mut PgConnection,
    prop: &Property,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO properties ({PROPERTY_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
    ))
    .bind(prop.asset_num)
    .bind(&prop.legal_description)
    .bind(&prop.location)
    .bind(&prop.account_number)
    .bind(&prop.name_on_account)
    .bind(&prop.mailing_address)
    .bind(&prop.management_notes)
    .bind(&prop.status)
    .bind(&prop.exemption)
    .bind(&prop.county)
    .bind(&prop.owned_by)
    .bind(prop.current_appraisal)
    .bind(prop.square_footage)
    .bind(prop.acres)
    .bind(prop.total_acreage_percent)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Populate the `owners` table from the fixed roster, ids assigned by
/// position.
pub async fn seed_owners(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for (i, name) in OWNER_ABBREVIATIONS.iter().enumerate() {
        sqlx::query("INSERT INTO owners (owner_id, owner_name) VALUES ($1, $2)")
            .bind((i + 1) as i64)
            .bind(name)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
