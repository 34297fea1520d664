//! One-shot loader: spreadsheet export -> the three parcel tables.
//!
//! The source file is the "Property List" sheet saved as CSV: a few banner
//! rows, then a header row, then the data. Header labels are normalized to
//! lowercase/underscore form ("Asset #" becomes `asset_num`); columns that
//! don't map to a known field are ignored and missing columns load as NULL.
//!
//! The load drops and recreates all three tables, so it refuses to run
//! without --force. Everything happens in a single transaction: a failed
//! read or insert leaves the database exactly as it was.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use sqlx::postgres::PgPoolOptions;

use crate::ownership::matching_owner_ids;
use crate::store::models::{OwnershipRow, Property};
use crate::store::schema;

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(help = "CSV export of the property list")]
    pub file: PathBuf,

    #[arg(long, default_value_t = 3, help = "Banner rows to skip before the header row")]
    pub skip_rows: usize,

    #[arg(long, default_value_t = 38, help = "Maximum number of data rows to load")]
    pub max_rows: usize,

    #[arg(long, help = "Confirm the destructive drop-and-recreate load")]
    pub force: bool,

    #[arg(long, help = "Database URL override (defaults to DATABASE_URL)")]
    pub database_url: Option<String>,
}

pub async fn handle(args: ImportArgs) -> Result<()> {
    if !args.force {
        bail!(
            "import drops and recreates the properties, owners and property_ownership \
             tables; re-run with --force to confirm"
        );
    }

    let url = match args.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL")
            .context("DATABASE_URL is not set and --database-url was not given")?,
    };

    let properties = read_rows(&args.file, args.skip_rows, args.max_rows)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    tracing::info!(
        "Parsed {} property rows from {}",
        properties.len(),
        args.file.display()
    );

    let pool = PgPoolOptions::new().max_connections(1).connect(&url).await?;
    let mut tx = pool.begin().await?;

    schema::recreate_tables(&mut *tx).await?;

    for prop in &properties {
        schema::insert_property_row(&mut *tx, prop)
            .await
            .with_context(|| format!("failed to insert property {}", prop.asset_num))?;
    }

    schema::seed_owners(&mut *tx).await?;

    let mut links: Vec<OwnershipRow> = Vec::new();
    for prop in &properties {
        let owned_by = prop.owned_by.as_deref().unwrap_or("");
        for owner_id in matching_owner_ids(owned_by) {
            links.push(OwnershipRow {
                property_id: prop.asset_num,
                owner_id,
            });
        }
    }
    for link in &links {
        sqlx::query("INSERT INTO property_ownership (property_id, owner_id) VALUES ($1, $2)")
            .bind(link.property_id)
            .bind(link.owner_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    println!(
        "Loaded {} properties, {} owners, {} ownership links",
        properties.len(),
        crate::ownership::OWNER_ABBREVIATIONS.len(),
        links.len()
    );
    Ok(())
}

fn read_rows(path: &Path, skip_rows: usize, max_rows: usize) -> Result<Vec<Property>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut records = reader.records();

    for _ in 0..skip_rows {
        match records.next() {
            Some(rec) => {
                rec?;
            }
            None => bail!("file ended before the header row"),
        }
    }

    let header = match records.next() {
        Some(rec) => rec?,
        None => bail!("file has no header row"),
    };
    let columns = column_index(&header);
    let asset_col = *columns
        .get("asset_num")
        .context("no asset_num column found after header normalization")?;

    let mut rows = Vec::new();
    for rec in records {
        if rows.len() >= max_rows {
            break;
        }
        let rec = rec?;
        if rec.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(parse_row(&rec, &columns, asset_col)?);
    }
    Ok(rows)
}

/// Map normalized header labels to their column positions. On duplicate
/// labels the first occurrence wins.
fn column_index(header: &csv::StringRecord) -> HashMap<String, usize> {
    let mut columns = HashMap::new();
    for (i, label) in header.iter().enumerate() {
        let normalized = normalize_label(label);
        if !normalized.is_empty() {
            columns.entry(normalized).or_insert(i);
        }
    }
    columns
}

/// Lowercase, trim, spaces to underscores; `#` and `%` are spelled out so
/// "Asset #" comes out as `asset_num` and "Total Acreage %" as
/// `total_acreage_percent`.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('#', "num")
        .replace('%', "percent")
}

fn parse_row(
    rec: &csv::StringRecord,
    columns: &HashMap<String, usize>,
    asset_col: usize,
) -> Result<Property> {
    let raw_asset = rec.get(asset_col).unwrap_or("").trim();
    if raw_asset.is_empty() {
        bail!("row is missing an asset number: {:?}", rec);
    }
    let asset_num = parse_integer(raw_asset)
        .with_context(|| format!("bad asset number {:?}", raw_asset))?;

    Ok(Property {
        asset_num,
        legal_description: text_field(rec, columns, "legal_description"),
        location: text_field(rec, columns, "location"),
        account_number: text_field(rec, columns, "account_number"),
        name_on_account: text_field(rec, columns, "name_on_account"),
        mailing_address: text_field(rec, columns, "mailing_address"),
        management_notes: text_field(rec, columns, "management_notes"),
        status: text_field(rec, columns, "status"),
        exemption: text_field(rec, columns, "exemption"),
        county: text_field(rec, columns, "county"),
        owned_by: text_field(rec, columns, "owned_by"),
        current_appraisal: numeric_field(rec, columns, "current_appraisal")?,
        square_footage: numeric_field(rec, columns, "square_footage")?,
        acres: numeric_field(rec, columns, "acres")?,
        total_acreage_percent: numeric_field(rec, columns, "total_acreage_percent")?,
    })
}

fn text_field(
    rec: &csv::StringRecord,
    columns: &HashMap<String, usize>,
    name: &str,
) -> Option<String> {
    columns
        .get(name)
        .and_then(|&i| rec.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn numeric_field(
    rec: &csv::StringRecord,
    columns: &HashMap<String, usize>,
    name: &str,
) -> Result<Option<f64>> {
    match text_field(rec, columns, name) {
        Some(raw) => {
            let value = parse_numeric(&raw)
                .with_context(|| format!("bad {} value {:?}", name, raw))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Integer parse tolerating spreadsheet artifacts: thousands separators and
/// float-formatted whole numbers ("1,234", "101.0").
fn parse_integer(raw: &str) -> Result<i64> {
    let cleaned = raw.replace(',', "");
    if let Ok(n) = cleaned.parse::<i64>() {
        return Ok(n);
    }
    let as_float: f64 = cleaned.parse()?;
    if as_float.fract() != 0.0 {
        bail!("not a whole number: {}", raw);
    }
    Ok(as_float as i64)
}

/// Numeric parse tolerating `$`, `%` and thousands separators.
fn parse_numeric(raw: &str) -> Result<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect();
    Ok(cleaned.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spreadsheet_labels() {
        assert_eq!(normalize_label("Asset #"), "asset_num");
        assert_eq!(normalize_label("  Legal Description "), "legal_description");
        assert_eq!(normalize_label("Owned By"), "owned_by");
        assert_eq!(normalize_label("Total Acreage %"), "total_acreage_percent");
    }

    #[test]
    fn parses_decorated_numbers() {
        assert_eq!(parse_numeric("$250,000.50").unwrap(), 250000.50);
        assert_eq!(parse_numeric("12.5%").unwrap(), 12.5);
        assert!(parse_numeric("n/a").is_err());
    }

    #[test]
    fn parses_integers_from_float_formatting() {
        assert_eq!(parse_integer("101").unwrap(), 101);
        assert_eq!(parse_integer("101.0").unwrap(), 101);
        assert_eq!(parse_integer("1,234").unwrap(), 1234);
        assert!(parse_integer("101.5").is_err());
    }

    #[test]
    fn reads_rows_past_the_banner() {
        let path = std::env::temp_dir().join(format!(
            "parcel-import-test-{}.csv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "Schedule of Land with Owners,,\n\
             ,,\n\
             Prepared 2024,,\n\
             Asset #,Legal Description,Owned By\n\
             101,Lot 1 Block A,\"JLA, DLE\"\n\
             ,,\n\
             102,Lot 2 Block A,Wilson\n",
        )
        .unwrap();

        let rows = read_rows(&path, 3, 38).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].asset_num, 101);
        assert_eq!(rows[0].legal_description.as_deref(), Some("Lot 1 Block A"));
        assert_eq!(rows[0].owned_by.as_deref(), Some("JLA, DLE"));
        assert_eq!(rows[1].asset_num, 102);
        assert!(rows[1].acres.is_none());
    }

    #[test]
    fn respects_the_row_cap() {
        let path = std::env::temp_dir().join(format!(
            "parcel-import-cap-test-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "Asset #,Owned By\n1,JLA\n2,DLE\n3,SE\n").unwrap();

        let rows = read_rows(&path, 0, 2).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].asset_num, 2);
    }
}
