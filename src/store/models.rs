use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row per parcel. `asset_num` is the stable identifier and the sole
/// join key to ownership; every other field came off the spreadsheet and is
/// nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub asset_num: i64,
    #[serde(default)]
    pub legal_description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub name_on_account: Option<String>,
    #[serde(default)]
    pub mailing_address: Option<String>,
    #[serde(default)]
    pub management_notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub exemption: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub current_appraisal: Option<f64>,
    #[serde(default)]
    pub square_footage: Option<f64>,
    #[serde(default)]
    pub acres: Option<f64>,
    #[serde(default)]
    pub total_acreage_percent: Option<f64>,
}

/// The editable subset of a property. Anything else a client submits on
/// update is accepted and dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    #[serde(default)]
    pub legal_description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub management_notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Owner {
    pub owner_id: i64,
    pub owner_name: String,
}

/// Many-to-many link between a property and an owner. Written only at
/// property creation (or bulk import) and deleted with its property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OwnershipRow {
    pub property_id: i64,
    pub owner_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_deserializes_with_only_asset_num() {
        let prop: Property = serde_json::from_str(r#"{"asset_num": 101}"#).unwrap();
        assert_eq!(prop.asset_num, 101);
        assert!(prop.owned_by.is_none());
        assert!(prop.acres.is_none());
    }

    #[test]
    fn property_round_trips_numeric_fields() {
        let prop: Property = serde_json::from_str(
            r#"{"asset_num": 7, "owned_by": "JLA", "acres": 12.5, "current_appraisal": 250000.0}"#,
        )
        .unwrap();
        assert_eq!(prop.acres, Some(12.5));
        let back = serde_json::to_value(&prop).unwrap();
        assert_eq!(back["owned_by"], "JLA");
        assert_eq!(back["current_appraisal"], 250000.0);
    }
}
