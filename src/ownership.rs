//! The fixed owner roster and the free-text ownership fan-out.
//!
//! Owners are identified by a short abbreviation and get their id from their
//! position in this list (1-based). The list is static: nothing in the API
//! creates or deletes owners, and the import tool writes the `owners` table
//! straight from it.

/// Known owner abbreviations, in id order (owner_id = index + 1).
pub const OWNER_ABBREVIATIONS: [&str; 9] = [
    "JLA", "DLE", "SE", "JE", "KLO", "DWL", "RKL", "Wilson", "Ament",
];

/// Derive owner ids from a property's free-text `owned_by` field.
///
/// An owner matches when its abbreviation occurs anywhere in the text as a
/// case-sensitive substring. No tokenization is applied, so an abbreviation
/// that is contained in another (or in an unrelated word) also matches.
/// That is the historical contract the data was loaded under; callers should
/// treat surprising matches as a data-quality issue in `owned_by`, not a bug
/// here.
pub fn matching_owner_ids(owned_by: &str) -> Vec<i64> {
    OWNER_ABBREVIATIONS
        .iter()
        .enumerate()
        .filter(|(_, abbrev)| owned_by.contains(*abbrev))
        .map(|(i, _)| (i + 1) as i64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_comma_separated_abbreviations() {
        assert_eq!(matching_owner_ids("JLA, DLE"), vec![1, 2]);
    }

    #[test]
    fn empty_text_matches_nothing() {
        assert!(matching_owner_ids("").is_empty());
    }

    #[test]
    fn match_is_case_sensitive() {
        assert!(matching_owner_ids("jla, wilson").is_empty());
        assert_eq!(matching_owner_ids("Wilson"), vec![8]);
    }

    #[test]
    fn substring_containment_is_not_tokenized() {
        // "SE" and "JE" both live inside "JSE ... JE" style strings; the
        // loop deliberately reproduces plain substring semantics.
        assert_eq!(matching_owner_ids("JSE Trust"), vec![3]);
        assert_eq!(matching_owner_ids("SE/JE split"), vec![3, 4]);
    }

    #[test]
    fn ids_come_back_in_roster_order() {
        assert_eq!(matching_owner_ids("Ament, KLO, JLA"), vec![1, 5, 9]);
    }
}
