use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity families the import pipeline can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Contacts,
    Listings,
    Offers,
    Tasks,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Contacts => "contacts",
            EntityKind::Listings => "listings",
            EntityKind::Offers => "offers",
            EntityKind::Tasks => "tasks",
        };
        write!(f, "{}", label)
    }
}

/// A canonical domain field plus the header substrings accepted as a match.
/// Matching is case-insensitive substring containment: real-world exports
/// label columns inconsistently ("OwnerLastName" for a seller), so exact
/// matching would reject most files.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
}

impl FieldSpec {
    /// True when a resolved (lower-case) header matches this field.
    pub fn matches(&self, header: &str) -> bool {
        if header.contains(self.key) {
            return true;
        }
        self.aliases.iter().any(|a| header.contains(a))
    }
}

/// Caller-supplied description of one import target: which canonical
/// fields to look for and under which synonyms.
#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub entity: EntityKind,
    pub fields: Vec<FieldSpec>,
}

impl ImportSpec {
    pub fn field_keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_matches_key_or_alias_substring() {
        let seller = FieldSpec {
            key: "seller",
            aliases: &["owner", "vendor"],
        };
        assert!(seller.matches("seller name"));
        assert!(seller.matches("ownerlastname"));
        assert!(!seller.matches("buyer"));
    }
}
