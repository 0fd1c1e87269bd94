use std::collections::HashMap;

/// Per-dataset map from a lowercased name variant to the book's short name.
///
/// Insertion is first-writer-wins: when two books claim the same variant, the one
/// inserted first keeps it. Loading from a fixed source order is therefore
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTable {
    variants: HashMap<String, String>,
}

/// Lowercase, trim and collapse inner whitespace
#[must_use]
pub fn normalize_key(variant: &str) -> String {
    variant
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl AbbreviationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(short_name, variants)` rows in source order
    pub fn from_rows<I, S, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut table = Self::new();
        for (short_name, variants) in rows {
            for variant in variants {
                table.insert(variant.as_ref(), short_name.as_ref());
            }
        }
        table
    }

    /// Map `variant` to `short_name` unless the variant is already taken or empty.
    ///
    /// Returns true when the variant was added.
    pub fn insert(&mut self, variant: &str, short_name: &str) -> bool {
        let key = normalize_key(variant);
        if key.is_empty() {
            return false;
        }
        match self.variants.get(&key) {
            Some(existing) => {
                if existing != short_name {
                    tracing::debug!(
                        "Variant '{}' already maps to '{}', ignoring '{}'",
                        key,
                        existing,
                        short_name
                    );
                }
                false
            }
            None => {
                self.variants.insert(key, short_name.to_string());
                true
            }
        }
    }

    /// Short name for a spelling variant, case-insensitive
    #[must_use]
    pub fn lookup(&self, variant: &str) -> Option<&str> {
        self.variants.get(&normalize_key(variant)).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, variant: &str) -> bool {
        self.lookup(variant).is_some()
    }

    /// Number of variants
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = AbbreviationTable::from_rows([("John", vec!["Jn", "Joh", "John"])]);
        assert_eq!(table.lookup("JN"), Some("John"));
        assert_eq!(table.lookup("  joh "), Some("John"));
        assert_eq!(table.lookup("Jo"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_first_writer_wins() {
        let rows = vec![
            ("Judges", vec!["Jdg", "Ju"]),
            ("Jude", vec!["Jud", "Ju"]),
        ];
        let table = AbbreviationTable::from_rows(rows.clone());
        assert_eq!(table.lookup("ju"), Some("Judges"));
        assert_eq!(table.lookup("jud"), Some("Jude"));

        // repeated loads from the same order agree
        for _ in 0..10 {
            assert_eq!(
                AbbreviationTable::from_rows(rows.clone()).lookup("ju"),
                Some("Judges")
            );
        }
    }

    #[test]
    fn test_insert_reports_collisions_and_empties() {
        let mut table = AbbreviationTable::new();
        assert!(table.insert("1 Mo", "1. Mose"));
        assert!(!table.insert("1  MO", "1. Chronik"));
        assert!(!table.insert("   ", "1. Mose"));
        assert_eq!(table.lookup("1 mo"), Some("1. Mose"));
        assert!(table.contains("1 Mo"));
    }
}
