use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::quotes::QuoteStyle;

/// One independently segmented edition of the corpus.
///
/// The set of editions is closed; [`DatasetId::ALL`] is the registration table and
/// fixes the order used for cross-dataset fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetId {
    /// English translation
    Bible,
    /// German translation
    Bibel,
    /// Latin translation
    Latin,
}

/// Static facts registered for each dataset
#[derive(Debug, Clone, Copy)]
pub struct DatasetInfo {
    pub id: DatasetId,
    pub slug: &'static str,
    pub locale: &'static str,
    pub display_name: &'static str,
    pub quote_style: QuoteStyle,
}

const REGISTRATION: [DatasetInfo; 3] = [
    DatasetInfo {
        id: DatasetId::Bible,
        slug: "bible",
        locale: "en",
        display_name: "Bible",
        quote_style: QuoteStyle::ENGLISH,
    },
    DatasetInfo {
        id: DatasetId::Bibel,
        slug: "bibel",
        locale: "de",
        display_name: "Bibel",
        quote_style: QuoteStyle::GERMAN,
    },
    DatasetInfo {
        id: DatasetId::Latin,
        slug: "latin",
        locale: "la",
        display_name: "Biblia Sacra",
        quote_style: QuoteStyle::GUILLEMETS,
    },
];

impl DatasetId {
    /// Every dataset in registration order
    pub const ALL: [DatasetId; 3] = [DatasetId::Bible, DatasetId::Bibel, DatasetId::Latin];

    #[must_use]
    pub fn info(self) -> &'static DatasetInfo {
        // registration order matches declaration order
        &REGISTRATION[self.index()]
    }

    /// Position in [`DatasetId::ALL`]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Bible => 0,
            Self::Bibel => 1,
            Self::Latin => 2,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.info().slug
    }

    #[must_use]
    pub fn locale(self) -> &'static str {
        self.info().locale
    }

    #[must_use]
    pub fn quote_style(self) -> QuoteStyle {
        self.info().quote_style
    }

    /// All other datasets, in registration order
    pub fn others(self) -> impl Iterator<Item = DatasetId> {
        Self::ALL.into_iter().filter(move |d| *d != self)
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dataset '{0}'")]
pub struct UnknownDataset(pub String);

impl FromStr for DatasetId {
    type Err = UnknownDataset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        REGISTRATION
            .iter()
            .find(|info| info.slug == wanted)
            .map(|info| info.id)
            .ok_or_else(|| UnknownDataset(s.to_string()))
    }
}

/// Dataset-independent identifier for a logical book
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalKey(pub String);

impl CanonicalKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_matches_declaration_order() {
        for (i, id) in DatasetId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(id.info().id, *id);
        }
    }

    #[test]
    fn test_parse_dataset_id() {
        assert_eq!("bible".parse::<DatasetId>(), Ok(DatasetId::Bible));
        assert_eq!(" BIBEL ".parse::<DatasetId>(), Ok(DatasetId::Bibel));
        assert_eq!("latin".parse::<DatasetId>(), Ok(DatasetId::Latin));
        assert!("vulgate".parse::<DatasetId>().is_err());
    }

    #[test]
    fn test_others_keep_registration_order() {
        let others: Vec<_> = DatasetId::Bibel.others().collect();
        assert_eq!(others, vec![DatasetId::Bible, DatasetId::Latin]);
    }

    #[test]
    fn test_canonical_key_is_lowercased() {
        assert_eq!(CanonicalKey::new(" John ").as_str(), "john");
    }
}
