//! Product category enumeration.

use serde::{Deserialize, Serialize};

use crate::types::locale::Locale;

/// The fixed set of product categories.
///
/// Every product belongs to exactly one category. The marketplace's "all
/// categories" view is the *absence* of a category filter, not a variant
/// here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Jewelry,
    Plants,
    Electronics,
    Home,
    Beauty,
    Food,
    Books,
    Sports,
    Toys,
    Automotive,
}

impl Category {
    /// Every category, in canonical order.
    pub const ALL: [Self; 11] = [
        Self::Clothing,
        Self::Jewelry,
        Self::Plants,
        Self::Electronics,
        Self::Home,
        Self::Beauty,
        Self::Food,
        Self::Books,
        Self::Sports,
        Self::Toys,
        Self::Automotive,
    ];

    /// The category's stable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clothing => "clothing",
            Self::Jewelry => "jewelry",
            Self::Plants => "plants",
            Self::Electronics => "electronics",
            Self::Home => "home",
            Self::Beauty => "beauty",
            Self::Food => "food",
            Self::Books => "books",
            Self::Sports => "sports",
            Self::Toys => "toys",
            Self::Automotive => "automotive",
        }
    }

    /// The display label in the given locale.
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ar => match self {
                Self::Clothing => "ملابس",
                Self::Jewelry => "مجوهرات",
                Self::Plants => "نباتات",
                Self::Electronics => "إلكترونيات",
                Self::Home => "منزل وحديقة",
                Self::Beauty => "جمال وعناية",
                Self::Food => "طعام ومشروبات",
                Self::Books => "كتب",
                Self::Sports => "رياضة",
                Self::Toys => "ألعاب",
                Self::Automotive => "سيارات",
            },
            Locale::En => match self {
                Self::Clothing => "Clothing",
                Self::Jewelry => "Jewelry",
                Self::Plants => "Plants",
                Self::Electronics => "Electronics",
                Self::Home => "Home & Garden",
                Self::Beauty => "Beauty & Care",
                Self::Food => "Food & Drinks",
                Self::Books => "Books",
                Self::Sports => "Sports",
                Self::Toys => "Toys",
                Self::Automotive => "Automotive",
            },
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_identifiers_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        assert!("furniture".parse::<Category>().is_err());
        assert!("all".parse::<Category>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::Clothing.label(Locale::En), "Clothing");
        assert_eq!(Category::Clothing.label(Locale::Ar), "ملابس");
        assert_eq!(Category::Home.label(Locale::En), "Home & Garden");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Category::Electronics).unwrap();
        assert_eq!(json, "\"electronics\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"beauty\"").unwrap(),
            Category::Beauty
        );
    }
}
