//! Reward data for well-known cards, used when a saved card carries none.
//!
//! Matching is a substring test of the key phrase against the lower-cased card
//! name, first row wins. Specific products precede the generic name hints at
//! the end of the table.

use crate::cards::{Card, RewardProfile};

struct CatalogRow {
    phrase: &'static str,
    base_rate: f64,
    category_rates: &'static [(&'static str, f64)],
    rotating: &'static [&'static str],
}

const CATALOG: &[CatalogRow] = &[
    CatalogRow {
        phrase: "sapphire reserve",
        base_rate: 1.0,
        category_rates: &[("Dining", 3.0), ("Travel", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "sapphire preferred",
        base_rate: 1.0,
        category_rates: &[("Dining", 3.0), ("Travel", 2.0), ("Online Shopping", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "freedom flex",
        base_rate: 1.0,
        category_rates: &[("Dining", 3.0), ("Drugstores", 3.0)],
        rotating: &["Gas", "Groceries", "Online Shopping"],
    },
    CatalogRow {
        phrase: "freedom unlimited",
        base_rate: 1.5,
        category_rates: &[("Dining", 3.0), ("Drugstores", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "double cash",
        base_rate: 2.0,
        category_rates: &[],
        rotating: &[],
    },
    CatalogRow {
        phrase: "amex gold",
        base_rate: 1.0,
        category_rates: &[("Dining", 4.0), ("Groceries", 4.0), ("Travel", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "american express gold",
        base_rate: 1.0,
        category_rates: &[("Dining", 4.0), ("Groceries", 4.0), ("Travel", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "blue cash preferred",
        base_rate: 1.0,
        category_rates: &[("Groceries", 6.0), ("Entertainment", 6.0), ("Gas", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "venture x",
        base_rate: 2.0,
        category_rates: &[("Travel", 5.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "savor",
        base_rate: 1.0,
        category_rates: &[("Dining", 3.0), ("Entertainment", 3.0), ("Groceries", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "discover it",
        base_rate: 1.0,
        category_rates: &[],
        rotating: &["Gas", "Groceries", "Online Shopping", "Dining"],
    },
    CatalogRow {
        phrase: "prime visa",
        base_rate: 1.0,
        category_rates: &[("Online Shopping", 5.0), ("Dining", 2.0), ("Gas", 2.0), ("Drugstores", 2.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "costco",
        base_rate: 1.0,
        category_rates: &[("Gas", 4.0), ("Dining", 3.0), ("Travel", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "platinum",
        base_rate: 1.0,
        category_rates: &[("Travel", 5.0)],
        rotating: &[],
    },
    // Generic hints taken from the card's own name.
    CatalogRow {
        phrase: "amazon",
        base_rate: 1.0,
        category_rates: &[("Online Shopping", 5.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "dining",
        base_rate: 1.0,
        category_rates: &[("Dining", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "gas",
        base_rate: 1.0,
        category_rates: &[("Gas", 3.0)],
        rotating: &[],
    },
    CatalogRow {
        phrase: "travel",
        base_rate: 1.0,
        category_rates: &[("Travel", 3.0)],
        rotating: &[],
    },
];

impl CatalogRow {
    fn to_profile(&self) -> RewardProfile {
        let mut profile = RewardProfile::with_base_rate(self.base_rate);
        for (category, rate) in self.category_rates {
            profile = profile.category_rate(category, *rate);
        }
        for category in self.rotating {
            profile = profile.rotating(category);
        }
        profile
    }
}

pub fn catalog_profile(card_name: &str) -> Option<RewardProfile> {
    let normalized = card_name.to_lowercase();
    CATALOG
        .iter()
        .find(|row| normalized.contains(row.phrase))
        .map(CatalogRow::to_profile)
}

/// The card's own profile wins over the catalog.
pub fn resolve_profile(card: &Card) -> Option<RewardProfile> {
    card.reward_profile
        .clone()
        .or_else(|| catalog_profile(&card.name))
}
