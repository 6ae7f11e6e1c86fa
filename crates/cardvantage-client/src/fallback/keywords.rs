//! Merchant keyword table for the local fallback.
//!
//! Lookups test substring containment against the lower-cased domain and the
//! first matching row wins, so declaration order is part of the behavior:
//! - named grocery merchants come before the generic `food` token
//!   (`wholefoods` must not classify as Dining);
//! - marketplaces come before Dining so `amazon` keeps its original priority;
//! - the generic `shop` token is last.

pub const GENERAL_CATEGORY: &str = "General";

pub const MERCHANT_KEYWORDS: &[(&str, &str)] = &[
    // Groceries
    ("wholefoods", "Groceries"),
    ("instacart", "Groceries"),
    ("safeway", "Groceries"),
    ("kroger", "Groceries"),
    ("traderjoes", "Groceries"),
    ("freshdirect", "Groceries"),
    ("aldi", "Groceries"),
    ("grocery", "Groceries"),
    // Marketplaces
    ("amazon", "Online Shopping"),
    ("amzn", "Online Shopping"),
    ("ebay", "Online Shopping"),
    ("etsy", "Online Shopping"),
    ("walmart", "Online Shopping"),
    ("bestbuy", "Online Shopping"),
    // Dining
    ("doordash", "Dining"),
    ("ubereats", "Dining"),
    ("grubhub", "Dining"),
    ("postmates", "Dining"),
    ("opentable", "Dining"),
    ("starbucks", "Dining"),
    ("chipotle", "Dining"),
    ("restaurant", "Dining"),
    ("pizza", "Dining"),
    ("food", "Dining"),
    // Travel
    ("expedia", "Travel"),
    ("booking.com", "Travel"),
    ("airbnb", "Travel"),
    ("hotels.com", "Travel"),
    ("marriott", "Travel"),
    ("hilton", "Travel"),
    ("delta.com", "Travel"),
    ("united.com", "Travel"),
    ("southwest", "Travel"),
    ("kayak", "Travel"),
    ("uber.com", "Travel"),
    ("lyft", "Travel"),
    // Gas
    ("exxon", "Gas"),
    ("chevron", "Gas"),
    ("shell.com", "Gas"),
    ("gasbuddy", "Gas"),
    ("fuel", "Gas"),
    ("gas", "Gas"),
    // Drugstores
    ("walgreens", "Drugstores"),
    ("cvs", "Drugstores"),
    ("riteaid", "Drugstores"),
    ("pharmacy", "Drugstores"),
    // Office
    ("staples", "Office"),
    ("officedepot", "Office"),
    // Entertainment
    ("netflix", "Entertainment"),
    ("spotify", "Entertainment"),
    ("hulu", "Entertainment"),
    ("disneyplus", "Entertainment"),
    ("ticketmaster", "Entertainment"),
    ("stubhub", "Entertainment"),
    ("fandango", "Entertainment"),
    // Generic storefronts
    ("shop", "Online Shopping"),
];

/// Category for a domain, or [`GENERAL_CATEGORY`] when nothing matches.
pub fn category_for_domain(domain: &str) -> &'static str {
    let normalized = domain.to_lowercase();
    MERCHANT_KEYWORDS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(GENERAL_CATEGORY)
}
