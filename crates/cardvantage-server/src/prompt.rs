use cardvantage_client::contracts::types::{CardRef, MAX_RECOMMENDATIONS};

/// Builds the classification prompt for one site and the user's cards.
pub fn build_prompt(website_url: &str, user_cards: &[CardRef]) -> Result<String, serde_json::Error> {
    let cards = serde_json::to_string(user_cards)?;
    Ok(format!(
        r#"You are a credit card rewards assistant. Help the user pick the best cards for a purchase.

First infer the merchant's spending category from the website address. Use one of:
"Dining", "Travel", "Groceries", "Online Shopping", "Gas", "Entertainment", "Drugstores", "Office", "General".

Then look at the user's cards. Each card is an object with a "name". Choose the 1-{MAX_RECOMMENDATIONS} cards with the highest reward rate for that category. When several cards are equally good, include each of them, up to {MAX_RECOMMENDATIONS}.

Website URL: "{website_url}"
User's cards: {cards}

Answer with one JSON object and nothing else:
{{
  "category": "the spending category",
  "recommendations": [
    {{
      "cardName": "the card name exactly as it appears in the user's list",
      "reason": "one or two sentences on why this card fits the category",
      "rewardRate": "the reward rate, e.g. '3x points' or '2% cash back'"
    }}
  ]
}}

Rules:
- Recommend only cards from the user's list, spelled exactly as given.
- Return between 1 and {MAX_RECOMMENDATIONS} recommendations.
- If one card is clearly best, return only that card.
- Give concrete reward rates when you know them.
"#
    ))
}
