//! Natural-language task description handed to the browser agent.

use crate::search::SearchRequest;

/// Phrase used in place of an item list when the caller asked for none.
const ANY_ITEMS: &str = "any popular products";

/// Keys every store in the answer must carry, with what each one holds.
const OUTPUT_KEYS: &[(&str, &str)] = &[
    ("id", "unique identifier (store name without spaces)"),
    ("name", "store name"),
    ("address", "full address"),
    ("distance", "distance in kilometres, as a number"),
    ("rating", "star rating, as a number"),
    ("hours", "operating hours"),
    ("website", "store website"),
    ("phone", "phone number"),
    (
        "inventory",
        "array of objects with itemId, itemName, price and inStock; empty if unknown",
    ),
];

/// Knobs for [`build_task_description`] that come from configuration rather
/// than from the request.
#[derive(Debug, Clone, Copy)]
pub struct TaskOptions<'a> {
    pub store_kind: &'a str,
    pub region: Option<&'a str>,
    pub radius_km: f64,
    pub max_results: usize,
}

/// Joins the non-blank item names with `", "`, or returns a generic phrase
/// when there are none.
#[must_use]
pub fn describe_items(items: &[String]) -> String {
    let names: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();

    if names.is_empty() {
        ANY_ITEMS.to_string()
    } else {
        names.join(", ")
    }
}

/// Builds the task the agent runs for `request`.
///
/// The description asks for stores near the location, the fields every
/// store record needs, and a JSON array in a fenced block as the answer.
#[must_use]
pub fn build_task_description(request: &SearchRequest, options: &TaskOptions<'_>) -> String {
    let location = request.location.to_string();
    let items = describe_items(&request.desired_items);
    let has_items = request
        .desired_items
        .iter()
        .any(|item| !item.trim().is_empty());
    let region = options
        .region
        .map(|r| format!(" in {r}"))
        .unwrap_or_default();
    let kind = options.store_kind;
    let radius = options.radius_km;
    let wanted = if has_items {
        format!("Looking for these specific items: {items}.")
    } else {
        format!("No specific items were requested; note {ANY_ITEMS} each store has in stock.")
    };

    let mut lines = vec![
        "# Store Finder Task".to_string(),
        String::new(),
        "## Objective".to_string(),
        format!("Find {kind} within {radius} km of {location}{region}."),
        wanted,
        String::new(),
        "## Steps".to_string(),
        format!("1. Search for \"{kind} near {location}\" on a maps or store listing site."),
        "2. For each store, collect:".to_string(),
    ];
    lines.extend(
        [
            "Store name",
            "Full address",
            "Distance from the search location in kilometres",
            "Rating out of 5 stars",
            "Opening hours",
            "Website URL",
            "Phone number",
        ]
        .iter()
        .map(|field| format!("   - {field}")),
    );
    lines.push(format!("   - Whether they have any of these in stock: {items}"));
    lines.push(format!(
        "3. Sort by proximity, closest first, and keep the {} closest stores.",
        options.max_results
    ));
    lines.push(String::new());
    lines.push("## Output format".to_string());
    lines.push(
        "Answer with a JSON array inside a ```json fenced code block and nothing else."
            .to_string(),
    );
    lines.push("Each element must have these keys:".to_string());
    lines.extend(OUTPUT_KEYS.iter().map(|(key, meaning)| format!("   - {key}: {meaning}")));
    lines.push(String::new());
    lines.push("## Notes".to_string());
    lines.push(format!("- Only include licensed, legal stores{region}."));
    lines.push(
        "- If a store's inventory cannot be checked, leave its inventory empty.".to_string(),
    );

    lines.join("\n")
}
