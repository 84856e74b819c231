//! Task title categorization.
//!
//! Two variants: a strict lookup against the fixed set of known chore titles,
//! and a loose keyword matcher for free-text titles outside that set. Both
//! map to `"other"` when nothing matches.

use serde::{Deserialize, Serialize};

/// Known chore titles per category. Declaration order is the tie-break if a
/// title ever appears in more than one set: the earlier category wins.
const CATEGORY_TITLES: &[(&str, &[&str])] = &[
    (
        "shopping",
        &[
            "Grocery shopping Lidl",
            "Shopping at Kaufland",
            "Farmers market",
            "Weekly groceries",
        ],
    ),
    (
        "trash",
        &[
            "Take out trash",
            "Empty trash bins",
            "Take out recycling",
            "Take out glass",
        ],
    ),
    (
        "vacuum",
        &["Vacuum living room", "Vacuum bedroom", "Vacuum entire house"],
    ),
    ("dust", &["Dust surfaces", "Dust and vacuum", "Clean surfaces"]),
    (
        "windows",
        &[
            "Clean living room windows",
            "Clean all windows",
            "Windows and mirrors",
        ],
    ),
    (
        "bathroom",
        &["Clean bathroom", "Bathroom and toilet", "Deep clean bathroom"],
    ),
    (
        "dishwasher_start",
        &["Start dishwasher", "Load dishwasher", "Run dishwasher"],
    ),
    (
        "dishwasher_unload",
        &["Unload dishwasher", "Empty dishwasher", "Put dishes away"],
    ),
    (
        "breakfast",
        &["Prepare breakfast", "Make breakfast", "Coffee and breakfast"],
    ),
    ("lunch", &["Cook lunch", "Prepare lunch", "Make lunch"]),
    ("dinner", &["Cook dinner", "Prepare dinner", "Make dinner"]),
    (
        "laundry_start",
        &["Start laundry", "Run washing machine", "Do laundry"],
    ),
    (
        "laundry_hang",
        &["Hang laundry to dry", "Take out laundry", "Hang clothes"],
    ),
];

/// Human-readable names for both category key spaces.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("shopping", "Shopping"),
    ("trash", "Taking out trash"),
    ("vacuum", "Vacuuming"),
    ("dust", "Dusting"),
    ("windows", "Cleaning windows"),
    ("bathroom", "Cleaning bathroom"),
    ("dishwasher_start", "Starting dishwasher"),
    ("dishwasher_unload", "Unloading dishwasher"),
    ("breakfast", "Preparing breakfast"),
    ("lunch", "Cooking lunch"),
    ("dinner", "Cooking dinner"),
    ("laundry_start", "Starting laundry"),
    ("laundry_hang", "Hanging laundry"),
    // Keyword-variant keys
    ("cleaning", "Cleaning"),
    ("cooking", "Cooking"),
    ("laundry", "Laundry"),
    ("dishes", "Dishes"),
    ("other", "Other tasks"),
];

/// Title categorizer, selectable per deployment depending on whether tasks
/// use the fixed chore titles or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Categorizer {
    /// Exact, case-sensitive match against the known chore titles.
    #[default]
    Strict,
    /// Substring match on the lower-cased title.
    Keyword,
}

impl Categorizer {
    /// Map a task title to its category key.
    pub fn categorize(&self, title: &str) -> &'static str {
        match self {
            Categorizer::Strict => categorize_strict(title),
            Categorizer::Keyword => categorize_keyword(title),
        }
    }

    /// Human-readable name for a category key. Unknown keys are returned
    /// as-is.
    pub fn display_name<'a>(&self, key: &'a str) -> &'a str {
        DISPLAY_NAMES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, name)| *name)
            .unwrap_or(key)
    }
}

fn categorize_strict(title: &str) -> &'static str {
    for (key, titles) in CATEGORY_TITLES {
        if titles.contains(&title) {
            return key;
        }
    }
    "other"
}

fn categorize_keyword(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    let has = |needle: &str| lower.contains(needle);
    if has("shop") || has("buy") {
        "shopping"
    } else if has("clean") || has("vacuum") || has("dust") {
        "cleaning"
    } else if has("cook") || has("meal") || has("dinner") {
        "cooking"
    } else if has("laundry") || has("wash") {
        "laundry"
    } else if has("dish") || has("plates") {
        "dishes"
    } else if has("trash") || has("garbage") {
        "trash"
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_matches_known_titles() {
        let c = Categorizer::Strict;
        assert_eq!(c.categorize("Take out trash"), "trash");
        assert_eq!(c.categorize("Cook dinner"), "dinner");
        assert_eq!(c.categorize("Hang clothes"), "laundry_hang");
    }

    #[test]
    fn strict_is_case_sensitive_and_exact() {
        let c = Categorizer::Strict;
        assert_eq!(c.categorize("take out trash"), "other");
        assert_eq!(c.categorize("Take out trash!"), "other");
        assert_eq!(c.categorize("Unknown custom title"), "other");
    }

    #[test]
    fn keyword_buckets_free_text() {
        let c = Categorizer::Keyword;
        assert_eq!(c.categorize("Buy milk and eggs"), "shopping");
        assert_eq!(c.categorize("vacuum the hallway"), "cleaning");
        assert_eq!(c.categorize("prep dinner for guests"), "cooking");
        assert_eq!(c.categorize("Wash the towels"), "laundry");
        assert_eq!(c.categorize("put PLATES away"), "dishes");
        assert_eq!(c.categorize("garbage day"), "trash");
        assert_eq!(c.categorize("water the plants"), "other");
    }

    #[test]
    fn display_names_cover_both_key_spaces() {
        let c = Categorizer::Strict;
        assert_eq!(c.display_name("trash"), "Taking out trash");
        assert_eq!(c.display_name("cleaning"), "Cleaning");
        assert_eq!(c.display_name("other"), "Other tasks");
        assert_eq!(c.display_name("custom"), "custom");
    }
}
