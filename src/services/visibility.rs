use serde_json::Value as JsonValue;

/// Campaign rows reach the browse endpoint as raw JSON because older
/// records were written by earlier schema revisions and do not share
/// column names. Matching therefore runs over alias lists per concept
/// instead of fixed fields.
pub const OWNER_ALIASES: [&str; 5] = [
    "business_id",
    "advertiser_id",
    "user_id",
    "owner",
    "created_by",
];
pub const LOCATION_ALIASES: [&str; 3] = ["location", "city", "place"];
pub const MERCHANDISE_ALIASES: [&str; 4] =
    ["merchandise_type", "merchandise_types", "items", "products"];
pub const DEMOGRAPHIC_ALIASES: [&str; 3] =
    ["influencer_demographics", "target_demographics", "demographics"];
pub const COMPENSATION_ALIASES: [&str; 5] = [
    "compensation_amount",
    "compensation",
    "amount",
    "pay_amount",
    "budget",
];

#[derive(Debug, Default, Clone)]
pub struct BrowseFilters {
    pub location: Option<String>,
    pub merchandise: Option<String>,
    pub gender: Option<String>,
    pub age_range: Option<String>,
    pub min_compensation: Option<f64>,
    pub max_compensation: Option<f64>,
}

impl BrowseFilters {
    pub fn new(
        location: Option<String>,
        merchandise: Option<String>,
        gender: Option<String>,
        age_range: Option<String>,
        min_compensation: Option<String>,
        max_compensation: Option<String>,
    ) -> Self {
        Self {
            location: non_empty(location),
            merchandise: non_empty(merchandise),
            gender: non_empty(gender),
            age_range: non_empty(age_range),
            min_compensation: parse_bound(min_compensation.as_deref()),
            max_compensation: parse_bound(max_compensation.as_deref()),
        }
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Compensation bounds arrive as free-text query values. Anything that
/// does not parse to a finite number leaves that side unbounded.
pub fn parse_bound(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Applies the viewer exclusion and all set filters, preserving row order.
pub fn visible_campaigns(
    rows: Vec<JsonValue>,
    viewer_id: &str,
    filters: &BrowseFilters,
) -> Vec<JsonValue> {
    rows.into_iter()
        .filter(|row| !is_owned_by(row, viewer_id))
        .filter(|row| matches_filters(row, filters))
        .collect()
}

/// A row belongs to the viewer when any owner alias equals their id
/// exactly. Rows without any owner alias belong to nobody.
pub fn is_owned_by(row: &JsonValue, viewer_id: &str) -> bool {
    OWNER_ALIASES
        .iter()
        .any(|key| row.get(key).and_then(JsonValue::as_str) == Some(viewer_id))
}

fn matches_filters(row: &JsonValue, filters: &BrowseFilters) -> bool {
    if let Some(location) = filters.location.as_deref() {
        if !any_alias_matches(row, &LOCATION_ALIASES, location) {
            return false;
        }
    }
    if let Some(merch) = filters.merchandise.as_deref() {
        if !any_alias_matches(row, &MERCHANDISE_ALIASES, merch) {
            return false;
        }
    }
    if !demographics_match(row, filters.gender.as_deref(), filters.age_range.as_deref()) {
        return false;
    }
    compensation_in_range(row, filters.min_compensation, filters.max_compensation)
}

fn any_alias_matches(row: &JsonValue, aliases: &[&str], needle: &str) -> bool {
    aliases
        .iter()
        .any(|key| row.get(key).is_some_and(|value| value_matches(value, needle)))
}

/// Case-insensitive substring match. Arrays match when any element does;
/// numbers and booleans match against their text form; nulls and objects
/// never match.
fn value_matches(value: &JsonValue, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    match value {
        JsonValue::String(s) => s.to_lowercase().contains(&needle),
        JsonValue::Array(items) => items.iter().any(|item| value_matches(item, &needle)),
        JsonValue::Number(n) => n.to_string().contains(&needle),
        JsonValue::Bool(b) => b.to_string().contains(&needle),
        _ => false,
    }
}

/// Gender and age range constrain independently: each one that is set
/// must match some demographic alias object, and an unset one never
/// excludes a row.
fn demographics_match(row: &JsonValue, gender: Option<&str>, age_range: Option<&str>) -> bool {
    let subfield_matches = |subfield: &str, needle: &str| {
        DEMOGRAPHIC_ALIASES.iter().any(|key| {
            row.get(key)
                .and_then(|demo| demo.get(subfield))
                .is_some_and(|value| value_matches(value, needle))
        })
    };

    let gender_ok = gender.map_or(true, |needle| subfield_matches("gender", needle));
    let age_ok = age_range.map_or(true, |needle| subfield_matches("age_range", needle));
    gender_ok && age_ok
}

/// First non-null compensation alias wins; numeric strings are coerced.
pub fn compensation_of(row: &JsonValue) -> Option<f64> {
    let value = COMPENSATION_ALIASES
        .iter()
        .find_map(|key| row.get(key).filter(|v| !v.is_null()))?;

    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// With a bound set, rows whose compensation is missing or unreadable are
/// excluded rather than shown at an unknown price.
fn compensation_in_range(row: &JsonValue, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(amount) = compensation_of(row) else {
        return false;
    };
    if min.is_some_and(|bound| amount < bound) {
        return false;
    }
    if max.is_some_and(|bound| amount > bound) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_filters() -> BrowseFilters {
        BrowseFilters::default()
    }

    fn comp_filters(min: Option<&str>, max: Option<&str>) -> BrowseFilters {
        BrowseFilters::new(
            None,
            None,
            None,
            None,
            min.map(String::from),
            max.map(String::from),
        )
    }

    #[test]
    fn viewer_rows_are_excluded_for_every_owner_alias() {
        for key in OWNER_ALIASES {
            let rows = vec![
                json!({ key: "viewer_1", "title": "mine" }),
                json!({ key: "someone_else", "title": "theirs" }),
            ];
            let visible = visible_campaigns(rows, "viewer_1", &no_filters());
            assert_eq!(visible.len(), 1, "alias {key} did not exclude the owner");
            assert_eq!(visible[0]["title"], "theirs");
        }
    }

    #[test]
    fn rows_without_owner_fields_are_visible() {
        let rows = vec![json!({ "title": "legacy row" })];
        assert_eq!(visible_campaigns(rows, "viewer_1", &no_filters()).len(), 1);
    }

    #[test]
    fn compensation_outside_range_is_excluded() {
        let rows = vec![
            json!({ "compensation_amount": 75, "title": "high" }),
            json!({ "compensation_amount": 30, "title": "inside" }),
        ];
        let visible = visible_campaigns(rows, "viewer", &comp_filters(Some("10"), Some("50")));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0]["title"], "inside");
    }

    #[test]
    fn boundary_compensation_is_included() {
        let rows = vec![
            json!({ "compensation_amount": 10 }),
            json!({ "compensation_amount": 50 }),
        ];
        let visible = visible_campaigns(rows, "viewer", &comp_filters(Some("10"), Some("50")));
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn string_compensation_is_coerced() {
        let rows = vec![json!({ "compensation_amount": "45.50" })];
        let visible = visible_campaigns(rows, "viewer", &comp_filters(Some("40"), Some("50")));
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn missing_compensation_fails_a_bounded_filter() {
        let rows = vec![
            json!({ "title": "no amount" }),
            json!({ "compensation_amount": "call us" }),
        ];
        assert!(visible_campaigns(rows.clone(), "viewer", &comp_filters(Some("10"), None)).is_empty());
        assert_eq!(visible_campaigns(rows, "viewer", &no_filters()).len(), 2);
    }

    #[test]
    fn malformed_bounds_leave_the_range_open() {
        let filters = comp_filters(Some("cheap"), Some(" "));
        assert_eq!(filters.min_compensation, None);
        assert_eq!(filters.max_compensation, None);

        let rows = vec![json!({ "compensation_amount": 9999 })];
        assert_eq!(visible_campaigns(rows, "viewer", &filters).len(), 1);
    }

    #[test]
    fn non_finite_bounds_are_ignored() {
        assert_eq!(parse_bound(Some("NaN")), None);
        assert_eq!(parse_bound(Some("inf")), None);
        assert_eq!(parse_bound(Some("25")), Some(25.0));
    }

    #[test]
    fn later_compensation_aliases_are_consulted_when_earlier_ones_are_null() {
        let row = json!({ "compensation_amount": null, "budget": "20" });
        assert_eq!(compensation_of(&row), Some(20.0));
    }

    #[test]
    fn first_non_null_compensation_alias_wins() {
        let row = json!({ "compensation": 15, "budget": 90 });
        assert_eq!(compensation_of(&row), Some(15.0));
    }

    #[test]
    fn location_matches_any_alias_case_insensitively() {
        let filters = BrowseFilters::new(Some("austin".into()), None, None, None, None, None);
        let rows = vec![
            json!({ "city": "Austin, TX" }),
            json!({ "location": "Portland" }),
            json!({ "place": ["Remote", "AUSTIN"] }),
        ];
        let visible = visible_campaigns(rows, "viewer", &filters);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn merchandise_arrays_match_on_any_element() {
        let filters = BrowseFilters::new(None, Some("hoodie".into()), None, None, None, None);
        let rows = vec![
            json!({ "merchandise_types": ["t-shirt", "Hoodie"] }),
            json!({ "products": ["cap"] }),
            json!({ "merchandise_type": "zip hoodie" }),
        ];
        let visible = visible_campaigns(rows, "viewer", &filters);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn gender_filter_alone_does_not_require_an_age_match() {
        let filters = BrowseFilters::new(None, None, Some("female".into()), None, None, None);
        let rows = vec![
            json!({ "target_demographics": { "gender": "female", "age_range": "18-24" } }),
            json!({ "influencer_demographics": { "gender": "any" } }),
        ];
        let visible = visible_campaigns(rows, "viewer", &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0]["target_demographics"]["gender"], "female");
    }

    #[test]
    fn age_and_gender_filters_combine() {
        let filters = BrowseFilters::new(
            None,
            None,
            Some("female".into()),
            Some("25-34".into()),
            None,
            None,
        );
        let rows = vec![
            json!({ "demographics": { "gender": "female", "age_range": "25-34" } }),
            json!({ "demographics": { "gender": "female", "age_range": "18-24" } }),
        ];
        assert_eq!(visible_campaigns(rows, "viewer", &filters).len(), 1);
    }

    #[test]
    fn rows_without_demographics_fail_a_demographic_filter() {
        let filters = BrowseFilters::new(None, None, Some("female".into()), None, None, None);
        let rows = vec![json!({ "title": "no demo data" })];
        assert!(visible_campaigns(rows, "viewer", &filters).is_empty());
    }

    #[test]
    fn row_order_is_preserved() {
        let rows = vec![
            json!({ "title": "first" }),
            json!({ "title": "second" }),
            json!({ "title": "third" }),
        ];
        let visible = visible_campaigns(rows, "viewer", &no_filters());
        let titles: Vec<_> = visible.iter().map(|r| r["title"].as_str().unwrap()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn blank_filter_inputs_are_treated_as_unset() {
        let filters = BrowseFilters::new(
            Some("  ".into()),
            Some(String::new()),
            None,
            None,
            Some(String::new()),
            None,
        );
        assert!(filters.location.is_none());
        assert!(filters.merchandise.is_none());
        assert!(filters.min_compensation.is_none());
    }
}
