use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A named (or unnamed) block of ingredient lines, e.g. "Dough" or "Sauce".
///
/// An empty `group_name` means the items are not grouped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientGroup {
    #[serde(default)]
    pub group_name: String,
    pub items: Vec<String>,
}

impl IngredientGroup {
    pub fn new(group_name: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            group_name: group_name.into(),
            items,
        }
    }

    /// A group without a name.
    pub fn ungrouped(items: Vec<String>) -> Self {
        Self::new("", items)
    }

    pub fn is_named(&self) -> bool {
        !self.group_name.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.group_name.is_empty() && self.items.is_empty()
    }
}

impl fmt::Display for IngredientGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_named() {
            writeln!(f, "{}:", self.group_name)?;
        }
        for item in &self.items {
            writeln!(f, "  - {}", item)?;
        }
        Ok(())
    }
}

/// Converts any stored ingredient shape into grouped form.
///
/// Accepted inputs:
/// - absent or `null`: one empty unnamed group
/// - an array of `{groupName, items}` objects: returned as-is
/// - an array of strings (possibly empty): one unnamed group holding them
///
/// Anything else yields one empty unnamed group.
pub fn normalize_ingredients(value: Option<&Value>) -> Vec<IngredientGroup> {
    let (array, entries) = match value {
        Some(array @ Value::Array(entries)) => (array, entries),
        _ => return default_groups(),
    };

    if entries.iter().all(Value::is_string) {
        let items = entries
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        return vec![IngredientGroup::ungrouped(items)];
    }

    if entries.iter().all(|v| v.get("items").is_some()) {
        if let Ok(groups) = Vec::<IngredientGroup>::deserialize(array) {
            return groups;
        }
    }

    default_groups()
}

pub(crate) fn default_groups() -> Vec<IngredientGroup> {
    vec![IngredientGroup::default()]
}

/// Serde adapter so every deserialized recipe carries grouped ingredients.
pub(crate) fn deserialize_grouped<'de, D>(deserializer: D) -> Result<Vec<IngredientGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_ingredients(Some(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_missing() {
        assert_eq!(
            normalize_ingredients(None),
            vec![IngredientGroup::ungrouped(vec![])]
        );
        assert_eq!(
            normalize_ingredients(Some(&Value::Null)),
            vec![IngredientGroup::ungrouped(vec![])]
        );
    }

    #[test]
    fn test_normalize_flat_strings() {
        let input = json!(["2 eggs", "1 cup flour", "pinch of salt"]);
        let groups = normalize_ingredients(Some(&input));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_name, "");
        assert_eq!(groups[0].items, vec!["2 eggs", "1 cup flour", "pinch of salt"]);
    }

    #[test]
    fn test_normalize_empty_array() {
        let groups = normalize_ingredients(Some(&json!([])));
        assert_eq!(groups, vec![IngredientGroup::ungrouped(vec![])]);
    }

    #[test]
    fn test_normalize_grouped_is_identity() {
        let input = json!([
            {"groupName": "Dough", "items": ["flour", "water"]},
            {"groupName": "", "items": []},
            {"groupName": "Topping", "items": ["cheese"]}
        ]);
        let groups = normalize_ingredients(Some(&input));

        assert_eq!(
            groups,
            vec![
                IngredientGroup::new("Dough", vec!["flour".into(), "water".into()]),
                IngredientGroup::ungrouped(vec![]),
                IngredientGroup::new("Topping", vec!["cheese".into()]),
            ]
        );
        assert_eq!(serde_json::to_value(&groups).unwrap(), input);
    }

    #[test]
    fn test_normalize_group_without_name() {
        let input = json!([{"items": ["rice"]}]);
        let groups = normalize_ingredients(Some(&input));
        assert_eq!(groups, vec![IngredientGroup::ungrouped(vec!["rice".into()])]);
    }

    #[test]
    fn test_normalize_unknown_shapes() {
        for input in [
            json!("flour"),
            json!(42),
            json!({"items": ["flour"]}),
            json!(["flour", 3]),
            json!([{"name": "flour"}]),
            json!([{"items": "flour"}]),
        ] {
            assert_eq!(
                normalize_ingredients(Some(&input)),
                vec![IngredientGroup::ungrouped(vec![])],
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_group_display() {
        let group = IngredientGroup::new("Sauce", vec!["tomatoes".into(), "basil".into()]);
        assert_eq!(format!("{}", group), "Sauce:\n  - tomatoes\n  - basil\n");

        let plain = IngredientGroup::ungrouped(vec!["salt".into()]);
        assert_eq!(format!("{}", plain), "  - salt\n");
    }
}
