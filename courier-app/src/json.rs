//! JSON-simplifier module: trims long arrays out of a JSON document so it
//! fits in a glance.

use async_trait::async_trait;
use courier_core::{CourierResult, ValidationError};
use courier_dispatch::{Query, QueryHandler};
use serde_json::Value;

/// Default number of array elements kept per array.
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Produce a pretty-printed copy of `json` with every array truncated to
/// `max_items` elements, recursively. Input that is not valid JSON comes
/// back unchanged.
#[derive(Debug, Clone)]
pub struct SimplifyJson {
    pub json: String,
    pub max_items: usize,
}

impl SimplifyJson {
    pub fn new(json: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.json.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "json".to_string(),
            });
        }
        if self.max_items == 0 {
            return Err(ValidationError::InvalidValue {
                field: "max_items".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Query for SimplifyJson {
    type Output = String;
    const NAME: &'static str = "SimplifyJson";
}

pub struct SimplifyJsonHandler;

#[async_trait]
impl QueryHandler<SimplifyJson> for SimplifyJsonHandler {
    async fn handle(&self, query: SimplifyJson) -> CourierResult<String> {
        match serde_json::from_str::<Value>(&query.json) {
            Ok(value) => {
                let simplified = truncate_arrays(value, query.max_items);
                Ok(serde_json::to_string_pretty(&simplified).unwrap_or(query.json))
            }
            // Not valid JSON: hand it back unchanged.
            Err(_) => Ok(query.json),
        }
    }
}

fn truncate_arrays(value: Value, max_items: usize) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .take(max_items)
                .map(|item| truncate_arrays(item, max_items))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, truncate_arrays(item, max_items)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn simplify(json: &str, max_items: usize) -> String {
        SimplifyJsonHandler
            .handle(SimplifyJson::new(json).with_max_items(max_items))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn truncates_top_level_arrays() {
        let output = simplify("[1, 2, 3, 4, 5]", 2).await;
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[tokio::test]
    async fn truncates_arrays_nested_in_objects() {
        let output = simplify(r#"{"items": [1, 2, 3], "name": "x"}"#, 1).await;
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value, json!({ "items": [1], "name": "x" }));
    }

    #[tokio::test]
    async fn invalid_json_passes_through_unchanged() {
        let output = simplify("not json at all", 5).await;
        assert_eq!(output, "not json at all");
    }

    #[test]
    fn zero_max_items_fails_validation() {
        let query = SimplifyJson::new("[]").with_max_items(0);
        assert!(matches!(
            query.validate(),
            Err(ValidationError::InvalidValue { field, .. }) if field == "max_items"
        ));
    }

    #[test]
    fn empty_input_fails_validation() {
        assert!(matches!(
            SimplifyJson::new("  ").validate(),
            Err(ValidationError::RequiredFieldMissing { field }) if field == "json"
        ));
    }
}
