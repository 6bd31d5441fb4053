use crate::errors::ToolError;
use crate::utils::suggest::did_you_mean;
use serde_json::Value;

/// Typed accessors over tool arguments. The catalog schema has already
/// checked JSON types, so these mostly normalize absent/null/empty values.
#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    /// Any string, empty included. Blank ids and paths go through to the
    /// client untouched.
    pub fn ensure_string(&self, args: &Value, key: &str) -> Result<String, ToolError> {
        args.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolError::invalid_params(format!("{} must be a string", key)))
    }

    /// `None` for a missing, null or blank value. Non-blank values are kept as
    /// given.
    pub fn optional_string(&self, args: &Value, key: &str) -> Option<String> {
        args.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }

    pub fn ensure_string_list(&self, args: &Value, key: &str) -> Result<Vec<String>, ToolError> {
        let Some(items) = args.get(key).and_then(Value::as_array) else {
            return Err(ToolError::invalid_params(format!(
                "{} must be an array of file paths",
                key
            )));
        };
        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ToolError::invalid_params(format!("{} must contain only strings", key))
                })
            })
            .collect()
    }

    pub fn optional_string_list(
        &self,
        args: &Value,
        key: &str,
    ) -> Result<Option<Vec<String>>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.ensure_string_list(args, key).map(Some),
        }
    }

    pub fn optional_u64(&self, args: &Value, key: &str) -> Result<Option<u64>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => whole_number(value).map(Some).ok_or_else(|| {
                ToolError::invalid_params(format!("{} must be a non-negative integer", key))
            }),
        }
    }

    pub fn optional_bool(&self, args: &Value, key: &str) -> Option<bool> {
        args.get(key).and_then(Value::as_bool)
    }

    pub fn ensure_number(&self, args: &Value, key: &str) -> Result<f64, ToolError> {
        args.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| ToolError::invalid_params(format!("{} must be a number", key)))
    }

    pub fn optional_object(&self, args: &Value, key: &str) -> Option<Value> {
        args.get(key).filter(|value| value.is_object()).cloned()
    }

    /// Rejects anything outside `allowed`, listing the accepted values.
    pub fn ensure_choice(&self, value: &str, key: &str, allowed: &[&str]) -> Result<(), ToolError> {
        if allowed.contains(&value) {
            return Ok(());
        }
        let mut err = ToolError::invalid_params(format!(
            "{} must be one of: {}",
            key,
            allowed.join(", ")
        ))
        .with_details(serde_json::json!({ "field": key, "received": value, "allowed": allowed }));
        if let Some(hint) = did_you_mean(value, allowed) {
            err = err.with_hint(hint);
        }
        Err(err)
    }

    /// Closed interval check, both bounds inclusive.
    pub fn ensure_in_range(
        &self,
        value: f64,
        key: &str,
        min: f64,
        max: f64,
    ) -> Result<(), ToolError> {
        if value.is_finite() && value >= min && value <= max {
            return Ok(());
        }
        Err(ToolError::invalid_params(format!(
            "{} must be a number between {} and {}",
            key, min, max
        )))
    }
}

/// Accepts `2` and `2.0` alike, matching the schema's notion of an integer.
fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}
