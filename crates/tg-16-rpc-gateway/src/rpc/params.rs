//! Positional parameter parsing and shape checks.

use crate::domain::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse a required parameter from the JSON-RPC params array.
pub fn parse_param<T: DeserializeOwned>(params: Option<&Value>, index: usize) -> ApiResult<T> {
    let param = param_at(params, index)
        .ok_or_else(|| ApiError::invalid_params(format!("missing parameter at index {}", index)))?;

    serde_json::from_value(param.clone()).map_err(|e| {
        ApiError::invalid_params(format!("invalid parameter at index {}: {}", index, e))
    })
}

/// Parse a required object parameter holding at most `max_entries` keys.
///
/// The size is checked before any value is converted.
pub fn parse_object_param<T: DeserializeOwned>(
    params: Option<&Value>,
    index: usize,
    max_entries: usize,
) -> ApiResult<T> {
    let param = param_at(params, index)
        .ok_or_else(|| ApiError::invalid_params(format!("missing parameter at index {}", index)))?;

    let Some(object) = param.as_object() else {
        return Err(ApiError::invalid_params(format!(
            "parameter at index {} must be an object",
            index
        )));
    };

    if object.len() > max_entries {
        return Err(ApiError::invalid_params(format!(
            "parameter at index {} has {} entries (max: {})",
            index,
            object.len(),
            max_entries
        )));
    }

    serde_json::from_value(param.clone()).map_err(|e| {
        ApiError::invalid_params(format!("invalid parameter at index {}: {}", index, e))
    })
}

fn param_at(params: Option<&Value>, index: usize) -> Option<&Value> {
    params.and_then(|p| match p {
        Value::Array(items) => items.get(index),
        _ => None,
    })
}
