// Tool argument parsing with basic type coercion

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use unhcr_sdk::Filter;

/// Arguments shared by every query tool.
///
/// Agents send years as numbers or strings and flags as booleans or strings,
/// so each field accepts the obvious spellings.
#[derive(Debug, Default, Deserialize)]
pub struct QueryArgs {
    #[serde(default, deserialize_with = "list")]
    pub coo: Option<String>,
    #[serde(default, deserialize_with = "list")]
    pub coa: Option<String>,
    #[serde(default, deserialize_with = "list")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub coo_all: bool,
    #[serde(default, deserialize_with = "flag")]
    pub coa_all: bool,
    #[serde(default, deserialize_with = "flag")]
    pub pop_type: bool,
}

impl QueryArgs {
    pub fn into_filter(self) -> Filter {
        let mut filter = Filter::new()
            .coo_all(self.coo_all)
            .coa_all(self.coa_all)
            .pop_type(self.pop_type);

        if let Some(coo) = self.coo {
            filter = filter.coo(&coo);
        }
        if let Some(coa) = self.coa {
            filter = filter.coa(&coa);
        }
        if let Some(year) = self.year {
            filter = filter.year(year);
        }

        filter
    }
}

/// String, number, or array of those, flattened to a comma-separated list.
pub(crate) fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    let value = Value::deserialize(deserializer)?;
    let joined = match &value {
        Value::Null => return Ok(None),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar(item).ok_or_else(|| {
                    serde::de::Error::custom(format!("expected string or number, got {}", item))
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(","),
        other => scalar(other).ok_or_else(|| {
            serde::de::Error::custom(format!("expected string, number or array, got {}", other))
        })?,
    };

    Ok((!joined.trim().is_empty()).then_some(joined))
}

/// Boolean, `"true"`/`"false"` (and `1`/`0`, `yes`/`no`), or null for false.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("expected a boolean, got {:?}", other))),
        },
        other => Err(serde::de::Error::custom(format!("expected a boolean, got {}", other))),
    }
}
