use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Runtime parameters passed to a config.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// Create empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse from CLI args like "key=value".
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut params = Self::new();
        for arg in args {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                Error::Config(format!("invalid param '{}', expected key=value", arg))
            })?;
            params.values.insert(key.to_string(), value.to_string());
        }
        Ok(params)
    }
}

/// Parameter definition in config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamDef {
    /// Whether this parameter must resolve to a value.
    #[serde(default)]
    pub required: bool,

    /// Fallback when neither a CLI param nor an environment variable is set.
    pub default: Option<String>,

    /// Description for `--check` output.
    pub description: Option<String>,
}

/// Look a name up: explicit params, then the environment, then the definition's default.
fn resolve(name: &str, params: &Params, defs: &HashMap<String, ParamDef>) -> Result<Option<String>> {
    if let Some(v) = params.get(name) {
        return Ok(Some(v.to_string()));
    }
    if let Ok(v) = std::env::var(name) {
        return Ok(Some(v));
    }
    match defs.get(name) {
        Some(ParamDef {
            default: Some(d), ..
        }) => Ok(Some(d.clone())),
        Some(ParamDef { required: true, .. }) => Err(Error::Config(format!(
            "missing required parameter: {} (pass -P {}=... or set the environment variable)",
            name, name
        ))),
        Some(_) => Ok(Some(String::new())),
        None => Ok(None),
    }
}

/// Substitute `${var}` patterns in a string.
///
/// Unknown names with no matching environment variable are left as-is.
pub fn substitute(
    template: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<String> {
    let mut result = template.to_string();
    let mut start = 0;

    while let Some(var_start) = result[start..].find("${") {
        let var_start = start + var_start;
        let Some(var_end) = result[var_start..].find('}') else {
            break;
        };
        let var_end = var_start + var_end;

        let var_name = &result[var_start + 2..var_end];
        let Some(value) = resolve(var_name, params, defs)? else {
            start = var_end + 1;
            continue;
        };

        result.replace_range(var_start..=var_end, &value);
        start = var_start + value.len();
    }

    Ok(result)
}

/// Recursively substitute params in a serde_yaml::Value.
pub fn substitute_value(
    value: &mut serde_yaml::Value,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<()> {
    match value {
        serde_yaml::Value::String(s) => {
            *s = substitute(s, params, defs)?;
        }
        serde_yaml::Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for v in seq.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        _ => {}
    }
    Ok(())
}
