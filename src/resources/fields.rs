//! # Field Helpers
//!
//! Presence checks for required fields, the tri-state [`Patch`] used by
//! partial updates, and the loose text matching used by list filters.

use serde::{Deserialize, Deserializer};

use super::ValidationError;

/// Update value for an optional, nullable field
///
/// `Absent` (key omitted) keeps the stored value, `Null` clears it and
/// `Value` replaces it. Falsy values such as `0` are values, not absence.
/// Fields of this type must carry `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    /// Write this patch into `target`
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(v) => *target = Some(v),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Collects required fields at creation time
///
/// Missing, `null` and empty strings all count as not present. The error
/// lists every required field, e.g. `Title, description and category are
/// required`.
#[derive(Debug, Default)]
pub struct Required {
    names: Vec<&'static str>,
    missing: bool,
}

impl Required {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a required text field, remembering whether it was present
    pub fn take(&mut self, name: &'static str, value: Option<String>) -> String {
        self.names.push(name);
        match value.filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                self.missing = true;
                String::new()
            }
        }
    }

    /// Fail if any taken field was missing
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.missing {
            Err(ValidationError(format!("{} are required", join_names(&self.names))))
        } else {
            Ok(())
        }
    }
}

fn join_names(names: &[&str]) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i == 0 {
            let mut chars = name.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else if i + 1 == names.len() {
            out.push_str(" and ");
            out.push_str(name);
        } else {
            out.push_str(", ");
            out.push_str(name);
        }
    }
    out
}

/// Reject an explicit empty string for a required field in an update
pub fn check_not_emptied(name: &str, value: &Option<String>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.is_empty() => Err(ValidationError(format!("{} must not be empty", name))),
        _ => Ok(()),
    }
}

/// Overwrite a required text field if the update supplied it
pub fn set_text(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Case-insensitive substring match
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whole-string equality ignoring case
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// `value >= min` when a minimum is requested; records without a value fail
pub fn at_least(value: Option<f64>, min: Option<f64>) -> bool {
    match min {
        None => true,
        Some(min) => value.is_some_and(|v| v >= min),
    }
}
