//! Client-side validation of request bodies
//!
//! Bodies are validated before they are serialized; a failure is always an
//! [`Error::InvalidArgument`] and no request is sent.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Characters ARM rejects in resource names, plus the length bound
static RESOURCE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^<>%&:\\?/#*\s][^<>%&:\\?/#*]{0,259}$").expect("valid regex"));

const MAX_TAGS: usize = 50;
const MAX_TAG_NAME_LEN: usize = 512;
const MAX_TAG_VALUE_LEN: usize = 256;

/// Schema-level checks a request body runs before serialization
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Raw JSON bodies only need to be objects
impl Validate for Value {
    fn validate(&self) -> Result<()> {
        if self.is_object() {
            Ok(())
        } else {
            Err(Error::invalid_argument("parameters", "must be a JSON object"))
        }
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<()> {
        self.as_ref().map_or(Ok(()), Validate::validate)
    }
}

/// Fail unless `value` has non-whitespace content
pub fn require_non_empty(parameter: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::required(parameter));
    }
    Ok(())
}

/// Fail unless `value` lies within `min..=max`
pub fn require_range<T>(parameter: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(Error::invalid_argument(
            parameter,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

/// Fail unless `value` is an acceptable resource name
pub fn require_resource_name(parameter: &str, value: &str) -> Result<()> {
    require_non_empty(parameter, value)?;
    if !RESOURCE_NAME.is_match(value) {
        return Err(Error::invalid_argument(
            parameter,
            format!("'{value}' is not a valid resource name"),
        ));
    }
    Ok(())
}

/// Body for creating a tracked (located) resource
///
/// `properties` stays untyped; resource-specific schemas belong to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedResourceParameters {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub properties: Value,
}

impl TrackedResourceParameters {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            tags: None,
            properties: Value::Null,
        }
    }

    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }
}

impl Validate for TrackedResourceParameters {
    fn validate(&self) -> Result<()> {
        require_non_empty("parameters.location", &self.location)?;
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        if !self.properties.is_null() && !self.properties.is_object() {
            return Err(Error::invalid_argument(
                "parameters.properties",
                "must be a JSON object",
            ));
        }
        Ok(())
    }
}

/// Body for a PATCH update: tags and/or properties, no location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

impl Validate for UpdateParameters {
    fn validate(&self) -> Result<()> {
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        match &self.properties {
            Some(p) if !p.is_object() => Err(Error::invalid_argument(
                "parameters.properties",
                "must be a JSON object",
            )),
            _ => Ok(()),
        }
    }
}

/// Body of a `checkNameAvailability` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAvailabilityParameters {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl NameAvailabilityParameters {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
        }
    }
}

impl Validate for NameAvailabilityParameters {
    fn validate(&self) -> Result<()> {
        require_resource_name("parameters.name", &self.name)?;
        require_non_empty("parameters.type", &self.resource_type)
    }
}

fn validate_tags(tags: &BTreeMap<String, String>) -> Result<()> {
    require_range("parameters.tags", tags.len(), 0, MAX_TAGS)?;
    for (key, value) in tags {
        require_non_empty("parameters.tags", key)?;
        require_range("parameters.tags.key_length", key.len(), 1, MAX_TAG_NAME_LEN)?;
        require_range(
            "parameters.tags.value_length",
            value.len(),
            0,
            MAX_TAG_VALUE_LEN,
        )?;
    }
    Ok(())
}
