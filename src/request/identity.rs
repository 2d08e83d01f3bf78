//! Resource identity and path construction
//!
//! A [`ResourceIdentity`] names the scope of a call. Each operation states
//! the [`Scope`] it needs; [`ResourceIdentity::require`] checks the fields for
//! that scope before any request is built.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Identifies the subscription / resource group / account a call targets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub subscription_id: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub child_name: Option<String>,
}

impl ResourceIdentity {
    /// Identity scoped to a subscription
    pub fn subscription(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            ..Default::default()
        }
    }

    /// Narrow to a resource group
    #[must_use]
    pub fn resource_group(mut self, name: impl Into<String>) -> Self {
        self.resource_group = Some(name.into());
        self
    }

    /// Narrow to a named account
    #[must_use]
    pub fn account(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    /// Narrow to a named child resource of the account
    #[must_use]
    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.child_name = Some(name.into());
        self
    }

    /// Check that every field needed for `scope` is present and non-empty
    pub fn require(&self, scope: Scope) -> Result<()> {
        non_empty("subscription_id", Some(&self.subscription_id))?;
        if scope >= Scope::ResourceGroup {
            non_empty("resource_group", self.resource_group.as_ref())?;
        }
        if scope >= Scope::Account {
            non_empty("account_name", self.account_name.as_ref())?;
        }
        if scope >= Scope::Child {
            non_empty("child_name", self.child_name.as_ref())?;
        }
        Ok(())
    }
}

/// How deep an operation reaches into the resource hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    Subscription,
    ResourceGroup,
    Account,
    Child,
}

fn non_empty(parameter: &str, value: Option<&String>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(Error::required(parameter)),
    }
}

/// Provider namespace and collection name of a resource type,
/// e.g. `Microsoft.DataLakeAnalytics` / `accounts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub namespace: String,
    #[serde(rename = "type")]
    pub collection: String,
}

impl ResourceType {
    pub fn new(namespace: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collection: collection.into(),
        }
    }
}

/// Builds request URLs from an identity
///
/// Segments are percent-encoded individually, so names containing spaces
/// or reserved characters cannot alter the path structure.
#[derive(Debug, Clone)]
pub struct PathBuilder<'a> {
    base: &'a Url,
    resource_type: &'a ResourceType,
}

impl<'a> PathBuilder<'a> {
    pub fn new(base: &'a Url, resource_type: &'a ResourceType) -> Self {
        Self {
            base,
            resource_type,
        }
    }

    /// `subscriptions/{sub}/providers/{ns}/{type}`
    pub fn subscription_collection(&self, id: &ResourceIdentity) -> Result<Url> {
        id.require(Scope::Subscription)?;
        self.build(&[
            "subscriptions",
            id.subscription_id.as_str(),
            "providers",
            self.resource_type.namespace.as_str(),
            self.resource_type.collection.as_str(),
        ])
    }

    /// `subscriptions/{sub}/resourceGroups/{rg}/providers/{ns}/{type}`
    pub fn resource_group_collection(&self, id: &ResourceIdentity) -> Result<Url> {
        id.require(Scope::ResourceGroup)?;
        self.build(&self.group_segments(id))
    }

    /// `.../{type}/{account}`
    pub fn resource(&self, id: &ResourceIdentity) -> Result<Url> {
        id.require(Scope::Account)?;
        let mut segments = self.group_segments(id);
        segments.push(id.account_name.as_deref().unwrap_or_default());
        self.build(&segments)
    }

    /// `.../{type}/{account}/{child_type}`
    pub fn child_collection(&self, id: &ResourceIdentity, child_type: &str) -> Result<Url> {
        id.require(Scope::Account)?;
        require_child_type(child_type)?;
        let mut segments = self.group_segments(id);
        segments.push(id.account_name.as_deref().unwrap_or_default());
        segments.push(child_type);
        self.build(&segments)
    }

    /// `.../{type}/{account}/{child_type}/{child}`
    pub fn child(&self, id: &ResourceIdentity, child_type: &str) -> Result<Url> {
        id.require(Scope::Child)?;
        require_child_type(child_type)?;
        let mut segments = self.group_segments(id);
        segments.push(id.account_name.as_deref().unwrap_or_default());
        segments.push(child_type);
        segments.push(id.child_name.as_deref().unwrap_or_default());
        self.build(&segments)
    }

    /// `subscriptions/{sub}/providers/{ns}/locations/{location}/{action}`
    pub fn location_action(
        &self,
        id: &ResourceIdentity,
        location: &str,
        action: &str,
    ) -> Result<Url> {
        id.require(Scope::Subscription)?;
        if location.trim().is_empty() {
            return Err(Error::required("location"));
        }
        self.build(&[
            "subscriptions",
            id.subscription_id.as_str(),
            "providers",
            self.resource_type.namespace.as_str(),
            "locations",
            location,
            action,
        ])
    }

    fn group_segments<'s>(&'s self, id: &'s ResourceIdentity) -> Vec<&'s str> {
        vec![
            "subscriptions",
            id.subscription_id.as_str(),
            "resourceGroups",
            id.resource_group.as_deref().unwrap_or_default(),
            "providers",
            self.resource_type.namespace.as_str(),
            self.resource_type.collection.as_str(),
        ]
    }

    fn build(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::config(format!("Base URL cannot be a base: {}", self.base)))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }
}

fn require_child_type(child_type: &str) -> Result<()> {
    if child_type.trim().is_empty() {
        return Err(Error::required("child_type"));
    }
    Ok(())
}
