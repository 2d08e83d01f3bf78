//! Page type
//!
//! A page is the `{"value": [...], "nextLink": "..."}` envelope every list
//! operation returns.

use serde::Deserialize;

/// One page of a list response
///
/// Immutable once decoded. `next_link` is `None` on the last page; an empty
/// string from the service is normalised to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawPage<T>")]
pub struct Page<T> {
    value: Vec<T>,
    next_link: Option<String>,
    count: Option<u64>,
}

/// Wire envelope; both link spellings and both count spellings may appear
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RawPage<T> {
    #[serde(default)]
    value: Option<Vec<T>>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
    #[serde(rename = "@odata.nextLink", default)]
    odata_next_link: Option<String>,
    #[serde(rename = "@odata.count", default)]
    odata_count: Option<u64>,
    #[serde(default)]
    count: Option<u64>,
}

impl<T> From<RawPage<T>> for Page<T> {
    fn from(raw: RawPage<T>) -> Self {
        let next_link = raw
            .next_link
            .filter(|l| !l.is_empty())
            .or_else(|| raw.odata_next_link.filter(|l| !l.is_empty()));
        Self {
            value: raw.value.unwrap_or_default(),
            next_link,
            count: raw.odata_count.or(raw.count),
        }
    }
}

impl<T> Page<T> {
    /// Create a page from items and an optional continuation token
    pub fn new(items: Vec<T>, next_link: Option<String>) -> Self {
        Self {
            value: items,
            next_link: next_link.filter(|l| !l.is_empty()),
            count: None,
        }
    }

    /// A final page with no continuation
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Items in server order
    pub fn items(&self) -> &[T] {
        &self.value
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<T> {
        self.value
    }

    /// Continuation token for the next page
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// Server-reported total when `$count=true` was requested
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// True when no further page follows
    pub fn is_last(&self) -> bool {
        self.next_link.is_none()
    }
}
