//! # Parse JSON:API query parameters
//!
//! Requests for a resource carry their options in the URL query
//! string. The one this module interprets is sorting, which comes in
//! two forms:
//!
//! - untyped, `sort=a,-b`, a comma-separated list of fields in
//!   priority order, each optionally prefixed with `-` for the
//!   reverse order;
//! - typed, `sort[authors]=a,-b`, where the fields belong to the
//!   named resource. Typed sorts for several resources may be given
//!   at once.
//!
//! A query may use one form or the other, but never both. Every key
//! which is not a sort is kept, in its original order, for whatever
//! interprets filters downstream.
//!
//! Parsing needs no knowledge of any resource or model.
//!
//! Example:
//!
//! ```rust
//! use jsonapi_query::request::{QueryParser, RawQuery, SortDirective};
//!
//! let raw = RawQuery::from_query_str("sort[author]=name&sort[book]=-year,title&genre=sf");
//! let parsed = QueryParser::parse(&raw).unwrap();
//!
//! assert_eq!(
//!     parsed.sort(),
//!     &SortDirective::Typed(vec![
//!         ("author".to_string(), "name".to_string()),
//!         ("book".to_string(), "-year".to_string()),
//!         ("book".to_string(), "title".to_string()),
//!     ])
//! );
//! assert_eq!(parsed.residual().get("genre"), Some(&["sf".to_string()][..]));
//!
//! let raw = RawQuery::from_query_str("sort=name&sort[book]=title");
//! assert!(QueryParser::parse(&raw).is_err());
//! ```

use std::num::ParseIntError;

use indexmap::IndexMap;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// The parameters JSON:API gives a meaning to.
pub const RESERVED_PARAMS: [&str; 5] = ["include", "sort", "fields", "page", "ids"];

static TYPED_SORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sort\[(?P<resource>\w+)\]$").expect("typed sort pattern"));

/// Errors produced by query parsing.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Both `sort` and `sort[<resource>]` were given.
    #[error("either default or typed sort should be used")]
    ConflictingSortForm,
    /// A parameter that must be an integer was not.
    #[error("expected integer value for '{key}'")]
    BadInteger {
        key: String,
        #[source]
        source: ParseIntError,
    },
}

/// Query parameters as received, before any interpretation.
///
/// Keys keep the order in which they first appeared; the values of a
/// repeated key accumulate in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    params: IndexMap<String, Vec<String>>,
}

impl RawQuery {
    pub fn new() -> Self {
        Default::default()
    }

    /// Decode a URL query component such as `a=1&a=2&b=x%2Cy`.
    pub fn from_query_str(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes()).collect()
    }

    /// Decode the query component of `url`.
    pub fn from_url(url: &Url) -> Self {
        url.query_pairs().collect()
    }

    /// Append `value` to the values of `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// The last value given for `key`.
    pub fn get_last(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.last()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn insert(&mut self, key: &str, values: &[String]) {
        self.params.insert(key.to_string(), values.to_vec());
    }
}

impl<K, V> FromIterator<(K, V)> for RawQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut res = RawQuery::new();
        for (key, value) in iter {
            res.push(key, value);
        }
        res
    }
}

/// A field in a sort, split from its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField<'a> {
    pub name: &'a str,
    pub reverse: bool,
}

impl<'a> SortField<'a> {
    /// Interpret a sort token, where a leading `-` reverses the order.
    pub fn parse(token: &'a str) -> Self {
        match token.strip_prefix('-') {
            Some(name) => Self {
                name,
                reverse: true,
            },
            None => Self {
                name: token,
                reverse: false,
            },
        }
    }
}

/// The sort requested by a query.
///
/// Tokens are kept exactly as they were written, including any `-`
/// prefix; use [`SortField::parse`] to split them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortDirective {
    /// `sort=a,b`: fields of the requested resource.
    Untyped(Vec<String>),
    /// `sort[r]=a,b`: `(resource, field)` pairs across every typed key,
    /// in order. A resource may appear more than once.
    Typed(Vec<(String, String)>),
}

impl Default for SortDirective {
    fn default() -> Self {
        SortDirective::Untyped(Vec::new())
    }
}

impl SortDirective {
    pub fn is_empty(&self) -> bool {
        match self {
            SortDirective::Untyped(v) => v.is_empty(),
            SortDirective::Typed(v) => v.is_empty(),
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, SortDirective::Typed(_))
    }

    /// The fields which apply to `resource`, in priority order.
    ///
    /// Untyped sorts apply to whichever resource was requested, so all
    /// of their fields are returned.
    pub fn fields_for<'a>(&'a self, resource: &'a str) -> Vec<SortField<'a>> {
        match self {
            SortDirective::Untyped(v) => v.iter().map(|t| SortField::parse(t)).collect(),
            SortDirective::Typed(v) => v
                .iter()
                .filter(|(r, _)| r == resource)
                .map(|(_, t)| SortField::parse(t))
                .collect(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            SortDirective::Untyped(v) => {
                Value::Array(v.iter().map(|t| Value::String(t.clone())).collect())
            }
            SortDirective::Typed(v) => Value::Array(
                v.iter()
                    .map(|(r, t)| {
                        Value::Array(vec![Value::String(r.clone()), Value::String(t.clone())])
                    })
                    .collect(),
            ),
        }
    }
}

/// The structured form of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    sort: SortDirective,
    residual: RawQuery,
}

impl ParsedQuery {
    pub fn sort(&self) -> &SortDirective {
        &self.sort
    }

    /// Every parameter that was not a sort, in its original order.
    pub fn residual(&self) -> &RawQuery {
        &self.residual
    }

    /// The residual parameters JSON:API does not reserve, which are
    /// left to be interpreted as filters.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.residual
            .iter()
            .filter(|(k, _)| !RESERVED_PARAMS.contains(k))
    }

    /// Relations requested with `include=a,b`.
    pub fn include(&self) -> Vec<&str> {
        split_values(self.residual.get("include"))
    }

    /// The sparse fieldset requested with `fields=a,b`.
    pub fn fields(&self) -> Vec<&str> {
        split_values(self.residual.get("fields"))
    }

    /// The identities requested with `ids=1,2`.
    pub fn ids(&self) -> Vec<&str> {
        split_values(self.residual.get("ids"))
    }

    /// The page requested with `page=n`; the last value wins.
    pub fn page(&self) -> Result<Option<usize>, QueryError> {
        self.residual
            .get_last("page")
            .map(|p| {
                p.parse().map_err(|source| QueryError::BadInteger {
                    key: "page".to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Render as a JSON object with `sort` and `residual` members.
    pub fn to_json(&self) -> Value {
        let mut residual = serde_json::map::Map::new();
        for (key, values) in self.residual.iter() {
            residual.insert(
                key.to_string(),
                Value::Array(values.iter().map(|v| Value::String(v.clone())).collect()),
            );
        }
        let mut map = serde_json::map::Map::new();
        map.insert("sort".to_string(), self.sort.to_json());
        map.insert("residual".to_string(), Value::Object(residual));
        Value::Object(map)
    }
}

fn split_values(values: Option<&[String]>) -> Vec<&str> {
    values
        .unwrap_or_default()
        .iter()
        .flat_map(|v| v.split(','))
        .collect()
}

/// Turn a [`RawQuery`] into a [`ParsedQuery`].
pub struct QueryParser;

impl QueryParser {
    /// Parse `raw`, separating sorts from everything else.
    ///
    /// Fails with [`QueryError::ConflictingSortForm`] when both untyped
    /// and typed sorts are present. Keys which look like typed sorts
    /// but are malformed, such as `sort[]` or `sort[a][b]`, are not
    /// sorts and pass through to the residual.
    pub fn parse(raw: &RawQuery) -> Result<ParsedQuery, QueryError> {
        let mut untyped = Vec::new();
        let mut typed = Vec::new();
        let mut residual = RawQuery::new();

        for (key, values) in raw.iter() {
            if key == "sort" {
                trace!("Untyped sort: {:?}", values);
                untyped.extend(split_values(Some(values)).into_iter().map(str::to_string));
            } else if let Some(captures) = TYPED_SORT.captures(key) {
                let resource = &captures["resource"];
                trace!("Typed sort for '{}': {:?}", resource, values);
                typed.extend(
                    split_values(Some(values))
                        .into_iter()
                        .map(|t| (resource.to_string(), t.to_string())),
                );
            } else {
                residual.insert(key, values);
            }
        }

        if !typed.is_empty() && !untyped.is_empty() {
            debug!("Rejecting query with both sort forms: {:?}", raw);
            return Err(QueryError::ConflictingSortForm);
        }

        let sort = if typed.is_empty() {
            SortDirective::Untyped(untyped)
        } else {
            SortDirective::Typed(typed)
        };

        Ok(ParsedQuery { sort, residual })
    }

    /// Decode and parse a URL query component.
    pub fn parse_str(query: &str) -> Result<ParsedQuery, QueryError> {
        Self::parse(&RawQuery::from_query_str(query))
    }
}
