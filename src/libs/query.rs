//! Query parameters of the task view.
//!
//! [`QueryParams`] is the full, closed set of inputs a task fetch depends
//! on. It has two encodings:
//!
//! - **Request pairs** sent to `GET /task/get/all` (includes `limit`)
//! - **Location** string mirrored for bookmarking. Defaults are omitted and
//!   `limit` is not part of it, so `?page=2&search=milk` is a complete view.
//!
//! Decoding a location ignores unknown keys and falls back to the default
//! for any value that does not parse.

use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Page size used when nothing is configured.
pub const DEFAULT_PAGE_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum OrderBy {
    #[default]
    #[value(name = "created_at")]
    CreatedAt,
    #[value(name = "title")]
    Title,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "created_at",
            OrderBy::Title => "title",
        }
    }
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(OrderBy::CreatedAt),
            "title" => Ok(OrderBy::Title),
            other => Err(format!("unknown order_by: {}", other)),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SortBy {
    #[value(name = "asc")]
    Asc,
    #[default]
    #[value(name = "desc")]
    Desc,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Asc => "asc",
            SortBy::Desc => "desc",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortBy::Asc),
            "desc" => Ok(SortBy::Desc),
            other => Err(format!("unknown sort_by: {}", other)),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    /// `None` means no completion filter.
    pub completed: Option<bool>,
    pub order_by: OrderBy,
    pub sort_by: SortBy,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: String::new(),
            completed: None,
            order_by: OrderBy::default(),
            sort_by: SortBy::default(),
        }
    }
}

impl QueryParams {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    /// Query pairs for `GET /task/get/all`.
    pub fn to_request_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string()), ("page", self.page.to_string())];
        if let Some(completed) = self.completed {
            pairs.push(("completed", completed.to_string()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs.push(("order_by", self.order_by.as_str().to_string()));
        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs
    }

    /// Location query string without the leading `?`; empty for the default view.
    pub fn to_location(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.page != 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        if let Some(completed) = self.completed {
            serializer.append_pair("completed", if completed { "true" } else { "false" });
        }
        if self.order_by != OrderBy::default() {
            serializer.append_pair("order_by", self.order_by.as_str());
        }
        if self.sort_by != SortBy::default() {
            serializer.append_pair("sort_by", self.sort_by.as_str());
        }
        serializer.finish()
    }

    /// Reads a location query string, with or without the leading `?`.
    pub fn from_location(location: &str, limit: u32) -> Self {
        let mut params = Self::with_limit(limit);
        let query = location.trim().trim_start_matches('?');

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    if let Ok(page) = value.parse::<u32>() {
                        params.page = page.max(1);
                    }
                }
                "search" => params.search = value.into_owned(),
                "completed" => {
                    params.completed = match value.as_ref() {
                        "true" => Some(true),
                        "false" => Some(false),
                        _ => None,
                    }
                }
                "order_by" => params.order_by = value.parse().unwrap_or_default(),
                "sort_by" => params.sort_by = value.parse().unwrap_or_default(),
                _ => {}
            }
        }
        params
    }

    /// Same as [`to_location`](Self::to_location) with a `?` prefix, or `/` for the default view.
    pub fn display_location(&self) -> String {
        let query = self.to_location();
        if query.is_empty() {
            "/".to_string()
        } else {
            format!("/?{}", query)
        }
    }
}
