//! Filtered query pagination.
//!
//! Mirrors the page shape upstream API consumers already expect:
//! `{results, page, limit, total_pages, total_results}`. Sorting is by
//! the entity's timestamp; `sort_by` accepts `"created_at:asc"` /
//! `"created_at:desc"` and defaults to newest-first.

use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

/// Accept a count as either a number or a string.
///
/// `PageQuery` is usually `#[serde(flatten)]`-ed into a query struct, and
/// flattening routes every value through serde's string-typed buffer, so
/// a plain `Option<usize>` would reject `?limit=5`.
fn de_opt_usize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(usize),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) if s.is_empty() => Ok(None),
        Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// Query options for paginated lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// `"created_at:asc"` or `"created_at:desc"`; anything else falls back
    /// to the default (newest-first).
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Results per page, clamped to 1..=100. Default 10.
    #[serde(default, deserialize_with = "de_opt_usize")]
    pub limit: Option<usize>,
    /// 1-based page number. Default 1.
    #[serde(default, deserialize_with = "de_opt_usize")]
    pub page: Option<usize>,
}

impl PageQuery {
    pub fn sort_dir(&self) -> SortDir {
        match self.sort_by.as_deref() {
            Some("created_at:asc") => SortDir::Asc,
            _ => SortDir::Desc,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}

/// One page of results with totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

impl<T> Page<T> {
    /// Paginate an already-sorted full result set.
    pub fn from_sorted(all: Vec<T>, query: &PageQuery) -> Self {
        let limit = query.limit();
        let page = query.page();
        let total_results = all.len();
        let total_pages = total_results.div_ceil(limit);

        let results = all
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Self {
            results,
            page,
            limit,
            total_pages,
            total_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: usize, limit: usize) -> PageQuery {
        PageQuery {
            sort_by: None,
            limit: Some(limit),
            page: Some(page),
        }
    }

    #[test]
    fn test_pagination_totals() {
        let page = Page::from_sorted((0..25).collect::<Vec<_>>(), &query(1, 10));
        assert_eq!(page.total_results, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 10);
    }

    #[test]
    fn test_last_page_is_partial() {
        let page = Page::from_sorted((0..25).collect::<Vec<_>>(), &query(3, 10));
        assert_eq!(page.results, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = Page::from_sorted((0..5).collect::<Vec<_>>(), &query(4, 10));
        assert!(page.results.is_empty());
        assert_eq!(page.total_results, 5);
    }

    #[test]
    fn test_limit_is_clamped() {
        let q = query(1, 100000);
        assert_eq!(q.limit(), 100);

        let q = query(1, 0);
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn test_counts_parse_from_strings() {
        // The shape query strings arrive in when PageQuery is flattened.
        let q: PageQuery =
            serde_json::from_value(serde_json::json!({ "limit": "25", "page": "2" })).unwrap();
        assert_eq!(q.limit(), 25);
        assert_eq!(q.page(), 2);

        let q: PageQuery =
            serde_json::from_value(serde_json::json!({ "limit": 25, "page": 2 })).unwrap();
        assert_eq!(q.limit(), 25);
    }

    #[test]
    fn test_sort_dir_parsing() {
        let q = PageQuery {
            sort_by: Some("created_at:asc".into()),
            ..Default::default()
        };
        assert_eq!(q.sort_dir(), SortDir::Asc);

        let q = PageQuery::default();
        assert_eq!(q.sort_dir(), SortDir::Desc);

        let q = PageQuery {
            sort_by: Some("balance:desc".into()),
            ..Default::default()
        };
        assert_eq!(q.sort_dir(), SortDir::Desc);
    }
}
