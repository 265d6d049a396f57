//! Paging parameters for list routes.
//!
//! List routes carry `page` and `sort` query parameters (`?page=2&sort=name,desc`). They are
//! resolved into [`PagingParams`] when the route activates and turned back into request
//! options when the list loads. The API reports the other pages through a `Link` header.

use std::collections::{BTreeMap, BTreeSet};

use reqwest::Url;
use serde::Serialize;

use crate::client::service::RequestOptions;

const DEFAULT_PAGE: &str = "1";
const DEFAULT_SORT: &str = "id,asc";

/// Resolved paging state of a list: 1-based page, sort predicate and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingParams {
    pub page: usize,
    pub predicate: String,
    pub ascending: bool,
    pub items_per_page: usize,
}

impl PagingParams {
    /// First page sorted by id ascending.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            page: 1,
            predicate: "id".to_string(),
            ascending: true,
            items_per_page,
        }
    }

    /// Resolves paging from route query parameters, defaulting to page `1` and `id,asc`.
    pub fn resolve(query: &BTreeMap<String, String>, items_per_page: usize) -> Self {
        let page = query.get("page").map_or(DEFAULT_PAGE, String::as_str);
        let sort = query.get("sort").map_or(DEFAULT_SORT, String::as_str);

        Self {
            page: parse_page(page),
            predicate: parse_predicate(sort),
            ascending: parse_ascending(sort),
            items_per_page,
        }
    }

    /// Sort values sent to the API: the predicate with its direction, then `id` as a tie
    /// breaker unless the predicate already is `id`.
    pub fn sort(&self) -> Vec<String> {
        let direction = if self.ascending { "asc" } else { "desc" };
        let mut sort = vec![format!("{},{}", self.predicate, direction)];
        if self.predicate != "id" {
            sort.push("id".to_string());
        }
        sort
    }

    /// Request options for the current page. The API counts pages from zero.
    pub fn to_request_options(&self) -> RequestOptions {
        RequestOptions::new()
            .page(self.page.saturating_sub(1))
            .size(self.items_per_page)
            .sort(self.sort())
    }

    /// Query string to put back into the list route, e.g. `page=2&sort=name,desc`.
    pub fn to_query(&self) -> String {
        let direction = if self.ascending { "asc" } else { "desc" };
        format!("page={}&sort={},{}", self.page, self.predicate, direction)
    }
}

/// Parses a 1-based page number, falling back to the first page.
pub fn parse_page(page: &str) -> usize {
    match page.trim().parse::<usize>() {
        Ok(page) if page > 0 => page,
        _ => 1,
    }
}

/// The field part of a `field,direction` sort value.
pub fn parse_predicate(sort: &str) -> String {
    sort.split(',').next().unwrap_or_default().trim().to_string()
}

/// Whether a `field,direction` sort value is ascending. A bare field sorts ascending.
pub fn parse_ascending(sort: &str) -> bool {
    let mut parts = sort.split(',');
    parts.next();
    match parts.last() {
        Some(direction) => !direction.trim().eq_ignore_ascii_case("desc"),
        None => true,
    }
}

/// Parses a `Link` header into the page number of each relation.
///
/// ```text
/// </api/codes?page=1&size=20>; rel="next",</api/codes?page=0&size=20>; rel="first"
/// ```
pub fn parse_links(header: &str) -> BTreeMap<String, usize> {
    let mut links = BTreeMap::new();

    for part in header.split(',') {
        let mut sections = part.split(';');
        let (Some(url), Some(rel)) = (sections.next(), sections.next()) else {
            continue;
        };

        let url = url.trim().trim_start_matches('<').trim_end_matches('>');
        let rel = rel
            .trim()
            .trim_start_matches("rel=")
            .trim_matches('"')
            .to_string();

        // Relative links are resolved against a dummy origin only to read their query.
        let Ok(url) = Url::parse("http://localhost/").and_then(|base| base.join(url)) else {
            continue;
        };

        let page = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<usize>().ok());

        if let Some(page) = page {
            links.insert(rel, page);
        }
    }

    links
}

/// Page numbers to render for a pager, `None` marking a gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<Option<usize>>,
    pub page: usize,
}

impl PageWindow {
    /// Window around `current_page`, clamped to `1..=total_pages`.
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        let page = current_page.clamp(1, total_pages.max(1));

        Self {
            pages: window(page, total_pages),
            page,
        }
    }

    /// Window for `total_items` records shown `items_per_page` at a time.
    pub fn for_items(current_page: usize, total_items: u64, items_per_page: usize) -> Self {
        let per_page = items_per_page.max(1) as u64;
        let total_pages = usize::try_from(total_items.div_ceil(per_page)).unwrap_or(usize::MAX);
        Self::new(current_page, total_pages)
    }
}

const EDGE_PAGES: usize = 2;
const PAGES_BEFORE: usize = 2;
const PAGES_AFTER: usize = 4;

/// First and last pages, plus the pages around `page`, with a gap wherever numbers are skipped.
fn window(page: usize, last_page: usize) -> Vec<Option<usize>> {
    if last_page == 0 {
        return vec![];
    }

    let mut shown = BTreeSet::new();
    shown.extend(1..=EDGE_PAGES.min(last_page));
    let around_start = page.saturating_sub(PAGES_BEFORE).max(1);
    let around_end = page.saturating_add(PAGES_AFTER).min(last_page);
    shown.extend(around_start..=around_end);
    shown.extend(last_page.saturating_sub(EDGE_PAGES).saturating_add(1)..=last_page);

    let mut pages = Vec::with_capacity(shown.len() + 2);
    let mut previous = 0;
    for number in shown {
        if number > previous + 1 {
            pages.push(None);
        }
        pages.push(Some(number));
        previous = number;
    }

    pages
}
