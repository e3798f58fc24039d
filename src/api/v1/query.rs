//! Translation of product listing query strings into a [`ProductQuery`].
//!
//! Translation never fails: malformed or unknown parameters are dropped and
//! the affected part of the query falls back to its default.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::{
    Comparison, NumericPredicate, Pagination, ProductField, ProductFilter, ProductQuery,
    Projection, SortKey, SortOrder,
};

/// Fields the listing endpoint always returns.
pub const LISTING_FIELDS: [ProductField; 3] =
    [ProductField::Name, ProductField::Price, ProductField::Rating];

/// Raw query parameters of `GET /api/v1/products`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Only featured (`true`) or non-featured (anything else) products
    #[param(example = "true")]
    pub featured: Option<String>,
    /// Exact company name
    #[param(example = "ikea")]
    pub company: Option<String>,
    /// Case-insensitive substring of the product name
    #[param(example = "chair")]
    pub name: Option<String>,
    /// Comma-separated sort fields, `-` prefix for descending
    #[param(example = "-price,name")]
    pub sort: Option<String>,
    /// Comma-separated fields to include
    #[param(example = "company,featured")]
    pub fields: Option<String>,
    /// Comma-separated comparisons on price or rating
    #[param(example = "price>30,rating>=4")]
    pub numeric_filters: Option<String>,
    /// 1-based page number
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size
    #[param(example = "10")]
    pub limit: Option<String>,
}

/// Numeric fields accepted by `numericFilters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericField {
    Price,
    Rating,
}

/// Treat empty parameters as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parse one `<field><op><value>` clause.
fn parse_numeric_clause(clause: &str) -> Option<(NumericField, NumericPredicate)> {
    let start = clause.find(['<', '>', '='])?;
    let (field, rest) = clause.split_at(start);

    let field = match field {
        "price" => NumericField::Price,
        "rating" => NumericField::Rating,
        _ => return None,
    };

    let (op, value) = Comparison::TOKENS
        .iter()
        .find_map(|(token, op)| rest.strip_prefix(token).map(|value| (*op, value)))?;

    let value: f64 = value.parse().ok().filter(|v: &f64| v.is_finite())?;

    Some((field, NumericPredicate { op, value }))
}

/// Apply a `numericFilters` string to `filter`.
///
/// A later clause on the same field replaces an earlier one.
pub fn apply_numeric_filters(raw: &str, filter: &mut ProductFilter) {
    for (field, predicate) in raw.split(',').filter_map(parse_numeric_clause) {
        match field {
            NumericField::Price => filter.price = Some(predicate),
            NumericField::Rating => filter.rating = Some(predicate),
        }
    }
}

/// Parse a comma-separated sort list such as `-price,name`.
pub fn parse_sort(raw: &str) -> Vec<SortKey> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            let (name, order) = match s.strip_prefix('-') {
                Some(name) => (name, SortOrder::Desc),
                None => (s, SortOrder::Asc),
            };
            let field = name.parse::<ProductField>().ok()?;
            Some(SortKey { field, order })
        })
        .collect()
}

/// Parse a comma-separated include list, dropping unknown and excluded names.
pub fn parse_fields(raw: &str) -> Vec<ProductField> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('-'))
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Parse a positive integer the lenient way: leading digits count, trailing
/// garbage is ignored, zero and negatives are rejected.
pub fn parse_positive_int(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('-') {
        return None;
    }
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }

    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    (value > 0).then_some(value)
}

impl ListProductsQuery {
    /// Collect parameters from raw query-string pairs.
    ///
    /// A repeated key keeps its first value. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "featured" => &mut query.featured,
                "company" => &mut query.company,
                "name" => &mut query.name,
                "sort" => &mut query.sort,
                "fields" => &mut query.fields,
                "numericFilters" => &mut query.numeric_filters,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// Build the product query for the listing endpoint.
    ///
    /// `max_limit` caps the page size when set. The projection always
    /// contains [`LISTING_FIELDS`] and never the identifier, on top of any
    /// fields the caller asked for.
    pub fn to_product_query(&self, max_limit: Option<u64>) -> ProductQuery {
        let mut filter = ProductFilter::default();

        if let Some(featured) = present(&self.featured) {
            filter.featured = Some(featured == "true");
        }

        if let Some(company) = present(&self.company) {
            filter.company = Some(company.to_string());
        }

        if let Some(name) = present(&self.name) {
            filter.name = Some(name.to_string());
        }

        if let Some(numeric_filters) = present(&self.numeric_filters) {
            apply_numeric_filters(numeric_filters, &mut filter);
        }

        let sort = present(&self.sort)
            .map(parse_sort)
            .unwrap_or_else(|| vec![SortKey::asc(ProductField::CreatedAt)]);

        let requested = present(&self.fields).map(parse_fields).unwrap_or_default();
        let projection = Projection::only(&requested)
            .include(&LISTING_FIELDS)
            .without_id();

        let page = self
            .page
            .as_deref()
            .and_then(parse_positive_int)
            .unwrap_or(Pagination::DEFAULT_PAGE);
        let mut limit = self
            .limit
            .as_deref()
            .and_then(parse_positive_int)
            .unwrap_or(Pagination::DEFAULT_LIMIT);
        if let Some(max) = max_limit {
            limit = limit.min(max);
        }

        ProductQuery {
            filter,
            sort,
            projection,
            pagination: Some(Pagination { page, limit }),
        }
    }
}
