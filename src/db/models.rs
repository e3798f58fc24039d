//! Domain models for the catalog database.
//!
//! These models are storage-agnostic and represent the product entity and
//! the query descriptor used to read it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::{DbError, DbResult};

// =============================================================================
// Query Types for Filtering, Sorting and Pagination
// =============================================================================

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Numeric comparison operators accepted in numeric filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
}

impl Comparison {
    /// Two-character tokens come first so `>=` is never read as `>`.
    pub const TOKENS: [(&'static str, Comparison); 5] = [
        (">=", Comparison::Gte),
        ("<=", Comparison::Lte),
        (">", Comparison::Gt),
        ("<", Comparison::Lt),
        ("=", Comparison::Eq),
    ];

    /// SQL operator for this comparison.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
            Comparison::Eq => "=",
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Comparison::Gt => "gt",
            Comparison::Lt => "lt",
            Comparison::Gte => "gte",
            Comparison::Lte => "lte",
            Comparison::Eq => "eq",
        };
        write!(f, "{}", s)
    }
}

/// A single comparison against a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericPredicate {
    pub op: Comparison,
    pub value: f64,
}

/// Filter part of a product query. `None` means the field is not filtered.
///
/// Only `price` and `rating` carry numeric predicates; the other fields can
/// only be matched the way the listing endpoint allows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Exact match on the featured flag.
    pub featured: Option<bool>,
    /// Exact match on the company name (not validated against [`Company`]).
    pub company: Option<String>,
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    pub price: Option<NumericPredicate>,
    pub rating: Option<NumericPredicate>,
}

/// Product fields addressable by sort keys and projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductField {
    Id,
    Name,
    Price,
    Featured,
    Rating,
    CreatedAt,
    Company,
}

impl ProductField {
    /// Document order used when serializing products.
    pub const ALL: [ProductField; 7] = [
        ProductField::Id,
        ProductField::Name,
        ProductField::Price,
        ProductField::Featured,
        ProductField::Rating,
        ProductField::CreatedAt,
        ProductField::Company,
    ];

    /// Key of the field in a product document.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductField::Id => "_id",
            ProductField::Name => "name",
            ProductField::Price => "price",
            ProductField::Featured => "featured",
            ProductField::Rating => "rating",
            ProductField::CreatedAt => "createdAt",
            ProductField::Company => "company",
        }
    }

    /// Storage column backing the field.
    pub fn column(&self) -> &'static str {
        match self {
            ProductField::Id => "id",
            ProductField::Name => "name",
            ProductField::Price => "price",
            ProductField::Featured => "featured",
            ProductField::Rating => "rating",
            ProductField::CreatedAt => "created_at",
            ProductField::Company => "company",
        }
    }
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProductField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown product field: {}", s))
    }
}

/// One sort key of a product query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: ProductField,
    pub order: SortOrder,
}

impl SortKey {
    pub fn asc(field: ProductField) -> Self {
        Self {
            field,
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: ProductField) -> Self {
        Self {
            field,
            order: SortOrder::Desc,
        }
    }
}

/// Field selection applied to returned documents.
///
/// An empty include list keeps every field. The identifier is kept unless
/// `exclude_id` is set, whether or not other fields are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub include: Vec<ProductField>,
    pub exclude_id: bool,
}

impl Projection {
    /// Keep only the given fields (plus the identifier).
    pub fn only(fields: &[ProductField]) -> Self {
        Self::default().include(fields)
    }

    /// Add fields to the include list, skipping duplicates.
    pub fn include(mut self, fields: &[ProductField]) -> Self {
        for field in fields {
            if *field != ProductField::Id && !self.include.contains(field) {
                self.include.push(*field);
            }
        }
        self
    }

    /// Drop the identifier from returned documents.
    pub fn without_id(mut self) -> Self {
        self.exclude_id = true;
        self
    }

    /// Whether `field` survives this projection.
    pub fn keeps(&self, field: ProductField) -> bool {
        match field {
            ProductField::Id => !self.exclude_id,
            _ => self.include.is_empty() || self.include.contains(&field),
        }
    }
}

/// Page-based pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u64,
    /// Maximum number of items per page.
    pub limit: u64,
}

impl Pagination {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;

    /// Number of items to skip before this page.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Query descriptor for reading products: filter, sort, projection and page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: Vec<SortKey>,
    pub projection: Projection,
    /// `None` returns every matching product.
    pub pagination: Option<Pagination>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            filter: ProductFilter::default(),
            sort: vec![SortKey::asc(ProductField::CreatedAt)],
            projection: Projection::default(),
            pagination: Some(Pagination::default()),
        }
    }
}

impl ProductQuery {
    /// Fixed query behind the static testing route: products priced above 30,
    /// cheapest first, reduced to name and price.
    pub fn static_listing() -> Self {
        Self {
            filter: ProductFilter {
                price: Some(NumericPredicate {
                    op: Comparison::Gt,
                    value: 30.0,
                }),
                ..Default::default()
            },
            sort: vec![SortKey::asc(ProductField::Price)],
            projection: Projection::only(&[ProductField::Name, ProductField::Price]),
            pagination: None,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A projected product as returned to API clients.
pub type ProductDocument = Map<String, Value>;

/// Store-assigned product identifier.
pub type Id = i64;

/// Rating given to products that do not specify one.
pub const DEFAULT_RATING: f64 = 3.0;

/// Companies a product may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Company {
    Ikea,
    Liddy,
    Caressa,
    Marcos,
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Company::Ikea => "ikea",
            Company::Liddy => "liddy",
            Company::Caressa => "caressa",
            Company::Marcos => "marcos",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Company {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ikea" => Ok(Company::Ikea),
            "liddy" => Ok(Company::Liddy),
            "caressa" => Ok(Company::Caressa),
            "marcos" => Ok(Company::Marcos),
            _ => Err(format!("{} is not supported", s)),
        }
    }
}

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Whole numbers are written as JSON integers (`35`, not `35.0`).
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: String,
    pub price: f64,
    pub featured: bool,
    pub rating: f64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub company: Option<Company>,
}

impl Product {
    /// Render the product as a document containing only the projected fields.
    ///
    /// Fields without a value (a product with no company) are left out.
    pub fn project(&self, projection: &Projection) -> ProductDocument {
        let mut doc = Map::new();
        for field in ProductField::ALL {
            if !projection.keeps(field) {
                continue;
            }
            let value = match field {
                ProductField::Id => Value::from(self.id),
                ProductField::Name => Value::from(self.name.clone()),
                ProductField::Price => number(self.price),
                ProductField::Featured => Value::from(self.featured),
                ProductField::Rating => number(self.rating),
                ProductField::CreatedAt => Value::from(self.created_at.clone()),
                ProductField::Company => match self.company {
                    Some(company) => Value::from(company.to_string()),
                    None => continue,
                },
            };
            doc.insert(field.as_str().to_string(), value);
        }
        doc
    }
}

/// A product record to be written by the seeding tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl NewProduct {
    /// Check the record against the product schema.
    pub fn validate(&self) -> DbResult<()> {
        if self.name.trim().is_empty() {
            return Err(DbError::Validation {
                message: "product name must be provided".to_string(),
            });
        }
        if !self.price.is_finite() {
            return Err(DbError::Validation {
                message: format!("product '{}' has an invalid price", self.name),
            });
        }
        if let Some(rating) = self.rating
            && !(1.0..=5.0).contains(&rating)
        {
            return Err(DbError::Validation {
                message: format!(
                    "product '{}' has rating {}, expected a value between 1 and 5",
                    self.name, rating
                ),
            });
        }
        if let Some(company) = &self.company {
            company
                .parse::<Company>()
                .map_err(|message| DbError::Validation { message })?;
        }
        if let Some(created_at) = &self.created_at {
            chrono::DateTime::parse_from_rfc3339(created_at).map_err(|_| {
                DbError::InvalidData {
                    message: format!("createdAt '{}' is not a timestamp", created_at),
                    help: "Use an RFC 3339 timestamp such as 2024-05-01T10:00:00Z".to_string(),
                }
            })?;
        }
        Ok(())
    }
}
