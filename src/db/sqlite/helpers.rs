//! Shared helper functions for building SQLite product queries.

use crate::db::{NumericPredicate, Pagination, ProductField, ProductFilter, SortKey, SortOrder};

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Real(f64),
    Bool(bool),
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_numeric(
    conditions: &mut Vec<String>,
    binds: &mut Vec<BindValue>,
    field: ProductField,
    predicate: &NumericPredicate,
) {
    conditions.push(format!(
        "{} {} ?",
        field.column(),
        predicate.op.sql_operator()
    ));
    binds.push(BindValue::Real(predicate.value));
}

/// Build a WHERE clause and its bind values from a product filter.
/// Returns an empty clause when nothing is filtered.
pub fn build_where_clause(filter: &ProductFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = vec![];
    let mut binds: Vec<BindValue> = vec![];

    if let Some(featured) = filter.featured {
        conditions.push("featured = ?".to_string());
        binds.push(BindValue::Bool(featured));
    }

    if let Some(company) = &filter.company {
        conditions.push("company = ?".to_string());
        binds.push(BindValue::Text(company.clone()));
    }

    // SQLite LIKE only folds ASCII, so match against the stored lowercase copy
    if let Some(name) = &filter.name {
        conditions.push("name_folded LIKE ? ESCAPE '\\'".to_string());
        binds.push(BindValue::Text(format!(
            "%{}%",
            escape_like(&name.to_lowercase())
        )));
    }

    if let Some(price) = &filter.price {
        push_numeric(&mut conditions, &mut binds, ProductField::Price, price);
    }

    if let Some(rating) = &filter.rating {
        push_numeric(&mut conditions, &mut binds, ProductField::Rating, rating);
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (clause, binds)
}

/// Build ORDER BY clause from sort keys.
///
/// Repeated fields keep their first direction. Insertion order (`id`) breaks
/// ties so paging is stable.
pub fn build_order_clause(sort: &[SortKey]) -> String {
    let mut seen: Vec<ProductField> = vec![];
    let mut terms: Vec<String> = vec![];

    for key in sort {
        if seen.contains(&key.field) {
            continue;
        }
        seen.push(key.field);
        let order = match key.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        terms.push(format!("{} {}", key.field.column(), order));
    }

    if !seen.contains(&ProductField::Id) {
        terms.push("id ASC".to_string());
    }

    format!("ORDER BY {}", terms.join(", "))
}

/// Build LIMIT/OFFSET clause from pagination.
/// Values beyond SQLite's integer range are clamped.
pub fn build_limit_offset_clause(pagination: Option<&Pagination>) -> String {
    let Some(page) = pagination else {
        return String::new();
    };

    let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
    let mut clause = format!(" LIMIT {}", limit);

    let skip = page.skip();
    if skip > 0 {
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);
        clause.push_str(&format!(" OFFSET {}", offset));
    }

    clause
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Comparison;

    #[test]
    fn test_build_where_clause_empty() {
        let (clause, binds) = build_where_clause(&ProductFilter::default());
        assert_eq!(clause, "");
        assert!(binds.is_empty());
    }

    #[test]
    fn test_build_where_clause_all_fields() {
        let filter = ProductFilter {
            featured: Some(true),
            company: Some("ikea".to_string()),
            name: Some("chair".to_string()),
            price: Some(NumericPredicate {
                op: Comparison::Gt,
                value: 30.0,
            }),
            rating: Some(NumericPredicate {
                op: Comparison::Gte,
                value: 4.0,
            }),
        };
        let (clause, binds) = build_where_clause(&filter);
        assert_eq!(
            clause,
            "WHERE featured = ? AND company = ? AND name_folded LIKE ? ESCAPE '\\' AND price > ? AND rating >= ?"
        );
        assert_eq!(
            binds,
            vec![
                BindValue::Bool(true),
                BindValue::Text("ikea".to_string()),
                BindValue::Text("%chair%".to_string()),
                BindValue::Real(30.0),
                BindValue::Real(4.0),
            ]
        );
    }

    #[test]
    fn test_build_where_clause_folds_unicode_name() {
        let filter = ProductFilter {
            name: Some("ÄGG 50%".to_string()),
            ..Default::default()
        };
        let (_, binds) = build_where_clause(&filter);
        assert_eq!(binds, vec![BindValue::Text("%ägg 50\\%%".to_string())]);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("sofa"), "sofa");
    }

    #[test]
    fn test_build_order_clause_default_tiebreak() {
        assert_eq!(
            build_order_clause(&[SortKey::asc(ProductField::CreatedAt)]),
            "ORDER BY created_at ASC, id ASC"
        );
    }

    #[test]
    fn test_build_order_clause_multiple_keys() {
        let sort = [
            SortKey::desc(ProductField::Price),
            SortKey::asc(ProductField::Name),
            SortKey::asc(ProductField::Price),
        ];
        assert_eq!(
            build_order_clause(&sort),
            "ORDER BY price DESC, name ASC, id ASC"
        );
    }

    #[test]
    fn test_build_order_clause_explicit_id() {
        assert_eq!(
            build_order_clause(&[SortKey::desc(ProductField::Id)]),
            "ORDER BY id DESC"
        );
        assert_eq!(build_order_clause(&[]), "ORDER BY id ASC");
    }

    #[test]
    fn test_build_limit_offset_clause() {
        assert_eq!(build_limit_offset_clause(None), "");
        assert_eq!(
            build_limit_offset_clause(Some(&Pagination::default())),
            " LIMIT 10"
        );
        assert_eq!(
            build_limit_offset_clause(Some(&Pagination { page: 3, limit: 7 })),
            " LIMIT 7 OFFSET 14"
        );
    }

    #[test]
    fn test_build_limit_offset_clause_clamps() {
        let page = Pagination {
            page: 2,
            limit: u64::MAX,
        };
        assert_eq!(
            build_limit_offset_clause(Some(&page)),
            format!(" LIMIT {} OFFSET {}", i64::MAX, i64::MAX)
        );
    }
}
