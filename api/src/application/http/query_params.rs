use std::collections::HashMap;

use vellum_core::domain::document::value_objects::{FilterCondition, FilterOperator};

/// Parsed filter parameters
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub conditions: Vec<FilterCondition>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Parsed sort parameters: tokens in query order, `-` prefix preserved
#[derive(Debug, Clone, Default)]
pub struct SortParams {
    pub tokens: Vec<String>,
}

impl SortParams {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Parse a sort string like "field1,-field2,field3"
    pub fn from_string(s: &str) -> Self {
        let mut tokens = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            tokens.push(part.to_string());
        }
        Self { tokens }
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct PaginationParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// Combined query parameters (filter, sort, pagination, locale)
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub filter: FilterParams,
    pub sort: SortParams,
    pub pagination: PaginationParams,
    pub locale: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from query string map
    /// Handles formats like:
    /// - filter[field]=value (defaults to eq)
    /// - filter[field][operator]=value
    /// - sort=field or sort=-field
    /// - locale=de
    /// - offset=0, limit=20
    pub fn from_query_map(query_map: &HashMap<String, String>) -> Self {
        let mut filter = FilterParams::new();
        let mut sort = SortParams::new();
        let mut pagination = PaginationParams::default();
        let mut locale: Option<String> = None;

        for (key, value) in query_map {
            // Parse filter parameters
            if let Some(filter_key) = key.strip_prefix("filter[") {
                if let Some(end_bracket) = filter_key.find(']') {
                    let field = filter_key[..end_bracket].to_string();
                    let remaining = &filter_key[end_bracket + 1..];

                    if remaining.is_empty() {
                        // filter[field]=value (default to eq)
                        filter.conditions.push(FilterCondition {
                            field,
                            operator: FilterOperator::Eq,
                            value: value.clone(),
                        });
                    } else if remaining.starts_with('[') && remaining.ends_with(']') {
                        // filter[field][operator]=value
                        let operator_str = &remaining[1..remaining.len() - 1];
                        if let Ok(operator) = operator_str.parse::<FilterOperator>() {
                            filter.conditions.push(FilterCondition {
                                field,
                                operator,
                                value: value.clone(),
                            });
                        }
                    }
                }
            }
            // Parse sort parameter
            else if key == "sort" {
                sort = SortParams::from_string(value);
            }
            // Locale selection
            else if key == "locale" {
                locale = Some(value.clone());
            }
            // Parse pagination parameters
            else if key == "offset" {
                if let Ok(val) = value.parse::<u64>() {
                    pagination.offset = Some(val);
                }
            } else if key == "limit"
                && let Ok(val) = value.parse::<u64>()
            {
                pagination.limit = Some(val);
            }
        }

        Self {
            filter,
            sort,
            pagination,
            locale,
        }
    }
}

/// Helper trait for deserializing query parameters with filter/sort support
pub trait QueryParamsExt {
    fn parse_query_params(&self) -> QueryParams;
}

impl QueryParamsExt for HashMap<String, String> {
    fn parse_query_params(&self) -> QueryParams {
        QueryParams::from_query_map(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse_simple() {
        let mut map = HashMap::new();
        map.insert("filter[status]".to_string(), "published".to_string());
        let params = QueryParams::from_query_map(&map);
        assert_eq!(params.filter.conditions.len(), 1);
        assert_eq!(params.filter.conditions[0].field, "status");
        assert_eq!(params.filter.conditions[0].operator, FilterOperator::Eq);
        assert_eq!(params.filter.conditions[0].value, "published");
    }

    #[test]
    fn test_filter_parse_with_operator() {
        let mut map = HashMap::new();
        map.insert("filter[rating][gte]".to_string(), "4".to_string());
        let params = QueryParams::from_query_map(&map);
        assert_eq!(params.filter.conditions.len(), 1);
        assert_eq!(params.filter.conditions[0].field, "rating");
        assert_eq!(params.filter.conditions[0].operator, FilterOperator::Gte);
        assert_eq!(params.filter.conditions[0].value, "4");
    }

    #[test]
    fn test_filter_parse_unknown_operator_is_skipped() {
        let mut map = HashMap::new();
        map.insert("filter[rating][similarish]".to_string(), "4".to_string());
        let params = QueryParams::from_query_map(&map);
        assert!(params.filter.is_empty());
    }

    #[test]
    fn test_sort_parse() {
        let mut map = HashMap::new();
        map.insert("sort".to_string(), "-rating,created_at".to_string());
        let params = QueryParams::from_query_map(&map);
        assert_eq!(
            params.sort.tokens,
            vec!["-rating".to_string(), "created_at".to_string()]
        );
    }

    #[test]
    fn test_locale_parse() {
        let mut map = HashMap::new();
        map.insert("locale".to_string(), "de".to_string());
        let params = QueryParams::from_query_map(&map);
        assert_eq!(params.locale.as_deref(), Some("de"));
    }

    #[test]
    fn test_pagination_parse() {
        let mut map = HashMap::new();
        map.insert("offset".to_string(), "10".to_string());
        map.insert("limit".to_string(), "50".to_string());
        let params = QueryParams::from_query_map(&map);
        assert_eq!(params.pagination.offset, Some(10));
        assert_eq!(params.pagination.limit, Some(50));
    }
}
