//! Bridges parsed query parameters to the core list-input value objects.
//!
//! Sort tokens pass through with their `-` prefixes intact; direction
//! parsing and path resolution happen in the repository layer.

use vellum_core::domain::document::value_objects::{ListDocumentsInput, Sort};

use super::query_params::QueryParams;

/// Convert sort tokens to the core sort specification
pub fn sort_spec(params: &QueryParams) -> Option<Sort> {
    match params.sort.tokens.len() {
        0 => None,
        1 => params.sort.tokens.first().cloned().map(Sort::One),
        _ => Some(Sort::Many(params.sort.tokens.clone())),
    }
}

/// Assemble the list input for a collection from parsed query parameters
pub fn list_documents_input(collection: String, params: &QueryParams) -> ListDocumentsInput {
    ListDocumentsInput {
        collection,
        sort: sort_spec(params),
        filter: params.filter.conditions.clone(),
        locale: params.locale.clone(),
        offset: params.pagination.offset,
        limit: params.pagination.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::http::query_params::SortParams;

    #[test]
    fn single_token_maps_to_sort_one() {
        let params = QueryParams {
            sort: SortParams::from_string("-created_at"),
            ..Default::default()
        };
        assert_eq!(
            sort_spec(&params),
            Some(Sort::One("-created_at".to_string()))
        );
    }

    #[test]
    fn many_tokens_map_to_sort_many() {
        let params = QueryParams {
            sort: SortParams::from_string("title,-created_at"),
            ..Default::default()
        };
        assert_eq!(
            sort_spec(&params),
            Some(Sort::Many(vec![
                "title".to_string(),
                "-created_at".to_string()
            ]))
        );
    }

    #[test]
    fn no_tokens_map_to_none() {
        let params = QueryParams::default();
        assert_eq!(sort_spec(&params), None);
    }
}
