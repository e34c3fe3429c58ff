use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

/// A sort specification: one token or an ordered list of tokens. Each token
/// is a field path, `-`-prefixed for descending order. Path segments are
/// separated by `.` or the equivalent `__` encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Sort {
    One(String),
    Many(Vec<String>),
}

impl Sort {
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            Sort::One(token) => vec![token],
            Sort::Many(tokens) => tokens,
        }
    }

    /// Parse the comma-joined query form, e.g. `title,-created_at`.
    /// Empty segments are skipped; an all-empty string yields `None`.
    pub fn from_query_str(value: &str) -> Option<Self> {
        let mut tokens: Vec<String> = Vec::new();
        for part in value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            tokens.push(part.to_string());
        }

        match tokens.len() {
            0 => None,
            1 => tokens.pop().map(Sort::One),
            _ => Some(Sort::Many(tokens)),
        }
    }
}

/// Filter operator for list queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,    // equals (default)
    Ne,    // not equals
    Gt,    // greater than
    Gte,   // greater than or equal
    Lt,    // less than
    Lte,   // less than or equal
    In,    // in list (comma-separated)
    Like,  // like (case-sensitive)
    Ilike, // ilike (case-insensitive, PostgreSQL)
}

impl FromStr for FilterOperator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(FilterOperator::Eq),
            "ne" => Ok(FilterOperator::Ne),
            "gt" => Ok(FilterOperator::Gt),
            "gte" => Ok(FilterOperator::Gte),
            "lt" => Ok(FilterOperator::Lt),
            "lte" => Ok(FilterOperator::Lte),
            "in" => Ok(FilterOperator::In),
            "like" => Ok(FilterOperator::Like),
            "ilike" => Ok(FilterOperator::Ilike),
            _ => Err(()),
        }
    }
}

/// Filter condition for a single field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListDocumentsInput {
    pub collection: String,
    pub sort: Option<Sort>,
    pub filter: Vec<FilterCondition>,
    pub locale: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct GetDocumentInput {
    pub collection: String,
    pub document_id: Uuid,
    pub locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateDocumentInput {
    pub collection: String,
    pub data: JsonValue,
    pub locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateDocumentInput {
    pub collection: String,
    pub document_id: Uuid,
    pub data: JsonValue,
    pub locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteDocumentInput {
    pub collection: String,
    pub document_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PagedDocuments {
    pub data: Vec<super::entities::Document>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_from_query_str_single() {
        assert_eq!(
            Sort::from_query_str("-created_at"),
            Some(Sort::One("-created_at".to_string()))
        );
    }

    #[test]
    fn sort_from_query_str_many_skips_empty_segments() {
        assert_eq!(
            Sort::from_query_str("title, ,-created_at"),
            Some(Sort::Many(vec![
                "title".to_string(),
                "-created_at".to_string()
            ]))
        );
    }

    #[test]
    fn sort_from_query_str_empty_is_none() {
        assert_eq!(Sort::from_query_str(" , "), None);
    }

    #[test]
    fn sort_deserializes_from_string_or_list() {
        let one: Sort = serde_json::from_str(r#""-title""#).unwrap();
        assert_eq!(one, Sort::One("-title".to_string()));

        let many: Sort = serde_json::from_str(r#"["title", "-created_at"]"#).unwrap();
        assert_eq!(
            many,
            Sort::Many(vec!["title".to_string(), "-created_at".to_string()])
        );
    }
}
