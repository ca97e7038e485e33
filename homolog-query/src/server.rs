//! Server-mode request and response shapes.
//!
//! The endpoint contract is a GET on the source URL with `offset`, `limit`,
//! `page`, `search`, `filters` and `params` in the query string. `filters`
//! and `params` travel as compact JSON.

use homolog_core::{validate_rows, ActiveFilters, FilterConfig, HomologRecord, LoadReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page request against a server-mode source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerQuery {
    pub offset: usize,
    pub limit: usize,
    pub page: usize,
    /// Only entries for configured fields; unconfigured entries never reach the wire.
    pub filters: ActiveFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl ServerQuery {
    pub fn new(
        offset: usize,
        page: usize,
        page_size: usize,
        active: &ActiveFilters,
        configs: &[FilterConfig],
        search: &str,
        static_params: Option<&Value>,
    ) -> Self {
        let filters = active
            .iter()
            .filter(|(field, _)| configs.iter().any(|config| config.field == *field))
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect();
        let search = search.trim();
        Self {
            offset,
            limit: page_size,
            page,
            filters,
            search: (!search.is_empty()).then(|| search.to_string()),
            params: static_params.cloned(),
        }
    }

    /// Query-string pairs for the GET request.
    pub fn to_query_pairs(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut pairs = vec![
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if !self.filters.is_empty() {
            pairs.push(("filters", serde_json::to_string(&self.filters)?));
        }
        if let Some(params) = &self.params {
            pairs.push(("params", serde_json::to_string(params)?));
        }
        Ok(pairs)
    }
}

/// Body returned by a server-mode source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub rows: Vec<Value>,
    pub total_count: usize,
}

impl PageResponse {
    /// Validate rows at the boundary, same as a client-mode load.
    pub fn into_records(self) -> (Vec<HomologRecord>, usize, LoadReport) {
        let (records, report) = validate_rows(&self.rows);
        (records, self.total_count, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homolog_core::{homolog_filter_configs, FilterValue};
    use serde_json::json;

    #[test]
    fn test_unconfigured_filters_are_dropped() {
        let mut active = ActiveFilters::new();
        active.insert("score", FilterValue::range(10.0, 20.0));
        active.insert("notAField", FilterValue::range(0.0, 1.0));

        let query = ServerQuery::new(50, 2, 25, &active, &homolog_filter_configs(), "  ", None);

        assert_eq!(query.filters.len(), 1);
        assert!(query.filters.get("score").is_some());
        assert_eq!(query.search, None);
        assert_eq!(query.limit, 25);
    }

    #[test]
    fn test_query_pairs_carry_json_payloads() {
        let mut active = ActiveFilters::new();
        active.insert("score", FilterValue::range(10.0, 20.0));
        let params = json!({"proteome": 447});

        let query = ServerQuery::new(0, 0, 25, &active, &homolog_filter_configs(), "kinase", Some(&params));
        let pairs = query.to_query_pairs().unwrap();

        assert_eq!(pairs[0], ("offset", "0".to_string()));
        assert!(pairs.contains(&("search", "kinase".to_string())));
        assert!(pairs.contains(&("filters", r#"{"score":{"min":10.0,"max":20.0}}"#.to_string())));
        assert!(pairs.contains(&("params", r#"{"proteome":447}"#.to_string())));
    }

    #[test]
    fn test_page_response_validates_rows() {
        let body = json!({
            "rows": [{"_id": "a", "score": 5}, {"score": 7}],
            "totalCount": 40
        });
        let response: PageResponse = serde_json::from_value(body).unwrap();
        let (records, total, report) = response.into_records();

        assert_eq!(records.len(), 1);
        assert_eq!(total, 40);
        assert_eq!(report.rejected_count(), 1);
    }
}
