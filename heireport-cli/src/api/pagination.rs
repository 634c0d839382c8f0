//! Paginated listing

use serde_json::Value;

/// Query parameters for list endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub institution_id: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 25,
            search: None,
            institution_id: None,
        }
    }
}

impl ListQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(search) = self.search.as_ref().filter(|s| !s.trim().is_empty()) {
            params.push(("search", search.trim().to_string()));
        }
        if let Some(id) = &self.institution_id {
            params.push(("institution_id", id.clone()));
        }
        params
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub current_page: u32,
    pub last_page: u32,
    pub total: Option<u64>,
}

impl Page {
    /// Accepts a bare array, `{data, meta: {current_page, last_page, total}}`,
    /// or the flat `{data, current_page, last_page, total}` form.
    pub fn from_json(json: Value, requested_page: u32) -> Option<Self> {
        match json {
            Value::Array(items) => Some(Self {
                total: Some(items.len() as u64),
                items,
                current_page: 1,
                last_page: 1,
            }),
            Value::Object(mut obj) => {
                let items = match obj.remove("data") {
                    Some(Value::Array(items)) => items,
                    _ => return None,
                };
                let meta = obj.remove("meta").unwrap_or(Value::Object(obj));
                let number = |key: &str| meta.get(key).and_then(Value::as_u64);

                let current_page = number("current_page").unwrap_or(requested_page as u64) as u32;
                Some(Self {
                    items,
                    current_page,
                    last_page: number("last_page").unwrap_or(current_page as u64) as u32,
                    total: number("total"),
                })
            }
            _ => None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Whether this is the page that was asked for; servers that ignore the
    /// `page` parameter keep answering with an earlier one
    pub fn is_page(&self, requested: u32) -> bool {
        self.current_page >= requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_is_single_page() {
        let page = Page::from_json(json!([{"id": 1}, {"id": 2}]), 1).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_next());
        assert_eq!(page.total, Some(2));
    }

    #[test]
    fn test_meta_envelope() {
        let body = json!({
            "data": [{"id": 1}],
            "meta": {"current_page": 2, "last_page": 5, "total": 101}
        });
        let page = Page::from_json(body, 2).unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 5);
        assert_eq!(page.total, Some(101));
        assert!(page.has_next());
    }

    #[test]
    fn test_flat_envelope() {
        let body = json!({"data": [], "current_page": 3, "last_page": 3, "total": 60});
        let page = Page::from_json(body, 3).unwrap();
        assert!(!page.has_next());
        assert_eq!(page.total, Some(60));
    }

    #[test]
    fn test_page_ignoring_server_is_detected() {
        // Asked for page 2, got page 1 of 4 again
        let body = json!({"data": [{"id": 1}], "current_page": 1, "last_page": 4});
        let page = Page::from_json(body, 2).unwrap();
        assert!(page.has_next());
        assert!(!page.is_page(2));

        let body = json!({"data": [{"id": 26}], "current_page": 2, "last_page": 4});
        assert!(Page::from_json(body, 2).unwrap().is_page(2));
    }

    #[test]
    fn test_unrecognised_body() {
        assert_eq!(Page::from_json(json!({"items": []}), 1), None);
        assert_eq!(Page::from_json(json!("nope"), 1), None);
    }

    #[test]
    fn test_query_params_skip_blank_search() {
        let query = ListQuery {
            search: Some("  ".into()),
            institution_id: Some("12".into()),
            ..Default::default()
        };
        let params = query.to_params();
        assert!(!params.iter().any(|(k, _)| *k == "search"));
        assert!(params.contains(&("institution_id", "12".to_string())));
    }
}
