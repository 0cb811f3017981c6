//! Standard success envelope shared by every JSON endpoint.

use serde::Serialize;
use shared::pagination::PageMeta;

/// Success envelope: `{ "success": true, "data": ..., "meta"?: ... }`.
///
/// Errors use the matching `{ "success": false, "error": ... }` body produced
/// by the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
            message: None,
        }
    }

    pub fn paginated(data: T, meta: PageMeta) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::pagination::PageRequest;

    #[test]
    fn test_ok_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2, 3])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("meta").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_paginated_envelope() {
        let meta = PageMeta::new(PageRequest::default(), 30);
        let json = serde_json::to_value(ApiResponse::paginated(Vec::<i32>::new(), meta)).unwrap();
        assert_eq!(json["meta"]["total"], 30);
    }

    #[test]
    fn test_with_message() {
        let json =
            serde_json::to_value(ApiResponse::ok("x").with_message("Thanks, we'll be in touch"))
                .unwrap();
        assert_eq!(json["message"], "Thanks, we'll be in touch");
    }
}
