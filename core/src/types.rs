//! Record shapes returned by the NocoDB table API.
//!
//! # Design
//! Field names on the wire follow the remote tables (`Id`, `Aseror`,
//! `color_primario`, ...); Rust names are renamed through serde. Unknown
//! columns such as `CreatedAt` are ignored on read.

use serde::{Deserialize, Serialize};

/// One untyped row of any table.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A salesperson profile from the advisors table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Advisor {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Aseror")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "color_primario", default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(rename = "color_secundario", default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(rename = "activo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Request payload for creating an advisor. The server assigns `Id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAdvisor {
    #[serde(rename = "Aseror")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "color_primario", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(rename = "color_secundario", skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Request payload for a partial update. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdvisor {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Aseror", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "color_primario", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(rename = "color_secundario", skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Envelope NocoDB wraps list results in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResponse<T> {
    pub list: Vec<T>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_first_page: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_last_page: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisor_reads_remote_column_names() {
        let raw = r##"{
            "Id": 2,
            "Aseror": "María González",
            "Phone": "+57 300 234 5678",
            "Email": "maria@autorunai.tech",
            "slug": "maria",
            "color_primario": "#c026d3",
            "activo": true,
            "CreatedAt": "2025-01-10 12:00:00+00:00"
        }"##;
        let advisor: Advisor = serde_json::from_str(raw).unwrap();
        assert_eq!(advisor.id, 2);
        assert_eq!(advisor.name, "María González");
        assert_eq!(advisor.primary_color.as_deref(), Some("#c026d3"));
        assert!(advisor.secondary_color.is_none());
        assert!(advisor.whatsapp.is_none());
        assert_eq!(advisor.active, Some(true));
    }

    #[test]
    fn create_advisor_omits_absent_fields() {
        let input = CreateAdvisor {
            name: "Pedro".to_string(),
            phone: "3001234567".to_string(),
            active: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Aseror": "Pedro", "Phone": "3001234567", "activo": true })
        );
    }

    #[test]
    fn update_advisor_always_carries_id() {
        let input = UpdateAdvisor {
            id: 5,
            phone: Some("3009999999".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "Id": 5, "Phone": "3009999999" }));
    }

    #[test]
    fn list_response_tolerates_missing_page_info() {
        let page: ListResponse<Record> = serde_json::from_str(r#"{"list":[{"Id":1}]}"#).unwrap();
        assert_eq!(page.list.len(), 1);
        assert_eq!(page.page_info, PageInfo::default());
    }

    #[test]
    fn page_info_uses_camel_case() {
        let raw = r#"{"list":[],"pageInfo":{"totalRows":12,"page":2,"pageSize":5,
            "isFirstPage":false,"isLastPage":false}}"#;
        let page: ListResponse<Record> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.page_info.total_rows, Some(12));
        assert_eq!(page.page_info.page_size, Some(5));
        assert_eq!(page.page_info.is_first_page, Some(false));
    }
}
