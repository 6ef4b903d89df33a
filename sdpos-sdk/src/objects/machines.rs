//! POS machine (terminal) types. Wire and dashboard shapes are identical.

use serde::{Deserialize, Serialize};

use super::non_empty;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Active,
    Inactive,
    Maintenance,
    Decommissioned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub terminal_id: String,
    pub device_serial: String,
    pub machine_model: String,
    pub status: MachineStatus,
    #[serde(default)]
    pub activated_at: Option<String>,
    #[serde(default)]
    pub last_txn_at: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub retailer_code: Option<String>,
    #[serde(default)]
    pub retailer_name: Option<String>,
    #[serde(default)]
    pub retailer_business_name: Option<String>,
    #[serde(default)]
    pub retailer_city: Option<String>,
    #[serde(default)]
    pub retailer_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinePagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// `GET /api/partner/pos-machines` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachinesResponse {
    pub success: bool,
    pub data: Vec<Machine>,
    pub pagination: MachinePagination,
}

/// Filters for the machine listing, sent as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MachineQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub machine_type: Option<String>,
    pub search: Option<String>,
}

impl MachineQuery {
    /// Form-encode the query. `page` and `limit` are always present; the
    /// string filters only when non-empty.
    pub fn to_query_string(&self) -> String {
        let mut qs = url::form_urlencoded::Serializer::new(String::new());
        qs.append_pair(
            "page",
            &self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE).to_string(),
        );
        qs.append_pair(
            "limit",
            &self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT).to_string(),
        );
        for (name, value) in [
            ("status", &self.status),
            ("machine_type", &self.machine_type),
            ("search", &self.search),
        ] {
            if let Some(value) = non_empty(value.clone()) {
                qs.append_pair(name, &value);
            }
        }
        qs.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_defaults() {
        assert_eq!(MachineQuery::default().to_query_string(), "page=1&limit=50");
    }

    #[test]
    fn test_query_string_skips_empty_and_encodes() {
        let query = MachineQuery {
            page: Some(2),
            limit: Some(10),
            status: Some("active".into()),
            machine_type: Some(String::new()),
            search: Some("Main St & Co".into()),
        };
        assert_eq!(
            query.to_query_string(),
            "page=2&limit=10&status=active&search=Main+St+%26+Co"
        );
    }

    #[test]
    fn test_machine_roundtrips_nulls() {
        let value = serde_json::json!({
            "id": "m1",
            "terminal_id": "T123",
            "device_serial": "SN-1",
            "machine_model": "A910",
            "status": "maintenance",
            "activated_at": null,
            "last_txn_at": null,
            "metadata": {"firmware": "1.2"},
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z",
            "retailer_code": null,
            "retailer_name": null,
            "retailer_business_name": null,
            "retailer_city": null,
            "retailer_state": null,
        });
        let machine: Machine = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(machine.status, MachineStatus::Maintenance);
        assert_eq!(serde_json::to_value(&machine).unwrap(), value);
    }
}
