//! Typed access to the advisors table.

use crate::api::NocoDb;
use crate::config::NocoDbConfig;
use crate::error::ApiError;
use crate::options::RequestOptions;
use crate::transport::Transport;
use crate::types::{Advisor, CreateAdvisor, ListResponse, UpdateAdvisor};

/// NocoDB `where` clause selecting active advisors.
pub const ACTIVE_FILTER: &str = "(activo,eq,true)";

/// Filters for `AdvisorService::list`.
#[derive(Debug, Clone, Default)]
pub struct AdvisorQuery {
    pub active_only: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl AdvisorQuery {
    fn to_options(&self) -> RequestOptions {
        let mut options = RequestOptions::new();
        if self.active_only {
            options = options.param("where", ACTIVE_FILTER);
        }
        if let Some(limit) = self.limit {
            options = options.param("limit", limit);
        }
        if let Some(offset) = self.offset {
            options = options.param("offset", offset);
        }
        options
    }
}

pub struct AdvisorService<'a, T> {
    db: &'a NocoDb<T>,
    records: String,
}

impl<'a, T: Transport> AdvisorService<'a, T> {
    pub fn new(db: &'a NocoDb<T>, table_id: &str) -> Result<Self, ApiError> {
        let table_id = table_id.trim().trim_matches('/');
        if table_id.is_empty() {
            return Err(ApiError::InvalidEndpoint);
        }
        Ok(Self {
            db,
            records: format!("{table_id}/records"),
        })
    }

    /// Uses the table named by `NOCODB_ADVISORS_TABLE`.
    pub fn from_config(db: &'a NocoDb<T>, config: &NocoDbConfig) -> Result<Self, ApiError> {
        Self::new(db, config.advisors_table.as_deref().unwrap_or_default())
    }

    pub fn list(&self, query: &AdvisorQuery) -> Result<ListResponse<Advisor>, ApiError> {
        let page: ListResponse<Advisor> = self.db.get(&self.records, &query.to_options())?;
        tracing::debug!(
            count = page.list.len(),
            active_only = query.active_only,
            "listed advisors"
        );
        Ok(page)
    }

    pub fn get(&self, id: i64) -> Result<Advisor, ApiError> {
        self.db.get(&format!("{}/{id}", self.records), &RequestOptions::default())
    }

    pub fn create(&self, input: &CreateAdvisor) -> Result<Advisor, ApiError> {
        self.db.post(&self.records, &RequestOptions::new().body(input)?)
    }

    /// PATCH with `Id` in the body; only the fields set on `input` change.
    pub fn update(&self, input: &UpdateAdvisor) -> Result<Advisor, ApiError> {
        self.db.patch(&self.records, &RequestOptions::new().body(input)?)
    }
}
