use crate::ApiError;
use async_trait::async_trait;
use reqwest::StatusCode;
use sendra_core::{
    AppendEmails, AuthUser, Collection, CreateCollection, DashboardSummary, ExchangeResponse,
    LoginStart, NaturalQueryRequest, SearchResult,
};
use url::Url;

/// One method per backend capability. Every call resolves to the parsed
/// response body or propagates the transport error unchanged: no retry,
/// no timeout override, no response validation. Only the session probe
/// inspects the status code (401 means "no user", not a failure).
#[async_trait]
pub trait ApiBackend: Send + Sync {
    async fn current_user(&self) -> Result<Option<AuthUser>, ApiError>;

    async fn login_start(&self) -> Result<LoginStart, ApiError>;

    async fn exchange_code(&self, code: &str) -> Result<AuthUser, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn natural_query(&self, request: &NaturalQueryRequest) -> Result<SearchResult, ApiError>;

    async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError>;

    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError>;

    async fn create_collection(&self, request: &CreateCollection) -> Result<Collection, ApiError>;

    async fn append_emails(
        &self,
        collection_id: &str,
        request: &AppendEmails,
    ) -> Result<Collection, ApiError>;

    async fn delete_collection(&self, collection_id: &str) -> Result<(), ApiError>;

    async fn remove_email(&self, collection_id: &str, gmail_id: &str) -> Result<(), ApiError>;
}

/// Thin `reqwest` wrapper over the tracker backend. All requests share
/// one base URL (so the client can sit behind a reverse proxy) and one
/// cookie store carrying the session.
pub struct HttpBackend {
    http: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base: ensure_trailing_slash(base),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }
}

/// `Url::join` drops the last path segment of a base without a trailing
/// slash, which would silently strip a `/api` prefix.
fn ensure_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base
}

#[async_trait]
impl ApiBackend for HttpBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, ApiError> {
        let response = self.http.get(self.endpoint("auth/me")?).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        let user = response.error_for_status()?.json().await?;
        Ok(Some(user))
    }

    async fn login_start(&self) -> Result<LoginStart, ApiError> {
        let start = self
            .http
            .get(self.endpoint("auth/google")?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(start)
    }

    async fn exchange_code(&self, code: &str) -> Result<AuthUser, ApiError> {
        let response: ExchangeResponse = self
            .http
            .post(self.endpoint("auth/google/exchange")?)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.user)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.http
            .post(self.endpoint("auth/logout")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn natural_query(&self, request: &NaturalQueryRequest) -> Result<SearchResult, ApiError> {
        tracing::debug!(limit = request.limit, "issuing natural query");
        let result = self
            .http
            .post(self.endpoint("gmail/natural-query")?)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(result)
    }

    async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        let summary = self
            .http
            .get(self.endpoint("analytics/dashboard-summary")?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(summary)
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        let collections = self
            .http
            .get(self.endpoint("collections")?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(collections)
    }

    async fn create_collection(&self, request: &CreateCollection) -> Result<Collection, ApiError> {
        tracing::debug!(name = %request.name, emails = request.emails.len(), "creating collection");
        let created = self
            .http
            .post(self.endpoint("collections")?)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(created)
    }

    async fn append_emails(
        &self,
        collection_id: &str,
        request: &AppendEmails,
    ) -> Result<Collection, ApiError> {
        let updated = self
            .http
            .post(self.endpoint(&format!("collections/{collection_id}/emails"))?)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(updated)
    }

    async fn delete_collection(&self, collection_id: &str) -> Result<(), ApiError> {
        self.http
            .delete(self.endpoint(&format!("collections/{collection_id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn remove_email(&self, collection_id: &str, gmail_id: &str) -> Result<(), ApiError> {
        self.http
            .delete(self.endpoint(&format!("collections/{collection_id}/emails/{gmail_id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
