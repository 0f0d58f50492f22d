use sendra_api::ApiBackend;
use sendra_core::{Collection, DashboardSummary, Email};
use sendra_state::AnalyticsStore;

/// Dashboard page controller: the aggregate summary, the saved
/// collections gallery and the view-toggle state for both.
///
/// Collection mutations never patch local state. The caller confirms the
/// action, the endpoint is called, and the full list is re-fetched so
/// the gallery always reflects the last fetch of the server's truth.
pub struct DashboardPage {
    analytics: AnalyticsStore,
    collections: Vec<Collection>,
    collections_loading: bool,
    expanded_collection: Option<String>,
    /// (collection id, gmail id) of the email expanded for body view.
    active_email: Option<(String, String)>,
    status: Option<String>,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            analytics: AnalyticsStore::new(),
            collections: Vec::new(),
            collections_loading: false,
            expanded_collection: None,
            active_email: None,
            status: None,
        }
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.analytics.dashboard()
    }

    pub fn summary_loading(&self) -> bool {
        self.analytics.loading()
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collections_loading(&self) -> bool {
        self.collections_loading
    }

    pub fn expanded_collection(&self) -> Option<&str> {
        self.expanded_collection.as_deref()
    }

    /// Last mutation/fetch failure, if any. Cleared by the next
    /// successful call; retrying the action is the only recovery path.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Fetch the aggregate summary. Independent of the collections
    /// fetch; only this one gates the initial render.
    pub async fn load_summary<B>(&mut self, api: &B)
    where
        B: ApiBackend + ?Sized,
    {
        self.analytics.set_loading(true);
        match api.dashboard_summary().await {
            Ok(summary) => {
                self.analytics.set_dashboard(Some(summary));
                self.status = None;
            }
            Err(err) => {
                tracing::error!("dashboard summary fetch failed: {err}");
                self.status = Some("Error fetching dashboard".to_string());
            }
        }
        self.analytics.set_loading(false);
    }

    /// Fetch the collections list, replacing it wholesale. View toggles
    /// pointing at collections or emails that no longer exist are reset
    /// to closed.
    pub async fn load_collections<B>(&mut self, api: &B)
    where
        B: ApiBackend + ?Sized,
    {
        self.collections_loading = true;
        match api.list_collections().await {
            Ok(collections) => {
                self.collections = collections;
                self.status = None;
            }
            Err(err) => {
                tracing::error!("collections fetch failed: {err}");
                self.status = Some("Failed to load collections".to_string());
            }
        }
        self.collections_loading = false;
        self.prune_view_toggles();
    }

    /// Delete a collection the caller has already confirmed, then
    /// re-fetch the full list.
    pub async fn delete_collection<B>(&mut self, api: &B, collection_id: &str)
    where
        B: ApiBackend + ?Sized,
    {
        if let Err(err) = api.delete_collection(collection_id).await {
            tracing::error!("delete collection failed: {err}");
            self.status = Some("Failed to delete collection".to_string());
        }
        self.load_collections(api).await;
    }

    /// Remove one email from a collection the caller has already
    /// confirmed, then re-fetch the full list.
    pub async fn remove_email<B>(&mut self, api: &B, collection_id: &str, gmail_id: &str)
    where
        B: ApiBackend + ?Sized,
    {
        if let Err(err) = api.remove_email(collection_id, gmail_id).await {
            tracing::error!("remove email failed: {err}");
            self.status = Some("Failed to remove email".to_string());
        }
        self.load_collections(api).await;
    }

    pub fn toggle_expanded(&mut self, collection_id: &str) {
        if self.expanded_collection.as_deref() == Some(collection_id) {
            self.expanded_collection = None;
            self.active_email = None;
        } else {
            self.expanded_collection = Some(collection_id.to_string());
            self.active_email = None;
        }
    }

    pub fn set_active_email(&mut self, collection_id: &str, gmail_id: Option<String>) {
        self.active_email = gmail_id.map(|id| (collection_id.to_string(), id));
    }

    pub fn active_email(&self) -> Option<&Email> {
        let (collection_id, gmail_id) = self.active_email.as_ref()?;
        self.collections
            .iter()
            .find(|collection| &collection.id == collection_id)?
            .emails
            .iter()
            .find(|email| &email.gmail_id == gmail_id)
    }

    fn prune_view_toggles(&mut self) {
        if let Some(expanded) = &self.expanded_collection {
            if !self.collections.iter().any(|c| &c.id == expanded) {
                self.expanded_collection = None;
            }
        }
        if self.active_email.is_some() && self.active_email().is_none() {
            self.active_email = None;
        }
    }
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}
