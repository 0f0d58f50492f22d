use sendra_api::ApiBackend;
use sendra_core::{AppendEmails, CreateCollection, Email, NaturalQueryRequest, SearchResult};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    Results,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Inline feedback line shown next to the save controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    fn success(message: &str) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.to_string(),
        }
    }
}

/// A search the panel has issued. `seq` identifies the request so a
/// completion that lands after a newer submission can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub body: NaturalQueryRequest,
}

/// Free-text search over the mailbox plus the save-to-collection
/// controls. Holds the current result set, a multi-select of result
/// items scoped to that set, and the orthogonal saving sub-state.
///
/// Responses are matched back by sequence number: only the most recently
/// issued request may update the panel, so a slow response from an
/// earlier submission can never overwrite a newer result set. In-flight
/// requests are never cancelled; their completions are simply ignored.
#[derive(Debug, Default)]
pub struct SearchPanel {
    pub prompt: String,
    pub collection_name: String,
    pub target_collection: Option<String>,
    phase: SearchPhase,
    issued_seq: u64,
    result: Option<SearchResult>,
    selection: BTreeSet<String>,
    active_email: Option<String>,
    saving: bool,
    feedback: Option<Feedback>,
}

impl Default for SearchPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn searching(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Start a search for the current prompt. A prompt that is empty or
    /// all whitespace issues nothing: no state change, no network call.
    /// Submitting while an earlier search is in flight is allowed; the
    /// sequence number makes the earlier completion stale.
    pub fn begin_search(&mut self, limit: u32, include_gmail_fetch: bool) -> Option<SearchRequest> {
        if self.prompt.trim().is_empty() {
            return None;
        }

        self.issued_seq += 1;
        self.phase = SearchPhase::Searching;
        Some(SearchRequest {
            seq: self.issued_seq,
            body: NaturalQueryRequest {
                prompt: self.prompt.clone(),
                limit,
                include_gmail_fetch,
            },
        })
    }

    /// Apply a resolved search. Replaces the result set, selection and
    /// active email wholesale. Returns false (and changes nothing) when
    /// the response does not belong to the most recently issued request.
    pub fn apply_result(&mut self, seq: u64, result: SearchResult) -> bool {
        if seq != self.issued_seq {
            tracing::debug!(seq, latest = self.issued_seq, "discarding stale search response");
            return false;
        }

        self.phase = SearchPhase::Results;
        self.result = Some(result);
        self.selection.clear();
        self.active_email = None;
        self.feedback = None;
        true
    }

    /// Apply a failed search. The previous result set is kept; the
    /// failure is surfaced as a feedback message. Stale failures are
    /// discarded like stale results.
    pub fn apply_error(&mut self, seq: u64, message: &str) -> bool {
        if seq != self.issued_seq {
            tracing::debug!(seq, latest = self.issued_seq, "discarding stale search failure");
            return false;
        }

        self.phase = SearchPhase::Failed;
        self.feedback = Some(Feedback::error(message));
        true
    }

    /// Issue the search and apply its outcome. Returns true when the
    /// panel now shows a fresh result set.
    pub async fn run_search<B>(&mut self, api: &B, limit: u32, include_gmail_fetch: bool) -> bool
    where
        B: ApiBackend + ?Sized,
    {
        let Some(request) = self.begin_search(limit, include_gmail_fetch) else {
            return false;
        };

        match api.natural_query(&request.body).await {
            Ok(result) => self.apply_result(request.seq, result),
            Err(err) => {
                tracing::warn!("natural query failed: {err}");
                self.apply_error(request.seq, "Error searching emails");
                false
            }
        }
    }

    /// Membership toggle in the selection set. Independent of which
    /// email is active (expanded for body view).
    pub fn toggle_selected(&mut self, gmail_id: &str) {
        if !self.selection.remove(gmail_id) {
            self.selection.insert(gmail_id.to_string());
        }
    }

    pub fn is_selected(&self, gmail_id: &str) -> bool {
        self.selection.contains(gmail_id)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn set_active_email(&mut self, gmail_id: Option<String>) {
        self.active_email = gmail_id;
    }

    pub fn active_email(&self) -> Option<&Email> {
        let active = self.active_email.as_deref()?;
        self.result
            .as_ref()?
            .emails
            .iter()
            .find(|email| email.gmail_id == active)
    }

    /// Selected emails in result order.
    pub fn selected_emails(&self) -> Vec<Email> {
        let Some(result) = &self.result else {
            return Vec::new();
        };
        result
            .emails
            .iter()
            .filter(|email| self.selection.contains(&email.gmail_id))
            .cloned()
            .collect()
    }

    fn new_collection_request(&self) -> Result<CreateCollection, Feedback> {
        let name = self.collection_name.trim();
        if name.is_empty() {
            return Err(Feedback::error("Please enter a collection name"));
        }

        let emails = self.selected_emails();
        if emails.is_empty() {
            return Err(Feedback::error("Select at least one email to save"));
        }

        Ok(CreateCollection {
            name: name.to_string(),
            emails,
        })
    }

    fn append_request(&self) -> Result<(String, AppendEmails), Feedback> {
        let Some(target) = self.target_collection.clone() else {
            return Err(Feedback::error("Select a collection"));
        };

        let emails = self.selected_emails();
        if emails.is_empty() {
            return Err(Feedback::error("Select at least one email to save"));
        }

        Ok((target, AppendEmails { emails }))
    }

    /// Save the selection as a new named collection. Validation failures
    /// stay local (feedback only, no network call). On success the
    /// selection and result set are untouched, the name field is cleared
    /// and `on_saved` fires exactly once; on failure everything is left
    /// as-is so the same save can be retried.
    pub async fn save_as_new<B, F>(&mut self, api: &B, mut on_saved: F) -> bool
    where
        B: ApiBackend + ?Sized,
        F: FnMut(),
    {
        let request = match self.new_collection_request() {
            Ok(request) => request,
            Err(feedback) => {
                self.feedback = Some(feedback);
                return false;
            }
        };

        self.saving = true;
        self.feedback = None;
        match api.create_collection(&request).await {
            Ok(created) => {
                tracing::info!(collection = %created.id, "collection created");
                self.saving = false;
                self.collection_name.clear();
                self.feedback = Some(Feedback::success("Saved to collection"));
                on_saved();
                true
            }
            Err(err) => {
                tracing::warn!("create collection failed: {err}");
                self.saving = false;
                self.feedback = Some(Feedback::error("Failed to save collection"));
                false
            }
        }
    }

    /// Append the selection to an already existing collection.
    pub async fn append_to_existing<B, F>(&mut self, api: &B, mut on_saved: F) -> bool
    where
        B: ApiBackend + ?Sized,
        F: FnMut(),
    {
        let (target, request) = match self.append_request() {
            Ok(parts) => parts,
            Err(feedback) => {
                self.feedback = Some(feedback);
                return false;
            }
        };

        self.saving = true;
        self.feedback = None;
        match api.append_emails(&target, &request).await {
            Ok(updated) => {
                tracing::info!(collection = %updated.id, "emails appended");
                self.saving = false;
                self.feedback = Some(Feedback::success("Added to collection"));
                on_saved();
                true
            }
            Err(err) => {
                tracing::warn!("append to collection failed: {err}");
                self.saving = false;
                self.feedback = Some(Feedback::error("Failed to add to collection"));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sendra_api::{ApiBackend, ApiError};
    use sendra_core::{
        AuthUser, Collection, DashboardSummary, LoginStart, NaturalQueryRequest, SearchResult,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        queries: AtomicUsize,
        query_response: Mutex<SearchResult>,
        creates: Mutex<Vec<CreateCollection>>,
        appends: Mutex<Vec<(String, AppendEmails)>>,
        fail_saves: bool,
    }

    fn transport_error() -> ApiError {
        ApiError::Url(url_parse_error())
    }

    fn url_parse_error() -> url::ParseError {
        url::ParseError::EmptyHost
    }

    #[async_trait]
    impl ApiBackend for FakeBackend {
        async fn current_user(&self) -> Result<Option<AuthUser>, ApiError> {
            Ok(None)
        }

        async fn login_start(&self) -> Result<LoginStart, ApiError> {
            Err(transport_error())
        }

        async fn exchange_code(&self, _code: &str) -> Result<AuthUser, ApiError> {
            Err(transport_error())
        }

        async fn logout(&self) -> Result<(), ApiError> {
            Ok(())
        }

        async fn natural_query(
            &self,
            _request: &NaturalQueryRequest,
        ) -> Result<SearchResult, ApiError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.query_response.lock().expect("lock").clone())
        }

        async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
            Ok(DashboardSummary::default())
        }

        async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_collection(
            &self,
            request: &CreateCollection,
        ) -> Result<Collection, ApiError> {
            if self.fail_saves {
                return Err(transport_error());
            }
            self.creates.lock().expect("lock").push(request.clone());
            Ok(Collection {
                id: "c1".to_string(),
                name: request.name.clone(),
                created_at: None,
                emails: request.emails.clone(),
            })
        }

        async fn append_emails(
            &self,
            collection_id: &str,
            request: &AppendEmails,
        ) -> Result<Collection, ApiError> {
            if self.fail_saves {
                return Err(transport_error());
            }
            self.appends
                .lock()
                .expect("lock")
                .push((collection_id.to_string(), request.clone()));
            Ok(Collection {
                id: collection_id.to_string(),
                name: "existing".to_string(),
                created_at: None,
                emails: request.emails.clone(),
            })
        }

        async fn delete_collection(&self, _collection_id: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn remove_email(
            &self,
            _collection_id: &str,
            _gmail_id: &str,
        ) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn email(id: &str, subject: &str) -> Email {
        Email {
            gmail_id: id.to_string(),
            subject: subject.to_string(),
            from_address: "recruiting@acme.io".to_string(),
            received_at: Some("Thu, 12 Jun 2025 10:00:00 +0000".to_string()),
            body: Some("body".to_string()),
        }
    }

    fn offers_result() -> SearchResult {
        SearchResult {
            query_intent: "offers".to_string(),
            search_query: "subject:(offer)".to_string(),
            summary: "Offers from the last quarter".to_string(),
            count: 2,
            emails: vec![email("a", "Offer from Acme"), email("b", "Offer from Beta")],
            error: None,
        }
    }

    #[tokio::test]
    async fn whitespace_prompt_issues_no_network_call() {
        let api = FakeBackend::default();
        let mut panel = SearchPanel::new();
        panel.prompt = "   \t".to_string();

        assert!(!panel.run_search(&api, 50, true).await);
        assert_eq!(panel.phase(), SearchPhase::Idle);
        assert_eq!(api.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_replaces_result_and_selection() {
        let api = FakeBackend::default();
        *api.query_response.lock().expect("lock") = offers_result();

        let mut panel = SearchPanel::new();
        panel.prompt = "Show me all job offers".to_string();
        assert!(panel.run_search(&api, 50, true).await);

        let result = panel.result().expect("result");
        assert_eq!(result.count, 2);
        assert_eq!(result.emails[0].subject, "Offer from Acme");
        assert_eq!(result.emails[1].subject, "Offer from Beta");

        panel.toggle_selected("a");
        panel.set_active_email(Some("b".to_string()));

        *api.query_response.lock().expect("lock") = SearchResult::default();
        assert!(panel.run_search(&api, 50, true).await);
        assert_eq!(panel.selection_len(), 0);
        assert!(panel.active_email().is_none());
    }

    #[test]
    fn selection_toggle_is_an_involution() {
        let mut panel = SearchPanel::new();
        panel.prompt = "offers".to_string();
        let request = panel.begin_search(50, true).expect("request issued");
        panel.apply_result(request.seq, offers_result());

        panel.toggle_selected("a");
        assert!(panel.is_selected("a"));
        panel.toggle_selected("a");
        assert!(!panel.is_selected("a"));
        assert_eq!(panel.selection_len(), 0);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut panel = SearchPanel::new();
        panel.prompt = "first".to_string();
        let first = panel.begin_search(50, true).expect("first issued");

        panel.prompt = "second".to_string();
        let second = panel.begin_search(50, true).expect("second issued");

        let mut stale = offers_result();
        stale.query_intent = "stale".to_string();
        assert!(!panel.apply_result(first.seq, stale));
        assert!(panel.result().is_none());
        assert_eq!(panel.phase(), SearchPhase::Searching);

        assert!(panel.apply_result(second.seq, offers_result()));
        assert_eq!(panel.result().expect("result").query_intent, "offers");

        // A stale failure is ignored the same way.
        assert!(!panel.apply_error(first.seq, "Error searching emails"));
        assert_eq!(panel.phase(), SearchPhase::Results);
    }

    #[test]
    fn failed_search_keeps_previous_results() {
        let mut panel = SearchPanel::new();
        panel.prompt = "offers".to_string();
        let request = panel.begin_search(50, true).expect("issued");
        panel.apply_result(request.seq, offers_result());

        panel.prompt = "rejections".to_string();
        let retry = panel.begin_search(50, true).expect("issued");
        assert!(panel.apply_error(retry.seq, "Error searching emails"));

        assert_eq!(panel.phase(), SearchPhase::Failed);
        assert_eq!(panel.result().expect("result").count, 2);
        assert_eq!(
            panel.feedback().map(|f| f.kind),
            Some(FeedbackKind::Error)
        );
    }

    #[tokio::test]
    async fn save_as_new_validates_locally() {
        let api = FakeBackend::default();
        let mut panel = SearchPanel::new();
        panel.prompt = "offers".to_string();
        let request = panel.begin_search(50, true).expect("issued");
        panel.apply_result(request.seq, offers_result());

        // Missing name.
        panel.toggle_selected("a");
        assert!(!panel.save_as_new(&api, || {}).await);
        assert_eq!(
            panel.feedback().map(|f| f.message.as_str()),
            Some("Please enter a collection name")
        );

        // Empty selection.
        panel.toggle_selected("a");
        panel.collection_name = "Offers Q1".to_string();
        assert!(!panel.save_as_new(&api, || {}).await);
        assert_eq!(
            panel.feedback().map(|f| f.message.as_str()),
            Some("Select at least one email to save")
        );

        assert!(api.creates.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn save_as_new_sends_selection_and_refreshes_once() {
        let api = FakeBackend::default();
        let mut panel = SearchPanel::new();
        panel.prompt = "Show me all job offers".to_string();
        let request = panel.begin_search(50, true).expect("issued");
        panel.apply_result(request.seq, offers_result());

        panel.toggle_selected("a");
        panel.collection_name = "Offers Q1".to_string();

        let mut refreshes = 0;
        assert!(panel.save_as_new(&api, || refreshes += 1).await);
        assert_eq!(refreshes, 1);

        let creates = api.creates.lock().expect("lock");
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].name, "Offers Q1");
        assert_eq!(creates[0].emails.len(), 1);
        assert_eq!(creates[0].emails[0].gmail_id, "a");
        drop(creates);

        // Result set and selection survive the save.
        assert!(panel.is_selected("a"));
        assert_eq!(panel.result().expect("result").count, 2);
        assert!(panel.collection_name.is_empty());
        assert_eq!(
            panel.feedback().map(|f| f.kind),
            Some(FeedbackKind::Success)
        );
    }

    #[tokio::test]
    async fn failed_save_leaves_state_for_retry() {
        let api = FakeBackend {
            fail_saves: true,
            ..FakeBackend::default()
        };
        let mut panel = SearchPanel::new();
        panel.prompt = "offers".to_string();
        let request = panel.begin_search(50, true).expect("issued");
        panel.apply_result(request.seq, offers_result());

        panel.toggle_selected("b");
        panel.collection_name = "Offers Q1".to_string();

        let mut refreshes = 0;
        assert!(!panel.save_as_new(&api, || refreshes += 1).await);
        assert_eq!(refreshes, 0);
        assert!(!panel.saving());
        assert_eq!(panel.collection_name, "Offers Q1");
        assert!(panel.is_selected("b"));
        assert_eq!(
            panel.feedback().map(|f| f.message.as_str()),
            Some("Failed to save collection")
        );
    }

    #[tokio::test]
    async fn append_requires_a_target_collection() {
        let api = FakeBackend::default();
        let mut panel = SearchPanel::new();
        panel.prompt = "offers".to_string();
        let request = panel.begin_search(50, true).expect("issued");
        panel.apply_result(request.seq, offers_result());
        panel.toggle_selected("a");

        assert!(!panel.append_to_existing(&api, || {}).await);
        assert_eq!(
            panel.feedback().map(|f| f.message.as_str()),
            Some("Select a collection")
        );

        panel.target_collection = Some("c42".to_string());
        let mut refreshes = 0;
        assert!(panel.append_to_existing(&api, || refreshes += 1).await);
        assert_eq!(refreshes, 1);

        let appends = api.appends.lock().expect("lock");
        assert_eq!(appends.len(), 1);
        assert_eq!(appends[0].0, "c42");
        assert_eq!(appends[0].1.emails[0].gmail_id, "a");
    }
}
