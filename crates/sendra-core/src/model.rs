use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user as returned by the session probe and the code
/// exchange. Absent until login succeeds; cleared on logout or probe
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl AuthUser {
    /// Display name, falling back to the account's email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// A single message as the server returns it. Identified by `gmail_id`;
/// the same message may appear in any number of collections. Immutable
/// once fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Email {
    pub gmail_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "from", default)]
    pub from_address: String,
    /// The message `Date:` header, forwarded verbatim by the server.
    /// Treated as opaque display text.
    #[serde(default)]
    pub received_at: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Email {
    pub fn display_subject(&self) -> &str {
        if self.subject.trim().is_empty() {
            "(No Subject)"
        } else {
            &self.subject
        }
    }

    pub fn display_body(&self) -> &str {
        self.body
            .as_deref()
            .filter(|body| !body.is_empty())
            .unwrap_or("No body available")
    }

    /// Body preview for table rows, truncated to `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        self.body
            .as_deref()
            .unwrap_or("(No body)")
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// Result of one natural-language query. Produced fresh per call and
/// superseded wholesale by the next search; never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(default)]
    pub query_intent: String,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub emails: Vec<Email>,
    /// Partial-failure detail the server attaches when the mailbox fetch
    /// failed but the query itself was understood.
    #[serde(default)]
    pub error: Option<String>,
}

/// A user-named, server-persisted set of saved emails. The server is the
/// source of truth: the client re-fetches the full list after every
/// mutation and never patches local copies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub emails: Vec<Email>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub read: u64,
    #[serde(default)]
    pub unread: u64,
    #[serde(default)]
    pub starred: u64,
}

/// One aggregate bucket (`{_id, count}`). A `None` key groups the
/// documents that carried no value for the grouped field and renders as
/// "Unknown".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountBucket {
    #[serde(rename = "_id")]
    pub key: Option<String>,
    pub count: u64,
}

impl CountBucket {
    pub fn display_key(&self) -> &str {
        self.key
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or("Unknown")
    }
}

/// Application counts by stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Funnel {
    #[serde(default)]
    pub applied: u64,
    #[serde(default)]
    pub interview: u64,
    #[serde(default)]
    pub offer: u64,
    #[serde(default)]
    pub rejected: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    Increasing,
    Decreasing,
    Neutral,
}

impl Default for Momentum {
    fn default() -> Self {
        Self::Neutral
    }
}

impl Momentum {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Increasing => "Activity is increasing",
            Self::Decreasing => "Activity is declining",
            Self::Neutral => "Activity is stable",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictiveInsights {
    #[serde(default)]
    pub total_applications: u64,
    /// Applications seen in the trailing 30 days.
    #[serde(default)]
    pub recent_activity: u64,
    /// Estimated probability (percent) of an offer within 30 days.
    #[serde(default)]
    pub offer_probability_30d: f64,
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub expected_days_to_offer: Option<u64>,
    #[serde(default)]
    pub momentum: Momentum,
}

/// One point of the applications-over-time series.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimePoint {
    pub date: String,
    #[serde(default)]
    pub applied: u64,
    #[serde(default)]
    pub interview: u64,
    #[serde(default)]
    pub offer: u64,
    #[serde(default)]
    pub rejected: u64,
}

/// Aggregate payload of `GET /analytics/dashboard-summary`. Every array
/// defaults to empty and every nested object to absent, so a partial
/// payload still deserializes; the views substitute placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    #[serde(default)]
    pub stats: EmailStats,
    #[serde(default)]
    pub by_status: Vec<CountBucket>,
    #[serde(default)]
    pub by_type: Vec<CountBucket>,
    #[serde(default)]
    pub by_experience: Vec<CountBucket>,
    #[serde(default)]
    pub by_company: Vec<CountBucket>,
    #[serde(default)]
    pub funnel: Option<Funnel>,
    #[serde(default)]
    pub top_companies: Vec<CountBucket>,
    #[serde(default)]
    pub top_positions: Vec<CountBucket>,
    #[serde(default)]
    pub predictive_insights: Option<PredictiveInsights>,
    #[serde(default)]
    pub applications_over_time: Vec<TimePoint>,
}

/// Body of `POST /gmail/natural-query`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NaturalQueryRequest {
    pub prompt: String,
    pub limit: u32,
    pub include_gmail_fetch: bool,
}

/// Body of `POST /collections`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCollection {
    pub name: String,
    pub emails: Vec<Email>,
}

/// Body of `POST /collections/{id}/emails`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppendEmails {
    pub emails: Vec<Email>,
}

/// Payload of `GET /auth/google`: the externally supplied authorization
/// URL the client hands off to the system browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginStart {
    pub authorization_url: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Payload of `POST /auth/google/exchange`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExchangeResponse {
    pub user: AuthUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_query_response_deserializes() {
        let json = r#"{
            "query_intent": "offers",
            "search_query": "subject:(offer)",
            "summary": "Searching for offers",
            "count": 2,
            "emails": [
                {"gmail_id": "a1", "subject": "Offer", "from": "hr@acme.io", "received_at": "Thu, 12 Jun 2025 10:00:00 +0000", "body": "We are pleased..."},
                {"gmail_id": "b2", "from": "noreply@beta.dev"}
            ],
            "error": null
        }"#;

        let result: SearchResult = serde_json::from_str(json).expect("search result parsed");
        assert_eq!(result.count, 2);
        assert_eq!(result.emails.len(), 2);
        assert_eq!(result.emails[0].from_address, "hr@acme.io");
        assert!(result.error.is_none());
    }

    #[test]
    fn email_display_substitutions() {
        let email = Email {
            gmail_id: "x".to_string(),
            subject: "  ".to_string(),
            from_address: "a@b.c".to_string(),
            received_at: None,
            body: None,
        };

        assert_eq!(email.display_subject(), "(No Subject)");
        assert_eq!(email.display_body(), "No body available");
        assert_eq!(email.preview(100), "(No body)");
    }

    #[test]
    fn collection_uses_mongo_id_alias() {
        let json = r#"{
            "_id": "507f1f77bcf86cd799439011",
            "name": "Offers Q1",
            "created_at": "2025-06-12T10:00:00Z",
            "emails": []
        }"#;

        let collection: Collection = serde_json::from_str(json).expect("collection parsed");
        assert_eq!(collection.id, "507f1f77bcf86cd799439011");
        assert!(collection.emails.is_empty());
    }

    #[test]
    fn partial_dashboard_summary_falls_back_to_defaults() {
        let json = r#"{
            "stats": {"total": 12},
            "by_status": [{"_id": "applied", "count": 7}, {"_id": null, "count": 5}]
        }"#;

        let summary: DashboardSummary = serde_json::from_str(json).expect("summary parsed");
        assert_eq!(summary.stats.total, 12);
        assert_eq!(summary.stats.unread, 0);
        assert_eq!(summary.by_status[1].key, None);
        assert!(summary.funnel.is_none());
        assert!(summary.predictive_insights.is_none());
        assert!(summary.applications_over_time.is_empty());
    }

    #[test]
    fn momentum_deserializes_snake_case() {
        let insights: PredictiveInsights =
            serde_json::from_str(r#"{"total_applications": 4, "momentum": "increasing"}"#)
                .expect("insights parsed");
        assert_eq!(insights.momentum, Momentum::Increasing);
        assert_eq!(PredictiveInsights::default().momentum, Momentum::Neutral);
    }
}
