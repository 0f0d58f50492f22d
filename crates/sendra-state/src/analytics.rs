use sendra_core::DashboardSummary;

/// Cache of the last dashboard-summary fetch plus its loading flag. The
/// flag belongs to the summary fetch alone; the collections list carries
/// its own.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsStore {
    dashboard: Option<DashboardSummary>,
    loading: bool,
}

impl AnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dashboard(&mut self, summary: Option<DashboardSummary>) {
        self.dashboard = summary;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn dashboard(&self) -> Option<&DashboardSummary> {
        self.dashboard.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }
}
