use sendra_core::Email;
use serde::{Deserialize, Serialize};

/// List filters mirrored from the server's email listing parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailFilters {
    pub language: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for EmailFilters {
    fn default() -> Self {
        Self {
            language: None,
            position: None,
            company: None,
            status: None,
            job_type: None,
            page: 1,
            limit: 20,
        }
    }
}

/// Email list/filter state. Holds whatever list the views last put there;
/// no derived computation beyond the selected-row lookup.
#[derive(Debug, Clone, Default)]
pub struct EmailStore {
    emails: Vec<Email>,
    selected: Option<String>,
    filters: EmailFilters,
}

impl EmailStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list wholesale. A selection pointing at a message no
    /// longer present is dropped.
    pub fn set_emails(&mut self, emails: Vec<Email>) {
        self.emails = emails;
        if let Some(selected) = &self.selected {
            if !self.emails.iter().any(|email| &email.gmail_id == selected) {
                self.selected = None;
            }
        }
    }

    pub fn set_selected(&mut self, gmail_id: Option<String>) {
        self.selected = gmail_id;
    }

    pub fn update_filters(&mut self, update: impl FnOnce(&mut EmailFilters)) {
        update(&mut self.filters);
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn selected_email(&self) -> Option<&Email> {
        let selected = self.selected.as_deref()?;
        self.emails.iter().find(|email| email.gmail_id == selected)
    }

    pub fn filters(&self) -> &EmailFilters {
        &self.filters
    }
}
