use anyhow::Context;
use sendra_api::{ApiBackend, HttpBackend};
use sendra_config::{AppConfig, ConfigManager};
use sendra_dashboard::{charts, DashboardPage};
use sendra_search::{FeedbackKind, SearchPanel, SearchPhase, EXAMPLE_PROMPTS};
use sendra_state::{EmailStore, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const APPLIED_COLOR: egui::Color32 = egui::Color32::from_rgb(0x3b, 0x82, 0xf6);
const INTERVIEW_COLOR: egui::Color32 = egui::Color32::from_rgb(0x8b, 0x5c, 0xf6);
const OFFER_COLOR: egui::Color32 = egui::Color32::from_rgb(0x10, 0xb9, 0x81);
const REJECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(0xef, 0x44, 0x44);

const STAGE_COLORS: [egui::Color32; 4] =
    [APPLIED_COLOR, INTERVIEW_COLOR, OFFER_COLOR, REJECTED_COLOR];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut options = eframe::NativeOptions::default();
    options.viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(1280.0, 860.0));

    eframe::run_native(
        "Sendra",
        options,
        Box::new(|_cc| Ok(Box::new(SendraApp::initialize().expect("native init")))),
    )
    .map_err(|err| anyhow::anyhow!(err.to_string()))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Login,
    Callback,
    Dashboard,
}

/// Actions collected while rendering the search results; applied after
/// the draw pass so the panel is not mutated mid-iteration.
enum SearchAction {
    Toggle(String),
    Activate(String),
}

/// Actions collected while rendering the collections gallery.
enum CollectionAction {
    Toggle(String),
    Activate(String, String),
    Delete(String, String),
    RemoveEmail(String, String),
}

struct SendraApp {
    runtime: tokio::runtime::Runtime,
    config: AppConfig,
    api: HttpBackend,
    session: SessionStore,
    emails: EmailStore,
    search: SearchPanel,
    dashboard: DashboardPage,
    view: View,
    auth_code: String,
    auth_error: Option<String>,
    status: String,
}

impl SendraApp {
    fn initialize() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("build tokio runtime")?;

        let config_manager = ConfigManager::new().context("initialize config manager")?;
        let config = config_manager.load().context("load app config")?;
        let api = HttpBackend::new(config.api.base_url.clone()).context("build api client")?;

        // Session probe: an existing session enters the dashboard
        // directly, anything else (401 or transport failure) means no
        // user and lands on the login screen.
        let mut session = SessionStore::new();
        match runtime.block_on(api.current_user()) {
            Ok(user) => session.set_user(user),
            Err(err) => {
                tracing::warn!("session probe failed: {err}");
                session.clear();
            }
        }

        let view = if session.is_authenticated() {
            View::Dashboard
        } else {
            View::Login
        };

        let mut app = Self {
            runtime,
            config,
            api,
            session,
            emails: EmailStore::new(),
            search: SearchPanel::new(),
            dashboard: DashboardPage::new(),
            view,
            auth_code: String::new(),
            auth_error: None,
            status: String::new(),
        };

        if app.view == View::Dashboard {
            app.enter_dashboard();
        }

        Ok(app)
    }

    /// Mount fetches: summary and collections are independent, each
    /// with its own loading flag.
    fn enter_dashboard(&mut self) {
        self.runtime
            .block_on(self.dashboard.load_summary(&self.api));
        self.runtime
            .block_on(self.dashboard.load_collections(&self.api));
    }

    fn start_login(&mut self) {
        match self.runtime.block_on(self.api.login_start()) {
            Ok(start) => {
                // One-way handoff to the external authorization page;
                // the flow resumes when the user pastes the code back.
                if let Err(err) = open::that(&start.authorization_url) {
                    tracing::warn!("failed to open browser: {err}");
                    self.status = format!("Open this URL to sign in: {}", start.authorization_url);
                }
                self.auth_code.clear();
                self.auth_error = None;
                self.view = View::Callback;
            }
            Err(err) => {
                tracing::error!("login start failed: {err}");
                self.status = "Could not reach the sign-in service".to_string();
            }
        }
    }

    fn complete_sign_in(&mut self) {
        let code = self.auth_code.trim().to_string();
        if code.is_empty() {
            self.auth_error = Some("No authorization code received".to_string());
            return;
        }

        match self.runtime.block_on(self.api.exchange_code(&code)) {
            Ok(user) => {
                self.session.set_user(Some(user));
                self.auth_code.clear();
                self.auth_error = None;
                self.view = View::Dashboard;
                self.enter_dashboard();
            }
            Err(err) => {
                tracing::error!("code exchange failed: {err}");
                self.auth_error = Some("Authentication failed".to_string());
            }
        }
    }

    fn logout(&mut self) {
        if let Err(err) = self.runtime.block_on(self.api.logout()) {
            tracing::warn!("logout call failed: {err}");
        }
        self.session.clear();
        self.emails = EmailStore::new();
        self.search = SearchPanel::new();
        self.dashboard = DashboardPage::new();
        self.status.clear();
        self.view = View::Login;
    }

    fn run_search(&mut self) {
        let limit = self.config.search.default_limit;
        let include_gmail_fetch = self.config.search.include_gmail_fetch;
        let applied = self
            .runtime
            .block_on(self.search.run_search(&self.api, limit, include_gmail_fetch));

        if applied {
            let emails = self
                .search
                .result()
                .map(|result| result.emails.clone())
                .unwrap_or_default();
            self.emails.set_emails(emails);
        } else if self.search.phase() == SearchPhase::Failed {
            alert("Error searching emails");
        }
    }

    fn save_as_new(&mut self) {
        let mut needs_refresh = false;
        self.runtime
            .block_on(self.search.save_as_new(&self.api, || needs_refresh = true));
        if needs_refresh {
            self.runtime
                .block_on(self.dashboard.load_collections(&self.api));
        }
    }

    fn append_to_existing(&mut self) {
        let mut needs_refresh = false;
        self.runtime
            .block_on(self.search.append_to_existing(&self.api, || needs_refresh = true));
        if needs_refresh {
            self.runtime
                .block_on(self.dashboard.load_collections(&self.api));
        }
    }

    fn apply_collection_action(&mut self, action: CollectionAction) {
        match action {
            CollectionAction::Toggle(id) => self.dashboard.toggle_expanded(&id),
            CollectionAction::Activate(collection_id, gmail_id) => self
                .dashboard
                .set_active_email(&collection_id, Some(gmail_id)),
            CollectionAction::Delete(id, name) => {
                if confirm(
                    "Delete collection",
                    &format!("Delete the collection \"{name}\"? This cannot be undone."),
                ) {
                    self.runtime
                        .block_on(self.dashboard.delete_collection(&self.api, &id));
                }
            }
            CollectionAction::RemoveEmail(collection_id, gmail_id) => {
                if confirm(
                    "Remove email",
                    "Remove this email from the collection?",
                ) {
                    self.runtime.block_on(self.dashboard.remove_email(
                        &self.api,
                        &collection_id,
                        &gmail_id,
                    ));
                }
            }
        }
    }
}

fn confirm(title: &str, description: &str) -> bool {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        == rfd::MessageDialogResult::Yes
}

fn alert(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Sendra")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

impl eframe::App for SendraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Sendra");
                ui.label(egui::RichText::new("AI-powered email insights").weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.session.is_authenticated() {
                        if ui.button("Logout").clicked() {
                            self.logout();
                            return;
                        }
                        if let Some(user) = self.session.user() {
                            ui.label(format!("Signed in as {}", user.display_name()));
                        }
                    }
                    if !self.status.is_empty() {
                        ui.label(egui::RichText::new(&self.status).weak());
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Login => self.show_login(ui),
            View::Callback => self.show_callback(ui),
            View::Dashboard => self.show_dashboard(ui),
        });
    }
}

impl SendraApp {
    fn show_login(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading("Sendra");
            ui.label("AI-Powered Email Management");
            ui.add_space(16.0);

            if ui
                .button(egui::RichText::new("Sign in with Google").strong())
                .clicked()
            {
                self.start_login();
            }

            ui.add_space(24.0);
            ui.label(egui::RichText::new("Features").strong());
            ui.label("Natural language email search");
            ui.label("Application tracking");
            ui.label("Advanced analytics");
        });
    }

    fn show_callback(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);

            if let Some(error) = self.auth_error.clone() {
                ui.label(egui::RichText::new(error).color(REJECTED_COLOR));
                ui.add_space(8.0);
                if ui.button("Back to Login").clicked() {
                    self.auth_error = None;
                    self.view = View::Login;
                }
                return;
            }

            ui.heading("Finish signing in");
            ui.label("Approve access in the browser, then paste the authorization code below.");
            ui.add_space(12.0);

            ui.add(
                egui::TextEdit::singleline(&mut self.auth_code)
                    .hint_text("Authorization code")
                    .desired_width(360.0),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Complete sign-in").clicked() {
                    self.complete_sign_in();
                }
                if ui.button("Back to Login").clicked() {
                    self.view = View::Login;
                }
            });
        });
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        if self.dashboard.summary_loading() {
            ui.centered_and_justified(|ui| {
                ui.label("Loading dashboard...");
            });
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Application Dashboard");
            ui.label(egui::RichText::new("AI-powered email insights and opportunity tracking").weak());
            ui.add_space(12.0);

            self.show_search_panel(ui);
            ui.add_space(12.0);
            self.show_results_table(ui);
            ui.add_space(12.0);
            self.show_metrics(ui);
            ui.add_space(12.0);
            self.show_collections(ui);
        });
    }

    fn show_search_panel(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("AI-Powered Email Search").strong());
        ui.label(egui::RichText::new("Type natural language queries to find emails").weak());
        ui.add_space(4.0);

        let searching = self.search.searching();
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                !searching,
                egui::TextEdit::singleline(&mut self.search.prompt)
                    .hint_text("e.g. 'Show me all job offers from tech companies'")
                    .desired_width(480.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

            let label = if searching { "Searching..." } else { "Search" };
            let clicked = ui
                .add_enabled(
                    !searching && !self.search.prompt.trim().is_empty(),
                    egui::Button::new(label),
                )
                .clicked();

            if submitted || clicked {
                self.run_search();
            }
        });

        if self.config.ui.show_example_prompts {
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new("Try these:").weak());
                for example in EXAMPLE_PROMPTS {
                    if ui.small_button(*example).clicked() {
                        self.search.prompt = example.to_string();
                    }
                }
            });
        }

        let Some(result) = self.search.result().cloned() else {
            return;
        };

        ui.add_space(8.0);
        ui.label(format!(
            "Intent: {} | Found: {} emails",
            result.query_intent, result.count
        ));
        ui.label(egui::RichText::new(&result.summary).weak());
        if let Some(error) = &result.error {
            ui.label(egui::RichText::new(error).color(REJECTED_COLOR));
        }

        self.show_save_controls(ui);
        self.show_result_list(ui, &result);
    }

    fn show_save_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        let saving = self.search.saving();
        let selected = self.search.selection_len();

        ui.horizontal_wrapped(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.search.collection_name)
                    .hint_text("New collection name")
                    .desired_width(200.0),
            );

            let save_label = if saving {
                "Saving...".to_string()
            } else {
                format!("Save {selected} selected")
            };
            if ui
                .add_enabled(!saving, egui::Button::new(save_label))
                .clicked()
            {
                self.save_as_new();
            }

            ui.separator();

            let target_name = self
                .search
                .target_collection
                .as_deref()
                .and_then(|id| {
                    self.dashboard
                        .collections()
                        .iter()
                        .find(|collection| collection.id == id)
                })
                .map(|collection| collection.name.clone())
                .unwrap_or_else(|| "Add to existing...".to_string());

            egui::ComboBox::from_id_salt("append_target")
                .selected_text(target_name)
                .show_ui(ui, |ui| {
                    for collection in self.dashboard.collections() {
                        ui.selectable_value(
                            &mut self.search.target_collection,
                            Some(collection.id.clone()),
                            collection.name.as_str(),
                        );
                    }
                });

            let can_append = !saving && self.search.target_collection.is_some();
            if ui
                .add_enabled(can_append, egui::Button::new("Add to selected"))
                .clicked()
            {
                self.append_to_existing();
            }

            if let Some(feedback) = self.search.feedback() {
                let color = match feedback.kind {
                    FeedbackKind::Success => OFFER_COLOR,
                    FeedbackKind::Error => REJECTED_COLOR,
                };
                ui.label(egui::RichText::new(&feedback.message).color(color));
            }
        });
    }

    fn show_result_list(&mut self, ui: &mut egui::Ui, result: &sendra_core::SearchResult) {
        if result.emails.is_empty() {
            return;
        }

        ui.add_space(8.0);
        let mut pending: Option<SearchAction> = None;

        ui.columns(2, |columns| {
            egui::ScrollArea::vertical()
                .id_salt("result_rows")
                .max_height(320.0)
                .show(&mut columns[0], |ui| {
                    for email in &result.emails {
                        ui.horizontal(|ui| {
                            let mut checked = self.search.is_selected(&email.gmail_id);
                            if ui.checkbox(&mut checked, "").changed() {
                                pending = Some(SearchAction::Toggle(email.gmail_id.clone()));
                            }

                            let active = self
                                .search
                                .active_email()
                                .map(|active| active.gmail_id == email.gmail_id)
                                .unwrap_or(false);
                            ui.vertical(|ui| {
                                if ui
                                    .selectable_label(active, email.display_subject())
                                    .clicked()
                                {
                                    pending =
                                        Some(SearchAction::Activate(email.gmail_id.clone()));
                                }
                                ui.label(
                                    egui::RichText::new(format!("From: {}", email.from_address))
                                        .weak(),
                                );
                                if let Some(received) = &email.received_at {
                                    ui.label(egui::RichText::new(received).weak());
                                }
                            });
                        });
                        ui.separator();
                    }
                });

            let ui = &mut columns[1];
            match self.search.active_email() {
                Some(email) => {
                    ui.label(egui::RichText::new(email.display_subject()).strong());
                    ui.label(format!("From: {}", email.from_address));
                    if let Some(received) = &email.received_at {
                        ui.label(egui::RichText::new(received).weak());
                    }
                    ui.add_space(6.0);
                    egui::ScrollArea::vertical()
                        .id_salt("result_body")
                        .max_height(280.0)
                        .show(ui, |ui| {
                            ui.label(email.display_body());
                        });
                }
                None => {
                    ui.label(egui::RichText::new("Select an email to view its body.").weak());
                }
            }
        });

        match pending {
            Some(SearchAction::Toggle(id)) => self.search.toggle_selected(&id),
            Some(SearchAction::Activate(id)) => self.search.set_active_email(Some(id)),
            None => {}
        }
    }

    fn show_results_table(&mut self, ui: &mut egui::Ui) {
        let emails = self.emails.emails();
        if emails.is_empty() {
            return;
        }

        ui.label(egui::RichText::new("Search Results").strong());
        let selected = self
            .emails
            .selected_email()
            .map(|email| email.gmail_id.clone());
        let mut pending: Option<String> = None;

        for email in emails {
            ui.horizontal(|ui| {
                let is_selected = selected.as_deref() == Some(email.gmail_id.as_str());
                if ui
                    .selectable_label(is_selected, email.display_subject())
                    .clicked()
                {
                    pending = Some(email.gmail_id.clone());
                }
                ui.label(egui::RichText::new(&email.from_address).weak());
                if let Some(received) = &email.received_at {
                    ui.label(egui::RichText::new(received).weak());
                }
                ui.label(egui::RichText::new(format!("{}...", email.preview(100))).weak());
            });
        }

        if let Some(gmail_id) = pending {
            self.emails.set_selected(Some(gmail_id));
        }
        if let Some(email) = self.emails.selected_email() {
            ui.add_space(4.0);
            ui.label(email.display_body());
        }
    }

    fn show_metrics(&mut self, ui: &mut egui::Ui) {
        let Some(summary) = self.dashboard.summary().cloned() else {
            if let Some(status) = self.dashboard.status() {
                ui.label(egui::RichText::new(status).color(REJECTED_COLOR));
            }
            return;
        };

        let funnel = summary.funnel.unwrap_or_default();
        ui.columns(4, |columns| {
            stat_card(&mut columns[0], "Total Emails", summary.stats.total);
            stat_card(&mut columns[1], "Applications", funnel.applied);
            stat_card(&mut columns[2], "Interviews", funnel.interview);
            stat_card(&mut columns[3], "Offers", funnel.offer);
        });

        ui.add_space(12.0);
        ui.columns(2, |columns| {
            bar_chart_ui(
                &mut columns[0],
                "Application Status",
                charts::status_chart(&summary.by_status),
            );
            pie_chart_ui(
                &mut columns[1],
                "Job Type Distribution",
                charts::job_type_chart(&summary.by_type),
            );
        });

        ui.add_space(12.0);
        ui.columns(2, |columns| {
            bar_chart_ui(
                &mut columns[0],
                "Application Funnel",
                charts::funnel_chart(summary.funnel.as_ref()),
            );
            bar_chart_ui(
                &mut columns[1],
                "Experience Level",
                charts::experience_chart(&summary.by_experience),
            );
        });

        ui.add_space(12.0);
        line_chart_ui(
            ui,
            "Applications Over Time",
            charts::applications_over_time(&summary.applications_over_time),
        );

        ui.add_space(12.0);
        ui.columns(2, |columns| {
            ranked_list_ui(&mut columns[0], "Top Companies", &summary.top_companies);
            ranked_list_ui(&mut columns[1], "Top Positions", &summary.top_positions);
        });

        ui.add_space(12.0);
        insights_ui(ui, summary.predictive_insights.as_ref());
    }

    fn show_collections(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Collections").strong());
        if self.dashboard.collections_loading() {
            ui.label(egui::RichText::new("Loading collections...").weak());
            return;
        }

        if self.dashboard.collections().is_empty() {
            ui.label(
                egui::RichText::new("No collections yet. Save a search to create one.").weak(),
            );
            return;
        }

        let mut pending: Option<CollectionAction> = None;
        let expanded = self.dashboard.expanded_collection().map(str::to_string);

        for collection in self.dashboard.collections() {
            let is_expanded = expanded.as_deref() == Some(collection.id.as_str());

            ui.horizontal(|ui| {
                let toggle_label = if is_expanded { "Collapse" } else { "Expand" };
                if ui.small_button(toggle_label).clicked() {
                    pending = Some(CollectionAction::Toggle(collection.id.clone()));
                }
                ui.label(egui::RichText::new(&collection.name).strong());
                ui.label(
                    egui::RichText::new(format!("{} emails", collection.emails.len())).weak(),
                );
                if let Some(created_at) = collection.created_at {
                    ui.label(
                        egui::RichText::new(created_at.format("%Y-%m-%d").to_string()).weak(),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Delete").clicked() {
                        pending = Some(CollectionAction::Delete(
                            collection.id.clone(),
                            collection.name.clone(),
                        ));
                    }
                });
            });

            if is_expanded {
                ui.indent(&collection.id, |ui| {
                    if collection.emails.is_empty() {
                        ui.label(egui::RichText::new("No emails in this collection.").weak());
                    }
                    for email in &collection.emails {
                        ui.horizontal(|ui| {
                            let active = self
                                .dashboard
                                .active_email()
                                .map(|active| active.gmail_id == email.gmail_id)
                                .unwrap_or(false);
                            if ui
                                .selectable_label(active, email.display_subject())
                                .clicked()
                            {
                                pending = Some(CollectionAction::Activate(
                                    collection.id.clone(),
                                    email.gmail_id.clone(),
                                ));
                            }
                            ui.label(egui::RichText::new(&email.from_address).weak());
                            if ui.small_button("Remove").clicked() {
                                pending = Some(CollectionAction::RemoveEmail(
                                    collection.id.clone(),
                                    email.gmail_id.clone(),
                                ));
                            }
                        });
                    }
                });
            }

            ui.separator();
        }

        if let Some(email) = self.dashboard.active_email() {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(email.display_subject()).strong());
            ui.label(format!("From: {}", email.from_address));
            ui.label(email.display_body());
        }

        if let Some(action) = pending {
            self.apply_collection_action(action);
        }
    }
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: u64) {
    ui.label(egui::RichText::new(label).weak());
    ui.label(egui::RichText::new(value.to_string()).heading());
}

fn bar_chart_ui(ui: &mut egui::Ui, title: &str, chart: Option<charts::BarChart>) {
    ui.label(egui::RichText::new(title).strong());
    let Some(chart) = chart else {
        ui.label(egui::RichText::new("No data available").weak());
        return;
    };

    for bar in &chart.bars {
        let fraction = if chart.max == 0 {
            0.0
        } else {
            bar.value as f32 / chart.max as f32
        };
        ui.add(egui::ProgressBar::new(fraction).text(format!("{}: {}", bar.label, bar.value)));
    }
}

fn pie_chart_ui(ui: &mut egui::Ui, title: &str, chart: Option<charts::PieChart>) {
    ui.label(egui::RichText::new(title).strong());
    let Some(chart) = chart else {
        ui.label(egui::RichText::new("No data available").weak());
        return;
    };

    for slice in &chart.slices {
        ui.add(egui::ProgressBar::new(slice.fraction as f32).text(format!(
            "{}: {} ({:.0}%)",
            slice.label,
            slice.value,
            slice.fraction * 100.0
        )));
    }
}

fn line_chart_ui(ui: &mut egui::Ui, title: &str, chart: Option<charts::LineChart>) {
    ui.label(egui::RichText::new(title).strong());
    let Some(chart) = chart else {
        ui.label(egui::RichText::new("No data available").weak());
        return;
    };

    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width().max(200.0), 160.0),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_stroke(
        rect,
        2.0,
        egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
        egui::StrokeKind::Inside,
    );

    let max = chart.max.max(1) as f32;
    let count = chart.x_labels.len();
    for (series, color) in chart.series.iter().zip(STAGE_COLORS) {
        let points: Vec<egui::Pos2> = series
            .points
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let x = if count <= 1 {
                    rect.left()
                } else {
                    rect.left() + rect.width() * index as f32 / (count - 1) as f32
                };
                let y = rect.bottom() - rect.height() * (*value as f32 / max);
                egui::pos2(x, y)
            })
            .collect();
        painter.add(egui::Shape::line(points, egui::Stroke::new(2.0, color)));
    }

    ui.horizontal(|ui| {
        for (series, color) in chart.series.iter().zip(STAGE_COLORS) {
            ui.label(egui::RichText::new(series.name).color(color));
        }
    });
}

fn ranked_list_ui(ui: &mut egui::Ui, title: &str, buckets: &[sendra_core::CountBucket]) {
    ui.label(egui::RichText::new(title).strong());
    if buckets.is_empty() {
        ui.label(egui::RichText::new("No data available").weak());
        return;
    }

    for bucket in buckets {
        ui.horizontal(|ui| {
            ui.label(bucket.display_key());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(bucket.count.to_string()).strong());
            });
        });
    }
}

fn insights_ui(ui: &mut egui::Ui, insights: Option<&sendra_core::PredictiveInsights>) {
    ui.label(egui::RichText::new("Predictive Insights").strong());
    let Some(insights) = insights.filter(|insights| insights.total_applications > 0) else {
        ui.label(egui::RichText::new("Add emails to collections to see predictions").weak());
        return;
    };

    let momentum_color = match insights.momentum {
        sendra_core::Momentum::Increasing => OFFER_COLOR,
        sendra_core::Momentum::Decreasing => REJECTED_COLOR,
        sendra_core::Momentum::Neutral => ui.visuals().text_color(),
    };

    ui.horizontal_wrapped(|ui| {
        ui.label(format!(
            "Offer probability (30d): {:.0}%",
            insights.offer_probability_30d
        ));
        ui.separator();
        match insights.expected_days_to_offer {
            Some(days) => ui.label(format!("Expected time to offer: ~{days} days")),
            None => ui.label("Expected time to offer: N/A"),
        };
        ui.separator();
        ui.label(egui::RichText::new(insights.momentum.label()).color(momentum_color));
    });
    ui.horizontal_wrapped(|ui| {
        ui.label(format!("Total applications: {}", insights.total_applications));
        ui.separator();
        ui.label(format!(
            "{} applications in last 30 days",
            insights.recent_activity
        ));
        ui.separator();
        ui.label(format!("Conversion rate: {:.0}%", insights.conversion_rate));
    });
}
