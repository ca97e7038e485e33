//! Application state for the explorer.
//!
//! [`App`] owns the page state and the list query. All mutation happens on
//! the event loop task; fetches go out through [`App::take_requests`] and
//! come back through [`App::resolve`].

use crate::config::ExplorerConfig;
use crate::keys::{map_key, map_search_key, Action, SearchInput};
use crate::nav::Route;
use crate::notifications::{Notification, NotificationLevel};
use crate::theme::SynthBruteTheme;
use crossterm::event::KeyEvent;
use homolog_core::{
    filter_data, FilterConfig, FilterStore, HomologRecord, PaginationModel, QueryState, RangeBound,
};
use homolog_query::{
    DataSource, FetchError, FetchRequest, ListData, ListQuery, ListQueryParams, ListQueryResult,
    QueryKey, QueryMode,
};

/// Page-lifetime state of the explorer route.
#[derive(Debug, Clone)]
pub struct ExplorerPage {
    pub filter_configs: Vec<FilterConfig>,
    pub filters: FilterStore,
    pub show_filters: bool,
    pub focused_filter: usize,
    pub search_term: String,
    pub search_editing: bool,
    pub query_state: QueryState,
    /// Highlighted row, as an index into the visible page.
    pub selected: Option<usize>,
    pub first_column: usize,
    pub preview: Option<HomologRecord>,
}

impl ExplorerPage {
    pub fn new(filter_configs: Vec<FilterConfig>, page_size: usize) -> Self {
        Self {
            filter_configs,
            filters: FilterStore::new(),
            show_filters: true,
            focused_filter: 0,
            search_term: String::new(),
            search_editing: false,
            query_state: QueryState::new(page_size),
            selected: None,
            first_column: 0,
            preview: None,
        }
    }

    pub fn focused_config(&self) -> Option<&FilterConfig> {
        self.filter_configs.get(self.focused_filter)
    }
}

pub struct App {
    pub config: ExplorerConfig,
    pub theme: SynthBruteTheme,
    pub source: DataSource,
    pub route: Route,
    pub page: ExplorerPage,
    pub query: ListQuery,
    pub result: ListQueryResult,
    pub notifications: Vec<Notification>,
    pub help_visible: bool,
    pub tick: u64,
    outbox: Vec<FetchRequest>,
}

fn list_params<'a>(
    config: &'a ExplorerConfig,
    source: &'a DataSource,
    page: &'a ExplorerPage,
) -> ListQueryParams<'a> {
    ListQueryParams::new(source, page.filters.active(), &page.filter_configs)
        .with_mode(config.query_mode)
        .with_pagination(&page.query_state)
        .with_static_params(config.static_params.as_ref())
        .with_search(&page.search_term)
}

impl App {
    pub fn new(config: ExplorerConfig) -> Self {
        let page = ExplorerPage::new(config.filters.clone(), config.page_size);
        Self {
            theme: SynthBruteTheme::synthbrute(),
            source: config.data_source(),
            route: Route::Explore,
            page,
            query: ListQuery::new(config.query_config()),
            result: ListQueryResult::pending(),
            notifications: Vec::new(),
            help_visible: false,
            tick: 0,
            outbox: Vec::new(),
            config,
        }
    }

    /// Observe the current parameters, queueing a fetch when one is needed.
    pub fn sync(&mut self) {
        let params = list_params(&self.config, &self.source, &self.page);
        if let Some(request) = self.query.observe(&params) {
            tracing::debug!(key = %request.key, "Queueing fetch");
            self.outbox.push(request);
        }
        self.result = self.query.result();
    }

    /// Drop cached data for the current parameters and fetch again.
    pub fn reload(&mut self) {
        let params = list_params(&self.config, &self.source, &self.page);
        if let Some(request) = self.query.refetch(&params) {
            self.outbox.push(request);
        }
        self.result = self.query.result();
        self.notify(NotificationLevel::Info, "Reloading data");
    }

    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn resolve(&mut self, key: QueryKey, outcome: Result<ListData, FetchError>) {
        let is_current = self.query.current_key() == Some(&key);
        if is_current {
            match &outcome {
                Ok(data) => self.notify(
                    NotificationLevel::Success,
                    format!("Loaded {} of {} rows", data.rows.len(), data.total_count),
                ),
                Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
            }
        }
        self.query.resolve(key, outcome);
        self.result = self.query.result();

        if self.config.query_mode == QueryMode::Client {
            let total = self.total_rows();
            self.page.query_state.clamp_to(total);
        }
        self.clamp_selection();
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    fn filtered_rows(&self) -> Vec<&HomologRecord> {
        filter_data(
            self.result.rows(),
            self.page.filters.active(),
            &self.page.filter_configs,
            &self.page.search_term,
        )
    }

    /// Rows of the current page after filtering and search.
    pub fn visible_rows(&self) -> Vec<&HomologRecord> {
        match self.config.query_mode {
            QueryMode::Client => {
                let filtered = self.filtered_rows();
                self.page.query_state.page_slice(filtered.as_slice()).to_vec()
            }
            QueryMode::Server => self.result.rows().iter().collect(),
        }
    }

    /// Row count across all pages.
    pub fn total_rows(&self) -> usize {
        match self.config.query_mode {
            QueryMode::Client => self.filtered_rows().len(),
            QueryMode::Server => self
                .result
                .data
                .as_ref()
                .map(|data| data.total_count)
                .unwrap_or(0),
        }
    }

    pub fn selected_row(&self) -> Option<&HomologRecord> {
        let index = self.page.selected?;
        self.visible_rows().get(index).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.page.selected = None;
            return;
        }
        self.page.selected = Some(match self.page.selected {
            None => 0,
            Some(index) => (index + 1) % len,
        });
    }

    pub fn select_previous(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.page.selected = None;
            return;
        }
        self.page.selected = Some(match self.page.selected {
            None | Some(0) => len - 1,
            Some(index) => index - 1,
        });
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if let Some(index) = self.page.selected {
            if index >= len {
                self.page.selected = len.checked_sub(1);
            }
        }
    }

    // ------------------------------------------------------------------
    // Preview and navigation
    // ------------------------------------------------------------------

    pub fn open_preview(&mut self) -> bool {
        match self.selected_row().cloned() {
            Some(record) => {
                tracing::debug!(id = %record.id, "Previewing record");
                self.page.preview = Some(record);
                true
            }
            None => false,
        }
    }

    pub fn close_preview(&mut self) {
        self.page.preview = None;
    }

    /// Follow the preview panel's "View details" link.
    pub fn open_detail(&mut self) -> bool {
        let Some(id) = self.page.preview.as_ref().map(|record| record.id.clone()) else {
            return false;
        };
        self.navigate(Route::Detail(id));
        true
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::info!(path = %route.path(), "Navigating");
        self.route = route;
    }

    /// Record shown by the detail route, if it is loaded.
    pub fn detail_record(&self) -> Option<&HomologRecord> {
        let Route::Detail(id) = &self.route else {
            return None;
        };
        self.page
            .preview
            .as_ref()
            .filter(|record| &record.id == id)
            .or_else(|| self.result.rows().iter().find(|record| &record.id == id))
    }

    // ------------------------------------------------------------------
    // Filters and search
    // ------------------------------------------------------------------

    /// Closing the panel discards its filters.
    pub fn toggle_filters(&mut self) {
        if self.page.show_filters {
            self.page.show_filters = false;
            self.reset_filters();
        } else {
            self.page.show_filters = true;
        }
    }

    pub fn focus_next_filter(&mut self) {
        let len = self.page.filter_configs.len();
        if len > 0 {
            self.page.focused_filter = (self.page.focused_filter + 1) % len;
        }
    }

    pub fn focus_previous_filter(&mut self) {
        let len = self.page.filter_configs.len();
        if len > 0 {
            self.page.focused_filter = (self.page.focused_filter + len - 1) % len;
        }
    }

    pub fn nudge_filter(&mut self, bound: RangeBound, steps: i32) {
        if !self.page.show_filters {
            return;
        }
        let Some(config) = self.page.focused_config().cloned() else {
            return;
        };
        self.page.filters.nudge(&config, bound, steps);
        self.criteria_changed();
    }

    pub fn clear_focused_filter(&mut self) {
        let Some(field) = self.page.focused_config().map(|config| config.field.clone()) else {
            return;
        };
        if self.page.filters.clear_field(&field) {
            self.criteria_changed();
        }
    }

    pub fn reset_filters(&mut self) {
        let before = self.page.filters.revision();
        self.page.filters.reset();
        if self.page.filters.revision() != before {
            self.criteria_changed();
        }
    }

    pub fn begin_search(&mut self) {
        self.page.search_editing = true;
    }

    pub fn search_input(&mut self, input: SearchInput) {
        match input {
            SearchInput::Insert(c) => {
                self.page.search_term.push(c);
                self.criteria_changed();
            }
            SearchInput::Backspace => {
                if self.page.search_term.pop().is_some() {
                    self.criteria_changed();
                }
            }
            SearchInput::Clear => {
                if !self.page.search_term.is_empty() {
                    self.page.search_term.clear();
                    self.criteria_changed();
                }
            }
            SearchInput::Submit | SearchInput::Cancel => self.page.search_editing = false,
        }
    }

    /// New filter or search criteria start again from the first page.
    fn criteria_changed(&mut self) {
        let page_size = self.page.query_state.page_size();
        self.page
            .query_state
            .apply(PaginationModel { page: 0, page_size });
        self.page.selected = None;
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    pub fn next_page(&mut self) {
        let total = self.total_rows();
        if self.page.query_state.next_page(total) {
            self.page.selected = None;
        }
    }

    pub fn previous_page(&mut self) {
        if self.page.query_state.previous_page() {
            self.page.selected = None;
        }
    }

    pub fn cycle_page_size(&mut self) {
        if self.page.query_state.cycle_page_size() {
            self.page.selected = None;
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Route a key to search editing or to an action. Returns `true` to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.page.search_editing {
            if let Some(input) = map_search_key(key) {
                self.search_input(input);
            }
            return false;
        }
        match map_key(key) {
            Some(action) => self.handle_action(action),
            None => false,
        }
    }

    pub fn handle_action(&mut self, action: Action) -> bool {
        if self.help_visible {
            match action {
                Action::Quit => return true,
                _ => {
                    self.help_visible = false;
                    return false;
                }
            }
        }

        if let Route::Detail(_) = self.route {
            match action {
                Action::Quit => return true,
                Action::Cancel => self.navigate(Route::Explore),
                Action::OpenHelp => self.help_visible = true,
                Action::Refresh => self.reload(),
                _ => {}
            }
            return false;
        }

        match action {
            Action::Quit => return true,
            Action::OpenHelp => self.help_visible = true,
            Action::Cancel => self.close_preview(),
            Action::MoveUp => self.select_previous(),
            Action::MoveDown => self.select_next(),
            Action::NextPage => self.next_page(),
            Action::PrevPage => self.previous_page(),
            Action::CyclePageSize => self.cycle_page_size(),
            Action::Select => {
                self.open_preview();
            }
            Action::OpenDetail => {
                self.open_detail();
            }
            Action::ToggleFilters => self.toggle_filters(),
            Action::NextFilter => self.focus_next_filter(),
            Action::PrevFilter => self.focus_previous_filter(),
            Action::LowerDown => self.nudge_filter(RangeBound::Lower, -1),
            Action::LowerUp => self.nudge_filter(RangeBound::Lower, 1),
            Action::UpperDown => self.nudge_filter(RangeBound::Upper, -1),
            Action::UpperUp => self.nudge_filter(RangeBound::Upper, 1),
            Action::ClearFilter => self.clear_focused_filter(),
            Action::ResetFilters => self.reset_filters(),
            Action::OpenSearch => self.begin_search(),
            Action::ScrollLeft => {
                self.page.first_column = self.page.first_column.saturating_sub(1);
            }
            Action::ScrollRight => {
                let last = crate::columns::HOMOLOG_COLUMNS.len() - 1;
                self.page.first_column = (self.page.first_column + 1).min(last);
            }
            Action::Refresh => self.reload(),
        }
        false
    }
}
