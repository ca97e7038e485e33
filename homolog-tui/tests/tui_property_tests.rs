use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use homolog_core::{homolog_filter_configs, RecordId};
use homolog_query::{QueryMode, RecordFetcher};
use homolog_test_utils::fixtures::{sample_dataset, scored_records};
use homolog_test_utils::MockFetcher;
use homolog_tui::config::{ExplorerConfig, RetryConfig, ThemeConfig};
use homolog_tui::events::{spawn_fetch, TuiEvent};
use homolog_tui::keys::{map_key, map_search_key, Action, SearchInput};
use homolog_tui::nav::Route;
use homolog_tui::notifications::NotificationLevel;
use homolog_tui::state::App;
use homolog_tui::views::{grid::page_summary, render_view, PAGE_TITLE};
use proptest::prelude::*;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use tokio::sync::mpsc;

fn base_config() -> ExplorerConfig {
    ExplorerConfig {
        data_source: "data/homologs_sample.json".to_string(),
        query_mode: QueryMode::Client,
        page_size: 25,
        request_timeout_ms: 5_000,
        refresh_interval_ms: 250,
        stale_time_ms: None,
        log_path: "tmp/homolog-explorer.log".into(),
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
        retry: RetryConfig {
            max_retries: 3,
            initial_ms: 250,
            max_ms: 5_000,
            multiplier: 2.0,
        },
        static_params: None,
        filters: homolog_filter_configs(),
    }
}

fn server_config() -> ExplorerConfig {
    ExplorerConfig {
        data_source: "https://example.org/api/homologs".to_string(),
        query_mode: QueryMode::Server,
        ..base_config()
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent {
        modifiers: KeyModifiers::CONTROL,
        ..key(KeyCode::Char(c))
    }
}

/// Observe, run every queued fetch against `fetcher`, and fold the outcomes back in.
async fn drive(app: &mut App, fetcher: &MockFetcher) {
    app.sync();
    for request in app.take_requests() {
        let outcome = request.execute(fetcher).await;
        app.resolve(request.key, outcome);
    }
    app.sync();
}

fn render_text(app: &App) -> String {
    let backend = TestBackend::new(180, 50);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| render_view(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

// ============================================================================
// CONFIG
// ============================================================================

#[test]
fn config_base_is_valid() {
    assert!(base_config().validate().is_ok());
    assert!(server_config().validate().is_ok());
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_unlisted_page_size() {
    let mut config = base_config();
    config.page_size = 30;
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_duplicate_filters() {
    let mut config = base_config();
    config.filters.push(config.filters[0].clone());
    assert!(config.validate().is_err());
}

// ============================================================================
// KEYS AND ROUTES
// ============================================================================

#[test]
fn keybindings_cover_core_actions() {
    assert_eq!(map_key(key(KeyCode::Char('j'))), Some(Action::MoveDown));
    assert_eq!(map_key(key(KeyCode::Enter)), Some(Action::Select));
    assert_eq!(map_key(key(KeyCode::Char('o'))), Some(Action::OpenDetail));
    assert_eq!(map_key(key(KeyCode::PageDown)), Some(Action::NextPage));
    assert_eq!(map_key(ctrl('c')), Some(Action::Quit));
    assert_eq!(map_key(ctrl('r')), Some(Action::Refresh));
    assert_eq!(map_key(key(KeyCode::F(5))), None);
}

proptest! {
    #[test]
    fn search_mode_inserts_printable_chars(c in proptest::char::range(' ', '~')) {
        prop_assert_eq!(map_search_key(key(KeyCode::Char(c))), Some(SearchInput::Insert(c)));
    }

    #[test]
    fn detail_route_round_trips(id in "[A-Za-z0-9_.-]{1,24}") {
        let route = Route::Detail(RecordId::new(id));
        prop_assert_eq!(Route::parse(&route.path()), Some(route));
    }
}

// ============================================================================
// APP STATE
// ============================================================================

#[tokio::test]
async fn app_loads_first_page() {
    let fetcher = MockFetcher::new(sample_dataset(60));
    let mut app = App::new(base_config());
    assert!(app.result.is_pending);

    drive(&mut app, &fetcher).await;

    assert!(app.result.is_success());
    assert_eq!(app.total_rows(), 60);
    assert_eq!(app.visible_rows().len(), 25);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(page_summary(&app), "Rows 1–25 of 60 · page 1/3 · size 25");
}

#[tokio::test]
async fn app_reports_fetch_failure() {
    let fetcher = MockFetcher::failing("connection refused");
    let mut app = App::new(base_config());

    drive(&mut app, &fetcher).await;

    assert!(app.result.is_error);
    assert!(app.visible_rows().is_empty());
    let note = app.latest_notification().unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert!(note.message.contains("connection refused"));
}

#[tokio::test]
async fn reload_recovers_after_failure() {
    let fetcher = MockFetcher::failing("offline");
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;
    assert!(app.result.is_error);

    fetcher.set_failure(None);
    app.handle_key(ctrl('r'));
    drive(&mut app, &fetcher).await;

    assert!(app.result.is_success());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn paging_and_page_size() {
    let fetcher = MockFetcher::new(sample_dataset(60));
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;

    app.handle_key(key(KeyCode::Char('n')));
    app.handle_key(key(KeyCode::Char('n')));
    assert_eq!(app.page.query_state.page(), 2);
    assert_eq!(app.visible_rows().len(), 10);

    // Last page: next is a no-op.
    app.handle_key(key(KeyCode::Char('n')));
    assert_eq!(app.page.query_state.page(), 2);

    app.handle_key(key(KeyCode::Char('s')));
    assert_eq!(app.page.query_state.page_size(), 50);
    assert_eq!(app.page.query_state.page(), 0);
    assert_eq!(app.visible_rows().len(), 50);

    // Client mode never refetches for paging.
    drive(&mut app, &fetcher).await;
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn filter_change_returns_to_first_page() {
    let fetcher = MockFetcher::new(sample_dataset(60));
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;
    app.handle_key(key(KeyCode::Char('n')));
    assert_eq!(app.page.query_state.page(), 1);

    // Focus "score" and raise its lower bound one step (10).
    for _ in 0..3 {
        app.handle_key(key(KeyCode::Tab));
    }
    assert_eq!(app.page.focused_config().unwrap().field, "score");
    app.handle_key(key(KeyCode::Char('l')));

    assert_eq!(app.page.query_state.page(), 0);
    assert_eq!(app.total_rows(), 59);
    assert_eq!(app.page.filters.get("score").unwrap().bounds(), (10.0, 1000.0));

    app.handle_key(key(KeyCode::Char('c')));
    assert_eq!(app.total_rows(), 60);
}

#[tokio::test]
async fn closing_filters_panel_resets_filters() {
    let fetcher = MockFetcher::new(scored_records(&[5.0, 50.0, 500.0]));
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;
    assert!(app.page.show_filters);

    app.focus_next_filter();
    app.focus_next_filter();
    app.focus_next_filter();
    app.handle_key(KeyEvent {
        modifiers: KeyModifiers::SHIFT,
        ..key(KeyCode::Left)
    });
    assert_eq!(app.page.filters.get("score").unwrap().bounds(), (0.0, 990.0));

    app.handle_key(key(KeyCode::Char('f')));
    assert!(!app.page.show_filters);
    assert!(app.page.filters.active().is_empty());

    // Bound keys do nothing while the panel is hidden.
    app.handle_key(key(KeyCode::Char('l')));
    assert!(app.page.filters.active().is_empty());

    app.handle_key(key(KeyCode::Char('f')));
    assert!(app.page.show_filters);
}

#[tokio::test]
async fn search_filters_live() {
    let fetcher = MockFetcher::new(sample_dataset(60));
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;

    app.handle_key(key(KeyCode::Char('/')));
    assert!(app.page.search_editing);
    for c in "potri.rec-7.1".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(app.total_rows(), 1);
    assert_eq!(app.visible_rows()[0].id, RecordId::new("rec-7"));

    // 'q' is text while editing, not quit.
    assert!(!app.handle_key(key(KeyCode::Char('q'))));
    assert_eq!(app.total_rows(), 0);

    app.handle_key(ctrl('u'));
    assert_eq!(app.total_rows(), 60);
    app.handle_key(key(KeyCode::Esc));
    assert!(!app.page.search_editing);
    assert!(app.handle_key(key(KeyCode::Char('q'))));
}

#[tokio::test]
async fn preview_and_detail_navigation() {
    let fetcher = MockFetcher::new(sample_dataset(30));
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;

    // Nothing highlighted yet: Enter and 'o' are no-ops.
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('o')));
    assert!(app.page.preview.is_none());
    assert_eq!(app.route, Route::Explore);

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    let previewed = app.page.preview.clone().unwrap();
    assert_eq!(previewed.id, RecordId::new("rec-1"));

    app.handle_key(key(KeyCode::Char('o')));
    assert_eq!(app.route, Route::Detail(RecordId::new("rec-1")));
    assert_eq!(app.route.path(), "/explore-data/rec-1");
    assert_eq!(app.detail_record(), Some(&previewed));

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.route, Route::Explore);
    assert!(app.page.preview.is_some());
    app.handle_key(key(KeyCode::Esc));
    assert!(app.page.preview.is_none());
}

#[tokio::test]
async fn selection_wraps_around_page() {
    let fetcher = MockFetcher::new(sample_dataset(3));
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;

    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.page.selected, Some(2));
    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.page.selected, Some(0));
}

#[tokio::test]
async fn server_mode_fetches_each_page() {
    let fetcher = MockFetcher::new(sample_dataset(60));
    let mut app = App::new(server_config());
    drive(&mut app, &fetcher).await;

    assert_eq!(app.total_rows(), 60);
    assert_eq!(app.visible_rows().len(), 25);
    assert_eq!(fetcher.calls(), 1);

    app.handle_key(key(KeyCode::Char('n')));
    drive(&mut app, &fetcher).await;
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(app.visible_rows()[0].id, RecordId::new("rec-25"));

    // Back to a cached page.
    app.handle_key(key(KeyCode::Char('p')));
    drive(&mut app, &fetcher).await;
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(app.visible_rows()[0].id, RecordId::new("rec-0"));
}

#[tokio::test]
async fn spawned_fetch_reports_back() {
    let fetcher: Arc<dyn RecordFetcher> = Arc::new(MockFetcher::new(sample_dataset(4)));
    let mut app = App::new(base_config());
    app.sync();
    let requests = app.take_requests();
    assert_eq!(requests.len(), 1);

    let (tx, mut rx) = mpsc::channel(4);
    for request in requests {
        spawn_fetch(request, Arc::clone(&fetcher), tx.clone())
            .await
            .unwrap();
    }

    match rx.recv().await {
        Some(TuiEvent::QueryResolved { key, outcome }) => app.resolve(key, outcome),
        other => panic!("unexpected event: {:?}", other),
    }
    app.sync();
    assert_eq!(app.total_rows(), 4);
    assert!(app.take_requests().is_empty());
}

// ============================================================================
// RENDERING
// ============================================================================

#[tokio::test]
async fn render_pending_then_loaded() {
    let fetcher = MockFetcher::new(sample_dataset(30));
    let mut app = App::new(base_config());
    app.sync();

    let pending = render_text(&app);
    assert!(pending.contains(PAGE_TITLE));
    assert!(pending.contains("Loading"));
    assert!(pending.contains("Filters [f]"));

    drive(&mut app, &fetcher).await;
    let loaded = render_text(&app);
    assert!(loaded.contains("Query Transcript"));
    assert!(loaded.contains("Potri.rec-0.1"));
    assert!(loaded.contains("Rows 1–25 of 30"));
}

#[tokio::test]
async fn render_error_alert() {
    let fetcher = MockFetcher::failing("boom");
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;

    let text = render_text(&app);
    assert!(text.contains("Failed to load homolog data"));
}

#[tokio::test]
async fn render_preview_and_detail() {
    let fetcher = MockFetcher::new(sample_dataset(5));
    let mut app = App::new(base_config());
    drive(&mut app, &fetcher).await;
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));

    let preview = render_text(&app);
    assert!(preview.contains("Query Information"));
    assert!(preview.contains("Alignment Statistics"));
    assert!(preview.contains("View details [o]"));

    app.handle_key(key(KeyCode::Char('o')));
    let detail = render_text(&app);
    assert!(detail.contains("/explore-data/rec-0"));
    assert!(detail.contains("All fields"));
}

#[test]
fn render_help_overlay() {
    let mut app = App::new(base_config());
    app.handle_key(key(KeyCode::Char('?')));
    assert!(app.help_visible);
    assert!(render_text(&app).contains("Keys (any key closes)"));
    app.handle_key(key(KeyCode::Char('j')));
    assert!(!app.help_visible);
}
