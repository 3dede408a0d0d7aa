#![allow(clippy::unwrap_used)]
// Screen-level tests against a mocked hub.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cececo_core::{
    EntryStatus, FacetDimension, FilterField, HubClient, HubConfig, ListingScreen, LoadOutcome,
    LoadState, Location, MemoryLocation, ProjectKind, ProjectScreen,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HubClient) {
    let server = MockServer::start().await;
    let client = HubClient::new(&server.uri(), &Default::default()).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v1/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "name": "Ghana", "iso2": "GH" },
            { "id": 7, "name": "Kenya", "iso2": "KE" }
        ])))
        .mount(&server)
        .await;
    (server, client)
}

fn project(id: u32, country_id: u32, sector: &str) -> Value {
    json!({
        "id": id,
        "kind": "project",
        "country_id": country_id,
        "title": format!("Project {id}"),
        "summary": "Energy access",
        "sector": sector,
        "stage": "seed"
    })
}

fn investor(id: u32, name: &str, sectors: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "investor_type": "fund",
        "focus_sectors": sectors,
        "stages": "seed, growth"
    })
}

fn location(query: &str) -> Arc<MemoryLocation> {
    Arc::new(MemoryLocation::new(query))
}

fn project_screen(client: HubClient, location: Arc<MemoryLocation>) -> ProjectScreen {
    ProjectScreen::new(client, ProjectKind::Project, &HubConfig::default(), location)
}

// ── Investors ───────────────────────────────────────────────────────

#[tokio::test]
async fn investor_screen_loads_from_link_and_narrows_by_facet() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/investors"))
        .and(query_param("country_id", "7"))
        .and(query_param("investor_type", "fund"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            investor(1, "Solar Fund", "Solar"),
            investor(2, "Wind Fund", "Wind"),
            investor(3, "Mixed Fund", "Solar, Wind")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let screen = ListingScreen::investors(client, location("?investor_type=fund&country_id=7"));
    assert!(screen.load().await.is_applied());

    assert_eq!(screen.country_name(7), "Kenya");
    assert_eq!(
        screen.facets().values(FacetDimension::Sector),
        ["Solar", "Wind"]
    );
    assert_eq!(
        screen.facets().values(FacetDimension::Stage),
        ["growth", "seed"]
    );

    screen.toggle_facet(FacetDimension::Sector, "solar");
    let names: Vec<String> = screen.items().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["Solar Fund", "Mixed Fund"]);
    assert_eq!(screen.loaded_count(), 3);
}

// ── Projects ────────────────────────────────────────────────────────

#[tokio::test]
async fn country_filter_triggers_exactly_one_load() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("country_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([project(2, 7, "Wind")])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("kind", "project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project(1, 3, "Solar"),
            project(2, 7, "Wind"),
            project(3, 3, "Hydro")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let loc = location("");
    let screen = project_screen(client, loc.clone());
    assert!(screen.sync().await.unwrap().is_applied());
    assert_eq!(screen.listing().items().len(), 3);

    assert!(screen.set_field(FilterField::CountryId, "7"));
    assert_eq!(loc.query(), "country_id=7");
    assert!(screen.sync().await.unwrap().is_applied());

    let items = screen.listing().items();
    assert_eq!(items.len(), 1);
    assert!(items.iter().all(|p| p.country_id == 7));

    // Same key again: nothing to do.
    assert!(screen.sync().await.is_none());
}

#[tokio::test]
async fn slower_older_load_is_superseded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("q", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([project(1, 3, "Solar")]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("q", "fast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([project(2, 7, "Wind")])),
        )
        .mount(&server)
        .await;

    let screen = project_screen(client, location("q=slow"));
    let (first, second) = tokio::join!(screen.load(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        screen.set_field(FilterField::Q, "fast");
        screen.load().await
    });

    assert!(matches!(first, LoadOutcome::Superseded));
    assert!(second.is_applied());
    let items = screen.listing().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 2);
}

#[tokio::test]
async fn failed_load_surfaces_one_message_and_retries() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([project(1, 3, "Solar")])))
        .mount(&server)
        .await;

    let screen = project_screen(client, location("q=grid"));
    let outcome = screen.load().await;
    assert!(matches!(outcome, LoadOutcome::Failed(ref e) if e.to_string() == "database unavailable"));
    assert!(matches!(screen.listing().state(), LoadState::Failed { .. }));
    assert_eq!(screen.listing().error().as_deref(), Some("database unavailable"));
    assert!(screen.listing().items().is_empty());

    assert!(screen.retry().await.unwrap().is_applied());
    assert_eq!(screen.listing().items().len(), 1);

    let requests = server.received_requests().await.unwrap();
    let retried = requests
        .iter()
        .rev()
        .find(|r| r.url.path() == "/api/v1/projects")
        .unwrap();
    assert!(retried.url.query_pairs().any(|(k, v)| k == "q" && v == "grid"));
}

#[tokio::test]
async fn editing_a_filter_clears_the_error_display() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let screen = project_screen(client, location(""));
    screen.load().await;
    assert_eq!(
        screen.listing().error().as_deref(),
        Some("request failed with status 503")
    );

    screen.set_field(FilterField::Q, "solar");
    assert_eq!(screen.listing().error(), None);
}

// ── Match panels ────────────────────────────────────────────────────

#[tokio::test]
async fn match_panel_fetches_once_and_resets_on_key_change() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([project(11, 7, "Solar")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/11/matches"))
        .and(query_param("strict_country", "false"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "score": 80, "investor": investor(1, "A", "Solar") },
            { "score": 70, "investor": investor(2, "B", "Solar") },
            { "score": 60, "investor": investor(3, "C", "Solar") },
            { "score": 50, "investor": investor(4, "D", "Solar") }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let screen = project_screen(client, location(""));
    screen.load().await;

    let matches = screen.matches();
    matches.toggle_open(11).await;
    let entry = matches.entry(11).unwrap();
    assert_eq!(entry.status, EntryStatus::Loaded);
    assert_eq!(entry.summary(matches.preview()).as_deref(), Some("Showing 3 of 4"));

    matches.toggle_open(11).await;
    matches.toggle_open(11).await;
    assert_eq!(matches.entry(11).unwrap().status, EntryStatus::Loaded);

    screen.set_field(FilterField::CountryId, "7");
    assert!(screen.sync().await.unwrap().is_applied());
    assert!(matches.entry(11).is_none());
}

#[tokio::test]
async fn match_errors_stay_in_their_panel() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project(1, 3, "Solar"),
            project(2, 7, "Wind")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/1/matches"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Project not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/2/matches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let screen = project_screen(client, location(""));
    screen.load().await;
    let matches = screen.matches();
    tokio::join!(matches.toggle_open(1), matches.toggle_open(2));

    let failed = matches.entry(1).unwrap();
    assert_eq!(failed.status, EntryStatus::Errored);
    let err = failed.error.as_ref().unwrap();
    assert_eq!(err.to_string(), "Project not found");
    assert_eq!(err.status(), Some(404));
    assert_eq!(matches.entry(2).unwrap().status, EntryStatus::Loaded);
    assert!(screen.listing().error().is_none());
}

#[tokio::test]
async fn startup_screen_sends_kind_but_keeps_it_out_of_the_location() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("kind", "startup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let loc = location("q=kiosk");
    let screen = ProjectScreen::new(client, ProjectKind::Startup, &HubConfig::default(), loc.clone());
    assert!(screen.load().await.is_applied());
    assert_eq!(screen.kind(), ProjectKind::Startup);
    assert_eq!(loc.query(), "q=kiosk");
}

// ── Navigation ──────────────────────────────────────────────────────

#[tokio::test]
async fn back_navigation_reloads_previous_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": 1, "title": "Grid tender", "tags": "grid, tender" }],
            "total": 1,
            "limit": 20,
            "offset": 0,
            "has_more": false
        })))
        .mount(&server)
        .await;

    let loc = location("q=grid");
    let screen = ListingScreen::news(client, Some(20), loc.clone());
    screen.load().await;
    assert_eq!(screen.facets().values(FacetDimension::Tag), ["grid", "tender"]);

    loc.push("q=solar&country_id=3");
    assert!(screen.navigate().await.unwrap().is_applied());
    assert_eq!(screen.store().state().country_id(), Some(3));

    loc.back();
    assert!(screen.navigate().await.unwrap().is_applied());
    assert_eq!(screen.store().current_key(), "q=grid");
    assert_eq!(loc.replace_count(), 0);

    let last = server.received_requests().await.unwrap();
    let last_news = last
        .iter()
        .rev()
        .find(|r| r.url.path() == "/api/v1/news")
        .unwrap();
    assert!(last_news.url.query_pairs().any(|(k, v)| k == "q" && v == "grid"));
    assert!(last_news.url.query_pairs().all(|(k, _)| k != "country_id"));
}
