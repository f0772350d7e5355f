use assert_matches::assert_matches;
use crux_core::testing::AppTester;
use crux_http::testing::ResponseBuilder;
use shared::{
    App, Destination, Effect, EnvironmentKey, Event, ListFooter, Model, NavigateOperation,
    PlantId, ScreenPhase, ViewState,
};

const BASE: &str = "http://localhost:3333/";

fn plant_json(id: u32, name: &str, envs: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "about": "",
        "water_tips": "",
        "photo": format!("https://cdn.example.com/{id}.svg"),
        "environments": envs,
        "frequency": { "times": 1, "repeat_every": "week" }
    })
}

/// Eight plants sorted by name; 1, 4 and 7 are tagged `rooms`.
fn first_page() -> Vec<u8> {
    let tags: [&[&str]; 8] = [
        &["rooms", "kitchen"],
        &["kitchen"],
        &["bathroom"],
        &["rooms"],
        &["garden"],
        &["kitchen"],
        &["rooms", "garden"],
        &["bathroom"],
    ];
    let plants: Vec<_> = tags
        .iter()
        .enumerate()
        .map(|(i, envs)| plant_json(i as u32 + 1, &format!("Plant {}", i + 1), envs))
        .collect();
    serde_json::to_vec(&plants).unwrap()
}

fn http_urls(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Http(request) => Some(request.operation.url.clone()),
            _ => None,
        })
        .collect()
}

fn environments_event(model: &Model, body: &[u8]) -> Event {
    Event::EnvironmentsFetched {
        session: model.session,
        result: Box::new(Ok(ResponseBuilder::ok().body(body.to_vec()).build())),
    }
}

fn plants_event(model: &Model, page: u32, body: &[u8]) -> Event {
    Event::PlantsFetched {
        session: model.session,
        page,
        result: Box::new(Ok(ResponseBuilder::ok().body(body.to_vec()).build())),
    }
}

#[test]
fn mount_requests_environments_and_first_page() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::Mounted, &mut model);

    assert!(model.mounted);
    assert_eq!(model.phase, ScreenPhase::Initializing);
    assert_eq!(
        http_urls(&update.effects),
        [
            format!("{BASE}plants_environments?_sort=title&_order=asc"),
            format!("{BASE}plants?_sort=name&_order=asc&_page=1&_limit=8"),
        ]
    );
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));
    assert_eq!(app.view(&model).state, ViewState::Loading);
}

#[test]
fn selecting_a_category_filters_the_first_page() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::Mounted, &mut model);

    app.update(
        environments_event(&model, br#"[{"key":"rooms","title":"Rooms"}]"#),
        &mut model,
    );
    app.update(plants_event(&model, 1, &first_page()), &mut model);

    assert_eq!(model.phase, ScreenPhase::Ready);
    assert_eq!(model.plants.len(), 8);
    assert_eq!(model.filtered.len(), 8);
    assert_eq!(model.environments[0].key.as_str(), "all");
    assert_eq!(model.environments[1].title, "Rooms");

    let update = app.update(
        Event::EnvironmentSelected { key: EnvironmentKey::new("rooms") },
        &mut model,
    );
    assert!(http_urls(&update.effects).is_empty());

    let ids: Vec<&str> = model.filtered_plants().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1", "4", "7"]);

    let ViewState::Ready { rows, environments, footer, .. } = app.view(&model).state else {
        panic!("expected ready view");
    };
    let names: Vec<&str> = rows
        .iter()
        .flat_map(|r| r.cards.iter().map(|c| c.name.as_str()))
        .collect();
    assert_eq!(names, ["Plant 1", "Plant 4", "Plant 7"]);
    assert!(environments[1].active);
    assert_eq!(footer, ListFooter::Idle);

    app.update(Event::EnvironmentSelected { key: EnvironmentKey::all() }, &mut model);
    assert_eq!(model.filtered, (0..8).collect::<Vec<_>>());
}

#[test]
fn empty_environments_response_keeps_all_first() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::Mounted, &mut model);

    app.update(environments_event(&model, b"[]"), &mut model);

    assert_eq!(model.environments.len(), 1);
    assert!(model.environments[0].key.is_all());
    assert_eq!(model.environments[0].title, "Todos");
}

#[test]
fn missing_plants_payload_stays_loading() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::Mounted, &mut model);

    app.update(plants_event(&model, 1, b"null"), &mut model);

    assert_eq!(model.phase, ScreenPhase::Initializing);
    assert!(model.active_error.is_none());
    assert_eq!(app.view(&model).state, ViewState::Loading);
}

#[test]
fn missing_plants_payload_can_show_empty_state() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let config =
        shared::ScreenConfig::from_json(r#"{ "empty_response_policy": "show_empty_state" }"#)
            .unwrap();
    app.update(Event::Configure(Box::new(config)), &mut model);
    app.update(Event::Mounted, &mut model);

    app.update(plants_event(&model, 1, b""), &mut model);

    assert_eq!(model.phase, ScreenPhase::Ready);
    assert_matches!(app.view(&model).state, ViewState::Empty { .. });
}

#[test]
fn empty_array_on_first_page_is_an_empty_state() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::Mounted, &mut model);

    app.update(plants_event(&model, 1, b"[]"), &mut model);

    assert_matches!(
        app.view(&model).state,
        ViewState::Empty { message, .. } if message == "Nenhuma planta encontrada"
    );
}

#[test]
fn tapping_a_card_hands_the_full_record_to_navigation() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::Mounted, &mut model);
    app.update(plants_event(&model, 1, &first_page()), &mut model);

    let update = app.update(Event::PlantSelected { plant_id: PlantId::new("4") }, &mut model);

    let operation = update
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::Navigate(request) => Some(request.operation.clone()),
            _ => None,
        })
        .expect("navigation effect");

    let NavigateOperation::Push(Destination::PlantSave { plant }) = operation;
    assert_eq!(&plant, model.find_plant(&PlantId::new("4")).unwrap());
    assert_eq!(plant.environments, [EnvironmentKey::new("rooms")]);
    assert!(model.active_error.is_none());
}

#[test]
fn responses_after_dismissal_are_dropped() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::Mounted, &mut model);
    let stale_plants = plants_event(&model, 1, &first_page());
    let stale_envs = environments_event(&model, br#"[{"key":"rooms","title":"Rooms"}]"#);

    app.update(Event::Dismissed, &mut model);
    app.update(stale_plants, &mut model);
    app.update(stale_envs, &mut model);

    assert!(model.plants.is_empty());
    assert_eq!(model.environments.len(), 1);
    assert_eq!(model.phase, ScreenPhase::Dismissed);
    assert_eq!(app.view(&model).state, ViewState::Dismissed);
}

#[test]
fn remount_ignores_previous_session_responses() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::Mounted, &mut model);
    let stale = plants_event(&model, 1, &first_page());

    app.update(Event::Mounted, &mut model);
    app.update(stale, &mut model);

    assert_eq!(model.phase, ScreenPhase::Initializing);
    assert!(model.plants.is_empty());
}
