use tracing::{debug, info, warn};

use crate::capabilities::http::{ENVIRONMENTS_RESOURCE, PLANTS_RESOURCE};
use crate::capabilities::{
    read_collection, Capabilities, CollectionBody, CollectionQuery, Destination, HttpResult,
    NavigateError, NavigateResult,
};
use crate::config::{EmptyResponsePolicy, ScreenConfig};
use crate::error::{AppError, ErrorKind};
use crate::event::Event;
use crate::model::{EnvironmentCategory, Model, Plant, PlantId, ScreenPhase, SessionId};
use crate::pagination::{LoadMore, PageOutcome, PageRequest};
use crate::view::{build_view, ViewModel};

#[derive(Default)]
pub struct App;

impl App {
    fn fetch_environments(model: &mut Model, caps: &Capabilities) {
        let session = model.session;

        match CollectionQuery::environments().to_url(&model.config.api_base_url) {
            Ok(url) => {
                debug!(%url, session = session.0, "fetching environments");
                caps.http
                    .get(url.as_str())
                    .send(move |result| Event::EnvironmentsFetched {
                        session,
                        result: Box::new(result),
                    });
            }
            Err(e) => {
                warn!(error = %e, "could not build environments url");
                Self::handle_environments_failure(model, e);
            }
        }
    }

    fn fetch_plants(model: &mut Model, caps: &Capabilities, request: PageRequest) {
        let session = model.session;
        let page = request.page;

        match CollectionQuery::plants(request).to_url(&model.config.api_base_url) {
            Ok(url) => {
                debug!(%url, session = session.0, page, "fetching plants");
                caps.http
                    .get(url.as_str())
                    .send(move |result| Event::PlantsFetched {
                        session,
                        page,
                        result: Box::new(result),
                    });
            }
            Err(e) => {
                warn!(error = %e, page, "could not build plants url");
                Self::handle_plants_failure(model, page, e);
            }
        }
    }

    fn handle_environments_response(session: SessionId, result: HttpResult, model: &mut Model) {
        if !model.is_current(session) {
            debug!(
                session = session.0,
                "dropping environments response from a previous session"
            );
            return;
        }

        match read_collection::<EnvironmentCategory>(result) {
            Ok(CollectionBody::Records(remote)) => {
                info!(count = remote.len(), "environments loaded");
                model.set_environments(remote);
            }
            Ok(CollectionBody::Missing) => {
                warn!("environments response had no payload");
                model.set_environments(Vec::new());
            }
            Err(e) => {
                warn!(error = %e, "environments fetch failed");
                Self::handle_environments_failure(model, e);
                return;
            }
        }

        model.environments_failed = false;
        Self::clear_fetch_error(model, ENVIRONMENTS_RESOURCE);
    }

    fn handle_environments_failure(model: &mut Model, error: AppError) {
        model.environments_failed = true;
        model.set_error(error.with_context("resource", ENVIRONMENTS_RESOURCE));
    }

    /// Clears the active error only when it is a retryable failure of `resource`.
    fn clear_fetch_error(model: &mut Model, resource: &str) {
        let owned_by_resource = model.active_error.as_ref().is_some_and(|e| {
            e.is_retryable() && e.context.get("resource").is_some_and(|r| r == resource)
        });
        if owned_by_resource {
            model.clear_error();
        }
    }

    fn handle_plants_response(
        session: SessionId,
        page: u32,
        result: HttpResult,
        model: &mut Model,
    ) {
        if !model.is_current(session) {
            debug!(
                session = session.0,
                page,
                "dropping plants response from a previous session"
            );
            return;
        }

        let records = match read_collection::<Plant>(result) {
            Ok(CollectionBody::Records(records)) => records,
            Ok(CollectionBody::Missing) => match model.config.empty_response_policy {
                EmptyResponsePolicy::ShowEmptyState => Vec::new(),
                EmptyResponsePolicy::StayLoading => {
                    if model.pager.fail(page) {
                        warn!(page, "plants response had no payload; keeping loading indicator");
                        model.phase = ScreenPhase::Initializing;
                    }
                    return;
                }
            },
            Err(e) => {
                warn!(error = %e, page, "plants fetch failed");
                Self::handle_plants_failure(model, page, e);
                return;
            }
        };

        let count = records.len();
        match model.pager.complete(page, count) {
            PageOutcome::Stale => {
                debug!(page, "dropping plants response for a page not in flight");
                return;
            }
            PageOutcome::Replace => model.replace_plants(records),
            PageOutcome::Append => model.append_plants(records),
        }

        model.phase = ScreenPhase::Ready;
        Self::clear_fetch_error(model, PLANTS_RESOURCE);

        info!(
            page,
            count,
            total = model.plants.len(),
            visible = model.filtered.len(),
            exhausted = model.pager.is_exhausted(),
            "plants page applied"
        );
    }

    fn handle_plants_failure(model: &mut Model, page: u32, error: AppError) {
        if !model.pager.fail(page) {
            debug!(page, "ignoring failure for a page not in flight");
            return;
        }

        if model.pager.loaded_pages() == 0 {
            model.phase = ScreenPhase::Failed;
        }
        model.set_error(
            error
                .with_context("resource", PLANTS_RESOURCE)
                .with_context("page", page.to_string()),
        );
    }

    fn select_plant(plant_id: PlantId, model: &mut Model, caps: &Capabilities) {
        let Some(plant) = model.find_plant(&plant_id).cloned() else {
            warn!(%plant_id, "selected plant is not in the list");
            model.set_error(
                AppError::new(ErrorKind::InvalidState, "That plant is no longer available.")
                    .with_context("plant_id", plant_id.0),
            );
            return;
        };

        let destination = Destination::PlantSave { plant };
        info!(%plant_id, route = destination.route_name(), "handing plant to navigation");

        let session = model.session;
        caps.navigate.push(destination, move |result| Event::NavigationFinished {
            session,
            plant_id,
            result: Box::new(result),
        });
    }

    fn handle_navigation_result(plant_id: &PlantId, result: NavigateResult, model: &mut Model) {
        match result {
            Ok(()) => debug!(%plant_id, "navigation accepted"),
            Err(NavigateError::TargetMissing { route }) => {
                warn!(%plant_id, %route, "navigation target missing");
                model.set_error(
                    AppError::new(
                        ErrorKind::NavigationTargetMissing,
                        format!("No screen for {route}"),
                    )
                    .with_context("route", route)
                    .with_context("plant_id", plant_id.0.clone()),
                );
            }
            Err(NavigateError::Rejected { reason }) => {
                warn!(%plant_id, %reason, "navigation rejected");
                model.set_error(
                    AppError::new(
                        ErrorKind::Navigation,
                        "Could not open this plant. Please try again.",
                    )
                    .with_internal(reason)
                    .with_context("plant_id", plant_id.0.clone()),
                );
            }
        }
    }

    fn configure(config: ScreenConfig, model: &mut Model) {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejecting screen config");
            model.set_error(
                AppError::new(ErrorKind::Configuration, "Invalid screen configuration")
                    .with_internal(e.to_string()),
            );
            return;
        }

        if model.mounted {
            debug!("config received while mounted; paging settings apply on next mount");
        }
        model.config = config;
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            session = model.session.0,
            "update"
        );

        match event {
            Event::Configure(config) => {
                Self::configure(*config, model);
                caps.render.render();
            }

            Event::Mounted => {
                let session = model.begin_session();
                let first_page = model.pager.begin_initial();
                info!(session = session.0, "plant selection mounted");

                Self::fetch_environments(model, caps);
                Self::fetch_plants(model, caps, first_page);
                caps.render.render();
            }

            Event::Dismissed => {
                info!(session = model.session.0, "plant selection dismissed");
                model.end_session();
            }

            Event::EnvironmentSelected { key } => {
                model.select_environment(key);
                debug!(
                    key = %model.selected_environment,
                    visible = model.filtered.len(),
                    "environment selected"
                );
                caps.render.render();
            }

            Event::EndReached { distance_from_end } => {
                if !model.mounted || model.phase != ScreenPhase::Ready {
                    return;
                }

                match model.pager.load_more(distance_from_end) {
                    LoadMore::Fetch(request) => {
                        Self::fetch_plants(model, caps, request);
                        caps.render.render();
                    }
                    decision => debug!(?decision, distance_from_end, "load more skipped"),
                }
            }

            Event::PlantSelected { plant_id } => {
                Self::select_plant(plant_id, model, caps);
                caps.render.render();
            }

            Event::RetryRequested => {
                if !model.mounted {
                    return;
                }

                model.clear_error();
                if model.phase == ScreenPhase::Failed {
                    model.phase = ScreenPhase::Initializing;
                }
                if let Some(request) = model.pager.retry() {
                    Self::fetch_plants(model, caps, request);
                }
                if model.environments_failed {
                    model.environments_failed = false;
                    Self::fetch_environments(model, caps);
                }
                caps.render.render();
            }

            Event::DismissError => {
                model.clear_error();
                caps.render.render();
            }

            Event::EnvironmentsFetched { session, result } => {
                Self::handle_environments_response(session, *result, model);
                caps.render.render();
            }

            Event::PlantsFetched { session, page, result } => {
                Self::handle_plants_response(session, page, *result, model);
                caps.render.render();
            }

            Event::NavigationFinished {
                session,
                plant_id,
                result,
            } => {
                if !model.is_current(session) {
                    return;
                }
                Self::handle_navigation_result(&plant_id, *result, model);
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        build_view(model)
    }
}
