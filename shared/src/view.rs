use serde::{Deserialize, Serialize};

use crate::config::GRID_COLUMNS;
use crate::error::{AppError, UserFacingError};
use crate::model::{Model, Plant, ScreenPhase};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderView {
    pub title: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentButtonView {
    pub key: String,
    pub title: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantCardView {
    pub id: String,
    pub name: String,
    pub photo: String,
}

impl From<&Plant> for PlantCardView {
    fn from(p: &Plant) -> Self {
        Self {
            id: p.id.0.clone(),
            name: p.name.clone(),
            photo: p.photo.clone(),
        }
    }
}

/// One grid row; the last row may be short.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantRowView {
    pub cards: Vec<PlantCardView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListFooter {
    LoadingMore,
    NoMoreItems { message: String },
    Idle,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Ready {
        header: HeaderView,
        environments: Vec<EnvironmentButtonView>,
        rows: Vec<PlantRowView>,
        footer: ListFooter,
        end_reached_threshold: f64,
    },
    Empty {
        header: HeaderView,
        environments: Vec<EnvironmentButtonView>,
        message: String,
    },
    Failed {
        title: String,
        message: String,
        is_retryable: bool,
        retry_event: Option<String>,
    },
    Dismissed,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub state: ViewState,
    pub error: Option<UserFacingError>,
}

fn header(model: &Model) -> HeaderView {
    HeaderView {
        title: model.config.strings.title.clone(),
        subtitle: model.config.strings.subtitle.clone(),
    }
}

fn environment_buttons(model: &Model) -> Vec<EnvironmentButtonView> {
    model
        .environments
        .iter()
        .map(|e| EnvironmentButtonView {
            key: e.key.0.clone(),
            title: e.title.clone(),
            active: e.key == model.selected_environment,
        })
        .collect()
}

fn plant_rows(model: &Model) -> Vec<PlantRowView> {
    let cards: Vec<PlantCardView> = model.filtered_plants().map(PlantCardView::from).collect();
    cards
        .chunks(GRID_COLUMNS)
        .map(|row| PlantRowView { cards: row.to_vec() })
        .collect()
}

fn footer(model: &Model) -> ListFooter {
    if model.is_loading_more() {
        ListFooter::LoadingMore
    } else if model.pager.is_exhausted() {
        ListFooter::NoMoreItems {
            message: model.config.strings.no_more_items.clone(),
        }
    } else {
        ListFooter::Idle
    }
}

#[must_use]
pub fn build_view(model: &Model) -> ViewModel {
    let state = match model.phase {
        ScreenPhase::Initializing => ViewState::Loading,

        ScreenPhase::Ready if model.plants.is_empty() => ViewState::Empty {
            header: header(model),
            environments: environment_buttons(model),
            message: model.config.strings.empty.clone(),
        },

        ScreenPhase::Ready => ViewState::Ready {
            header: header(model),
            environments: environment_buttons(model),
            rows: plant_rows(model),
            footer: footer(model),
            end_reached_threshold: model.config.end_reached_threshold,
        },

        ScreenPhase::Failed => ViewState::Failed {
            title: model.config.strings.failed_title.clone(),
            message: model
                .active_error
                .as_ref()
                .map(AppError::user_facing_message)
                .unwrap_or_else(|| "An unknown error occurred".into()),
            is_retryable: model.active_error.as_ref().is_none_or(AppError::is_retryable),
            retry_event: Some("retry_requested".into()),
        },

        ScreenPhase::Dismissed => ViewState::Dismissed,
    };

    // A failed first page already carries the error in its state.
    let error = match model.phase {
        ScreenPhase::Failed => None,
        _ => model.active_error.as_ref().map(UserFacingError::from),
    };

    ViewModel { state, error }
}
