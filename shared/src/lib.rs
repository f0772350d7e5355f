// lib.rs - Plant selection screen core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod model;
pub mod pagination;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Destination, Effect, NavigateError, NavigateOperation};
pub use config::{ApiBaseUrl, ConfigError, EmptyResponsePolicy, ScreenConfig};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, ErrorKind, ErrorSeverity, UserFacingError};
pub use event::Event;
pub use model::{
    EnvironmentCategory, EnvironmentKey, Model, Plant, PlantId, ScreenPhase, SessionId,
    WateringFrequency, ALL_ENVIRONMENTS_KEY,
};
pub use pagination::{LoadMore, PageRequest, Pager};
pub use view::{ListFooter, ViewModel, ViewState};
