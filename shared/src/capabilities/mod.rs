pub mod http;
mod navigate;

pub use self::http::{
    decode_collection, read_collection, CollectionBody, CollectionQuery, HttpOutput, HttpResult,
};
pub use self::navigate::{
    Destination, Navigate, NavigateError, NavigateOperation, NavigateResult, PLANT_SAVE_ROUTE,
};

// Crux's built-in Render capability covers view updates.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

// Field types are spelled out (not aliased) because the Effect derive names
// its variants after them.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
    pub navigate: Navigate<Event>,
}
