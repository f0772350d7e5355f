use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Plant;

pub const PLANT_SAVE_ROUTE: &str = "PlantSaveScreen";

/// Screens this core can hand off to, with their parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "route", content = "params")]
pub enum Destination {
    #[serde(rename = "PlantSaveScreen")]
    PlantSave { plant: Plant },
}

impl Destination {
    #[must_use]
    pub const fn route_name(&self) -> &'static str {
        match self {
            Self::PlantSave { .. } => PLANT_SAVE_ROUTE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigateOperation {
    Push(Destination),
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigateError {
    #[error("no screen registered for route {route}")]
    TargetMissing { route: String },

    #[error("navigation rejected: {reason}")]
    Rejected { reason: String },
}

pub type NavigateResult = Result<(), NavigateError>;

impl Operation for NavigateOperation {
    type Output = NavigateResult;
}

pub struct Navigate<Ev> {
    context: CapabilityContext<NavigateOperation, Ev>,
}

impl<Ev> Clone for Navigate<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Navigate<Ev> {
    type Operation = NavigateOperation;
    type MappedSelf<MappedEv> = Navigate<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigate::new(self.context.map_event(f))
    }
}

impl<Ev> Navigate<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<NavigateOperation, Ev>) -> Self {
        Self { context }
    }

    /// Asks the shell to push `destination`; the shell answers whether the
    /// route exists.
    pub fn push<F>(&self, destination: Destination, callback: F)
    where
        F: FnOnce(NavigateResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(NavigateOperation::Push(destination))
                .await;
            ctx.update_app(callback(result));
        });
    }
}
