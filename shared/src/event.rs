use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpResult, NavigateResult};
use crate::config::ScreenConfig;
use crate::model::{EnvironmentKey, PlantId, SessionId};

/// Events sent by the shell, plus internal capability responses. Responses
/// are boxed to keep the enum small and are never serialized.
#[derive(Serialize, Deserialize, Debug)]
pub enum Event {
    Configure(Box<ScreenConfig>),
    Mounted,
    Dismissed,

    EnvironmentSelected {
        key: EnvironmentKey,
    },
    EndReached {
        distance_from_end: f64,
    },
    PlantSelected {
        plant_id: PlantId,
    },

    RetryRequested,
    DismissError,

    // Capability responses
    #[serde(skip)]
    EnvironmentsFetched {
        session: SessionId,
        result: Box<HttpResult>,
    },
    #[serde(skip)]
    PlantsFetched {
        session: SessionId,
        page: u32,
        result: Box<HttpResult>,
    },
    #[serde(skip)]
    NavigationFinished {
        session: SessionId,
        plant_id: PlantId,
        result: Box<NavigateResult>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Mounted => "mounted",
            Self::Dismissed => "dismissed",
            Self::EnvironmentSelected { .. } => "environment_selected",
            Self::EndReached { .. } => "end_reached",
            Self::PlantSelected { .. } => "plant_selected",
            Self::RetryRequested => "retry_requested",
            Self::DismissError => "dismiss_error",
            Self::EnvironmentsFetched { .. } => "environments_fetched",
            Self::PlantsFetched { .. } => "plants_fetched",
            Self::NavigationFinished { .. } => "navigation_finished",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::EnvironmentSelected { .. }
                | Self::EndReached { .. }
                | Self::PlantSelected { .. }
                | Self::RetryRequested
                | Self::DismissError
        )
    }
}
