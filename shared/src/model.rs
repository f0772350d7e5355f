use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::config::ScreenConfig;
use crate::error::AppError;
use crate::filter::filter_indices;
use crate::pagination::Pager;

/// Key of the synthetic category that matches every plant.
pub const ALL_ENVIRONMENTS_KEY: &str = "all";

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(EnvironmentKey);

impl EnvironmentKey {
    #[must_use]
    pub fn all() -> Self {
        Self::new(ALL_ENVIRONMENTS_KEY)
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 == ALL_ENVIRONMENTS_KEY
    }
}

impl Default for EnvironmentKey {
    fn default() -> Self {
        Self::all()
    }
}

/// Plant identifier. The backend may hand out numeric or string ids; both are
/// kept as their decimal/string form.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlantId(pub String);

impl PlantId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PlantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

// --- Remote records ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WateringFrequency {
    pub times: u32,
    pub repeat_every: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub water_tips: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub environments: Vec<EnvironmentKey>,
    #[serde(default)]
    pub frequency: Option<WateringFrequency>,
}

impl Plant {
    #[must_use]
    pub fn grows_in(&self, key: &EnvironmentKey) -> bool {
        self.environments.iter().any(|e| e == key)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentCategory {
    pub key: EnvironmentKey,
    pub title: String,
}

impl EnvironmentCategory {
    #[must_use]
    pub fn all(title: impl Into<String>) -> Self {
        Self {
            key: EnvironmentKey::all(),
            title: title.into(),
        }
    }
}

/// Prepends the synthetic "all" category. A remote entry reusing the sentinel
/// key is dropped so the sentinel stays unique and first.
#[must_use]
pub fn with_all_category(
    all_title: &str,
    remote: Vec<EnvironmentCategory>,
) -> Vec<EnvironmentCategory> {
    let mut out = Vec::with_capacity(remote.len() + 1);
    out.push(EnvironmentCategory::all(all_title));
    out.extend(remote.into_iter().filter(|e| !e.key.is_all()));
    out
}

// --- Screen state ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScreenPhase {
    #[default]
    Initializing,
    Ready,
    Failed,
    Dismissed,
}

/// Identifies one mount of the screen. Responses tagged with an older session
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct SessionId(pub u64);

impl SessionId {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

pub struct Model {
    pub config: ScreenConfig,
    pub phase: ScreenPhase,
    pub session: SessionId,
    pub mounted: bool,

    pub environments: Vec<EnvironmentCategory>,
    pub environments_failed: bool,
    pub selected_environment: EnvironmentKey,

    pub plants: Vec<Plant>,
    /// Indices into `plants` matching `selected_environment`, in list order.
    pub filtered: Vec<usize>,

    pub pager: Pager,
    pub active_error: Option<AppError>,
}

impl Default for Model {
    fn default() -> Self {
        let config = ScreenConfig::default();
        Self {
            environments: vec![EnvironmentCategory::all(&config.all_environments_title)],
            pager: Pager::new(config.page_size),
            config,
            phase: ScreenPhase::Initializing,
            session: SessionId::default(),
            mounted: false,
            environments_failed: false,
            selected_environment: EnvironmentKey::all(),
            plants: Vec::new(),
            filtered: Vec::new(),
            active_error: None,
        }
    }
}

impl Model {
    /// Starts a fresh session, discarding everything the previous mount held.
    pub fn begin_session(&mut self) -> SessionId {
        self.session = self.session.next();
        self.mounted = true;
        self.phase = ScreenPhase::Initializing;
        self.environments = vec![EnvironmentCategory::all(&self.config.all_environments_title)];
        self.environments_failed = false;
        self.selected_environment = EnvironmentKey::all();
        self.plants.clear();
        self.filtered.clear();
        self.pager = Pager::new(self.config.page_size);
        self.active_error = None;
        self.session
    }

    pub fn end_session(&mut self) {
        self.mounted = false;
        self.phase = ScreenPhase::Dismissed;
        self.session = self.session.next();
    }

    #[must_use]
    pub fn is_current(&self, session: SessionId) -> bool {
        self.mounted && self.session == session
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == ScreenPhase::Initializing
    }

    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.pager.is_loading_more()
    }

    pub fn set_environments(&mut self, remote: Vec<EnvironmentCategory>) {
        self.environments = with_all_category(&self.config.all_environments_title, remote);
        self.environments_failed = false;
    }

    pub fn select_environment(&mut self, key: EnvironmentKey) {
        self.selected_environment = key;
        self.refilter();
    }

    pub fn replace_plants(&mut self, plants: Vec<Plant>) {
        self.plants = plants;
        self.refilter();
    }

    pub fn append_plants(&mut self, plants: Vec<Plant>) {
        self.plants.extend(plants);
        self.refilter();
    }

    pub fn refilter(&mut self) {
        self.filtered = filter_indices(&self.plants, &self.selected_environment);
    }

    pub fn filtered_plants(&self) -> impl Iterator<Item = &Plant> + '_ {
        self.filtered.iter().filter_map(|&i| self.plants.get(i))
    }

    #[must_use]
    pub fn find_plant(&self, id: &PlantId) -> Option<&Plant> {
        self.plants.iter().find(|p| &p.id == id)
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }
}
