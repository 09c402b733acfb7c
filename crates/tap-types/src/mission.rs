use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A named set of pubs to visit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pub_ids: Vec<String>,
}

impl Mission {
    /// Number of this mission's pubs present in `visited`.
    pub fn completed_count(&self, visited: &HashSet<&str>) -> usize {
        self.distinct_pubs()
            .into_iter()
            .filter(|id| visited.contains(id))
            .count()
    }

    /// Completion percentage in `0..=100`, rounded down.
    ///
    /// A mission with no pubs reports 0. Duplicate pub ids in the mission
    /// count once.
    pub fn progress_percent(&self, visited: &HashSet<&str>) -> u8 {
        let total = self.distinct_pubs().len();
        if total == 0 {
            return 0;
        }
        let done = self.completed_count(visited);
        (done * 100 / total) as u8
    }

    pub fn is_complete(&self, visited: &HashSet<&str>) -> bool {
        !self.pub_ids.is_empty() && self.progress_percent(visited) == 100
    }

    fn distinct_pubs(&self) -> HashSet<&str> {
        self.pub_ids.iter().map(String::as_str).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pub_ids: Option<Vec<String>>,
}

impl Entity for Mission {
    type Patch = MissionPatch;
    const KIND: &'static str = "mission";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: &MissionPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(pub_ids) = &patch.pub_ids {
            self.pub_ids = pub_ids.clone();
        }
    }
}
