use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::checkin::CheckIn;
use crate::entity::Entity;

/// What a user has to do to earn a badge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum BadgeCriteria {
    /// At least this many check-ins, repeats included.
    CheckInCount(u32),
    /// At least this many different pubs.
    DistinctPubs(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: BadgeCriteria,
}

impl Badge {
    /// Whether the given check-ins (all belonging to one user) earn this badge.
    pub fn is_earned_by<'a, I>(&self, check_ins: I) -> bool
    where
        I: IntoIterator<Item = &'a CheckIn>,
    {
        match self.criteria {
            BadgeCriteria::CheckInCount(n) => check_ins.into_iter().count() >= n as usize,
            BadgeCriteria::DistinctPubs(n) => {
                let pubs: HashSet<&str> =
                    check_ins.into_iter().map(|c| c.pub_id.as_str()).collect();
                pubs.len() >= n as usize
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub criteria: Option<BadgeCriteria>,
}

impl Entity for Badge {
    type Patch = BadgePatch;
    const KIND: &'static str = "badge";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: &BadgePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(criteria) = &patch.criteria {
            self.criteria = criteria.clone();
        }
    }
}
