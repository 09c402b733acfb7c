//! Seed documents: the initial pubs, badges, and missions of a deployment.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tap_types::{Badge, Entity, Mission, Pub, TypeError};

use crate::error::{SdkError, SdkResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub pubs: Vec<Pub>,
    pub badges: Vec<Badge>,
    pub missions: Vec<Mission>,
}

impl SeedData {
    /// Parse and validate a JSON seed document.
    pub fn from_json_str(s: &str) -> SdkResult<Self> {
        let seed: Self = serde_json::from_str(s).map_err(|e| SdkError::Seed(e.to_string()))?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Ids are non-empty and unique per collection; every mission pub exists.
    pub fn validate(&self) -> Result<(), TypeError> {
        check_ids(&self.pubs)?;
        check_ids(&self.badges)?;
        check_ids(&self.missions)?;
        let pubs: HashSet<&str> = self.pubs.iter().map(|p| p.id.as_str()).collect();
        for mission in &self.missions {
            if let Some(missing) = mission.pub_ids.iter().find(|id| !pubs.contains(id.as_str())) {
                return Err(TypeError::UnknownPub {
                    mission: mission.id.clone(),
                    pub_id: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_ids<T: Entity>(items: &[T]) -> Result<(), TypeError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.id().is_empty() {
            return Err(TypeError::EmptyId { kind: T::KIND });
        }
        if !seen.insert(item.id()) {
            return Err(TypeError::DuplicateId {
                kind: T::KIND,
                id: item.id().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "pubs": [
            {"id": "p1", "name": "The Red Lion", "points": 20},
            {"id": "p2", "name": "The Crown"}
        ],
        "badges": [
            {"id": "b1", "name": "First Pint", "criteria": {"kind": "check_in_count", "threshold": 1}}
        ],
        "missions": [
            {"id": "m1", "name": "Royal Flush", "pub_ids": ["p1", "p2"]}
        ]
    }"#;

    #[test]
    fn parses_valid_seed() {
        let seed = SeedData::from_json_str(SEED).unwrap();
        assert_eq!(seed.pubs.len(), 2);
        assert_eq!(seed.pubs[0].points, 20);
        assert_eq!(seed.badges.len(), 1);
        assert_eq!(seed.missions[0].pub_ids, vec!["p1", "p2"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let seed = SeedData::from_json_str(r#"{"pubs": []}"#).unwrap();
        assert!(seed.badges.is_empty());
        assert!(seed.missions.is_empty());
    }

    #[test]
    fn dangling_mission_pub_rejected() {
        let json = r#"{"pubs": [{"id": "p1", "name": "A"}],
                       "missions": [{"id": "m1", "name": "M", "pub_ids": ["p1", "p404"]}]}"#;
        let err = SeedData::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Types(TypeError::UnknownPub { ref pub_id, .. }) if pub_id == "p404"
        ));
    }

    #[test]
    fn duplicate_and_empty_ids_rejected() {
        let dup = r#"{"pubs": [{"id": "p1", "name": "A"}, {"id": "p1", "name": "B"}]}"#;
        assert!(matches!(
            SeedData::from_json_str(dup),
            Err(SdkError::Types(TypeError::DuplicateId { kind: "pub", .. }))
        ));
        let empty = r#"{"pubs": [{"id": "", "name": "A"}]}"#;
        assert!(matches!(
            SeedData::from_json_str(empty),
            Err(SdkError::Types(TypeError::EmptyId { kind: "pub" }))
        ));
    }

    #[test]
    fn malformed_json_is_seed_error() {
        assert!(matches!(SeedData::from_json_str("{"), Err(SdkError::Seed(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, SEED).unwrap();
        assert_eq!(SeedData::load(&path).unwrap().pubs.len(), 2);
    }
}
