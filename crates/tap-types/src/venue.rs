use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A pub users can check into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pub {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// Reference photo of the pub's carpet, if one has been published.
    #[serde(default)]
    pub carpet_image_url: Option<String>,
    /// Points awarded for a check-in here. Zero means "use the default".
    #[serde(default)]
    pub points: u32,
}

impl Pub {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            carpet_image_url: None,
            points: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    /// `Some(None)` clears the carpet image.
    pub carpet_image_url: Option<Option<String>>,
    pub points: Option<u32>,
}

impl Entity for Pub {
    type Patch = PubPatch;
    const KIND: &'static str = "pub";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: &PubPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(url) = &patch.carpet_image_url {
            self.carpet_image_url = url.clone();
        }
        if let Some(points) = patch.points {
            self.points = points;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_set_fields() {
        let mut p = Pub::new("p1", "The Red Lion");
        p.address = "1 High St".into();
        p.apply(&PubPatch {
            points: Some(25),
            ..Default::default()
        });
        assert_eq!(p.name, "The Red Lion");
        assert_eq!(p.address, "1 High St");
        assert_eq!(p.points, 25);
    }

    #[test]
    fn patch_can_clear_carpet_image() {
        let mut p = Pub::new("p1", "The Crown");
        p.carpet_image_url = Some("https://img/crown.jpg".into());
        p.apply(&PubPatch {
            carpet_image_url: Some(None),
            ..Default::default()
        });
        assert!(p.carpet_image_url.is_none());
    }

    #[test]
    fn deserialize_with_defaults() {
        let p: Pub = serde_json::from_str(r#"{"id":"p9","name":"The Swan"}"#).unwrap();
        assert_eq!(p, Pub::new("p9", "The Swan"));
    }
}
