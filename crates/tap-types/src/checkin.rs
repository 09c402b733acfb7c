use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// One visit by one user to one pub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: String,
    pub pub_id: String,
    pub user_id: String,
    /// Photo of the carpet taken at check-in time. Freshly captured photos
    /// carry an ephemeral `blob:` URL until they are uploaded.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub points_awarded: u32,
}

impl CheckIn {
    /// A new, unpersisted check-in.
    pub fn new(
        pub_id: impl Into<String>,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            pub_id: pub_id.into(),
            user_id: user_id.into(),
            image_url: None,
            created_at,
            points_awarded: 0,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInPatch {
    /// `Some(None)` drops the photo.
    pub image_url: Option<Option<String>>,
    pub points_awarded: Option<u32>,
}

impl Entity for CheckIn {
    type Patch = CheckInPatch;
    const KIND: &'static str = "check-in";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: &CheckInPatch) {
        if let Some(url) = &patch.image_url {
            self.image_url = url.clone();
        }
        if let Some(points) = patch.points_awarded {
            self.points_awarded = points;
        }
    }
}
