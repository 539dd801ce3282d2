// --- File: crates/roster_common/src/models.rs ---

use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::record::{FieldKind, FieldSpec, FieldValue, FieldValues, RecordFields};

/// A member of the `members` table.
///
/// Names and emails are unique among members at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub email: String,
}

impl Member {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Partial update of a [`Member`]; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

const MEMBER_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        kind: FieldKind::Text,
        required_message: "Name of the member is required",
        unique: true,
    },
    FieldSpec {
        name: "email",
        kind: FieldKind::Text,
        required_message: "Email of the member is required",
        unique: true,
    },
];

impl RecordFields for Member {
    type Patch = MemberPatch;

    const KIND: &'static str = "member";
    const TABLE: &'static str = "members";
    const FIELDS: &'static [FieldSpec] = MEMBER_FIELDS;
    const KEY_FIELD: &'static str = "name";

    fn from_values(values: &FieldValues) -> Result<Self, RosterError> {
        Ok(Self {
            name: values.text("name")?,
            email: values.text("email")?,
        })
    }

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name.clone()),
            FieldValue::Text(self.email.clone()),
        ]
    }

    fn patch_from_values(values: &FieldValues) -> Result<MemberPatch, RosterError> {
        Ok(MemberPatch {
            name: values.optional_text("name")?,
            email: values.optional_text("email")?,
        })
    }

    fn apply_patch(&mut self, patch: MemberPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }

    fn key(&self) -> &str {
        &self.name
    }
}

/// A row of the `videos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub name: String,
    pub views: i64,
    pub likes: i64,
}

impl Video {
    pub fn new(name: impl Into<String>, views: i64, likes: i64) -> Self {
        Self {
            name: name.into(),
            views,
            likes,
        }
    }
}

/// Partial update of a [`Video`]. `Some(0)` is a real update, not "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoPatch {
    pub name: Option<String>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}

const VIDEO_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        kind: FieldKind::Text,
        required_message: "Name of the video is required",
        unique: false,
    },
    FieldSpec {
        name: "views",
        kind: FieldKind::Integer,
        required_message: "Views of the video is required",
        unique: false,
    },
    FieldSpec {
        name: "likes",
        kind: FieldKind::Integer,
        required_message: "Likes on the video is required",
        unique: false,
    },
];

impl RecordFields for Video {
    type Patch = VideoPatch;

    const KIND: &'static str = "video";
    const TABLE: &'static str = "videos";
    const FIELDS: &'static [FieldSpec] = VIDEO_FIELDS;
    const KEY_FIELD: &'static str = "name";

    fn from_values(values: &FieldValues) -> Result<Self, RosterError> {
        Ok(Self {
            name: values.text("name")?,
            views: values.integer("views")?,
            likes: values.integer("likes")?,
        })
    }

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name.clone()),
            FieldValue::Integer(self.views),
            FieldValue::Integer(self.likes),
        ]
    }

    fn patch_from_values(values: &FieldValues) -> Result<VideoPatch, RosterError> {
        Ok(VideoPatch {
            name: values.optional_text("name")?,
            views: values.optional_integer("views")?,
            likes: values.optional_integer("likes")?,
        })
    }

    fn apply_patch(&mut self, patch: VideoPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(views) = patch.views {
            self.views = views;
        }
        if let Some(likes) = patch.likes {
            self.likes = likes;
        }
    }

    fn key(&self) -> &str {
        &self.name
    }
}
