use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Classification of a metadata field.
///
/// Drives both the display order of siblings and the color coding of labels.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    Required,
    Recommended,
    #[default]
    Optional,
}

impl Status {
    /// Sort priority among siblings (lower sorts first).
    pub fn priority(self) -> u8 {
        match self {
            Status::Required => 1,
            Status::Recommended => 2,
            Status::Optional => 3,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Status::Required => "red",
            Status::Recommended => "orange",
            Status::Optional => "green",
        }
    }

    /// Human label shown in the status picker.
    pub fn label(self) -> &'static str {
        match self {
            Status::Required => "Required",
            Status::Recommended => "Recommended",
            Status::Optional => "Optional",
        }
    }
}

/// Editable per-node fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Status,
    Comment,
    Mapping,
}

/// One entry of the metadata schema.
///
/// Every field is optional, and each one is kept exactly as loaded: absent
/// stays absent, `null` stays `null`, and a status outside the known
/// vocabulary keeps its text. Keys the editor does not know about are carried
/// in `extra` so a loaded document is written back unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Node {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub comment: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub children: Option<Option<BTreeMap<String, Node>>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `Some(None)` for an explicit `null`; a missing key falls back to `default`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Node {
    /// The leaf inserted by "New node" and used for a fresh schema.
    pub fn default_leaf() -> Self {
        Self {
            status: Some(Some(Status::Required.to_string())),
            comment: Some(Some(String::new())),
            mapping: Some(Some(String::new())),
            children: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Status text as stored in the document.
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref()?.as_deref()
    }

    /// Stored status read case-insensitively; `None` when absent, null or
    /// outside the vocabulary.
    pub fn status(&self) -> Option<Status> {
        self.status_text()
            .and_then(|s| Status::from_str(s.trim()).ok())
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = Some(Some(status.to_string()));
    }

    pub fn effective_status(&self) -> Status {
        self.status().unwrap_or_default()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_ref()?.as_deref()
    }

    pub fn mapping(&self) -> Option<&str> {
        self.mapping.as_ref()?.as_deref()
    }

    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        self.children.as_ref()?.as_ref()
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        self.children.as_mut()?.as_mut()
    }

    /// The children map, created (or replacing a `null`) when missing.
    pub fn children_or_insert(&mut self) -> &mut BTreeMap<String, Node> {
        self.children
            .get_or_insert(None)
            .get_or_insert_with(BTreeMap::new)
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_none()
    }

    /// Current value of `field` rendered as text, if the node carries it.
    pub fn field_text(&self, field: Field) -> Option<String> {
        match field {
            Field::Status => self
                .status()
                .map(|s| s.to_string())
                .or_else(|| self.status_text().map(str::to_string)),
            Field::Comment => self.comment().map(str::to_string),
            Field::Mapping => self.mapping().map(str::to_string),
        }
    }
}
