use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored record: the domain fields of `T` plus the audit fields the store
/// stamps. Serialized as one flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<T> {
    #[serde(flatten)]
    pub data: T,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Deref for Document<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

pub type Presentation = Document<PresentationData>;
pub type Comment = Document<CommentData>;
pub type ContentRequest = Document<ContentRequestData>;

/// Who a new record is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// -- Presentations --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Youtube,
    Upload,
    #[default]
    None,
}

impl VideoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Upload => "upload",
            Self::None => "none",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown video type '{0}'")]
pub struct UnknownVideoType(pub String);

impl FromStr for VideoType {
    type Err = UnknownVideoType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Self::Youtube),
            "upload" => Ok(Self::Upload),
            "none" => Ok(Self::None),
            other => Err(UnknownVideoType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationData {
    pub title: String,
    /// Markdown.
    pub summary: String,
    pub video_url: String,
    /// Records written before the field existed decode as `none`.
    #[serde(default)]
    pub video_type: VideoType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file_name: Option<String>,
    pub github_url: String,
    pub author_id: String,
    pub author_name: String,
}

/// Partial update for a presentation. `None` leaves a field as it is.
///
/// `video_file_name` is doubly optional: `Some(None)` is written as `null`
/// and clears the stored file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_type: Option<VideoType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_file_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl PresentationPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// -- Comments --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentData {
    pub content: String,
    pub user_id: String,
    pub user_name: String,
    pub presentation_id: String,
}

// -- Content requests --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequestData {
    pub presentation_id: String,
    /// Free-form, e.g. "course" or "workshop".
    pub request_type: String,
    pub description: String,
    #[serde(default)]
    pub offer_amount: f64,
    pub status: RequestStatus,
    pub user_id: String,
    pub user_name: String,
}

/// A content request as submitted. There is no status field: every request
/// starts out pending.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContentRequest {
    pub presentation_id: String,
    pub request_type: String,
    pub description: String,
    pub offer_amount: f64,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("offer amount must be a finite non-negative number, got {0}")]
pub struct InvalidOfferAmount(pub f64);

impl NewContentRequest {
    /// Fails unless the offer amount is finite and not negative.
    pub fn into_pending(self) -> Result<ContentRequestData, InvalidOfferAmount> {
        if !self.offer_amount.is_finite() || self.offer_amount < 0.0 {
            return Err(InvalidOfferAmount(self.offer_amount));
        }

        Ok(ContentRequestData {
            presentation_id: self.presentation_id,
            request_type: self.request_type,
            description: self.description,
            offer_amount: self.offer_amount,
            status: RequestStatus::Pending,
            user_id: self.user_id,
            user_name: self.user_name,
        })
    }
}
