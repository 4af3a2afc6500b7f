use serde::Deserialize;
use thiserror::Error;

use crate::models::{Actor, CommentData, NewContentRequest, PresentationData, PresentationPatch, VideoType};

/// Rejected caller input. Maps to 400 at an HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and summary are required")]
    MissingTitleOrSummary,

    #[error("Invalid video type")]
    InvalidVideoType(String),

    #[error("YouTube URL is required when video type is YouTube")]
    MissingYoutubeUrl,

    #[error("Comment content is required")]
    MissingCommentContent,

    #[error("Request type and description are required")]
    MissingRequestTypeOrDescription,

    #[error("Offer amount must be a non-negative number")]
    InvalidOfferAmount,
}

fn parse_video_type(raw: Option<String>) -> Result<Option<VideoType>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| ValidationError::InvalidVideoType(s)),
    }
}

// -- Presentations --

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePresentationRequest {
    pub title: String,
    pub summary: String,
    pub video_url: String,
    pub video_type: Option<String>,
    pub video_file_name: Option<String>,
    pub github_url: String,
}

impl CreatePresentationRequest {
    pub fn validate(self, author: &Actor) -> Result<PresentationData, ValidationError> {
        if self.title.is_empty() || self.summary.is_empty() {
            return Err(ValidationError::MissingTitleOrSummary);
        }

        let video_type = parse_video_type(self.video_type)?.unwrap_or_default();
        if video_type == VideoType::Youtube && self.video_url.is_empty() {
            return Err(ValidationError::MissingYoutubeUrl);
        }

        Ok(PresentationData {
            title: self.title,
            summary: self.summary,
            video_url: self.video_url,
            video_type,
            video_file_name: self.video_file_name,
            github_url: self.github_url,
            author_id: author.id.clone(),
            author_name: author.name.clone(),
        })
    }
}

/// Only the fields present in the body end up in the patch.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePresentationRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub video_url: Option<String>,
    pub video_type: Option<String>,
    pub video_file_name: Option<String>,
    pub github_url: Option<String>,
}

impl UpdatePresentationRequest {
    pub fn validate(self) -> Result<PresentationPatch, ValidationError> {
        let video_type = parse_video_type(self.video_type)?;

        Ok(PresentationPatch {
            title: self.title,
            summary: self.summary,
            video_url: self.video_url,
            video_type,
            video_file_name: self.video_file_name.map(Some),
            github_url: self.github_url,
        })
    }
}

// -- Comments --

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl CreateCommentRequest {
    pub fn validate(self, presentation_id: &str, author: &Actor) -> Result<CommentData, ValidationError> {
        if self.content.is_empty() {
            return Err(ValidationError::MissingCommentContent);
        }

        Ok(CommentData {
            content: self.content,
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            presentation_id: presentation_id.to_string(),
        })
    }
}

// -- Content requests --

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateContentRequestRequest {
    pub request_type: String,
    pub description: String,
    pub offer_amount: Option<f64>,
    /// Parsed so older clients are not rejected, then dropped: new requests
    /// are always pending.
    pub status: Option<String>,
}

impl CreateContentRequestRequest {
    pub fn validate(self, presentation_id: &str, author: &Actor) -> Result<NewContentRequest, ValidationError> {
        if self.request_type.is_empty() || self.description.is_empty() {
            return Err(ValidationError::MissingRequestTypeOrDescription);
        }

        let offer_amount = self.offer_amount.unwrap_or(0.0);
        if !offer_amount.is_finite() || offer_amount < 0.0 {
            return Err(ValidationError::InvalidOfferAmount);
        }

        Ok(NewContentRequest {
            presentation_id: presentation_id.to_string(),
            request_type: self.request_type,
            description: self.description,
            offer_amount,
            user_id: author.id.clone(),
            user_name: author.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author() -> Actor {
        Actor::new("user123", "Demo User")
    }

    fn parse<T: for<'de> Deserialize<'de>>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_presentation_fills_defaults() {
        let req: CreatePresentationRequest = parse(json!({ "title": "T", "summary": "S" }));
        let data = req.validate(&author()).unwrap();

        assert_eq!(data.video_type, VideoType::None);
        assert_eq!(data.video_url, "");
        assert_eq!(data.github_url, "");
        assert_eq!(data.author_id, "user123");
        assert_eq!(data.author_name, "Demo User");
    }

    #[test]
    fn create_presentation_requires_title_and_summary() {
        let req: CreatePresentationRequest = parse(json!({ "title": "T" }));
        assert_eq!(req.validate(&author()), Err(ValidationError::MissingTitleOrSummary));

        let req: CreatePresentationRequest = parse(json!({ "title": "", "summary": "S" }));
        assert_eq!(req.validate(&author()), Err(ValidationError::MissingTitleOrSummary));
    }

    #[test]
    fn create_presentation_rejects_unknown_video_type() {
        let req: CreatePresentationRequest =
            parse(json!({ "title": "T", "summary": "S", "videoType": "vimeo" }));
        assert_eq!(
            req.validate(&author()),
            Err(ValidationError::InvalidVideoType("vimeo".into()))
        );
    }

    #[test]
    fn youtube_presentation_needs_url() {
        let req: CreatePresentationRequest =
            parse(json!({ "title": "T", "summary": "S", "videoType": "youtube" }));
        assert_eq!(req.validate(&author()), Err(ValidationError::MissingYoutubeUrl));

        let req: CreatePresentationRequest = parse(json!({
            "title": "T",
            "summary": "S",
            "videoType": "youtube",
            "videoUrl": "https://youtu.be/abc"
        }));
        let data = req.validate(&author()).unwrap();
        assert_eq!(data.video_type, VideoType::Youtube);
        assert_eq!(data.video_url, "https://youtu.be/abc");
    }

    #[test]
    fn update_presentation_only_patches_present_fields() {
        let req: UpdatePresentationRequest = parse(json!({ "summary": "new" }));
        let patch = req.validate().unwrap();

        assert_eq!(patch.summary.as_deref(), Some("new"));
        assert_eq!(patch.title, None);
        assert_eq!(patch.video_file_name, None);

        let req: UpdatePresentationRequest = parse(json!({ "videoType": "bogus" }));
        assert!(matches!(req.validate(), Err(ValidationError::InvalidVideoType(_))));
    }

    #[test]
    fn comment_requires_content() {
        let req: CreateCommentRequest = parse(json!({ "content": "" }));
        assert_eq!(
            req.validate("p1", &author()),
            Err(ValidationError::MissingCommentContent)
        );

        let req: CreateCommentRequest = parse(json!({ "content": "hi" }));
        let data = req.validate("p1", &author()).unwrap();
        assert_eq!(data.presentation_id, "p1");
        assert_eq!(data.content, "hi");
    }

    #[test]
    fn content_request_defaults_offer_and_ignores_status() {
        let req: CreateContentRequestRequest = parse(json!({
            "requestType": "course",
            "description": "d",
            "status": "accepted"
        }));
        let new = req.validate("p1", &author()).unwrap();

        assert_eq!(new.offer_amount, 0.0);
        assert_eq!(new.presentation_id, "p1");
    }

    #[test]
    fn content_request_validation() {
        let req: CreateContentRequestRequest = parse(json!({ "requestType": "course" }));
        assert_eq!(
            req.validate("p1", &author()),
            Err(ValidationError::MissingRequestTypeOrDescription)
        );

        let req: CreateContentRequestRequest =
            parse(json!({ "requestType": "course", "description": "d", "offerAmount": -1 }));
        assert_eq!(
            req.validate("p1", &author()),
            Err(ValidationError::InvalidOfferAmount)
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<CreateCommentRequest>(json!({ "content": "hi", "userId": "x" }));
        assert!(result.is_err());
    }
}
