use tracing::error;

use podium_types::models::{
    Comment, CommentData, ContentRequest, NewContentRequest, Presentation, PresentationData,
    PresentationPatch,
};

use crate::Database;
use crate::error::Result;
use crate::store::Filter;

impl Database {
    // -- Presentations --

    pub async fn get_all_presentations(&self) -> Result<Vec<Presentation>> {
        self.presentations.find_all().await
    }

    pub async fn get_presentation_by_id(&self, id: &str) -> Result<Option<Presentation>> {
        self.presentations.find_by_id(id).await
    }

    pub async fn create_presentation(&self, data: PresentationData) -> Result<Presentation> {
        self.presentations.create(data).await
    }

    /// `Ok(None)` when there is no such presentation.
    ///
    /// The existence check and the write are separate loads; a delete landing
    /// in between surfaces as `StoreError::NotFound`.
    pub async fn update_presentation(
        &self,
        id: &str,
        patch: &PresentationPatch,
    ) -> Result<Option<Presentation>> {
        if self.presentations.find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        self.presentations.update(id, patch).await.map(Some)
    }

    /// Best effort: failures are logged and reported as `false`.
    /// Comments and content requests for the presentation are kept.
    pub async fn delete_presentation(&self, id: &str) -> bool {
        match self.presentations.delete(id).await {
            Ok(()) => true,
            Err(e) => {
                error!("Error deleting presentation {}: {}", id, e);
                false
            }
        }
    }

    // -- Comments --

    pub async fn get_comments_by_presentation_id(&self, presentation_id: &str) -> Result<Vec<Comment>> {
        self.comments
            .find_many(&Filter::new().with("presentationId", presentation_id))
            .await
    }

    pub async fn create_comment(&self, data: CommentData) -> Result<Comment> {
        self.comments.create(data).await
    }

    // -- Content requests --

    /// Always stored as pending. A negative or non-finite offer is rejected.
    pub async fn create_content_request(&self, request: NewContentRequest) -> Result<ContentRequest> {
        let data = request.into_pending()?;
        self.content_requests.create(data).await
    }

    pub async fn get_content_requests_by_presentation_id(
        &self,
        presentation_id: &str,
    ) -> Result<Vec<ContentRequest>> {
        self.content_requests
            .find_many(&Filter::new().with("presentationId", presentation_id))
            .await
    }
}
