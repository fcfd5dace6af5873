//! Narrative draft session: one draft, its per-point image tasks, and the
//! last error shown to the user.

use futures::stream::{FuturesUnordered, StreamExt};

use slidemint_genai::{AiError, GenerativeBackend};
use slidemint_project_model::draft::{Draft, DraftRequest};
use slidemint_project_model::image_data::ImageData;

use crate::error::{StudioError, UserFacingError};
use crate::registry::{ApplyOutcome, TaskRegistry, Ticket};

#[derive(Debug, Default)]
pub struct DraftSession {
    draft: Option<Draft>,
    registry: TaskRegistry<String>,
    last_error: Option<UserFacingError>,
    credential_blocked: bool,
}

impl DraftSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn into_draft(self) -> Option<Draft> {
        self.draft
    }

    pub fn last_error(&self) -> Option<&UserFacingError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set after a credential failure; new calls are refused until
    /// [`DraftSession::unblock`].
    pub fn is_credential_blocked(&self) -> bool {
        self.credential_blocked
    }

    /// Resume after the user supplied a new key.
    pub fn unblock(&mut self) {
        self.credential_blocked = false;
        if self
            .last_error
            .as_ref()
            .is_some_and(|e| e.category.requires_credential_prompt())
        {
            self.last_error = None;
        }
    }

    /// Generate a new draft, then one image per point.
    ///
    /// Image tasks of any previous draft are invalidated first. Returns the
    /// per-point image outcomes in completion order.
    pub async fn start(
        &mut self,
        request: DraftRequest,
        backend: &dyn GenerativeBackend,
    ) -> Result<Vec<(String, ApplyOutcome)>, StudioError> {
        self.ensure_unblocked()?;
        request.validate()?;
        self.last_error = None;
        self.registry.invalidate_all();

        tracing::info!(
            topic = %request.topic,
            insights = request.insights.len(),
            tone = %request.tone,
            "Generating draft"
        );
        let draft = match backend.generate_draft(&request).await {
            Ok(draft) => draft,
            Err(e) => {
                self.record_error(&e);
                return Err(e.into());
            }
        };
        self.draft = Some(draft);

        Ok(self.generate_all_images(backend).await)
    }

    /// Mark `point_id` as generating and issue its ticket.
    ///
    /// Any earlier ticket for the point becomes stale.
    pub fn begin_image(&mut self, point_id: &str) -> Option<Ticket<String>> {
        let point = self.draft.as_mut()?.point_mut(point_id)?;
        point.is_generating = true;
        Some(self.registry.issue(point_id.to_string()))
    }

    /// Apply a finished image task to its point only.
    pub fn complete_image(
        &mut self,
        ticket: Ticket<String>,
        result: Result<ImageData, AiError>,
    ) -> ApplyOutcome {
        if !self.registry.redeem(&ticket) {
            tracing::debug!(point = %ticket.key(), "Dropping stale image result");
            return ApplyOutcome::Stale;
        }
        let Some(point) = self
            .draft
            .as_mut()
            .and_then(|d| d.point_mut(ticket.key()))
        else {
            return ApplyOutcome::Stale;
        };

        point.is_generating = false;
        match result {
            Ok(image) => {
                point.image = Some(image);
                ApplyOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(point = %ticket.key(), error = %e, "Image generation failed");
                self.record_error(&e);
                ApplyOutcome::Failed
            }
        }
    }

    /// Drop a point; its in-flight task, if any, becomes stale.
    pub fn remove_point(&mut self, point_id: &str) -> bool {
        self.registry.invalidate(&point_id.to_string());
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let before = draft.points.len();
        draft.points.retain(|p| p.id != point_id);
        draft.points.len() != before
    }

    /// Generate images for every point that has none and is not already
    /// generating. Results are applied as they arrive.
    pub async fn generate_all_images(
        &mut self,
        backend: &dyn GenerativeBackend,
    ) -> Vec<(String, ApplyOutcome)> {
        if self.credential_blocked {
            tracing::warn!("Skipping image generation while the credential is blocked");
            return Vec::new();
        }

        let jobs: Vec<(String, String)> = self
            .draft
            .iter()
            .flat_map(|d| d.points.iter())
            .filter(|p| p.image.is_none() && !p.is_generating)
            .map(|p| (p.id.clone(), p.suggested_prompt.clone()))
            .collect();

        let mut pending = FuturesUnordered::new();
        for (id, prompt) in jobs {
            if let Some(ticket) = self.begin_image(&id) {
                pending.push(async move {
                    let result = backend.generate_image(&prompt).await;
                    (ticket, result)
                });
            }
        }
        tracing::info!(count = pending.len(), "Generating slide images");

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some((ticket, result)) = pending.next().await {
            let id = ticket.key().clone();
            let outcome = self.complete_image(ticket, result);
            outcomes.push((id, outcome));
        }
        outcomes
    }

    /// Generate a fresh image for one point from its prompt.
    pub async fn regenerate_image(
        &mut self,
        point_id: &str,
        backend: &dyn GenerativeBackend,
    ) -> Result<ApplyOutcome, StudioError> {
        self.ensure_unblocked()?;
        let prompt = self
            .draft
            .as_ref()
            .and_then(|d| d.point(point_id))
            .map(|p| p.suggested_prompt.clone())
            .ok_or_else(|| StudioError::UnknownPoint(point_id.to_string()))?;

        let ticket = self
            .begin_image(point_id)
            .ok_or_else(|| StudioError::UnknownPoint(point_id.to_string()))?;
        let result = backend.generate_image(&prompt).await;
        Ok(self.complete_image(ticket, result))
    }

    /// Rework the point's current image according to `instruction`.
    pub async fn edit_point_image(
        &mut self,
        point_id: &str,
        instruction: &str,
        backend: &dyn GenerativeBackend,
    ) -> Result<ApplyOutcome, StudioError> {
        self.ensure_unblocked()?;
        let point = self
            .draft
            .as_ref()
            .and_then(|d| d.point(point_id))
            .ok_or_else(|| StudioError::UnknownPoint(point_id.to_string()))?;
        let image = point
            .image
            .clone()
            .ok_or_else(|| StudioError::NothingToEdit(point_id.to_string()))?;

        let ticket = self
            .begin_image(point_id)
            .ok_or_else(|| StudioError::UnknownPoint(point_id.to_string()))?;
        let result = backend.edit_image(&image, instruction).await;
        Ok(self.complete_image(ticket, result))
    }

    fn ensure_unblocked(&self) -> Result<(), StudioError> {
        if self.credential_blocked {
            return Err(StudioError::CredentialBlocked);
        }
        Ok(())
    }

    fn record_error(&mut self, err: &AiError) {
        let shown = UserFacingError::from(err);
        if shown.category.requires_credential_prompt() {
            self.credential_blocked = true;
        }
        self.last_error = Some(shown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use slidemint_genai::ErrorCategory;
    use slidemint_project_model::draft::Tone;

    fn request() -> DraftRequest {
        DraftRequest::new("Scaling teams", ["Grow faster", "Hire smarter"], Tone::Professional)
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_insights_give_two_points_and_two_image_calls() {
        let backend = FakeBackend::new();
        let mut session = DraftSession::new();

        let outcomes = session.start(request(), &backend).await.unwrap();

        let draft = session.draft().unwrap();
        assert_eq!(draft.points.len(), 2);
        assert_eq!(backend.image_calls(), 2);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|(_, o)| *o == ApplyOutcome::Applied));
        assert!(draft
            .points
            .iter()
            .all(|p| p.image.is_some() && !p.is_generating));
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_apply_in_completion_order() {
        // The first prompt is slowest, so its point finishes last.
        let backend = FakeBackend::new()
            .with_delay("prompt for Grow faster", 300)
            .with_delay("prompt for Hire smarter", 100);
        let mut session = DraftSession::new();

        let outcomes = session.start(request(), &backend).await.unwrap();
        let order: Vec<&str> = outcomes.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["p-1", "p-0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failure_only_touches_its_point() {
        let backend = FakeBackend::new().failing_image(
            "prompt for Hire smarter",
            AiError::NoImageReturned { edit: false },
        );
        let mut session = DraftSession::new();

        session.start(request(), &backend).await.unwrap();

        let draft = session.draft().unwrap();
        assert!(draft.points[0].image.is_some());
        assert!(draft.points[1].image.is_none());
        assert!(!draft.points[1].is_generating);
        let shown = session.last_error().unwrap();
        assert_eq!(shown.category, ErrorCategory::NoImage);
        assert!(!session.is_credential_blocked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_key_blocks_further_calls() {
        let backend = FakeBackend::new().failing_draft(AiError::InvalidCredential {
            message: "API key not valid".to_string(),
        });
        let mut session = DraftSession::new();

        let err = session.start(request(), &backend).await.unwrap_err();
        assert!(matches!(err, StudioError::Ai(AiError::InvalidCredential { .. })));
        assert!(session.is_credential_blocked());
        assert_eq!(
            session.last_error().unwrap().message,
            "Please check your API key."
        );

        let again = session.start(request(), &backend).await.unwrap_err();
        assert_eq!(again, StudioError::CredentialBlocked);
        assert_eq!(backend.draft_calls(), 1);

        session.unblock();
        assert!(session.last_error().is_none());
        assert!(!session.is_credential_blocked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entitlement_error_carries_billing_link() {
        let backend = FakeBackend::new().failing_draft(AiError::EntitlementRequired {
            message: "Requested entity was not found.".to_string(),
        });
        let mut session = DraftSession::new();

        session.start(request(), &backend).await.unwrap_err();
        let shown = session.last_error().unwrap();
        assert_eq!(shown.help_link, Some(slidemint_genai::error::BILLING_GUIDE_URL));
        assert!(!session.is_credential_blocked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_request_makes_no_call() {
        let backend = FakeBackend::new();
        let mut session = DraftSession::new();
        let request = DraftRequest {
            topic: " ".to_string(),
            insights: vec!["x".to_string()],
            tone: Tone::Casual,
        };

        let err = session.start(request, &backend).await.unwrap_err();
        assert!(matches!(err, StudioError::InvalidRequest(_)));
        assert_eq!(backend.draft_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_point_drops_late_result() {
        let backend = FakeBackend::new();
        let mut session = DraftSession::new();
        session.start(request(), &backend).await.unwrap();

        let ticket = session.begin_image("p-1").unwrap();
        assert!(session.remove_point("p-1"));
        let outcome = session.complete_image(ticket, Ok(ImageData::png(vec![7])));

        assert_eq!(outcome, ApplyOutcome::Stale);
        let draft = session.draft().unwrap();
        assert_eq!(draft.points.len(), 1);
        assert_eq!(draft.points[0].id, "p-0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_ticket_is_stale() {
        let backend = FakeBackend::new();
        let mut session = DraftSession::new();
        session.start(request(), &backend).await.unwrap();

        let old = session.begin_image("p-0").unwrap();
        let new = session.begin_image("p-0").unwrap();
        assert_eq!(
            session.complete_image(old, Ok(ImageData::png(vec![1]))),
            ApplyOutcome::Stale
        );
        assert!(session.draft().unwrap().points[0].is_generating);
        assert_eq!(
            session.complete_image(new, Ok(ImageData::png(vec![2]))),
            ApplyOutcome::Applied
        );
        assert_eq!(
            session.draft().unwrap().points[0].image.as_ref().unwrap().bytes(),
            &[2]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_and_regenerate() {
        let backend = FakeBackend::new();
        let mut session = DraftSession::new();
        session.start(request(), &backend).await.unwrap();

        let outcome = session
            .edit_point_image("p-0", "warmer light", &backend)
            .await
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(backend.edit_calls(), 1);

        let outcome = session.regenerate_image("p-1", &backend).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(backend.image_calls(), 3);

        let err = session
            .regenerate_image("p-9", &backend)
            .await
            .unwrap_err();
        assert_eq!(err, StudioError::UnknownPoint("p-9".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_requires_existing_image() {
        let backend = FakeBackend::new().failing_image(
            "prompt for Grow faster",
            AiError::NoImageReturned { edit: false },
        );
        let mut session = DraftSession::new();
        session.start(request(), &backend).await.unwrap();

        let err = session
            .edit_point_image("p-0", "brighter", &backend)
            .await
            .unwrap_err();
        assert_eq!(err, StudioError::NothingToEdit("p-0".to_string()));
        assert_eq!(backend.edit_calls(), 0);
    }
}
