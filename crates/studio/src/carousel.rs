//! Carousel building: attach background images and analyse them
//! concurrently.

use futures::stream::{FuturesUnordered, StreamExt};

use slidemint_genai::{AiError, GenerativeBackend};
use slidemint_project_model::deck::Deck;
use slidemint_project_model::image_data::ImageData;
use slidemint_project_model::slide::{Slide, SlideAnalysis, SlideId};

use crate::error::{StudioError, UserFacingError};
use crate::registry::{ApplyOutcome, TaskRegistry, Ticket};

/// An image picked by the user, with the filename used as analysis context.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub image: ImageData,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, image: ImageData) -> Self {
        Self {
            filename: filename.into(),
            image,
        }
    }
}

/// A deck plus the analysis tasks still running against it.
///
/// A credential failure blocks further analyses until [`CarouselStudio::unblock`].
#[derive(Debug, Default)]
pub struct CarouselStudio {
    deck: Deck,
    registry: TaskRegistry<SlideId>,
    last_error: Option<UserFacingError>,
    credential_blocked: bool,
}

impl CarouselStudio {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            ..Self::default()
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Mutable deck access for edits. Remove slides through
    /// [`CarouselStudio::remove`] so pending analyses are dropped.
    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub fn into_deck(self) -> Deck {
        self.deck
    }

    pub fn pending_analyses(&self) -> usize {
        self.registry.in_flight()
    }

    pub fn last_error(&self) -> Option<&UserFacingError> {
        self.last_error.as_ref()
    }

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

    /// Append an `Analyzing` slide for `image` and issue its ticket.
    pub fn attach(&mut self, image: ImageData) -> Ticket<SlideId> {
        let id = self.deck.attach(image);
        self.registry.issue(id)
    }

    /// Attach every image, then analyse them all at once. Results are
    /// applied in completion order.
    ///
    /// Nothing is attached while the credential is blocked.
    pub async fn attach_images(
        &mut self,
        uploads: Vec<UploadedImage>,
        backend: &dyn GenerativeBackend,
    ) -> Result<Vec<(SlideId, ApplyOutcome)>, StudioError> {
        if self.credential_blocked {
            return Err(StudioError::CredentialBlocked);
        }
        let context = self.deck.context_article.clone();
        let mut pending = FuturesUnordered::new();
        for upload in uploads {
            let ticket = self.attach(upload.image.clone());
            let context = context.clone();
            pending.push(async move {
                let result = backend
                    .analyze_image(&upload.image, &context, &upload.filename)
                    .await;
                (ticket, result)
            });
        }
        tracing::info!(count = pending.len(), "Analysing slide images");

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some((ticket, result)) = pending.next().await {
            let id = ticket.key().clone();
            let outcome = self.apply_analysis(ticket, result);
            outcomes.push((id, outcome));
        }
        Ok(outcomes)
    }

    /// Apply a finished analysis to its slide only.
    pub fn apply_analysis(
        &mut self,
        ticket: Ticket<SlideId>,
        result: Result<SlideAnalysis, AiError>,
    ) -> ApplyOutcome {
        if !self.registry.redeem(&ticket) {
            tracing::debug!(slide = %ticket.key(), "Dropping stale analysis");
            return ApplyOutcome::Stale;
        }
        let Some(slide) = self.deck.get_mut(ticket.key()) else {
            return ApplyOutcome::Stale;
        };

        match result {
            Ok(analysis) => {
                tracing::debug!(
                    slide = %slide.id,
                    theme = ?analysis.theme,
                    placement = ?analysis.placement,
                    "Analysis applied"
                );
                slide.apply_analysis(analysis);
                ApplyOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(slide = %slide.id, error = %e, "Analysis failed");
                slide.fail_analysis(e.user_message());
                let shown = UserFacingError::from(&e);
                if shown.category.requires_credential_prompt() {
                    self.credential_blocked = true;
                }
                self.last_error = Some(shown);
                ApplyOutcome::Failed
            }
        }
    }

    /// Remove a slide; a pending analysis for it is discarded on arrival.
    pub fn remove(&mut self, id: &SlideId) -> Option<Slide> {
        self.registry.invalidate(id);
        self.deck.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use std::time::Duration;
    use slidemint_project_model::slide::{Placement, SlideStatus, Theme};

    fn image(tag: u8) -> ImageData {
        ImageData::png(vec![tag])
    }

    fn analysis(caption: &str, placement: Placement) -> SlideAnalysis {
        SlideAnalysis {
            theme: Theme::Light,
            caption: caption.to_string(),
            placement,
        }
    }

    #[test]
    fn test_bottom_placement_moves_caption_and_pillar() {
        let mut studio = CarouselStudio::default();
        let ticket = studio.attach(image(1));
        let id = ticket.key().clone();

        let outcome = studio.apply_analysis(ticket, Ok(analysis("Ship it", Placement::Bottom)));

        assert_eq!(outcome, ApplyOutcome::Applied);
        let slide = studio.deck().get(&id).unwrap();
        assert_eq!(slide.positions.content.y, 65.0);
        assert_eq!(slide.positions.pillar.y, 65.0);
        assert_eq!(slide.content, "Ship it");
        assert_eq!(slide.theme, Theme::Light);
        assert_eq!(slide.status, SlideStatus::Idle);
    }

    #[test]
    fn test_removed_slide_never_receives_result() {
        let mut studio = CarouselStudio::default();
        let a = studio.attach(image(1));
        let b = studio.attach(image(2));
        let c = studio.attach(image(3));
        let (a_id, b_id, c_id) = (a.key().clone(), b.key().clone(), c.key().clone());

        assert!(studio.remove(&b_id).is_some());
        assert_eq!(
            studio.apply_analysis(b, Ok(analysis("B", Placement::Center))),
            ApplyOutcome::Stale
        );
        assert_eq!(
            studio.apply_analysis(c, Ok(analysis("C", Placement::Top))),
            ApplyOutcome::Applied
        );
        assert_eq!(
            studio.apply_analysis(a, Ok(analysis("A", Placement::Bottom))),
            ApplyOutcome::Applied
        );

        let deck = studio.deck();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.get(&a_id).unwrap().content, "A");
        assert_eq!(deck.get(&c_id).unwrap().content, "C");
        assert!(deck.get(&b_id).is_none());
        assert_eq!(studio.pending_analyses(), 0);
    }

    #[test]
    fn test_failed_analysis_marks_error_and_keeps_caption() {
        let mut studio = CarouselStudio::default();
        let ticket = studio.attach(image(1));
        let id = ticket.key().clone();

        let outcome = studio.apply_analysis(
            ticket,
            Err(AiError::Transport {
                message: "connection reset".to_string(),
            }),
        );

        assert_eq!(outcome, ApplyOutcome::Failed);
        let slide = studio.deck().get(&id).unwrap();
        assert!(matches!(slide.status, SlideStatus::Error { .. }));
        assert!(slide.content.is_empty());
        assert!(slide.status.overlay_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_images_analyses_concurrently() {
        let backend = FakeBackend::new()
            .with_delay("slow.png", 500)
            .with_delay("fast.png", 50)
            .with_analysis("fast.png", Ok(analysis("Fast", Placement::Center)));
        let mut studio = CarouselStudio::default();
        studio.deck_mut().context_article = "Hiring in 2026".to_string();

        let started = tokio::time::Instant::now();
        let outcomes = studio
            .attach_images(
                vec![
                    UploadedImage::new("slow.png", image(1)),
                    UploadedImage::new("fast.png", image(2)),
                ],
                &backend,
            )
            .await
            .unwrap();

        // Both calls overlap, so the wall time is the slowest one.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(550));
        assert_eq!(backend.analysis_calls(), 2);

        let deck = studio.deck();
        let order: Vec<SlideId> = outcomes.iter().map(|(id, _)| id.clone()).collect();
        assert_eq!(order, vec![deck.slides()[1].id.clone(), deck.slides()[0].id.clone()]);
        assert_eq!(deck.slides()[0].content, "Caption for slow.png");
        assert_eq!(deck.slides()[1].positions.content.y, 35.0);
        assert!(deck.iter().all(|s| s.status == SlideStatus::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_key_blocks_further_analyses() {
        let backend = FakeBackend::new().with_analysis(
            "first.png",
            Err(AiError::InvalidCredential {
                message: "API key not valid".to_string(),
            }),
        );
        let mut studio = CarouselStudio::default();

        let outcomes = studio
            .attach_images(vec![UploadedImage::new("first.png", image(1))], &backend)
            .await
            .unwrap();
        assert_eq!(outcomes[0].1, ApplyOutcome::Failed);
        assert!(studio.is_credential_blocked());
        assert!(studio.last_error().unwrap().category.requires_credential_prompt());

        let err = studio
            .attach_images(vec![UploadedImage::new("second.png", image(2))], &backend)
            .await
            .unwrap_err();
        assert_eq!(err, StudioError::CredentialBlocked);
        assert_eq!(backend.analysis_calls(), 1);
        assert_eq!(studio.deck().len(), 1);

        studio.unblock();
        assert!(studio.last_error().is_none());
        let outcomes = studio
            .attach_images(vec![UploadedImage::new("second.png", image(2))], &backend)
            .await
            .unwrap();
        assert_eq!(outcomes[0].1, ApplyOutcome::Applied);
        assert_eq!(backend.analysis_calls(), 2);
    }

    #[test]
    fn test_transport_failure_does_not_block() {
        let mut studio = CarouselStudio::default();
        let ticket = studio.attach(image(1));
        studio.apply_analysis(
            ticket,
            Err(AiError::Transport {
                message: "timeout".to_string(),
            }),
        );
        assert!(!studio.is_credential_blocked());
        assert!(studio.last_error().is_some());
    }
}
