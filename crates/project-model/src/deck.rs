//! The ordered slide sequence.
//!
//! Insertion order is carousel order: it drives export pagination and the
//! "N of total" label baked into each slide.

use serde::{Deserialize, Serialize};

use crate::image_data::ImageData;
use crate::slide::{Slide, SlideEdit, SlideId};

/// An ordered collection of slides plus the article used as analysis context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Free text passed to image analysis as context.
    #[serde(default)]
    pub context_article: String,

    #[serde(default)]
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide in the `Analyzing` state and return its id.
    pub fn attach(&mut self, source_image: ImageData) -> SlideId {
        let slide = Slide::analyzing(source_image);
        let id = slide.id.clone();
        self.slides.push(slide);
        id
    }

    /// Append an already-built slide.
    pub fn push(&mut self, slide: Slide) -> SlideId {
        let id = slide.id.clone();
        self.slides.push(slide);
        id
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    pub fn get(&self, id: &SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &SlideId) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| &s.id == id)
    }

    /// Slide at a zero-based carousel position.
    pub fn at(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn index_of(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| &s.id == id)
    }

    /// Remove a slide, returning it if present.
    pub fn remove(&mut self, id: &SlideId) -> Option<Slide> {
        let index = self.index_of(id)?;
        Some(self.slides.remove(index))
    }

    /// Swap the slide at `index` with its predecessor. Returns whether it moved.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.slides.len() {
            return false;
        }
        self.slides.swap(index, index - 1);
        true
    }

    /// Swap the slide at `index` with its successor. Returns whether it moved.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.slides.len() {
            return false;
        }
        self.slides.swap(index, index + 1);
        true
    }

    /// Apply a user edit to one slide. Returns false when the id is unknown.
    pub fn update(&mut self, id: &SlideId, edit: SlideEdit) -> bool {
        match self.get_mut(id) {
            Some(slide) => {
                slide.apply_edit(edit);
                true
            }
            None => false,
        }
    }
}
