//! Build and edit a carousel deck.

use std::path::Path;

use slidemint_common::config::AppConfig;
use slidemint_layout_core::fonts::FontSet;
use slidemint_overlay_editor::{ContainerRect, HeightFeedback, OverlayEditor};
use slidemint_project_model::image_data::ImageData;
use slidemint_project_model::position::ElementId;
use slidemint_project_model::project::LoadedDeck;
use slidemint_project_model::slide::{Placement, Slide, SlideEdit, SlideStatus, Theme};
use slidemint_studio::{ApplyOutcome, CarouselStudio, UploadedImage};

use super::{ai_client, slide_index};
use crate::DeckAction;

pub async fn run(config: &AppConfig, action: DeckAction) -> anyhow::Result<()> {
    match action {
        DeckAction::Init {
            path,
            name,
            context,
        } => {
            let mut loaded = LoadedDeck::create(&path, &name)
                .map_err(|e| anyhow::anyhow!("Failed to create deck: {e}"))?;
            if let Some(context) = context {
                loaded.deck_mut().context_article = context;
                save(&loaded)?;
            }
            println!("Deck '{name}' created at {}", path.display());
            Ok(())
        }
        DeckAction::Add {
            path,
            images,
            no_analyze,
        } => add(config, &path, images, no_analyze).await,
        DeckAction::List { path } => list(&path),
        DeckAction::Remove { path, slide } => {
            let mut loaded = load(&path)?;
            let index = slide_index(slide, loaded.deck().len())?;
            let id = loaded.deck().slides()[index].id.clone();
            loaded.deck_mut().remove(&id);
            save(&loaded)?;
            println!("Removed slide {slide}");
            Ok(())
        }
        DeckAction::Move {
            path,
            slide,
            direction,
        } => {
            let mut loaded = load(&path)?;
            let index = slide_index(slide, loaded.deck().len())?;
            let moved = match direction.to_ascii_lowercase().as_str() {
                "up" => loaded.deck_mut().move_up(index),
                "down" => loaded.deck_mut().move_down(index),
                other => anyhow::bail!("Unknown direction '{other}' (expected up or down)"),
            };
            if moved {
                save(&loaded)?;
                println!("Moved slide {slide} {direction}");
            } else {
                println!("Slide {slide} is already at the {direction} end");
            }
            Ok(())
        }
        DeckAction::Text { path, slide, text } => {
            edit(config, &path, slide, SlideEdit::Content(text))
        }
        DeckAction::Theme { path, slide, theme } => {
            let theme: Theme = theme.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            edit(config, &path, slide, SlideEdit::Theme(theme))
        }
        DeckAction::Place {
            path,
            slide,
            placement,
        } => {
            let placement: Placement =
                placement.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let mut loaded = load(&path)?;
            let index = slide_index(slide, loaded.deck().len())?;
            let mut positions = loaded.deck().slides()[index].positions;
            positions.set_vertical(placement.content_y());
            drop(loaded);
            edit(config, &path, slide, SlideEdit::Positions(positions))
        }
        DeckAction::Drag {
            path,
            slide,
            element,
            x,
            y,
        } => {
            let element: ElementId = element.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let loaded = load(&path)?;
            let index = slide_index(slide, loaded.deck().len())?;
            let target = &loaded.deck().slides()[index];

            // Replay the gesture on a 100×100 container so pointer pixels
            // equal canvas percentages.
            let mut editor = OverlayEditor::new();
            editor.toggle_edit(&target.id);
            if !editor.pointer_down(&target.id, element, &target.positions) {
                anyhow::bail!("Slide {slide} is not editable");
            }
            let rect = ContainerRect::new(0.0, 0.0, 100.0, 100.0);
            let moved = editor
                .pointer_move(&target.id, (x, y), &rect, &target.positions)
                .ok_or_else(|| anyhow::anyhow!("Drag was not accepted"))?;
            editor.pointer_up();

            let (nx, ny) = moved.origin(element);
            drop(loaded);
            edit(config, &path, slide, SlideEdit::Positions(moved))?;
            println!("  {} now at ({nx:.1}%, {ny:.1}%)", element.as_str());
            Ok(())
        }
    }
}

async fn add(
    config: &AppConfig,
    path: &Path,
    images: Vec<std::path::PathBuf>,
    no_analyze: bool,
) -> anyhow::Result<()> {
    let mut loaded = load(path)?;
    let mut uploads = Vec::with_capacity(images.len());
    for image_path in &images {
        let image = ImageData::from_file(image_path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", image_path.display()))?;
        let filename = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        uploads.push(UploadedImage::new(filename, image));
    }

    if no_analyze {
        for upload in uploads {
            loaded.deck_mut().push(Slide::idle(upload.image));
        }
    } else {
        let client = ai_client(config)?;
        let mut studio = CarouselStudio::new(loaded.deck().clone());
        println!("Analysing {} image(s)...", uploads.len());
        let outcomes = studio.attach_images(uploads, &client).await?;
        let failed = outcomes
            .iter()
            .filter(|(_, o)| *o == ApplyOutcome::Failed)
            .count();
        if failed > 0 {
            println!("  {failed} analysis call(s) failed; those slides keep an empty caption");
        }
        if let Some(error) = studio.last_error() {
            println!("  {error}");
        }
        *loaded.deck_mut() = studio.into_deck();
    }

    let feedback = HeightFeedback::new(fonts(config), config.export.canvas_px);
    for index in 0..loaded.deck().len() {
        let id = loaded.deck().slides()[index].id.clone();
        if let Some(slide) = loaded.deck_mut().get_mut(&id) {
            feedback.refresh(slide);
        }
    }

    save(&loaded)?;
    println!("Deck now has {} slide(s)", loaded.deck().len());
    Ok(())
}

fn list(path: &Path) -> anyhow::Result<()> {
    let loaded = load(path)?;
    let file = &loaded.file;
    println!("Deck: {} ({} slides)", file.name, loaded.deck().len());
    if !loaded.deck().context_article.is_empty() {
        println!("  Context: {}", loaded.deck().context_article);
    }
    for (index, slide) in loaded.deck().iter().enumerate() {
        let status = match &slide.status {
            SlideStatus::Idle => "idle".to_string(),
            SlideStatus::Analyzing => "analyzing".to_string(),
            SlideStatus::Error { message } => format!("error: {message}"),
        };
        let p = &slide.positions;
        println!(
            "  {:>2}. [{:?}, {status}] {}",
            index + 1,
            slide.theme,
            if slide.content.is_empty() {
                "(no caption)"
            } else {
                slide.content.as_str()
            }
        );
        println!(
            "      content ({:.1}, {:.1}) w{:.1}  pillar ({:.1}, {:.1}) h{:.1}  branding ({:.1}, {:.1})  nav ({:.1}, {:.1})",
            p.content.x,
            p.content.y,
            p.content.width,
            p.pillar.x,
            p.pillar.y,
            p.pillar.height,
            p.branding.x,
            p.branding.y,
            p.navigation.x,
            p.navigation.y
        );
    }
    Ok(())
}

fn edit(config: &AppConfig, path: &Path, slide: usize, change: SlideEdit) -> anyhow::Result<()> {
    let mut loaded = load(path)?;
    let index = slide_index(slide, loaded.deck().len())?;
    let id = loaded.deck().slides()[index].id.clone();
    let feedback = HeightFeedback::new(fonts(config), config.export.canvas_px);
    if let Some(target) = loaded.deck_mut().get_mut(&id) {
        feedback.apply_edit(target, change);
    }
    save(&loaded)?;
    println!("Updated slide {slide}");
    Ok(())
}

fn fonts(config: &AppConfig) -> FontSet {
    FontSet::load(
        config.export.regular_font.as_deref(),
        config.export.bold_font.as_deref(),
    )
    .or_else(|e| {
        tracing::warn!(error = %e, "Configured font unusable; measuring with bundled fonts");
        FontSet::bundled()
    })
    .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to fixed-advance text metrics");
        FontSet::empty()
    })
}

fn load(path: &Path) -> anyhow::Result<LoadedDeck> {
    LoadedDeck::load(path).map_err(|e| anyhow::anyhow!("Failed to load deck: {e}"))
}

fn save(loaded: &LoadedDeck) -> anyhow::Result<()> {
    loaded
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save deck: {e}"))
}
