//! Export a deck as slide PNGs or a carousel PDF.

use std::io::Write as _;
use std::path::PathBuf;

use slidemint_common::config::AppConfig;
use slidemint_project_model::profile::Profile;
use slidemint_project_model::project::LoadedDeck;
use slidemint_render_engine::export::{
    export_all_with_page, export_one, export_pngs, DirectorySink, ExportProgress,
    ProgressCallback,
};
use slidemint_render_engine::SlideRenderer;

use super::slide_index;

pub fn run(
    config: &AppConfig,
    deck: PathBuf,
    slide: Option<usize>,
    output: Option<PathBuf>,
    png: bool,
    page_mm: Option<f32>,
) -> anyhow::Result<()> {
    println!("Exporting deck at: {}", deck.display());

    let loaded =
        LoadedDeck::load(&deck).map_err(|e| anyhow::anyhow!("Failed to load deck: {e}"))?;
    let profile = Profile::load(&config.profile_path())
        .map_err(|e| anyhow::anyhow!("Failed to load profile: {e}"))?;
    if profile.is_none() {
        println!("No profile set; nothing exported. Use `slidemint profile set` first.");
        return Ok(());
    }

    let renderer = SlideRenderer::from_defaults(&config.export)?;
    let output_dir = output.unwrap_or_else(|| config.export.output_dir.clone());
    let mut sink = DirectorySink::new(&output_dir);
    let slides = loaded.deck().slides();
    let total = slides.len();

    println!("  Output: {}", output_dir.display());
    println!("  Slides: {total}");

    if let Some(number) = slide {
        let index = slide_index(number, total)?;
        if let Some(path) =
            export_one(&renderer, &slides[index], index, total, profile.as_ref(), &mut sink)?
        {
            println!("Slide exported: {}", path.display());
        }
        return Ok(());
    }

    if slides.is_empty() {
        println!("Deck has no slides; nothing exported.");
        return Ok(());
    }

    if png {
        let mut pages = Vec::with_capacity(total);
        for (index, s) in slides.iter().enumerate() {
            pages.push(renderer.render(s, index, total, profile.as_ref())?);
        }
        for path in export_pngs(&pages, &mut sink)? {
            println!("  {}", path.display());
        }
        println!("Export complete: {total} PNG file(s)");
        return Ok(());
    }

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| {
        print!(
            "\r  Progress: {:.0}% ({}/{} pages, {:?})  ",
            p.progress * 100.0,
            p.pages_rendered,
            p.total_pages,
            p.stage,
        );
        let _ = std::io::stdout().flush();
    });

    let page_mm = page_mm.unwrap_or(config.export.pdf_page_mm);
    match export_all_with_page(
        &renderer,
        slides,
        profile.as_ref(),
        &mut sink,
        Some(progress_cb),
        page_mm,
    ) {
        Ok(Some(path)) => println!("\nExport complete: {}", path.display()),
        Ok(None) => println!("\nNothing exported."),
        Err(e) => {
            println!("\nExport failed: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}
