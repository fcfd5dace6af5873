//! Export pipeline: single-slide PNGs and the whole carousel as a PDF.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use slidemint_common::error::{SlidemintError, SlidemintResult};
use slidemint_project_model::profile::Profile;
use slidemint_project_model::slide::Slide;

use crate::raster::{encode_png, SlideRenderer};

/// File name of the combined carousel document.
pub const PDF_FILE_NAME: &str = "carousel.pdf";

/// Default square page side, in millimetres.
pub const PDF_PAGE_MM: f32 = 210.0;

/// File name for the slide at zero-based `index`.
pub fn slide_file_name(index: usize) -> String {
    format!("slide-{}.png", index + 1)
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Pages rendered so far.
    pub pages_rendered: usize,

    /// Total pages to render.
    pub total_pages: usize,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Rendering,
    Encoding,
    Complete,
    Failed,
}

/// Destination for exported files.
pub trait ExportSink {
    /// Persist `bytes` under `file_name`, returning where they went.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> SlidemintResult<PathBuf>;
}

/// Writes exports into a directory, creating it on first save.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> SlidemintResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved export");
        Ok(path)
    }
}

/// Render one slide and save it as `slide-<n>.png`.
///
/// Without a profile nothing is rendered or saved and `Ok(None)` is
/// returned.
pub fn export_one(
    renderer: &SlideRenderer,
    slide: &Slide,
    index: usize,
    total: usize,
    profile: Option<&Profile>,
    sink: &mut dyn ExportSink,
) -> SlidemintResult<Option<PathBuf>> {
    let Some(profile) = profile else {
        tracing::info!("Skipping slide export: no profile set");
        return Ok(None);
    };
    let png = renderer.render_png(slide, index, total, Some(profile))?;
    sink.save(&slide_file_name(index), &png).map(Some)
}

/// Render every slide in order and save them as one PDF.
///
/// Returns `Ok(None)` without saving when there are no slides or no
/// profile. If any slide fails to render the export stops and nothing is
/// saved.
pub fn export_all(
    renderer: &SlideRenderer,
    slides: &[Slide],
    profile: Option<&Profile>,
    sink: &mut dyn ExportSink,
    progress: Option<ProgressCallback>,
) -> SlidemintResult<Option<PathBuf>> {
    export_all_with_page(renderer, slides, profile, sink, progress, PDF_PAGE_MM)
}

/// [`export_all`] with an explicit square page size.
pub fn export_all_with_page(
    renderer: &SlideRenderer,
    slides: &[Slide],
    profile: Option<&Profile>,
    sink: &mut dyn ExportSink,
    progress: Option<ProgressCallback>,
    page_mm: f32,
) -> SlidemintResult<Option<PathBuf>> {
    let Some(profile) = profile else {
        tracing::info!("Skipping carousel export: no profile set");
        return Ok(None);
    };
    if slides.is_empty() {
        tracing::info!("Skipping carousel export: no slides");
        return Ok(None);
    }

    let total = slides.len();
    let report = |pages_rendered: usize, stage: ExportStage| {
        if let Some(cb) = &progress {
            cb(ExportProgress {
                progress: pages_rendered as f64 / total as f64,
                pages_rendered,
                total_pages: total,
                stage,
            });
        }
    };

    tracing::info!(slides = total, page_mm, "Starting carousel export");
    let started = std::time::Instant::now();
    report(0, ExportStage::Preparing);

    let mut pages = Vec::with_capacity(total);
    for (index, slide) in slides.iter().enumerate() {
        match renderer.render(slide, index, total, Some(profile)) {
            Ok(canvas) => pages.push(canvas),
            Err(err) => {
                tracing::warn!(index, slide = %slide.id, error = %err, "Carousel export aborted");
                report(index, ExportStage::Failed);
                return Err(err);
            }
        }
        report(index + 1, ExportStage::Rendering);
    }

    report(total, ExportStage::Encoding);
    let pdf = build_pdf(&pages, page_mm, "SlideMint carousel")?;
    let path = sink.save(PDF_FILE_NAME, &pdf)?;
    report(total, ExportStage::Complete);

    tracing::info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        path = %path.display(),
        "Carousel export finished"
    );
    Ok(Some(path))
}

/// Save already-rendered slides as individual PNG files.
pub fn export_pngs(pages: &[RgbaImage], sink: &mut dyn ExportSink) -> SlidemintResult<Vec<PathBuf>> {
    pages
        .iter()
        .enumerate()
        .map(|(index, page)| sink.save(&slide_file_name(index), &encode_png(page)?))
        .collect()
}

/// Assemble square pages, one full-bleed image each.
pub fn build_pdf(pages: &[RgbaImage], page_mm: f32, title: &str) -> SlidemintResult<Vec<u8>> {
    if pages.is_empty() {
        return Err(SlidemintError::export("Cannot build a PDF without pages"));
    }
    let side = Mm(page_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, side, side, "Slide 1");

    let mut targets = vec![(first_page, first_layer)];
    for index in 1..pages.len() {
        targets.push(doc.add_page(side, side, format!("Slide {}", index + 1)));
    }

    for (canvas, (page, layer)) in pages.iter().zip(targets) {
        let layer = doc.get_page(page).get_layer(layer);
        let image = Image::from_dynamic_image(&pdf_image(canvas)?);
        // Scale so the raster spans exactly one page side.
        let dpi = canvas.width() as f32 * 25.4 / page_mm;
        image.add_to_layer(
            layer,
            ImageTransform {
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes()
        .map_err(|e| SlidemintError::export(format!("PDF encoding failed: {e}")))
}

/// Flatten to RGB in the image type printpdf embeds.
fn pdf_image(canvas: &RgbaImage) -> SlidemintResult<printpdf::image_crate::DynamicImage> {
    let (width, height) = canvas.dimensions();
    let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8().into_raw();
    printpdf::image_crate::RgbImage::from_raw(width, height, rgb)
        .map(printpdf::image_crate::DynamicImage::ImageRgb8)
        .ok_or_else(|| SlidemintError::export("Rendered slide has an invalid buffer size"))
}
