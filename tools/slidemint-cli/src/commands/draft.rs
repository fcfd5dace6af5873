//! Generate a narrative post with one image per insight.

use std::fmt::Write as _;
use std::path::PathBuf;

use slidemint_common::config::AppConfig;
use slidemint_project_model::draft::{Draft, DraftRequest, Tone};
use slidemint_studio::{ApplyOutcome, DraftSession, StudioError};

use super::{ai_client, report_ai_error};

pub async fn run(
    config: &AppConfig,
    topic: String,
    insights: Vec<String>,
    tone: String,
    output: PathBuf,
) -> anyhow::Result<()> {
    let tone: Tone = tone.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let request = DraftRequest::new(topic, insights, tone)?;
    let client = ai_client(config)?;

    println!("Drafting: {}", request.topic);
    println!("  Tone: {}", request.tone);
    println!("  Insights: {}", request.insights.len());

    let mut session = DraftSession::new();
    let outcomes = match session.start(request, &client).await {
        Ok(outcomes) => outcomes,
        Err(StudioError::Ai(e)) => {
            report_ai_error(&e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let Some(draft) = session.draft() else {
        return Ok(());
    };

    std::fs::create_dir_all(&output)?;
    let post_path = output.join("post.md");
    std::fs::write(&post_path, render_post(draft))?;
    println!("Post written: {}", post_path.display());

    for (index, point) in draft.points.iter().enumerate() {
        let outcome = outcomes
            .iter()
            .find(|(id, _)| id == &point.id)
            .map(|(_, o)| *o);
        match (&point.image, outcome) {
            (Some(image), _) => {
                let path = output.join(format!("point-{}.{}", index + 1, image.extension()));
                std::fs::write(&path, image.bytes())?;
                println!("  [{}] {} -> {}", index + 1, point.title, path.display());
            }
            (None, Some(ApplyOutcome::Failed)) => {
                println!("  [{}] {} -> image failed", index + 1, point.title);
            }
            (None, _) => println!("  [{}] {} -> no image", index + 1, point.title),
        }
    }

    if let Some(shown) = session.last_error() {
        println!();
        println!("Last error: {shown}");
    }
    Ok(())
}

fn render_post(draft: &Draft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", draft.full_post.trim());
    let _ = writeln!(out);
    let _ = writeln!(out, "## Slides");
    for (index, point) in draft.points.iter().enumerate() {
        let _ = writeln!(out, "{}. **{}**: {}", index + 1, point.title, point.content);
        let _ = writeln!(out, "   Prompt: {}", point.suggested_prompt);
    }
    if !draft.search_results.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Sources");
        for source in &draft.search_results {
            let _ = writeln!(out, "- [{}]({})", source.title, source.url);
        }
    }
    out
}
