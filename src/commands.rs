//! Headless subcommands. Output goes to a caller-supplied writer.

use crate::config::Config;
use crate::feeds::generator::GenerationClient;
use crate::feeds::upload::UploadClient;
use crate::post::PostDraft;
use crate::post_parser::{self, Segment};
use crate::share::ShareDispatcher;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;

/// Generate one post, print it, then print or open its share link.
///
/// A share link that cannot be opened is reported and printed instead; it
/// never fails the command.
pub async fn generate_post(
    client: &GenerationClient,
    dispatcher: &ShareDispatcher,
    draft: PostDraft,
    open: bool,
    out: &mut impl Write,
) -> Result<()> {
    if draft.is_blank() {
        bail!("Write something about your craft first");
    }

    let post = client.generate(&draft).await?;
    let segments = post_parser::parse(&post.text);

    for segment in &segments {
        match segment {
            Segment::Text(text) => write!(out, "{}", text)?,
            Segment::Break => writeln!(out)?,
            Segment::Button { label } => write!(out, "[ {} ]", label)?,
        }
    }
    writeln!(out)?;
    writeln!(out)?;

    let payload = post_parser::plain_text(&segments);
    if open {
        match dispatcher.share(draft.platform, &payload) {
            Ok(url) => writeln!(out, "Opened: {}", url)?,
            Err(err) => {
                writeln!(out, "Could not open share link ({})", err.source)?;
                writeln!(out, "Share: {}", err.url)?;
            }
        }
    } else {
        writeln!(out, "Share: {}", dispatcher.share_url(draft.platform, &payload))?;
    }

    Ok(())
}

/// Write the default config. Never reads the existing file, so a broken one
/// can be replaced with `force`.
pub fn init_config(path: &Path, force: bool, out: &mut impl Write) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default().save(path)?;
    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}

/// Send a recording to the backend and save the returned content document
/// where the dashboard can load it.
pub async fn upload_recording(
    client: &UploadClient,
    audio: &Path,
    save_to: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let uploaded = client.upload(audio).await?;

    if let Some(parent) = save_to.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(save_to, &uploaded.document)
        .with_context(|| format!("Failed to write {}", save_to.display()))?;

    let content = &uploaded.content;
    let name = if content.artisan_name.is_empty() {
        "Artisan"
    } else {
        content.artisan_name.as_str()
    };
    writeln!(out, "Upload {} processed for {}", uploaded.id, name)?;
    if !content.keywords.is_empty() {
        writeln!(out, "Keywords: {}", content.keywords)?;
    }
    writeln!(out, "About: {}", content.about_text)?;
    writeln!(out, "Saved content to {}", save_to.display())?;
    Ok(())
}
