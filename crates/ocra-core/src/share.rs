//! Copy and share actions for a displayed recipe.

use serde::Serialize;
use url::Url;

use crate::error::AppError;
use crate::models::Recipe;
use crate::render::render_plain_text;
use crate::traits::{Clipboard, ShareTarget};
use crate::view::UnitSystem;

/// What is handed to the platform share mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn for_recipe(recipe: &Recipe, url: &Url) -> Self {
        Self {
            title: recipe.name.clone(),
            text: format!("Check out this recipe for {}!", recipe.name),
            url: url.to_string(),
        }
    }
}

/// Result of [`share_recipe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The platform accepted the payload.
    Shared,
    /// The platform share failed or was cancelled. Already logged.
    Failed,
    /// Sharing is unsupported; the link was copied to the clipboard instead.
    LinkCopied,
}

/// Shares the recipe link, falling back to copying the link when the
/// platform cannot share.
///
/// # Errors
///
/// Only the clipboard fallback can fail; a failing share is reported as
/// [`ShareOutcome::Failed`].
pub fn share_recipe<T, C>(
    recipe: &Recipe,
    url: &Url,
    target: &T,
    clipboard: &C,
) -> Result<ShareOutcome, AppError>
where
    T: ShareTarget + ?Sized,
    C: Clipboard + ?Sized,
{
    if !target.is_supported() {
        clipboard.write_text(url.as_str())?;
        tracing::info!(url = %url, "Share unavailable, link copied to clipboard");
        return Ok(ShareOutcome::LinkCopied);
    }

    let payload = SharePayload::for_recipe(recipe, url);
    match target.share(&payload) {
        Ok(()) => Ok(ShareOutcome::Shared),
        Err(e) => {
            tracing::error!(recipe = %recipe.name, error = %e, "Error sharing");
            Ok(ShareOutcome::Failed)
        }
    }
}

/// Copies the plain-text rendering of the recipe to the clipboard.
pub fn copy_recipe<C>(recipe: &Recipe, units: UnitSystem, clipboard: &C) -> Result<(), AppError>
where
    C: Clipboard + ?Sized,
{
    clipboard.write_text(&render_plain_text(recipe, units))?;
    tracing::debug!(recipe = %recipe.name, units = %units, "Recipe copied to clipboard");
    Ok(())
}
