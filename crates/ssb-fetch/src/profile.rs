//! Feed profile aggregation.

use ssb_fetch_backend::Backend;
use ssb_fetch_core::{Identifier, Profile};

use crate::error::{FetchError, Result};

/// Build the current profile of `feed` from the latest value of each field.
///
/// Uses the about + backlinks indexes when present, one query per field in
/// `fields` order; falls back to the about-self index otherwise. Fields with
/// no assertion are left out.
pub async fn aggregate_profile<B: Backend + ?Sized>(
    backend: &B,
    feed: &Identifier,
    fields: &[String],
) -> Result<Profile> {
    let capabilities = backend.capabilities();
    let missing = capabilities.missing_for_profiles();
    if !missing.is_empty() {
        return Err(FetchError::MissingCapability(missing));
    }

    let mut profile = Profile::new(feed);

    if capabilities.about && capabilities.backlinks {
        for field in fields {
            if let Some(value) = backend.latest_about_value(feed, field).await? {
                profile.set(field, value);
            }
        }
    } else if let Some(asserted) = backend.about_self_profile(feed).await? {
        for field in fields {
            if let Some(value) = asserted.get(field) {
                profile.set(field, value.clone());
            }
        }
    }

    tracing::debug!(feed = %feed, fields = profile.fields().len(), "aggregated profile");
    Ok(profile)
}
