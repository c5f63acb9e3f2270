//! Layered configuration loading for Photex.
//!
//! Settings resolve in three layers, later layers winning: built-in defaults
//! (see [`photex_core::settings`]), an optional config file, and
//! `PHOTEX_`-prefixed environment variables. Nesting uses `__` in variable
//! names, e.g. `PHOTEX_SEARCH__MAX_MEDIA_RESULT=500` or
//! `PHOTEX_DATABASE__URL=sqlite:///var/lib/photex/catalog.sqlite`.

#![allow(missing_docs)]

use std::path::Path;

use anyhow::{Context, Result};
use photex_core::settings::GallerySettings;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PHOTEX";

/// Load settings from defaults, an optional file, and the environment.
pub fn load(path: Option<&Path>) -> Result<GallerySettings> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
    }
    let raw = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read configuration sources")?;

    let settings: GallerySettings = raw
        .try_deserialize()
        .context("configuration does not match the expected shape")?;
    tracing::debug!(?path, "configuration loaded");
    Ok(settings)
}
