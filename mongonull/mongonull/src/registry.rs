use std::sync::OnceLock;

use mongonull_codec::{Registry, build_registry, default_codecs, nullable_codecs};

/// Build a [`Registry`] with the default codecs and codecs for
/// `NullString`, `NullInt`, `NullFloat`, `NullBool` and `NullTime`.
pub fn build_default_registry() -> Registry {
    build_registry([default_codecs(), nullable_codecs()])
}

/// Process-wide registry built by [`build_default_registry`] on first use.
pub fn default_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(build_default_registry)
}
