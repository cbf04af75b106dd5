use std::sync::Arc;

use dashmap::DashMap;
use lazy_static::lazy_static;

use crate::codec::{ArrayCodec, Codec, ImageCodec, RequestCodec, TableCodec, TextCodec};

/// A mapping from content-type identifiers to codec implementations.
///
/// Registration is expected to happen during process initialization or
/// extension load, before requests are in flight; the last registration for
/// a given identifier wins. Lookups are pure reads and safe from any number
/// of concurrent calls.
pub struct CodecRegistry {
    codecs: DashMap<String, Arc<dyn Codec>>,
    request_codecs: DashMap<String, Arc<dyn RequestCodec>>,
}

impl CodecRegistry {
    /// A registry with nothing in it
    pub fn empty() -> Self {
        Self {
            codecs: DashMap::new(),
            request_codecs: DashMap::new(),
        }
    }

    /// A registry preloaded with the built-in codecs (`np`, `str`, `img` and
    /// the request-wide `pd`)
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        registry.install_defaults();
        registry
    }

    fn install_defaults(&self) {
        self.register(ArrayCodec::CONTENT_TYPE, Arc::new(ArrayCodec));
        self.register(TextCodec::CONTENT_TYPE, Arc::new(TextCodec));
        self.register(ImageCodec::CONTENT_TYPE, Arc::new(ImageCodec));
        self.register_request_codec(TableCodec::CONTENT_TYPE, Arc::new(TableCodec));
    }

    /// Adds or overwrites the codec for a content type; the last
    /// registration wins
    pub fn register(&self, content_type: impl Into<String>, codec: Arc<dyn Codec>) {
        let content_type = content_type.into();
        log::trace!("Registering codec for content type '{content_type}'");
        if self.codecs.insert(content_type.clone(), codec).is_some() {
            log::warn!("Replaced previously registered codec for content type '{content_type}'");
        }
    }

    /// Adds or overwrites the request-wide codec for a content type
    pub fn register_request_codec(
        &self,
        content_type: impl Into<String>,
        codec: Arc<dyn RequestCodec>,
    ) {
        let content_type = content_type.into();
        log::trace!("Registering request codec for content type '{content_type}'");
        if self
            .request_codecs
            .insert(content_type.clone(), codec)
            .is_some()
        {
            log::warn!(
                "Replaced previously registered request codec for content type '{content_type}'"
            );
        }
    }

    pub fn lookup(&self, content_type: &str) -> Option<Arc<dyn Codec>> {
        self.codecs.get(content_type).map(|e| e.value().clone())
    }

    pub fn lookup_request(&self, content_type: &str) -> Option<Arc<dyn RequestCodec>> {
        self.request_codecs
            .get(content_type)
            .map(|e| e.value().clone())
    }

    /// Drops every registration (user-supplied ones included) and
    /// reinstalls the built-ins. Intended as a teardown between test cases;
    /// must not be called while requests are in flight.
    pub fn reset(&self) {
        self.codecs.clear();
        self.request_codecs.clear();
        self.install_defaults();
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<CodecRegistry> = Arc::new(CodecRegistry::with_defaults());
}

/// The process-wide registry, preloaded with the built-in codecs
pub fn global() -> Arc<CodecRegistry> {
    GLOBAL_REGISTRY.clone()
}
