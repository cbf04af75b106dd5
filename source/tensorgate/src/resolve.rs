//! Content-type resolution.
//!
//! Given a tensor (or a whole request), model metadata and a registry, these
//! functions determine which codec applies. The precedence is fixed and
//! evaluated top to bottom, first match wins:
//!
//! 1. an explicit `content_type` in the tensor's (or request's) own
//!    parameters
//! 2. the content type declared in model metadata for the same input name
//!    (or the model's request-level default)
//! 3. a built-in default keyed off the wire datatype: `BYTES` decodes as
//!    text, everything else as a generic array
//!
//! Metadata is authoritative over datatype defaults; the order is never
//! changed at runtime.

use std::sync::Arc;

use crate::codec::{ArrayCodec, Codec, ImageCodec, RequestCodec, TableCodec, TextCodec};
use crate::error::{Result, TensorgateError};
use crate::metadata::ModelMetadata;
use crate::registry::CodecRegistry;
use crate::types::{DataType, InferenceRequest, NativeValue, WireTensor};

/// The built-in default content type for a wire datatype
pub fn default_for_datatype(datatype: DataType) -> &'static str {
    match datatype {
        DataType::Bytes => TextCodec::CONTENT_TYPE,
        _ => ArrayCodec::CONTENT_TYPE,
    }
}

/// The default content type used to encode a native value when model
/// metadata doesn't declare one for that output
pub fn default_for_value(value: &NativeValue) -> &'static str {
    match value {
        NativeValue::Array(_) => ArrayCodec::CONTENT_TYPE,
        NativeValue::Text(_) => TextCodec::CONTENT_TYPE,
        NativeValue::Image(_) => ImageCodec::CONTENT_TYPE,
        NativeValue::Table(_) => TableCodec::CONTENT_TYPE,
    }
}

/// The effective content type for one input
pub fn input_content_type<'a>(tensor: &'a WireTensor, metadata: &'a ModelMetadata) -> &'a str {
    if let Some(content_type) = tensor.content_type() {
        return content_type;
    }

    if let Some(content_type) = metadata.input_content_type(&tensor.name) {
        return content_type;
    }

    default_for_datatype(tensor.datatype)
}

/// The effective content type for a whole request. `None` means the request
/// is decoded input by input.
pub fn request_content_type<'a>(
    request: &'a InferenceRequest,
    metadata: &'a ModelMetadata,
) -> Option<&'a str> {
    request
        .content_type()
        .or(metadata.request_content_type.as_deref())
}

/// The effective content type for one output value
pub fn output_content_type<'a>(
    name: &str,
    value: &NativeValue,
    metadata: &'a ModelMetadata,
) -> &'a str {
    metadata
        .output_content_type(name)
        .unwrap_or_else(|| default_for_value(value))
}

/// Resolves and looks up the codec for one input
pub fn input_codec(
    registry: &CodecRegistry,
    tensor: &WireTensor,
    metadata: &ModelMetadata,
) -> Result<Arc<dyn Codec>> {
    let content_type = input_content_type(tensor, metadata);
    registry
        .lookup(content_type)
        .ok_or_else(|| TensorgateError::CodecNotFound {
            content_type: content_type.to_string(),
            input: Some(tensor.name.clone()),
        })
}

/// Resolves and looks up the codec for one output value
pub fn output_codec(
    registry: &CodecRegistry,
    name: &str,
    value: &NativeValue,
    metadata: &ModelMetadata,
) -> Result<Arc<dyn Codec>> {
    let content_type = output_content_type(name, value, metadata);
    registry
        .lookup(content_type)
        .ok_or_else(|| TensorgateError::CodecNotFound {
            content_type: content_type.to_string(),
            input: Some(name.to_string()),
        })
}

/// Looks up the request-wide codec for an already-resolved content type
pub fn request_codec(
    registry: &CodecRegistry,
    content_type: &str,
) -> Result<Arc<dyn RequestCodec>> {
    registry
        .lookup_request(content_type)
        .ok_or_else(|| TensorgateError::CodecNotFound {
            content_type: content_type.to_string(),
            input: None,
        })
}
