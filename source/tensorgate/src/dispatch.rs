//! Inference dispatch: decode a request, invoke the model, re-encode the
//! result.
//!
//! The dispatcher holds no state beyond the registry handle; each call is
//! handled independently and no ordering is imposed across concurrent calls.
//! Cancellation propagates by dropping the returned future; the model's
//! predict step is the only suspension point, and timeout enforcement
//! belongs to the transport layer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, TensorgateError};
use crate::metadata::ModelMetadata;
use crate::registry::CodecRegistry;
use crate::resolve;
use crate::types::{InferenceRequest, InferenceResponse, NativeValue, WireTensor};

/// How a request's inputs are decoded. Resolved once per request, before any
/// decoding happens.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchMode {
    /// Each input is resolved and decoded independently
    PerInput,

    /// All inputs are aggregated by the request-wide codec registered for
    /// this content type
    RequestWide(String),
}

impl DispatchMode {
    pub fn for_request(request: &InferenceRequest, metadata: &ModelMetadata) -> Self {
        match resolve::request_content_type(request, metadata) {
            Some(content_type) => DispatchMode::RequestWide(content_type.to_string()),
            None => DispatchMode::PerInput,
        }
    }
}

/// The decoded inputs handed to a model's predict step
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedInputs {
    /// `(name, value)` pairs in request order
    PerInput(Vec<(String, NativeValue)>),

    /// One composite object assembled by a request-wide codec
    RequestWide(NativeValue),
}

/// The native values a model's predict step produces
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedOutputs {
    /// `(name, value)` pairs; each is re-encoded through per-output
    /// resolution
    Named(Vec<(String, NativeValue)>),

    /// One composite object split into output tensors by the request-wide
    /// codec
    Composite(NativeValue),
}

/// A loaded model: static metadata plus a predict entry point.
///
/// Predict failures are opaque to the core and surface unchanged as
/// [`TensorgateError::ModelExecutionError`].
#[async_trait]
pub trait Model: Send + Sync {
    fn metadata(&self) -> &ModelMetadata;

    async fn predict(&self, inputs: DecodedInputs) -> std::result::Result<DecodedOutputs, String>;
}

/// Converts wire requests into model invocations and back
pub struct InferenceDispatcher {
    registry: Arc<CodecRegistry>,
}

impl InferenceDispatcher {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }

    pub fn with_global_registry() -> Self {
        Self::new(crate::registry::global())
    }

    /// Run one inference call end to end: resolve and decode the inputs,
    /// invoke the model, re-encode its outputs and assemble the response.
    ///
    /// Decode and encode errors are never recovered locally; the first one
    /// fails the call with the offending input named. One failed call does
    /// not affect the registry, the metadata or subsequent calls.
    pub async fn dispatch(
        &self,
        request: &InferenceRequest,
        model: &dyn Model,
    ) -> Result<InferenceResponse> {
        let metadata = model.metadata();
        let mode = DispatchMode::for_request(request, metadata);
        log::trace!(
            "Dispatching request (id: {:?}) to model '{}' in {:?} mode",
            request.id,
            metadata.name,
            mode
        );

        let inputs = match &mode {
            DispatchMode::PerInput => {
                let mut decoded = Vec::with_capacity(request.inputs.len());
                for input in &request.inputs {
                    let codec = resolve::input_codec(&self.registry, input, metadata)?;
                    decoded.push((input.name.clone(), codec.decode(input)?));
                }
                DecodedInputs::PerInput(decoded)
            }
            DispatchMode::RequestWide(content_type) => {
                let codec = resolve::request_codec(&self.registry, content_type)?;
                DecodedInputs::RequestWide(codec.decode_request(
                    &self.registry,
                    request,
                    metadata,
                )?)
            }
        };

        let outputs = model
            .predict(inputs)
            .await
            .map_err(TensorgateError::ModelExecutionError)?;

        let outputs = self.encode_outputs(outputs, &mode, metadata)?;

        Ok(InferenceResponse {
            model_name: metadata.name.clone(),
            model_version: metadata.version.clone(),
            id: request.id.clone(),
            outputs,
            parameters: None,
        })
    }

    fn encode_outputs(
        &self,
        outputs: DecodedOutputs,
        mode: &DispatchMode,
        metadata: &ModelMetadata,
    ) -> Result<Vec<WireTensor>> {
        match outputs {
            DecodedOutputs::Named(values) => {
                let mut tensors = Vec::with_capacity(values.len());
                for (name, value) in values {
                    let codec = resolve::output_codec(&self.registry, &name, &value, metadata)?;
                    tensors.push(codec.encode(&name, &value)?);
                }
                Ok(tensors)
            }
            DecodedOutputs::Composite(value) => {
                // A composite result goes back through the request-wide
                // codec that produced the inputs; models running per-input
                // fall back to the value's default content type
                let content_type = match mode {
                    DispatchMode::RequestWide(content_type) => content_type.as_str(),
                    DispatchMode::PerInput => resolve::default_for_value(&value),
                };
                let codec = resolve::request_codec(&self.registry, content_type)?;
                codec.encode_outputs(&self.registry, value, metadata)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Parameters;

    #[test]
    fn mode_is_per_input_unless_a_request_content_type_exists() {
        let metadata = ModelMetadata::named("m");
        let request = InferenceRequest::default();
        assert_eq!(
            DispatchMode::for_request(&request, &metadata),
            DispatchMode::PerInput
        );

        let metadata = ModelMetadata {
            name: "m".into(),
            request_content_type: Some("pd".into()),
            ..Default::default()
        };
        assert_eq!(
            DispatchMode::for_request(&request, &metadata),
            DispatchMode::RequestWide("pd".into())
        );

        // The request's own parameters win over the model default
        let request = InferenceRequest {
            parameters: Some(Parameters::with_content_type("custom")),
            ..Default::default()
        };
        assert_eq!(
            DispatchMode::for_request(&request, &metadata),
            DispatchMode::RequestWide("custom".into())
        );
    }
}
