// Copyright 2023 Vivek Panyam
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Payload codecs translating between wire tensors and runtime-native
//! objects.
//!
//! A [`Codec`] handles one input/output at a time; a [`RequestCodec`]
//! aggregates a whole request into one composite native object. Both sides
//! are pure, synchronous transformations with no shared mutable state, so
//! they are safe to run from any number of concurrent calls.

mod array;
mod image;
mod table;
mod text;

pub use array::ArrayCodec;
pub use image::ImageCodec;
pub use table::TableCodec;
pub use text::TextCodec;

use crate::error::{Result, TensorgateError};
use crate::metadata::ModelMetadata;
use crate::registry::CodecRegistry;
use crate::types::{DataType, InferenceRequest, NativeValue, WireTensor};

/// A paired encode/decode implementation for one or more wire datatypes
pub trait Codec: Send + Sync {
    /// The content type identifier this codec is registered under by default
    fn content_type(&self) -> &'static str;

    /// The wire datatypes this codec can consume. Checked before any decode
    /// is attempted.
    fn supported_datatypes(&self) -> &'static [DataType];

    /// Decode a wire tensor into a native object.
    ///
    /// Implementations must validate datatype compatibility and the
    /// shape/data-length invariant before converting (see
    /// [`check_decodable`]).
    fn decode(&self, tensor: &WireTensor) -> Result<NativeValue>;

    /// Encode a native object back into a self-consistent wire tensor
    fn encode(&self, name: &str, value: &NativeValue) -> Result<WireTensor>;
}

/// A codec that decodes a whole request into one composite native object
/// (and splits a composite result back into output tensors)
pub trait RequestCodec: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn decode_request(
        &self,
        registry: &CodecRegistry,
        request: &InferenceRequest,
        metadata: &ModelMetadata,
    ) -> Result<NativeValue>;

    fn encode_outputs(
        &self,
        registry: &CodecRegistry,
        value: NativeValue,
        metadata: &ModelMetadata,
    ) -> Result<Vec<WireTensor>>;
}

/// Validates a tensor against a codec before decoding:
/// - the wire datatype must be in the codec's compatibility set
/// - the data buffer must hold the datatype the tensor declares
/// - the flattened data length must equal the product of the shape
pub(crate) fn check_decodable(codec: &dyn Codec, tensor: &WireTensor) -> Result<()> {
    if !codec.supported_datatypes().contains(&tensor.datatype) {
        return Err(TensorgateError::UnsupportedDatatype {
            content_type: codec.content_type().to_string(),
            datatype: tensor.datatype,
            input: tensor.name.clone(),
        });
    }

    if tensor.data.datatype() != tensor.datatype {
        return Err(TensorgateError::MalformedPayload {
            input: tensor.name.clone(),
            reason: format!(
                "declared datatype {} but the data buffer holds {}",
                tensor.datatype,
                tensor.data.datatype()
            ),
        });
    }

    let expected = tensor.num_elements();
    let actual = tensor.data.len() as u64;
    if expected != actual {
        return Err(TensorgateError::ShapeMismatch {
            input: tensor.name.clone(),
            expected,
            actual,
        });
    }

    Ok(())
}

pub(crate) fn shape_as_usize(shape: &[u64]) -> Vec<usize> {
    shape.iter().map(|d| *d as usize).collect()
}
