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

//! The UTF-8 text codec (content type `str`)

use bytes::Bytes;

use crate::error::{Result, TensorgateError};
use crate::types::{DataType, NativeValue, TensorData, WireTensor};

use super::Codec;

/// Decodes a `BYTES` payload as one UTF-8 string.
///
/// The element count of a `BYTES` tensor is its byte count, so a decoded
/// string of n bytes encodes back to shape `[n]`.
pub struct TextCodec;

impl TextCodec {
    pub const CONTENT_TYPE: &'static str = "str";
}

const SUPPORTED: &[DataType] = &[DataType::Bytes];

impl Codec for TextCodec {
    fn content_type(&self) -> &'static str {
        Self::CONTENT_TYPE
    }

    fn supported_datatypes(&self) -> &'static [DataType] {
        SUPPORTED
    }

    fn decode(&self, tensor: &WireTensor) -> Result<NativeValue> {
        super::check_decodable(self, tensor)?;

        match &tensor.data {
            TensorData::Bytes(buffer) => {
                let text = std::str::from_utf8(buffer.as_ref()).map_err(|e| {
                    TensorgateError::MalformedPayload {
                        input: tensor.name.clone(),
                        reason: format!("invalid UTF-8: {e}"),
                    }
                })?;
                Ok(NativeValue::Text(text.to_string()))
            }
            // check_decodable already rejected non-BYTES buffers
            other => Err(TensorgateError::MalformedPayload {
                input: tensor.name.clone(),
                reason: format!("expected a BYTES buffer, got {}", other.datatype()),
            }),
        }
    }

    fn encode(&self, name: &str, value: &NativeValue) -> Result<WireTensor> {
        match value {
            NativeValue::Text(text) => Ok(WireTensor::new(
                name,
                DataType::Bytes,
                vec![text.len() as u64],
                TensorData::Bytes(Bytes::copy_from_slice(text.as_bytes())),
            )),
            other => Err(TensorgateError::MalformedPayload {
                input: name.to_string(),
                reason: format!("the text codec cannot encode {} values", other.kind()),
            }),
        }
    }
}
