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

//! The image codec (content type `img`)

use crate::error::{Result, TensorgateError};
use crate::types::{DataType, NativeValue, TensorData, WireTensor};

use super::Codec;

/// Decodes a `[height, width, channels]` pixel tensor.
///
/// Accepts both `UINT8` tensors and raw `BYTES` payloads; either way the
/// declared shape must be rank 3. Re-encoding canonicalizes to `UINT8`.
pub struct ImageCodec;

impl ImageCodec {
    pub const CONTENT_TYPE: &'static str = "img";
}

const SUPPORTED: &[DataType] = &[DataType::U8, DataType::Bytes];

impl Codec for ImageCodec {
    fn content_type(&self) -> &'static str {
        Self::CONTENT_TYPE
    }

    fn supported_datatypes(&self) -> &'static [DataType] {
        SUPPORTED
    }

    fn decode(&self, tensor: &WireTensor) -> Result<NativeValue> {
        super::check_decodable(self, tensor)?;

        if tensor.shape.len() != 3 {
            return Err(TensorgateError::MalformedPayload {
                input: tensor.name.clone(),
                reason: format!(
                    "expected a [height, width, channels] shape, got rank {}",
                    tensor.shape.len()
                ),
            });
        }

        let pixels = match &tensor.data {
            TensorData::U8(values) => values.clone(),
            TensorData::Bytes(buffer) => buffer.to_vec(),
            other => {
                return Err(TensorgateError::MalformedPayload {
                    input: tensor.name.clone(),
                    reason: format!("expected a UINT8 or BYTES buffer, got {}", other.datatype()),
                })
            }
        };

        let shape = super::shape_as_usize(&tensor.shape);
        let array = ndarray::ArrayD::from_shape_vec(ndarray::IxDyn(&shape), pixels).map_err(
            |e| TensorgateError::MalformedPayload {
                input: tensor.name.clone(),
                reason: e.to_string(),
            },
        )?;

        Ok(NativeValue::Image(array))
    }

    fn encode(&self, name: &str, value: &NativeValue) -> Result<WireTensor> {
        let array = match value {
            NativeValue::Image(array) => array,
            other => {
                return Err(TensorgateError::MalformedPayload {
                    input: name.to_string(),
                    reason: format!("the image codec cannot encode {} values", other.kind()),
                })
            }
        };

        if array.ndim() != 3 {
            return Err(TensorgateError::MalformedPayload {
                input: name.to_string(),
                reason: format!(
                    "expected a [height, width, channels] image, got rank {}",
                    array.ndim()
                ),
            });
        }

        Ok(WireTensor::new(
            name,
            DataType::U8,
            array.shape().iter().map(|d| *d as u64).collect(),
            TensorData::U8(array.iter().cloned().collect()),
        ))
    }
}
