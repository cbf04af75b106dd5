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

//! The generic array codec (content type `np`)

use crate::error::{Result, TensorgateError};
use crate::types::{for_each_dtype, DataType, NativeValue, Tensor, TensorData, WireTensor};

use super::Codec;

/// Decodes numeric and boolean wire tensors into [`ndarray`]-backed native
/// arrays.
///
/// This codec also accepts `BYTES` payloads: the raw buffer is reinterpreted
/// as a `UINT8` array of the declared shape. Because of that, re-encoding a
/// decoded `BYTES` tensor canonicalizes its datatype to `UINT8`.
pub struct ArrayCodec;

impl ArrayCodec {
    pub const CONTENT_TYPE: &'static str = "np";
}

for_each_dtype! {
    const SUPPORTED: &[DataType] = &[
        $(DataType::$DtypeName,)*
        DataType::Bytes,
    ];
}

impl Codec for ArrayCodec {
    fn content_type(&self) -> &'static str {
        Self::CONTENT_TYPE
    }

    fn supported_datatypes(&self) -> &'static [DataType] {
        SUPPORTED
    }

    fn decode(&self, tensor: &WireTensor) -> Result<NativeValue> {
        super::check_decodable(self, tensor)?;
        let shape = super::shape_as_usize(&tensor.shape);

        for_each_dtype! {
            return match &tensor.data {
                $(
                    TensorData::$DtypeName(values) => {
                        let array =
                            ndarray::ArrayD::from_shape_vec(ndarray::IxDyn(&shape), values.clone())
                                .map_err(|e| TensorgateError::MalformedPayload {
                                    input: tensor.name.clone(),
                                    reason: e.to_string(),
                                })?;
                        Ok(NativeValue::Array(Tensor::$DtypeName(array)))
                    }
                )*
                TensorData::Bytes(buffer) => {
                    // Raw buffer reinterpreted as a uint8 array
                    let array =
                        ndarray::ArrayD::from_shape_vec(ndarray::IxDyn(&shape), buffer.to_vec())
                            .map_err(|e| TensorgateError::MalformedPayload {
                                input: tensor.name.clone(),
                                reason: e.to_string(),
                            })?;
                    Ok(NativeValue::Array(Tensor::U8(array)))
                }
            };
        }
    }

    fn encode(&self, name: &str, value: &NativeValue) -> Result<WireTensor> {
        let tensor = match value {
            NativeValue::Array(t) => t,
            other => {
                return Err(TensorgateError::MalformedPayload {
                    input: name.to_string(),
                    reason: format!("the array codec cannot encode {} values", other.kind()),
                })
            }
        };

        for_each_dtype! {
            return match tensor {
                $(
                    Tensor::$DtypeName(array) => Ok(WireTensor::new(
                        name,
                        DataType::$DtypeName,
                        array.shape().iter().map(|d| *d as u64).collect(),
                        TensorData::$DtypeName(array.iter().cloned().collect()),
                    )),
                )*
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn decodes_int32_to_2x2_array() {
        let tensor = WireTensor::new(
            "x",
            DataType::I32,
            vec![2, 2],
            TensorData::I32(vec![1, 2, 3, 4]),
        );

        let decoded = ArrayCodec.decode(&tensor).unwrap();
        let expected =
            ndarray::ArrayD::from_shape_vec(ndarray::IxDyn(&[2, 2]), vec![1i32, 2, 3, 4]).unwrap();
        assert_eq!(decoded, NativeValue::Array(Tensor::I32(expected)));

        // Re-encoding yields an identical tensor
        let encoded = ArrayCodec.encode("x", &decoded).unwrap();
        assert_eq!(encoded, tensor);
    }

    #[test]
    fn round_trips_every_numeric_datatype() {
        let tensors = vec![
            WireTensor::new("f", DataType::Float, vec![2], TensorData::Float(vec![1.5, -2.5])),
            WireTensor::new("d", DataType::Double, vec![2], TensorData::Double(vec![0.25, 8.0])),
            WireTensor::new("b", DataType::Bool, vec![2], TensorData::Bool(vec![true, false])),
            WireTensor::new("u", DataType::U64, vec![3], TensorData::U64(vec![1, 2, 3])),
            WireTensor::new("i", DataType::I8, vec![3], TensorData::I8(vec![-1, 0, 1])),
        ];

        for tensor in tensors {
            let decoded = ArrayCodec.decode(&tensor).unwrap();
            let encoded = ArrayCodec.encode(&tensor.name, &decoded).unwrap();
            assert_eq!(encoded, tensor);

            // Round-trip stability: decode(encode(decode(t))) == decode(t)
            assert_eq!(ArrayCodec.decode(&encoded).unwrap(), decoded);
        }
    }

    #[test]
    fn bytes_payload_decodes_as_uint8_array() {
        let tensor = WireTensor::new(
            "x",
            DataType::Bytes,
            vec![2, 2],
            TensorData::Bytes(Bytes::from_static(&[1, 2, 3, 4])),
        );

        let decoded = ArrayCodec.decode(&tensor).unwrap();
        match &decoded {
            NativeValue::Array(Tensor::U8(array)) => {
                assert_eq!(array.shape(), &[2, 2]);
            }
            other => panic!("expected a uint8 array, got {other:?}"),
        }

        // Datatype canonicalizes to UINT8 on the way back out
        let encoded = ArrayCodec.encode("x", &decoded).unwrap();
        assert_eq!(encoded.datatype, DataType::U8);
        assert_eq!(encoded.data, TensorData::U8(vec![1, 2, 3, 4]));
        assert_eq!(encoded.shape, vec![2, 2]);
    }

    #[test]
    fn refuses_to_encode_text() {
        let err = ArrayCodec
            .encode("x", &NativeValue::Text("hi".into()))
            .unwrap_err();
        assert!(matches!(err, TensorgateError::MalformedPayload { .. }));
    }
}
