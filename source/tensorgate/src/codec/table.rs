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

//! The table codec (content type `pd`): request-wide aggregation of all
//! inputs into one column-ordered composite

use crate::error::{Result, TensorgateError};
use crate::metadata::ModelMetadata;
use crate::registry::CodecRegistry;
use crate::resolve;
use crate::types::{Column, InferenceRequest, NativeValue, Table, WireTensor};

use super::RequestCodec;

/// Assembles a [`Table`] by column-matching each input's name, in request
/// order. Every column is decoded through normal per-input content-type
/// resolution, so a single table can mix numeric and text columns.
pub struct TableCodec;

impl TableCodec {
    pub const CONTENT_TYPE: &'static str = "pd";
}

impl RequestCodec for TableCodec {
    fn content_type(&self) -> &'static str {
        Self::CONTENT_TYPE
    }

    fn decode_request(
        &self,
        registry: &CodecRegistry,
        request: &InferenceRequest,
        metadata: &ModelMetadata,
    ) -> Result<NativeValue> {
        let mut columns = Vec::with_capacity(request.inputs.len());

        // A single resolution/decode failure aborts the whole request
        for input in &request.inputs {
            let codec = resolve::input_codec(registry, input, metadata)?;
            let values = codec.decode(input)?;
            columns.push(Column {
                name: input.name.clone(),
                values,
            });
        }

        Ok(NativeValue::Table(Table { columns }))
    }

    fn encode_outputs(
        &self,
        registry: &CodecRegistry,
        value: NativeValue,
        metadata: &ModelMetadata,
    ) -> Result<Vec<WireTensor>> {
        let table = match value {
            NativeValue::Table(table) => table,
            other => {
                return Err(TensorgateError::MalformedPayload {
                    input: "outputs".to_string(),
                    reason: format!("the table codec expected a table, got {}", other.kind()),
                })
            }
        };

        let mut outputs = Vec::with_capacity(table.columns.len());
        for column in table.columns {
            let codec = resolve::output_codec(registry, &column.name, &column.values, metadata)?;
            outputs.push(codec.encode(&column.name, &column.values)?);
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Tensor, TensorData};
    use bytes::Bytes;

    fn request_with_two_inputs() -> InferenceRequest {
        InferenceRequest {
            id: None,
            inputs: vec![
                WireTensor::new("a", DataType::I64, vec![3], TensorData::I64(vec![1, 2, 3])),
                WireTensor::new(
                    "b",
                    DataType::Bytes,
                    vec![3],
                    TensorData::Bytes(Bytes::from_static(b"abc")),
                ),
            ],
            parameters: None,
        }
    }

    #[test]
    fn aggregates_all_inputs_into_one_table() {
        let registry = CodecRegistry::with_defaults();
        let metadata = ModelMetadata::named("m");

        let decoded = TableCodec
            .decode_request(&registry, &request_with_two_inputs(), &metadata)
            .unwrap();

        let table = match decoded {
            NativeValue::Table(table) => table,
            other => panic!("expected a table, got {other:?}"),
        };

        // Columns keep request order and per-input default resolution:
        // INT64 decodes as an array, BYTES as text
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].name, "a");
        assert_eq!(table.columns[1].name, "b");
        assert!(matches!(
            table.columns[0].values,
            NativeValue::Array(Tensor::I64(_))
        ));
        assert_eq!(table.columns[1].values, NativeValue::Text("abc".into()));
    }

    #[test]
    fn one_bad_column_fails_the_whole_request() {
        let registry = CodecRegistry::with_defaults();
        let metadata = ModelMetadata::named("m");

        let mut request = request_with_two_inputs();
        // Truncate the data of the second input
        request.inputs[1].data = TensorData::Bytes(Bytes::from_static(b"ab"));

        match TableCodec.decode_request(&registry, &request, &metadata) {
            Err(TensorgateError::ShapeMismatch { input, .. }) => assert_eq!(input, "b"),
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn encodes_each_column_as_one_output() {
        let registry = CodecRegistry::with_defaults();
        let metadata = ModelMetadata::named("m");

        let table = NativeValue::Table(Table {
            columns: vec![
                Column {
                    name: "scores".into(),
                    values: NativeValue::Array(Tensor::Double(
                        ndarray::ArrayD::from_shape_vec(ndarray::IxDyn(&[2]), vec![0.5, 0.75])
                            .unwrap(),
                    )),
                },
                Column {
                    name: "label".into(),
                    values: NativeValue::Text("ok".into()),
                },
            ],
        });

        let outputs = TableCodec.encode_outputs(&registry, table, &metadata).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].name, "scores");
        assert_eq!(outputs[0].datatype, DataType::Double);
        assert_eq!(outputs[1].name, "label");
        assert_eq!(outputs[1].datatype, DataType::Bytes);
    }
}
