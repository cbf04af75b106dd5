pub use tensorgate_macros::{for_each_dtype, for_each_numeric_dtype};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TensorgateError;

for_each_dtype! {
    /// Wire-level datatypes.
    ///
    /// `Bytes` is the odd one out: its payload is a flat byte buffer whose
    /// element count is the number of bytes, and its native interpretation
    /// depends entirely on the negotiated content type (text, image, raw
    /// buffer, ...).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum DataType {
        $(
            #[serde(rename = $TypeStr)]
            $DtypeName,
        )*
        #[serde(rename = "BYTES")]
        Bytes,
    }
}

impl DataType {
    /// The wire identifier for this datatype (e.g. `FP32`, `BYTES`)
    pub fn as_str(&self) -> &'static str {
        for_each_dtype! {
            return match self {
                $(DataType::$DtypeName => $TypeStr,)*
                DataType::Bytes => "BYTES",
            };
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = TensorgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for_each_dtype! {
            return match s {
                $($TypeStr => Ok(DataType::$DtypeName),)*
                "BYTES" => Ok(DataType::Bytes),
                other => Err(TensorgateError::UnknownDataType(other.to_string())),
            };
        }
    }
}

for_each_dtype! {
    /// The flat data buffer of a wire tensor
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum TensorData {
        $($DtypeName(Vec<$RustType>),)*

        // Raw bytes; one element per byte
        Bytes(Bytes),
    }
}

impl TensorData {
    /// Number of elements in the buffer. For `Bytes` this is the byte count.
    pub fn len(&self) -> usize {
        for_each_dtype! {
            return match self {
                $(TensorData::$DtypeName(v) => v.len(),)*
                TensorData::Bytes(b) => b.len(),
            };
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The wire datatype this buffer holds
    pub fn datatype(&self) -> DataType {
        for_each_dtype! {
            return match self {
                $(TensorData::$DtypeName(_) => DataType::$DtypeName,)*
                TensorData::Bytes(_) => DataType::Bytes,
            };
        }
    }
}

/// Values that can appear in request/tensor parameter maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ParamValue {
    Integer(i64),
    Double(f64),
    String(String),
    Boolean(bool),
}

/// Parameters attached to a tensor or a whole request.
///
/// `content_type` is the only key the core interprets; everything else is
/// carried through untouched for the transport layer and model to use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, ParamValue>,
}

impl Parameters {
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            extra: HashMap::new(),
        }
    }
}

/// The protocol-level representation of one named input or output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTensor {
    pub name: String,
    pub datatype: DataType,
    pub shape: Vec<u64>,
    pub data: TensorData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

impl WireTensor {
    pub fn new(
        name: impl Into<String>,
        datatype: DataType,
        shape: Vec<u64>,
        data: TensorData,
    ) -> Self {
        Self {
            name: name.into(),
            datatype,
            shape,
            data,
            parameters: None,
        }
    }

    /// Number of elements the declared shape implies. An empty shape is a
    /// scalar (one element).
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// The content type explicitly attached to this tensor, if any
    pub fn content_type(&self) -> Option<&str> {
        self.parameters
            .as_ref()
            .and_then(|p| p.content_type.as_deref())
    }
}

/// One inference call: an ordered set of named input tensors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub inputs: Vec<WireTensor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

impl InferenceRequest {
    /// The content type explicitly attached to the whole request, if any
    pub fn content_type(&self) -> Option<&str> {
        self.parameters
            .as_ref()
            .and_then(|p| p.content_type.as_deref())
    }
}

/// The result of one inference call, ready for re-serialization by the
/// transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub model_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub outputs: Vec<WireTensor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

for_each_dtype! {
    /// A decoded, runtime-native tensor
    #[derive(Debug, Clone, PartialEq)]
    pub enum Tensor {
        $($DtypeName(ndarray::ArrayD::<$RustType>),)*
    }
}

for_each_dtype! {
    $(
        /// Implement conversions from ndarray types
        impl From<ndarray::ArrayD<$RustType>> for Tensor {
            fn from(item: ndarray::ArrayD<$RustType>) -> Self {
                Tensor::$DtypeName(item)
            }
        }
    )*
}

impl Tensor {
    pub fn datatype(&self) -> DataType {
        for_each_dtype! {
            return match self {
                $(Tensor::$DtypeName(_) => DataType::$DtypeName,)*
            };
        }
    }

    pub fn shape(&self) -> Vec<u64> {
        for_each_dtype! {
            return match self {
                $(Tensor::$DtypeName(v) => v.shape().iter().map(|d| *d as u64).collect(),)*
            };
        }
    }
}

impl From<Tensor> for NativeValue {
    fn from(value: Tensor) -> Self {
        NativeValue::Array(value)
    }
}

/// The native-object result of decoding a wire tensor (or, for request-wide
/// codecs, a whole request). Created per call, consumed by the model's
/// predict step, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// A typed n-dimensional array
    Array(Tensor),

    /// A UTF-8 string decoded from a `BYTES` payload
    Text(String),

    /// A `[height, width, channels]` pixel array
    Image(ndarray::ArrayD<u8>),

    /// A column-ordered composite assembled from several inputs
    Table(Table),
}

impl NativeValue {
    /// A short human-readable name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            NativeValue::Array(_) => "array",
            NativeValue::Text(_) => "text",
            NativeValue::Image(_) => "image",
            NativeValue::Table(_) => "table",
        }
    }
}

/// A column-major composite of decoded values, in request input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: NativeValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_wire_identifiers_round_trip() {
        for dtype in [
            DataType::Float,
            DataType::Double,
            DataType::Bool,
            DataType::I8,
            DataType::I16,
            DataType::I32,
            DataType::I64,
            DataType::U8,
            DataType::U16,
            DataType::U32,
            DataType::U64,
            DataType::Bytes,
        ] {
            assert_eq!(dtype.as_str().parse::<DataType>().unwrap(), dtype);
        }

        assert!("FLOAT99".parse::<DataType>().is_err());
    }

    #[test]
    fn tensor_data_len_counts_bytes_individually() {
        assert_eq!(TensorData::I32(vec![1, 2, 3]).len(), 3);
        assert_eq!(TensorData::Bytes(Bytes::from_static(b"hello")).len(), 5);
    }

    #[test]
    fn scalar_shape_has_one_element() {
        let t = WireTensor::new("x", DataType::Float, vec![], TensorData::Float(vec![1.0]));
        assert_eq!(t.num_elements(), 1);
    }

    #[test]
    fn tensor_parameters_expose_content_type() {
        let mut t = WireTensor::new("x", DataType::I32, vec![1], TensorData::I32(vec![1]));
        assert_eq!(t.content_type(), None);

        t.parameters = Some(Parameters::with_content_type("np"));
        assert_eq!(t.content_type(), Some("np"));
    }
}
