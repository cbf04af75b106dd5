//! This module handles parsing a model settings file.
//!
//! Settings files are owned by the serving layer's settings loader; the core
//! only consumes the parsed result as [`ModelMetadata`]. Content types are
//! not validated here; the codec registry is the authority at dispatch
//! time.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metadata::{ModelMetadata, TensorAnnotation};
use crate::types::DataType;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct ModelSettings {
    /// A number defining the settings format version. Should be 1
    spec_version: u64,

    /// The name of the model
    pub name: String,

    /// The model version
    pub version: Option<String>,

    /// When set, whole requests are decoded by the request-wide codec
    /// registered for this content type
    pub request_content_type: Option<String>,

    /// Declared inputs
    /// Can be empty
    #[serde(default)]
    pub input: Vec<TensorSettings>,

    /// Declared outputs
    /// Can be empty
    #[serde(default)]
    pub output: Vec<TensorSettings>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct TensorSettings {
    pub name: String,

    /// The expected wire datatype (e.g. `FP32`, `BYTES`)
    pub datatype: Option<DataType>,

    /// The expected shape
    pub shape: Option<Vec<u64>>,

    /// The default content type for this tensor
    pub content_type: Option<String>,

    /// Optional description
    pub description: Option<String>,
}

/// Parse a settings document
pub fn parse(data: &str) -> Result<ModelSettings> {
    Ok(toml::from_str(data)?)
}

impl From<ModelSettings> for ModelMetadata {
    fn from(settings: ModelSettings) -> Self {
        Self {
            name: settings.name,
            version: settings.version,
            inputs: settings.input.into_iter().map(|t| t.into()).collect(),
            outputs: settings.output.into_iter().map(|t| t.into()).collect(),
            request_content_type: settings.request_content_type,
        }
    }
}

impl From<TensorSettings> for TensorAnnotation {
    fn from(settings: TensorSettings) -> Self {
        Self {
            name: settings.name,
            datatype: settings.datatype,
            shape: settings.shape,
            content_type: settings.content_type,
            description: settings.description,
        }
    }
}
