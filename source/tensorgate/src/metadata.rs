use crate::types::DataType;

/// Static metadata for one loaded model.
///
/// Built once at model-load time (usually from a parsed settings file, see
/// [`crate::settings`]) and shared read-only by every in-flight request to
/// that model.
#[derive(Debug, Clone, Default)]
pub struct ModelMetadata {
    /// The name of the model
    pub name: String,

    /// The model version, if the model is versioned
    pub version: Option<String>,

    /// Declared inputs with their default content types
    /// Can be empty
    pub inputs: Vec<TensorAnnotation>,

    /// Declared outputs with their content types
    /// Can be empty
    pub outputs: Vec<TensorAnnotation>,

    /// A request-level content type. When set, whole requests to this model
    /// are decoded by a single request-wide codec instead of input by input.
    pub request_content_type: Option<String>,
}

impl ModelMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The default content type declared for an input of the given name
    pub fn input_content_type(&self, name: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.content_type.as_deref())
    }

    /// The content type declared for an output of the given name
    pub fn output_content_type(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.content_type.as_deref())
    }
}

/// Metadata for a single declared input or output
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct TensorAnnotation {
    pub name: String,

    /// The expected datatype, if declared
    pub datatype: Option<DataType>,

    /// The expected shape, if declared
    pub shape: Option<Vec<u64>>,

    /// The default content type used to decode/encode this tensor when the
    /// request itself doesn't specify one
    pub content_type: Option<String>,

    /// Optional description
    pub description: Option<String>,
}

impl TensorAnnotation {
    pub fn with_content_type(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: Some(content_type.into()),
            ..Default::default()
        }
    }
}
