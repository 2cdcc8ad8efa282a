//! Import-app parameter binding.

use narrative_host::{ImportAppSpec, InputArity, StagingPath};
use serde_json::{Map, Value};

/// Output object name for `file_name`: whitespace becomes `_`, then the suffix is appended.
pub fn output_object_name(file_name: &str, suffix: &str) -> String {
    let mut name: String = file_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    name.push_str(suffix);
    name
}

/// Builds the app inputs for importing `file_name` from `dir`.
///
/// Without a file (the header web-upload link) the input parameter is bound to an empty path
/// and no output name is generated. Static parameters never replace the bound input or output.
pub fn build_import_inputs(
    spec: &ImportAppSpec,
    dir: &StagingPath,
    file_name: Option<&str>,
) -> Map<String, Value> {
    let mut inputs = Map::new();

    if let Some(param) = &spec.app_input_param {
        let file_path = file_name
            .map(|name| dir.file_path(name))
            .unwrap_or_default();
        let value = match spec.app_input_param_type {
            InputArity::List => Value::Array(vec![Value::String(file_path)]),
            InputArity::Single => Value::String(file_path),
        };
        inputs.insert(param.clone(), value);
    }

    if let (Some(param), Some(name)) = (&spec.app_output_param, file_name) {
        let suffix = spec.app_output_suffix.as_deref().unwrap_or_default();
        inputs.insert(param.clone(), Value::String(output_object_name(name, suffix)));
    }

    if let Some(statics) = &spec.app_static_params {
        for (key, value) in statics {
            if !inputs.contains_key(key) {
                inputs.insert(key.clone(), value.clone());
            }
        }
    }

    inputs
}
