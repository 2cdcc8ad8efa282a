//! Narrative configuration: service endpoints and the importer registry.
//!
//! The bundled configuration lives in `config/narrative.toml`; `build.rs` validates it and
//! embeds it as JSON so the browser build carries no TOML parser.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

include!(concat!(env!("OUT_DIR"), "/narrative_config_generated.rs"));

/// Importer type launched by the header "web upload" link.
pub const WEB_UPLOAD_IMPORTER: &str = "web_upload";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Base URLs of the remote services.
pub struct ServiceEndpoints {
    /// Staging service root.
    pub staging_api_url: String,
    /// Workspace JSON-RPC endpoint.
    pub workspace_url: String,
    /// Auth service root.
    pub auth_url: String,
    /// Globus transfer link prefix; the Globus user name is appended.
    pub globus_transfer_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Declared arity of an importer's input parameter.
pub enum InputArity {
    /// One-element list.
    List,
    /// Plain string.
    #[default]
    #[serde(other)]
    Single,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Import app bound to one importer type.
pub struct ImportAppSpec {
    /// App id in the host notebook's catalog.
    pub app_id: String,
    /// Parameter receiving the staged file path.
    #[serde(default)]
    pub app_input_param: Option<String>,
    /// Arity of [`Self::app_input_param`].
    #[serde(default)]
    pub app_input_param_type: InputArity,
    /// Parameter receiving the generated output object name.
    #[serde(default)]
    pub app_output_param: Option<String>,
    /// Suffix appended to the generated output name.
    #[serde(default)]
    pub app_output_suffix: Option<String>,
    /// Fixed parameters merged into every launch.
    #[serde(default)]
    pub app_static_params: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry of the per-row importer select.
pub struct ImporterOption {
    /// Importer type key into [`ImporterRegistry::app_info`].
    pub id: String,
    /// Label shown to the user.
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Importer types offered for staged files.
pub struct ImporterRegistry {
    /// Select options in display order.
    pub dropdown_order: Vec<ImporterOption>,
    /// Import app per importer type.
    pub app_info: BTreeMap<String, ImportAppSpec>,
}

impl ImporterRegistry {
    /// Looks up the app bound to `importer_type`.
    pub fn spec(&self, importer_type: &str) -> Option<&ImportAppSpec> {
        self.app_info.get(importer_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Full widget configuration.
pub struct NarrativeConfig {
    /// Config schema version.
    pub schema_version: u32,
    /// Service endpoints.
    pub services: ServiceEndpoints,
    /// Importer registry.
    pub uploaders: ImporterRegistry,
}

impl NarrativeConfig {
    /// Parses the configuration bundled at build time.
    ///
    /// # Errors
    ///
    /// Returns an error when the embedded JSON does not match the runtime schema.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(NARRATIVE_CONFIG_JSON)
    }

    /// Parses a configuration document, e.g. one served by the host page.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not a valid configuration document.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
