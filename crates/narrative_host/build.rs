use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Services {
    staging_api_url: String,
    workspace_url: String,
    auth_url: String,
    globus_transfer_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DropdownEntry {
    id: String,
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppInfo {
    app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_input_param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_input_param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_output_param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_output_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_static_params: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Uploaders {
    dropdown_order: Vec<DropdownEntry>,
    app_info: BTreeMap<String, AppInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NarrativeConfigFile {
    schema_version: u32,
    services: Services,
    uploaders: Uploaders,
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("config").join("narrative.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let config: NarrativeConfigFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if config.schema_version != 1 {
        panic!(
            "config schema mismatch in {}: expected 1 found {}",
            path.display(),
            config.schema_version
        );
    }
    for entry in &config.uploaders.dropdown_order {
        if !config.uploaders.app_info.contains_key(&entry.id) {
            panic!(
                "importer `{}` is listed in dropdown_order but has no app_info entry",
                entry.id
            );
        }
    }
    for (id, info) in &config.uploaders.app_info {
        if let Some(kind) = info.app_input_param_type.as_deref() {
            if kind != "list" && kind != "string" {
                panic!("importer `{id}` has unknown app_input_param_type `{kind}`");
            }
        }
        if info.app_output_param.is_some() && info.app_input_param.is_none() {
            panic!("importer `{id}` names an output parameter without an input parameter");
        }
    }

    let json = serde_json::to_string_pretty(&config).expect("serialize narrative config");
    let generated = format!(
        "/// Build-time validated narrative configuration JSON.\n\
pub const NARRATIVE_CONFIG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("narrative_config_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
