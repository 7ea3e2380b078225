//! The default travel modes document and its translations.

use crate::error::{SupportError, SupportResult};
use crate::restriction::{is_usage_parameter_name, map_numeric_usage, map_usage};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use netpub_types::NetworkDatasetDescription;
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;
use walkdir::WalkDir;

/// Translations are read from files with this name, one per locale folder.
pub const LOCALIZED_FILE_NAME: &str = "DefaultTravelModeNamesAndDescriptions.json";

const FALLBACK_DEFAULT_MODE: &str = "Driving Time";
const BOM: char = '\u{feff}';

/// Stable ids for the well-known travel modes.
const TRAVEL_MODE_IDS: [(&str, &str); 8] = [
    ("Driving Time", "FEgifRtFndKNcJMJ"),
    ("Driving Distance", "iKjmHuBSIqdEfOVr"),
    ("Trucking Time", "ZzzRtYcPLjXFBKwr"),
    ("Trucking Distance", "UBaNfFWeKcrRVYIo"),
    ("Walking Time", "caFAgoThrvUpkFBW"),
    ("Walking Distance", "yFuMFwIYblqKEefX"),
    ("Rural Driving Time", "NmNhNDUwZmE1YTlj"),
    ("Rural Driving Distance", "Yzk3NjI1NTU5NjVj"),
];

/// Hands out travel mode ids: fixed ones for well-known names, fresh
/// 16-character ids otherwise. No id is handed out twice.
#[derive(Debug, Default)]
pub struct TravelModeIds {
    issued: HashSet<String>,
}

impl TravelModeIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn well_known(name: &str) -> Option<&'static str> {
        TRAVEL_MODE_IDS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, id)| *id)
    }

    pub fn id_for(&mut self, name: &str) -> String {
        if let Some(id) = Self::well_known(name) {
            self.issued.insert(id.to_string());
            return id.to_string();
        }
        loop {
            let id = generate_id();
            let reserved = TRAVEL_MODE_IDS.iter().any(|(_, known)| *known == id);
            if !reserved && self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

fn generate_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    STANDARD.encode(hex.as_bytes())[..16].to_string()
}

/// The travel modes published with the utility service.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelModesDocument {
    pub supported: Vec<Value>,
    pub default_id: String,
}

impl TravelModesDocument {
    /// Builds the document from the template dataset's travel modes.
    ///
    /// Each mode keeps only the parameters of the attributes it uses, with
    /// restriction usage values expressed as keywords.
    pub fn from_template(desc: &NetworkDatasetDescription) -> SupportResult<Self> {
        let first = desc
            .travel_modes
            .keys()
            .next()
            .ok_or_else(|| SupportError::NoTravelModes(desc.name.clone()))?;
        let default_name = desc
            .default_travel_mode_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                desc.travel_modes
                    .contains_key(FALLBACK_DEFAULT_MODE)
                    .then_some(FALLBACK_DEFAULT_MODE)
            })
            .unwrap_or(first.as_str());

        let mut ids = TravelModeIds::new();
        let mut supported = Vec::with_capacity(desc.travel_modes.len());
        let mut default_id = String::new();
        for (name, mode) in &desc.travel_modes {
            let id = ids.id_for(name);
            let mut mode = mode.clone();
            trim_attribute_parameters(&mut mode);
            if let Value::Object(map) = &mut mode {
                map.insert("id".to_string(), Value::String(id.clone()));
            }
            if name == default_name {
                default_id = id;
            }
            supported.push(mode);
        }
        debug!(
            "{} travel modes, default {default_name} ({default_id})",
            supported.len()
        );

        Ok(Self {
            supported,
            default_id,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "supportedTravelModes": self.supported,
            "defaultTravelMode": self.default_id,
        })
    }
}

/// Drops parameters of attributes the mode does not use and maps
/// restriction usage values to keywords.
fn trim_attribute_parameters(mode: &mut Value) {
    let mut applicable: Vec<String> = mode
        .get("restrictionAttributeNames")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    for key in ["timeAttributeName", "distanceAttributeName"] {
        if let Some(name) = mode.get(key).and_then(Value::as_str) {
            applicable.push(name.to_string());
        }
    }

    let parameters = mode
        .get("attributeParameterValues")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let kept: Vec<Value> = parameters
        .into_iter()
        .filter(|parameter| {
            parameter
                .get("attributeName")
                .and_then(Value::as_str)
                .is_some_and(|name| applicable.iter().any(|a| a == name))
        })
        .map(|mut parameter| {
            let is_usage = parameter
                .get("parameterName")
                .and_then(Value::as_str)
                .is_some_and(is_usage_parameter_name);
            if is_usage {
                let mapped = match parameter.get("value") {
                    Some(Value::Number(number)) => number.as_f64().map(map_numeric_usage),
                    Some(Value::String(text)) => Some(match text.parse::<f64>() {
                        Ok(number) => map_numeric_usage(number),
                        Err(_) => map_usage(text),
                    }),
                    _ => None,
                };
                if let Some(mapped) = mapped {
                    parameter["value"] = Value::String(mapped);
                }
            }
            parameter
        })
        .collect();

    if let Value::Object(map) = mode {
        map.insert("attributeParameterValues".to_string(), Value::Array(kept));
    }
}

/// Reads every translation file below `folder`, keyed by the name of the
/// folder that holds it.
pub fn load_localized_travel_modes(folder: &Path) -> SupportResult<Map<String, Value>> {
    let mut localized = Map::new();
    for entry in WalkDir::new(folder).follow_links(false) {
        let entry = entry.map_err(|e| SupportError::Walk {
            path: folder.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() || entry.file_name() != LOCALIZED_FILE_NAME {
            continue;
        }

        let path = entry.path();
        let locale = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = std::fs::read_to_string(path).map_err(|source| SupportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(text.trim_start_matches(BOM)).map_err(|source| {
            SupportError::InvalidJson {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Loaded {locale} travel mode translations");
        localized.insert(locale, value);
    }
    Ok(localized)
}
