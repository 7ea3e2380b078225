//! Writes every supporting file for a set of network datasets.

use crate::error::{SupportError, SupportResult};
use crate::ini::IniDocument;
use crate::limits::service_limits;
use crate::properties::network_properties;
use crate::tool_info::tool_info;
use crate::travel_modes::{TravelModesDocument, load_localized_travel_modes};
use netpub_types::NetworkDatasetDescription;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PROPERTIES_FILE: &str = "NetworkDatasetProperties.ini";
pub const TRAVEL_MODES_FILE: &str = "DefaultTravelModes.json";
pub const LOCALIZED_TRAVEL_MODES_FILE: &str = "DefaultTravelModesLocalized.json";
pub const TOOL_INFO_FILE: &str = "ToolInfo.json";

/// Inputs beyond the dataset descriptions.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub output_folder: PathBuf,
    /// Folder searched for per-locale translation files.
    pub localized_travel_modes_folder: Option<PathBuf>,
    /// `Tool Limit Value;...`
    pub service_limits: Option<String>,
}

/// The files an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportingFiles {
    pub properties: PathBuf,
    pub travel_modes: PathBuf,
    pub localized_travel_modes: Option<PathBuf>,
    pub tool_info: PathBuf,
}

pub struct SupportingFilesExporter {
    options: ExportOptions,
}

impl SupportingFilesExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Writes the properties file for every dataset and the travel mode
    /// and tool info documents for the first one, which serves as the
    /// template.
    pub fn export(&self, datasets: &[NetworkDatasetDescription]) -> SupportResult<SupportingFiles> {
        let template = datasets.first().ok_or(SupportError::NoDatasets)?;
        let folder = &self.options.output_folder;
        std::fs::create_dir_all(folder).map_err(|source| SupportError::Write {
            path: folder.clone(),
            source,
        })?;

        let mut ini = IniDocument::new();
        for desc in datasets {
            let properties = network_properties(desc)?;
            ini.add_section(properties.dataset, properties.values);
        }
        let properties = folder.join(PROPERTIES_FILE);
        info!("Writing network dataset properties to {}", properties.display());
        write_file(&properties, ini.render())?;

        let travel_modes_doc = TravelModesDocument::from_template(template)?;
        let travel_modes = folder.join(TRAVEL_MODES_FILE);
        info!("Saving travel modes to {}", travel_modes.display());
        write_json(&travel_modes, &travel_modes_doc.to_json())?;

        let localized_travel_modes = match &self.options.localized_travel_modes_folder {
            Some(source) => {
                let localized = load_localized_travel_modes(source)?;
                let path = folder.join(LOCALIZED_TRAVEL_MODES_FILE);
                info!("Saving localized travel modes to {}", path.display());
                write_json(&path, &Value::Object(localized))?;
                Some(path)
            }
            None => None,
        };

        let limits = service_limits(self.options.service_limits.as_deref())?;
        let tool_info_path = folder.join(TOOL_INFO_FILE);
        info!("Saving tool info to {}", tool_info_path.display());
        write_json(&tool_info_path, &tool_info(template, &travel_modes_doc, limits))?;

        Ok(SupportingFiles {
            properties,
            travel_modes,
            localized_travel_modes,
            tool_info: tool_info_path,
        })
    }
}

fn write_file(path: &Path, contents: String) -> SupportResult<()> {
    std::fs::write(path, contents).map_err(|source| SupportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-printed with sorted keys and a trailing newline.
fn write_json(path: &Path, value: &Value) -> SupportResult<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    write_file(path, text)
}
