//! Supporting files for network analysis utility services.
//!
//! Turns the analysis engine's dataset descriptions into the static files
//! the routing services read at run time:
//! - `NetworkDatasetProperties.ini`, one section per dataset
//! - `DefaultTravelModes.json` and, optionally, its translations
//! - `ToolInfo.json` with the dataset schema and per-tool limits
//!
//! Everything here is a pure transform plus file writes.

pub mod error;
pub mod exporter;
pub mod ini;
pub mod limits;
pub mod properties;
pub mod restriction;
pub mod tool_info;
pub mod travel_modes;

pub use error::{SupportError, SupportResult};
pub use exporter::{
    ExportOptions, LOCALIZED_TRAVEL_MODES_FILE, PROPERTIES_FILE, SupportingFiles,
    SupportingFilesExporter, TOOL_INFO_FILE, TRAVEL_MODES_FILE,
};
pub use properties::{CostAttributes, NetworkProperties, TravelModeKey, network_properties};
pub use travel_modes::{LOCALIZED_FILE_NAME, TravelModeIds, TravelModesDocument};
