//! Typed access to a service definition draft.
//!
//! A draft is an XML manifest. Server capabilities appear as elements with
//! a `TypeName` child naming the capability and an `Enabled` sibling
//! holding `true` or `false`:
//!
//! ```xml
//! <SVCExtension><Enabled>true</Enabled><TypeName>KmlServer</TypeName></SVCExtension>
//! ```
//!
//! The document is held as a list of owned `quick-xml` events so that
//! everything the packager wrote, including formatting, survives a save.

use crate::error::{PublishError, PublishResult};
use netpub_types::ServiceKind;
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Messages the packager's analyzer reported for a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerReport {
    /// Blocking problems. Staging a draft with errors fails.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl AnalyzerReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A capability entry of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub type_name: String,
    pub enabled: bool,
}

/// Where a capability's `Enabled` value lives in the event list.
#[derive(Debug, Clone, Copy)]
enum EnabledSlot {
    /// Index of the text event inside `<Enabled>`.
    Text(usize),
    /// Index of an `<Enabled>` start tag with no text.
    Open(usize),
    /// Index of an `<Enabled/>` element.
    Empty(usize),
}

struct Frame {
    name: Vec<u8>,
    type_name: Option<String>,
    enabled: Option<(EnabledSlot, bool)>,
}

struct Entry {
    type_name: String,
    slot: EnabledSlot,
    enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ServiceDefinitionDraft {
    kind: ServiceKind,
    path: PathBuf,
    analysis: AnalyzerReport,
    events: Vec<Event<'static>>,
}

impl ServiceDefinitionDraft {
    /// Reads the draft the packager wrote at `path`.
    pub fn load(
        kind: ServiceKind,
        path: impl Into<PathBuf>,
        analysis: AnalyzerReport,
    ) -> PublishResult<Self> {
        let path = path.into();
        let xml = std::fs::read_to_string(&path)?;
        Self::parse(kind, path, &xml, analysis)
    }

    pub fn parse(
        kind: ServiceKind,
        path: impl Into<PathBuf>,
        xml: &str,
        analysis: AnalyzerReport,
    ) -> PublishResult<Self> {
        let path = path.into();
        let mut reader = Reader::from_str(xml);
        let mut events = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => events.push(event.into_owned()),
                Err(e) => {
                    return Err(PublishError::InvalidDraft {
                        path,
                        message: format!("at byte {}: {e}", reader.buffer_position()),
                    });
                }
            }
        }
        Ok(Self {
            kind,
            path,
            analysis,
            events,
        })
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn analysis(&self) -> &AnalyzerReport {
        &self.analysis
    }

    /// Every capability that has both a type name and an enabled flag, in
    /// document order.
    pub fn capabilities(&self) -> Vec<Capability> {
        self.entries()
            .into_iter()
            .map(|entry| Capability {
                type_name: entry.type_name,
                enabled: entry.enabled,
            })
            .collect()
    }

    pub fn is_capability_enabled(&self, type_name: &str) -> Option<bool> {
        self.entries()
            .into_iter()
            .find(|entry| entry.type_name == type_name)
            .map(|entry| entry.enabled)
    }

    /// Sets the enabled flag of every capability named `type_name`.
    /// Returns false if the draft has no such capability.
    pub fn set_capability_enabled(&mut self, type_name: &str, enabled: bool) -> bool {
        let value = if enabled { "true" } else { "false" };
        let mut slots: Vec<EnabledSlot> = self
            .entries()
            .into_iter()
            .filter(|entry| entry.type_name == type_name)
            .map(|entry| entry.slot)
            .collect();
        if slots.is_empty() {
            return false;
        }

        // Later slots first so earlier indices stay valid across inserts.
        slots.sort_by_key(|slot| std::cmp::Reverse(slot_index(*slot)));
        for slot in slots {
            let text = Event::Text(BytesText::new(value));
            match slot {
                EnabledSlot::Text(index) => self.events[index] = text,
                EnabledSlot::Open(index) => self.events.insert(index + 1, text),
                EnabledSlot::Empty(index) => {
                    if let Event::Empty(start) = self.events[index].clone() {
                        let end = Event::End(start.to_end().into_owned());
                        self.events[index] = Event::Start(start);
                        self.events.insert(index + 1, text);
                        self.events.insert(index + 2, end);
                    }
                }
            }
        }
        true
    }

    pub fn to_xml(&self) -> PublishResult<String> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(|e| self.invalid(e.to_string()))?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| self.invalid(e.to_string()))
    }

    /// Writes the draft back to its own path.
    pub fn save(&self) -> PublishResult<()> {
        self.save_as(&self.path)
    }

    pub fn save_as(&self, path: &Path) -> PublishResult<()> {
        std::fs::write(path, self.to_xml()?)?;
        Ok(())
    }

    fn invalid(&self, message: String) -> PublishError {
        PublishError::InvalidDraft {
            path: self.path.clone(),
            message,
        }
    }

    fn entries(&self) -> Vec<Entry> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut entries = Vec::new();
        for (index, event) in self.events.iter().enumerate() {
            match event {
                Event::Start(start) => {
                    let name = start.local_name().as_ref().to_vec();
                    if name == b"Enabled" {
                        if let Some(parent) = stack.last_mut() {
                            parent.enabled = Some((EnabledSlot::Open(index), false));
                        }
                    }
                    stack.push(Frame {
                        name,
                        type_name: None,
                        enabled: None,
                    });
                }
                Event::Empty(start) if start.local_name().as_ref() == b"Enabled" => {
                    if let Some(parent) = stack.last_mut() {
                        parent.enabled = Some((EnabledSlot::Empty(index), false));
                    }
                }
                Event::Text(text) => {
                    let [.., parent, current] = stack.as_mut_slice() else {
                        continue;
                    };
                    let Ok(value) = text.unescape() else {
                        continue;
                    };
                    let value = value.trim();
                    match current.name.as_slice() {
                        b"TypeName" => parent.type_name = Some(value.to_string()),
                        b"Enabled" => {
                            parent.enabled = Some((
                                EnabledSlot::Text(index),
                                value.eq_ignore_ascii_case("true"),
                            ));
                        }
                        _ => {}
                    }
                }
                Event::End(_) => {
                    if let Some(Frame {
                        type_name: Some(type_name),
                        enabled: Some((slot, enabled)),
                        ..
                    }) = stack.pop()
                    {
                        entries.push(Entry {
                            type_name,
                            slot,
                            enabled,
                        });
                    }
                }
                _ => {}
            }
        }
        entries
    }
}

fn slot_index(slot: EnabledSlot) -> usize {
    match slot {
        EnabledSlot::Text(index) | EnabledSlot::Open(index) | EnabledSlot::Empty(index) => index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SVCManifest xmlns:typens="http://www.esri.com/schemas/ArcGIS/10.3">
  <Configurations>
    <SVCConfiguration>
      <Definition>
        <TypeName>MapServer</TypeName>
        <Extensions>
          <SVCExtension><Enabled>true</Enabled><Info/><TypeName>KmlServer</TypeName></SVCExtension>
          <SVCExtension><Enabled>false</Enabled><TypeName>NAServer</TypeName></SVCExtension>
          <SVCExtension><Enabled/><TypeName>WMSServer</TypeName></SVCExtension>
        </Extensions>
      </Definition>
    </SVCConfiguration>
  </Configurations>
</SVCManifest>"#;

    fn draft() -> ServiceDefinitionDraft {
        ServiceDefinitionDraft::parse(
            ServiceKind::Map,
            "/tmp/NetworkAnalysis_NAServer.sddraft",
            MANIFEST,
            AnalyzerReport::default(),
        )
        .unwrap()
    }

    #[test]
    fn capabilities_need_a_type_name_and_a_flag() {
        let caps = draft().capabilities();
        assert_eq!(
            caps,
            vec![
                Capability {
                    type_name: "KmlServer".into(),
                    enabled: true
                },
                Capability {
                    type_name: "NAServer".into(),
                    enabled: false
                },
                Capability {
                    type_name: "WMSServer".into(),
                    enabled: false
                },
            ]
        );
    }

    #[test]
    fn toggling_flips_the_sibling_flag() {
        let mut draft = draft();
        assert!(draft.set_capability_enabled("KmlServer", false));
        assert!(draft.set_capability_enabled("NAServer", true));
        assert_eq!(draft.is_capability_enabled("KmlServer"), Some(false));
        assert_eq!(draft.is_capability_enabled("NAServer"), Some(true));

        let xml = draft.to_xml().unwrap();
        assert!(xml.contains("<Enabled>false</Enabled><Info/><TypeName>KmlServer</TypeName>"));
        assert!(xml.contains("<Enabled>true</Enabled><TypeName>NAServer</TypeName>"));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<TypeName>MapServer</TypeName>"));
    }

    #[test]
    fn empty_flag_element_is_expanded() {
        let mut draft = draft();
        assert!(draft.set_capability_enabled("WMSServer", true));
        let xml = draft.to_xml().unwrap();
        assert!(xml.contains("<Enabled>true</Enabled><TypeName>WMSServer</TypeName>"));
        assert_eq!(draft.is_capability_enabled("KmlServer"), Some(true));
    }

    #[test]
    fn unknown_capability_is_reported() {
        let mut draft = draft();
        let before = draft.to_xml().unwrap();
        assert!(!draft.set_capability_enabled("FeatureServer", true));
        assert_eq!(draft.to_xml().unwrap(), before);
    }

    #[test]
    fn unchanged_draft_round_trips() {
        assert_eq!(draft().to_xml().unwrap(), MANIFEST);
    }

    #[test]
    fn save_writes_the_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.sddraft");
        std::fs::write(&path, MANIFEST).unwrap();

        let mut draft =
            ServiceDefinitionDraft::load(ServiceKind::Map, &path, AnalyzerReport::default())
                .unwrap();
        draft.set_capability_enabled("KmlServer", false);
        draft.save().unwrap();

        let reloaded =
            ServiceDefinitionDraft::load(ServiceKind::Map, &path, AnalyzerReport::default())
                .unwrap();
        assert_eq!(reloaded.is_capability_enabled("KmlServer"), Some(false));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        let err = ServiceDefinitionDraft::parse(
            ServiceKind::Map,
            "bad.sddraft",
            "<SVCManifest><Configurations></SVCManifest>",
            AnalyzerReport::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PublishError::InvalidDraft { .. }));
    }
}
