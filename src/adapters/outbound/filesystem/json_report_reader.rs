use crate::ports::outbound::{ReportComponent, ReportMetadata, ScannerReportReader};
use crate::shared::security::{read_regular_file, MAX_FILE_SIZE};
use crate::shared::{Result, TreeError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// On-disk layout of a report dump
#[derive(Debug, Deserialize)]
struct ReportDocument {
    #[serde(default)]
    metadata: ReportMetadata,
    #[serde(default)]
    components: Vec<ReportComponent>,
}

/// JsonReportReader adapter reading a scanner report dumped as JSON
///
/// The whole report is loaded when the reader is created:
///
/// ```json
/// {
///   "metadata": { "project_key": "K1", "root_component_ref": 1 },
///   "components": [
///     { "ref": 1, "type": "PROJECT", "key": "K1", "child_refs": [2] },
///     { "ref": 2, "type": "FILE", "project_relative_path": "src/Foo.js", "lines": 12 }
///   ]
/// }
/// ```
#[derive(Debug)]
pub struct JsonReportReader {
    metadata: ReportMetadata,
    components_by_ref: HashMap<i32, ReportComponent>,
}

impl JsonReportReader {
    /// Loads a report dump from a file
    ///
    /// # Errors
    /// Returns an error if the file is unsafe to read or is not a valid report
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = read_regular_file(path, "scanner report", MAX_FILE_SIZE)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scanner report {}: {}", path.display(), e))
    }

    /// Parses a report dump
    pub fn parse(content: &str) -> Result<Self> {
        let document: ReportDocument = serde_json::from_str(content)?;
        let mut components_by_ref = HashMap::with_capacity(document.components.len());
        for component in document.components {
            if components_by_ref.contains_key(&component.reference) {
                anyhow::bail!("Duplicate component ref {}", component.reference);
            }
            components_by_ref.insert(component.reference, component);
        }
        debug!(
            project_key = %document.metadata.project_key,
            components = components_by_ref.len(),
            "Loaded scanner report"
        );
        Ok(Self {
            metadata: document.metadata,
            components_by_ref,
        })
    }
}

impl ScannerReportReader for JsonReportReader {
    fn read_metadata(&self) -> Result<ReportMetadata> {
        Ok(self.metadata.clone())
    }

    fn read_component(&self, component_ref: i32) -> Result<ReportComponent> {
        self.components_by_ref
            .get(&component_ref)
            .cloned()
            .ok_or_else(|| TreeError::MissingReportComponent { component_ref }.into())
    }
}
