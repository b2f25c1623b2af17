use ce_component_tree::prelude::*;
use std::collections::HashMap;

/// Mock ScannerReportReader for testing
pub struct MockReportReader {
    pub metadata: ReportMetadata,
    pub components: HashMap<i32, ReportComponent>,
    pub should_fail: bool,
}

impl MockReportReader {
    pub fn new(metadata: ReportMetadata) -> Self {
        Self {
            metadata,
            components: HashMap::new(),
            should_fail: false,
        }
    }

    pub fn with_component(mut self, component: ReportComponent) -> Self {
        self.components.insert(component.reference, component);
        self
    }

    pub fn with_failure() -> Self {
        Self {
            metadata: ReportMetadata::default(),
            components: HashMap::new(),
            should_fail: true,
        }
    }
}

impl ScannerReportReader for MockReportReader {
    fn read_metadata(&self) -> Result<ReportMetadata> {
        if self.should_fail {
            anyhow::bail!("Mock report read failure");
        }
        Ok(self.metadata.clone())
    }

    fn read_component(&self, component_ref: i32) -> Result<ReportComponent> {
        if self.should_fail {
            anyhow::bail!("Mock report read failure");
        }
        self.components
            .get(&component_ref)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No component for ref {}", component_ref))
    }
}
