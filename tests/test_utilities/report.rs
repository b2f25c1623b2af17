use ce_component_tree::ports::outbound::{FileStatus, ReportComponent, ReportComponentType};

/// PROJECT report component
pub fn report_project(reference: i32, key: &str, child_refs: &[i32]) -> ReportComponent {
    ReportComponent {
        key: key.to_string(),
        name: format!("{} name", key),
        child_refs: child_refs.to_vec(),
        ..ReportComponent::new(reference, ReportComponentType::Project)
    }
}

/// FILE report component
pub fn report_file(reference: i32, path: &str, lines: i32, status: FileStatus) -> ReportComponent {
    ReportComponent {
        project_relative_path: path.to_string(),
        language: "js".to_string(),
        lines,
        status,
        ..ReportComponent::new(reference, ReportComponentType::File)
    }
}
