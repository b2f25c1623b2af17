use crate::ports::outbound::AnalysisRecord;

/// BuildTreeResponse - Response DTO from the build component tree use case
///
/// The trees themselves are installed in the
/// [`TreeRootHolder`](crate::component_tree::services::TreeRootHolder)
/// passed to the use case; this only carries what the step learned.
#[derive(Debug, Clone)]
pub struct BuildTreeResponse {
    /// Last analysis of the root component, if it was analyzed before
    pub base_analysis: Option<AnalysisRecord>,
    /// Whether the root component was never analyzed
    pub first_analysis: bool,
    /// Number of components installed as root tree, down to files
    pub component_count: usize,
}

impl BuildTreeResponse {
    pub fn new(base_analysis: Option<AnalysisRecord>, component_count: usize) -> Self {
        Self {
            first_analysis: base_analysis.is_none(),
            base_analysis,
            component_count,
        }
    }
}
