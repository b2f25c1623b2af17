use crate::application::dto::{BuildTreeRequest, BuildTreeResponse};
use crate::component_tree::domain::{Branch, BranchType, ProjectAttributes};
use crate::component_tree::services::{
    build_changed_component_tree_root, ComponentTreeBuilder, ComponentUuidFactory,
    PublicKeyGenerator, TreeRootHolder,
};
use crate::ports::outbound::{
    AnalysisRecord, BranchRepository, ComponentRepository, ReportComponent, ReportMetadata,
    ScannerReportReader,
};
use crate::shared::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Version given to the project when neither the report nor a previous
/// analysis provides one
const DEFAULT_PROJECT_VERSION: &str = "not provided";

/// Name of the main branch when the report doesn't name it
const DEFAULT_MAIN_BRANCH_NAME: &str = "master";

/// BuildComponentTreeUseCase - Builds the component tree of an analysis
///
/// Reads the scanner report, resolves the uuid of every component against
/// persisted identities, builds the report tree and installs it in the
/// [`TreeRootHolder`] of the analysis.
///
/// # Type Parameters
/// * `R` - ScannerReportReader implementation
/// * `C` - ComponentRepository implementation
pub struct BuildComponentTreeUseCase<R, C> {
    report_reader: R,
    component_repository: C,
}

impl<R, C> BuildComponentTreeUseCase<R, C>
where
    R: ScannerReportReader,
    C: ComponentRepository,
{
    /// Creates a new BuildComponentTreeUseCase with injected dependencies
    pub fn new(report_reader: R, component_repository: C) -> Self {
        Self {
            report_reader,
            component_repository,
        }
    }

    /// Executes the build component tree use case
    ///
    /// # Arguments
    /// * `request` - Project and branch being analyzed
    /// * `holder` - Holder receiving the roots; must not be initialized yet
    ///
    /// # Returns
    /// BuildTreeResponse with the base analysis and the component count
    ///
    /// # Errors
    /// Returns an error if:
    /// - the report or the repository can't be read
    /// - the report tree is malformed
    /// - the holder was already initialized
    pub fn execute(
        &self,
        request: BuildTreeRequest,
        holder: &TreeRootHolder,
    ) -> Result<BuildTreeResponse> {
        let BuildTreeRequest {
            project,
            branch,
            scm_base_path,
        } = request;

        // Step 1: Read the report root
        let metadata = self.report_reader.read_metadata()?;
        let report_root = self
            .report_reader
            .read_component(metadata.root_component_ref)?;
        let root_key = report_root.key.clone();

        // Step 2: Load persisted identities for the branch scope
        let uuid_factory = ComponentUuidFactory::new(
            &self.component_repository,
            &root_key,
            &branch,
            |path| branch.generate_key(&root_key, path),
            &metadata.modules_project_relative_path_by_key,
        )?;
        let root_uuid = uuid_factory.get_or_create_for_key(&branch.generate_key(&root_key, None));

        // Step 3: Load the base analysis
        let base_analysis = self
            .component_repository
            .select_last_analysis(&root_uuid)?;
        debug!(
            root_uuid = %root_uuid,
            first_analysis = base_analysis.is_none(),
            "Loaded base analysis"
        );

        // Step 4: Build the report tree
        let project_attributes = project_attributes(&metadata, base_analysis.as_ref());
        let uuid_supplier = |key: &str| uuid_factory.get_or_create_for_key(key);
        let scanner_component_supplier = |component_ref: i32| -> Result<ReportComponent> {
            self.report_reader.read_component(component_ref)
        };
        let builder = ComponentTreeBuilder::new(
            &branch,
            &PublicKeyGenerator,
            &uuid_supplier,
            &scanner_component_supplier,
            &project,
            &branch,
            project_attributes,
        );
        let scm_base_path = scm_base_path.unwrap_or(metadata.relative_path_from_scm_root);
        let report_tree_root = builder.build_project(&report_root, Some(scm_base_path.as_str()))?;

        // Step 5: Install the roots
        let root = if branch.is_short_lived() {
            build_changed_component_tree_root(&report_tree_root)?
        } else {
            Arc::clone(&report_tree_root)
        };
        holder.set_roots(root, report_tree_root)?;

        let response = BuildTreeResponse::new(base_analysis, holder.size()?);
        info!(
            project = %project.key(),
            branch = %branch.name(),
            components = response.component_count,
            "Built component tree"
        );
        Ok(response)
    }
}

/// Attributes of the PROJECT component
///
/// The version falls back to the one of the base analysis, then to
/// [`DEFAULT_PROJECT_VERSION`].
fn project_attributes(
    metadata: &ReportMetadata,
    base_analysis: Option<&AnalysisRecord>,
) -> ProjectAttributes {
    let project_version = non_blank(&metadata.project_version)
        .or_else(|| base_analysis.and_then(|analysis| analysis.project_version.as_deref()))
        .unwrap_or(DEFAULT_PROJECT_VERSION);
    let build_string = non_blank(&metadata.build_string).map(str::to_string);
    ProjectAttributes::new(project_version, build_string)
}

/// Branch described by the report metadata
///
/// A report without a branch type analyzes the main branch. The merge
/// branch uuid is not part of the report; fill it in with
/// [`resolve_merge_branch`].
pub fn branch_from_metadata(metadata: &ReportMetadata) -> Branch {
    let name = non_blank(&metadata.branch_name).map(str::to_string);
    let branch = match metadata.branch_type {
        None => Branch::main(name.unwrap_or_else(|| DEFAULT_MAIN_BRANCH_NAME.to_string())),
        Some(BranchType::Long) => match name {
            Some(name) => Branch::long(name, None),
            None => Branch::main(DEFAULT_MAIN_BRANCH_NAME),
        },
        Some(BranchType::Short) => Branch::short(name.unwrap_or_default(), None),
        Some(BranchType::PullRequest) => Branch::pull_request(
            metadata.pull_request_key.trim(),
            None,
            non_blank(&metadata.target_branch_name).map(str::to_string),
        ),
    };
    branch.with_reference_branch_name(non_blank(&metadata.reference_branch_name).map(str::to_string))
}

/// Fills in the merge branch uuid of `branch` from persisted branch rows
///
/// The merge branch is the one recorded on the branch's own row. A pull
/// request without a row of its own merges into its target branch. The
/// branch is returned unchanged when it is main, already knows its merge
/// branch, or nothing is persisted.
///
/// # Errors
/// Returns an error if the repository fails
pub fn resolve_merge_branch<B>(branch: Branch, project_uuid: &str, repository: &B) -> Result<Branch>
where
    B: BranchRepository + ?Sized,
{
    if branch.is_main() || branch.merge_branch_uuid().is_some() {
        return Ok(branch);
    }

    let own_key = branch.pull_request_key().unwrap_or(branch.name());
    let mut merge_branch_uuid = repository
        .select_by_branch_key(project_uuid, own_key)?
        .and_then(|record| record.merge_branch_uuid);
    if merge_branch_uuid.is_none() {
        if let Some(target_branch_name) = branch.target_branch_name() {
            merge_branch_uuid = repository
                .select_by_branch_key(project_uuid, target_branch_name)?
                .map(|record| record.uuid);
        }
    }

    debug!(
        branch = %branch.name(),
        merge_branch_uuid = ?merge_branch_uuid,
        "Resolved merge branch"
    );
    Ok(branch.with_merge_branch_uuid(merge_branch_uuid))
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
