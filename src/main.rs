mod cli;
mod config;

use ce_component_tree::adapters::outbound::console::{LineCounter, TreePrinter};
use ce_component_tree::adapters::outbound::filesystem::JsonReportReader;
use ce_component_tree::adapters::outbound::memory::InMemoryRepository;
use ce_component_tree::application::dto::BuildTreeRequest;
use ce_component_tree::application::use_cases::{
    branch_from_metadata, resolve_merge_branch, BuildComponentTreeUseCase,
};
use ce_component_tree::component_tree::domain::{Component, CrawlerDepthLimit, Project};
use ce_component_tree::component_tree::services::{
    build_changed_component_tree_root, TreeRootHolder,
};
use ce_component_tree::component_tree::visitors::{ComponentVisitor, VisitorsCrawler};
use ce_component_tree::ports::outbound::ScannerReportReader;
use ce_component_tree::shared::{ExitCode, Result};
use clap::Parser;
use cli::{Args, TreeDepth};
use config::ConfigFile;
use std::io::IsTerminal;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, Level};

/// Options resolved from the command line and the config file
#[derive(Debug)]
struct RunOptions {
    changed_only: bool,
    compute_durations: bool,
    depth_limit: CrawlerDepthLimit,
    scm_base_path: Option<String>,
}

impl RunOptions {
    /// Command-line flags win over config values
    fn resolve(args: &Args, config: &ConfigFile) -> Self {
        let depth = args
            .depth
            .or_else(|| config.tree_depth())
            .unwrap_or(TreeDepth::File);
        Self {
            changed_only: args.changed || config.changed_only.unwrap_or(false),
            compute_durations: args.durations || config.compute_durations.unwrap_or(false),
            depth_limit: depth.depth_limit(),
            scm_base_path: config.scm_base_path.clone(),
        }
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            // Nothing left to report if stderr is gone
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_logging(&args);

    if let Err(e) = run(args) {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::for_error(&e).as_i32());
    }
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let options = RunOptions::resolve(&args, &config);
    debug!(?options, "Resolved options");

    // Create adapters (Dependency Injection)
    let report_reader = JsonReportReader::from_path(&args.report)?;
    let repository = match args.db.as_deref() {
        Some(db_path) => InMemoryRepository::from_path(db_path)?,
        None => InMemoryRepository::new(),
    };

    let metadata = report_reader.read_metadata()?;
    let report_root = report_reader.read_component(metadata.root_component_ref)?;
    let project_key = if metadata.project_key.trim().is_empty() {
        report_root.key.clone()
    } else {
        metadata.project_key.clone()
    };
    let project_uuid = repository
        .project_uuid(&project_key)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let project_name = args
        .project_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| Some(report_root.name.clone()).filter(|name| !name.trim().is_empty()))
        .unwrap_or_else(|| project_key.clone());
    let description = Some(report_root.description.trim().to_string()).filter(|d| !d.is_empty());
    let project = Project::new(project_uuid, project_key, project_name, description);
    let branch =
        resolve_merge_branch(branch_from_metadata(&metadata), project.uuid(), &repository)?;

    // Build the tree
    let use_case = BuildComponentTreeUseCase::new(report_reader, repository);
    let holder = TreeRootHolder::new();
    let request = BuildTreeRequest::new(project, branch, options.scm_base_path.clone());
    let response = use_case.execute(request, &holder)?;

    let root = if options.changed_only {
        build_changed_component_tree_root(holder.report_tree_root()?)?
    } else {
        Arc::clone(holder.root()?)
    };

    // Render
    let (output, durations) = render_tree(&root, &options)?;
    print!("{}", output);
    println!();
    println!("Components: {}", response.component_count);
    match response.base_analysis {
        Some(ref analysis) => println!(
            "Base analysis: {} ({})",
            analysis.uuid,
            analysis.created_at.to_rfc3339()
        ),
        None => println!("First analysis"),
    }

    if options.compute_durations {
        eprintln!("Visitor durations:");
        for (name, duration) in durations {
            eprintln!("  {}: {:?}", name, duration);
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<ConfigFile> {
    match args.config.as_deref() {
        Some(path) => config::load_config_from_path(path),
        None => {
            let current_dir = std::env::current_dir()?;
            Ok(config::discover_config(&current_dir)?.unwrap_or_default())
        }
    }
}

/// Counts lines bottom-up, then prints the tree top-down
fn render_tree(
    root: &Arc<Component>,
    options: &RunOptions,
) -> Result<(String, Vec<(String, Duration)>)> {
    let mut durations = Vec::new();

    let mut line_counter = LineCounter::new();
    {
        let mut crawler = VisitorsCrawler::with_durations(
            vec![ComponentVisitor::path_aware(&mut line_counter)],
            options.compute_durations,
        );
        crawler.visit(root)?;
        if options.compute_durations {
            durations.extend(crawler.cumulative_durations()?);
        }
    }
    let line_counts = line_counter.into_counts();

    let colored = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let mut printer = TreePrinter::new(options.depth_limit, &line_counts, colored);
    {
        let mut crawler = VisitorsCrawler::with_durations(
            vec![ComponentVisitor::path_aware(&mut printer)],
            options.compute_durations,
        );
        crawler.visit(root)?;
        if options.compute_durations {
            durations.extend(crawler.cumulative_durations()?);
        }
    }

    Ok((printer.into_output(), durations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["ce-tree", "--report", "report.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_options_default() {
        let options = RunOptions::resolve(&args(&[]), &ConfigFile::default());
        assert!(!options.changed_only);
        assert!(!options.compute_durations);
        assert_eq!(options.depth_limit, CrawlerDepthLimit::FILE);
        assert!(options.scm_base_path.is_none());
    }

    #[test]
    fn test_options_from_config() {
        let config = ConfigFile {
            changed_only: Some(true),
            compute_durations: Some(true),
            depth: Some("DIRECTORY".to_string()),
            scm_base_path: Some("api".to_string()),
            ..Default::default()
        };
        let options = RunOptions::resolve(&args(&[]), &config);
        assert!(options.changed_only);
        assert!(options.compute_durations);
        assert_eq!(options.depth_limit, CrawlerDepthLimit::DIRECTORY);
        assert_eq!(options.scm_base_path.as_deref(), Some("api"));
    }

    #[test]
    fn test_cli_depth_overrides_config() {
        let config = ConfigFile {
            depth: Some("DIRECTORY".to_string()),
            ..Default::default()
        };
        let options = RunOptions::resolve(&args(&["--depth", "project"]), &config);
        assert_eq!(options.depth_limit, CrawlerDepthLimit::PROJECT);
    }
}
