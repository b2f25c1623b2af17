use clap::Parser;
use std::path::PathBuf;

use ce_component_tree::component_tree::domain::CrawlerDepthLimit;

/// Deepest component type printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDepth {
    Project,
    Directory,
    File,
}

impl std::str::FromStr for TreeDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "project" => Ok(TreeDepth::Project),
            "directory" | "dir" => Ok(TreeDepth::Directory),
            "file" => Ok(TreeDepth::File),
            _ => Err(format!(
                "Invalid depth: {}. Please specify 'project', 'directory' or 'file'",
                s
            )),
        }
    }
}

impl TreeDepth {
    /// Crawler depth limit printing down to this component type
    pub fn depth_limit(&self) -> CrawlerDepthLimit {
        match self {
            TreeDepth::Project => CrawlerDepthLimit::PROJECT,
            TreeDepth::Directory => CrawlerDepthLimit::DIRECTORY,
            TreeDepth::File => CrawlerDepthLimit::FILE,
        }
    }
}

/// Build and print the component tree of a scanner report
#[derive(Parser, Debug)]
#[command(name = "ce-tree")]
#[command(version)]
#[command(about = "Build and print the component tree of a scanner report", long_about = None)]
pub struct Args {
    /// Scanner report dumped as JSON
    #[arg(short, long, value_name = "FILE")]
    pub report: PathBuf,

    /// Repository snapshot (JSON) with persisted components, branches and analyses
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Project name (defaults to the name of the report's project component)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Config file (defaults to ce-tree.config.yml in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print only what changed; always the case for short-lived branches and pull requests
    #[arg(long)]
    pub changed: bool,

    /// Deepest component type printed: project, directory or file
    #[arg(short, long)]
    pub depth: Option<TreeDepth>,

    /// Print the time spent in each visitor
    #[arg(long)]
    pub durations: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}
