/// Filesystem adapters for reading report dumps
mod json_report_reader;

pub use json_report_reader::JsonReportReader;
