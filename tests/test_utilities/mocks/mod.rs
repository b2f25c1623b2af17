/// Mock implementations for testing
mod mock_component_repository;
mod mock_report_reader;

pub use mock_component_repository::MockComponentRepository;
pub use mock_report_reader::MockReportReader;
