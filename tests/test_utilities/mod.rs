#![allow(dead_code)]
/// Shared test utilities: mocks and report builders
pub mod mocks;
pub mod report;
