/// Ports module defining interfaces for hexagonal architecture
///
/// Only outbound ports (driven ports) exist: the core is driven directly
/// through the application use case.
pub mod outbound;
