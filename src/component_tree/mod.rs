/// Component tree of an analysis
///
/// - `domain`: immutable components, branches and depth limits
/// - `services`: tree construction from the scanner report, uuid
///   resolution and the root holder
/// - `visitors`: traversal engine used by downstream computations
pub mod domain;
pub mod services;
pub mod visitors;
