/// Result alias used across the crate.
///
/// Domain faults travel as [`crate::shared::TreeError`] inside the `anyhow::Error`
/// and can be recovered with `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
