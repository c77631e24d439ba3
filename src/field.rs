pub(crate) mod data;
/// Synthetic sample fields.
pub mod sample;
