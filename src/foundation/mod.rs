/// Error taxonomy shared by every module.
pub mod error;
pub(crate) mod math;
