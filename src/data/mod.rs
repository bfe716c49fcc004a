//! Data acquisition: the POS device HTTP client and the synthetic sample
//! generator used to exercise the pipeline without hardware.

pub mod device;
pub mod sample;

pub use device::*;
pub use sample::*;
