//! Python extension module, built with the `python` feature.
pub mod python;
