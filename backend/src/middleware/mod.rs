//! Request middleware applied across the whole application.

pub mod trace;

pub use trace::Trace;
