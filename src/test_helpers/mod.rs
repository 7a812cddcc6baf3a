//! A set of helpers for testing

mod destination;
mod sample;

pub use destination::DestinationBuilder;
pub use sample::SampleBuilder;
