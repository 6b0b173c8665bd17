//! Core pipeline for the caneca waste-sorting assistant: photo in, bin recommendation out.

/// Error taxonomy shared by the whole pipeline.
pub mod error;
/// Response rendering for structured and conversational clients.
pub mod format;
/// Model invocation with the in-memory primary path and the temp-file fallback.
pub mod invoke;
/// Domain data structures flowing through a request.
pub mod model;
/// Decoding, colour conversion and downscaling of uploaded photos.
pub mod normalize;
/// Traits describing the classifier interface.
pub mod ports;
/// Ordered keyword rules mapping labels onto the waste catalog.
pub mod resolver;
/// High-level service facade used by the HTTP layer.
pub mod service;
/// Confidence buckets and photo-retake hints.
pub mod tier;
/// Spanish display names for common model labels.
pub mod translate;

pub use error::*;
pub use model::*;
pub use ports::*;
pub use service::*;
