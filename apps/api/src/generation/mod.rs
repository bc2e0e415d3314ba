// Generation: one call to the external service that turns resume text and a job description
// into a StructuredDocument. All network access goes through a GenerationTransport.

pub mod client;
pub mod http;

pub use client::{GenerationClient, GenerationError};
pub use http::HttpTransport;
