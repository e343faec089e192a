//! Core domain types for requests, responses and registrations.

pub mod descriptor;
pub mod headers;
pub mod method;
pub mod request;
pub mod response;
