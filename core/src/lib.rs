//! Client core for the pets service.
//!
//! # Overview
//! Fetches the pet list, obtains single-use upload targets and uploads
//! images as `multipart/form-data`.
//!
//! # Design
//! - `PetsClient` is stateless. It builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO), so
//!   a native host can drive it through the C ABI.
//! - `PetsApi` runs the same operations asynchronously over an injected
//!   `Transport`; `ReqwestTransport` is the default one.
//! - Types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod error;
pub mod filter;
pub mod http;
pub mod multipart;
pub mod store;
pub mod transport;
pub mod types;

pub use api::PetsApi;
pub use client::PetsClient;
pub use error::{ApiError, TransportError};
pub use filter::filter_pets;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::Boundary;
pub use store::ImageStore;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{Pet, UploadRequest, UploadTarget};
