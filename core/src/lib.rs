//! Blocking client for the PetFriends pet-management REST service.
//!
//! # Overview
//! `PetFriendsClient` builds `HttpRequest` values and decodes `HttpResponse`
//! values without touching the network (host-does-IO pattern). `PetFriends`
//! pairs it with a `Transport` to perform the round-trip, and is what test
//! scenarios call.
//!
//! # Design
//! - Every exchange yields an `ApiResponse { status, body }`; HTTP error
//!   statuses are data, not `Err`.
//! - `ResponseBody` is `Json | Text` because the service answers many
//!   failures with plain text or an empty body.
//! - Write endpoints take `multipart/form-data`, encoded with ureq's form
//!   encoder.
//! - Requests carry an explicit timeout.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod photo;
pub mod response;
pub mod transport;
pub mod types;

pub use api::PetFriends;
pub use client::{PetFriendsClient, DEFAULT_BASE_URL};
pub use config::Settings;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use photo::{encode_file_to_base64, PhotoUpload};
pub use response::{ApiResponse, ResponseBody};
pub use transport::{Transport, UreqTransport};
pub use types::{AuthKey, Pet, PetFilter, PetInfo, PetList};
