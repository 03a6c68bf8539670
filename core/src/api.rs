//! `PetFriends`: the request builder wired to a transport.
//!
//! Every method returns the service's answer as an `ApiResponse`, whatever
//! its status. `Err` means the exchange itself failed or a photo could not be
//! read.

use std::path::Path;

use crate::client::{PetFriendsClient, DEFAULT_BASE_URL};
use crate::config::Settings;
use crate::error::Result;
use crate::http::HttpRequest;
use crate::photo::{self, PhotoUpload};
use crate::response::ApiResponse;
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthKey, PetFilter, PetInfo};

#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::default())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_transport(&settings.base_url, UreqTransport::new(settings.timeout))
    }
}

impl Default for PetFriends<UreqTransport> {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    /// 200 with `key` for valid credentials, 403 otherwise.
    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse> {
        self.send(self.client.build_get_api_key(email, password))
    }

    /// 200 with `pets`, 403 for an invalid key.
    pub fn get_pets_list(&self, auth_key: &AuthKey, filter: PetFilter) -> Result<ApiResponse> {
        self.send(self.client.build_get_pets_list(auth_key, filter))
    }

    /// Adds a pet with a photo. `None` sends an empty photo part, which the
    /// service rejects with 400.
    ///
    /// The service answers a bad key with 403, although it has also been
    /// documented as 404.
    pub fn add_new_pet(&self, auth_key: &AuthKey, info: &PetInfo, photo_path: Option<&Path>) -> Result<ApiResponse> {
        let photo = photo_path.map(PhotoUpload::from_path).transpose()?;
        self.send(self.client.build_add_new_pet(auth_key, info, photo.as_ref())?)
    }

    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse> {
        self.send(self.client.build_delete_pet(auth_key, pet_id))
    }

    pub fn update_pet_info(&self, auth_key: &AuthKey, pet_id: &str, info: &PetInfo) -> Result<ApiResponse> {
        self.send(self.client.build_update_pet_info(auth_key, pet_id, info)?)
    }

    /// Adds a pet without a photo. An empty `info.age` is not sent at all.
    pub fn create_pet_simple(&self, auth_key: &AuthKey, info: &PetInfo) -> Result<ApiResponse> {
        self.send(self.client.build_create_pet_simple(auth_key, info)?)
    }

    /// Sets or replaces a pet's photo. `None` sends an empty photo part.
    pub fn set_pet_photo(&self, auth_key: &AuthKey, pet_id: &str, photo_path: Option<&Path>) -> Result<ApiResponse> {
        let photo = photo_path.map(PhotoUpload::from_path).transpose()?;
        self.send(self.client.build_set_pet_photo(auth_key, pet_id, photo.as_ref())?)
    }

    pub fn encode_file_to_base64(&self, path: &Path) -> Result<String> {
        photo::encode_file_to_base64(path)
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse> {
        let response = self.transport.execute(request)?;
        Ok(self.client.parse(response))
    }
}
