//! Stateless HTTP request builder and response decoder for the pet service.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; every response goes through the single `parse` method,
//! because the service's responses are consumed uniformly as
//! `(status, body)`. Multipart forms are rendered to bytes with ureq's form
//! encoder and photo bytes are passed in already read, so nothing here
//! touches the file system or the network.

use std::io::Read;

use ureq::unversioned::multipart::{Form, Part};

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::photo::PhotoUpload;
use crate::response::{ApiResponse, ResponseBody};
use crate::types::{AuthKey, PetFilter, PetInfo};

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

const AUTH_HEADER: &str = "auth_key";
const PHOTO_FIELD: &str = "pet_photo";

#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /api/key` with the credentials as headers.
    pub fn build_get_api_key(&self, email: &str, password: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("/api/key"))
            .header("email", email)
            .header("password", password)
    }

    /// `GET /api/pets?filter=...`. The filter is sent even when empty.
    pub fn build_get_pets_list(&self, auth_key: &AuthKey, filter: PetFilter) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("/api/pets"))
            .header(AUTH_HEADER, &auth_key.key)
            .query("filter", filter.as_query())
    }

    /// `POST /api/pets`. Without a photo an empty `pet_photo` part is sent,
    /// which the service rejects.
    pub fn build_add_new_pet(
        &self,
        auth_key: &AuthKey,
        info: &PetInfo,
        photo: Option<&PhotoUpload>,
    ) -> Result<HttpRequest> {
        let form = Form::new()
            .text("name", &info.name)
            .text("animal_type", &info.animal_type)
            .text("age", &info.age);
        let form = with_photo(form, photo)?;
        self.multipart(HttpMethod::Post, "/api/pets", auth_key, form)
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.url(&format!("/api/pets/{pet_id}")))
            .header(AUTH_HEADER, &auth_key.key)
    }

    pub fn build_update_pet_info(&self, auth_key: &AuthKey, pet_id: &str, info: &PetInfo) -> Result<HttpRequest> {
        let form = Form::new()
            .text("name", &info.name)
            .text("animal_type", &info.animal_type)
            .text("age", &info.age);
        self.multipart(HttpMethod::Put, &format!("/api/pets/{pet_id}"), auth_key, form)
    }

    /// `POST /api/create_pet_simple`. An empty `age` omits the field instead
    /// of sending an empty value.
    pub fn build_create_pet_simple(&self, auth_key: &AuthKey, info: &PetInfo) -> Result<HttpRequest> {
        let mut form = Form::new()
            .text("name", &info.name)
            .text("animal_type", &info.animal_type);
        if !info.age.is_empty() {
            form = form.text("age", &info.age);
        }
        self.multipart(HttpMethod::Post, "/api/create_pet_simple", auth_key, form)
    }

    /// `POST /api/pets/set_photo/{id}`. Without a photo an empty
    /// `pet_photo` part is sent.
    pub fn build_set_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: Option<&PhotoUpload>,
    ) -> Result<HttpRequest> {
        let form = with_photo(Form::new(), photo)?;
        self.multipart(
            HttpMethod::Post,
            &format!("/api/pets/set_photo/{pet_id}"),
            auth_key,
            form,
        )
    }

    pub fn parse(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse {
            status: response.status,
            body: ResponseBody::decode(response.body),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn multipart(&self, method: HttpMethod, path: &str, auth_key: &AuthKey, mut form: Form<'_>) -> Result<HttpRequest> {
        let content_type = format!("multipart/form-data; boundary={}", form.boundary());
        let mut body = Vec::new();
        form.read_to_end(&mut body)
            .map_err(|e| ApiError::Encoding(e.to_string()))?;

        let mut req = HttpRequest::new(method, self.url(path))
            .header(AUTH_HEADER, &auth_key.key)
            .header("content-type", &content_type);
        req.body = Some(body);
        Ok(req)
    }
}

/// Appends the `pet_photo` file part, or an empty text part when there is
/// no photo.
fn with_photo<'a>(form: Form<'a>, photo: Option<&'a PhotoUpload>) -> Result<Form<'a>> {
    let Some(photo) = photo else {
        return Ok(form.text(PHOTO_FIELD, ""));
    };
    let part = Part::bytes(&photo.data)
        .file_name(&photo.file_name)
        .mime_str(&photo.content_type)
        .map_err(|e| ApiError::Encoding(e.to_string()))?;
    Ok(form.part(PHOTO_FIELD, part))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PetFriendsClient {
        PetFriendsClient::new("http://localhost:3000")
    }

    fn key() -> AuthKey {
        AuthKey::new("k3y")
    }

    fn info() -> PetInfo {
        PetInfo::new("Barsik", "cat", "4")
    }

    fn photo() -> PhotoUpload {
        PhotoUpload {
            file_name: "cat.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![0xff, 0xd8, 0xff, 0xe0],
        }
    }

    fn body_text(req: &HttpRequest) -> String {
        String::from_utf8_lossy(req.body.as_deref().unwrap()).into_owned()
    }

    fn part_names(req: &HttpRequest) -> Vec<String> {
        body_text(req)
            .split("; name=\"")
            .skip(1)
            .map(|rest| rest.split('"').next().unwrap().to_string())
            .collect()
    }

    #[test]
    fn build_get_api_key_sends_credentials_as_headers() {
        let req = client().build_get_api_key("a@b.c", "secret");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/key");
        assert_eq!(req.header_value("email"), Some("a@b.c"));
        assert_eq!(req.header_value("password"), Some("secret"));
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_pets_list_sends_filter_even_when_empty() {
        let req = client().build_get_pets_list(&key(), PetFilter::All);
        assert_eq!(req.url, "http://localhost:3000/api/pets");
        assert_eq!(req.header_value("auth_key"), Some("k3y"));
        assert_eq!(req.query, vec![("filter".to_string(), String::new())]);

        let req = client().build_get_pets_list(&key(), PetFilter::MyPets);
        assert_eq!(req.query, vec![("filter".to_string(), "my_pets".to_string())]);
    }

    #[test]
    fn build_add_new_pet_includes_photo_part() {
        let req = client().build_add_new_pet(&key(), &info(), Some(&photo())).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/pets");
        assert!(req
            .header_value("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
        assert_eq!(part_names(&req), ["name", "animal_type", "age", "pet_photo"]);
        let body = body_text(&req);
        assert!(body.contains("filename=\"cat.jpg\""));
        assert!(body.contains("Content-Type: image/jpeg"));
    }

    #[test]
    fn build_add_new_pet_without_photo_sends_empty_part() {
        let req = client().build_add_new_pet(&key(), &info(), None).unwrap();
        assert_eq!(part_names(&req), ["name", "animal_type", "age", "pet_photo"]);
        let body = body_text(&req);
        assert!(!body.contains("filename="));
        assert!(body.contains("name=\"pet_photo\"\r\n\r\n\r\n"));
    }

    #[test]
    fn build_rejects_malformed_photo_type() {
        let mut bad = photo();
        bad.content_type = "image/jpeg/with/too/many/slashes".to_string();
        let err = client().build_set_pet_photo(&key(), "pet-1", Some(&bad)).unwrap_err();
        assert!(matches!(err, ApiError::Encoding(_)));
    }

    #[test]
    fn multipart_body_ends_with_closing_boundary() {
        let req = client().build_update_pet_info(&key(), "pet-1", &info()).unwrap();
        let content_type = req.header_value("content-type").unwrap();
        let boundary = content_type.strip_prefix("multipart/form-data; boundary=").unwrap();
        assert!(body_text(&req).ends_with(&format!("\r\n--{boundary}--\r\n")));
    }

    #[test]
    fn build_delete_pet_has_no_body() {
        let req = client().build_delete_pet(&key(), "pet-1");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/api/pets/pet-1");
        assert_eq!(req.header_value("auth_key"), Some("k3y"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_update_pet_info_is_multipart_put() {
        let req = client().build_update_pet_info(&key(), "pet-1", &info()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/api/pets/pet-1");
        assert_eq!(part_names(&req), ["name", "animal_type", "age"]);
        assert!(body_text(&req).contains("\r\n\r\nBarsik\r\n"));
    }

    #[test]
    fn build_create_pet_simple_with_age() {
        let req = client().build_create_pet_simple(&key(), &info()).unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/create_pet_simple");
        assert_eq!(part_names(&req), ["name", "animal_type", "age"]);
    }

    #[test]
    fn build_create_pet_simple_omits_empty_age() {
        let req = client().build_create_pet_simple(&key(), &PetInfo::new("Barsik", "cat", "")).unwrap();
        assert_eq!(part_names(&req), ["name", "animal_type"]);
    }

    #[test]
    fn build_set_pet_photo_with_file() {
        let req = client().build_set_pet_photo(&key(), "pet-1", Some(&photo())).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/pets/set_photo/pet-1");
        assert_eq!(part_names(&req), ["pet_photo"]);
        assert!(body_text(&req).contains("filename=\"cat.jpg\""));
    }

    #[test]
    fn build_set_pet_photo_without_file_sends_empty_part() {
        let req = client().build_set_pet_photo(&key(), "pet-1", None).unwrap();
        assert_eq!(part_names(&req), ["pet_photo"]);
        let body = body_text(&req);
        assert!(!body.contains("filename="));
        assert!(body.contains("name=\"pet_photo\"\r\n\r\n\r\n"));
    }

    #[test]
    fn parse_json_response() {
        let resp = client().parse(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"key":"abc"}"#.to_string(),
        });
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body.str_field("key"), Some("abc"));
    }

    #[test]
    fn parse_text_response() {
        let resp = client().parse(HttpResponse {
            status: 403,
            headers: Vec::new(),
            body: "Forbidden".to_string(),
        });
        assert_eq!(resp.status, 403);
        assert_eq!(resp.body, ResponseBody::Text("Forbidden".to_string()));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PetFriendsClient::new("http://localhost:3000/");
        let req = client.build_get_api_key("e", "p");
        assert_eq!(req.url, "http://localhost:3000/api/key");
    }
}
