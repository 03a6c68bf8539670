//! In-memory stand-in for the PetFriends REST service.
//!
//! Serves the same routes, headers and multipart fields as the real service
//! so the client and its scenario suite can run without network access.
//! Authentication is checked before any input validation: a bad `auth_key`
//! always yields 403, even when the request is also malformed.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

/// A user allowed to request keys.
#[derive(Clone, Debug)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

#[derive(Default)]
pub struct Store {
    /// Issued key -> account id.
    keys: HashMap<String, String>,
    /// Oldest first; listings are served newest first.
    pets: Vec<Pet>,
}

#[derive(Clone)]
pub struct AppState {
    accounts: Arc<Vec<Account>>,
    store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self::with_pets(accounts, Vec::new())
    }

    /// Starts with `pets` already stored, e.g. records owned by other users.
    pub fn with_pets(accounts: Vec<Account>, pets: Vec<Pet>) -> Self {
        Self {
            accounts: Arc::new(accounts),
            store: Arc::new(RwLock::new(Store {
                keys: HashMap::new(),
                pets,
            })),
        }
    }
}

pub fn app(accounts: Vec<Account>) -> Router {
    app_with_state(AppState::new(accounts))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/api/key", get(issue_key))
        .route("/api/pets", get(list_pets).post(add_pet))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .route("/api/pets/set_photo/{id}", post(set_photo))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Builds a `data:` URI the way the service stores uploaded photos.
pub fn data_uri(content_type: &str, data: &[u8]) -> String {
    format!(
        "data:{content_type};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

fn new_key() -> String {
    let mut key = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    key.truncate(56);
    key
}

fn forbidden(message: &str) -> Response {
    (StatusCode::FORBIDDEN, message.to_string()).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, message.to_string()).into_response()
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Resolves the `auth_key` header to an account id.
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, Response> {
    let key = header(headers, "auth_key").ok_or_else(|| forbidden("Please provide 'auth_key' Header"))?;
    let owner = state.store.read().await.keys.get(key).cloned();
    owner.ok_or_else(|| forbidden("Please provide a valid 'auth_key' Header"))
}

async fn issue_key(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (Some(email), Some(password)) = (header(&headers, "email"), header(&headers, "password")) else {
        return forbidden("Please provide 'email' and 'password' Headers");
    };
    let Some(account) = state
        .accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
    else {
        return forbidden("This user wasn't found in database");
    };

    let key = new_key();
    state.store.write().await.keys.insert(key.clone(), account.id.clone());
    debug!(email, "issued api key");
    Json(serde_json::json!({ "key": key })).into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    filter: String,
}

async fn list_pets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PetList>, Response> {
    let owner = authorize(&state, &headers).await?;
    let store = state.store.read().await;
    let pets = match query.filter.as_str() {
        "" => store.pets.iter().rev().cloned().collect(),
        "my_pets" => store
            .pets
            .iter()
            .rev()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect(),
        _ => return Err(bad_request("Filter value is incorrect")),
    };
    Ok(Json(PetList { pets }))
}

struct Upload {
    content_type: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct PetForm {
    name: Option<String>,
    animal_type: Option<String>,
    age: Option<String>,
    photo: Option<Upload>,
}

struct PetFields {
    name: String,
    animal_type: String,
    age: String,
}

async fn read_form(mut multipart: Multipart) -> Result<PetForm, Response> {
    let mut form = PetForm::default();
    while let Some(field) = multipart.next_field().await.map_err(IntoResponse::into_response)? {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        let content_type = field.content_type().unwrap_or("image/jpeg").to_string();
        let data = field.bytes().await.map_err(IntoResponse::into_response)?;
        let text = || String::from_utf8_lossy(&data).trim().to_string();
        match name.as_str() {
            "name" => form.name = Some(text()),
            "animal_type" => form.animal_type = Some(text()),
            "age" => form.age = Some(text()),
            // An empty or non-file part counts as no photo.
            "pet_photo" if is_file && !data.is_empty() => {
                form.photo = Some(Upload {
                    content_type,
                    data: data.to_vec(),
                })
            }
            _ => {}
        }
    }
    Ok(form)
}

fn validate_fields(form: &mut PetForm) -> Result<PetFields, Response> {
    let name = form.name.take().filter(|s| !s.is_empty());
    let animal_type = form.animal_type.take().filter(|s| !s.is_empty());
    let age = form.age.take().filter(|s| is_valid_age(s));
    match (name, animal_type, age) {
        (Some(name), Some(animal_type), Some(age)) => Ok(PetFields {
            name,
            animal_type,
            age,
        }),
        _ => Err(bad_request("Provided data is incorrect")),
    }
}

fn is_valid_age(raw: &str) -> bool {
    raw.parse::<f64>().map(|age| age.is_finite() && age >= 0.0).unwrap_or(false)
}

async fn insert_pet(state: &AppState, owner: String, fields: PetFields, pet_photo: String) -> Pet {
    let pet = Pet {
        id: Uuid::new_v4().to_string(),
        name: fields.name,
        animal_type: fields.animal_type,
        age: fields.age,
        pet_photo,
        user_id: owner,
    };
    state.store.write().await.pets.push(pet.clone());
    debug!(id = %pet.id, "created pet");
    pet
}

async fn add_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Response> {
    let owner = authorize(&state, &headers).await?;
    let mut form = read_form(multipart).await?;
    let fields = validate_fields(&mut form)?;
    let photo = form.photo.ok_or_else(|| bad_request("Provided data is incorrect"))?;
    let pet_photo = data_uri(&photo.content_type, &photo.data);
    Ok(Json(insert_pet(&state, owner, fields, pet_photo).await))
}

async fn create_pet_simple(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Response> {
    let owner = authorize(&state, &headers).await?;
    let mut form = read_form(multipart).await?;
    let fields = validate_fields(&mut form)?;
    Ok(Json(insert_pet(&state, owner, fields, String::new()).await))
}

async fn update_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, Response> {
    let owner = authorize(&state, &headers).await?;
    let mut form = read_form(multipart).await?;
    let fields = validate_fields(&mut form)?;

    let mut store = state.store.write().await;
    let pet = store
        .pets
        .iter_mut()
        .find(|p| p.id == id && p.user_id == owner)
        .ok_or_else(|| bad_request("Pet with this id wasn't found"))?;
    pet.name = fields.name;
    pet.animal_type = fields.animal_type;
    pet.age = fields.age;
    debug!(id = %pet.id, "updated pet");
    Ok(Json(pet.clone()))
}

async fn set_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, Response> {
    let owner = authorize(&state, &headers).await?;
    let form = read_form(multipart).await?;
    let photo = form.photo.ok_or_else(|| bad_request("Provided data is incorrect"))?;

    let mut store = state.store.write().await;
    let pet = store
        .pets
        .iter_mut()
        .find(|p| p.id == id && p.user_id == owner)
        .ok_or_else(|| bad_request("Pet with this id wasn't found"))?;
    pet.pet_photo = data_uri(&photo.content_type, &photo.data);
    debug!(id = %pet.id, bytes = photo.data.len(), "set pet photo");
    Ok(Json(pet.clone()))
}

/// Always 200 with an empty body; only the caller's own pet is removed.
async fn delete_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let owner = authorize(&state, &headers).await?;
    let mut store = state.store.write().await;
    let before = store.pets.len();
    store.pets.retain(|p| !(p.id == id && p.user_id == owner));
    debug!(%id, removed = before != store.pets.len(), "delete pet");
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_56_hex_chars() {
        let key = new_key();
        assert_eq!(key.len(), 56);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, new_key());
    }

    #[test]
    fn age_must_be_a_non_negative_number() {
        assert!(is_valid_age("4"));
        assert!(is_valid_age("0.5"));
        assert!(!is_valid_age(""));
        assert!(!is_valid_age("-1"));
        assert!(!is_valid_age("four"));
        assert!(!is_valid_age("NaN"));
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut form = PetForm {
            name: Some(String::new()),
            animal_type: Some("cat".to_string()),
            age: Some("3".to_string()),
            photo: None,
        };
        assert!(validate_fields(&mut form).is_err());
    }

    #[test]
    fn missing_age_is_rejected() {
        let mut form = PetForm {
            name: Some("Tom".to_string()),
            animal_type: Some("cat".to_string()),
            age: None,
            photo: None,
        };
        assert!(validate_fields(&mut form).is_err());
    }

    #[test]
    fn complete_fields_pass() {
        let mut form = PetForm {
            name: Some("Tom".to_string()),
            animal_type: Some("cat".to_string()),
            age: Some("3".to_string()),
            photo: None,
        };
        let fields = validate_fields(&mut form).ok().unwrap();
        assert_eq!(fields.name, "Tom");
        assert_eq!(fields.age, "3");
    }

    #[test]
    fn data_uri_uses_standard_base64() {
        assert_eq!(data_uri("image/jpeg", b"hi"), "data:image/jpeg;base64,aGk=");
    }

    #[test]
    fn pet_serializes_with_service_field_names() {
        let pet = Pet {
            id: "1".to_string(),
            name: "Tom".to_string(),
            animal_type: "cat".to_string(),
            age: "3".to_string(),
            pet_photo: String::new(),
            user_id: "u".to_string(),
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["animal_type"], "cat");
        assert_eq!(json["pet_photo"], "");
        assert_eq!(json["user_id"], "u");
    }
}
