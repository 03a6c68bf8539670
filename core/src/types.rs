//! Domain DTOs for the pet service.
//!
//! # Design
//! The service owns the pet record; these types are read-side views over its
//! JSON and are deliberately lenient (missing optional fields default). The
//! client only ever writes the three `PetInfo` fields.

use serde::{Deserialize, Serialize};

/// Authentication token returned by `GET /api/key`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// A pet record as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animal_type: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Body of `GET /api/pets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn contains_id(&self, id: &str) -> bool {
        self.pets.iter().any(|p| p.id == id)
    }
}

/// Which pets `GET /api/pets` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PetFilter {
    #[default]
    All,
    MyPets,
}

impl PetFilter {
    /// Value of the `filter` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
        }
    }
}

/// Writable pet fields sent as multipart text parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PetInfo {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

impl PetInfo {
    pub fn new(name: impl Into<String>, animal_type: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.into(),
        }
    }
}
