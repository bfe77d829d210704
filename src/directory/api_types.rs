//! Serde-deserializable types matching upstream directory API responses.
//!
//! These types are separate from domain types to allow clean
//! deserialization while keeping domain types focused on application
//! needs. The upstream service uses numeric ids and carries address
//! fields (suite, zipcode, geo) the application never shows; conversion
//! stringifies the id and keeps street/city only.

use serde::Deserialize;

use super::types::{Address, User};

#[derive(Debug, Default, Deserialize)]
pub struct ApiAddress {
  #[serde(default)]
  pub street: String,
  #[serde(default)]
  pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub website: String,
  #[serde(default)]
  pub address: ApiAddress,
}

impl ApiUser {
  pub fn into_user(self) -> User {
    User {
      id: self.id.to_string(),
      name: self.name,
      username: self.username,
      email: self.email,
      phone: self.phone,
      website: self.website,
      address: Address {
        street: self.address.street,
        city: self.address.city,
      },
    }
  }
}
