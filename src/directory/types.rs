use serde::{Deserialize, Serialize};

/// Postal address, reduced to the fields the command surface shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default)]
  pub street: String,
  #[serde(default)]
  pub city: String,
}

/// A user record as presented to callers.
///
/// `id` is the stringified upstream numeric id, or a generated UUID for
/// records created locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
  pub id: String,
  pub name: String,
  pub username: String,
  pub email: String,
  pub phone: String,
  pub website: String,
  pub address: Address,
}

/// The fields of an edit or a local override; everything optional.
///
/// `address` is shallow: when set it replaces the address wholesale,
/// street and city are not merged individually.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<Address>,
}

impl UserPatch {
  /// Apply the set fields of this patch on top of `user`.
  pub fn apply_to(&self, user: &mut User) {
    if let Some(name) = &self.name {
      user.name = name.clone();
    }
    if let Some(username) = &self.username {
      user.username = username.clone();
    }
    if let Some(email) = &self.email {
      user.email = email.clone();
    }
    if let Some(phone) = &self.phone {
      user.phone = phone.clone();
    }
    if let Some(website) = &self.website {
      user.website = website.clone();
    }
    if let Some(address) = &self.address {
      user.address = address.clone();
    }
  }

  /// Layer `newer` over this patch; fields set in `newer` win.
  pub fn merged_with(&self, newer: &UserPatch) -> UserPatch {
    UserPatch {
      name: newer.name.clone().or_else(|| self.name.clone()),
      username: newer.username.clone().or_else(|| self.username.clone()),
      email: newer.email.clone().or_else(|| self.email.clone()),
      phone: newer.phone.clone().or_else(|| self.phone.clone()),
      website: newer.website.clone().or_else(|| self.website.clone()),
      address: newer.address.clone().or_else(|| self.address.clone()),
    }
  }

  /// True when no field is set.
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.username.is_none()
      && self.email.is_none()
      && self.phone.is_none()
      && self.website.is_none()
      && self.address.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_user() -> User {
    User {
      id: "1".into(),
      name: "Leanne Graham".into(),
      username: "Bret".into(),
      email: "leanne@example.com".into(),
      phone: "1-770-736-8031".into(),
      website: "hildegard.org".into(),
      address: Address {
        street: "Kulas Light".into(),
        city: "Gwenborough".into(),
      },
    }
  }

  #[test]
  fn apply_to_touches_only_set_fields() {
    let mut user = sample_user();
    let patch = UserPatch {
      name: Some("Changed".into()),
      ..UserPatch::default()
    };

    patch.apply_to(&mut user);

    assert_eq!(user.name, "Changed");
    assert_eq!(user.username, "Bret");
    assert_eq!(user.address.city, "Gwenborough");
  }

  #[test]
  fn apply_to_replaces_address_wholesale() {
    let mut user = sample_user();
    let patch = UserPatch {
      address: Some(Address {
        street: "New Street".into(),
        city: String::new(),
      }),
      ..UserPatch::default()
    };

    patch.apply_to(&mut user);

    assert_eq!(user.address.street, "New Street");
    assert_eq!(user.address.city, "");
  }

  #[test]
  fn merged_with_prefers_newer_fields() {
    let older = UserPatch {
      name: Some("Old".into()),
      email: Some("old@example.com".into()),
      ..UserPatch::default()
    };
    let newer = UserPatch {
      name: Some("New".into()),
      phone: Some("555".into()),
      ..UserPatch::default()
    };

    let merged = older.merged_with(&newer);

    assert_eq!(merged.name.as_deref(), Some("New"));
    assert_eq!(merged.email.as_deref(), Some("old@example.com"));
    assert_eq!(merged.phone.as_deref(), Some("555"));
    assert!(merged.website.is_none());
  }

  #[test]
  fn patch_serializes_without_unset_fields() {
    let patch = UserPatch {
      name: Some("Only Name".into()),
      ..UserPatch::default()
    };

    let json = serde_json::to_value(&patch).unwrap();
    assert_eq!(json, serde_json::json!({ "name": "Only Name" }));
  }
}
