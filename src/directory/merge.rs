//! Merging of remote records with local overrides.

use crate::store::OverrideRecord;

use super::types::User;

/// Combine the remote user list with the local override records.
///
/// Remote records keep their order; where an override with the same id
/// exists, its set fields replace the remote fields. Overrides with no
/// remote counterpart are appended afterwards in store order, expanded
/// to full records. Pure function of its inputs.
///
/// Ids are assumed unique within each input; a duplicated id is a
/// data-integrity violation upstream and gets first-match behavior here.
pub fn merge(remote: &[User], local: &[OverrideRecord]) -> Vec<User> {
  let mut merged: Vec<User> = remote
    .iter()
    .map(|remote_user| match local.iter().find(|r| r.id == remote_user.id) {
      Some(record) => {
        let mut user = remote_user.clone();
        record.fields.apply_to(&mut user);
        user
      }
      None => remote_user.clone(),
    })
    .collect();

  merged.extend(
    local
      .iter()
      .filter(|record| !remote.iter().any(|u| u.id == record.id))
      .map(OverrideRecord::materialize),
  );

  merged
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::directory::types::{Address, UserPatch};

  fn remote_user(id: &str, name: &str) -> User {
    User {
      id: id.into(),
      name: name.into(),
      username: format!("u-{id}"),
      email: format!("{id}@example.com"),
      ..User::default()
    }
  }

  fn override_record(id: &str, patch: UserPatch) -> OverrideRecord {
    OverrideRecord {
      id: id.into(),
      fields: patch,
    }
  }

  #[test]
  fn no_overrides_is_identity() {
    let remote = vec![remote_user("1", "A"), remote_user("2", "B")];
    assert_eq!(merge(&remote, &[]), remote);
  }

  #[test]
  fn no_remote_is_pure_local() {
    let local = vec![override_record(
      "x",
      UserPatch {
        name: Some("Local".into()),
        ..UserPatch::default()
      },
    )];

    let merged = merge(&[], &local);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].id, "x");
    assert_eq!(merged[0].name, "Local");
    // Unset fields of a local-only record come out empty.
    assert_eq!(merged[0].email, "");
  }

  #[test]
  fn override_fields_win_per_field() {
    let remote = vec![remote_user("1", "Remote")];
    let local = vec![override_record(
      "1",
      UserPatch {
        name: Some("Overridden".into()),
        ..UserPatch::default()
      },
    )];

    let merged = merge(&remote, &local);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "Overridden");
    // Fields the override does not set keep their remote values.
    assert_eq!(merged[0].username, "u-1");
    assert_eq!(merged[0].email, "1@example.com");
  }

  #[test]
  fn override_address_replaces_remote_address() {
    let mut remote = remote_user("1", "A");
    remote.address = Address {
      street: "Remote St".into(),
      city: "Remoteville".into(),
    };
    let local = vec![override_record(
      "1",
      UserPatch {
        address: Some(Address {
          street: "Local St".into(),
          city: String::new(),
        }),
        ..UserPatch::default()
      },
    )];

    let merged = merge(&[remote], &local);
    assert_eq!(merged[0].address.street, "Local St");
    assert_eq!(merged[0].address.city, "");
  }

  #[test]
  fn every_id_appears_exactly_once() {
    let remote = vec![remote_user("1", "A"), remote_user("2", "B")];
    let local = vec![
      override_record(
        "2",
        UserPatch {
          name: Some("B2".into()),
          ..UserPatch::default()
        },
      ),
      override_record(
        "3",
        UserPatch {
          name: Some("C".into()),
          ..UserPatch::default()
        },
      ),
    ];

    let merged = merge(&remote, &local);
    let mut ids: Vec<&str> = merged.iter().map(|u| u.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["1", "2", "3"]);
  }

  #[test]
  fn remote_order_then_local_order() {
    let remote = vec![remote_user("2", "B"), remote_user("1", "A")];
    let local = vec![
      override_record(
        "z",
        UserPatch {
          name: Some("Z".into()),
          ..UserPatch::default()
        },
      ),
      override_record(
        "a",
        UserPatch {
          name: Some("A-local".into()),
          ..UserPatch::default()
        },
      ),
    ];

    let merged = merge(&remote, &local);
    let ids: Vec<&str> = merged.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["2", "1", "z", "a"]);
  }
}
