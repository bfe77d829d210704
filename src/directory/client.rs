use async_trait::async_trait;
use color_eyre::eyre::eyre;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

use super::api_types::ApiUser;
use super::types::User;

/// Read-only view of the remote directory service.
///
/// The remote has no write endpoints the application uses; all writes
/// stay in the override store.
#[async_trait]
pub trait RemoteDirectory: Send + Sync {
  /// `GET /users`.
  async fn fetch_users(&self) -> Result<Vec<User>>;

  /// `GET /users/{id}`. 404 maps to [`Error::NotFound`].
  async fn fetch_user(&self, id: &str) -> Result<User>;
}

/// Directory API client wrapper
#[derive(Clone)]
pub struct DirectoryClient {
  http: reqwest::Client,
  base_url: Url,
}

impl DirectoryClient {
  pub fn new(config: &Config) -> color_eyre::Result<Self> {
    let base_url = Url::parse(&config.remote.base_url)
      .map_err(|e| eyre!("Invalid remote base URL {}: {}", config.remote.base_url, e))?;

    let http = reqwest::Client::builder()
      .user_agent(concat!("userctl/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
  }
}

#[async_trait]
impl RemoteDirectory for DirectoryClient {
  async fn fetch_users(&self) -> Result<Vec<User>> {
    let url = self.endpoint("users");
    debug!(%url, "fetching remote user list");

    let response = self.http.get(&url).send().await?.error_for_status()?;
    let users: Vec<ApiUser> = response.json().await?;

    Ok(users.into_iter().map(ApiUser::into_user).collect())
  }

  async fn fetch_user(&self, id: &str) -> Result<User> {
    let url = self.endpoint(&format!("users/{id}"));
    debug!(%url, "fetching remote user");

    let response = self.http.get(&url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
      return Err(Error::NotFound(id.to_string()));
    }

    let user: ApiUser = response.error_for_status()?.json().await?;
    Ok(user.into_user())
  }
}
