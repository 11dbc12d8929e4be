use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use taskpro_core::bearer_header_value;
use taskpro_domain::{PermissionCatalog, Role, TaskId, TaskStats, UserId, UserIdentity};
use tracing::{debug, warn};
use url::Url;

use crate::wire::{ErrorBody, LoginBody, RegisterBody, RoleBody};
use crate::{
    AuthResponse, ClientError, ClientResult, CreateTaskRequest, SessionStore, TaskListParams,
    TaskResponse,
};

/// Per-request timeout.
pub const API_TIMEOUT: Duration = Duration::from_secs(15);

/// Typed client for the TaskPro HTTP API.
///
/// Attaches the session's bearer token to every request. Rejected requests
/// leave the session untouched; only [`ApiClient::logout`] clears it.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(API_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Returns the session this client reads its token from.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Registers an account and stores the returned session.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let request = self
            .http
            .post(self.endpoint("api/auth/register")?)
            .json(&RegisterBody {
                name,
                email,
                password,
            });
        let response: AuthResponse = self.send(request).await?;
        self.session
            .set_session(response.token.clone(), response.user.clone())?;

        Ok(response)
    }

    /// Logs in and stores the returned session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let request = self
            .http
            .post(self.endpoint("api/auth/login")?)
            .json(&LoginBody { email, password });
        let response: AuthResponse = self.send(request).await?;
        self.session
            .set_session(response.token.clone(), response.user.clone())?;

        Ok(response)
    }

    /// Discards the local session.
    pub fn logout(&self) -> ClientResult<()> {
        self.session.clear_session()
    }

    /// Returns the identity behind the current token.
    pub async fn me(&self) -> ClientResult<UserIdentity> {
        self.send(self.http.get(self.endpoint("api/auth/me")?)).await
    }

    /// Fetches the role to permission catalog the API enforces.
    pub async fn permissions(&self) -> ClientResult<PermissionCatalog> {
        self.send(self.http.get(self.endpoint("api/auth/permissions")?))
            .await
    }

    /// Lists tasks visible to the current identity.
    pub async fn list_tasks(&self, params: &TaskListParams) -> ClientResult<Vec<TaskResponse>> {
        let mut url = self.endpoint("api/tasks")?;
        {
            let pairs = params.pairs();
            if !pairs.is_empty() {
                let mut query = url.query_pairs_mut();
                for (key, value) in &pairs {
                    query.append_pair(key, value);
                }
            }
        }

        self.send(self.http.get(url)).await
    }

    /// Creates a task.
    pub async fn create_task(&self, task: &CreateTaskRequest) -> ClientResult<TaskResponse> {
        self.send(self.http.post(self.endpoint("api/tasks")?).json(task))
            .await
    }

    /// Deletes a task.
    pub async fn delete_task(&self, task_id: TaskId) -> ClientResult<()> {
        let url = self.endpoint(&format!("api/tasks/{task_id}"))?;
        self.send_empty(self.http.delete(url)).await
    }

    /// Returns dashboard statistics.
    pub async fn task_stats(&self) -> ClientResult<TaskStats> {
        self.send(self.http.get(self.endpoint("api/tasks/stats")?))
            .await
    }

    /// Lists every account.
    pub async fn list_users(&self) -> ClientResult<Vec<UserIdentity>> {
        self.send(self.http.get(self.endpoint("api/users")?)).await
    }

    /// Changes another account's role.
    pub async fn change_role(&self, user_id: UserId, role: Role) -> ClientResult<UserIdentity> {
        let url = self.endpoint(&format!("api/users/{user_id}/role"))?;
        self.send(self.http.put(url).json(&RoleBody { role })).await
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.current_token() {
            Some(token) => request.header(AUTHORIZATION, bearer_header_value(&token)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        Ok(response.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        Ok(())
    }

    async fn api_error(status: StatusCode, response: reqwest::Response) -> ClientError {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(error) => {
                debug!(error = %error, "error response without message body");
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            }
        };

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(status = status.as_u16(), %message, "request rejected by api");
        }

        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
