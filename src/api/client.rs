use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ApiError, OneOrMany};
use crate::models::{BackendUser, ProgramDocument};

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Addresses one exercise inside a program for the reps write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseRef<'a> {
    pub program_id: &'a str,
    pub week: u32,
    pub day: u32,
    pub exercise_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoUpload {
    #[serde(rename = "downloadURL")]
    pub download_url: String,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    uid: String,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActualRepsBody<'a> {
    actual_reps: &'a [u32],
}

/// Thin async wrapper over the backend endpoints the screens consume.
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Fails when the HTTP client can't be built, e.g. no TLS backend.
    pub fn new(config: BackendConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signs in against the backend's identity provider and returns the
    /// provider's user id.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, ApiError> {
        tracing::debug!("Signing in {}", email);
        let response = self
            .client
            .post(self.url("/auth/signin"))
            .json(&CredentialsBody { email, password })
            .send()
            .await?;
        let body: SignInResponse = decode(response).await?;
        Ok(body.uid)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), ApiError> {
        tracing::debug!("Signing up {}", email);
        let response = self
            .client
            .post(self.url("/auth/signup"))
            .json(&CredentialsBody { email, password })
            .send()
            .await?;
        ensure_success(response).await
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let response = self.client.post(self.url("/auth/signout")).send().await?;
        ensure_success(response).await
    }

    pub async fn find_user_by_firebase_uid(&self, uid: &str) -> Result<BackendUser, ApiError> {
        let response = self
            .client
            .get(self.url("/users/firebase"))
            .query(&[("firebaseUID", uid)])
            .send()
            .await?;
        decode(response).await
    }

    /// Every program assigned to the client, completed or not.
    pub async fn list_programs(&self, client_id: &str) -> Result<Vec<ProgramDocument>, ApiError> {
        let response = self
            .client
            .get(self.url("/workouts"))
            .query(&[("clientId", client_id)])
            .send()
            .await?;
        let programs: OneOrMany<ProgramDocument> = decode(response).await?;
        Ok(programs.into_vec())
    }

    pub async fn list_uncompleted_programs(
        &self,
        user_id: &str,
    ) -> Result<Vec<ProgramDocument>, ApiError> {
        let path = format!("/workouts/uncompleted/{}", urlencoding::encode(user_id));
        let response = self.client.get(self.url(&path)).send().await?;
        let programs: OneOrMany<ProgramDocument> = decode(response).await?;
        Ok(programs.into_vec())
    }

    /// The program the client is working through: the first uncompleted one.
    pub async fn current_program(
        &self,
        user_id: &str,
    ) -> Result<Option<ProgramDocument>, ApiError> {
        Ok(self
            .list_uncompleted_programs(user_id)
            .await?
            .into_iter()
            .next())
    }

    pub async fn log_actual_reps(
        &self,
        target: &ExerciseRef<'_>,
        actual_reps: &[u32],
    ) -> Result<(), ApiError> {
        let path = format!(
            "/workouts/{}/weeks/{}/days/{}/exercises/{}",
            urlencoding::encode(target.program_id),
            target.week,
            target.day,
            urlencoding::encode(target.exercise_id),
        );
        tracing::info!(
            "Logging reps {:?} for exercise {} (week {}, day {})",
            actual_reps,
            target.exercise_id,
            target.week,
            target.day
        );

        let response = self
            .client
            .put(self.url(&path))
            .json(&ActualRepsBody { actual_reps })
            .send()
            .await?;
        ensure_success(response).await
    }

    pub async fn upload_video(
        &self,
        user_id: &str,
        exercise_id: &str,
        file_name: String,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<VideoUpload, ApiError> {
        tracing::info!(
            "Uploading {} bytes of video for exercise {}",
            data.len(),
            exercise_id
        );
        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/videos/uploadFile"))
            .query(&[("userId", user_id), ("exerciseId", exercise_id)])
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }
}

async fn ensure_success(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let message = response.text().await.unwrap_or_default();
    tracing::warn!("Backend request failed with {}: {}", status, message);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::warn!("Backend request failed with {}: {}", status, text);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
