use super::{AddMovie, LibraryBackend, Movie, QualityProfile, RadarrError, RootFolder};
use crate::config::{Settings, RADARR_TIMEOUT_SECS};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP client for the Radarr v3 API
#[derive(Clone)]
pub struct RadarrClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl RadarrClient {
    /// Create a client for the server described by `settings`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self, RadarrError> {
        Self::with_base_url(settings.radarr_url(), settings.radarr_api_key.clone())
    }

    /// Create a client for an explicit base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, RadarrError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(RADARR_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3/{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, &self.api_key)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RadarrError> {
        debug!(path = path, "Radarr GET");
        let response = self
            .authorized(self.http.get(self.url(path)).query(query))
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Maps a non-success response to `RadarrError::Api`, keeping the body text.
async fn check_status(response: Response) -> Result<Response, RadarrError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = api_error_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string());
    warn!(status = status.as_u16(), "Radarr request rejected: {message}");
    Err(RadarrError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Radarr reports errors either as `{"message": ..}` or as a list of
/// validation failures with `errorMessage`.
fn api_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    let messages: Vec<&str> = value
        .as_array()?
        .iter()
        .filter_map(|item| item.get("errorMessage").and_then(Value::as_str))
        .collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

fn add_movie_body(request: &AddMovie) -> Result<Value, RadarrError> {
    let mut body = serde_json::to_value(&request.movie)?;
    if let Some(object) = body.as_object_mut() {
        object.remove("id");
        object.insert("qualityProfileId".into(), json!(request.quality_profile_id));
        object.insert("rootFolderPath".into(), json!(request.root_folder_path));
        object.insert("monitored".into(), json!(true));
        object.insert(
            "addOptions".into(),
            json!({ "searchForMovie": request.search }),
        );
    }
    Ok(body)
}

#[async_trait]
impl LibraryBackend for RadarrClient {
    async fn list_all(&self) -> Result<Vec<Movie>, RadarrError> {
        self.get_json("movie", &[]).await
    }

    async fn lookup(&self, query: String) -> Result<Vec<Movie>, RadarrError> {
        self.get_json("movie/lookup", &[("term", query.as_str())])
            .await
    }

    async fn bulk_delete(&self, ids: Vec<i64>, delete_files: bool) -> Result<(), RadarrError> {
        debug!(count = ids.len(), delete_files, "Radarr bulk delete");
        let body = json!({
            "movieIds": ids,
            "deleteFiles": delete_files,
            "addImportExclusion": false,
        });
        let response = self
            .authorized(self.http.delete(self.url("movie/editor")).json(&body))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, RadarrError> {
        self.get_json("qualityprofile", &[]).await
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, RadarrError> {
        self.get_json("rootfolder", &[]).await
    }

    async fn add_movie(&self, request: AddMovie) -> Result<Movie, RadarrError> {
        let body = add_movie_body(&request)?;
        let response = self
            .authorized(self.http.post(self.url("movie")).json(&body))
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Result<RadarrClient, RadarrError> {
        RadarrClient::with_base_url(server.uri(), "secret")
    }

    #[tokio::test]
    async fn test_list_all_sends_api_key() -> Result<(), RadarrError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie"))
            .and(header("X-Api-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "tmdbId": 603, "title": "The Matrix", "year": 1999},
                {"id": 2, "tmdbId": 949, "title": "Heat", "year": 1995}
            ])))
            .mount(&server)
            .await;

        let movies = client(&server)?.list_all().await?;
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].library_id(), Some(1));
        assert_eq!(movies[1].title, "Heat");
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_passes_term() -> Result<(), RadarrError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie/lookup"))
            .and(query_param("term", "matrix"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"tmdbId": 603, "title": "The Matrix", "year": 1999}
            ])))
            .mount(&server)
            .await;

        let movies = client(&server)?.lookup("matrix".to_string()).await?;
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].library_id(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_delete_body() -> Result<(), RadarrError> {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v3/movie/editor"))
            .and(body_partial_json(json!({
                "movieIds": [1, 2],
                "deleteFiles": true,
                "addImportExclusion": false
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)?.bulk_delete(vec![1, 2], true).await
    }

    #[tokio::test]
    async fn test_api_error_surfaces_message() -> Result<(), RadarrError> {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v3/movie/editor"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "database is locked"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)?
            .bulk_delete(vec![1], true)
            .await
            .err()
            .map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Radarr returned 500: database is locked")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_add_movie_body() -> Result<(), RadarrError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/movie"))
            .and(body_partial_json(json!({
                "tmdbId": 603,
                "qualityProfileId": 4,
                "rootFolderPath": "/movies",
                "monitored": true,
                "addOptions": {"searchForMovie": true},
                "images": []
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!(
                {"id": 12, "tmdbId": 603, "title": "The Matrix", "year": 1999}
            )))
            .expect(1)
            .mount(&server)
            .await;

        let movie: Movie = serde_json::from_value(json!({
            "tmdbId": 603, "title": "The Matrix", "year": 1999, "images": []
        }))?;
        let added = client(&server)?
            .add_movie(AddMovie {
                movie,
                quality_profile_id: 4,
                root_folder_path: "/movies".to_string(),
                search: true,
            })
            .await?;
        assert_eq!(added.library_id(), Some(12));
        Ok(())
    }

    #[test]
    fn test_validation_error_list_is_joined() {
        let body = r#"[{"errorMessage":"Path is required"},{"errorMessage":"Profile missing"}]"#;
        assert_eq!(
            api_error_message(body).as_deref(),
            Some("Path is required; Profile missing")
        );
        assert_eq!(api_error_message("not json"), None);
    }
}
