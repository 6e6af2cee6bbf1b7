use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "https://api.particle.io";

#[derive(Clone)]
pub struct ParticleClient {
    base_url: String,
    access_token: String,
    http: Client,
}

impl ParticleClient {
    pub fn new(base_url: String, access_token: String) -> Self {
        Self {
            base_url,
            access_token,
            http: Client::new(),
        }
    }

    /// Join `segments` onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| AppError::Config(format!("Invalid API URL '{}': {}", self.base_url, err)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("API URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
pub struct LedgerInstanceResponse {
    pub instance: LedgerInstance,
}

#[derive(Debug, Deserialize)]
pub struct LedgerInstance {
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PublishResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ParticleClient {
    /// Read one ledger instance. A missing instance or null data is `None`.
    pub async fn fetch_ledger_data(
        &self,
        ledger_name: &str,
        scope_value: &str,
    ) -> Result<Option<Value>, AppError> {
        let url = self.endpoint(&["v1", "ledgers", ledger_name, "instances", scope_value])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;

        let body = response
            .json::<LedgerInstanceResponse>()
            .await
            .map_err(|err| AppError::Parse(err.to_string()))?;

        Ok(body.instance.data.filter(|data| !data.is_null()))
    }

    /// Publish a private event under a product.
    pub async fn publish_product_event(
        &self,
        product_id: &str,
        event_name: &str,
        data: &str,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&["v1", "products", product_id, "events"])?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .form(&[("name", event_name), ("data", data), ("private", "true")])
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;
        let response = check_status(response)?;

        let body = response
            .json::<PublishResponse>()
            .await
            .map_err(|err| AppError::Parse(err.to_string()))?;

        if !body.ok {
            return Err(AppError::Rejected(
                body.error.unwrap_or_else(|| "publish returned ok=false".into()),
            ));
        }

        Ok(())
    }
}

fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AppError::Auth(format!("Particle returned HTTP {}", status)));
    }
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return Err(AppError::Unavailable(format!("Particle returned HTTP {}", status)));
    }
    if !status.is_success() {
        return Err(AppError::Network(format!("Particle returned HTTP {}", status)));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_string_contains, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn client_for(server: &MockServer) -> ParticleClient {
        ParticleClient::new(server.uri(), "test-token".to_string())
    }

    #[tokio::test]
    async fn fetch_ledger_data_returns_instance_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ledgers/security-status/instances/muon_0"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "instance": {
                    "name": "security-status",
                    "data": { "aqs": "High" },
                    "updated_at": "2024-05-01T12:00:00Z"
                }
            })))
            .mount(&server)
            .await;

        let data = client_for(&server)
            .await
            .fetch_ledger_data("security-status", "muon_0")
            .await
            .unwrap();

        assert_eq!(data, Some(json!({ "aqs": "High" })));
    }

    #[tokio::test]
    async fn fetch_ledger_data_maps_404_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let data = client_for(&server)
            .await
            .fetch_ledger_data("security-status", "muon_0")
            .await
            .unwrap();

        assert!(data.is_none());
    }

    #[tokio::test]
    async fn fetch_ledger_data_maps_null_data_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "instance": { "data": null } })),
            )
            .mount(&server)
            .await;

        let data = client_for(&server)
            .await
            .fetch_ledger_data("security-status", "muon_0")
            .await
            .unwrap();

        assert!(data.is_none());
    }

    #[tokio::test]
    async fn fetch_ledger_data_reports_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .fetch_ledger_data("security-status", "muon_0")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn fetch_ledger_data_reports_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .fetch_ledger_data("security-status", "muon_0")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Parse(_)));
    }

    #[tokio::test]
    async fn publish_posts_form_encoded_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/products/muon/events"))
            .and(body_string_contains("name=SEC_ALERT"))
            .and(body_string_contains("private=true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .await
            .publish_product_event("muon", "SEC_ALERT", "Security alert")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn publish_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": false, "error": "quota exceeded" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .publish_product_event("muon", "SEC_ALERT", "{}")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Rejected(msg) if msg == "quota exceeded"));
    }

    #[tokio::test]
    async fn publish_reports_server_error_as_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .publish_product_event("muon", "SEC_ALERT", "{}")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Network(_)));
    }

    #[tokio::test]
    async fn fetch_ledger_data_reports_unavailable_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .fetch_ledger_data("security-status", "muon_0")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unavailable(_)));
    }

    #[tokio::test]
    async fn path_segments_are_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ledgers/security-status/instances/muon%2F0%3Fx=1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "instance": { "data": { "pir": "Detected" } } })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/products/mu%2Fon/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let data = client
            .fetch_ledger_data("security-status", "muon/0?x=1")
            .await
            .unwrap();
        client
            .publish_product_event("mu/on", "SEC_ALERT", "{}")
            .await
            .unwrap();

        assert_eq!(data, Some(json!({ "pir": "Detected" })));
    }

    #[tokio::test]
    async fn invalid_base_url_is_a_config_error() {
        let client = ParticleClient::new("not a url".to_string(), "tok".to_string());

        let err = client
            .fetch_ledger_data("security-status", "muon_0")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }
}
