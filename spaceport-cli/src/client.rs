//! HTTP client for the Spaceport REST API.

use crate::CliResult;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spaceport_core::{Ship, ShipDraft, ShipOrder, ShipType};

/// Default base URL of a locally running server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Query string accepted by the listing and count endpoints.
///
/// `None` fields are left out of the query string.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipQuery {
    pub name: Option<String>,
    pub planet: Option<String>,
    pub ship_type: Option<ShipType>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    #[serde(rename = "isUsed")]
    pub used: Option<bool>,
    pub min_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub min_crew_size: Option<i32>,
    pub max_crew_size: Option<i32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub order: Option<ShipOrder>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin wrapper over the `/rest/ships` endpoints.
pub struct SpaceportClient {
    client: Client,
    base_url: String,
}

impl SpaceportClient {
    /// Build a client for the given server.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let base_url = normalize_server_url(server_url)?;
        let client = Client::builder().user_agent("spaceport-cli").build()?;
        Ok(Self { client, base_url })
    }

    fn ships_url(&self) -> String {
        format!("{}/rest/ships", self.base_url)
    }

    fn ship_url(&self, id: i64) -> String {
        format!("{}/rest/ships/{id}", self.base_url)
    }

    /// One page of ships matching the query.
    pub async fn list(&self, query: &ShipQuery) -> CliResult<Vec<Ship>> {
        let response = self.client.get(self.ships_url()).query(query).send().await?;
        read_json(response).await
    }

    /// Number of ships matching the query filters.
    pub async fn count(&self, query: &ShipQuery) -> CliResult<usize> {
        let url = format!("{}/count", self.ships_url());
        let response = self.client.get(url).query(query).send().await?;
        read_json(response).await
    }

    /// Fetch one ship.
    pub async fn get(&self, id: i64) -> CliResult<Ship> {
        let response = self.client.get(self.ship_url(id)).send().await?;
        read_json(response).await
    }

    /// Create a ship.
    pub async fn create(&self, draft: &ShipDraft) -> CliResult<Ship> {
        let response = self.client.post(self.ships_url()).json(draft).send().await?;
        read_json(response).await
    }

    /// Apply a partial update.
    pub async fn update(&self, id: i64, patch: &ShipDraft) -> CliResult<Ship> {
        let response = self.client.post(self.ship_url(id)).json(patch).send().await?;
        read_json(response).await
    }

    /// Delete one ship.
    pub async fn delete(&self, id: i64) -> CliResult<()> {
        let response = self.client.delete(self.ship_url(id)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Trim whitespace and trailing slashes from a server URL.
pub fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> CliResult<T> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

async fn ensure_success(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    if message.is_empty() {
        return Err(format!("server returned {status}").into());
    }
    Err(format!("server returned {status}: {message}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn ship_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "planet": "Mars",
            "shipType": "MILITARY",
            "prodDate": Utc.with_ymd_and_hms(2990, 1, 1, 0, 0, 0).unwrap().timestamp_millis(),
            "isUsed": false,
            "speed": 0.5,
            "crewSize": 10,
            "rating": 1.33
        })
    }

    #[test]
    fn normalize_server_url_trims_trailing_slash() {
        let url = normalize_server_url(" http://localhost:8080/ ").expect("url");
        assert_eq!(url, "http://localhost:8080");
    }

    #[test]
    fn normalize_server_url_rejects_empty() {
        let err = normalize_server_url("   ").unwrap_err();
        assert!(err.to_string().contains("server url"));
    }

    #[tokio::test]
    async fn list_sends_query_parameters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/ships")
                    .query_param("name", "Or")
                    .query_param("shipType", "MILITARY")
                    .query_param("isUsed", "false")
                    .query_param("order", "RATING")
                    .query_param("pageSize", "5");
                then.status(200).json_body(json!([ship_json(3, "Orion")]));
            })
            .await;

        let client = SpaceportClient::new(&server.base_url()).expect("client");
        let query = ShipQuery {
            name: Some("Or".to_string()),
            ship_type: Some(ShipType::Military),
            used: Some(false),
            order: Some(ShipOrder::Rating),
            page_size: Some(5),
            ..ShipQuery::default()
        };
        let ships = client.list(&query).await.expect("list");

        mock.assert_async().await;
        assert_eq!(ships.len(), 1);
        assert_eq!(ships[0].name, "Orion");
        assert_eq!(ships[0].ship_type, ShipType::Military);
    }

    #[tokio::test]
    async fn count_reads_plain_number() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/ships/count")
                    .query_param("minCrewSize", "3");
                then.status(200).body("4");
            })
            .await;

        let client = SpaceportClient::new(&server.base_url()).expect("client");
        let query = ShipQuery {
            min_crew_size: Some(3),
            ..ShipQuery::default()
        };
        assert_eq!(client.count(&query).await.expect("count"), 4);
    }

    #[tokio::test]
    async fn create_posts_draft_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/ships")
                    .json_body(json!({ "name": "Orion", "speed": 0.5 }));
                then.status(200).json_body(ship_json(1, "Orion"));
            })
            .await;

        let client = SpaceportClient::new(&server.base_url()).expect("client");
        let draft = ShipDraft {
            name: Some("Orion".to_string()),
            speed: Some(0.5),
            ..ShipDraft::default()
        };
        let ship = client.create(&draft).await.expect("create");

        mock.assert_async().await;
        assert_eq!(ship.id, 1);
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/rest/ships/2");
                then.status(400)
                    .json_body(json!({ "message": "invalid ship field: crewSize" }));
            })
            .await;

        let client = SpaceportClient::new(&server.base_url()).expect("client");
        let err = client
            .update(2, &ShipDraft::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "server returned 400 Bad Request: invalid ship field: crewSize"
        );
    }

    #[tokio::test]
    async fn delete_accepts_empty_success_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/ships/9");
                then.status(200);
            })
            .await;

        let client = SpaceportClient::new(&server.base_url()).expect("client");
        client.delete(9).await.expect("delete");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_ship_reports_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/ships/5");
                then.status(404).json_body(json!({ "message": "ship 5 not found" }));
            })
            .await;

        let client = SpaceportClient::new(&server.base_url()).expect("client");
        let err = client.get(5).await.unwrap_err();
        assert!(err.to_string().contains("ship 5 not found"));
    }
}
