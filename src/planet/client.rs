//! HTTP client for the map service
//!
//! Only the fields the robot service consumes are modelled. Transport
//! failures become `MapUnavailable`; nothing is retried here.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use crate::core::config::ServiceConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::PlanetId;
use crate::planet::map::{PlanetMap, Route};
use crate::planet::{Planet, PlanetType};
use crate::robot::resource::ResourceType;

/// Async client for the map service REST API
pub struct MapClient {
    client: Client,
    base_url: String,
}

impl MapClient {
    /// Create a new client with explicit configuration
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GameError::MapUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the service configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(
            config.map_service_url.clone(),
            Duration::from_millis(config.map_timeout_ms),
        )
    }

    fn planet_url(&self, id: PlanetId) -> String {
        format!("{}/planets/{}", self.base_url, id)
    }

    async fn fetch_planet(&self, id: PlanetId) -> Result<PlanetDto> {
        let response = self
            .client
            .get(self.planet_url(id))
            .send()
            .await
            .map_err(|e| GameError::MapUnavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GameError::UnknownPlanet(id));
        }
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GameError::MapUnavailable(format!("API error: {}", error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| GameError::MapUnavailable(e.to_string()))
    }

    async fn fetch_route(&self, from: PlanetId, to: PlanetId) -> Result<Route> {
        let origin = self.fetch_planet(from).await?;
        if !origin.neighbours.iter().any(|n| n.planet_id == to.0) {
            return Err(GameError::TargetOutOfReach { from, to });
        }
        let destination = self.fetch_planet(to).await?;
        tracing::debug!(%from, %to, cost = destination.movement_difficulty, "route resolved");
        Ok(Route {
            from,
            cost: destination.movement_difficulty,
            to: destination.into_planet(),
        })
    }

    async fn post_mining(&self, planet: PlanetId, amount: u32) -> Result<u32> {
        let response = self
            .client
            .post(format!("{}/minings", self.planet_url(planet)))
            .json(&MiningRequest {
                amount_requested: amount,
            })
            .send()
            .await
            .map_err(|e| GameError::MapUnavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GameError::UnknownPlanet(planet));
        }
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GameError::MapUnavailable(format!("API error: {}", error_text)));
        }

        let mined: MiningResponse = response
            .json()
            .await
            .map_err(|e| GameError::MapUnavailable(e.to_string()))?;
        Ok(mined.amount_mined)
    }
}

impl PlanetMap for MapClient {
    fn route(&self, from: PlanetId, to: PlanetId) -> impl Future<Output = Result<Route>> + Send {
        self.fetch_route(from, to)
    }

    fn mine(
        &self,
        planet: PlanetId,
        resource: ResourceType,
        amount: u32,
    ) -> impl Future<Output = Result<u32>> + Send {
        async move {
            let info = self.fetch_planet(planet).await?;
            if info.resource.map(|r| r.resource_type) != Some(resource) {
                return Err(GameError::NoResourceOnPlanet(planet));
            }
            self.post_mining(planet, amount).await
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanetDto {
    planet_id: Uuid,
    movement_difficulty: u32,
    #[serde(default)]
    planet_type: PlanetType,
    #[serde(default)]
    resource: Option<DepositDto>,
    #[serde(default)]
    neighbours: Vec<NeighbourDto>,
}

impl PlanetDto {
    fn into_planet(self) -> Planet {
        let mut planet = Planet::new(PlanetId(self.planet_id)).with_type(self.planet_type);
        planet.resource = self.resource.map(|r| r.resource_type);
        planet
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositDto {
    resource_type: ResourceType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NeighbourDto {
    planet_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MiningRequest {
    amount_requested: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MiningResponse {
    amount_mined: u32,
}
