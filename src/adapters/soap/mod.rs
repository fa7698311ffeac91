pub mod decode;
pub mod envelope;

use crate::config::LookupConfig;
use crate::domain::model::{City, Point, Region};
use crate::domain::ports::RemoteLookup;
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub use decode::decode_items;

/// Talks to the GeisPoint SOAP endpoint. Each method is one POST.
#[derive(Debug, Clone)]
pub struct SoapLookupClient {
    client: Client,
    endpoint: String,
    namespace: String,
}

impl SoapLookupClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            namespace: config.namespace.clone(),
        })
    }

    /// Performs the call and returns the JSON payload carried in the envelope.
    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<String> {
        let body = envelope::request(&self.namespace, method, params);

        tracing::debug!("Calling {} at {}", method, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}#{}\"", self.namespace, method))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("{} response status: {}", method, status);
        let text = response.text().await?;

        if !status.is_success() {
            // Faults usually arrive with a 500 status and carry the useful message.
            if let Some(fault) = envelope::fault_string(&text) {
                return Err(LookupError::remote(format!(
                    "{} failed with SOAP fault: {}",
                    method, fault
                )));
            }
            return Err(LookupError::remote(format!(
                "{} failed with HTTP status {}",
                method, status
            )));
        }

        envelope::payload(&text)
    }
}

#[async_trait]
impl RemoteLookup for SoapLookupClient {
    async fn fetch_regions(&self, country: &str) -> Result<Vec<Region>> {
        let payload = self.call("getRegions", &[("country", country)]).await?;
        decode_items(&payload)
    }

    async fn fetch_cities(&self, country: &str, region_id: i64) -> Result<Vec<City>> {
        let region = region_id.to_string();
        let payload = self
            .call("getCities", &[("country", country), ("id_region", &region)])
            .await?;
        decode_items(&payload)
    }

    async fn fetch_point_detail(&self, gpid: &str) -> Result<Point> {
        let payload = self.call("getGPDetail", &[("id_gp", gpid)]).await?;
        let mut points = decode_points(&payload)?;

        if points.len() != 1 {
            tracing::debug!("getGPDetail({}) returned {} points", gpid, points.len());
            return Err(LookupError::NotFound {
                message: format!("expected exactly one point for {}, got {}", gpid, points.len()),
            });
        }

        Ok(points.remove(0))
    }

    async fn search(
        &self,
        zip: Option<&str>,
        city: Option<&str>,
        gpid: Option<&str>,
    ) -> Result<Vec<Point>> {
        let payload = self
            .call(
                "searchGP",
                &[
                    ("zipcode", zip.unwrap_or("")),
                    ("city", city.unwrap_or("")),
                    ("id_gp", gpid.unwrap_or("")),
                ],
            )
            .await?;
        decode_points(&payload)
    }
}

fn decode_points(payload: &str) -> Result<Vec<Point>> {
    let mut points: Vec<Point> = decode_items(payload)?;
    points.retain(Point::has_identity);
    Ok(points)
}
