//! Turns map-share links into structured addresses.
//!
//! A share link such as `https://maps.app.goo.gl/...` redirects to a
//! `.../maps/place/<place name>/@<lat>,<lng>,<zoom>z/...` URL. The place name
//! is a comma separated list, innermost component first.

use std::time::Duration;

use common::error::{AppError, Res};
use db::dtos::address::AddressWriteRequest;
use percent_encoding::percent_decode_str;
use reqwest::{Client, redirect::Policy};
use serde::Serialize;

const PLACE_PREFIX: &str = "/maps/place/";
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedAddress {
    pub address: String,
    pub street: Option<String>,
    pub hamlet: Option<String>,
    pub ward: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub position_url: String,
}

impl From<ResolvedAddress> for AddressWriteRequest {
    fn from(resolved: ResolvedAddress) -> Self {
        AddressWriteRequest {
            address: Some(resolved.address),
            street: resolved.street,
            hamlet: resolved.hamlet,
            ward: resolved.ward,
            district: resolved.district,
            province: resolved.province,
            latitude: resolved.latitude,
            longitude: resolved.longitude,
            position_url: Some(resolved.position_url),
        }
    }
}

/// Follows share links to their canonical place URL.
#[derive(Clone)]
pub struct AddressResolver {
    client: Client,
}

impl AddressResolver {
    pub fn new(timeout_secs: u64) -> Res<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    pub async fn resolve(&self, url: &str) -> Res<ResolvedAddress> {
        let response = self.client.get(url.trim()).send().await.map_err(|e| {
            log::warn!("Failed to resolve address url {}: {}", url, e);
            AppError::Invalid(format!("Unable to resolve address url {}", url))
        })?;

        let canonical = response.url().as_str().to_string();
        log::debug!("Address url {} resolved to {}", url, canonical);
        parse_place_url(&canonical)
    }
}

/// Parses a canonical place URL. Performs no I/O.
pub fn parse_place_url(url: &str) -> Res<ResolvedAddress> {
    let with_spaces = url.replace('+', " ");
    let decoded = percent_decode_str(&with_spaces).decode_utf8_lossy();

    let Some((_, rest)) = decoded.split_once(PLACE_PREFIX) else {
        return Err(AppError::Invalid(format!(
            "The address url {} is not a map place url",
            url
        )));
    };

    let (place, coords) = match rest.split_once("/@") {
        Some((place, coords)) => (place, Some(coords)),
        None => (rest.split('/').next().unwrap_or_default(), None),
    };
    let place = place.trim();
    if place.is_empty() {
        return Err(AppError::Invalid(format!(
            "The address url {} has no place name",
            url
        )));
    }

    let (latitude, longitude) = coords.map(parse_coordinates).unwrap_or((None, None));

    let mut parts: Vec<String> = place
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    // outermost first: province, district, ward, hamlet
    let province = parts.pop();
    let district = parts.pop();
    let ward = parts.pop();
    let hamlet = parts.pop();
    let street = (!parts.is_empty()).then(|| parts.join(", "));

    Ok(ResolvedAddress {
        address: place.to_string(),
        street,
        hamlet,
        ward,
        district,
        province,
        latitude,
        longitude,
        position_url: url.to_string(),
    })
}

fn parse_coordinates(segment: &str) -> (Option<f64>, Option<f64>) {
    let segment = segment.split('/').next().unwrap_or_default();
    let mut numbers = segment.split(',').map(|n| n.trim().parse::<f64>().ok());
    let latitude = numbers.next().flatten();
    let longitude = numbers.next().flatten();
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
        _ => (None, None),
    }
}
