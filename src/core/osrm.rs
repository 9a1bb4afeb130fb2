//! OSRM-compatible routing client
//!
//! Talks to the `route` service of an OSRM server (or anything that speaks
//! its HTTP API) and converts its `[lon, lat]` GeoJSON geometry to the
//! engine's (lat, lon) order.

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::core::config::RoutingConfig;
use crate::core::geo::{Coordinate, MIN_ROUTE_WAYPOINTS};
use crate::core::provider::{Resolution, RoutingProvider, GLOBAL_CLIENT};
use crate::core::selection::RouteFailure;

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    geometry: Geometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

/// HTTP routing provider for OSRM's `/route/v1` endpoint
#[derive(Debug, Clone, Default)]
pub struct OsrmProvider {
    config: RoutingConfig,
}

impl OsrmProvider {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Request URL for a waypoint list (OSRM wants `lon,lat` pairs)
    pub fn route_url(&self, waypoints: &[Coordinate]) -> String {
        let coords = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lon, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl RoutingProvider for OsrmProvider {
    fn resolve_path(&self, waypoints: Vec<Coordinate>) -> BoxFuture<'static, Resolution> {
        let url = self.route_url(&waypoints);
        async move { fetch_route(&url).await }.boxed()
    }
}

async fn fetch_route(url: &str) -> Resolution {
    debug!("Requesting route: {url}");

    let response = GLOBAL_CLIENT.get(url).send().await.map_err(|e| {
        warn!("Route request failed: {e}");
        if e.is_timeout() {
            RouteFailure::Timeout
        } else {
            RouteFailure::Transport
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!("Routing provider returned {status}");
        return Err(RouteFailure::BadStatus(status.as_u16()));
    }

    let body: RouteResponse = response.json().await.map_err(|e| {
        warn!("Could not decode routing response: {e}");
        RouteFailure::Malformed
    })?;

    parse_route(body)
}

fn parse_route(body: RouteResponse) -> Resolution {
    if body.code != "Ok" {
        warn!(
            "Routing provider answered '{}': {}",
            body.code,
            body.message.as_deref().unwrap_or("no message")
        );
        return Err(RouteFailure::NoRoute);
    }

    let route = body.routes.into_iter().next().ok_or(RouteFailure::NoRoute)?;
    if route.geometry.coordinates.len() < MIN_ROUTE_WAYPOINTS {
        warn!("Routing provider returned a degenerate geometry");
        return Err(RouteFailure::NoRoute);
    }

    info!(
        "Route resolved: {} points, {:.0} m, {:.0} s",
        route.geometry.coordinates.len(),
        route.distance,
        route.duration
    );

    Ok(route
        .geometry
        .coordinates
        .into_iter()
        .map(Coordinate::from_lon_lat)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OsrmProvider {
        OsrmProvider::new(RoutingConfig {
            base_url: server.uri(),
            profile: "driving".to_string(),
        })
    }

    fn waypoints() -> Vec<Coordinate> {
        vec![
            Coordinate::new(-3.733, -40.991),
            Coordinate::new(-3.734, -40.993),
        ]
    }

    #[test]
    fn test_route_url_uses_lon_lat_order() {
        let provider = OsrmProvider::new(RoutingConfig {
            base_url: "http://osrm.local/".to_string(),
            profile: "foot".to_string(),
        });
        assert_eq!(
            provider.route_url(&waypoints()),
            "http://osrm.local/route/v1/foot/-40.991,-3.733;-40.993,-3.734?overview=full&geometries=geojson"
        );
    }

    #[tokio::test]
    async fn test_resolve_path_flips_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/route/v1/driving/-40.991,-3.733;-40.993,-3.734"))
            .and(query_param("geometries", "geojson"))
            .and(query_param("overview", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "Ok",
                "routes": [{
                    "distance": 180.4,
                    "duration": 31.2,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-40.991, -3.733], [-40.992, -3.7335]]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let path = provider_for(&server)
            .resolve_path(waypoints())
            .await
            .expect("route should resolve");

        assert_eq!(
            path,
            vec![
                Coordinate::new(-3.733, -40.991),
                Coordinate::new(-3.7335, -40.992)
            ]
        );
    }

    #[tokio::test]
    async fn test_provider_error_code_is_no_route() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "NoRoute",
                "message": "Impossible route between points",
                "routes": []
            })))
            .mount(&server)
            .await;

        let result = provider_for(&server).resolve_path(waypoints()).await;
        assert_eq!(result, Err(RouteFailure::NoRoute));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = provider_for(&server).resolve_path(waypoints()).await;
        assert_eq!(result, Err(RouteFailure::BadStatus(503)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = provider_for(&server).resolve_path(waypoints()).await;
        assert_eq!(result, Err(RouteFailure::Malformed));
    }

    #[tokio::test]
    async fn test_degenerate_geometry_is_no_route() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "Ok",
                "routes": [{ "geometry": { "coordinates": [[-40.991, -3.733]] } }]
            })))
            .mount(&server)
            .await;

        let result = provider_for(&server).resolve_path(waypoints()).await;
        assert_eq!(result, Err(RouteFailure::NoRoute));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_failure() {
        // Grab a free port, then release it so nothing is listening there
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let provider = OsrmProvider::new(RoutingConfig {
            base_url: format!("http://{addr}"),
            profile: "driving".to_string(),
        });

        let result = provider.resolve_path(waypoints()).await;
        assert!(
            matches!(result, Err(RouteFailure::Transport) | Err(RouteFailure::Timeout)),
            "unexpected result: {result:?}"
        );
    }
}
