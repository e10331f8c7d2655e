//! Servicio de rutas
//!
//! Calcula rutas entre dos puntos para la simulación. Si hay un proveedor
//! externo configurado (OSRM) se intenta primero; ante cualquier fallo se usa
//! una línea recta interpolada de 11 puntos. `get_route` nunca falla.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::route::Route;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::GeoPoint;

/// Segmentos de la ruta en línea recta (11 puntos)
pub const STRAIGHT_LINE_SEGMENTS: usize = 10;

/// Velocidad asumida para estimar la duración (~50 km/h)
pub const ASSUMED_SPEED_M_PER_S: f64 = 13.89;

/// Proveedor de rutas externo
#[async_trait]
pub trait RouteProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn route(&self, start: GeoPoint, end: GeoPoint) -> AppResult<Route>;
}

/// Ruta en línea recta entre `start` y `end`
pub fn straight_line_route(start: GeoPoint, end: GeoPoint) -> Route {
    let points = (0..=STRAIGHT_LINE_SEGMENTS)
        .map(|i| start.lerp(&end, i as f64 / STRAIGHT_LINE_SEGMENTS as f64))
        .collect();

    let distance = start.distance_km(&end) * 1000.0;
    Route {
        points,
        distance,
        duration: distance / ASSUMED_SPEED_M_PER_S,
    }
}

/// Servicio de rutas con fallback determinista
#[derive(Clone, Default)]
pub struct RoutingService {
    provider: Option<Arc<dyn RouteProvider>>,
}

impl RoutingService {
    /// Solo línea recta
    pub fn straight_line() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: Arc<dyn RouteProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub async fn get_route(&self, start: GeoPoint, end: GeoPoint) -> Route {
        if let Some(provider) = &self.provider {
            match provider.route(start, end).await {
                Ok(route) if !route.is_empty() => {
                    tracing::debug!(
                        provider = provider.name(),
                        points = route.len(),
                        "🗺️ Ruta obtenida del proveedor"
                    );
                    return route;
                }
                Ok(_) => {
                    tracing::warn!(provider = provider.name(), "⚠️ Ruta vacía, usando línea recta");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "⚠️ Error de routing, usando línea recta");
                }
            }
        }

        straight_line_route(start, end)
    }
}

/// Proveedor sobre la API HTTP de OSRM
pub struct OsrmRouteProvider {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<Vec<f64>>, // [lng, lat]
}

impl OsrmRouteProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build routing client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, start: GeoPoint, end: GeoPoint) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.endpoint, start.lng, start.lat, end.lng, end.lat
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmRouteProvider {
    fn name(&self) -> &str {
        "osrm"
    }

    async fn route(&self, start: GeoPoint, end: GeoPoint) -> AppResult<Route> {
        let response = self.client.get(self.route_url(start, end)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!("OSRM returned status {}", status)));
        }

        let body: OsrmResponse = response.json().await?;
        if body.code != "Ok" {
            return Err(AppError::ExternalApi(format!("OSRM returned code {}", body.code)));
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalApi("OSRM returned no routes".to_string()))?;

        let points: Vec<GeoPoint> = route
            .geometry
            .coordinates
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| GeoPoint::new(c[1], c[0]))
            .collect();

        if points.is_empty() {
            return Err(AppError::ExternalApi("OSRM route has no geometry".to_string()));
        }

        Ok(Route {
            points,
            distance: route.distance,
            duration: route.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl RouteProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn route(&self, _start: GeoPoint, _end: GeoPoint) -> AppResult<Route> {
            Err(AppError::ExternalApi("connection refused".to_string()))
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl RouteProvider for EmptyProvider {
        fn name(&self) -> &str {
            "empty"
        }

        async fn route(&self, _start: GeoPoint, _end: GeoPoint) -> AppResult<Route> {
            Ok(Route {
                points: Vec::new(),
                distance: 0.0,
                duration: 0.0,
            })
        }
    }

    struct FixedProvider;

    #[async_trait]
    impl RouteProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn route(&self, start: GeoPoint, end: GeoPoint) -> AppResult<Route> {
            Ok(Route {
                points: vec![start, GeoPoint::new(start.lat, end.lng), end],
                distance: 1234.0,
                duration: 99.0,
            })
        }
    }

    #[test]
    fn test_straight_line_has_eleven_points() {
        let start = GeoPoint::new(37.7749, -122.4194);
        let end = GeoPoint::new(37.7849, -122.4094);
        let route = straight_line_route(start, end);

        assert_eq!(route.len(), 11);
        assert_eq!(route.points[0], start);
        let last = route.last().unwrap();
        assert!((last.lat - end.lat).abs() < 1e-12);
        assert!((last.lng - end.lng).abs() < 1e-12);
        assert!((route.points[5].lat - 37.7799).abs() < 1e-9);

        let expected_m = start.distance_km(&end) * 1000.0;
        assert!((route.distance - expected_m).abs() < 1e-9);
        assert!((route.duration - expected_m / 13.89).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fallback_on_provider_error() {
        let service = RoutingService::with_provider(Arc::new(FailingProvider));
        let route = service
            .get_route(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.01))
            .await;
        assert_eq!(route.len(), 11);
    }

    #[tokio::test]
    async fn test_fallback_on_empty_route() {
        let service = RoutingService::with_provider(Arc::new(EmptyProvider));
        let route = service
            .get_route(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.01))
            .await;
        assert_eq!(route.len(), 11);
    }

    #[tokio::test]
    async fn test_provider_route_is_used_when_available() {
        let service = RoutingService::with_provider(Arc::new(FixedProvider));
        let route = service
            .get_route(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.01))
            .await;
        assert_eq!(route.len(), 3);
        assert_eq!(route.distance, 1234.0);
    }

    #[test]
    fn test_osrm_url_uses_lng_lat_order() {
        let provider = OsrmRouteProvider::new("http://osrm:5000/", Duration::from_secs(1)).unwrap();
        let url = provider.route_url(GeoPoint::new(45.5, -122.6), GeoPoint::new(45.6, -122.7));
        assert_eq!(
            url,
            "http://osrm:5000/route/v1/driving/-122.6,45.5;-122.7,45.6?overview=full&geometries=geojson"
        );
    }
}
