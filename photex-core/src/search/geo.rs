//! Geo resolution and the distance bounding box.

use std::f64::consts::PI;

use crate::error::{GalleryError, Result};
use crate::geocode::Geocoder;
use crate::search::normalize::NormalizedQuery;
use crate::search::types::{DistanceLeaf, GpsPoint, SearchQuery};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Rectangular lat/lon approximation of a circular distance query.
///
/// Best-effort by design: a rectangle keeps the predicate to four range
/// comparisons instead of per-row great-circle math. Longitude bounds are
/// widened by the meridian convergence at the box's own latitude edges, so
/// accuracy degrades near the poles and the box does not wrap at the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn around(origin: GpsPoint, distance_km: f64) -> Self {
        // Degrees per kilometer along a meridian.
        let deg_per_km = 1.0 / ((2.0 * PI / 360.0) * EARTH_RADIUS_KM);
        let min_lat = (origin.latitude - distance_km * deg_per_km).clamp(-90.0, 90.0);
        let max_lat = (origin.latitude + distance_km * deg_per_km).clamp(-90.0, 90.0);
        let min_lon = (origin.longitude - distance_km * deg_per_km / min_lat.to_radians().cos())
            .clamp(-180.0, 180.0);
        let max_lon = (origin.longitude + distance_km * deg_per_km / max_lat.to_radians().cos())
            .clamp(-180.0, 180.0);
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }
}

/// Fill coordinates into every distance leaf that still only carries free
/// text, using the external geocoder. One sequential lookup per unresolved
/// leaf; a failed lookup fails the whole resolution.
pub async fn resolve_places(
    query: &mut NormalizedQuery,
    geocoder: &dyn Geocoder,
) -> Result<()> {
    let mut pending = Vec::new();
    collect_unresolved(query.query_mut(), &mut pending);
    for leaf in pending {
        // collect_unresolved only keeps leaves with text present.
        let place = leaf.from.text.clone().unwrap_or_default();
        match geocoder.lookup(&place).await {
            Ok(gps) => leaf.from.gps = Some(gps),
            Err(source) => return Err(GalleryError::GeoLookup { place, source }),
        }
    }
    Ok(())
}

fn collect_unresolved<'a>(query: &'a mut SearchQuery, out: &mut Vec<&'a mut DistanceLeaf>) {
    match query {
        SearchQuery::And { list } | SearchQuery::Or { list } | SearchQuery::SomeOf { list, .. } => {
            for child in list {
                collect_unresolved(child, out);
            }
        }
        SearchQuery::Distance(leaf) if leaf.from.gps.is_none() && leaf.from.text.is_some() => {
            out.push(leaf);
        }
        _ => {}
    }
}
