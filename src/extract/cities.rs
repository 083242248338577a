//! Static coordinate table of the cities the pipeline knows how to fetch.

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use weather_etl::LatLon;
///
/// let recife = LatLon(-8.04, -34.88);
/// assert_eq!(recife.0, -8.04); // Latitude
/// assert_eq!(recife.1, -34.88); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

pub const CITY_COORDS: [(&str, LatLon); 10] = [
    ("sao_paulo", LatLon(-23.55, -46.63)),
    ("rio_de_janeiro", LatLon(-22.91, -43.17)),
    ("brasilia", LatLon(-15.78, -47.93)),
    ("belo_horizonte", LatLon(-19.92, -43.94)),
    ("curitiba", LatLon(-25.43, -49.27)),
    ("porto_alegre", LatLon(-30.03, -51.23)),
    ("salvador", LatLon(-12.98, -38.48)),
    ("recife", LatLon(-8.04, -34.88)),
    ("fortaleza", LatLon(-3.73, -38.54)),
    ("manaus", LatLon(-3.10, -60.02)),
];

/// Returns the coordinates of a supported city slug.
pub fn coordinates(slug: &str) -> Option<LatLon> {
    CITY_COORDS
        .iter()
        .find(|(name, _)| *name == slug)
        .map(|(_, coords)| *coords)
}

pub fn is_supported(slug: &str) -> bool {
    coordinates(slug).is_some()
}
