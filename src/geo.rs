//! World-position arithmetic
//!
//! Positions are Earth-centred Earth-fixed Cartesian coordinates in metres.
//! Geodetic input (longitude/latitude in degrees) is projected onto the
//! WGS84 ellipsoid.

use glam::{DMat3, DVec3};

/// WGS84 equatorial radius (metres)
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 polar radius (metres)
pub const WGS84_B: f64 = 6_356_752.314_245_179_3;

#[inline]
fn radii_squared() -> DVec3 {
    DVec3::new(WGS84_A * WGS84_A, WGS84_A * WGS84_A, WGS84_B * WGS84_B)
}

/// Convert geodetic degrees (plus height above the ellipsoid) to a world position
pub fn from_degrees(lon: f64, lat: f64, height: f64) -> DVec3 {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    let normal = DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin());
    let k = radii_squared() * normal;
    let gamma = normal.dot(k).sqrt();
    k / gamma + normal * height
}

/// Unit normal of the ellipsoid surface below `position`
pub fn surface_normal(position: DVec3) -> DVec3 {
    (position / radii_squared()).normalize_or_zero()
}

/// Straight-line (chord) distance between two world positions
#[inline]
pub fn chord_distance(a: DVec3, b: DVec3) -> f64 {
    a.distance(b)
}

/// Move a position outward along its geocentric direction
#[inline]
pub fn lift(position: DVec3, metres: f64) -> DVec3 {
    position + position.normalize_or_zero() * metres
}

/// Local east-north-up frame at `position`, as columns of a rotation matrix
///
/// Multiplying a local offset `(east, north, up)` by the frame yields the
/// same offset in world axes.
pub fn east_north_up(position: DVec3) -> DMat3 {
    let up = surface_normal(position);
    let mut east = DVec3::new(-position.y, position.x, 0.0);
    // Poles: any horizontal direction works
    if east.length_squared() < 1e-9 {
        east = DVec3::Y;
    }
    let east = east.normalize();
    let north = up.cross(east);
    DMat3::from_cols(east, north, up)
}
