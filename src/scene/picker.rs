//! Flat-map globe picker
//!
//! Treats the viewport as an equirectangular world map: x spans longitude
//! -180..180, y spans latitude 90..-90 (screen y grows downward).

use glam::{DVec3, Vec2};

use super::GlobePicker;
use crate::geo;

#[derive(Debug, Clone, Copy)]
pub struct EquirectPicker {
    pub width: f32,
    pub height: f32,
}

impl EquirectPicker {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen position that picks the given degrees (inverse of [`GlobePicker::pick`])
    pub fn screen_for(&self, lon: f64, lat: f64) -> Vec2 {
        let x = (lon + 180.0) / 360.0 * self.width as f64;
        let y = (90.0 - lat) / 180.0 * self.height as f64;
        Vec2::new(x as f32, y as f32)
    }
}

impl GlobePicker for EquirectPicker {
    fn pick(&self, screen: Vec2) -> Option<DVec3> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let u = screen.x / self.width;
        let v = screen.y / self.height;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }
        let lon = u as f64 * 360.0 - 180.0;
        let lat = 90.0 - v as f64 * 180.0;
        Some(geo::from_degrees(lon, lat, 0.0))
    }
}
