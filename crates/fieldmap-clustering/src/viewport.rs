//! Map viewport and screen projection.
//!
//! Uses the Web-Mercator tiling scheme: at integer zoom `z` the world is a
//! square of `256 * 2^z` pixels, longitude maps linearly to x and latitude
//! through the Mercator stretch to y (screen y grows downward).

use std::f64::consts::PI;

use fieldmap_core::{GeoBounds, Vertex};
use serde::{Deserialize, Serialize};

/// Tile edge in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Maps geographic positions to screen pixels at a fixed zoom.
pub trait Projection {
    /// Pixel position relative to the viewport's top-left corner.
    fn to_pixel(&self, vertex: Vertex) -> (f64, f64);

    /// Integer zoom level the projection is valid for.
    fn zoom(&self) -> u8;
}

/// Visible map area: center, integer zoom, and screen size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    center: Vertex,
    zoom: u8,
    width: f64,
    height: f64,
    min_zoom: u8,
    max_zoom: u8,
}

impl MapViewport {
    /// Creates a viewport with the full 0..=22 zoom range.
    pub fn new(center: Vertex, zoom: u8, width: f64, height: f64) -> Self {
        Self::with_zoom_range(center, zoom, width, height, 0, 22)
    }

    /// Creates a viewport whose zoom is kept within `min_zoom..=max_zoom`.
    pub fn with_zoom_range(
        center: Vertex,
        zoom: u8,
        width: f64,
        height: f64,
        min_zoom: u8,
        max_zoom: u8,
    ) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        Self {
            center: clamp_vertex(center),
            zoom: zoom.clamp(min_zoom, max_zoom),
            width: width.max(1.0),
            height: height.max(1.0),
            min_zoom,
            max_zoom,
        }
    }

    pub fn center(&self) -> Vertex {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn zoom_range(&self) -> (u8, u8) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets the screen size (typically on window resize).
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Recenters without changing zoom.
    pub fn center_on(&mut self, center: Vertex) {
        self.center = clamp_vertex(center);
    }

    /// Sets the zoom, clamped to the viewport's range.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Recenters on `center` and sets the zoom.
    pub fn zoom_to(&mut self, center: Vertex, zoom: u8) {
        self.center_on(center);
        self.set_zoom(zoom);
    }

    /// Pans by a screen delta in pixels (positive dx moves the view east,
    /// positive dy moves it south).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.world_pixel(self.center);
        self.center = clamp_vertex(self.world_to_vertex(cx + dx, cy + dy));
    }

    /// Geographic bounds of the visible area.
    pub fn bounds(&self) -> GeoBounds {
        let top_left = self.pixel_to_vertex(0.0, 0.0);
        let bottom_right = self.pixel_to_vertex(self.width, self.height);
        GeoBounds::new(
            top_left.lng,
            bottom_right.lat,
            bottom_right.lng,
            top_left.lat,
        )
    }

    /// Geographic position under a viewport pixel.
    pub fn pixel_to_vertex(&self, x: f64, y: f64) -> Vertex {
        let (cx, cy) = self.world_pixel(self.center);
        self.world_to_vertex(cx - self.width / 2.0 + x, cy - self.height / 2.0 + y)
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powi(i32::from(self.zoom))
    }

    fn world_pixel(&self, vertex: Vertex) -> (f64, f64) {
        let size = self.world_size();
        let lat = vertex.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (vertex.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        (x, y)
    }

    fn world_to_vertex(&self, x: f64, y: f64) -> Vertex {
        let size = self.world_size();
        let lng = x / size * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * y / size);
        let lat = n.sinh().atan().to_degrees();
        Vertex::new(lat, lng)
    }
}

impl Projection for MapViewport {
    fn to_pixel(&self, vertex: Vertex) -> (f64, f64) {
        let (cx, cy) = self.world_pixel(self.center);
        let (x, y) = self.world_pixel(vertex);
        (x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }
}

fn clamp_vertex(vertex: Vertex) -> Vertex {
    Vertex::new(
        vertex.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        vertex.lng.clamp(-180.0, 180.0),
    )
}
