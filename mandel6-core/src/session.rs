use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::viewport::Viewport;

/// Graph center and zoom in shareable-link form: `x=<re>&y=<im>&z=<zoom>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionParams {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl<'de> Deserialize<'de> for SessionParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            x: f64,
            y: f64,
            z: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        SessionParams::new(raw.x, raw.y, raw.z).map_err(serde::de::Error::custom)
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            x: Viewport::DEFAULT_CENTER.re,
            y: Viewport::DEFAULT_CENTER.im,
            z: Viewport::DEFAULT_ZOOM,
        }
    }
}

impl SessionParams {
    /// Finite center, positive finite zoom.
    pub fn new(x: f64, y: f64, z: f64) -> crate::Result<Self> {
        if !x.is_finite() || !y.is_finite() || !z.is_finite() || z <= 0.0 {
            return Err(CoreError::InvalidSession { x, y, z });
        }
        Ok(Self { x, y, z })
    }

    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            x: viewport.center.re,
            y: viewport.center.im,
            z: viewport.zoom,
        }
    }

    pub fn center(&self) -> Complex {
        Complex::new(self.x, self.y)
    }

    /// Move `viewport` to this session's center and zoom.
    pub fn apply_to(&self, viewport: &mut Viewport) {
        viewport.center = self.center();
        viewport.zoom = self.z;
    }

    pub fn to_query(&self) -> String {
        format!("x={}&y={}&z={}", self.x, self.y, self.z)
    }

    /// Parse `x=..&y=..&z=..` (a leading `?` is accepted, key order and
    /// unknown keys are ignored). Returns `None` unless all three values are
    /// present and valid.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut x = None;
        let mut y = None;
        let mut z = None;
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let slot = match key {
                "x" => &mut x,
                "y" => &mut y,
                "z" => &mut z,
                _ => continue,
            };
            *slot = value.parse::<f64>().ok();
        }

        Self::new(x?, y?, z?).ok()
    }

    /// [`from_query`](Self::from_query), falling back to the default view.
    pub fn from_query_or_default(query: &str) -> Self {
        Self::from_query(query).unwrap_or_else(|| {
            debug!(query, "session query incomplete, using default view");
            Self::default()
        })
    }
}
