use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Hard upper bound on the number of registered centers.
pub const MAX_CENTERS: usize = 100;

/// One instance of the base quadratic map, translated to `position` and
/// uniformly scaled by `scale`.
///
/// Immutable once built; moving a center replaces it inside the
/// [`CenterTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Center {
    position: Complex,
    scale: f64,
}

impl<'de> Deserialize<'de> for Center {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            position: Complex,
            scale: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Center::new(raw.position, raw.scale).map_err(serde::de::Error::custom)
    }
}

impl Center {
    /// The classical frame: origin, unit scale.
    pub const UNIT: Self = Self {
        position: Complex::ZERO,
        scale: 1.0,
    };

    pub fn new(position: Complex, scale: f64) -> crate::Result<Self> {
        if !position.is_finite() {
            return Err(CoreError::InvalidCenterPosition {
                re: position.re,
                im: position.im,
            });
        }
        if scale <= 0.0 || !scale.is_finite() {
            return Err(CoreError::InvalidCenterScale(scale));
        }
        Ok(Self { position, scale })
    }

    #[inline]
    pub fn position(&self) -> Complex {
        self.position
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Map a global-plane value into this center's frame.
    #[inline]
    pub fn normalize(&self, z: Complex) -> Complex {
        (z - self.position) / self.scale
    }

    /// Map a value from this center's frame back onto the global plane.
    #[inline]
    pub fn denormalize(&self, zn: Complex) -> Complex {
        zn * self.scale + self.position
    }

    /// Squared distance from the center, measured in its own frame.
    #[inline]
    pub fn normalized_distance_sq(&self, z: Complex) -> f64 {
        self.normalize(z).norm_sq()
    }

    /// Whether `z` lies strictly inside the given radius of this center.
    ///
    /// Escape is the complement: `|zn|² >= radius_sq`.
    #[inline]
    pub fn claims(&self, z: Complex, radius_sq: f64) -> bool {
        self.normalized_distance_sq(z) < radius_sq
    }

    /// Copy of this center moved to `position`.
    pub fn with_position(&self, position: Complex) -> crate::Result<Self> {
        Self::new(position, self.scale)
    }
}

/// Ordered collection of 1..=[`MAX_CENTERS`] centers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CenterTable {
    centers: Vec<Center>,
}

impl<'de> Deserialize<'de> for CenterTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let centers = Vec::<Center>::deserialize(deserializer)?;
        CenterTable::new(centers).map_err(serde::de::Error::custom)
    }
}

impl CenterTable {
    pub fn new(centers: Vec<Center>) -> crate::Result<Self> {
        if centers.is_empty() {
            return Err(CoreError::EmptyCenterTable);
        }
        if centers.len() > MAX_CENTERS {
            return Err(CoreError::TooManyCenters { max: MAX_CENTERS });
        }
        Ok(Self { centers })
    }

    /// A table with exactly one center.
    pub fn single(center: Center) -> Self {
        Self {
            centers: vec![center],
        }
    }

    /// The classical Mandelbrot map: one center at the origin, unit scale.
    pub fn classic() -> Self {
        Self::single(Center::UNIT)
    }

    /// The six-copy arrangement shown on startup.
    pub fn default_six() -> Self {
        const LAYOUT: [(f64, f64, f64); 6] = [
            (0.0, 0.0, 0.4),
            (5.0, 5.0, 1.5),
            (3.0, -2.0, 0.1),
            (-1.0, -6.0, 2.0),
            (-7.0, -2.0, 1.0),
            (-3.0, 2.0, 0.3),
        ];
        let centers = LAYOUT
            .iter()
            .map(|&(re, im, scale)| Center {
                position: Complex::new(re, im),
                scale,
            })
            .collect();
        Self { centers }
    }

    /// Append a center, returning its index.
    pub fn add(&mut self, center: Center) -> crate::Result<usize> {
        if self.centers.len() >= MAX_CENTERS {
            return Err(CoreError::TooManyCenters { max: MAX_CENTERS });
        }
        self.centers.push(center);
        Ok(self.centers.len() - 1)
    }

    /// Move an existing center (drag-to-place). Scale is preserved.
    pub fn set_position(&mut self, index: usize, position: Complex) -> crate::Result<()> {
        let len = self.centers.len();
        let slot = self
            .centers
            .get_mut(index)
            .ok_or(CoreError::CenterIndexOutOfRange { index, len })?;
        *slot = slot.with_position(position)?;
        Ok(())
    }

    /// Index of the center whose position is nearest to `z` in that
    /// center's own frame, if any lies within `radius`.
    pub fn nearest(&self, z: Complex, radius: f64) -> Option<usize> {
        let radius_sq = radius * radius;
        let mut best: Option<(usize, f64)> = None;
        for (i, center) in self.centers.iter().enumerate() {
            let d = center.normalized_distance_sq(z);
            if d < radius_sq && best.map_or(true, |(_, b)| d < b) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Always `false`; a table holds at least one center.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// `true` when the nearest-center selector is needed.
    pub fn is_multi(&self) -> bool {
        self.centers.len() > 1
    }

    pub fn get(&self, index: usize) -> Option<&Center> {
        self.centers.get(index)
    }

    pub fn as_slice(&self) -> &[Center] {
        &self.centers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Center> {
        self.centers.iter()
    }
}

impl Default for CenterTable {
    fn default() -> Self {
        Self::default_six()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_scale() {
        assert_eq!(
            Center::new(Complex::ZERO, 0.0),
            Err(CoreError::InvalidCenterScale(0.0))
        );
        assert!(Center::new(Complex::ZERO, -1.0).is_err());
        assert!(Center::new(Complex::ZERO, f64::NAN).is_err());
        assert!(Center::new(Complex::ZERO, f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_non_finite_position() {
        assert!(Center::new(Complex::new(f64::NAN, 0.0), 1.0).is_err());
    }

    #[test]
    fn normalize_and_back() {
        let c = Center::new(Complex::new(3.0, -2.0), 0.5).unwrap();
        let z = Complex::new(4.0, -1.0);
        let zn = c.normalize(z);
        assert_eq!(zn, Complex::new(2.0, 2.0));
        assert_eq!(c.denormalize(zn), z);
        assert_eq!(c.normalized_distance_sq(z), 8.0);
    }

    #[test]
    fn claim_boundary_is_exclusive() {
        let c = Center::UNIT;
        assert!(c.claims(Complex::new(1.999, 0.0), 4.0));
        assert!(!c.claims(Complex::new(2.0, 0.0), 4.0));
    }

    #[test]
    fn empty_table_rejected() {
        assert_eq!(CenterTable::new(vec![]), Err(CoreError::EmptyCenterTable));
    }

    #[test]
    fn table_capacity_enforced() {
        let mut table = CenterTable::classic();
        for i in 1..MAX_CENTERS {
            table
                .add(Center::new(Complex::new(i as f64, 0.0), 1.0).unwrap())
                .unwrap();
        }
        assert_eq!(table.len(), MAX_CENTERS);
        assert_eq!(
            table.add(Center::UNIT),
            Err(CoreError::TooManyCenters { max: MAX_CENTERS })
        );
        assert!(CenterTable::new(vec![Center::UNIT; MAX_CENTERS + 1]).is_err());
    }

    #[test]
    fn add_and_move_centers() {
        let mut table = CenterTable::classic();
        assert!(!table.is_multi());

        let before = table.clone();
        assert_eq!(table.add(Center::new(Complex::new(5.0, 5.0), 1.5).unwrap()), Ok(1));
        assert!(table.is_multi());
        assert_ne!(table, before);

        table.set_position(1, Complex::new(6.0, 5.0)).unwrap();
        assert_eq!(table.get(1).unwrap().position(), Complex::new(6.0, 5.0));
        assert_eq!(table.get(1).unwrap().scale(), 1.5);

        assert!(table.set_position(1, Complex::new(f64::NAN, 0.0)).is_err());
        assert_eq!(table.get(1).unwrap().position(), Complex::new(6.0, 5.0));
    }

    #[test]
    fn set_position_out_of_range() {
        let mut table = CenterTable::classic();
        assert_eq!(
            table.set_position(3, Complex::ZERO),
            Err(CoreError::CenterIndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn nearest_uses_normalized_distance() {
        let table = CenterTable::new(vec![
            Center::new(Complex::new(0.0, 0.0), 0.1).unwrap(),
            Center::new(Complex::new(2.0, 0.0), 10.0).unwrap(),
        ])
        .unwrap();
        // Closer to the first in plain distance, but the second is much larger.
        assert_eq!(table.nearest(Complex::new(0.9, 0.0), 100.0), Some(1));
        assert_eq!(table.nearest(Complex::new(100.0, 100.0), 1.0), None);
    }

    #[test]
    fn default_table_has_six_centers() {
        let table = CenterTable::default();
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(0).unwrap().scale(), 0.4);
    }

    #[test]
    fn serde_round_trip_validates() {
        let table = CenterTable::default_six();
        let json = serde_json::to_string(&table).unwrap();
        let back: CenterTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_slice(), table.as_slice());

        let bad = r#"[{"position":{"re":0.0,"im":0.0},"scale":-1.0}]"#;
        assert!(serde_json::from_str::<CenterTable>(bad).is_err());
        assert!(serde_json::from_str::<CenterTable>("[]").is_err());
    }
}
