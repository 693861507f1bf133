//! Hit-region mapping: percentage bone rectangles to pixel rectangles over the displayed image.
use bevy::prelude::*;

use crate::utils::errors::{BoneGameError, BoneGameResult};
use crate::utils::objects::Bone;

/// Axis-aligned rectangle in percent (0-100) of the reference image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl PercentRect {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Scales the corners into pixel space: `coord * size / 100 + offset`.
    pub fn to_pixels(&self, metrics: &ImageMetrics) -> PixelRect {
        let scale_x = metrics.width / 100.0;
        let scale_y = metrics.height / 100.0;
        PixelRect {
            left: self.x1 * scale_x + metrics.offset_x,
            top: self.y1 * scale_y + metrics.offset_y,
            right: self.x2 * scale_x + metrics.offset_x,
            bottom: self.y2 * scale_y + metrics.offset_y,
        }
    }

    fn validate(&self) -> Result<(), String> {
        let coords = [self.x1, self.y1, self.x2, self.y2];
        if coords.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 100.0) {
            return Err(format!("coordinates {coords:?} are outside 0-100"));
        }
        if self.x2 <= self.x1 || self.y2 <= self.y1 {
            return Err(format!("rectangle {coords:?} has no area"));
        }
        Ok(())
    }
}

/// Which rectangle of a bone a click target stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionSide {
    Single,
    Left,
    Right,
}

/// Click region of a bone: one rectangle, or a left/right pair for bilateral bones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoneRegion {
    Single(PercentRect),
    Bilateral { left: PercentRect, right: PercentRect },
}

impl BoneRegion {
    pub fn rects(&self) -> Vec<(RegionSide, PercentRect)> {
        match *self {
            BoneRegion::Single(rect) => vec![(RegionSide::Single, rect)],
            BoneRegion::Bilateral { left, right } => {
                vec![(RegionSide::Left, left), (RegionSide::Right, right)]
            }
        }
    }
}

/// Displayed image size and its offset inside the containing frame, in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageMetrics {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl ImageMetrics {
    /// Metrics of an image centred inside a frame of the given size.
    pub fn centered_in(frame: Vec2, image: Vec2) -> Self {
        Self {
            width: image.x,
            height: image.y,
            offset_x: (frame.x - image.x) / 2.0,
            offset_y: (frame.y - image.y) / 2.0,
        }
    }

    /// An image that has not loaded yet reports zero size.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Rectangle in pixels relative to the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PixelRect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// One clickable rectangle in pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct HitArea {
    pub bone_index: usize,
    pub side: RegionSide,
    pub rect: PixelRect,
}

/// Pixel-space click targets for the whole catalog, rebuilt whenever the image metrics change.
#[derive(Resource, Clone, Debug, Default)]
pub struct HitRegionMap {
    regions: Vec<BoneRegion>,
    metrics: ImageMetrics,
    areas: Vec<HitArea>,
}

impl HitRegionMap {
    pub fn new(catalog: &[Bone]) -> Self {
        let mut map = Self {
            regions: catalog.iter().map(|bone| bone.region).collect(),
            metrics: ImageMetrics::default(),
            areas: Vec::new(),
        };
        map.rebuild();
        map
    }

    pub fn metrics(&self) -> ImageMetrics {
        self.metrics
    }

    pub fn areas(&self) -> &[HitArea] {
        &self.areas
    }

    /// Applies freshly measured metrics. Returns true when the areas were recomputed.
    pub fn update_metrics(&mut self, metrics: ImageMetrics) -> bool {
        if metrics == self.metrics {
            return false;
        }
        self.metrics = metrics;
        self.rebuild();
        true
    }

    pub fn rect_for(&self, bone_index: usize, side: RegionSide) -> Option<PixelRect> {
        self.areas
            .iter()
            .find(|area| area.bone_index == bone_index && area.side == side)
            .map(|area| area.rect)
    }

    fn rebuild(&mut self) {
        let metrics = self.metrics;
        self.areas = self
            .regions
            .iter()
            .enumerate()
            .flat_map(|(bone_index, region)| {
                region.rects().into_iter().map(move |(side, rect)| HitArea {
                    bone_index,
                    side,
                    rect: rect.to_pixels(&metrics),
                })
            })
            .collect();
    }
}

/// Checks every rectangle lies in 0-100 with positive extent and that names are unique.
pub fn validate_catalog(catalog: &[Bone]) -> BoneGameResult<()> {
    for (i, bone) in catalog.iter().enumerate() {
        if catalog[..i].iter().any(|other| other.name == bone.name) {
            return Err(BoneGameError::MalformedRegion {
                bone: bone.name.to_string(),
                reason: "duplicate name".to_string(),
            });
        }
        for (_, rect) in bone.region.rects() {
            rect.validate()
                .map_err(|reason| BoneGameError::MalformedRegion {
                    bone: bone.name.to_string(),
                    reason,
                })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::bone_constants::{BONE_CATALOG, BONE_COUNT};

    #[test]
    fn scales_and_offsets_rectangle() {
        let metrics = ImageMetrics {
            width: 400.0,
            height: 800.0,
            offset_x: 50.0,
            offset_y: 10.0,
        };
        let rect = PercentRect::new(39.0, 0.0, 61.0, 13.0).to_pixels(&metrics);

        assert_eq!(rect.left, 39.0 * 4.0 + 50.0);
        assert_eq!(rect.top, 10.0);
        assert_eq!(rect.right, 61.0 * 4.0 + 50.0);
        assert_eq!(rect.bottom, 13.0 * 8.0 + 10.0);
        assert_eq!(rect.width(), 22.0 * 4.0);
    }

    #[test]
    fn bilateral_bones_get_two_independent_areas() {
        let catalog = BONE_CATALOG;
        let femur = catalog.iter().position(|b| b.name == "Femur").unwrap();
        let mut map = HitRegionMap::new(&catalog);
        map.update_metrics(ImageMetrics {
            width: 100.0,
            height: 100.0,
            offset_x: 0.0,
            offset_y: 0.0,
        });

        let left = map.rect_for(femur, RegionSide::Left).unwrap();
        let right = map.rect_for(femur, RegionSide::Right).unwrap();
        assert_eq!(left, PixelRect { left: 30.0, top: 48.0, right: 47.0, bottom: 66.0 });
        assert_eq!(right, PixelRect { left: 53.0, top: 48.0, right: 68.0, bottom: 66.0 });
        assert!(map.rect_for(femur, RegionSide::Single).is_none());
    }

    #[test]
    fn unloaded_image_yields_zero_sized_areas() {
        let map = HitRegionMap::new(&BONE_CATALOG);

        assert!(map.metrics().is_empty());
        assert!(map.areas().iter().all(|a| a.rect.width() == 0.0 && a.rect.height() == 0.0));
    }

    #[test]
    fn recomputes_only_when_metrics_change() {
        let mut map = HitRegionMap::new(&BONE_CATALOG);
        let metrics = ImageMetrics::centered_in(Vec2::new(600.0, 800.0), Vec2::new(400.0, 800.0));

        assert_eq!(metrics.offset_x, 100.0);
        assert_eq!(metrics.offset_y, 0.0);
        assert!(map.update_metrics(metrics));
        assert!(!map.update_metrics(metrics));

        let skull = map.rect_for(0, RegionSide::Single).unwrap();
        assert_eq!(skull.left, 39.0 * 4.0 + 100.0);
    }

    #[test]
    fn area_count_matches_catalog_shape() {
        let map = HitRegionMap::new(&BONE_CATALOG);
        let bilateral = BONE_CATALOG
            .iter()
            .filter(|b| matches!(b.region, BoneRegion::Bilateral { .. }))
            .count();

        assert_eq!(map.areas().len(), BONE_COUNT + bilateral);
    }

    #[test]
    fn shipped_catalog_is_well_formed() {
        assert_eq!(BONE_CATALOG.len(), 18);
        validate_catalog(&BONE_CATALOG).unwrap();
    }

    #[test]
    fn shipped_catalog_areas_never_overlap() {
        let rects: Vec<(&str, PercentRect)> = BONE_CATALOG
            .iter()
            .flat_map(|bone| bone.region.rects().into_iter().map(move |(_, r)| (bone.name, r)))
            .collect();

        for (i, (name, a)) in rects.iter().enumerate() {
            for (other, b) in &rects[i + 1..] {
                let overlaps = a.x1.max(b.x1) < a.x2.min(b.x2) && a.y1.max(b.y1) < a.y2.min(b.y2);
                assert!(!overlaps, "{name} overlaps {other}");
            }
        }
        assert!(BONE_CATALOG.iter().all(|bone| bone.name != "Sternum"));
    }

    #[test]
    fn rejects_malformed_rectangles_and_duplicates() {
        let inverted = [Bone {
            name: "Backwards",
            region: BoneRegion::Single(PercentRect::new(60.0, 10.0, 40.0, 20.0)),
        }];
        assert!(matches!(
            validate_catalog(&inverted),
            Err(BoneGameError::MalformedRegion { .. })
        ));

        let out_of_range = [Bone {
            name: "Huge",
            region: BoneRegion::Single(PercentRect::new(0.0, 0.0, 120.0, 20.0)),
        }];
        assert!(validate_catalog(&out_of_range).is_err());

        let duplicated = [BONE_CATALOG[0], BONE_CATALOG[0]];
        assert!(validate_catalog(&duplicated).is_err());
    }
}
