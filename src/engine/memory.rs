//! In-process map engine
//!
//! Keeps layers, features, interactions and overlays in memory, projects
//! with Web Mercator, measures geodesically through `geo`, and hit-tests
//! against an R-tree per vector source. Pointer gestures are simulated
//! through [`MemoryEngine::click`] and the sketch methods, which queue the
//! same [`MapEvent`]s a rendering engine would deliver.

use crate::{
    constants::TILE_SIZE,
    core::{
        extent::Extent,
        geo::{LatLng, Pixel, Point},
        geometry::{Geometry, GeometryKind},
    },
    data::geojson::GeoJson,
    engine::{
        event::MapEvent,
        feature::{Feature, FeatureId, Properties},
        index::FeatureIndex,
        Annotation, FitOptions, InteractionHandle, InteractionKind, InteractionSpec, LayerHandle,
        MapEngine, OverlayHandle, SourceState,
    },
    layers::style::StyleDescriptor,
    prelude::HashMap,
    tiles::source::TileSourceConfig,
    MapError, Result,
};
use geo::{ChamberlainDuquetteArea, Contains, EuclideanDistance, HaversineLength};
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Web Mercator circumference at the equator in meters
const MERCATOR_CIRCUMFERENCE: f64 = 2.0 * PI * 6378137.0;

/// Minimum pick radius in pixels, so thin lines stay clickable
const MIN_HIT_TOLERANCE_PX: f64 = 1.0;

/// Map view: projected center, meters per pixel and viewport size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: Point,
    pub resolution: f64,
    pub width: f64,
    pub height: f64,
}

impl View {
    pub fn resolution_for_zoom(zoom: f64) -> f64 {
        MERCATOR_CIRCUMFERENCE / (TILE_SIZE as f64 * 2_f64.powf(zoom))
    }

    pub fn zoom(&self) -> f64 {
        (MERCATOR_CIRCUMFERENCE / (TILE_SIZE as f64 * self.resolution)).log2()
    }

    pub fn pixel_to_coordinate(&self, pixel: Pixel) -> Point {
        Point::new(
            self.center.x + (pixel.x - self.width / 2.0) * self.resolution,
            self.center.y - (pixel.y - self.height / 2.0) * self.resolution,
        )
    }

    pub fn coordinate_to_pixel(&self, coordinate: Point) -> Pixel {
        Pixel::new(
            (coordinate.x - self.center.x) / self.resolution + self.width / 2.0,
            (self.center.y - coordinate.y) / self.resolution + self.height / 2.0,
        )
    }
}

struct VectorSource {
    url: Option<String>,
    style: Option<StyleDescriptor>,
    state: SourceState,
    features: Vec<Feature>,
    index: FeatureIndex,
}

impl VectorSource {
    fn new(url: Option<String>, style: Option<StyleDescriptor>, state: SourceState) -> Self {
        Self {
            url,
            style,
            state,
            features: Vec::new(),
            index: FeatureIndex::new(),
        }
    }

    fn push(&mut self, feature: Feature) {
        if let Some(extent) = feature.geometry.extent() {
            self.index.insert(feature.id, extent, feature.id.0);
        }
        self.features.push(feature);
    }

    fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let position = self.features.iter().position(|f| f.id == id)?;
        self.index.remove(id);
        Some(self.features.remove(position))
    }

    fn hits(&self, point: Point, tolerance: f64) -> Vec<&Feature> {
        self.index
            .candidates(point, tolerance)
            .into_iter()
            .filter_map(|id| self.features.iter().find(|f| f.id == id))
            .filter(|f| geometry_hit(&f.geometry, point, tolerance))
            .collect()
    }
}

enum LayerContent {
    Tile(TileSourceConfig),
    Vector(VectorSource),
}

struct LayerEntry {
    title: String,
    visible: bool,
    content: LayerContent,
}

struct Sketch {
    interaction: InteractionHandle,
    layer: LayerHandle,
    kind: GeometryKind,
    vertices: Vec<Point>,
}

pub struct MemoryEngine {
    layers: BTreeMap<LayerHandle, LayerEntry>,
    interactions: Vec<(InteractionHandle, InteractionSpec)>,
    selections: HashMap<InteractionHandle, Vec<FeatureId>>,
    sketch: Option<Sketch>,
    overlays: BTreeMap<OverlayHandle, Annotation>,
    view: View,
    last_fit: Option<(Extent, FitOptions)>,
    events: Vec<MapEvent>,
    next_id: u64,
}

impl MemoryEngine {
    /// Creates an engine with a viewport of `width` x `height` pixels
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            layers: BTreeMap::new(),
            interactions: Vec::new(),
            selections: HashMap::default(),
            sketch: None,
            overlays: BTreeMap::new(),
            view: View {
                center: Point::default(),
                resolution: View::resolution_for_zoom(0.0),
                width,
                height,
            },
            last_fit: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Extent and options of the most recent view fit
    pub fn last_fit(&self) -> Option<&(Extent, FitOptions)> {
        self.last_fit.as_ref()
    }

    pub fn layer_title(&self, layer: LayerHandle) -> Option<&str> {
        self.layers.get(&layer).map(|entry| entry.title.as_str())
    }

    /// Location a vector overlay loads from
    pub fn source_url(&self, layer: LayerHandle) -> Option<&str> {
        match &self.layers.get(&layer)?.content {
            LayerContent::Vector(source) => source.url.as_deref(),
            LayerContent::Tile(_) => None,
        }
    }

    pub fn layer_style(&self, layer: LayerHandle) -> Option<&StyleDescriptor> {
        match &self.layers.get(&layer)?.content {
            LayerContent::Vector(source) => source.style.as_ref(),
            LayerContent::Tile(_) => None,
        }
    }

    pub fn tile_source(&self, layer: LayerHandle) -> Option<&TileSourceConfig> {
        match &self.layers.get(&layer)?.content {
            LayerContent::Tile(source) => Some(source),
            LayerContent::Vector(_) => None,
        }
    }

    pub fn overlay(&self, handle: OverlayHandle) -> Option<&Annotation> {
        self.overlays.get(&handle)
    }

    pub fn overlays(&self) -> impl Iterator<Item = (OverlayHandle, &Annotation)> + '_ {
        self.overlays.iter().map(|(handle, annotation)| (*handle, annotation))
    }

    pub fn selection(&self, handle: InteractionHandle) -> &[FeatureId] {
        self.selections
            .get(&handle)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn coordinate_to_pixel(&self, coordinate: Point) -> Pixel {
        self.view.coordinate_to_pixel(coordinate)
    }

    /// Screen position of a geographic coordinate
    pub fn pixel_for(&self, lat_lng: LatLng) -> Pixel {
        self.view.coordinate_to_pixel(lat_lng.to_mercator())
    }

    fn vector_source_mut(&mut self, layer: LayerHandle) -> Result<&mut VectorSource> {
        match self.layers.get_mut(&layer) {
            Some(LayerEntry {
                content: LayerContent::Vector(source),
                ..
            }) => Ok(source),
            Some(_) => Err(MapError::Layer(format!("{} is not a vector layer", layer))),
            None => Err(MapError::UnknownLayer(layer.to_string())),
        }
    }

    fn vector_source(&self, layer: LayerHandle) -> Option<&VectorSource> {
        match &self.layers.get(&layer)?.content {
            LayerContent::Vector(source) => Some(source),
            LayerContent::Tile(_) => None,
        }
    }

    /// Appends already projected features and marks the source ready
    pub fn load_features(
        &mut self,
        layer: LayerHandle,
        features: Vec<(Geometry, Properties)>,
    ) -> Result<usize> {
        let ids: Vec<u64> = features.iter().map(|_| self.next_id()).collect();
        let source = self.vector_source_mut(layer)?;
        let count = features.len();

        for (id, (geometry, properties)) in ids.into_iter().zip(features) {
            source.push(Feature::new(FeatureId(id), geometry, properties));
        }
        source.state = SourceState::Ready;

        log::debug!("{} loaded {} features", layer, count);
        Ok(count)
    }

    /// Parses GeoJSON text into the source. A parse failure leaves the
    /// source [`SourceState::Failed`].
    pub fn load_geojson(&mut self, layer: LayerHandle, text: &str) -> Result<usize> {
        match GeoJson::from_str(text) {
            Ok(geojson) => self.load_features(layer, geojson.into_features()),
            Err(e) => {
                self.mark_failed(layer)?;
                Err(e)
            }
        }
    }

    pub fn mark_failed(&mut self, layer: LayerHandle) -> Result<()> {
        let source = self.vector_source_mut(layer)?;
        source.state = SourceState::Failed;
        log::warn!("{} failed to load", layer);
        Ok(())
    }

    fn hit_tolerance(&self, tolerance_px: f64) -> f64 {
        tolerance_px.max(MIN_HIT_TOLERANCE_PX) * self.view.resolution
    }

    fn hits_in_layer(&self, layer: LayerHandle, point: Point, tolerance: f64) -> Vec<Feature> {
        match self.layers.get(&layer) {
            Some(LayerEntry {
                visible: true,
                content: LayerContent::Vector(source),
                ..
            }) => source.hits(point, tolerance).into_iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Simulates a primary click at `pixel`
    pub fn click(&mut self, pixel: Pixel) {
        let coordinate = self.view.pixel_to_coordinate(pixel);

        for (handle, spec) in self.interactions.clone() {
            match spec.kind {
                InteractionKind::Select {
                    layers,
                    hit_tolerance_px,
                } => {
                    let tolerance = self.hit_tolerance(hit_tolerance_px);
                    let hit = layers
                        .iter()
                        .rev()
                        .find_map(|layer| self.hits_in_layer(*layer, coordinate, tolerance).into_iter().next());

                    let selected = self.selections.entry(handle).or_default();
                    match hit {
                        Some(feature) if !selected.contains(&feature.id) => {
                            selected.push(feature.id);
                            self.events.push(MapEvent::Select {
                                interaction: handle,
                                feature,
                            });
                        }
                        Some(_) => {}
                        None => selected.clear(),
                    }
                }
                InteractionKind::Click => self.events.push(MapEvent::Click {
                    interaction: handle,
                    pixel,
                    coordinate,
                }),
                InteractionKind::Draw { .. } => {}
            }
        }
    }

    /// Starts a sketch with the most recently attached draw interaction.
    /// Returns `false` when no draw interaction is attached or one is
    /// already in progress.
    pub fn begin_sketch(&mut self, pixel: Pixel) -> bool {
        if self.sketch.is_some() {
            return false;
        }

        let draw = self.interactions.iter().rev().find_map(|(handle, spec)| match spec.kind {
            InteractionKind::Draw { layer, geometry } => Some((*handle, layer, geometry)),
            _ => None,
        });

        match draw {
            Some((interaction, layer, kind)) => {
                self.sketch = Some(Sketch {
                    interaction,
                    layer,
                    kind,
                    vertices: vec![self.view.pixel_to_coordinate(pixel)],
                });
                true
            }
            None => false,
        }
    }

    pub fn add_sketch_vertex(&mut self, pixel: Pixel) -> bool {
        let coordinate = self.view.pixel_to_coordinate(pixel);
        match self.sketch.as_mut() {
            Some(sketch) => {
                sketch.vertices.push(coordinate);
                true
            }
            None => false,
        }
    }

    pub fn is_sketching(&self) -> bool {
        self.sketch.is_some()
    }

    /// Completes the sketch in progress. Too few vertices discard it.
    pub fn finish_sketch(&mut self) -> Option<FeatureId> {
        let sketch = self.sketch.take()?;

        let geometry = match sketch.kind {
            GeometryKind::LineString if sketch.vertices.len() >= 2 => {
                Geometry::LineString(sketch.vertices)
            }
            GeometryKind::Polygon if sketch.vertices.len() >= 3 => {
                let mut ring = sketch.vertices;
                ring.push(ring[0]);
                Geometry::Polygon(vec![ring])
            }
            GeometryKind::Circle if sketch.vertices.len() >= 2 => {
                let center = sketch.vertices[0];
                let edge = sketch.vertices[sketch.vertices.len() - 1];
                Geometry::Circle {
                    center,
                    radius: center.distance_to(&edge),
                }
            }
            _ => {
                log::debug!("discarding {} sketch with too few vertices", sketch.kind);
                return None;
            }
        };

        let id = FeatureId(self.next_id());
        let feature = Feature::new(id, geometry, Properties::new());
        self.vector_source_mut(sketch.layer).ok()?.push(feature.clone());
        self.events.push(MapEvent::DrawEnd {
            interaction: sketch.interaction,
            feature,
        });
        Some(id)
    }

    /// Sketches through every pixel and finishes
    pub fn draw(&mut self, pixels: &[Pixel]) -> Option<FeatureId> {
        let (first, rest) = pixels.split_first()?;
        if !self.begin_sketch(*first) {
            return None;
        }
        for pixel in rest {
            self.add_sketch_vertex(*pixel);
        }
        self.finish_sketch()
    }

    /// Drags a circle from `center` out to `edge`
    pub fn draw_circle(&mut self, center: Pixel, edge: Pixel) -> Option<FeatureId> {
        self.draw(&[center, edge])
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

impl MapEngine for MemoryEngine {
    fn create_tiled_base_layer(
        &mut self,
        title: &str,
        source: &TileSourceConfig,
        visible: bool,
    ) -> LayerHandle {
        let handle = LayerHandle(self.next_id());
        self.layers.insert(
            handle,
            LayerEntry {
                title: title.to_string(),
                visible,
                content: LayerContent::Tile(source.clone()),
            },
        );
        handle
    }

    fn create_vector_overlay(
        &mut self,
        title: &str,
        url: &str,
        style: &StyleDescriptor,
        visible: bool,
    ) -> LayerHandle {
        let handle = LayerHandle(self.next_id());
        self.layers.insert(
            handle,
            LayerEntry {
                title: title.to_string(),
                visible,
                content: LayerContent::Vector(VectorSource::new(
                    Some(url.to_string()),
                    Some(style.clone()),
                    SourceState::Loading,
                )),
            },
        );
        handle
    }

    fn create_vector_layer(&mut self, title: &str) -> LayerHandle {
        let handle = LayerHandle(self.next_id());
        self.layers.insert(
            handle,
            LayerEntry {
                title: title.to_string(),
                visible: true,
                content: LayerContent::Vector(VectorSource::new(None, None, SourceState::Ready)),
            },
        );
        handle
    }

    fn set_visible(&mut self, layer: LayerHandle, visible: bool) -> Result<()> {
        let entry = self
            .layers
            .get_mut(&layer)
            .ok_or_else(|| MapError::UnknownLayer(layer.to_string()))?;
        entry.visible = visible;
        Ok(())
    }

    fn is_visible(&self, layer: LayerHandle) -> bool {
        self.layers.get(&layer).map(|e| e.visible).unwrap_or(false)
    }

    fn add_interaction(&mut self, spec: InteractionSpec) -> InteractionHandle {
        let handle = InteractionHandle(self.next_id());
        log::debug!("attach {} ({})", handle, spec.tag);
        self.interactions.push((handle, spec));
        handle
    }

    fn remove_interaction(&mut self, handle: InteractionHandle) -> bool {
        let before = self.interactions.len();
        self.interactions.retain(|(h, _)| *h != handle);
        self.selections.remove(&handle);

        if self.sketch.as_ref().map(|s| s.interaction) == Some(handle) {
            log::debug!("cancelled sketch of detached {}", handle);
            self.sketch = None;
        }

        self.interactions.len() != before
    }

    fn remove_interactions_tagged(&mut self, tags: &[&str]) -> Vec<InteractionHandle> {
        let tagged: Vec<InteractionHandle> = self
            .interactions
            .iter()
            .filter(|(_, spec)| tags.contains(&spec.tag.as_str()))
            .map(|(handle, _)| *handle)
            .collect();

        for handle in &tagged {
            self.remove_interaction(*handle);
        }
        tagged
    }

    fn interactions(&self) -> Vec<(InteractionHandle, InteractionSpec)> {
        self.interactions.clone()
    }

    fn clear_selection(&mut self, handle: InteractionHandle) {
        if let Some(selected) = self.selections.get_mut(&handle) {
            selected.clear();
        }
    }

    fn compute_length(&self, geometry: &Geometry) -> f64 {
        match geometry {
            Geometry::LineString(coords) => geographic_line(coords).haversine_length(),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                MultiLineString::new(rings.iter().map(|r| geographic_line(r)).collect())
                    .haversine_length()
            }
            _ => 0.0,
        }
    }

    fn compute_area(&self, geometry: &Geometry) -> f64 {
        match geometry {
            Geometry::Polygon(rings) => {
                geographic_polygon(rings).chamberlain_duquette_unsigned_area()
            }
            Geometry::MultiPolygon(polygons) => {
                MultiPolygon::new(polygons.iter().map(|p| geographic_polygon(p)).collect())
                    .chamberlain_duquette_unsigned_area()
            }
            _ => 0.0,
        }
    }

    fn to_lon_lat(&self, coordinate: Point) -> LatLng {
        LatLng::from_mercator(coordinate)
    }

    fn from_lon_lat(&self, lat_lng: LatLng) -> Point {
        lat_lng.to_mercator()
    }

    fn pixel_to_coordinate(&self, pixel: Pixel) -> Point {
        self.view.pixel_to_coordinate(pixel)
    }

    fn features_at_pixel(&self, pixel: Pixel, layer_filter: Option<LayerHandle>) -> Vec<Feature> {
        let point = self.view.pixel_to_coordinate(pixel);
        let tolerance = self.hit_tolerance(0.0);

        match layer_filter {
            Some(layer) => self.hits_in_layer(layer, point, tolerance),
            None => self
                .layers
                .keys()
                .rev()
                .flat_map(|layer| self.hits_in_layer(*layer, point, tolerance))
                .collect(),
        }
    }

    fn source_state(&self, layer: LayerHandle) -> Option<SourceState> {
        self.vector_source(layer).map(|source| source.state)
    }

    fn source_features(&self, layer: LayerHandle) -> Vec<Feature> {
        self.vector_source(layer)
            .map(|source| source.features.clone())
            .unwrap_or_default()
    }

    fn remove_feature(&mut self, layer: LayerHandle, id: FeatureId) -> Option<Feature> {
        let removed = self.vector_source_mut(layer).ok()?.remove(id)?;
        for selected in self.selections.values_mut() {
            selected.retain(|fid| *fid != id);
        }
        Some(removed)
    }

    fn clear_features(&mut self, layer: LayerHandle) {
        if let Ok(source) = self.vector_source_mut(layer) {
            let ids: Vec<FeatureId> = source.features.drain(..).map(|f| f.id).collect();
            source.index.clear();
            for selected in self.selections.values_mut() {
                selected.retain(|fid| !ids.contains(fid));
            }
        }
    }

    fn add_overlay(&mut self, annotation: Annotation) -> OverlayHandle {
        let handle = OverlayHandle(self.next_id());
        self.overlays.insert(handle, annotation);
        handle
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) -> bool {
        self.overlays.remove(&handle).is_some()
    }

    fn set_view(&mut self, center: Point, zoom: f64) {
        self.view.center = center;
        self.view.resolution = View::resolution_for_zoom(zoom);
    }

    fn view_center(&self) -> Point {
        self.view.center
    }

    fn view_zoom(&self) -> f64 {
        self.view.zoom()
    }

    fn fit_extent(&mut self, extent: Extent, options: FitOptions) {
        let [top, right, bottom, left] = options.padding_px;
        let usable_width = (self.view.width - left - right).max(1.0);
        let usable_height = (self.view.height - top - bottom).max(1.0);
        let resolution = (extent.width() / usable_width).max(extent.height() / usable_height);

        // Padding is asymmetric in general, so shift the center accordingly
        let center = extent.center();
        self.view.center = Point::new(
            center.x - (left - right) / 2.0 * resolution,
            center.y + (top - bottom) / 2.0 * resolution,
        );
        if resolution > 0.0 {
            self.view.resolution = resolution;
        }
        self.last_fit = Some((extent, options));
        log::debug!(
            "fit to extent over {} ms, zoom now {:.2}",
            options.duration_ms,
            self.view.zoom()
        );
    }

    fn drain_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }
}

fn geographic_line(coords: &[Point]) -> LineString<f64> {
    LineString::new(
        coords
            .iter()
            .map(|p| {
                let ll = LatLng::from_mercator(*p);
                Coord { x: ll.lng, y: ll.lat }
            })
            .collect(),
    )
}

fn geographic_polygon(rings: &[Vec<Point>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|r| geographic_line(r));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

fn projected_line(coords: &[Point]) -> LineString<f64> {
    LineString::new(coords.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

fn projected_polygon(rings: &[Vec<Point>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|r| projected_line(r));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

fn line_hit(coords: &[Point], point: Point, tolerance: f64) -> bool {
    match coords {
        [] => false,
        [only] => only.distance_to(&point) <= tolerance,
        _ => {
            let target = geo_types::Point::new(point.x, point.y);
            target.euclidean_distance(&projected_line(coords)) <= tolerance
        }
    }
}

fn polygon_hit(rings: &[Vec<Point>], point: Point, tolerance: f64) -> bool {
    if rings.first().map(|r| r.len() < 3).unwrap_or(true) {
        return false;
    }
    let target = geo_types::Point::new(point.x, point.y);
    let polygon = projected_polygon(rings);
    polygon.contains(&target) || target.euclidean_distance(polygon.exterior()) <= tolerance
}

/// Precise hit test in projected coordinates; polygons and circles are filled
fn geometry_hit(geometry: &Geometry, point: Point, tolerance: f64) -> bool {
    match geometry {
        Geometry::Point(p) => p.distance_to(&point) <= tolerance,
        Geometry::LineString(coords) => line_hit(coords, point, tolerance),
        Geometry::Polygon(rings) => polygon_hit(rings, point, tolerance),
        Geometry::Circle { center, radius } => center.distance_to(&point) <= radius + tolerance,
        Geometry::MultiLineString(lines) => lines.iter().any(|l| line_hit(l, point, tolerance)),
        Geometry::MultiPolygon(polygons) => {
            polygons.iter().any(|p| polygon_hit(p, point, tolerance))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(center: LatLng, half_deg: f64) -> Geometry {
        let corners = [
            (-half_deg, -half_deg),
            (half_deg, -half_deg),
            (half_deg, half_deg),
            (-half_deg, half_deg),
            (-half_deg, -half_deg),
        ];
        Geometry::Polygon(vec![corners
            .iter()
            .map(|(dlng, dlat)| LatLng::new(center.lat + dlat, center.lng + dlng).to_mercator())
            .collect()])
    }

    fn named(name: &str) -> Properties {
        let mut props = Properties::new();
        props.insert("name".to_string(), serde_json::json!(name));
        props
    }

    #[test]
    fn test_pixel_round_trip() {
        let mut engine = MemoryEngine::new(800.0, 600.0);
        engine.set_view(LatLng::new(23.5937, 78.9629).to_mercator(), 4.0);

        let pixel = Pixel::new(123.0, 456.0);
        let back = engine.coordinate_to_pixel(engine.pixel_to_coordinate(pixel));
        assert!((back.x - pixel.x).abs() < 1e-6);
        assert!((back.y - pixel.y).abs() < 1e-6);

        let center = engine.pixel_to_coordinate(Pixel::new(400.0, 300.0));
        assert_eq!(center, engine.view().center);
    }

    #[test]
    fn test_geodesic_length_of_one_degree_of_latitude() {
        let engine = MemoryEngine::default();
        let line = Geometry::LineString(vec![
            LatLng::new(20.0, 78.0).to_mercator(),
            LatLng::new(21.0, 78.0).to_mercator(),
        ]);

        let meters = engine.compute_length(&line);
        assert!(meters > 111_000.0 && meters < 111_400.0, "got {}", meters);
        assert_eq!(engine.compute_length(&Geometry::Point(Point::default())), 0.0);
    }

    #[test]
    fn test_geodesic_area_is_positive_and_plausible() {
        let engine = MemoryEngine::default();
        let area = engine.compute_area(&square(LatLng::new(0.0, 0.0), 0.5));

        // one square degree at the equator is roughly 12,360 km²
        let km2 = area / 1_000_000.0;
        assert!(km2 > 12_200.0 && km2 < 12_500.0, "got {}", km2);
    }

    #[test]
    fn test_loading_marks_source_ready() {
        let mut engine = MemoryEngine::default();
        let layer = engine.create_vector_overlay(
            "india_states",
            "india_states.geojson",
            &StyleDescriptor::states(),
            true,
        );
        assert_eq!(engine.source_state(layer), Some(SourceState::Loading));
        assert!(!engine.source_ready(layer));

        let count = engine
            .load_features(layer, vec![(square(LatLng::new(20.0, 78.0), 1.0), named("Test"))])
            .unwrap();
        assert_eq!(count, 1);
        assert!(engine.source_ready(layer));
        assert_eq!(engine.source_features(layer).len(), 1);
    }

    #[test]
    fn test_bad_geojson_marks_source_failed() {
        let mut engine = MemoryEngine::default();
        let layer =
            engine.create_vector_overlay("roads", "roads.geojson", &StyleDescriptor::roads(), true);

        assert!(engine.load_geojson(layer, "{\"type\": ").is_err());
        assert_eq!(engine.source_state(layer), Some(SourceState::Failed));
    }

    #[test]
    fn test_hit_test_respects_filter_and_visibility() {
        let mut engine = MemoryEngine::new(800.0, 600.0);
        let center = LatLng::new(20.0, 78.0);
        engine.set_view(center.to_mercator(), 6.0);

        let states = engine.create_vector_overlay("s", "s", &StyleDescriptor::states(), true);
        let districts = engine.create_vector_overlay("d", "d", &StyleDescriptor::districts(), true);
        engine.load_features(states, vec![(square(center, 2.0), named("State"))]).unwrap();
        engine.load_features(districts, vec![(square(center, 0.5), named("District"))]).unwrap();

        let pixel = engine.pixel_for(center);
        let all = engine.features_at_pixel(pixel, None);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].string_property("name"), Some("District"));

        let only_states = engine.features_at_pixel(pixel, Some(states));
        assert_eq!(only_states.len(), 1);
        assert_eq!(only_states[0].string_property("name"), Some("State"));

        engine.set_visible(states, false).unwrap();
        assert!(engine.features_at_pixel(pixel, Some(states)).is_empty());

        let far = engine.pixel_for(LatLng::new(10.0, 70.0));
        assert!(engine.features_at_pixel(far, Some(districts)).is_empty());
    }

    #[test]
    fn test_removing_draw_interaction_cancels_sketch() {
        let mut engine = MemoryEngine::default();
        let layer = engine.create_vector_layer("measure");
        let draw = engine.add_interaction(InteractionSpec::new(
            "draw_tool",
            InteractionKind::Draw {
                layer,
                geometry: GeometryKind::LineString,
            },
        ));

        assert!(engine.begin_sketch(Pixel::new(10.0, 10.0)));
        assert!(engine.add_sketch_vertex(Pixel::new(50.0, 10.0)));
        assert!(engine.remove_interaction(draw));
        assert!(!engine.is_sketching());
        assert_eq!(engine.finish_sketch(), None);
        assert!(engine.drain_events().is_empty());
        assert!(engine.source_features(layer).is_empty());
    }

    #[test]
    fn test_finished_sketch_emits_draw_end() {
        let mut engine = MemoryEngine::default();
        let layer = engine.create_vector_layer("measure");
        let draw = engine.add_interaction(InteractionSpec::new(
            "draw_tool",
            InteractionKind::Draw {
                layer,
                geometry: GeometryKind::Polygon,
            },
        ));

        let id = engine
            .draw(&[
                Pixel::new(10.0, 10.0),
                Pixel::new(60.0, 10.0),
                Pixel::new(60.0, 60.0),
            ])
            .unwrap();

        let events = engine.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            MapEvent::DrawEnd { interaction, feature } => {
                assert_eq!(*interaction, draw);
                assert_eq!(feature.id, id);
                match &feature.geometry {
                    Geometry::Polygon(rings) => {
                        assert_eq!(rings[0].len(), 4);
                        assert_eq!(rings[0].first(), rings[0].last());
                    }
                    other => panic!("unexpected geometry {:?}", other),
                }
            }
            other => panic!("unexpected event {:?}", other),
        }

        // two vertices are not a polygon
        assert_eq!(engine.draw(&[Pixel::new(0.0, 0.0), Pixel::new(5.0, 5.0)]), None);
    }

    #[test]
    fn test_select_emits_once_and_clears_on_empty_click() {
        let mut engine = MemoryEngine::new(800.0, 600.0);
        let layer = engine.create_vector_layer("measure");
        let select = engine.add_interaction(InteractionSpec::new(
            "delete_tool",
            InteractionKind::Select {
                layers: vec![layer],
                hit_tolerance_px: 5.0,
            },
        ));
        let center = engine.pixel_to_coordinate(Pixel::new(400.0, 300.0));
        engine
            .load_features(
                layer,
                vec![(
                    Geometry::Circle {
                        center,
                        radius: engine.view().resolution * 20.0,
                    },
                    Properties::new(),
                )],
            )
            .unwrap();

        engine.click(Pixel::new(405.0, 300.0));
        engine.click(Pixel::new(405.0, 300.0));
        assert_eq!(engine.drain_events().len(), 1);
        assert_eq!(engine.selection(select).len(), 1);

        engine.click(Pixel::new(10.0, 10.0));
        assert!(engine.drain_events().is_empty());
        assert!(engine.selection(select).is_empty());
    }

    #[test]
    fn test_remove_interactions_tagged() {
        let mut engine = MemoryEngine::default();
        engine.add_interaction(InteractionSpec::new("info_click", InteractionKind::Click));
        let keep = engine.add_interaction(InteractionSpec::new("pan", InteractionKind::Click));
        engine.add_interaction(InteractionSpec::new("info_click", InteractionKind::Click));

        let removed = engine.remove_interactions_tagged(&["info_click", "draw_tool"]);
        assert_eq!(removed.len(), 2);
        let left: Vec<_> = engine.interactions().into_iter().map(|(h, _)| h).collect();
        assert_eq!(left, vec![keep]);
    }

    #[test]
    fn test_fit_extent_centers_view() {
        let mut engine = MemoryEngine::new(800.0, 600.0);
        let extent = Extent::from_coords(0.0, 0.0, 700_000.0, 500_000.0);
        engine.fit_extent(extent, FitOptions::new(1500, 50.0));

        assert_eq!(engine.view().center, extent.center());
        assert!((engine.view().resolution - 1000.0).abs() < 1e-9);
        assert_eq!(engine.last_fit().map(|(_, o)| o.duration_ms), Some(1500));
    }
}
