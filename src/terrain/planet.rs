//! Planet orchestration: settings in, six coloured face meshes out.

use rand::Rng;
use rayon::prelude::*;
use tracing::{info, warn};

use super::face::{MeshError, TerrainFace, TerrainFaceMesh};
use crate::colour::{ColourGenerator, ColourSettings};
use crate::geometry::FaceId;
use crate::settings::{PlanetSettings, SettingsError};
use crate::shape::{ElevationRange, ShapeGenerator, ShapeSettings};

/// Progress of the generation pipeline. Every settings change starts again
/// from `Initialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlanetState {
    Uninitialized,
    Initialized,
    Meshed,
    Coloured,
}

/// What happened to one face during a mesh pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceStatus {
    Built { vertices: usize, triangles: usize },
    /// Excluded by the face mask.
    Hidden,
    Failed(MeshError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceOutcome {
    pub face: FaceId,
    pub status: FaceStatus,
}

/// Per-face outcomes of a mesh pass plus the merged elevation range.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub faces: Vec<FaceOutcome>,
    pub elevation: ElevationRange,
}

impl GenerationReport {
    pub fn built_count(&self) -> usize {
        self.faces
            .iter()
            .filter(|o| matches!(o.status, FaceStatus::Built { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (FaceId, &MeshError)> + '_ {
        self.faces.iter().filter_map(|o| match &o.status {
            FaceStatus::Failed(err) => Some((o.face, err)),
            _ => None,
        })
    }

    /// True when no face failed.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Receives finished face meshes, e.g. a renderer or an exporter.
pub trait MeshSurface {
    type Error;

    fn receive(&mut self, face: FaceId, mesh: &TerrainFaceMesh) -> Result<(), Self::Error>;
}

/// Owns the settings, the generators and the six terrain faces.
pub struct Planet {
    settings: PlanetSettings,
    shape_generator: ShapeGenerator,
    colour_generator: ColourGenerator,
    faces: Vec<TerrainFace>,
    elevation: ElevationRange,
    state: PlanetState,
}

impl Planet {
    /// Validates `settings`. Nothing is generated until [`initialize`](Self::initialize).
    pub fn new(settings: PlanetSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let shape_generator = ShapeGenerator::new(&settings.shape);
        let colour_generator = ColourGenerator::new(settings.colour.clone())?;
        Ok(Self {
            settings,
            shape_generator,
            colour_generator,
            faces: Vec::new(),
            elevation: ElevationRange::new(),
            state: PlanetState::Uninitialized,
        })
    }

    pub fn settings(&self) -> &PlanetSettings {
        &self.settings
    }

    pub fn state(&self) -> PlanetState {
        self.state
    }

    /// Elevation range merged over all faces of the last mesh pass.
    pub fn elevation_range(&self) -> ElevationRange {
        self.elevation
    }

    pub fn shape_generator(&self) -> &ShapeGenerator {
        &self.shape_generator
    }

    pub fn colour_generator(&self) -> &ColourGenerator {
        &self.colour_generator
    }

    pub fn faces(&self) -> &[TerrainFace] {
        &self.faces
    }

    pub fn face(&self, id: FaceId) -> Option<&TerrainFace> {
        self.faces.get(id.index())
    }

    /// Faces selected by the mask that hold a mesh.
    pub fn visible_faces(&self) -> impl Iterator<Item = &TerrainFace> + '_ {
        let mask = self.settings.face_mask;
        self.faces
            .iter()
            .filter(move |f| mask.shows(f.face()) && !f.mesh().is_empty())
    }

    /// Rebuilds both generators, reallocates the six faces and resets the
    /// elevation range.
    pub fn initialize(&mut self) -> Result<(), SettingsError> {
        self.settings.validate()?;
        let resolution = self.settings.resolution;
        let mapping = self.settings.mapping;

        self.shape_generator = ShapeGenerator::new(&self.settings.shape);
        self.colour_generator = ColourGenerator::new(self.settings.colour.clone())?;
        self.faces = FaceId::all()
            .into_iter()
            .map(|id| TerrainFace::new(id, resolution, mapping))
            .collect::<Result<Vec<_>, MeshError>>()
            .map_err(|_| SettingsError::InvalidResolution(resolution))?;
        self.elevation = ElevationRange::new();
        self.state = PlanetState::Initialized;

        info!(
            resolution,
            layers = self.shape_generator.layer_count(),
            biomes = self.settings.colour.biomes.len(),
            "initialized planet"
        );
        Ok(())
    }

    /// Builds every visible face in parallel and merges their elevation ranges.
    ///
    /// A failing face is reported and left empty; the other faces still build.
    pub fn generate_mesh(&mut self) -> GenerationReport {
        if self.state == PlanetState::Uninitialized {
            warn!("generate_mesh called before initialize, nothing to build");
        }

        let mask = self.settings.face_mask;
        let shape = &self.shape_generator;
        let results: Vec<Option<Result<ElevationRange, MeshError>>> = self
            .faces
            .par_iter_mut()
            .map(|face| mask.shows(face.face()).then(|| face.construct_mesh(shape)))
            .collect();

        let mut elevation = ElevationRange::new();
        let mut outcomes = Vec::with_capacity(self.faces.len());
        for (face, result) in self.faces.iter().zip(results) {
            let status = match result {
                None => FaceStatus::Hidden,
                Some(Ok(range)) => {
                    elevation.merge(&range);
                    FaceStatus::Built {
                        vertices: face.mesh().vertex_count(),
                        triangles: face.mesh().triangle_count(),
                    }
                }
                Some(Err(err)) => {
                    warn!(face = face.face().short_name(), "face failed: {}", err);
                    FaceStatus::Failed(err)
                }
            };
            outcomes.push(FaceOutcome {
                face: face.face(),
                status,
            });
        }

        self.elevation = elevation;
        self.colour_generator
            .update_elevation(elevation, self.settings.shape.planet_radius);
        if self.state != PlanetState::Uninitialized {
            self.state = PlanetState::Meshed;
        }

        info!(min = elevation.min, max = elevation.max, "generated mesh");
        GenerationReport {
            faces: outcomes,
            elevation,
        }
    }

    /// Rebuilds the colour map and rewrites uv and colour of every visible face.
    ///
    /// Before any mesh pass the elevation range is empty and every vertex gets
    /// an elevation percent of 0.
    pub fn generate_colours(&mut self) {
        if self.state < PlanetState::Meshed {
            warn!("generate_colours called before generate_mesh, treating planet as flat");
        }

        self.colour_generator.update_colours();

        let mask = self.settings.face_mask;
        let colour = &self.colour_generator;
        self.faces
            .par_iter_mut()
            .filter(|face| mask.shows(face.face()) && !face.mesh().is_empty())
            .for_each(|face| face.update_uvs(colour));

        if self.state >= PlanetState::Meshed {
            self.state = PlanetState::Coloured;
        }
    }

    /// Runs the full pipeline: initialize, mesh, colour.
    pub fn generate_planet(&mut self) -> Result<GenerationReport, SettingsError> {
        self.initialize()?;
        let report = self.generate_mesh();
        self.generate_colours();
        Ok(report)
    }

    /// Replaces the settings and regenerates everything.
    ///
    /// Invalid settings are rejected and the current planet is kept.
    pub fn regenerate(&mut self, settings: PlanetSettings) -> Result<GenerationReport, SettingsError> {
        settings.validate()?;
        self.settings = settings;
        self.generate_planet()
    }

    /// Replaces the shape and regenerates everything.
    pub fn update_shape_settings(&mut self, shape: ShapeSettings) -> Result<GenerationReport, SettingsError> {
        let settings = PlanetSettings {
            shape,
            ..self.settings.clone()
        };
        self.regenerate(settings)
    }

    /// Replaces only the colouring. Meshes and the elevation range are kept.
    pub fn update_colour_settings(&mut self, colour: ColourSettings) -> Result<(), SettingsError> {
        let mut generator = ColourGenerator::new(colour.clone())?;
        generator.update_elevation(self.elevation, self.settings.shape.planet_radius);

        self.colour_generator = generator;
        self.settings.colour = colour;
        self.generate_colours();
        Ok(())
    }

    /// Generates a random shape at resolution 100.
    pub fn generate_random_shape<R: Rng>(&mut self, rng: &mut R) -> Result<GenerationReport, SettingsError> {
        let settings = PlanetSettings {
            resolution: 100,
            shape: ShapeSettings::random(rng),
            ..self.settings.clone()
        };
        self.regenerate(settings)
    }

    /// Recolours the current mesh with random colour settings.
    pub fn generate_random_colours<R: Rng>(&mut self, rng: &mut R) -> Result<(), SettingsError> {
        self.update_colour_settings(ColourSettings::random(rng))
    }

    /// Hands every visible face to `surface`. Returns the number of faces sent.
    pub fn present<S: MeshSurface>(&self, surface: &mut S) -> Result<usize, S::Error> {
        let mut count = 0;
        for face in self.visible_faces() {
            surface.receive(face.face(), face.mesh())?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::geometry::{point_on_unit_cube, FaceMask, SphereMapping};
    use crate::noise::{NoiseParams, NoiseSettings};
    use crate::shape::NoiseLayer;

    fn hilly_settings(resolution: u32) -> PlanetSettings {
        PlanetSettings {
            resolution,
            shape: ShapeSettings {
                planet_radius: 1.0,
                noise_layers: vec![
                    NoiseLayer::new(NoiseSettings::Simple(NoiseParams {
                        strength: 0.15,
                        num_layers: 3,
                        base_roughness: 1.2,
                        roughness: 2.0,
                        persistence: 0.5,
                        centre: Vec3::ZERO,
                        min_value: 0.4,
                    })),
                    NoiseLayer::new(NoiseSettings::rigid(NoiseParams {
                        strength: 0.5,
                        num_layers: 2,
                        base_roughness: 2.0,
                        roughness: 2.0,
                        persistence: 0.5,
                        centre: Vec3::new(1.0, 2.0, 3.0),
                        min_value: 0.0,
                    }))
                    .masked(),
                ],
                seed: 5,
            },
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct Collector {
        faces: Vec<(FaceId, usize, usize)>,
    }

    impl MeshSurface for Collector {
        type Error = std::convert::Infallible;

        fn receive(&mut self, face: FaceId, mesh: &TerrainFaceMesh) -> Result<(), Self::Error> {
            self.faces.push((face, mesh.vertex_count(), mesh.triangles.len()));
            Ok(())
        }
    }

    /// Positions of the vertices of `face` lying on the cube edge it shares
    /// with the face whose normal is `neighbour_up`.
    fn shared_edge(face: &TerrainFace, neighbour_up: Vec3) -> Vec<Vec3> {
        face.mesh()
            .vertices
            .iter()
            .filter(|v| {
                let [x, y, _] = v.packed_coord;
                let cube = point_on_unit_cube(face.face(), x as u32, y as u32, face.resolution());
                cube.dot(neighbour_up) > 1.0 - 1e-6
            })
            .map(|v| v.position)
            .collect()
    }

    #[test]
    fn test_faces_close_at_seams() {
        for mapping in [SphereMapping::Normalize, SphereMapping::Spherify] {
            for resolution in [2, 4, 10] {
                let mut planet = Planet::new(PlanetSettings {
                    mapping,
                    ..hilly_settings(resolution)
                })
                .unwrap();
                planet.generate_planet().unwrap();

                let mut pairs = 0;
                for a in FaceId::all() {
                    for b in FaceId::all() {
                        if a.index() >= b.index() || a.local_up().dot(b.local_up()) != 0.0 {
                            continue;
                        }
                        pairs += 1;
                        let edge_a = shared_edge(planet.face(a).unwrap(), b.local_up());
                        let edge_b = shared_edge(planet.face(b).unwrap(), a.local_up());
                        assert_eq!(edge_a.len(), resolution as usize, "{:?}/{:?}", a, b);
                        assert_eq!(edge_b.len(), resolution as usize, "{:?}/{:?}", a, b);

                        for (from, to) in [(&edge_a, &edge_b), (&edge_b, &edge_a)] {
                            for p in from {
                                let partners = to.iter().filter(|q| (*p - **q).length() < 1e-5).count();
                                assert_eq!(
                                    partners, 1,
                                    "{:?} res {}: vertex {:?} on the {:?}/{:?} seam has {} partners",
                                    mapping, resolution, p, a, b, partners
                                );
                            }
                        }
                    }
                }
                assert_eq!(pairs, 12);
            }
        }
    }

    #[test]
    fn test_elevation_percent_spans_unit_interval() {
        let mut planet = Planet::new(hilly_settings(12)).unwrap();
        let report = planet.generate_planet().unwrap();
        assert!(report.is_complete());
        assert_eq!(report.built_count(), 6);

        let range = planet.elevation_range();
        assert_eq!(range, report.elevation);
        assert!(range.max > range.min);

        let mut saw_min = false;
        let mut saw_max = false;
        for face in planet.faces() {
            for v in &face.mesh().vertices {
                assert!((0.0..=1.0).contains(&v.uv.x), "uv.x {} out of range", v.uv.x);
                assert!((0.0..=1.0).contains(&v.uv.y));
                if v.elevation == range.min {
                    assert_eq!(v.uv.x, 0.0);
                    saw_min = true;
                }
                if v.elevation == range.max {
                    assert_eq!(v.uv.x, 1.0);
                    saw_max = true;
                }
            }
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn test_state_transitions() {
        let mut planet = Planet::new(hilly_settings(4)).unwrap();
        assert_eq!(planet.state(), PlanetState::Uninitialized);
        assert!(planet.faces().is_empty());

        planet.initialize().unwrap();
        assert_eq!(planet.state(), PlanetState::Initialized);
        assert_eq!(planet.faces().len(), 6);
        assert!(planet.elevation_range().is_empty());

        planet.generate_mesh();
        assert_eq!(planet.state(), PlanetState::Meshed);

        planet.generate_colours();
        assert_eq!(planet.state(), PlanetState::Coloured);

        planet.initialize().unwrap();
        assert_eq!(planet.state(), PlanetState::Initialized);
        assert!(planet.faces().iter().all(|f| f.mesh().is_empty()));
    }

    #[test]
    fn test_colours_before_mesh_are_harmless() {
        let mut planet = Planet::new(hilly_settings(4)).unwrap();
        planet.initialize().unwrap();
        planet.generate_colours();
        assert_eq!(planet.state(), PlanetState::Initialized);
        assert!(planet.colour_generator().colour_map().is_some());
        assert_eq!(planet.visible_faces().count(), 0);
    }

    #[test]
    fn test_face_mask_builds_single_face() {
        let mut planet = Planet::new(PlanetSettings {
            face_mask: FaceMask::Left,
            ..hilly_settings(5)
        })
        .unwrap();
        let report = planet.generate_planet().unwrap();

        assert_eq!(report.faces.len(), 6);
        assert_eq!(report.built_count(), 1);
        for outcome in &report.faces {
            if outcome.face == FaceId::Left {
                assert_eq!(outcome.status, FaceStatus::Built { vertices: 25, triangles: 32 });
            } else {
                assert_eq!(outcome.status, FaceStatus::Hidden);
            }
        }

        let mut collector = Collector::default();
        assert_eq!(planet.present(&mut collector).unwrap(), 1);
        assert_eq!(collector.faces, vec![(FaceId::Left, 25, 96)]);
    }

    #[test]
    fn test_failed_faces_are_reported_not_fatal() {
        let mut settings = hilly_settings(4);
        settings.shape.planet_radius = f32::MAX;
        settings.shape.noise_layers.truncate(1);
        settings.shape.noise_layers[0].noise.params_mut().min_value = 0.0;
        settings.face_mask = FaceMask::All;

        let mut planet = Planet::new(settings).unwrap();
        let report = planet.generate_planet().unwrap();

        assert_eq!(report.faces.len(), 6);
        assert!(!report.is_complete());
        for (_, err) in report.failures() {
            assert!(matches!(err, MeshError::NonFiniteElevation { .. }));
        }
        let failed = report.failures().count();
        assert_eq!(report.built_count() + failed, 6);
        assert_eq!(planet.visible_faces().count(), report.built_count());
    }

    #[test]
    fn test_report_helpers() {
        let report = GenerationReport {
            faces: vec![
                FaceOutcome { face: FaceId::Top, status: FaceStatus::Built { vertices: 4, triangles: 2 } },
                FaceOutcome { face: FaceId::Bottom, status: FaceStatus::Hidden },
                FaceOutcome {
                    face: FaceId::Left,
                    status: FaceStatus::Failed(MeshError::NonFiniteElevation { x: 0, y: 1, elevation: f32::INFINITY }),
                },
            ],
            elevation: ElevationRange::new(),
        };
        assert_eq!(report.built_count(), 1);
        assert!(!report.is_complete());
        assert_eq!(report.failures().map(|(f, _)| f).collect::<Vec<_>>(), vec![FaceId::Left]);
    }

    #[test]
    fn test_flat_planet_is_all_ocean() {
        let mut planet = Planet::new(PlanetSettings {
            resolution: 4,
            shape: ShapeSettings::flat(2.0),
            ..Default::default()
        })
        .unwrap();
        planet.generate_planet().unwrap();

        let ocean_top = planet.settings().colour.ocean_colour.evaluate(1.0);
        for face in planet.visible_faces() {
            for v in &face.mesh().vertices {
                assert_eq!(v.uv.x, 0.0);
                assert!((v.colour - ocean_top).length() < 1e-6);
            }
        }
    }

    #[test]
    fn test_colour_update_keeps_geometry() {
        let mut planet = Planet::new(hilly_settings(6)).unwrap();
        planet.generate_planet().unwrap();
        let positions: Vec<_> = planet.faces().iter().map(|f| f.mesh().positions()).collect();
        let range = planet.elevation_range();

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        planet.generate_random_colours(&mut rng).unwrap();

        assert_eq!(planet.state(), PlanetState::Coloured);
        assert_eq!(planet.elevation_range(), range);
        assert_eq!(planet.colour_generator().elevation_range(), range);
        let after: Vec<_> = planet.faces().iter().map(|f| f.mesh().positions()).collect();
        assert_eq!(after, positions);
        assert_eq!(planet.settings().colour.biomes.len(), 3);
    }

    #[test]
    fn test_invalid_regenerate_keeps_previous_planet() {
        let mut planet = Planet::new(hilly_settings(4)).unwrap();
        planet.generate_planet().unwrap();

        let bad = PlanetSettings {
            resolution: 1,
            ..hilly_settings(4)
        };
        assert!(matches!(planet.regenerate(bad), Err(SettingsError::InvalidResolution(1))));
        assert_eq!(planet.settings().resolution, 4);
        assert_eq!(planet.state(), PlanetState::Coloured);
        assert_eq!(planet.visible_faces().count(), 6);

        let mut colour = ColourSettings::default();
        colour.biomes.reverse();
        assert!(planet.update_colour_settings(colour).is_err());
        assert_eq!(planet.settings().colour, ColourSettings::default());
    }

    #[test]
    fn test_shape_update_regenerates_mesh() {
        let mut planet = Planet::new(hilly_settings(4)).unwrap();
        planet.generate_planet().unwrap();

        let report = planet.update_shape_settings(ShapeSettings::flat(3.0)).unwrap();
        assert_eq!(report.elevation, ElevationRange { min: 3.0, max: 3.0 });
        for face in planet.visible_faces() {
            for v in &face.mesh().vertices {
                assert!((v.position.length() - 3.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_random_shape_uses_resolution_100() {
        let mut planet = Planet::new(PlanetSettings {
            face_mask: FaceMask::Top,
            ..Default::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let report = planet.generate_random_shape(&mut rng).unwrap();

        assert_eq!(planet.settings().resolution, 100);
        assert_eq!(planet.settings().shape.planet_radius, 10.0);
        assert_eq!(report.built_count(), 1);
        assert_eq!(planet.face(FaceId::Top).unwrap().mesh().vertex_count(), 100 * 100);
    }

    #[test]
    fn test_generation_is_reproducible() {
        let mut a = Planet::new(hilly_settings(6)).unwrap();
        let mut b = Planet::new(hilly_settings(6)).unwrap();
        a.generate_planet().unwrap();
        b.generate_planet().unwrap();
        for (fa, fb) in a.faces().iter().zip(b.faces()) {
            assert_eq!(fa.mesh().positions(), fb.mesh().positions());
            assert_eq!(fa.mesh().uvs(), fb.mesh().uvs());
        }
    }
}
