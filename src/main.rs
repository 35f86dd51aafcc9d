//! Planetgen CLI - procedural cube-sphere planet generator.
//!
//! Generates a planet from a settings file or random settings and exports the
//! meshes as OBJ plus PNG elevation and colour maps.

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use planetgen::export::{export_planet_obj, export_planet_png, PngExportOptions};
use planetgen::geometry::{FaceMask, SphereMapping};
use planetgen::noise::NoiseSettings;
use planetgen::settings::{PlanetSettings, MAX_RESOLUTION, MIN_RESOLUTION};
use planetgen::terrain::{FaceStatus, Planet};

/// Procedural cube-sphere planet generator.
#[derive(Parser)]
#[command(name = "planetgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a planet and export it.
    Generate {
        /// Settings file (JSON). Missing fields take their defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Vertices per face edge (2-256). Overrides the settings file.
        #[arg(short, long)]
        resolution: Option<u32>,

        /// Generate only one face.
        #[arg(long, default_value = "all")]
        face: FaceArg,

        /// Cube-to-sphere projection.
        #[arg(long, default_value = "normalize")]
        mapping: MappingArg,

        /// Replace the shape with random settings (resolution becomes 100).
        #[arg(long)]
        random_shape: bool,

        /// Replace the colouring with random settings.
        #[arg(long)]
        random_colours: bool,

        /// Random seed for reproducible random settings.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "planet")]
        name: String,

        /// Also write the final settings as JSON.
        #[arg(long)]
        save_settings: bool,
    },

    /// Display a summary of a planet configuration.
    Info {
        /// Settings file (JSON). Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FaceArg {
    All,
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl From<FaceArg> for FaceMask {
    fn from(arg: FaceArg) -> Self {
        match arg {
            FaceArg::All => FaceMask::All,
            FaceArg::Top => FaceMask::Top,
            FaceArg::Bottom => FaceMask::Bottom,
            FaceArg::Left => FaceMask::Left,
            FaceArg::Right => FaceMask::Right,
            FaceArg::Front => FaceMask::Front,
            FaceArg::Back => FaceMask::Back,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MappingArg {
    /// Normalize cube points onto the sphere.
    Normalize,
    /// Analytical mapping with more even cell sizes.
    Spherify,
}

impl From<MappingArg> for SphereMapping {
    fn from(arg: MappingArg) -> Self {
        match arg {
            MappingArg::Normalize => SphereMapping::Normalize,
            MappingArg::Spherify => SphereMapping::Spherify,
        }
    }
}

struct GenerateArgs {
    config: Option<PathBuf>,
    resolution: Option<u32>,
    face: FaceArg,
    mapping: MappingArg,
    random_shape: bool,
    random_colours: bool,
    seed: Option<u64>,
    output: PathBuf,
    name: String,
    save_settings: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            resolution,
            face,
            mapping,
            random_shape,
            random_colours,
            seed,
            output,
            name,
            save_settings,
        } => {
            run_generate(GenerateArgs {
                config,
                resolution,
                face,
                mapping,
                random_shape,
                random_colours,
                seed,
                output,
                name,
                save_settings,
            });
        }
        Commands::Info { config } => {
            run_info(config.as_deref());
        }
    }
}

fn load_settings(config: Option<&Path>) -> PlanetSettings {
    match config {
        Some(path) => PlanetSettings::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => PlanetSettings::default(),
    }
}

fn run_generate(args: GenerateArgs) {
    let mut settings = load_settings(args.config.as_deref());
    if let Some(resolution) = args.resolution {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
            eprintln!(
                "Error: Resolution must be between {} and {}",
                MIN_RESOLUTION, MAX_RESOLUTION
            );
            std::process::exit(1);
        }
        settings.resolution = resolution;
    }
    settings.face_mask = args.face.into();
    settings.mapping = args.mapping.into();

    // Generate seed if not provided
    let seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("Planetgen - Procedural Planet Generator");
    println!("=======================================");
    println!("Output: {}", args.output.display());
    if args.random_shape || args.random_colours {
        println!("Seed: {}", seed);
    }

    let start = Instant::now();
    let mut planet = Planet::new(settings).unwrap_or_else(|e| {
        eprintln!("Error: invalid settings: {}", e);
        std::process::exit(1);
    });

    println!("\nGenerating planet...");
    let generated = if args.random_shape {
        println!("  Shape: random");
        planet.generate_random_shape(&mut rng)
    } else {
        planet.generate_planet()
    };
    let report = generated.unwrap_or_else(|e| {
        eprintln!("Error during generation: {}", e);
        std::process::exit(1);
    });

    if args.random_colours {
        println!("  Colours: random");
        if let Err(e) = planet.generate_random_colours(&mut rng) {
            eprintln!("Error generating colours: {}", e);
            std::process::exit(1);
        }
    }

    for outcome in &report.faces {
        match &outcome.status {
            FaceStatus::Built { vertices, triangles } => println!(
                "  {:<7} {} vertices, {} triangles",
                outcome.face.short_name(),
                vertices,
                triangles
            ),
            FaceStatus::Hidden => println!("  {:<7} hidden", outcome.face.short_name()),
            FaceStatus::Failed(e) => println!("  {:<7} FAILED: {}", outcome.face.short_name(), e),
        }
    }
    println!("Generation completed in {:.2?}", start.elapsed());
    println!(
        "Elevation range: [{:.4}, {:.4}]",
        report.elevation.min, report.elevation.max
    );

    if report.built_count() == 0 {
        eprintln!("Error: no face was built");
        std::process::exit(1);
    }

    println!("\nExporting...");
    let export_start = Instant::now();
    if let Err(e) = std::fs::create_dir_all(&args.output) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }

    let obj_path = args.output.join(format!("{}.obj", args.name));
    match export_planet_obj(&planet, &obj_path) {
        Ok(count) => println!("  Exported {} faces: {}", count, obj_path.display()),
        Err(e) => {
            eprintln!("Error exporting OBJ: {}", e);
            std::process::exit(1);
        }
    }

    match export_planet_png(&planet, &args.output, &args.name, &PngExportOptions::default()) {
        Ok(paths) => println!("  Exported {} PNG files: {}_*.png", paths.len(), args.name),
        Err(e) => {
            eprintln!("Error exporting PNG: {}", e);
            std::process::exit(1);
        }
    }

    if args.save_settings {
        let path = args.output.join(format!("{}.json", args.name));
        if let Err(e) = planet.settings().save(&path) {
            eprintln!("Error saving settings: {}", e);
            std::process::exit(1);
        }
        println!("  Saved settings: {}", path.display());
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_info(config: Option<&Path>) {
    let settings = load_settings(config);
    if let Err(e) = settings.validate() {
        eprintln!("Warning: settings are invalid: {}", e);
    }

    let resolution = settings.resolution as u64;
    let faces = if settings.face_mask == FaceMask::All { 6 } else { 1 };
    let vertices = resolution * resolution * faces;
    let cells = resolution.saturating_sub(1);
    let triangles = cells * cells * 2 * faces;

    println!("Planetgen - Planet Configuration Info");
    println!("=====================================");
    println!();
    println!("Resolution: {}x{} vertices per face", resolution, resolution);
    println!("Faces:      {}", faces);
    println!("Mapping:    {:?}", settings.mapping);
    println!("Vertices:   {:>10}", vertices);
    println!("Triangles:  {:>10}", triangles);
    println!();
    println!("Shape:");
    println!("  Radius: {}", settings.shape.planet_radius);
    println!("  Seed:   {}", settings.shape.seed);
    for (i, layer) in settings.shape.noise_layers.iter().enumerate() {
        let params = layer.noise.params();
        let extra = match &layer.noise {
            NoiseSettings::Rigid { weight_multiplier, .. } => format!(", weight {}", weight_multiplier),
            NoiseSettings::Simple(_) => String::new(),
        };
        println!(
            "  Layer {}: {}{}{}, strength {}, {} octaves, min {}{}",
            i,
            layer.noise.kind_name(),
            if layer.enabled { "" } else { " (disabled)" },
            if layer.use_first_layer_as_mask { " masked" } else { "" },
            params.strength,
            params.num_layers,
            params.min_value,
            extra
        );
    }
    println!();
    println!("Colour:");
    println!("  Blend:  {}", settings.colour.blend_amount);
    println!("  Biomes: {}", settings.colour.biomes.len());
    for (i, biome) in settings.colour.biomes.iter().enumerate() {
        println!(
            "  Biome {}: start {:.3}, tint {:.0}%",
            i,
            biome.start_height,
            biome.tint_percent * 100.0
        );
    }
}
