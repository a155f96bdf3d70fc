use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use log::{debug, info, LevelFilter};
use modus::{
    lattice_to_svg, run_ticks, timed, Cell, CellAddr, Grid, HexLattice,
    KnightScene, LatticeKind, Match3Scene, ModusConfig, Palette, Point2,
    RenderResources, SceneKind, SquareLattice,
};
use serde::Serialize;
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString};
use validator::Validate;

/// CLI for building Miracle Modus lattices, running scenes on them, and
/// dumping snapshots of the result.
#[derive(Debug, StructOpt)]
#[structopt(name = "modus")]
struct Opt {
    /// Path to a config file that defines the lattice and scene. Supported
    /// formats: JSON, TOML. Any of the flags below override values from the
    /// file.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Lattice topology: square, hex
    #[structopt(short, long)]
    kind: Option<LatticeKind>,

    /// Canvas width, in pixels
    #[structopt(long)]
    canvas_width: Option<u32>,

    /// Canvas height, in pixels
    #[structopt(long)]
    canvas_height: Option<u32>,

    /// Desired number of columns. May be reduced to fit the index ceiling.
    #[structopt(long)]
    columns: Option<u32>,

    /// Render variant, selects the ring preset each cell is drawn with
    #[structopt(long)]
    render_variant: Option<u8>,

    /// Scene to run on the lattice: none, knights, match3
    #[structopt(long)]
    scene: Option<SceneKind>,

    /// Number of scene ticks to run before writing output
    #[structopt(short, long)]
    ticks: Option<u32>,

    /// RNG seed for the scene
    #[structopt(long)]
    seed: Option<u64>,

    /// Number of knights, for the knights scene
    #[structopt(long, default_value = "3")]
    knights: usize,

    /// Name of the palette to paint with
    #[structopt(long, default_value = "rainbow")]
    palette: String,

    /// Maximum number of indices the host surface can draw at once
    #[structopt(long, default_value = "65535")]
    max_indices: usize,

    /// If given, snapshots of the lattice will be saved to this directory.
    /// The exact files that appear in the directory are defined by the output
    /// formats. See `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the lattice in. Supported formats:
    ///
    /// cfg - The full config used for the lattice, in TOML format
    ///
    /// json - Every cell's address, pixel center and payload
    ///
    /// svg - 2D rendering of the lattice
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the full config in a human-readable file
    Cfg,
    /// Export every cell in JSON
    Json,
    /// Render the lattice as a 2D SVG
    Svg,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Cfg => "toml",
            Self::Json => "json",
            Self::Svg => "svg",
        }
    }
}

/// Everything an output format might need to look at
struct Snapshot<'a, G> {
    config: &'a ModusConfig,
    resources: &'a RenderResources,
    palette: &'a Palette,
    grid: &'a G,
}

/// One cell in the JSON output
#[derive(Serialize)]
struct CellRecord<'a> {
    addr: CellAddr,
    center: Point2,
    #[serde(flatten)]
    cell: &'a Cell,
}

fn load_config(config_path: &Path) -> anyhow::Result<ModusConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Load the config file (if any), then apply overrides from the command line
fn build_config(opt: &Opt) -> anyhow::Result<ModusConfig> {
    let mut config = match &opt.config {
        Some(config_path) => load_config(config_path)?,
        None => ModusConfig::default(),
    };
    if let Some(kind) = opt.kind {
        config.kind = kind;
    }
    if let Some(canvas_width) = opt.canvas_width {
        config.lattice.canvas_width = canvas_width;
    }
    if let Some(canvas_height) = opt.canvas_height {
        config.lattice.canvas_height = canvas_height;
    }
    if let Some(columns) = opt.columns {
        config.lattice.columns = columns;
    }
    if let Some(render_variant) = opt.render_variant {
        config.lattice.render_variant = render_variant;
    }
    if let Some(scene) = opt.scene {
        config.scene = scene;
    }
    if let Some(ticks) = opt.ticks {
        config.ticks = ticks;
    }
    if let Some(seed) = opt.seed {
        config.seed = seed;
    }
    config.validate().context("invalid config")?;
    Ok(config)
}

/// Generate an output form of the lattice in the given format.
fn gen_output<G: Grid<Cell = Cell>>(
    output_dir: &Path,
    output_format: OutputFormat,
    snapshot: &Snapshot<G>,
) -> anyhow::Result<()> {
    fn generate_bytes<G: Grid<Cell = Cell>>(
        output_format: OutputFormat,
        snapshot: &Snapshot<G>,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(match output_format {
            OutputFormat::Cfg => toml::to_string_pretty(snapshot.config)
                .context("error serializing config")?
                .into_bytes(),
            OutputFormat::Json => {
                let grid = snapshot.grid;
                let cells: Vec<CellRecord> = (0..grid.width())
                    .flat_map(|x| {
                        (0..grid.height()).map(move |y| CellAddr::new(x, y))
                    })
                    .map(|addr| CellRecord {
                        addr,
                        center: grid.center_for(addr),
                        cell: grid.at(addr),
                    })
                    .collect();
                serde_json::to_vec(&cells).context("error serializing cells")?
            }
            OutputFormat::Svg => lattice_to_svg(
                snapshot.grid,
                &snapshot.config.lattice,
                snapshot.resources,
                snapshot.palette,
            )
            .to_string()
            .into_bytes(),
        })
    }

    let output_file_path = output_dir
        .join("lattice")
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = generate_bytes(output_format, snapshot)?;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Run the configured scene on a lattice, then write out whatever outputs
/// were asked for
fn run_lattice<G: Grid<Cell = Cell>>(
    opt: &Opt,
    config: &ModusConfig,
    resources: &RenderResources,
    palette: &Palette,
    grid: &mut G,
) -> anyhow::Result<()> {
    info!(
        "{} lattice: {}x{} cells, {} indices",
        config.kind,
        grid.width(),
        grid.height(),
        grid.index_count()
    );
    if config.scene == SceneKind::Knights {
        let mut scene =
            KnightScene::new(grid, opt.knights, palette.len(), config.seed);
        run_ticks(&mut scene, grid, config.ticks)?;
    }

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = &opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(output_dir)?;

        let snapshot = Snapshot {
            config,
            resources,
            palette,
            grid: &*grid,
        };
        for output_format in &opt.output_formats {
            gen_output(output_dir, *output_format, &snapshot)?;
        }
    }

    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let config = build_config(&opt)?;
    let resources = RenderResources::new(opt.max_indices)
        .context("invalid render resources")?;
    let palette = Palette::named(&opt.palette)
        .ok_or_else(|| anyhow!("unknown palette {:?}", opt.palette))?;
    info!("Seed: {}", config.seed);
    if let Some(slot) = resources.ring_slot(config.lattice.render_variant) {
        debug!(
            "Render variant {} uses atlas slot {:?}",
            config.lattice.render_variant, slot
        );
    }

    match config.kind {
        LatticeKind::Square => {
            if config.scene == SceneKind::Match3 {
                bail!("the match3 scene only runs on a hex lattice");
            }
            let mut grid = timed!(
                "Lattice construction",
                log::Level::Info,
                SquareLattice::new(&config.lattice, &resources, |_| {
                    Cell::default()
                })
            )?;
            run_lattice(&opt, &config, &resources, &palette, &mut grid)
        }
        LatticeKind::Hex => {
            let mut grid = timed!(
                "Lattice construction",
                log::Level::Info,
                HexLattice::new(&config.lattice, &resources, |_| {
                    Cell::default()
                })
            )?;
            if config.scene == SceneKind::Match3 {
                let mut scene =
                    Match3Scene::new(&mut grid, palette.len(), config.seed);
                run_ticks(&mut scene, &mut grid, config.ticks)?;
            }
            run_lattice(&opt, &config, &resources, &palette, &mut grid)
        }
    }
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
