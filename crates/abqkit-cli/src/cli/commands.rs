use super::CliError;
use super::helpers::{parse_layer, run_plot_script};
use abqkit_core::common::config::{
    DensityChoice, EdgeSelection, ProfileGeometry, ReportMode, RunConfig,
};
use abqkit_core::domain::{ToolModule, ToolRequest};
use abqkit_core::modules::execute_tool;
use abqkit_core::modules::naming::{default_template_path, next_iteration_path, tagged_output_path};
use abqkit_core::modules::prestress::check_file_order;
use abqkit_core::modules::serialization::format_c_exponent;
use abqkit_core::modules::thermal_profile::ThermalProfileModule;
use abqkit_core::numerics::{ElasticConstants, Layer, LayeredSphere, SelfCompression};
use anyhow::Context;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct SphereArgs {
    /// Layer as OUTER_RADIUS:DENSITY (m, kg/m^3), innermost first; repeat per layer
    #[arg(long = "layer", value_name = "R:RHO", value_parser = parse_layer)]
    layers: Vec<Layer>,

    /// Young's modulus shared by all layers (Pa)
    #[arg(short = 'E', long, default_value_t = 1.0e10)]
    youngs_modulus: f64,

    /// Poisson's ratio shared by all layers
    #[arg(short = 's', long, default_value_t = 0.25, allow_negative_numbers = true)]
    poisson_ratio: f64,

    /// Radius to evaluate (m); defaults to the surface
    #[arg(short, long, conflicts_with = "samples")]
    radius: Option<f64>,

    /// Print a profile of N evenly spaced radii from center to surface
    #[arg(long, value_name = "N")]
    samples: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct LoadsArgs {
    /// Input file carrying the no-load tag (e.g. model_noload.inp)
    input: PathBuf,

    /// Output file; defaults to the input name with the tag replaced
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct MattableArgs {
    /// Input file carrying the no-material tag (e.g. model_nomat.inp)
    input: PathBuf,

    /// Material table: header line, then NAME DEPTH T_I DENS_I T_F DENS_F ALPHA_L
    table: PathBuf,

    /// Output file; defaults to the input name with the tag replaced
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Density written into each *Density block (initial, final, average)
    #[arg(long, value_name = "CHOICE")]
    material_density: Option<DensityChoice>,

    /// Density used for the gravity body loads (initial, final, average)
    #[arg(long, value_name = "CHOICE")]
    gravity_density: Option<DensityChoice>,

    /// Do not write gravity body loads
    #[arg(long)]
    no_loads: bool,

    /// Skip loads on pool, cap and annulus materials
    #[arg(long)]
    geoid: bool,

    /// Assembly instance that qualifies the load sets
    #[arg(long, value_name = "NAME")]
    assembly: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct TemplateArgs {
    /// Model input file to list materials from
    input: PathBuf,

    /// Output file; defaults to <model>_mat_noalpha.txt next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct PrestressArgs {
    /// Input file of the current iteration (e.g. model_ps0.inp)
    input: PathBuf,

    /// Stress report of the current iteration (e.g. model_ps0.rpt)
    report: PathBuf,

    /// Report layout (flat, curved, threedee)
    #[arg(short, long, value_name = "MODE")]
    mode: Option<ReportMode>,

    /// Iteration tag prefix in the file names
    #[arg(long, value_name = "PREFIX")]
    tag_prefix: Option<String>,

    /// Output file; defaults to the input name with the next iteration tag
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct ThermprofileArgs {
    /// Nodal temperature report with columns COORD1, COORD2, NT
    report: PathBuf,

    /// Model geometry (flat, curved)
    #[arg(short, long, value_name = "GEOMETRY")]
    geometry: Option<ProfileGeometry>,

    /// Profiles handed to the plot script (all, left, right, edges)
    #[arg(long, value_name = "EDGES")]
    selection: Option<EdgeSelection>,

    /// Directory for the .thermprofile files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Basin depth added to left-edge depths (m)
    #[arg(long, allow_negative_numbers = true)]
    basin_depth: Option<f64>,

    /// Surface radius of a curved model (m)
    #[arg(long)]
    planet_radius: Option<f64>,

    /// Angle of the right edge of a curved model (rad)
    #[arg(long, allow_negative_numbers = true)]
    rightside_angle: Option<f64>,

    /// Distance to the right edge of a flat model (m)
    #[arg(long)]
    rightside_distance: Option<f64>,

    /// Script invoked as <script> <plot-name> <profile files...>
    #[arg(long, value_name = "SCRIPT")]
    plot_script: Option<PathBuf>,

    /// First argument for the plot script; defaults to the report path
    #[arg(long, value_name = "NAME")]
    plot_name: Option<String>,
}

pub(super) fn run_sphere_command(args: SphereArgs) -> Result<i32, CliError> {
    let layers = if args.layers.is_empty() {
        vec![Layer::new(10.0, 1000.0)]
    } else {
        args.layers
    };
    let elastic = ElasticConstants::new(args.youngs_modulus, args.poisson_ratio)
        .map_err(|error| CliError::Tool(error.into()))?;
    let sphere = LayeredSphere::new(layers, elastic).map_err(|error| CliError::Tool(error.into()))?;
    tracing::debug!(
        layers = sphere.layers().len(),
        radius = sphere.radius(),
        total_mass = sphere.total_mass(),
        "built layered sphere"
    );

    if let Some(samples) = args.samples {
        let rows = sphere
            .profile(samples)
            .map_err(|error| CliError::Tool(error.into()))?;
        if args.json {
            let text = serde_json::to_string_pretty(&rows)
                .context("failed to serialize sphere profile")?;
            println!("{text}");
        } else {
            print!("{}", render_profile_table(&rows));
        }
        return Ok(0);
    }

    let radius = args.radius.unwrap_or_else(|| sphere.radius());
    let result = sphere
        .evaluate(radius)
        .map_err(|error| CliError::Tool(error.into()))?;
    if args.json {
        let text =
            serde_json::to_string_pretty(&result).context("failed to serialize sphere result")?;
        println!("{text}");
    } else {
        println!("u = {} m", format_c_exponent(result.displacement, 5));
        println!("g = {} m.s-2", format_c_exponent(result.local_gravity, 5));
    }
    Ok(0)
}

fn render_profile_table(rows: &[SelfCompression]) -> String {
    let mut table = format!(
        "{:>14} {:>14} {:>14} {:>14}\n",
        "r_m", "mass_kg", "g_m.s-2", "u_m"
    );
    for row in rows {
        table.push_str(&format!(
            "{:>14} {:>14} {:>14} {:>14}\n",
            format_c_exponent(row.radius, 5),
            format_c_exponent(row.enclosed_mass, 5),
            format_c_exponent(row.local_gravity, 5),
            format_c_exponent(row.displacement, 5),
        ));
    }
    table
}

pub(super) fn run_loads_command(args: LoadsArgs, config: RunConfig) -> Result<i32, CliError> {
    let output = match args.output {
        Some(output) => output,
        None => tagged_output_path(
            &args.input,
            &config.gravity_loads.input_tag,
            &config.gravity_loads.output_tag,
        )?,
    };
    let request = ToolRequest::new(ToolModule::GravityLoads, &args.input, output);
    run_tool(&request, &config)
}

pub(super) fn run_mattable_command(args: MattableArgs, mut config: RunConfig) -> Result<i32, CliError> {
    let settings = &mut config.material_table;
    if let Some(choice) = args.material_density {
        settings.material_density = choice;
    }
    if let Some(choice) = args.gravity_density {
        settings.gravity_density = choice;
    }
    if args.no_loads {
        settings.write_loads = false;
    }
    if args.geoid {
        settings.geoid_mode = true;
    }
    if let Some(assembly) = args.assembly {
        settings.assembly_name = assembly;
    }

    let output = match args.output {
        Some(output) => output,
        None => tagged_output_path(&args.input, &settings.input_tag, &settings.output_tag)?,
    };
    let request = ToolRequest::new(ToolModule::MaterialTable, &args.input, output)
        .with_companion(&args.table);
    run_tool(&request, &config)
}

pub(super) fn run_template_command(args: TemplateArgs, config: RunConfig) -> Result<i32, CliError> {
    let output = match args.output {
        Some(output) => output,
        None => default_template_path(&args.input)?,
    };
    let request = ToolRequest::new(ToolModule::MaterialTemplate, &args.input, output);
    run_tool(&request, &config)
}

pub(super) fn run_prestress_command(args: PrestressArgs, mut config: RunConfig) -> Result<i32, CliError> {
    if let Some(mode) = args.mode {
        config.prestress.mode = mode;
    }
    if let Some(prefix) = args.tag_prefix {
        config.prestress.tag_prefix = prefix;
    }
    check_file_order(&args.input, &args.report)?;

    let output = match args.output {
        Some(output) => output,
        None => next_iteration_path(&args.input, &args.report, &config.prestress.tag_prefix)?,
    };
    tracing::info!(mode = %config.prestress.mode, "processing stress report");
    let request = ToolRequest::new(ToolModule::Prestress, &args.input, output)
        .with_companion(&args.report);
    run_tool(&request, &config)
}

pub(super) fn run_thermprofile_command(
    args: ThermprofileArgs,
    mut config: RunConfig,
) -> Result<i32, CliError> {
    let settings = &mut config.thermal_profile;
    if let Some(geometry) = args.geometry {
        settings.geometry = geometry;
    }
    if let Some(selection) = args.selection {
        settings.selection = selection;
    }
    if let Some(depth) = args.basin_depth {
        settings.basin_depth = depth;
    }
    if let Some(radius) = args.planet_radius {
        settings.planet_radius = radius;
    }
    if let Some(angle) = args.rightside_angle {
        settings.rightside_angle = angle;
    }
    if let Some(distance) = args.rightside_distance {
        settings.rightside_distance = distance;
    }
    if let Some(script) = args.plot_script {
        settings.plot_script = Some(script);
    }

    let request = ToolRequest::new(ToolModule::ThermalProfile, &args.report, &args.output_dir);
    run_tool(&request, &config)?;

    if let Some(script) = &config.thermal_profile.plot_script {
        let module = ThermalProfileModule::new(config.thermal_profile.clone());
        let plot_name = args
            .plot_name
            .unwrap_or_else(|| args.report.display().to_string());
        run_plot_script(script, &plot_name, &module.profile_paths(&args.output_dir))?;
    }
    Ok(0)
}

fn run_tool(request: &ToolRequest, config: &RunConfig) -> Result<i32, CliError> {
    let artifacts = execute_tool(request, config)?;
    for artifact in artifacts {
        println!("wrote {}", artifact.path.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::render_profile_table;
    use abqkit_core::numerics::{ElasticConstants, LayeredSphere};

    #[test]
    fn profile_table_has_header_and_one_row_per_sample() {
        let elastic = ElasticConstants::new(1.0e10, 0.25).expect("valid constants");
        let sphere = LayeredSphere::uniform(10.0, 1000.0, elastic).expect("valid sphere");
        let rows = sphere.profile(3).expect("profile should evaluate");

        let table = render_profile_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("r_m"));
        assert!(lines[3].ends_with("-2.79553e-12"));
    }
}
