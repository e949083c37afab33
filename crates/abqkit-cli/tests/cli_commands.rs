use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn abqkit(args: &[&str], working_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_abqkit"))
        .args(args)
        .current_dir(working_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("abqkit should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const NOLOAD_MODEL: &str = "\
*Part, name=master
*Solid Section, elset=CRUST000, material=CRUST000
*End Part
*Instance, name=master-1, part=master
*End Instance
*Material, name=CRUST000
*Density
 2550.,
** OUTPUT REQUESTS
*Output, field
";

#[test]
fn sphere_defaults_to_the_reference_sphere() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = abqkit(&["sphere"], temp.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "u = -2.79553e-12 m\ng = 2.79553e-06 m.s-2\n");
}

#[test]
fn sphere_accepts_layers_and_json_profiles() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = abqkit(
        &[
            "sphere",
            "--layer",
            "350e3:7000",
            "--layer",
            "1740e3:3300",
            "-E",
            "1e11",
            "--samples",
            "5",
            "--json",
        ],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let rows: Value = serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    let rows = rows.as_array().expect("profile should be an array");
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["displacement"], 0.0);
    assert_eq!(rows[4]["radius"], 1.74e6);
    assert_eq!(rows[4]["layerIndex"], 1);
}

#[test]
fn sphere_domain_errors_exit_with_input_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = abqkit(&["sphere", "--radius", "11"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    let diagnostics = stderr(&output);
    assert!(diagnostics.contains("ERROR: [INPUT.SPHERE_DOMAIN]"), "{diagnostics}");
    assert!(diagnostics.contains("FATAL EXIT CODE: 2"));
}

#[test]
fn loads_writes_the_untagged_file() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("ori_noload.inp"), NOLOAD_MODEL).expect("input written");

    let output = abqkit(&["loads", "ori_noload.inp"], temp.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = fs::read_to_string(temp.path().join("ori.inp")).expect("output should exist");
    assert!(written.contains("master-1.CRUST000, BRNU, 2550.000000\n"));
    assert!(stdout(&output).contains("ori.inp"));
}

#[test]
fn loads_refuses_input_without_tag() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("ori.inp"), NOLOAD_MODEL).expect("input written");

    let output = abqkit(&["loads", "ori.inp"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("INPUT.OUTPUT_NAME"));
    let untouched = fs::read_to_string(temp.path().join("ori.inp")).expect("input kept");
    assert_eq!(untouched, NOLOAD_MODEL);
}

#[test]
fn mattable_flags_override_the_config_file() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(
        temp.path().join("ori_nomat.inp"),
        "*Material, name=CRUST000\n*Density\n 42.42,\n** LOADS\n",
    )
    .expect("input written");
    fs::write(
        temp.path().join("table.txt"),
        "Region Depth Temp_i Dens_i Temp_f Dens_f Alpha_l\nCRUST000 0 250 2550 250 2650 3e-5\n",
    )
    .expect("table written");
    fs::write(
        temp.path().join("run.json"),
        r#"{ "materialTable": { "assemblyName": "orientale-1", "materialDensity": "final" } }"#,
    )
    .expect("config written");

    let output = abqkit(
        &[
            "--config",
            "run.json",
            "mattable",
            "ori_nomat.inp",
            "table.txt",
            "--gravity-density",
            "average",
        ],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = fs::read_to_string(temp.path().join("ori.inp")).expect("output should exist");
    assert!(written.contains("*Density\n    2650.000000,\n"));
    assert!(written.contains("orientale-1.CRUST000, BZNU, 2600.000000\n"));
}

#[test]
fn template_then_prestress_iteration() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(
        temp.path().join("oriC12_ps0.inp"),
        "*Material, name=CRUST000\n*Material, name=MANTLE050\n** STEP: Step-1\n",
    )
    .expect("input written");
    fs::write(
        temp.path().join("oriC12_ps0.rpt"),
        "Field Output reported at integration points for part: MASTER-1\n  4  -3.0E+04\n",
    )
    .expect("report written");

    let output = abqkit(&["mattable-template", "oriC12_ps0.inp"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let template = fs::read_to_string(temp.path().join("oriC12_mat_noalpha.txt"))
        .expect("template should exist");
    assert_eq!(template.lines().count(), 3);

    let output = abqkit(&["-v", "prestress", "oriC12_ps0.inp", "oriC12_ps0.rpt"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = fs::read_to_string(temp.path().join("oriC12_ps1.inp"))
        .expect("next iteration should exist");
    assert!(written.contains("MASTER-1.    4,             -30000,"));

    let output = abqkit(&["prestress", "oriC12_ps0.rpt", "oriC12_ps0.inp"], temp.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("INPUT.PRESTRESS_ORDER"));
}

#[test]
fn thermprofile_writes_profiles_into_output_dir() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(
        temp.path().join("ori.NTrpt"),
        "  1  0.  -1000.  300.\n  2  2.7E+06  -1000.  310.\n  3  5.0E+05  -1000.  320.\n",
    )
    .expect("report written");

    let output = abqkit(
        &[
            "thermprofile",
            "ori.NTrpt",
            "--geometry",
            "flat",
            "--output-dir",
            "profiles",
        ],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let profiles = temp.path().join("profiles");
    assert_eq!(
        fs::read_to_string(profiles.join("edgeleft.thermprofile")).expect("left exists"),
        "    300.000000    7000.000000\n"
    );
    assert_eq!(
        fs::read_to_string(profiles.join("edgeright.thermprofile")).expect("right exists"),
        "    310.000000   -1000.000000\n"
    );
    assert_eq!(
        fs::read_to_string(profiles.join("middle.thermprofile")).expect("middle exists"),
        "    320.000000   -1000.000000\n"
    );
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("script written");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("script made executable");
    path
}

#[cfg(unix)]
#[test]
fn plot_script_receives_name_then_selected_profiles() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(
        temp.path().join("ori.NTrpt"),
        "  1  0.  -1000.  300.\n  2  2.7E+06  -1000.  310.\n",
    )
    .expect("report written");
    let args_file = temp.path().join("plot_args.txt");
    let script = write_script(
        temp.path(),
        "plot.sh",
        &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
    );

    let output = abqkit(
        &[
            "thermprofile",
            "ori.NTrpt",
            "--geometry",
            "flat",
            "--output-dir",
            "profiles",
            "--selection",
            "edges",
            "--plot-name",
            "basin",
            "--plot-script",
            script.to_str().expect("utf-8 temp path"),
        ],
        temp.path(),
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&args_file).expect("script ran"),
        "basin\nprofiles/edgeleft.thermprofile\nprofiles/edgeright.thermprofile\n"
    );
}

#[cfg(unix)]
#[test]
fn failing_plot_script_is_a_computation_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::write(temp.path().join("ori.NTrpt"), "  1  0.  -1000.  300.\n").expect("report written");
    let script = write_script(temp.path(), "plot.sh", "exit 1");

    let output = abqkit(
        &[
            "thermprofile",
            "ori.NTrpt",
            "--geometry",
            "flat",
            "--plot-script",
            script.to_str().expect("utf-8 temp path"),
        ],
        temp.path(),
    );

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("RUN.PLOT_SCRIPT"));
    assert!(temp.path().join("edgeleft.thermprofile").is_file());
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = abqkit(&["compress"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("INPUT.CLI_USAGE"));
}

#[test]
fn help_exits_cleanly() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = abqkit(&["--help"], temp.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("thermprofile"));
}
