//! # Culvert CLI
//!
//! Prints the buoyancy report for a project and writes its section and
//! buoyancy drawings as SVG and DXF.
//!
//! ```text
//! culvert_cli [PROJECT.culv] [OUTPUT_DIR]
//! ```
//!
//! Without a project file the default three-cell culvert is used. Output goes
//! to the current directory unless `OUTPUT_DIR` is given. Set `RUST_LOG` to
//! change log verbosity.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use culvert_core::drawing::DrawingMode;
use culvert_core::file_io::{export_drawing, load_project_with_lock_check};
use culvert_core::render::ExportFormat;
use culvert_core::{generate_report, CulvertError, CulvertResult, Project};

const OUTPUTS: [(DrawingMode, &str); 2] = [(DrawingMode::Section, "section"), (DrawingMode::Buoyancy, "buoyancy")];

fn load(path: Option<&Path>) -> CulvertResult<Project> {
    let Some(path) = path else {
        tracing::info!("no project file given, using defaults");
        return Ok(Project::new());
    };
    let (project, lock) = load_project_with_lock_check(path)?;
    if let Some(lock) = lock {
        tracing::warn!(user = %lock.user_id, machine = %lock.machine, "project is open in another session");
    }
    Ok(project)
}

fn run(project_path: Option<PathBuf>, out_dir: PathBuf) -> CulvertResult<()> {
    let project = load(project_path.as_deref())?;
    std::fs::create_dir_all(&out_dir).map_err(|e| {
        CulvertError::file_error("create directory", out_dir.display().to_string(), e.to_string())
    })?;

    println!("{}", generate_report(&project.section, &project.ground));
    println!();

    for (mode, stem) in OUTPUTS {
        for format in [ExportFormat::Svg, ExportFormat::Dxf] {
            let path = out_dir.join(format!("{stem}.{}", format.extension()));
            export_drawing(&project, mode, format, &path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args_os().skip(1);
    let project_path = args.next().map(PathBuf::from);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    match run(project_path, out_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!("Error: {e}");
            if e.is_recoverable() {
                eprintln!("The project is in use elsewhere; try again once it is closed.");
            }
            ExitCode::FAILURE
        }
    }
}
