use std::path::PathBuf;

use clap::Parser;
use cutsweep::{Manifest, init_logging};
use cutsweep_core::config::JobDescriptor;
use cutsweep_core::model::CentralityWindow;
use cutsweep_core::registration::DryRunManager;

#[derive(Parser, Debug)]
#[command(name = "cutsweep")]
#[command(about = "Build the analysis tasks of one centrality window and print the registration manifest")]
struct Args {
    /// Lower edge of the centrality window, in percent
    center_min: f64,

    /// Upper edge of the centrality window, in percent
    center_max: f64,

    /// JSON or YAML job descriptor; without it the task fields are read from
    /// TASK_BASENAME, GRID_OUTPUT_ROOT_FILE and OUTPUT_TDIRECTORY_FILE
    descriptor: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging("info")?;

    let args = Args::parse();
    let window = CentralityWindow::new(args.center_min, args.center_max)?;

    let mut manager = DryRunManager::new();
    cutsweep_core::check_environment(&manager)?;

    let job = match &args.descriptor {
        Some(path) => JobDescriptor::from_path(path)?,
        None => JobDescriptor::from_env()?,
    };
    tracing::info!(
        base_name = job.task.base_name(),
        routing = %job.task.routing(),
        window = %window.label(),
        "setting up job"
    );

    let registrations = cutsweep_core::add_tasks(&mut manager, window, &job)?;

    let manifest = Manifest::new(window, &registrations, manager.tasks());
    print!("{}", manifest.to_yaml()?);

    Ok(())
}
