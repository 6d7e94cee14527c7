use std::path::Path;
use std::process::ExitCode;

use anyhow::{Result, bail};

use shotmark::codec;
use shotmark::save::{self, SaveRequest, SaveTarget};
use shotmark::ShotmarkConfig;

const USAGE: &str = "usage:
  shotmark dump <file>            print every shape in a .json or binary shape file
  shotmark convert <in> <out>     convert between formats (by output extension)
  shotmark save-path [path]       print where a capture would be saved";

fn dump(path: &Path) -> Result<()> {
    let shapes = codec::load_any(path)?;
    log::info!("Loaded {} shapes from {}", shapes.len(), path.display());
    for (i, shape) in shapes.iter().enumerate() {
        println!("{i}: {shape}");
    }
    Ok(())
}

fn convert(input: &Path, output: &Path) -> Result<()> {
    let shapes = codec::load_any(input)?;
    codec::save_any(output, &shapes)?;
    println!("Wrote {} shapes to {}", shapes.len(), output.display());
    Ok(())
}

fn save_path(explicit: &str) -> Result<()> {
    let config = ShotmarkConfig::load();
    let request = SaveRequest {
        explicit_path: explicit,
        option: config.save_option,
        last_folder: config.last_folder.as_deref(),
        file_prefix: &config.file_prefix,
        time: chrono::Local::now(),
    };
    match save::resolve(&request)? {
        SaveTarget::File(path) => println!("file: {}", path.display()),
        SaveTarget::FileAndClipboard(path) => println!("file+clipboard: {}", path.display()),
        SaveTarget::Clipboard => println!("clipboard"),
        SaveTarget::Prompt { suggested } => println!("ask: {}", suggested.display()),
    }
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["dump", file] => dump(Path::new(file)),
        ["convert", input, output] => convert(Path::new(input), Path::new(output)),
        ["save-path"] => save_path(""),
        ["save-path", path] => save_path(path),
        _ => bail!("{USAGE}"),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
