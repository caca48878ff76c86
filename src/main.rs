//! Command-line front end: parse a metadata document and print its
//! navigation tree and revision index.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use drawview::explorer::ExplorerState;
use drawview::image_store::DirImageStore;
use drawview::{ViewerConfig, ViewerSession, parse_metadata_json};

/// Print the navigation tree and revision index of a drawing metadata document.
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct Args {
    /// Metadata JSON document
    metadata: PathBuf,
    /// Directory holding the drawing images
    #[arg(long)]
    drawings: Option<PathBuf>,
    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> drawview::Result<ViewerConfig> {
    let mut config = match path {
        Some(path) => ViewerConfig::load(path)?,
        None => match ViewerConfig::default_path() {
            Some(path) if path.is_file() => ViewerConfig::load(&path)?,
            _ => ViewerConfig::default(),
        },
    };
    config.validate();
    Ok(config)
}

fn run(args: Args) -> drawview::Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(drawings) = args.drawings {
        config.preferences.drawings_dir = drawings;
    }

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let json = std::fs::read_to_string(&args.metadata)?;
    let data = parse_metadata_json(&json)?;
    log::info!(
        "Parsed {}: {} nodes, {} revisions, root {}",
        args.metadata.display(),
        data.tree.len(),
        data.revisions.len(),
        data.tree.root_id()
    );
    for problem in data.tree.validate() {
        log::warn!("{}", problem);
    }

    let store = DirImageStore::new(config.preferences.drawings_dir.clone());
    let session = ViewerSession::new(data, Box::new(store), config);
    let data = session.data();

    // Print the whole tree, not just the initially expanded part.
    let mut explorer = ExplorerState::new(&data.tree);
    for node in data.tree.iter() {
        explorer.set_expanded(&node.id, true);
    }
    println!("Drawings");
    for row in explorer.visible_rows(&data.tree) {
        let Some(node) = data.tree.get(&row.id) else {
            continue;
        };
        println!(
            "{}{} [{}]",
            "  ".repeat(row.depth + 1),
            node.name,
            node.kind().label()
        );
    }

    println!();
    println!("Revisions");
    for entry in &data.revisions {
        println!("  {}  {}  {}", entry.path.join(" / "), entry.version, entry.image);
    }

    match session.image_status() {
        drawview::ImageStatus::Failed { name, message } => {
            log::warn!("Root image {} unavailable: {}", name, message)
        }
        drawview::ImageStatus::Ready { name, size } => {
            log::info!("Root image {} is {}x{}", name, size.width, size.height)
        }
        drawview::ImageStatus::Empty => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("drawview: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
