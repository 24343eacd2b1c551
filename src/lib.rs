//! yoloprep: small offline tools for preparing YOLO object-detection datasets.
//!
//! Two batch operations are provided, both as library functions and as
//! subcommands of the `yoloprep` binary:
//!
//! - [`hbb2json`]: turn YOLO horizontal-bounding-box `.txt` labels into one
//!   X-AnyLabeling/LabelMe JSON document per image, so existing labels can be
//!   reviewed and corrected in the labeling tool.
//! - [`dataset_yaml`]: write the `dataset.yaml` descriptor a YOLO trainer
//!   reads, from an images/labels layout and a class list.
//!
//! # Modules
//!
//! - [`classes`]: class-name tables with lenient and strict loading
//! - [`yolo_txt`]: YOLO label line parsing
//! - [`geom`]: typed normalized/pixel boxes
//! - [`anylabeling`]: output document types
//! - [`paths`]: filesystem helpers
//! - [`error`]: error types for yoloprep operations

pub mod anylabeling;
pub mod classes;
pub mod dataset_yaml;
pub mod error;
pub mod geom;
pub mod hbb2json;
pub mod paths;
pub mod yolo_txt;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use error::YoloprepError;

/// The yoloprep CLI application.
#[derive(Parser)]
#[command(name = "yoloprep")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert YOLO HBB txt labels to X-AnyLabeling JSON, one file per image.
    Hbb2json(Hbb2jsonArgs),
    /// Generate a YOLO dataset.yaml from images/labels dirs and a class list.
    DatasetYaml(DatasetYamlArgs),
}

/// Arguments for the hbb2json subcommand.
#[derive(clap::Args)]
struct Hbb2jsonArgs {
    /// Directory containing the images.
    #[arg(long)]
    images: PathBuf,

    /// Directory containing the YOLO txt labels.
    #[arg(long)]
    labels: PathBuf,

    /// Output directory for JSON files (defaults to the labels directory).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Class list: a classes.txt/classes.yaml file or a directory holding one
    /// (defaults to <labels>/classes.txt).
    #[arg(long)]
    classes: Option<PathBuf>,

    /// Template for the imagePath field; {file_name} is replaced by the image
    /// file name.
    #[arg(long, default_value = hbb2json::DEFAULT_IMAGE_PATH_TEMPLATE)]
    image_path_template: String,

    /// Format of the final summary.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Arguments for the dataset-yaml subcommand.
#[derive(clap::Args)]
struct DatasetYamlArgs {
    /// Images directory (its parent becomes the dataset root).
    #[arg(long)]
    images: PathBuf,

    /// Labels directory.
    #[arg(long)]
    labels: PathBuf,

    /// Class list file (.txt, .yaml or .yml).
    #[arg(long)]
    classes: PathBuf,

    /// Output YAML path.
    #[arg(long, default_value = dataset_yaml::DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the yoloprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), YoloprepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Hbb2json(args)) => run_hbb2json(args),
        Some(Commands::DatasetYaml(args)) => run_dataset_yaml(args),
        None => {
            println!("yoloprep {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("YOLO dataset preparation tools.");
            println!();
            println!("Run 'yoloprep --help' for usage information.");
            Ok(())
        }
    }
}

fn run_hbb2json(args: Hbb2jsonArgs) -> Result<(), YoloprepError> {
    let options = hbb2json::ConvertOptions {
        images_dir: args.images,
        labels_dir: args.labels,
        output_dir: args.output,
        classes_file: args.classes,
        image_path_template: args.image_path_template,
    };

    let report = hbb2json::convert(&options)?;

    match args.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|source| {
                YoloprepError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{report}"),
    }

    Ok(())
}

fn run_dataset_yaml(args: DatasetYamlArgs) -> Result<(), YoloprepError> {
    let options = dataset_yaml::GenerateOptions {
        images_dir: args.images,
        labels_dir: args.labels,
        classes_file: args.classes,
        output_path: args.output,
    };

    let report = dataset_yaml::generate(&options)?;
    print!("{report}");
    Ok(())
}
