use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ermvc_cli::commands::generate::{self, ControllerOptions, ModelOptions, ResourceOptions};
use ermvc_cli::commands::init::{self, InitOptions};
use ermvc_cli::commands::routes;

#[derive(Parser)]
#[command(name = "ermvc", version, about = "ermvc CLI - scaffold and generate ermvc applications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new application
    Init {
        /// Target directory (created if missing)
        dir: PathBuf,
        /// Skip `cargo fetch`
        #[arg(long)]
        skip_install: bool,
        /// Include database support (sqlx, migrations/)
        #[arg(long)]
        with_database: bool,
    },
    /// Generate models, controllers or whole resources
    #[command(alias = "g")]
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },
    /// List the convention routes of the project
    Routes {
        /// Project root
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum GenerateKind {
    /// Generate a model and its migration
    Model {
        /// Model name (e.g. user, BlogPost)
        name: String,
        /// Field as name:Type, repeatable (e.g. --field email:String)
        #[arg(long = "field", value_name = "NAME:TYPE")]
        fields: Vec<String>,
        /// Skip `sqlx migrate run`
        #[arg(long)]
        skip_migrate: bool,
    },
    /// Generate a CRUD controller
    Controller {
        /// Controller name (e.g. user, UserController)
        name: String,
        /// Skip generating views
        #[arg(long)]
        no_views: bool,
    },
    /// Generate model, controller and views
    Resource {
        /// Resource name (e.g. post)
        name: String,
        /// Field as name:Type, repeatable
        #[arg(long = "field", value_name = "NAME:TYPE")]
        fields: Vec<String>,
        #[arg(long)]
        skip_model: bool,
        #[arg(long)]
        skip_controller: bool,
        #[arg(long)]
        skip_views: bool,
        #[arg(long)]
        skip_migrate: bool,
        /// JSON controller, no views
        #[arg(long)]
        api_only: bool,
    },
}

fn main() {
    ermvc_core::layers::init_tracing_with("warn");

    let cli = Cli::parse();
    let root = Path::new(".");

    let result = match cli.command {
        Commands::Init {
            dir,
            skip_install,
            with_database,
        } => init::run(
            &dir,
            &InitOptions {
                skip_install,
                with_database,
            },
        ),
        Commands::Generate { kind } => match kind {
            GenerateKind::Model {
                name,
                fields,
                skip_migrate,
            } => generate::model(root, &name, &ModelOptions { fields, skip_migrate }),
            GenerateKind::Controller { name, no_views } => {
                generate::controller(root, &name, &ControllerOptions { views: !no_views })
            }
            GenerateKind::Resource {
                name,
                fields,
                skip_model,
                skip_controller,
                skip_views,
                skip_migrate,
                api_only,
            } => generate::resource(
                root,
                &name,
                &ResourceOptions {
                    fields,
                    skip_model,
                    skip_controller,
                    skip_views,
                    skip_migrate,
                    api_only,
                },
            ),
        },
        Commands::Routes { dir } => routes::run(&dir),
    };

    if let Err(e) = result {
        eprintln!("{}", colored::Colorize::red(format!("Error: {e}").as_str()));
        std::process::exit(1);
    }
}
