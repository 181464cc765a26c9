use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use endpoint_codegen::codegen::{
    CodegenPipeline, GenerateOptions, StubFlavor, parse_endpoint, print_summary,
};
use endpoint_codegen::config::CodegenConfig;
use endpoint_codegen::models::ProductLine;

#[derive(Parser)]
#[command(name = "endpoint-codegen")]
#[command(about = "Generate Binance client stubs for documented endpoints the client does not call yet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare documented endpoints with the client and write stubs for the missing ones
    Generate {
        /// Rebuild endpoint lists from the raw documentation files
        #[arg(long)]
        regenerate: bool,
        /// Write regenerated lists back to the endpoint-list files
        #[arg(long, requires = "regenerate")]
        write_lists: bool,
        #[arg(long)]
        client: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Directory holding the per-product-line list and docs files
        #[arg(long)]
        utils_dir: Option<PathBuf>,
        #[arg(long)]
        flavor: Option<StubFlavor>,
        /// Treat endpoints that only differ by version as different
        #[arg(long)]
        match_version: bool,
        #[arg(long)]
        skip_malformed: bool,
        /// Append usage entries for the missing endpoints to this markdown file
        #[arg(long)]
        endpoints_md: Option<PathBuf>,
        /// Write a JSON report of the comparison
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show how a single documented endpoint is parsed
    Parse {
        method: String,
        path: String,
        #[arg(short, long, default_value = "spot")]
        product: ProductLine,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut config = CodegenConfig::from_env()?;

    match cli.command {
        Commands::Generate {
            regenerate,
            write_lists,
            client,
            output,
            utils_dir,
            flavor,
            match_version,
            skip_malformed,
            endpoints_md,
            report,
        } => {
            if let Some(dir) = utils_dir {
                config.set_utils_dir(dir);
            }
            if let Some(client) = client {
                config.client_file = client;
            }
            if let Some(output) = output {
                config.output_file = output;
            }
            if let Some(flavor) = flavor {
                config.flavor = flavor;
            }

            let options = GenerateOptions {
                regenerate,
                write_lists,
                match_version,
                skip_malformed,
                endpoints_md,
                report,
            };
            let pipeline = CodegenPipeline::new(config)?;
            let summary = pipeline.run(&options).await?;
            print_summary(&summary);
        }
        Commands::Parse { method, path, product } => {
            let pipeline = CodegenPipeline::new(config)?;
            let record = parse_endpoint(&format!("{} {}", method, path), product, pipeline.rules())?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
