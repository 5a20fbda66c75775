use clap::{Parser, Subcommand};
use sitegraph::render::{self, RendererRegistry};
use sitegraph::{Site, config, output, write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitegraph")]
#[command(version, about = "Static site builder for layouts, posts, pages and assets")]
#[command(long_about = "\
Static site builder for layouts, posts, pages and assets

Every file in the source tree is classified exactly once, in this order:

  _layouts/**                      Layouts (may name a parent: `layout: base`)
  _posts/**/YYYY-MM-DD-slug.ext    Posts
  **/*.{html,htm,md,markdown,textile}
                                   Pages
  everything else                  Assets, copied verbatim

Paths with a component starting with `_` or `.` are never pages or assets.

Run 'sitegraph gen-config' to print a documented _config.yml.")]
struct Cli {
    /// Source directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Config file, relative to the source directory [default: _config.yml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory, relative to the current directory (overrides `site_dir`)
    #[arg(long, global = true)]
    destination: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the source tree and print the content graph
    Scan {
        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify, render, and write the site
    Build,
    /// Classify the source tree without writing anything
    Check {
        /// Fail if any post or page was skipped
        #[arg(long)]
        strict: bool,
    },
    /// Print a stock _config.yml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    sitegraph::init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_yaml());
        return Ok(());
    }

    let mut site_config = config::load_config(&cli.source, cli.config.as_deref());
    if let Some(dest) = &cli.destination {
        site_config.set_site_dir(config::resolve_destination(dest)?.to_string_lossy());
    }
    let mut site = Site::with_config(&cli.source, site_config)?;

    match cli.command {
        Command::Scan { json } => {
            site.build()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&site.graph())?);
            } else {
                output::print_scan_output(&site.graph());
            }
        }
        Command::Build => {
            // Resolve the renderer before touching the filesystem.
            let renderer = RendererRegistry::with_builtins().resolve_for(site.config())?;

            println!("==> Classifying {}", site.source().display());
            site.build()?;
            output::print_scan_output(&site.graph());

            let output_dir = site.output_dir();
            println!("==> Rendering with {} → {}", renderer.name(), output_dir.display());
            let rendered = render::render_site(&site, renderer.as_ref())?;
            let summary =
                write::write_site(&rendered, site.assets_built(), site.source(), &output_dir)?;
            output::print_build_output(&rendered, &summary);
            println!("==> Build complete: {}", output_dir.display());
        }
        Command::Check { strict } => {
            println!("==> Checking {}", site.source().display());
            site.build()?;
            output::print_scan_output(&site.graph());
            let skipped = site.skipped().len();
            if strict && skipped > 0 {
                return Err(format!("{skipped} candidate(s) skipped").into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {}
    }

    Ok(())
}
