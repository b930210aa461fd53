use clap::{Parser, Subcommand};
use imgstamp::config::{self, HelperConfig};
use imgstamp::imaging::{self, RustBackend, TransformOptions};
use imgstamp::output::{self, Report};
use imgstamp::public::StaticRoot;
use imgstamp::rewrite::Rewriter;
use std::path::{Path, PathBuf};

/// Shared flags for commands that rewrite references.
#[derive(clap::Args, Clone)]
struct RequestArgs {
    /// Path of the page the reference appears on
    #[arg(long, default_value = "/")]
    request_path: String,
}

#[derive(Parser)]
#[command(name = "imgstamp")]
#[command(about = "Cache-busted image URLs and in-place image resizing")]
#[command(long_about = "\
Cache-busted image URLs and in-place image resizing

References are rewritten relative to the page that uses them:

  https://host/x.png   full URL, printed unchanged
  /x.png               absolute, placed under the images prefix (/images/x.png)
  x.png                relative to --request-path

If the file exists under the static root, modify=<mtime> is added to the
query string so browsers refetch it after it changes.

Run 'imgstamp gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Static root override (directory public paths resolve against)
    #[arg(long, global = true)]
    static_root: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite a reference into a cache-busted path
    Path {
        reference: String,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Rewrite a reference into a fully-qualified CDN URL
    Url {
        reference: String,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Resize an image in place so its longer edge matches --width
    Resize {
        /// Public path of the image, e.g. /images/hero.jpg
        file: String,
        #[arg(long)]
        width: u32,
    },
    /// Fit an image into an --output-width square, then crop (X,Y)-(RIGHT,BOTTOM), in place
    Crop {
        /// Public path of the image
        file: String,
        x: u32,
        y: u32,
        right: u32,
        bottom: u32,
        #[arg(long)]
        output_width: Option<u32>,
    },
    /// Print an image's dimensions
    Identify {
        /// Public path of the image
        file: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    imgstamp::logging::init(cli.verbose);

    let site = || load_site_config(&cli.config, cli.static_root.as_deref());
    let backend = RustBackend::new();

    let report = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Path { reference, request } => {
            let rewriter = Rewriter::from_config(&site()?)?;
            let output = rewriter
                .rewrite_path(Some(reference.as_str()), &request.request_path)?
                .unwrap_or_default();
            Report::Rewrite {
                reference,
                request_path: request.request_path,
                output,
            }
        }
        Command::Url { reference, request } => {
            let rewriter = Rewriter::from_config(&site()?)?;
            let output = rewriter
                .rewrite_url(Some(reference.as_str()), &request.request_path)?
                .unwrap_or_default();
            Report::Rewrite {
                reference,
                request_path: request.request_path,
                output,
            }
        }
        Command::Resize { file, width } => {
            let site = site()?;
            let path = resolve_file(&site, &file)?;
            let options = TransformOptions::from(&site);
            let dimensions = imaging::resize_to_width(&backend, &path, width, &options)?;
            Report::Transform {
                public_path: file,
                file: path,
                dimensions,
            }
        }
        Command::Crop {
            file,
            x,
            y,
            right,
            bottom,
            output_width,
        } => {
            let site = site()?;
            let path = resolve_file(&site, &file)?;
            let options = TransformOptions::from(&site);
            let dimensions = imaging::crop_then_resize(
                &backend,
                &path,
                x,
                y,
                right,
                bottom,
                output_width,
                &options,
            )?;
            Report::Transform {
                public_path: file,
                file: path,
                dimensions,
            }
        }
        Command::Identify { file } => {
            let path = resolve_file(&site()?, &file)?;
            let dimensions = imaging::dimensions(&backend, &path)?;
            Report::Identify {
                public_path: file,
                file: path,
                dimensions,
            }
        }
    };

    output::print_report(&report, cli.json)?;
    Ok(())
}

/// Load config.toml and apply the --static-root override.
fn load_site_config(
    dir: &Path,
    static_root: Option<&Path>,
) -> Result<HelperConfig, config::ConfigError> {
    let mut site = config::load_config(dir)?;
    if let Some(root) = static_root {
        site.static_root = root.to_path_buf();
    }
    tracing::debug!(
        static_root = %site.static_root.display(),
        cdn = %site.urls.cdn_hostname,
        "loaded config"
    );
    Ok(site)
}

/// Map a public path onto the configured static root.
fn resolve_file(site: &HelperConfig, public_path: &str) -> Result<PathBuf, String> {
    StaticRoot::new(&site.static_root)
        .resolve(public_path)
        .ok_or_else(|| format!("{public_path} is outside the static root"))
}
