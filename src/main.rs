use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use svg_compose::{CanvasSettings, DimensionPolicy, Sanitizer, TextLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use logosmith::api;
use logosmith::models::{AppConfig, SymbolVersion, VersionHistory, VersionId};
use logosmith::rendering::SvgRenderer;
use logosmith::server;

#[derive(Parser)]
#[command(name = "logosmith")]
#[command(about = "Logosmith - LLM-assisted logo builder with SVG sanitization and composition")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Sanitize an SVG file
    Sanitize {
        /// Input SVG file
        input: PathBuf,

        /// Dimension handling: "fixed" forces 1024x1024, "viewbox" only sets the viewBox
        #[arg(short, long, value_enum, default_value = "fixed")]
        policy: PolicyArg,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compose a symbol with logo and slogan text
    Compose {
        /// Symbol SVG file
        symbol: PathBuf,

        /// Logo text
        #[arg(long, default_value = "")]
        logo: String,

        /// Slogan text
        #[arg(long, default_value = "")]
        slogan: String,

        /// Draw the alignment grid behind the symbol
        #[arg(long)]
        grid: bool,

        /// Opaque background color (e.g. "#ffffff"); transparent if omitted
        #[arg(long)]
        background: Option<String>,

        /// Output SVG file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also render a PNG to this path
        #[arg(long)]
        png: Option<PathBuf>,

        /// PNG scale factor
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Also write a one-page PDF sized to the document to this path
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Fixed,
    Viewbox,
}

impl From<PolicyArg> for DimensionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Fixed => DimensionPolicy::FixedDimensions,
            PolicyArg::Viewbox => DimensionPolicy::ViewBoxOnly,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Logosmith API",
        description = "LLM-assisted logo builder: symbol generation, version history, composition and export",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_generate,
        api::handle_iterate,
        api::handle_list_versions,
        api::handle_select_version,
        api::handle_delete_version,
        api::handle_reset_session,
        api::handle_get_logo,
        api::handle_patch_logo,
        api::handle_get_slogan,
        api::handle_patch_slogan,
        api::handle_get_canvas,
        api::handle_patch_canvas,
        api::handle_compose_session,
        api::handle_compose,
        api::handle_export_svg,
        api::handle_export_png,
        api::handle_export_pdf,
    ),
    components(schemas(
        api::GenerateRequest,
        api::IterateRequest,
        api::SymbolResponse,
        api::ComposeRequest,
        VersionHistory,
        SymbolVersion,
        VersionId,
    )),
    tags(
        (name = "Symbols", description = "Symbol generation and iteration"),
        (name = "Versions", description = "Version history and selection"),
        (name = "Layers", description = "Text layers and canvas settings"),
        (name = "Compose", description = "Composition of symbol and text"),
        (name = "Export", description = "SVG, PNG and PDF downloads")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Sanitize {
            input,
            policy,
            output,
        }) => run_sanitize_command(&input, policy.into(), output.as_deref()),
        Some(Commands::Compose {
            symbol,
            logo,
            slogan,
            grid,
            background,
            output,
            png,
            scale,
            pdf,
        }) => {
            let canvas = CanvasSettings {
                show_grid: grid,
                transparent_background: background.is_none(),
                background_color: background.unwrap_or_else(|| "#ffffff".to_string()),
                ..CanvasSettings::default()
            };
            run_compose_command(
                &symbol,
                logo,
                slogan,
                &canvas,
                output.as_deref(),
                png.as_deref(),
                scale,
                pdf.as_deref(),
            )
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logosmith=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!("Wrote {} ({} bytes)", path.display(), content.len());
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Sanitize an SVG file (no server needed)
fn run_sanitize_command(
    input: &Path,
    policy: DimensionPolicy,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let raw = std::fs::read_to_string(input)?;
    let svg = Sanitizer::new(policy).sanitize(&raw)?;
    write_output(output, &svg)
}

/// Compose a symbol file with text layers, optionally rendering PNG and PDF
#[allow(clippy::too_many_arguments)]
fn run_compose_command(
    symbol: &Path,
    logo: String,
    slogan: String,
    canvas: &CanvasSettings,
    output: Option<&Path>,
    png: Option<&Path>,
    scale: f64,
    pdf: Option<&Path>,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let raw = std::fs::read_to_string(symbol)?;
    let logo = TextLayer {
        text: logo,
        ..TextLayer::logo_default()
    };
    let slogan = TextLayer {
        text: slogan,
        ..TextLayer::slogan_default()
    };

    let composition = svg_compose::compose(&raw, &logo, &slogan, canvas)?;

    let renderer = (png.is_some() || pdf.is_some()).then(SvgRenderer::new);

    if let (Some(png_path), Some(renderer)) = (png, &renderer) {
        let bytes = renderer.render_to_png(
            composition.svg.as_bytes(),
            composition.width,
            composition.height,
            scale,
            None,
        )?;
        std::fs::write(png_path, &bytes)?;
        eprintln!("Wrote {} ({} bytes)", png_path.display(), bytes.len());
    }

    if let (Some(pdf_path), Some(renderer)) = (pdf, &renderer) {
        let bytes = renderer.render_to_pdf(
            composition.svg.as_bytes(),
            composition.width,
            composition.height,
            None,
        )?;
        std::fs::write(pdf_path, &bytes)?;
        eprintln!("Wrote {} ({} bytes)", pdf_path.display(), bytes.len());
    }

    write_output(output, &composition.svg)
}

/// Print version and configuration status
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let config = AppConfig::from_env();

    println!("Logosmith v{VERSION}");
    println!("LLM-assisted logo builder\n");

    println!("Configuration:");
    println!(
        "  CONFIG_FILE    = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!("  bind address   = {}", config.server.bind_addr);
    println!("  LLM endpoint   = {}", config.llm.base_url);
    println!("  LLM model      = {}", config.llm.model);
    println!(
        "  OPENAI_API_KEY = {}",
        if config.llm.api_key.is_some() {
            "set"
        } else {
            "(not set)"
        }
    );
    println!("  CORS origins   = {}", config.server.cors_origins.join(", "));

    println!("\nCommands:");
    println!("  logosmith serve      Start the HTTP server");
    println!("  logosmith sanitize   Sanitize an SVG file");
    println!("  logosmith compose    Compose a symbol with text");
    println!("\nRun 'logosmith --help' for details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logosmith=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.server.bind_addr.clone();

    tracing::info!(
        llm_base_url = %config.llm.base_url,
        llm_model = %config.llm.model,
        cors_origins = ?config.server.cors_origins,
        "Configuration loaded"
    );

    let state = server::create_app_state(config)?;

    let app = server::build_router(state)
        // OpenAPI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Logosmith server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
