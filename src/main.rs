mod app;
mod data;
mod render;
mod scene;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph document to visualize.
    #[arg(long, default_value = "assets/demo-graph.json")]
    data: String,

    /// Base URL serving `<key>.png` icons for icon-bearing nodes.
    #[arg(long)]
    icon_base: Option<String>,

    /// Zoom level below which the accelerated backend takes over.
    #[arg(long, default_value_t = 0.2)]
    zoom_threshold: f32,

    /// Start with automatic backend switching enabled.
    #[arg(long)]
    automatic: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = app::AppConfig {
        data_path: args.data,
        icon_base: args.icon_base,
        zoom_threshold: args.zoom_threshold,
        automatic: args.automatic,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "graphlens",
        options,
        Box::new(move |cc| Ok(Box::new(app::GraphLensApp::new(cc, config)))),
    )
}
