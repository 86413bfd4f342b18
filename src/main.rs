mod app;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app::{BubbleSettings, LoadRequest};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// CSV file with an `x,y,category` header.
    #[arg(long, value_name = "CSV")]
    scatter: Option<PathBuf>,

    /// JSON character network with `nodes` and `links`.
    #[arg(long, value_name = "JSON")]
    network: Option<PathBuf>,

    /// JSON layout tuning; missing keys keep their defaults.
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 100)]
    bubbles: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,

    /// Lay out without a window and print a JSON summary.
    #[arg(long)]
    headless: bool,

    /// Tick limit for headless layouts.
    #[arg(long, default_value_t = 300)]
    ticks: usize,
}

fn main() -> ExitCode {
    let _ = env_logger::builder().format_timestamp(None).try_init();
    let args = Args::parse();

    let request = LoadRequest {
        scatter: args.scatter,
        network: args.network,
        config: args.config,
    };
    let bubbles = BubbleSettings {
        count: args.bubbles,
        seed: args.seed,
    };

    if args.headless {
        return match app::run_headless(&request, bubbles, args.ticks) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::FAILURE
            }
        };
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "force-plot",
        options,
        Box::new(move |cc| Ok(Box::new(app::PlotApp::new(cc, request, bubbles)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("viewer exited with an error: {error}");
            ExitCode::FAILURE
        }
    }
}
