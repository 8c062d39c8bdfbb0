use duotone::diagnostics::TimingBreakdown;
use duotone::raster::io::{load_rgb_image, save_binary_png, write_json_file};
use duotone::{InkRenderer, Preset, RenderMetrics};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    preset: String,
    width: usize,
    height: usize,
    metrics: RenderMetrics,
    timings: TimingBreakdown,
}

struct Config {
    input_path: PathBuf,
    preset: String,
    out_path: PathBuf,
    json_out: Option<PathBuf>,
    max_edge: u32,
}

fn run() -> Result<(), String> {
    let program = env::args().next().unwrap_or_else(|| "duotone".to_string());
    let config = parse_args(&program)?;

    let buffer = load_rgb_image(&config.input_path, config.max_edge)?;
    let image = buffer.as_view();

    let renderer = InkRenderer::new(Preset::named(&config.preset));
    let (frame, timings) = renderer.process_with_diagnostics(&image)?;

    save_binary_png(&frame.pixels, frame.width, frame.height, &config.out_path)?;
    println!(
        "{} -> {} ({}x{}, coverage {:.3}, {} components, {:.1} ms)",
        config.input_path.display(),
        config.out_path.display(),
        frame.width,
        frame.height,
        frame.metrics.white_ratio,
        frame.metrics.component_count,
        timings.total_ms(),
    );
    if frame.metrics.fallback_segmentation {
        println!("note: foreground segmentation fell back to the full frame");
    }

    if let Some(path) = &config.json_out {
        let report = Report {
            preset: config.preset.clone(),
            width: frame.width,
            height: frame.height,
            metrics: frame.metrics,
            timings,
        };
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn parse_args(program: &str) -> Result<Config, String> {
    let mut input_path = None;
    let mut preset = "neon-contour".to_string();
    let mut out_path = None;
    let mut json_out = None;
    let mut max_edge = 1024u32;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--preset" => {
                preset = args
                    .next()
                    .ok_or_else(|| format!("{program}: --preset requires a name"))?;
            }
            "--out" => {
                out_path = Some(PathBuf::from(args.next().ok_or_else(|| {
                    format!("{program}: --out requires a path")
                })?));
            }
            "--json" => {
                json_out = Some(PathBuf::from(args.next().ok_or_else(|| {
                    format!("{program}: --json requires a path")
                })?));
            }
            "--max-edge" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("{program}: --max-edge requires a number"))?;
                max_edge = value
                    .parse()
                    .map_err(|_| format!("{program}: invalid --max-edge value {value}"))?;
            }
            "--help" | "-h" => {
                return Err(usage(program));
            }
            other if input_path.is_none() && !other.starts_with('-') => {
                input_path = Some(PathBuf::from(other));
            }
            other => {
                return Err(format!("{program}: unexpected argument {other}\n{}", usage(program)));
            }
        }
    }

    let input_path = input_path.ok_or_else(|| usage(program))?;
    let out_path = out_path.unwrap_or_else(|| input_path.with_extension("duotone.png"));
    Ok(Config {
        input_path,
        preset,
        out_path,
        json_out,
        max_edge,
    })
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <input> [--preset NAME] [--out PATH] [--json PATH] [--max-edge N]\n\
         Presets: {}",
        Preset::names().join(", ")
    )
}
