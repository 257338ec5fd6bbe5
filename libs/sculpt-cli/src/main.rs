//! `sculpt`: export a route sculpture from JSON inputs.

use sculpture_mesh::collaborators::{JsonRouteParser, RouteParser};
use sculpture_mesh::text::FontRasterizer;
use sculpture_mesh::{ElevationGrid, QualityPreset, SculptureConfig, SculptureInput, SculpturePipeline};
use std::env;
use std::path::PathBuf;
use tracing::{error, info, warn};

const USAGE: &str = "Usage: sculpt <route.json> <output.stl> [--config <config.json>] \
[--elevation <grid.json>] [--quality <preview|standard|high>] [--font <font.ttf>] [--scale <mm-per-unit>]";

#[derive(Debug, Clone, PartialEq)]
struct Args {
    route: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    elevation: Option<PathBuf>,
    quality: QualityPreset,
    font: Option<PathBuf>,
    scale: Option<f64>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut positional = Vec::new();
        let mut config = None;
        let mut elevation = None;
        let mut quality = QualityPreset::High;
        let mut font = None;
        let mut scale = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if !arg.starts_with("--") {
                positional.push(PathBuf::from(arg));
                continue;
            }
            let value = args.next().ok_or_else(|| format!("{arg} needs a value"))?;
            match arg.as_str() {
                "--config" => config = Some(PathBuf::from(value)),
                "--elevation" => elevation = Some(PathBuf::from(value)),
                "--quality" => quality = value.parse().map_err(|e| format!("{e}"))?,
                "--font" => font = Some(PathBuf::from(value)),
                "--scale" => {
                    let parsed: f64 = value.parse().map_err(|_| format!("invalid scale: {value}"))?;
                    if !(parsed.is_finite() && parsed > 0.0) {
                        return Err(format!("scale must be a positive number: {value}"));
                    }
                    scale = Some(parsed);
                }
                _ => return Err(format!("unknown option: {arg}")),
            }
        }

        let [route, output]: [PathBuf; 2] = positional
            .try_into()
            .map_err(|_| "expected a route file and an output file".to_string())?;
        Ok(Self {
            route,
            output,
            config,
            elevation,
            quality,
            font,
            scale,
        })
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let route = JsonRouteParser.parse(&std::fs::read(&args.route)?)?;
    let config: SculptureConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SculptureConfig::default(),
    };
    let elevation: Option<ElevationGrid> = match &args.elevation {
        Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    let mut pipeline = SculpturePipeline::new(args.quality);
    if let Some(scale) = args.scale {
        pipeline = pipeline.with_stl_scale(scale)?;
    }
    if let Some(path) = &args.font {
        match FontRasterizer::from_bytes(std::fs::read(path)?) {
            Ok(rasterizer) => pipeline = pipeline.with_rasterizer(Box::new(rasterizer)),
            Err(e) => warn!("ignoring font {}: {e}", path.display()),
        }
    }

    let input = SculptureInput {
        route: &route,
        elevation: elevation.as_ref(),
        config: &config,
    };
    let export = pipeline.export(&input)?;
    std::fs::write(&args.output, &export.bytes)?;
    info!(
        "wrote {} ({} triangles, {} bytes)",
        args.output.display(),
        export.triangle_count,
        export.byte_size
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sculpt=info,sculpture_mesh=info".into()),
        )
        .init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        error!("export failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_minimal_args() {
        let args = parse(&["route.json", "out.stl"]).unwrap();
        assert_eq!(args.route, PathBuf::from("route.json"));
        assert_eq!(args.output, PathBuf::from("out.stl"));
        assert_eq!(args.quality, QualityPreset::High);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_all_options() {
        let args = parse(&[
            "--quality", "preview", "r.json", "--config", "c.json", "o.stl", "--font", "f.ttf",
            "--elevation", "g.json", "--scale", "10",
        ])
        .unwrap();
        assert_eq!(args.quality, QualityPreset::Preview);
        assert_eq!(args.config, Some(PathBuf::from("c.json")));
        assert_eq!(args.elevation, Some(PathBuf::from("g.json")));
        assert_eq!(args.font, Some(PathBuf::from("f.ttf")));
        assert_eq!(args.scale, Some(10.0));
        assert_eq!(args.output, PathBuf::from("o.stl"));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["only.json"]).is_err());
        assert!(parse(&["a", "b", "c"]).is_err());
        assert!(parse(&["a", "b", "--quality"]).is_err());
        assert!(parse(&["a", "b", "--quality", "ultra"]).is_err());
        assert!(parse(&["a", "b", "--colour", "red"]).is_err());
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        for scale in ["-1", "0", "NaN", "inf", "ten"] {
            assert!(parse(&["a", "b", "--scale", scale]).is_err(), "accepted {scale}");
        }
        assert_eq!(parse(&["a", "b", "--scale", "0.5"]).unwrap().scale, Some(0.5));
    }
}
