//! Entry point for modelfit.
//! Loads a model, flattens it and prints the buffers' summary and the
//! world correction matrix.

use anyhow::{Context, Result, bail};
use asset::{LoadOptions, LoadedModel, Traversal};

fn parse_model_arg() -> Option<String> {
    std::env::args().skip(1).find(|arg| !arg.starts_with("--"))
}

fn parse_scale_arg() -> Result<f32> {
    // Accept: --scale=<float>, по умолчанию 1.0
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--scale=") {
            let scale = val
                .parse::<f32>()
                .with_context(|| format!("Invalid --scale value '{val}'"))?;
            if !scale.is_finite() || scale <= 0.0 {
                bail!("--scale must be a positive number, got {scale}");
            }
            return Ok(scale);
        }
    }
    Ok(1.0)
}

fn parse_traversal_arg() -> Traversal {
    // Accept: --traversal=shallow|recursive
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--traversal=") {
            return match val.parse::<Traversal>() {
                Ok(t) => t,
                Err(err) => {
                    eprintln!("[warn] {err}, falling back to shallow.");
                    Traversal::Shallow
                }
            };
        }
    }
    Traversal::Shallow
}

fn parse_show_subsets_arg() -> bool {
    // --subsets[=on|off], по умолчанию off
    for arg in std::env::args() {
        if arg == "--subsets" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--subsets=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn print_summary(model: &LoadedModel, show_subsets: bool) {
    println!(
        "vertices={} triangles={} subsets={} materials={}",
        model.num_vertices(),
        model.num_triangles(),
        model.subsets.len(),
        model.materials.len()
    );
    println!("bounds min={:?} max={:?}", model.bounds.min, model.bounds.max);
    println!(
        "correction center={:?} scale={}",
        model.correction.center,
        model.correction.scale()
    );
    for row in model.world().transpose().to_cols_array_2d() {
        println!("  [{:>10.4} {:>10.4} {:>10.4} {:>10.4}]", row[0], row[1], row[2], row[3]);
    }

    if show_subsets {
        for (i, s) in model.subsets.iter().enumerate() {
            let material = model
                .materials
                .get(s.id as usize)
                .map_or("?", |m| m.name.as_str());
            println!(
                "subset {i}: material={} ({material}) vertices={}+{} faces={}+{}",
                s.id, s.vertex_start, s.vertex_count, s.face_start, s.face_count
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = parse_model_arg() else {
        bail!("Usage: modelfit <model> [--scale=F] [--traversal=shallow|recursive] [--subsets]");
    };
    let options = LoadOptions::default()
        .with_scale(parse_scale_arg()?)
        .with_traversal(parse_traversal_arg());
    let show_subsets = parse_show_subsets_arg();
    log::info!(
        "Starting modelfit. Model: {}, scale={}, traversal={:?}",
        path,
        options.scale,
        options.traversal
    );

    let model = asset::load_model(&path, &options)?;
    print_summary(&model, show_subsets);

    Ok(())
}
