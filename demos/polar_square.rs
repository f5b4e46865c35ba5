//! Draw a square by walking three sides in polar steps and closing the loop.
//!
//! Run with: cargo run --example polar_square --features tracing > square.svg

use netscene::{ChainOptions, NetScene, Offset, PolarStep, SceneConfig, Title};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SceneConfig::new(4.0).with_title(Title::new("Polar square"));
    let mut scene = NetScene::svg(config)?;

    let steps = [
        PolarStep::new(2.0, 0.0),
        PolarStep::new(2.0, 90.0),
        PolarStep::new(2.0, 180.0),
    ];
    let options = ChainOptions::new()
        .closed()
        .with_arrow(true)
        .with_parallel(true)
        .with_decimal_digits(1);
    let square = scene.add_polar_chain(Offset::new(1.0, 1.0), &steps, &options, None)?;

    let names = ["A", "B", "C", "D"];
    scene.add_node_labels(&names, &square.points, Some(0.3), None)?;

    scene.show()?;
    Ok(())
}
