//! A chain that runs through nodes placed by hand and nodes bound by distance
//! and bearing, with the closing side labelled by hand.

use netscene::{ChainOptions, MixedStep, NetScene, Offset, SceneConfig};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut scene = NetScene::svg(SceneConfig::new(5.0).with_origin(false))?;

    let start = scene.add_node(Offset::new(0.0, 0.0), None)?;
    let corner = scene.add_node(Offset::new(4.0, 0.0), None)?;
    let far = scene.add_node(Offset::new(6.0, 3.0), None)?;

    let steps = [
        // Already placed, side measured on site
        MixedStep::existing_with_length(&corner, "4.00 m"),
        // Jump to another placed node without a segment
        MixedStep::existing(&far),
        // Bound from the previous node
        MixedStep::polar(2.5, 120.0),
        MixedStep::polar("3", 200.0),
    ];
    let options = ChainOptions::new()
        .closed()
        .with_parallel(true)
        .with_decimal_digits(2)
        .with_closure_text("≈ 3 m");
    let chain = scene.add_mixed_chain(&start, &steps, &options, None)?;
    eprintln!(
        "{} points, {} segments, {} labels",
        chain.points.len(),
        chain.segments.len(),
        chain.labels.len()
    );

    // A step without a point needs both a distance and a bearing
    let broken = [MixedStep::new(None, None, Some(45.0))];
    if let Err(err) = scene.add_mixed_chain(&start, &broken, &ChainOptions::new(), None) {
        eprintln!("{:?}", miette::Report::new(err));
    }

    scene.show()?;
    Ok(())
}
