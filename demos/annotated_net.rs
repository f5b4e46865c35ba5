//! A small annotated network: a labelled path, a fan of spokes, and a few
//! hand-placed notes. Writes `annotated_net.svg` (and a PNG with `--features png`).

use netscene::{
    ChainOptions, Color, ExportOptions, ImageFormat, LineDash, MeasureOptions, NetScene, NodeStyle,
    Offset, PositionMode, SceneConfig, SceneStyles, StyleOptions, Title,
};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SceneConfig::new(6.0).with_title(Title::new("Annotated net").with_size(16.0));
    let mut scene = NetScene::svg(config)?;

    // A closed path with every side measured
    let route = netscene::chain::offsets_from_pairs(
        &[(1.0, 1.0), (4.0, 0.0), (0.0, 3.0), (-4.0, 0.0)],
        PositionMode::Relative,
    );
    let path = scene.draw_path_with_nodes_and_text(
        &route,
        &ChainOptions::new().closed().with_decimal_digits(1),
        None,
    )?;

    // Spokes from the middle of the first side, drawn dashed and blue
    let spoke_styles = SceneStyles {
        node: StyleOptions::new().style("s").size(7.0).color("steelblue").node()?,
        line: StyleOptions::new().style("--").size(1.0).color("#1f77b4").line()?,
        text: StyleOptions::new().size(10.0).style("italic").text()?,
    };
    let hub = path.segments[0].midpoint();
    scene.fan_out_with_nodes_and_text(
        hub,
        &[Offset::new(-1.5, -2.0), Offset::new(1.5, -2.0)],
        PositionMode::Relative,
        Some("spoke"),
        &ChainOptions::new().with_arrow(true),
        Some(&spoke_styles),
    )?;

    // Diagonal measured between two existing corners
    let (a, c) = (&path.points[0], &path.points[2]);
    let dotted = spoke_styles.line.clone().with_dash(LineDash::Dotted);
    let diagonal = scene.connect(a, c, false, Some(&dotted))?;
    scene.add_distance_text(
        a,
        c,
        Some(0.2),
        None,
        MeasureOptions::new().with_decimal_digits(2).with_parallel(true),
    )?;
    let marker = NodeStyle::default().with_color(Color::RED);
    scene.add_midpoint(&diagonal, Some(&marker))?;

    scene.add_text(Offset::new(3.0, 5.0), "north side", None, Some(0.0))?;
    if let Some(origin) = scene.origin().cloned() {
        scene.add_text_near_node(&origin, "O", 225.0, Some(0.3), None)?;
    }

    let svg = scene.save("annotated_net", ImageFormat::Svg, &ExportOptions::default())?;
    eprintln!("wrote {}", svg.display());

    #[cfg(feature = "png")]
    {
        let png = scene.save(
            "annotated_net",
            ImageFormat::Png,
            &ExportOptions::default().with_width(800),
        )?;
        eprintln!("wrote {}", png.display());
    }

    Ok(())
}
