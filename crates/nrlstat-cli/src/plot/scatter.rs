//! Per-run scatter of routing overhead against delivery ratio.

use nrlstat_analysis::{pipeline::AnalysisOutcome, record::Metric};

use super::scene::{Anchor, Color, LinearScale, Scene, padded_extent, ticks, value_axis};

const WIDTH: u32 = 900;
const HEIGHT: u32 = 600;
const LEFT: f64 = 90.0;
const RIGHT: f64 = 720.0;
const TOP: f64 = 70.0;
const BOTTOM: f64 = 530.0;

pub(crate) fn scatter_scene(outcome: &AnalysisOutcome) -> Scene {
    let records = outcome.dataset.records();
    let protocols = outcome.dataset.protocols();

    let x_scale = LinearScale::new(
        padded_extent(records.iter().map(|r| r.metric(Metric::Overhead))),
        (LEFT, RIGHT),
    );
    let y_scale = LinearScale::new(
        padded_extent(records.iter().map(|r| r.metric(Metric::DeliveryRatio))),
        (BOTTOM, TOP),
    );

    let mut scene = Scene::new(WIDTH, HEIGHT);
    scene.title(
        ((LEFT + RIGHT) / 2.0, TOP - 35.0),
        format!(
            "{} vs {}",
            Metric::Overhead.label(),
            Metric::DeliveryRatio.label()
        ),
    );
    value_axis(&mut scene, &y_scale, LEFT, RIGHT, Metric::DeliveryRatio.label());
    scene.frame(LEFT, TOP, RIGHT - LEFT, BOTTOM - TOP, Color::GRID);

    let (lo, hi) = x_scale.domain();
    for tick in ticks(lo, hi, 8) {
        let x = x_scale.map(tick);
        scene.line((x, BOTTOM), (x, BOTTOM + 5.0), Color::AXIS, 1.0);
        scene.text((x, BOTTOM + 18.0), format!("{tick:.2}"), 11.0, Anchor::Middle);
    }
    scene.line((LEFT, BOTTOM), (RIGHT, BOTTOM), Color::AXIS, 1.5);
    scene.text(
        ((LEFT + RIGHT) / 2.0, BOTTOM + 45.0),
        Metric::Overhead.label(),
        12.0,
        Anchor::Middle,
    );

    for record in records {
        let index = protocols
            .iter()
            .position(|p| *p == record.protocol)
            .unwrap_or_default();
        let x = x_scale.map(record.metric(Metric::Overhead));
        let y = y_scale.map(record.metric(Metric::DeliveryRatio));
        scene.circle((x, y), 5.0, Color::of_index(index));
    }

    let mut y = TOP + 10.0;
    for (index, protocol) in protocols.iter().enumerate() {
        scene.rect(RIGHT + 30.0, y - 10.0, 12.0, 12.0, Color::of_index(index), None);
        scene.text((RIGHT + 50.0, y), *protocol, 12.0, Anchor::Start);
        y += 22.0;
    }
    scene
}
