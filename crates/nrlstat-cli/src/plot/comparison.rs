//! Two-panel overhead comparison: box/strip plot and bar chart of means.

use nrlstat_analysis::{group::GroupStatistics, pipeline::AnalysisOutcome, record::Metric};

use super::scene::{Anchor, Color, LinearScale, Scene, padded_extent, value_axis};

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 600;
const TOP: f64 = 70.0;
const BOTTOM: f64 = 530.0;
const PANEL_WIDTH: f64 = 600.0;
const LEFT_PANEL_X: f64 = 90.0;
const RIGHT_PANEL_X: f64 = 790.0;
const LEGEND_Y: f64 = 575.0;

/// Builds the comparison chart of the overhead metric, protocols ordered by mean.
pub(crate) fn comparison_scene(outcome: &AnalysisOutcome) -> Scene {
    let groups = outcome.ranking();
    let reference_means = reference_means(outcome, &groups);

    let extent = padded_extent(
        groups
            .iter()
            .flat_map(|g| {
                g.values
                    .iter()
                    .copied()
                    .chain([g.ci_lower(), g.ci_upper(), g.max])
            })
            .chain(reference_means.iter().flatten().copied()),
    );
    let scale = LinearScale::new(extent, (BOTTOM, TOP));

    let mut scene = Scene::new(WIDTH, HEIGHT);
    draw_box_panel(&mut scene, &groups, &scale);
    draw_bar_panel(&mut scene, &groups, &scale, &reference_means);
    if let Some(reference) = &outcome.reference {
        scene.dashed_line(
            (RIGHT_PANEL_X + PANEL_WIDTH - 150.0, LEGEND_Y),
            (RIGHT_PANEL_X + PANEL_WIDTH - 120.0, LEGEND_Y),
            Color::REFERENCE,
            2.0,
        );
        scene.text(
            (RIGHT_PANEL_X + PANEL_WIDTH - 115.0, LEGEND_Y + 4.0),
            format!("{} mean", reference.label),
            11.0,
            Anchor::Start,
        );
    }
    scene
}

fn reference_means(outcome: &AnalysisOutcome, groups: &[GroupStatistics]) -> Vec<Option<f64>> {
    let Some(reference) = &outcome.reference else {
        return vec![None; groups.len()];
    };
    groups
        .iter()
        .map(|group| {
            reference
                .rows
                .iter()
                .find(|row| row.protocol == group.protocol)
                .and_then(|row| row.reference_mean)
        })
        .collect()
}

/// Horizontal center of slot `index` out of `count` in a panel starting at `x0`.
#[expect(clippy::cast_precision_loss)]
fn slot_center(x0: f64, index: usize, count: usize) -> (f64, f64) {
    let slot = PANEL_WIDTH / count.max(1) as f64;
    (x0 + (index as f64 + 0.5) * slot, slot)
}

fn draw_box_panel(scene: &mut Scene, groups: &[GroupStatistics], scale: &LinearScale) {
    let x0 = LEFT_PANEL_X;
    value_axis(scene, scale, x0, x0 + PANEL_WIDTH, Metric::Overhead.label());
    scene.line((x0, BOTTOM), (x0 + PANEL_WIDTH, BOTTOM), Color::AXIS, 1.5);
    scene.title(
        (x0 + PANEL_WIDTH / 2.0, TOP - 35.0),
        format!("{} distribution by protocol", Metric::Overhead.label()),
    );

    for (index, group) in groups.iter().enumerate() {
        let color = Color::of_index(index);
        let (cx, slot) = slot_center(x0, index, groups.len());
        let half = slot * 0.25;
        let summary = &group.box_plot;

        let (q1, q3) = (scale.map(summary.q1), scale.map(summary.q3));
        let (low, high) = (scale.map(summary.lower_whisker), scale.map(summary.upper_whisker));
        scene.line((cx, high), (cx, q3), Color::AXIS, 1.5);
        scene.line((cx, q1), (cx, low), Color::AXIS, 1.5);
        scene.line((cx - half / 2.0, high), (cx + half / 2.0, high), Color::AXIS, 1.5);
        scene.line((cx - half / 2.0, low), (cx + half / 2.0, low), Color::AXIS, 1.5);
        scene.rect(cx - half, q3, 2.0 * half, (q1 - q3).max(1.0), color, Some(Color::AXIS));
        let median = scale.map(summary.median);
        scene.line((cx - half, median), (cx + half, median), Color::BLACK, 2.5);

        for (x, value) in strip_offsets(cx, half, group.values.len()).zip(&group.values) {
            scene.circle((x, scale.map(*value)), 3.5, Color::AXIS);
        }

        scene.text((cx, BOTTOM + 22.0), group.protocol.clone(), 13.0, Anchor::Middle);
    }
}

/// Deterministic horizontal spread of `count` points around `cx`.
#[expect(clippy::cast_precision_loss)]
fn strip_offsets(cx: f64, half: f64, count: usize) -> impl Iterator<Item = f64> {
    (0..count).map(move |i| {
        if count == 1 {
            cx
        } else {
            cx - half * 0.6 + 1.2 * half * i as f64 / (count - 1) as f64
        }
    })
}

fn draw_bar_panel(
    scene: &mut Scene,
    groups: &[GroupStatistics],
    scale: &LinearScale,
    reference_means: &[Option<f64>],
) {
    let x0 = RIGHT_PANEL_X;
    value_axis(scene, scale, x0, x0 + PANEL_WIDTH, Metric::Overhead.label());
    scene.line((x0, BOTTOM), (x0 + PANEL_WIDTH, BOTTOM), Color::AXIS, 1.5);
    scene.title(
        (x0 + PANEL_WIDTH / 2.0, TOP - 35.0),
        format!("Mean {} with 95% CI", Metric::Overhead.label()),
    );

    let baseline = scale.map(scale.domain().0.max(0.0));
    for (index, group) in groups.iter().enumerate() {
        let color = Color::of_index(index);
        let (cx, slot) = slot_center(x0, index, groups.len());
        let half = slot * 0.3;

        let top = scale.map(group.mean);
        scene.rect(
            cx - half,
            top.min(baseline),
            2.0 * half,
            (baseline - top).abs(),
            color,
            Some(Color::AXIS),
        );

        let (lower, upper) = (scale.map(group.ci_lower()), scale.map(group.ci_upper()));
        scene.line((cx, upper), (cx, lower), Color::BLACK, 1.5);
        scene.line((cx - 8.0, upper), (cx + 8.0, upper), Color::BLACK, 1.5);
        scene.line((cx - 8.0, lower), (cx + 8.0, lower), Color::BLACK, 1.5);

        if let Some(reference) = reference_means.get(index).copied().flatten() {
            let y = scale.map(reference);
            scene.dashed_line((cx - half - 6.0, y), (cx + half + 6.0, y), Color::REFERENCE, 2.0);
        }

        scene.text((cx, upper - 8.0), format!("{:.3}", group.mean), 12.0, Anchor::Middle);
        scene.text((cx, BOTTOM + 22.0), group.protocol.clone(), 13.0, Anchor::Middle);
    }
}

#[cfg(test)]
mod tests {
    use nrlstat_analysis::config::AnalysisConfig;

    use super::*;
    use crate::{plot::scene::Shape, testing::sample_outcome};

    fn texts(scene: &Scene) -> Vec<&str> {
        scene
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_groups_are_labelled_in_mean_order() {
        let scene = comparison_scene(&sample_outcome(AnalysisConfig::default()));
        let labels = texts(&scene)
            .into_iter()
            .filter(|t| ["AODV", "DSDV", "OLSR"].contains(t))
            .collect::<Vec<_>>();
        assert_eq!(labels, ["AODV", "DSDV", "OLSR", "AODV", "DSDV", "OLSR"]);
        assert!(texts(&scene).contains(&"0.500"));
    }

    #[test]
    fn test_every_run_is_plotted_inside_the_panel() {
        let scene = comparison_scene(&sample_outcome(AnalysisConfig::default()));
        let points = scene
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(points.len(), 9);
        assert!(points.iter().all(|(x, y)| {
            (LEFT_PANEL_X..=LEFT_PANEL_X + PANEL_WIDTH).contains(x) && (TOP..=BOTTOM).contains(y)
        }));
    }

    #[test]
    fn test_reference_means_are_dashed() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{ "reference": { "label": "dual-layer", "means": { "AODV": 0.22, "OLSR": 0.2 } } }"#,
        )
        .unwrap();
        let scene = comparison_scene(&sample_outcome(config));
        let dashed = scene
            .shapes
            .iter()
            .filter(|shape| matches!(shape, Shape::Line { dashed: true, .. }))
            .count();
        // two protocols plus the legend sample
        assert_eq!(dashed, 3);
        assert!(texts(&scene).contains(&"dual-layer mean"));
    }
}
