//! Charts of the analysis outcome.

use std::io::Cursor;

use anyhow::Context as _;
use nrlstat_analysis::pipeline::AnalysisOutcome;

use crate::util::Artifact;

mod comparison;
mod png;
mod scatter;
mod scene;
mod svg;

/// Renders every chart into memory: the comparison chart as SVG and PNG, then
/// the overhead vs delivery ratio scatter as SVG.
pub(crate) fn render_plots(
    outcome: &AnalysisOutcome,
    prefix: &str,
) -> anyhow::Result<Vec<Artifact>> {
    let comparison = comparison::comparison_scene(outcome);
    let scatter = scatter::scatter_scene(outcome);

    let comparison_svg = svg::render(&comparison).context("Failed to render comparison chart")?;

    let mut comparison_png = Cursor::new(vec![]);
    png::rasterize(&comparison)
        .write_to(&mut comparison_png, image::ImageFormat::Png)
        .context("Failed to encode comparison chart as PNG")?;

    let scatter_svg = svg::render(&scatter).context("Failed to render scatter chart")?;

    Ok(vec![
        Artifact::new(format!("{prefix}_comparison.svg"), comparison_svg),
        Artifact::new(format!("{prefix}_comparison.png"), comparison_png.into_inner()),
        Artifact::new(format!("{prefix}_overhead_vs_pdr.svg"), scatter_svg),
    ])
}

#[cfg(test)]
mod tests {
    use nrlstat_analysis::config::AnalysisConfig;

    use super::*;
    use crate::testing::sample_outcome;

    #[test]
    fn test_render_plots() {
        let outcome = sample_outcome(AnalysisConfig::default());
        let artifacts = render_plots(&outcome, "nrl").unwrap();

        let names = artifacts
            .iter()
            .map(|a| a.file_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "nrl_comparison.svg",
                "nrl_comparison.png",
                "nrl_overhead_vs_pdr.svg"
            ]
        );
        assert!(artifacts.iter().all(|a| !a.contents.is_empty()));

        let png = image::load_from_memory(&artifacts[1].contents).unwrap();
        assert_eq!((png.width(), png.height()), (1400, 600));
        let svg = std::str::from_utf8(&artifacts[0].contents).unwrap();
        assert!(svg.contains("OLSR"));
    }
}
