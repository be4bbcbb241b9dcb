use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::model::Dataset;
use crate::state::SessionState;

const BIN_COUNT: usize = 40;

// ---------------------------------------------------------------------------
// Before/after histogram (central panel)
// ---------------------------------------------------------------------------

/// Render the before/after histogram of the preview column.
pub fn histogram_panel(ui: &mut Ui, state: &SessionState) {
    let Some(working) = &state.working else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to preview outlier clipping  (File → Open…)");
        });
        return;
    };

    let Some(column) = state.preview_column.as_deref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select a histogram column in the side panel.");
        });
        return;
    };

    let before = column_values(working, column);
    let after = state
        .preview
        .as_ref()
        .map(|p| column_values(&p.dataset, column));

    if before.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(format!("Column '{column}' has no values to plot."));
        });
        return;
    }

    // One shared binning so the two charts line up.
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in before.iter().chain(after.iter().flatten()) {
        min = min.min(v);
        max = max.max(v);
    }
    let bins = Bins::new(min, max, BIN_COUNT);

    let chart_before = bar_chart("Before", &before, &bins)
        .color(Color32::from_rgba_unmultiplied(110, 160, 255, 160));
    let chart_after = after.as_deref().map(|values| {
        bar_chart("After", values, &bins)
            .color(Color32::from_rgba_unmultiplied(255, 160, 70, 160))
    });

    Plot::new("histogram")
        .legend(Legend::default())
        .x_axis_label(column)
        .y_axis_label("Count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart_before);
            if let Some(chart) = chart_after {
                plot_ui.bar_chart(chart);
            }
        });
}

fn column_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column(column)
        .and_then(|c| c.as_numeric())
        .map(|values| values.iter().filter_map(|v| *v).collect())
        .unwrap_or_default()
}

fn bar_chart(name: &str, values: &[f64], bins: &Bins) -> BarChart {
    let bars: Vec<Bar> = bins
        .counts(values)
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bar::new(bins.center(i), count as f64).width(bins.width))
        .collect();
    BarChart::new(bars).name(name)
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

/// Equal-width bins over `[min, max]`. A zero range (constant column) gets a
/// single bin of unit width so the chart still shows one bar.
struct Bins {
    min: f64,
    width: f64,
    count: usize,
}

impl Bins {
    fn new(min: f64, max: f64, count: usize) -> Self {
        let range = max - min;
        if range <= 0.0 {
            Bins {
                min: min - 0.5,
                width: 1.0,
                count: 1,
            }
        } else {
            Bins {
                min,
                width: range / count as f64,
                count,
            }
        }
    }

    fn center(&self, bin: usize) -> f64 {
        self.min + (bin as f64 + 0.5) * self.width
    }

    fn index(&self, value: f64) -> usize {
        let i = ((value - self.min) / self.width) as usize;
        i.min(self.count - 1)
    }

    fn counts(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.count];
        for &v in values {
            counts[self.index(v)] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::Bins;

    #[test]
    fn values_land_in_their_bins() {
        let bins = Bins::new(0.0, 10.0, 5);
        let counts = bins.counts(&[0.0, 1.0, 2.5, 9.9, 10.0]);
        assert_eq!(counts, vec![2, 1, 0, 0, 2]);
    }

    #[test]
    fn constant_column_gets_one_bin() {
        let bins = Bins::new(5.0, 5.0, 40);
        let counts = bins.counts(&[5.0, 5.0, 5.0]);
        assert_eq!(counts, vec![3]);
    }
}
