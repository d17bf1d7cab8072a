use crate::app::Message;
use crate::render::ChartFrame;
use crate::sensor::local_time;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::element::PathElement;
use plotters::series::LineSeries;
use plotters::style::{Color, Palette, Palette99, RGBColor, BLACK, CYAN, GREEN, MAGENTA, WHITE};
use plotters_iced::{Chart, DrawingBackend};

const BACKGROUND: RGBColor = RGBColor(245, 245, 240);
const AXIS: RGBColor = RGBColor(60, 60, 60);

/// Line chart of one channel group, drawn from the last rendered frame
pub struct MotionChart<'a> {
    pub frame: &'a ChartFrame,
    pub caption: &'static str,
    pub y_desc: &'static str,
}

impl<'a> Chart<Message> for MotionChart<'a> {
    type State = ();

    fn build_chart<DB: DrawingBackend>(&self, _state: &Self::State, mut builder: ChartBuilder<DB>) {
        let (min_time, max_time) = time_axis(self.frame.x_range);
        let (min_value, max_value) = value_axis(self.frame.y_range);

        let mut chart = match builder
            .margin(15)
            .caption(self.caption, ("sans-serif", 20))
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(min_time..max_time, min_value..max_value)
        {
            Ok(chart) => chart,
            Err(e) => {
                log::warn!("Failed to build chart: {:?}", e);
                return;
            }
        };

        let _ = chart.plotting_area().fill(&BACKGROUND);

        if let Err(e) = chart
            .configure_mesh()
            .x_labels(5)
            .x_label_formatter(&|t| clock_label(*t))
            .y_desc(self.y_desc)
            .axis_style(AXIS)
            .draw()
        {
            log::warn!("Failed to draw mesh: {:?}", e);
        }

        for (index, series) in self.frame.series.iter().enumerate() {
            let color = series_color(index);
            match chart.draw_series(LineSeries::new(series.points.iter().copied(), &color)) {
                Ok(annotation) => {
                    annotation
                        .label(series.label)
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                }
                Err(e) => log::warn!("Failed to draw {} series: {:?}", series.label, e),
            }
        }

        if !self.frame.is_empty() {
            let _ = chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw();
        }
    }
}

// Phone axes keep the X/Y/Z colors; wrist fields walk the palette.
fn series_color(index: usize) -> RGBColor {
    match index {
        0 => GREEN,
        1 => MAGENTA,
        2 => CYAN,
        _ => {
            let (r, g, b) = Palette99::pick(index).rgb();
            RGBColor(r, g, b)
        }
    }
}

fn time_axis(range: Option<(i64, i64)>) -> (i64, i64) {
    match range {
        Some((min, max)) if min < max => (min, max),
        Some((min, _)) => (min, min + 1),
        None => (0, 1),
    }
}

fn value_axis(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        Some((min, max)) if min.is_finite() && max.is_finite() && min < max => (min, max),
        Some((min, _)) if min.is_finite() => (min - 0.5, min + 0.5),
        _ => (0.0, 1.0),
    }
}

fn clock_label(time_us: i64) -> String {
    local_time(time_us)
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_default_when_unset() {
        assert_eq!(time_axis(None), (0, 1));
        assert_eq!(value_axis(None), (0.0, 1.0));
    }

    #[test]
    fn test_degenerate_axes_are_widened() {
        assert_eq!(time_axis(Some((7, 7))), (7, 8));
        assert_eq!(value_axis(Some((2.0, 2.0))), (1.5, 2.5));
        assert_eq!(value_axis(Some((-1.0, 3.0))), (-1.0, 3.0));
    }

    #[test]
    fn test_series_colors_are_distinct_for_phone() {
        assert_ne!(series_color(0), series_color(1));
        assert_ne!(series_color(1), series_color(2));
    }
}
