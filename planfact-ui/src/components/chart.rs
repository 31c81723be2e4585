//! Chart Component
//!
//! Canvas surfaces for chart slots and the backend that draws view-model
//! chart specs on them.

use leptos::*;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use planfact::{ChartBackend, ChartKind, ChartSpec};

use crate::dom;

/// Slice colors for doughnut charts
const SLICE_COLORS: [&str; 6] = [
    "rgba(54, 162, 235, 0.8)",
    "rgba(255, 99, 132, 0.8)",
    "rgba(255, 206, 86, 0.8)",
    "rgba(75, 192, 192, 0.8)",
    "rgba(153, 102, 255, 0.8)",
    "rgba(255, 159, 64, 0.8)",
];

const BACKGROUND: &str = "#ffffff";
const GRID: &str = "#e5e7eb";
const TEXT: &str = "#6b7280";

/// Canvas surface of one chart slot
#[component]
pub fn ChartCanvas(
    /// Surface id the view model renders into
    #[prop(into)]
    surface: String,
    #[prop(into, optional)]
    title: String,
) -> impl IntoView {
    view! {
        <div class="card mb-4">
            {(!title.is_empty()).then(|| view! { <h6 class="card-header">{title}</h6> })}
            <div class="card-body chart-container">
                <canvas id=surface width="800" height="360" class="w-100" />
            </div>
        </div>
    }
}

/// Live chart drawn on a canvas
pub struct CanvasHandle(u32);

struct LiveChart {
    canvas: HtmlCanvasElement,
    on_move: Closure<dyn FnMut(MouseEvent)>,
}

/// Chart backend drawing on page canvases
#[derive(Default)]
pub struct CanvasBackend {
    next_id: u32,
    live: HashMap<u32, LiveChart>,
}

impl CanvasBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartBackend for CanvasBackend {
    type Handle = CanvasHandle;

    fn has_surface(&self, surface: &str) -> bool {
        dom::canvas_by_id(surface).is_some()
    }

    fn create(&mut self, spec: &ChartSpec) -> Option<CanvasHandle> {
        let canvas = dom::canvas_by_id(&spec.surface)?;
        let ctx = context_2d(&canvas)?;
        let geometry = Geometry::new(canvas.width() as f64, canvas.height() as f64);
        draw_chart(&ctx, &geometry, spec);

        // Tooltip follows the pointer through the canvas title
        let tooltip_spec = spec.clone();
        let tooltip_canvas = canvas.clone();
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let scale = if tooltip_canvas.client_width() > 0 {
                geometry.width / tooltip_canvas.client_width() as f64
            } else {
                1.0
            };
            let x = event.offset_x() as f64 * scale;
            let y = event.offset_y() as f64 * scale;
            let text = geometry
                .hit_index(&tooltip_spec, x, y)
                .map(|index| tooltip_text(&tooltip_spec, index))
                .unwrap_or_default();
            tooltip_canvas.set_title(&text);
        }) as Box<dyn FnMut(MouseEvent)>);

        if canvas
            .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())
            .is_err()
        {
            dom::log_warn(&format!("Tooltip unavailable on {}", spec.surface));
        }

        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(id, LiveChart { canvas, on_move });
        Some(CanvasHandle(id))
    }

    fn destroy(&mut self, handle: CanvasHandle) {
        let Some(chart) = self.live.remove(&handle.0) else {
            return;
        };
        let _ = chart
            .canvas
            .remove_event_listener_with_callback("mousemove", chart.on_move.as_ref().unchecked_ref());
        chart.canvas.set_title("");
        if let Some(ctx) = context_2d(&chart.canvas) {
            ctx.clear_rect(0.0, 0.0, chart.canvas.width() as f64, chart.canvas.height() as f64);
        }
    }

    fn show_placeholder(&mut self, surface: &str, message: &str) {
        let Some(container) = dom::canvas_by_id(surface).and_then(|c| c.parent_element()) else {
            return;
        };
        let Some(document) = container.owner_document() else {
            return;
        };
        let Ok(paragraph) = document.create_element("p") else {
            dom::log_warn(&format!("Placeholder unavailable on {}", surface));
            return;
        };
        paragraph.set_class_name("text-muted text-center mt-5");
        paragraph.set_text_content(Some(message));

        container.set_text_content(None);
        if container.append_child(&paragraph).is_err() {
            dom::log_warn(&format!("Placeholder unavailable on {}", surface));
        }
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Tooltip of one category: its label, then one line per series
pub fn tooltip_text(spec: &ChartSpec, index: usize) -> String {
    let mut lines = Vec::new();
    if spec.kind == ChartKind::Doughnut {
        let label = spec.labels.get(index).cloned().unwrap_or_default();
        if let Some(value) = spec.datasets.first().and_then(|d| d.values.get(index)) {
            lines.push(format!("{}: {}", label, spec.formatter.format(*value)));
        }
        return lines.join("\n");
    }

    if let Some(label) = spec.labels.get(index) {
        lines.push(label.clone());
    }
    lines.extend((0..spec.datasets.len()).filter_map(|ds| spec.tooltip_label(ds, index)));
    lines.join("\n")
}

/// Plot area of a canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Geometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_left: 90.0,
            margin_right: 20.0,
            margin_top: 20.0,
            margin_bottom: 60.0,
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Width of one category band
    pub fn band_width(&self, categories: usize) -> f64 {
        self.plot_width() / categories.max(1) as f64
    }

    /// Center and radius of a doughnut
    pub fn doughnut(&self) -> (f64, f64, f64) {
        let radius = (self.plot_height().min(self.plot_width()) / 2.0).max(1.0);
        (
            self.margin_left + self.plot_width() / 2.0,
            self.margin_top + self.plot_height() / 2.0,
            radius,
        )
    }

    /// Category under a canvas point
    pub fn hit_index(&self, spec: &ChartSpec, x: f64, y: f64) -> Option<usize> {
        let count = category_count(spec);
        if count == 0 {
            return None;
        }

        if spec.kind == ChartKind::Doughnut {
            let (cx, cy, radius) = self.doughnut();
            let (dx, dy) = (x - cx, y - cy);
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > radius || distance < radius * 0.5 {
                return None;
            }
            // Slices start at twelve o'clock and run clockwise
            let angle = (dy.atan2(dx) + std::f64::consts::FRAC_PI_2)
                .rem_euclid(std::f64::consts::TAU);
            let values = &spec.datasets.first()?.values;
            return slice_at(values, angle);
        }

        let inside_x = x >= self.margin_left && x < self.width - self.margin_right;
        let inside_y = y >= self.margin_top && y <= self.height - self.margin_bottom;
        if !inside_x || !inside_y {
            return None;
        }
        let index = ((x - self.margin_left) / self.band_width(count)).floor() as usize;
        (index < count).then_some(index)
    }

    /// Canvas y of a value for the axis range
    fn y_of(&self, value: f64, (min, max): (f64, f64)) -> f64 {
        self.margin_top + ((max - value) / (max - min)) * self.plot_height()
    }
}

fn category_count(spec: &ChartSpec) -> usize {
    spec.datasets
        .iter()
        .map(|d| d.values.len())
        .max()
        .unwrap_or(0)
        .max(spec.labels.len())
}

/// Slice containing `angle` (radians from the start, clockwise)
pub fn slice_at(values: &[f64], angle: f64) -> Option<usize> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let mut start = 0.0;
    for (index, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let sweep = value / total * std::f64::consts::TAU;
        if angle < start + sweep {
            return Some(index);
        }
        start += sweep;
    }
    None
}

/// Y-axis range including zero, padded above the largest magnitude
pub fn axis_range(spec: &ChartSpec) -> (f64, f64) {
    let values = spec.datasets.iter().flat_map(|d| d.values.iter().copied());
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = max - min;
    if span <= 0.0 {
        return (0.0, 1.0);
    }
    let padding = span * 0.1;
    (if min < 0.0 { min - padding } else { 0.0 }, max + padding)
}

fn draw_chart(ctx: &CanvasRenderingContext2d, geometry: &Geometry, spec: &ChartSpec) {
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, geometry.width, geometry.height);

    match spec.kind {
        ChartKind::Doughnut => draw_doughnut(ctx, geometry, spec),
        _ => draw_axes_chart(ctx, geometry, spec),
    }
}

fn draw_axes_chart(ctx: &CanvasRenderingContext2d, geometry: &Geometry, spec: &ChartSpec) {
    let range = axis_range(spec);
    let count = category_count(spec);
    let band = geometry.band_width(count);

    // Horizontal grid lines (5 lines) with formatted ticks
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=5 {
        let value = range.1 - (i as f64 / 5.0) * (range.1 - range.0);
        let y = geometry.y_of(value, range);
        ctx.begin_path();
        ctx.move_to(geometry.margin_left, y);
        ctx.line_to(geometry.width - geometry.margin_right, y);
        ctx.stroke();

        ctx.set_fill_style(&TEXT.into());
        let _ = ctx.fill_text(&spec.tick_label(value), 5.0, y + 4.0);
    }

    // Bars share the band; lines run through band centers
    let bar_series: Vec<usize> = spec
        .datasets
        .iter()
        .enumerate()
        .filter(|(_, d)| d.kind != ChartKind::Line)
        .map(|(i, _)| i)
        .collect();
    let bar_width = band * 0.8 / bar_series.len().max(1) as f64;
    let zero = geometry.y_of(0.0, range);

    for (slot, &ds) in bar_series.iter().enumerate() {
        let dataset = &spec.datasets[ds];
        ctx.set_fill_style(&dataset.color.as_str().into());
        for (i, value) in dataset.values.iter().enumerate() {
            let x = geometry.margin_left + i as f64 * band + band * 0.1 + slot as f64 * bar_width;
            let y = geometry.y_of(*value, range);
            ctx.fill_rect(x, y.min(zero), bar_width, (zero - y).abs());
        }
    }

    for dataset in spec.datasets.iter().filter(|d| d.kind == ChartKind::Line) {
        let color = dataset.color.as_str();
        ctx.set_stroke_style(&color.into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        for (i, value) in dataset.values.iter().enumerate() {
            let x = geometry.margin_left + (i as f64 + 0.5) * band;
            let y = geometry.y_of(*value, range);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();

        ctx.set_fill_style(&color.into());
        for (i, value) in dataset.values.iter().enumerate() {
            let x = geometry.margin_left + (i as f64 + 0.5) * band;
            let y = geometry.y_of(*value, range);
            ctx.begin_path();
            let _ = ctx.arc(x, y, 3.0, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }

    // Category labels
    ctx.set_fill_style(&TEXT.into());
    ctx.set_font("12px sans-serif");
    for (i, label) in spec.labels.iter().enumerate() {
        let x = geometry.margin_left + i as f64 * band + 4.0;
        let _ = ctx.fill_text(label, x, geometry.height - geometry.margin_bottom + 18.0);
    }

    draw_legend(
        ctx,
        geometry,
        spec.datasets.iter().map(|d| (d.label.as_str(), d.color.as_str())),
    );
}

fn draw_doughnut(ctx: &CanvasRenderingContext2d, geometry: &Geometry, spec: &ChartSpec) {
    let Some(dataset) = spec.datasets.first() else {
        return;
    };
    let total: f64 = dataset.values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return;
    }

    let (cx, cy, radius) = geometry.doughnut();
    let mut start = -std::f64::consts::FRAC_PI_2;
    for (i, value) in dataset.values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let sweep = value / total * std::f64::consts::TAU;
        ctx.set_fill_style(&SLICE_COLORS[i % SLICE_COLORS.len()].into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, start + sweep);
        ctx.close_path();
        ctx.fill();
        start += sweep;
    }

    // Hole
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.begin_path();
    let _ = ctx.arc(cx, cy, radius * 0.5, 0.0, std::f64::consts::TAU);
    ctx.fill();

    draw_legend(
        ctx,
        geometry,
        spec.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), SLICE_COLORS[i % SLICE_COLORS.len()])),
    );
}

fn draw_legend<'a>(
    ctx: &CanvasRenderingContext2d,
    geometry: &Geometry,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) {
    ctx.set_font("12px sans-serif");
    let y = geometry.height - 16.0;
    let mut x = geometry.margin_left;
    for (label, color) in entries.filter(|(label, _)| !label.is_empty()) {
        ctx.set_fill_style(&color.into());
        ctx.fill_rect(x, y - 9.0, 10.0, 10.0);
        ctx.set_fill_style(&TEXT.into());
        let _ = ctx.fill_text(label, x + 14.0, y);
        x += 24.0 + label.chars().count() as f64 * 7.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planfact::chart::DatasetSpec;
    use planfact::currency::{NumberLocale, ValueFormatter};
    use planfact::CurrencyMode;

    fn spec(kind: ChartKind, values: Vec<f64>) -> ChartSpec {
        ChartSpec {
            surface: "floorChart".to_string(),
            kind,
            labels: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            datasets: vec![DatasetSpec {
                label: "Продано".to_string(),
                kind,
                color: "rgba(75, 192, 192, 0.7)".to_string(),
                values,
            }],
            mode: CurrencyMode::Base,
            formatter: ValueFormatter::plain(NumberLocale::Ru),
        }
    }

    #[test]
    fn test_hit_index_bands() {
        let geometry = Geometry::new(800.0, 360.0);
        let spec = spec(ChartKind::Bar, vec![1.0, 2.0, 3.0]);
        let band = geometry.band_width(3);

        assert_eq!(geometry.hit_index(&spec, geometry.margin_left + 1.0, 100.0), Some(0));
        assert_eq!(
            geometry.hit_index(&spec, geometry.margin_left + band * 2.5, 100.0),
            Some(2)
        );
        assert_eq!(geometry.hit_index(&spec, 10.0, 100.0), None);
    }

    #[test]
    fn test_slice_at() {
        let values = [1.0, 0.0, 3.0];
        assert_eq!(slice_at(&values, 0.1), Some(0));
        assert_eq!(slice_at(&values, std::f64::consts::PI), Some(2));
        assert_eq!(slice_at(&[0.0, 0.0], 1.0), None);
    }

    #[test]
    fn test_axis_range() {
        assert_eq!(axis_range(&spec(ChartKind::Bar, vec![0.0, 50.0, 100.0])), (0.0, 110.0));
        assert_eq!(axis_range(&spec(ChartKind::Line, vec![0.0, 0.0])), (0.0, 1.0));
        let (min, max) = axis_range(&spec(ChartKind::Bar, vec![-10.0, 10.0]));
        assert!(min < -10.0 && max > 10.0);
    }

    #[test]
    fn test_tooltip_text() {
        let bar = spec(ChartKind::Bar, vec![1500.0, 2.0, 3.0]);
        assert_eq!(tooltip_text(&bar, 0), "1\nПродано: 1500");

        let doughnut = spec(ChartKind::Doughnut, vec![12.0, 5.0, 0.0]);
        assert_eq!(tooltip_text(&doughnut, 1), "2: 5");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use planfact::chart::DatasetSpec;
    use planfact::currency::{NumberLocale, ValueFormatter};
    use planfact::CurrencyMode;
    use wasm_bindgen_test::*;
    use web_sys::Element;

    /// Canvas inside its own container, appended to the body
    fn mount_canvas(id: &str) -> (Element, HtmlCanvasElement) {
        let document = web_sys::window().unwrap().document().unwrap();
        let container = document.create_element("div").unwrap();
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_id(id);
        canvas.set_width(800);
        canvas.set_height(360);
        container.append_child(&canvas).unwrap();
        document.body().unwrap().append_child(&container).unwrap();
        (container, canvas)
    }

    fn bar_spec(surface: &str) -> ChartSpec {
        ChartSpec {
            surface: surface.to_string(),
            kind: ChartKind::Bar,
            labels: vec!["Янв".to_string(), "Фев".to_string()],
            datasets: vec![DatasetSpec {
                label: "План".to_string(),
                kind: ChartKind::Bar,
                color: "rgba(54, 162, 235, 0.6)".to_string(),
                values: vec![1000.0, 2000.0],
            }],
            mode: CurrencyMode::Base,
            formatter: ValueFormatter::plain(NumberLocale::Ru),
        }
    }

    fn move_pointer(canvas: &HtmlCanvasElement) {
        let event = MouseEvent::new("mousemove").unwrap();
        canvas.dispatch_event(&event).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_destroy_releases_tooltip_listener() {
        let (container, canvas) = mount_canvas("canvasBackendDestroy");
        let mut backend = CanvasBackend::new();
        assert!(backend.has_surface("canvasBackendDestroy"));

        let handle = backend.create(&bar_spec("canvasBackendDestroy")).unwrap();

        // The listener rewrites the title on every move
        canvas.set_title("stale");
        move_pointer(&canvas);
        assert_eq!(canvas.title(), "");

        canvas.set_title("before destroy");
        backend.destroy(handle);
        assert_eq!(canvas.title(), "");

        canvas.set_title("after destroy");
        move_pointer(&canvas);
        assert_eq!(canvas.title(), "after destroy");

        container.remove();
    }

    #[wasm_bindgen_test]
    fn test_create_without_surface() {
        let mut backend = CanvasBackend::new();
        assert!(!backend.has_surface("noSuchCanvas"));
        assert!(backend.create(&bar_spec("noSuchCanvas")).is_none());
    }

    #[wasm_bindgen_test]
    fn test_placeholder_is_plain_text() {
        let (container, _canvas) = mount_canvas("canvasBackendPlaceholder");
        let mut backend = CanvasBackend::new();

        backend.show_placeholder("canvasBackendPlaceholder", "<b>Нет данных</b>");

        let paragraph = container.first_element_child().unwrap();
        assert_eq!(paragraph.tag_name(), "P");
        assert_eq!(paragraph.text_content().as_deref(), Some("<b>Нет данных</b>"));
        assert_eq!(paragraph.child_element_count(), 0);
        assert_eq!(container.child_element_count(), 1);

        container.remove();
    }
}
