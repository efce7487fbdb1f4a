use charming::{
    Chart as CharmingChart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, LineStyle, LineStyleType, SplitLine,
        TextStyle, Tooltip, Trigger,
    },
    renderer::WasmRenderer,
    series::{Bar, Line},
};
use std::rc::Rc;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::config::Config;
use crate::utils::debounce::debounced_resize_listener;

/// Category labels and their values
pub type Series = (Vec<String>, Vec<f64>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

#[derive(Properties, PartialEq)]
pub struct ChartProps {
    /// DOM id of the render target; must be unique on the page
    pub id: AttrValue,
    pub title: AttrValue,
    pub series: Rc<Series>,
    #[prop_or_default]
    pub kind: ChartKind,
    #[prop_or_default]
    pub unit: AttrValue,
}

#[function_component(Chart)]
pub fn chart(props: &ChartProps) -> Html {
    let container_ref = use_node_ref();

    {
        let container_ref = container_ref.clone();
        let layout = ChartLayout {
            id: props.id.clone(),
            title: props.title.clone(),
            kind: props.kind,
            unit: props.unit.clone(),
        };

        use_effect_with(
            (props.series.clone(), container_ref, layout),
            |(series, container_ref, layout)| {
                let listener = container_ref.cast::<HtmlElement>().and_then(|container| {
                    render_chart(&container, series, layout);

                    let series = series.clone();
                    let layout = layout.clone();
                    debounced_resize_listener(
                        move || render_chart(&container, &series, &layout),
                        Config::RESIZE_DEBOUNCE_MS,
                    )
                });

                move || drop(listener)
            },
        );
    }

    html! {
        <div class="chart-container" ref={container_ref}>
            <div id={props.id.clone()} />
        </div>
    }
}

#[derive(Clone, PartialEq)]
struct ChartLayout {
    id: AttrValue,
    title: AttrValue,
    kind: ChartKind,
    unit: AttrValue,
}

fn render_chart(container: &HtmlElement, series: &Series, layout: &ChartLayout) {
    let width = container.client_width().cast_unsigned();
    let height = container.client_height().cast_unsigned();

    if width == 0 || height == 0 || series.0.is_empty() {
        return;
    }

    let chart = build_chart(series, layout);
    if let Err(e) = WasmRenderer::new(width, height).render(&layout.id, &chart) {
        log::error!("Render error: {e:?}");
    }
}

fn build_chart(series: &Series, layout: &ChartLayout) -> CharmingChart {
    let (x_data, y_data) = series;
    let (title_color, axis_color, grid_color) = ("#1f2937", "#6b7280", "#e5e7eb");
    // Thin out labels on long ranges
    let label_interval = i32::try_from(x_data.len() / 10).unwrap_or(0).max(1) - 1;

    let chart = CharmingChart::new()
        .title(
            Title::new()
                .text(layout.title.to_string())
                .left("center")
                .text_style(TextStyle::new().font_size(16).color(title_color)),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("8%")
                .right("4%")
                .bottom("18%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(x_data.clone())
                .axis_label(
                    AxisLabel::new()
                        .rotate(45)
                        .color(axis_color)
                        .interval(label_interval),
                ),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name(layout.unit.to_string())
                .axis_label(AxisLabel::new().color(axis_color))
                .split_line(
                    SplitLine::new().line_style(
                        LineStyle::new()
                            .color(grid_color)
                            .type_(LineStyleType::Dashed),
                    ),
                ),
        );

    match layout.kind {
        ChartKind::Bar => chart.series(Bar::new().data(y_data.clone()).bar_width("70%")),
        ChartKind::Line => chart.series(Line::new().data(y_data.clone())),
    }
}
