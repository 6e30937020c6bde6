use yew::prelude::*;

use crate::chart::{
    arc_path, chart_width, color_for, is_scrollable, pie_slices, scale_x, scale_y, ChartKind,
    ConsumptionSeries,
};
use crate::format::{format_currency, format_number, CURRENCY_SYMBOL};

const PIE_SIZE: f64 = 220.0;
const PLOT_HEIGHT: f64 = 320.0;
const AXIS_GUTTER: f64 = 56.0;
const LABEL_GUTTER: f64 = 48.0;

#[derive(Properties, PartialEq)]
pub struct PieChartProps {
    pub slices: Vec<(String, f64)>,
}

#[function_component(PieChart)]
pub fn pie_chart(props: &PieChartProps) -> Html {
    let values: Vec<f64> = props.slices.iter().map(|(_, v)| *v).collect();
    let geometry = pie_slices(&values);
    if geometry.is_empty() {
        return html! {
            <p class="text-sm text-muted-foreground text-center py-10">{"No cost data for this period."}</p>
        };
    }

    let center = PIE_SIZE / 2.0;
    let radius = center - 4.0;

    html! {
        <div class="flex flex-col md:flex-row items-center gap-6">
            <svg width={PIE_SIZE.to_string()} height={PIE_SIZE.to_string()} viewBox={format!("0 0 {} {}", PIE_SIZE, PIE_SIZE)}>
                { for geometry.iter().enumerate().filter(|(_, s)| s.share > 0.0).map(|(i, slice)| {
                    let color = color_for(i).main;
                    if slice.share >= 1.0 {
                        html! { <circle cx={center.to_string()} cy={center.to_string()} r={radius.to_string()} fill={color} /> }
                    } else {
                        html! { <path d={arc_path(center, center, radius, slice)} fill={color} stroke="#fff" stroke-width="1" /> }
                    }
                }) }
            </svg>
            <ul class="space-y-2 text-sm">
                { for props.slices.iter().zip(geometry.iter()).enumerate().map(|(i, ((name, value), slice))| html! {
                    <li class="flex items-center gap-2">
                        <span class="inline-block w-3 h-3 rounded-full" style={format!("background:{}", color_for(i).main)}></span>
                        <span class="text-foreground">{ name.clone() }</span>
                        <span class="text-muted-foreground">
                            { format!("{} ({:.1}%)", format_currency(*value, CURRENCY_SYMBOL), slice.share * 100.0) }
                        </span>
                    </li>
                }) }
            </ul>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConsumptionChartProps {
    pub series: ConsumptionSeries,
    pub kind: ChartKind,
}

#[function_component(ConsumptionChart)]
pub fn consumption_chart(props: &ConsumptionChartProps) -> Html {
    let series = &props.series;
    if series.is_empty() {
        return html! {
            <p class="text-sm text-muted-foreground text-center py-10">{"No consumption data for this period."}</p>
        };
    }

    let count = series.dates.len();
    let width = chart_width(count) as f64;
    let plot_width = width - AXIS_GUTTER - 16.0;
    let max = series.max_value();
    let total_height = PLOT_HEIGHT + LABEL_GUTTER;
    let x_at = |i: usize| AXIS_GUTTER + scale_x(i, count, plot_width);
    let y_at = |v: f64| scale_y(v, max, PLOT_HEIGHT) + 8.0;
    let slot = plot_width / count as f64;
    let dataset_count = series.datasets.len().max(1) as f64;
    let bar_width = (slot * 0.8 / dataset_count).max(2.0);

    let grid = (0..=4).map(|step| {
        let value = max * step as f64 / 4.0;
        let y = y_at(value);
        html! {
            <g>
                <line x1={AXIS_GUTTER.to_string()} x2={(width - 16.0).to_string()} y1={y.to_string()} y2={y.to_string()} stroke="#e2e8f0" />
                <text x={(AXIS_GUTTER - 8.0).to_string()} y={(y + 4.0).to_string()} text-anchor="end" font-size="11" fill="#64748b">{ format_number(value) }</text>
            </g>
        }
    });

    let labels = series.labels.iter().enumerate().map(|(i, label)| {
        let x = match props.kind {
            ChartKind::Bar => AXIS_GUTTER + slot * (i as f64 + 0.5),
            _ => x_at(i),
        };
        html! {
            <text x={x.to_string()} y={(PLOT_HEIGHT + 28.0).to_string()} text-anchor="middle" font-size="11" fill="#64748b">{ label.clone() }</text>
        }
    });

    let marks = series.datasets.iter().enumerate().map(|(d, dataset)| match props.kind {
        ChartKind::Bar => html! {
            <g>
                { for dataset.values.iter().enumerate().map(|(i, value)| {
                    let x = AXIS_GUTTER + slot * i as f64 + slot * 0.1 + bar_width * d as f64;
                    let y = y_at(*value);
                    html! {
                        <rect x={x.to_string()} y={y.to_string()} width={bar_width.to_string()} height={(PLOT_HEIGHT + 8.0 - y).max(0.0).to_string()} fill={dataset.color.light}>
                            <title>{ format!("{}: {}", dataset.label, format_number(*value)) }</title>
                        </rect>
                    }
                }) }
            </g>
        },
        kind => {
            let points = dataset
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:.2},{:.2}", x_at(i), y_at(*v)))
                .collect::<Vec<_>>()
                .join(" ");
            let area = if kind == ChartKind::Area {
                let baseline = PLOT_HEIGHT + 8.0;
                let polygon = format!(
                    "{:.2},{:.2} {} {:.2},{:.2}",
                    x_at(0),
                    baseline,
                    points,
                    x_at(count - 1),
                    baseline
                );
                html! { <polygon points={polygon} fill={dataset.color.light} fill-opacity="0.35" /> }
            } else {
                html! {}
            };
            html! {
                <g>
                    { area }
                    <polyline points={points} fill="none" stroke={dataset.color.main} stroke-width="2" />
                    { for dataset.values.iter().enumerate().map(|(i, v)| html! {
                        <circle cx={x_at(i).to_string()} cy={y_at(*v).to_string()} r="3" fill={dataset.color.main}>
                            <title>{ format!("{}: {}", dataset.label, format_number(*v)) }</title>
                        </circle>
                    }) }
                </g>
            }
        }
    });

    let container = if is_scrollable(count) {
        "overflow-x-auto"
    } else {
        "overflow-hidden"
    };

    html! {
        <div>
            <div class="flex flex-wrap gap-4 mb-3 text-xs">
                { for series.datasets.iter().map(|dataset| html! {
                    <span class="flex items-center gap-2">
                        <span class="inline-block w-3 h-3 rounded-sm" style={format!("background:{}", dataset.color.main)}></span>
                        { dataset.label.clone() }
                    </span>
                }) }
            </div>
            <div class={container}>
                <svg width={width.to_string()} height={total_height.to_string()} viewBox={format!("0 0 {} {}", width, total_height)}>
                    { for grid }
                    { for marks }
                    { for labels }
                </svg>
            </div>
        </div>
    }
}
