use criterion::{Criterion, criterion_group, criterion_main};
use numbus::api::{ScatterRenderer, StudioSnapshot, Template, TemplateCompositor};
use numbus::core::{
    AxisMapping, AxisRange, PlotPoint, Rect, ScaleKind, Size, sample_catmull_rom,
};
use numbus::interaction::{ViewportTransform, ViewportTransformConfig};
use std::hint::black_box;

fn columns(count: usize) -> Vec<Vec<String>> {
    let xs: Vec<String> = (0..count).map(|i| i.to_string()).collect();
    let ys: Vec<String> = (0..count)
        .map(|i| {
            let t = i as f64;
            (100.0 + (t * 0.05).sin() * 40.0).to_string()
        })
        .collect();
    vec![xs, ys]
}

fn bench_log_mapping_round_trip(c: &mut Criterion) {
    let mapping = AxisMapping::new(AxisRange::new(1e-3, 1e6), ScaleKind::Log, 1920.0, true);

    c.bench_function("log_mapping_round_trip", |b| {
        b.iter(|| {
            let px = mapping.to_pixel(black_box(4_321.123));
            let _ = mapping.from_pixel(px);
        })
    });
}

fn bench_catmull_rom_10k(c: &mut Criterion) {
    let points: Vec<PlotPoint> = (0..10_000)
        .map(|i| {
            let t = i as f64;
            PlotPoint::new(t * 0.19, 300.0 + (t * 0.01).cos() * 120.0, t, t)
        })
        .collect();

    c.bench_function("catmull_rom_sampling_10k", |b| {
        b.iter(|| {
            let _ = sample_catmull_rom(black_box(&points));
        })
    });
}

fn bench_render_data_10k(c: &mut Criterion) {
    let mut renderer = ScatterRenderer::default();
    renderer.set_data(columns(10_000), vec!["x".to_owned(), "y".to_owned()]);
    let plot_area = Rect::new(80.0, 40.0, 1760.0, 960.0);

    c.bench_function("scatter_render_data_10k", |b| {
        b.iter(|| {
            let _ = renderer
                .render_data(black_box(plot_area))
                .expect("render should succeed");
        })
    });
}

fn bench_studio_snapshot_json_2k(c: &mut Criterion) {
    let template = Template::from_json_str(
        r#"{"svg":{"viewBox":{"x":0,"y":0,"width":1600,"height":900},"elements":[
            {"type":"rect","id":"plot-area","attributes":{"x":80,"y":40,"width":1440,"height":780}}
        ]}}"#,
    )
    .expect("valid template");
    let mut renderer = ScatterRenderer::default();
    renderer.set_data(columns(2_000), vec!["x".to_owned(), "y".to_owned()]);
    let mut compositor = TemplateCompositor::new(renderer);
    compositor.set_template(template);
    compositor.render_template().expect("render template");
    compositor.render_data().expect("render data");
    let viewport =
        ViewportTransform::new(ViewportTransformConfig::default(), Size::new(1600.0, 900.0))
            .expect("valid viewport");

    c.bench_function("studio_snapshot_json_2k", |b| {
        b.iter(|| {
            let _ = StudioSnapshot::capture(black_box(&compositor), black_box(&viewport))
                .to_json_contract_v1_pretty()
                .expect("snapshot json");
        })
    });
}

criterion_group!(
    benches,
    bench_log_mapping_round_trip,
    bench_catmull_rom_10k,
    bench_render_data_10k,
    bench_studio_snapshot_json_2k
);
criterion_main!(benches);
