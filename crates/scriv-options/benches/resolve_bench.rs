//! Full resolve-pass benchmarks: migrate → validate → compute → diff.

use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

use scriv_options::{
    AccessibilitySupport, ComputeMemory, Environment, FontInfo, FontSpec, InputMode, RawOptions,
    catalogue, compute, diff, migrate_options, validate,
};

fn bench_env() -> Environment {
    Environment {
        outer_width: 1200.0,
        outer_height: 800.0,
        pixel_ratio: 2.0,
        zoom_factor: 1.0,
        font_info: FontInfo::estimate(&FontSpec::default()),
        accessibility_support: AccessibilitySupport::Unknown,
        tab_focus_mode: false,
        input_mode: InputMode::Insert,
        extra_class_name: String::new(),
        view_line_count: 12_000,
        line_numbers_digit_count: 5,
        is_dominated_by_long_lines: false,
        glyph_margin_decoration_lane_count: 1,
        memory: Rc::new(RefCell::new(ComputeMemory::new())),
    }
}

fn raw_fixture() -> RawOptions {
    RawOptions::from_value(json!({
        "wordWrap": "bounded",
        "wordWrapColumn": 100,
        "minimap": { "enabled": true, "size": "fit", "scale": 2 },
        "hover": { "delay": 500 },
        "lineNumbers": "relative",
        "fontSize": 13,
        "scrollBeyondLastLine": false
    }))
}

fn bench_migrate(c: &mut Criterion) {
    c.bench_function("migrate_legacy_raw", |b| {
        let legacy = json!({
            "wordWrap": true,
            "hover": false,
            "autoClosingBrackets": false,
            "suggest": { "filteredTypes": { "keyword": false } }
        });
        b.iter(|| {
            let mut raw = RawOptions::from_value(legacy.clone());
            migrate_options(&mut raw);
            black_box(raw)
        });
    });
}

fn bench_validate_compute(c: &mut Criterion) {
    let registry = catalogue::builtin_registry();
    let raw = raw_fixture();
    let env = bench_env();
    c.bench_function("validate_pass", |b| {
        b.iter(|| black_box(validate(&registry, &raw)));
    });
    c.bench_function("compute_pass", |b| {
        let validated = validate(&registry, &raw);
        b.iter(|| black_box(compute(&registry, &validated, &env)));
    });
}

fn bench_diff(c: &mut Criterion) {
    let registry = catalogue::builtin_registry();
    let env = bench_env();
    let a = compute(&registry, &validate(&registry, &raw_fixture()), &env);
    let mut other_raw = raw_fixture();
    other_raw.write("readOnly", json!(true));
    let b_snapshot = compute(&registry, &validate(&registry, &other_raw), &env);
    c.bench_function("diff_identical", |bench| {
        bench.iter(|| black_box(diff(&a, &a.clone())));
    });
    c.bench_function("diff_one_change", |bench| {
        bench.iter(|| black_box(diff(&a, &b_snapshot)));
    });
}

criterion_group!(benches, bench_migrate, bench_validate_compute, bench_diff);
criterion_main!(benches);
