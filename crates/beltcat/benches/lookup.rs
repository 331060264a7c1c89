//! Benchmarks for table reconstruction and power lookup.
//!
//! A synthetic catalog page (24 diameters by 40 speeds) is parsed from text,
//! then queried on and between grid points with both interpolation
//! strategies.

use beltcat::{Interpolator, MissingCornerPolicy, PowerTable, Profile, StrategyChoice, parse_table};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const DIAMETERS: usize = 24;
const SPEEDS: usize = 40;

/// Render a catalog table the way text extraction flattens it.
fn catalog_text() -> String {
    let mut out = String::from("Rated power per belt kW\nProfile C\n");
    let header: Vec<String> = (0..DIAMETERS).map(|i| (100 + 15 * i).to_string()).collect();
    out.push_str(&header.join(" "));
    out.push('\n');
    for r in 0..SPEEDS {
        let speed = 700 + 100 * r;
        if speed >= 1000 {
            out.push_str(&format!("{}.{:03}", speed / 1000, speed % 1000));
        } else {
            out.push_str(&speed.to_string());
        }
        for c in 0..DIAMETERS {
            let hundredths = 100 + 7 * r + 11 * c;
            out.push_str(&format!(" {},{:02}", hundredths / 100, hundredths % 100));
        }
        out.push('\n');
    }
    out.push_str("Profile D\n");
    out
}

fn profile() -> Profile {
    Profile::new("C", "Profile C", "Profile D", 500)
}

fn table() -> PowerTable {
    parse_table(&catalog_text(), &profile()).unwrap().value.table
}

fn queries() -> Vec<(f64, f64)> {
    (0..200)
        .map(|i| {
            let d = 90.0 + (i as f64 * 2.37) % 380.0;
            let n = 650.0 + (i as f64 * 31.3) % 4100.0;
            (d, n)
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let text = catalog_text();
    let profile = profile();
    c.bench_function("parse_table_24x40", |b| {
        b.iter(|| parse_table(black_box(&text), &profile).unwrap())
    });
}

fn bench_lookup(c: &mut Criterion) {
    let table = table();
    let queries = queries();
    let mut group = c.benchmark_group("lookup_200_queries");

    for (name, strategy) in [
        ("bilinear", StrategyChoice::Bilinear),
        ("scattered", StrategyChoice::Scattered),
    ] {
        let interp = Interpolator::new(&table, strategy);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut total = 0.0;
                for &(d, n) in &queries {
                    total += interp
                        .lookup(black_box(d), black_box(n), MissingCornerPolicy::Zero)
                        .power;
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let table = table();
    c.bench_function("build_scattered_interpolator", |b| {
        b.iter(|| Interpolator::new(black_box(&table), StrategyChoice::Scattered))
    });
}

criterion_group!(benches, bench_parse, bench_lookup, bench_build);
criterion_main!(benches);
