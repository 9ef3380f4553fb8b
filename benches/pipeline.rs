use climate_energy::{
    correlation_matrix, DailyObservation, EnergyLongRecord, MasterField, Pipeline,
    GENERATION_CATEGORY,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const REGIONS: [&str; 8] = [
    "Goa",
    "Kerala",
    "Bihar",
    "Punjab",
    "Assam",
    "Odisha",
    "Sikkim",
    "Tripura",
];

fn synthetic_daily() -> Vec<DailyObservation> {
    let mut rows = Vec::new();
    for (r, region) in REGIONS.iter().enumerate() {
        for month in 1..=12u32 {
            for day in 1..=28u32 {
                let t = f64::from(month * 31 + day) + r as f64;
                // Every tenth day carries the missing-value sentinel.
                let max_temp = if day % 10 == 0 { -999.0 } else { 25.0 + (t / 20.0).sin() * 8.0 };
                rows.push(DailyObservation {
                    region: region.to_string(),
                    date: format!("2024{month:02}{day:02}"),
                    max_temp: Some(max_temp),
                    min_temp: Some(15.0 + (t / 25.0).cos() * 5.0),
                    humidity: Some(60.0 + (t / 15.0).sin() * 20.0),
                    precipitation: Some((t / 7.0).sin().max(0.0) * 12.0),
                });
            }
        }
    }
    rows
}

fn synthetic_energy() -> Vec<EnergyLongRecord> {
    let mut rows = Vec::new();
    for (r, region) in REGIONS.iter().enumerate() {
        for month in 1..=12u32 {
            let base = 1000.0 + r as f64 * 250.0 + f64::from(month) * 40.0;
            for (variable, value) in [
                ("Total Generation", base),
                ("Coal", base * 0.6),
                ("Solar", base * 0.1),
                ("Wind", base * 0.05),
                ("Gas", base * 0.1),
            ] {
                rows.push(EnergyLongRecord {
                    region: region.to_string(),
                    date: format!("2024-{month:02}-01"),
                    category: GENERATION_CATEGORY.to_string(),
                    variable: variable.to_string(),
                    value: Some(value),
                });
            }
        }
    }
    rows
}

fn bench_pipeline(c: &mut Criterion) {
    let daily = synthetic_daily();
    let energy = synthetic_energy();
    let pipeline = Pipeline::default();

    c.bench_function("pipeline_run", |b| {
        b.iter(|| pipeline.run(black_box(&daily), black_box(&energy)))
    });

    if let Ok(output) = pipeline.run(&daily, &energy) {
        c.bench_function("analyze_region", |b| {
            b.iter(|| pipeline.analyze_region(black_box(&output.master), black_box("Kerala")))
        });
        c.bench_function("correlation_matrix", |b| {
            b.iter(|| correlation_matrix(black_box(&output.master.records), &MasterField::HEATMAP))
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
