use airquality_processor::models::{Observation, Pollutant};
use airquality_processor::processors::{
    compute_yearly_pollutants, compute_yearly_temperature, correlate_with_temperature,
    join_on_year,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Hourly readings for consecutive years, roughly one station's file
fn create_hourly_observations(years: i32) -> Vec<Observation> {
    let mut observations = Vec::with_capacity(years as usize * 365 * 24);

    for year in 2013..2013 + years {
        for day in 0..365u32 {
            for hour in 0..24u32 {
                let mut observation = Observation::new(year);
                observation.month = day / 31 + 1;
                observation.day = day % 28 + 1;
                observation.hour = hour;

                let seasonal = (day as f64 / 365.0 * std::f64::consts::TAU).sin();
                observation.temperature = Some(13.0 + 15.0 * seasonal);

                for (i, pollutant) in Pollutant::ALL.into_iter().enumerate() {
                    // Every seventh hour drops a pollutant reading
                    if (hour as usize + i) % 7 == 0 {
                        continue;
                    }
                    let value = 20.0 * (i as f64 + 1.0) + 10.0 * seasonal.abs();
                    match pollutant {
                        Pollutant::Pm25 => observation.pm25 = Some(value),
                        Pollutant::Pm10 => observation.pm10 = Some(value),
                        Pollutant::So2 => observation.so2 = Some(value),
                        Pollutant::No2 => observation.no2 = Some(value),
                        Pollutant::O3 => observation.o3 = Some(value),
                    }
                }

                observations.push(observation);
            }
        }
    }

    observations
}

fn benchmark_yearly_temperature(c: &mut Criterion) {
    let mut group = c.benchmark_group("yearly_temperature");

    for years in [1, 4, 10] {
        let observations = create_hourly_observations(years);
        group.bench_with_input(
            BenchmarkId::from_parameter(years),
            &observations,
            |b, observations| {
                b.iter(|| compute_yearly_temperature(black_box(observations), 2013, 2017))
            },
        );
    }

    group.finish();
}

fn benchmark_yearly_pollutants(c: &mut Criterion) {
    let mut group = c.benchmark_group("yearly_pollutants");

    for years in [1, 4, 10] {
        let observations = create_hourly_observations(years);
        group.bench_with_input(
            BenchmarkId::from_parameter(years),
            &observations,
            |b, observations| b.iter(|| compute_yearly_pollutants(black_box(observations))),
        );
    }

    group.finish();
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let observations = create_hourly_observations(4);

    c.bench_function("full_pipeline_4_years", |b| {
        b.iter(|| {
            let temperature =
                compute_yearly_temperature(black_box(&observations), 2013, 2017).unwrap();
            let pollutants = compute_yearly_pollutants(black_box(&observations));
            let combined = join_on_year(&temperature, &pollutants);
            black_box(correlate_with_temperature(&combined))
        })
    });
}

criterion_group!(
    benches,
    benchmark_yearly_temperature,
    benchmark_yearly_pollutants,
    benchmark_full_pipeline
);
criterion_main!(benches);
