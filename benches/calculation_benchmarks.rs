//! Performance benchmarks for the Outsourcing Cost Engine.
//!
//! Covers the bare pipeline and the HTTP route:
//! - Pipeline, presumed regime with margin: < 50μs mean
//! - Pipeline, simplified regime with vacation replacement: < 50μs mean
//! - POST /calculate, single request: < 500μs mean
//! - Batch of 100 requests: < 50ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use outsourcing_cost_engine::api::{create_router, AppState};
use outsourcing_cost_engine::calculation::compute;
use outsourcing_cost_engine::config::ConfigLoader;
use outsourcing_cost_engine::models::{AdditionalCost, InputSnapshot, Percent, TaxRegime};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/standard").expect("Failed to load config");
    AppState::new(config)
}

fn percent(field: &str, points: i64) -> Percent {
    Percent::new(field, Decimal::from(points)).expect("valid percent")
}

/// A presumed-profit snapshot with every block populated.
fn presumed_snapshot() -> InputSnapshot {
    InputSnapshot {
        gross_salary: Decimal::new(200000, 2),
        tax_regime: Some(TaxRegime::PresumedOrRealProfit),
        daily_transport_fare: Decimal::new(1000, 2),
        daily_meal_allowance: Decimal::new(2000, 2),
        additional_costs: vec![AdditionalCost {
            label: "Uniforms".into(),
            amount: Decimal::new(15000, 2),
        }],
        additional_cost_percent: percent("additional_cost_percent", 5),
        margin_percent: Some(percent("margin_percent", 20)),
        ..InputSnapshot::default()
    }
}

/// A simplified-regime snapshot with vacation replacement.
fn simplified_snapshot() -> InputSnapshot {
    InputSnapshot {
        gross_salary: Decimal::new(300000, 2),
        tax_regime: Some(TaxRegime::Simplified),
        margin_percent: Some(percent("margin_percent", 15)),
        simplified_tax_rate: Some(percent("simplified_tax_rate", 6)),
        replace_vacation: true,
        ..InputSnapshot::default()
    }
}

/// Creates a /calculate body for the given employee count.
fn create_request_body(employee_count: u32) -> String {
    serde_json::json!({
        "gross_salary": "2000.00",
        "tax_regime": "presumed_or_real_profit",
        "daily_transport_fare": "10.00",
        "daily_meal_allowance": "20.00",
        "additional_costs": [
            { "label": "Uniforms", "amount": "150.00" },
            { "label": "Equipment", "amount": "80.00" }
        ],
        "additional_cost_percent": 5,
        "margin_percent": 20,
        "employee_count": employee_count
    })
    .to_string()
}

fn calculate_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/calculate")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Benchmark: The pipeline without the HTTP layer.
///
/// Target: < 50μs mean
fn bench_compute(c: &mut Criterion) {
    let state = create_test_state();
    let policy = state.policy();
    let presumed = presumed_snapshot();
    let simplified = simplified_snapshot();

    let mut group = c.benchmark_group("compute");

    group.bench_function("presumed_with_margin", |b| {
        b.iter(|| black_box(compute(black_box(&presumed), policy).unwrap()))
    });

    group.bench_function("simplified_with_vacation_replacement", |b| {
        b.iter(|| black_box(compute(black_box(&simplified), policy).unwrap()))
    });

    group.finish();
}

/// Benchmark: Single request through the router.
///
/// Target: < 500μs mean
fn bench_single_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = create_request_body(1);

    c.bench_function("single_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router.oneshot(calculate_request(body.clone())).await.unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Batch of 100 quotes with varying salaries.
///
/// Target: < 50ms mean
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    let requests: Vec<String> = (0..100)
        .map(|i| {
            let regime = if i % 2 == 0 {
                "presumed_or_real_profit"
            } else {
                "simplified"
            };
            serde_json::json!({
                "gross_salary": Decimal::new(150000 + i * 2500, 2).to_string(),
                "tax_regime": regime,
                "daily_transport_fare": "9.50",
                "daily_meal_allowance": "25.00",
                "margin_percent": 10 + i % 20,
                "simplified_tax_rate": 8,
                "replace_vacation": i % 3 == 0
            })
            .to_string()
        })
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &requests {
                let router = create_router(state.clone());
                let response = router.oneshot(calculate_request(body.clone())).await.unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });

    group.finish();
}

/// Benchmark: Employee counts, to confirm pricing cost does not scale with headcount.
fn bench_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    let mut group = c.benchmark_group("scaling");

    for employee_count in [1u32, 10, 100, 999].iter() {
        let router = create_router(state.clone());
        let body = create_request_body(*employee_count);

        group.bench_with_input(
            BenchmarkId::new("employees", employee_count),
            employee_count,
            |b, _| {
                b.to_async(&rt).iter(|| async {
                    let router = router.clone();
                    let response = router.oneshot(calculate_request(body.clone())).await.unwrap();
                    black_box(response)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute,
    bench_single_request,
    bench_batch_100,
    bench_scaling,
);
criterion_main!(benches);
