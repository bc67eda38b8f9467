use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use supplier_topsis::{
    optimize, CsvRunRecorder, InMemoryRecorder, OptimizationRequest, OptimizeError, Optimizer,
    RunId, RunRecorder, RunStatus, Supplier,
};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_history(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!(
        "supplier-topsis-{tag}-{}-{nanos}-{}",
        std::process::id(),
        DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
    ))
}

fn catalog() -> Vec<Supplier> {
    vec![
        Supplier::new(1, "Northwind", 12.0, 7.5, 6.0, 200),
        Supplier::new(2, "Contoso", 9.5, 6.0, 9.0, 150),
        Supplier::new(3, "Fabrikam", 15.0, 9.5, 3.0, 120),
        Supplier::new(4, "Tailspin", 11.0, 8.0, 5.0, 80),
    ]
}

#[test]
fn scenario_a_single_supplier_takes_the_demand() {
    let suppliers = vec![Supplier::new(1, "Solo", 10.0, 8.0, 5.0, 100)];
    let outcome = optimize(&suppliers, 50, 0.0, (0.3, 0.5, 0.2)).unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].allocated_units, 50);
    assert_eq!(outcome.results[0].item_cost, 500.0);
    assert_eq!(outcome.results[0].topsis_score, 0.0);
    assert!(outcome.summary.is_supply_met);
    assert!(outcome.summary.is_quality_met);
    assert_eq!(outcome.summary.total_cost, 500.0);
}

#[test]
fn scenario_b_capacity_short_of_demand() {
    let suppliers = vec![
        Supplier::new(1, "Small", 10.0, 8.0, 5.0, 30),
        Supplier::new(2, "Smaller", 12.0, 6.0, 4.0, 20),
    ];
    let outcome = optimize(&suppliers, 80, 0.0, (0.3, 0.5, 0.2)).unwrap();

    let allocated: u64 = outcome.results.iter().map(|r| r.allocated_units).sum();
    assert_eq!(allocated, 50);
    assert!(!outcome.summary.is_supply_met);
    assert_eq!(outcome.summary.unmet_demand, 30);
    assert_eq!(outcome.summary.status(), RunStatus::InsufficientSupply);
}

#[test]
fn scenario_c_quality_bar_missed_with_supply_met() {
    // Supplier 1 dominates supplier 2 on every criterion: scores 1 and 0.
    let suppliers = vec![
        Supplier::new(1, "Best", 5.0, 9.0, 2.0, 30),
        Supplier::new(2, "Worst", 10.0, 4.0, 8.0, 100),
    ];
    let outcome = optimize(&suppliers, 60, 0.6, (0.3, 0.5, 0.2)).unwrap();

    assert!(outcome.summary.is_supply_met);
    assert!((outcome.summary.final_avg_score - 0.5).abs() < 1e-12);
    assert!(!outcome.summary.is_quality_met);
    assert_eq!(outcome.summary.status(), RunStatus::LowQuality);

    let unreachable = optimize(&suppliers, 10, 1.5, (0.3, 0.5, 0.2)).unwrap();
    assert!(unreachable.summary.is_supply_met);
    assert!(!unreachable.summary.is_quality_met);
}

#[test]
fn scenario_d_empty_catalog_is_invalid() {
    let err = optimize(&[], 10, 0.0, (0.3, 0.5, 0.2)).unwrap_err();
    assert_eq!(err, OptimizeError::EmptySupplierSet);
    assert!(err.is_invalid_input());
}

#[test]
fn non_positive_demand_and_negative_weights_are_invalid() {
    assert_eq!(
        optimize(&catalog(), 0, 0.0, (0.3, 0.5, 0.2)).unwrap_err(),
        OptimizeError::NonPositiveDemand(0)
    );
    assert_eq!(
        optimize(&catalog(), -20, 0.0, (0.3, 0.5, 0.2)).unwrap_err(),
        OptimizeError::NonPositiveDemand(-20)
    );
    assert!(matches!(
        optimize(&catalog(), 10, 0.0, (0.3, -0.5, 0.2)).unwrap_err(),
        OptimizeError::InvalidWeight { .. }
    ));
}

#[test]
fn repeated_calls_are_identical() {
    let first = optimize(&catalog(), 400, 0.4, (0.2, 0.5, 0.3)).unwrap();
    let second = optimize(&catalog(), 400, 0.4, (0.2, 0.5, 0.3)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_requests_do_not_interfere() {
    let suppliers = catalog();
    let expected = optimize(&suppliers, 300, 0.3, (0.4, 0.4, 0.2)).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| optimize(&suppliers, 300, 0.3, (0.4, 0.4, 0.2)).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn csv_history_records_complete_runs() {
    let root = temp_history("history");
    let mut recorder = CsvRunRecorder::open(&root).expect("open history");
    let request = OptimizationRequest::new(350, 0.2, (0.3, 0.5, 0.2));

    let recorded = Optimizer::new()
        .optimize_and_record(&catalog(), &request, &mut recorder)
        .expect("optimize");
    let id = recorded.run_id.expect("recorded");
    assert_eq!(id, RunId(1));

    let header = recorder.load_summary(id).expect("summary");
    assert_eq!(header.total_demand, 350);
    assert_eq!(header.is_supply_met, recorded.outcome.summary.is_supply_met);

    let rows = recorder.load_allocations(id).expect("allocations");
    let ids: Vec<u32> = rows.iter().map(|r| r.supplier_id).collect();
    let expected: Vec<u32> = recorded
        .outcome
        .results
        .iter()
        .map(|r| r.supplier.id)
        .collect();
    assert_eq!(ids, expected);
    let units: u64 = rows.iter().map(|r| r.allocated_units).sum();
    assert_eq!(units, 350);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn csv_history_keeps_recording_past_a_stray_file() {
    let root = temp_history("stray");
    let mut recorder = CsvRunRecorder::open(&root).expect("open history");
    // A stray file takes the name the first run directory would use.
    fs::write(root.join("run-000001"), "not a run").unwrap();

    let request = OptimizationRequest::new(100, 0.0, (0.3, 0.5, 0.2));
    let optimizer = Optimizer::new();
    for expected in [RunId(2), RunId(3)] {
        let recorded = optimizer
            .optimize_and_record(&catalog(), &request, &mut recorder)
            .expect("optimize");
        assert_eq!(recorded.run_id.expect("recorded"), expected);
        assert_eq!(recorded.outcome.summary.allocated_units, 100);
    }
    assert_eq!(recorder.list_runs().unwrap(), vec![RunId(2), RunId(3)]);

    let leftovers: Vec<_> = fs::read_dir(&root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".staging-"))
        .collect();
    assert!(leftovers.is_empty());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn recorder_works_through_a_trait_object() {
    let mut recorder = InMemoryRecorder::new();
    let sink: &mut dyn RunRecorder = &mut recorder;
    let request = OptimizationRequest::new(50, 0.0, (0.3, 0.5, 0.2));

    let recorded = Optimizer::new()
        .optimize_and_record(&catalog(), &request, sink)
        .unwrap();
    assert_eq!(recorded.run_id.unwrap(), RunId(1));
    assert_eq!(recorder.len(), 1);
}
