//! Batch scheduling: result order, partial failure and observers

use dds::{
    solve_all_strains, solve_batch, BackendKind, BatchMode, BatchScheduler, Card, Deal, DealError, Denomination,
    EngineConfig, EngineError, ExecutionContext, Granularity, LogObserver, Rank, Seat, SolveError, SolveObserver,
    SolveRequest, Suit, TaskInfo, TaskReport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const SINGLE_SUITS: [&str; 4] = [
    "N:AKQJT98765432... .AKQJT98765432.. ..AKQJT98765432. ...AKQJT98765432",
    "N:.AKQJT98765432.. AKQJT98765432... ...AKQJT98765432 ..AKQJT98765432.",
    "N:...AKQJT98765432 ..AKQJT98765432. .AKQJT98765432.. AKQJT98765432...",
    "W:AKQJT98765432... .AKQJT98765432.. ..AKQJT98765432. ...AKQJT98765432",
];

fn deals() -> Vec<Deal> {
    SINGLE_SUITS.iter().map(|pbn| Deal::from_pbn(pbn).unwrap()).collect()
}

fn context(backend: BackendKind, threads: usize) -> ExecutionContext {
    ExecutionContext::new(EngineConfig::default().with_backend(backend).with_threads(threads)).unwrap()
}

/// Deal with the two of clubs dealt twice
fn broken_deal() -> Deal {
    let mut deal = deals().remove(0);
    deal.hand_mut(Seat::North).add_card(Card::new(Suit::Clubs, Rank::Two));
    deal
}

/// Holds the first tasks back so later ones finish first
struct DelayObserver {
    delays: Vec<u64>,
}

impl SolveObserver for DelayObserver {
    fn task_started(&self, info: &TaskInfo) {
        if let Some(&millis) = self.delays.get(info.request) {
            thread::sleep(Duration::from_millis(millis));
        }
    }
}

#[derive(Default)]
struct CountingObserver {
    started: AtomicUsize,
    finished: AtomicUsize,
    failed: AtomicUsize,
    requests: Mutex<Vec<usize>>,
}

impl SolveObserver for CountingObserver {
    fn task_started(&self, info: &TaskInfo) {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(info.request);
    }

    fn task_finished(&self, _info: &TaskInfo, report: &TaskReport) {
        self.finished.fetch_add(1, Ordering::SeqCst);
        if !report.ok {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn test_order_preserved_under_delays() {
    let deals: Vec<Deal> = deals().into_iter().cycle().take(8).collect();
    let expected: Vec<_> = deals.iter().map(|deal| solve_all_strains(deal).unwrap()).collect();
    let requests: Vec<SolveRequest> = deals.into_iter().map(SolveRequest::all_strains).collect();
    // Earlier requests sleep longer
    let delays = (0..requests.len() as u64).rev().map(|i| i * 15).collect();
    let observer = Arc::new(DelayObserver { delays });

    for backend in BackendKind::ALL {
        let scheduler = BatchScheduler::new(context(backend, 4)).with_observer(observer.clone());
        let results = scheduler.solve(&requests).unwrap();
        assert_eq!(results.len(), requests.len());
        for (i, (result, table)) in results.into_iter().zip(&expected).enumerate() {
            assert_eq!(&result.unwrap().to_table(), table, "{backend} request {i}");
        }
    }
}

#[test]
fn test_partial_failure() {
    let mut deals = deals();
    deals.insert(2, broken_deal());
    let requests: Vec<SolveRequest> = deals.iter().cloned().map(SolveRequest::all_strains).collect();

    for backend in BackendKind::ALL {
        let results = BatchScheduler::new(context(backend, 2)).solve(&requests).unwrap();
        assert_eq!(results.len(), 5);
        for (i, result) in results.iter().enumerate() {
            if i == 2 {
                assert!(
                    matches!(result, Err(SolveError::Deal(DealError::DuplicateCard { .. }))),
                    "{backend}: {result:?}"
                );
            } else {
                assert_eq!(result.as_ref().map(|r| r.results.len()), Ok(20), "{backend} request {i}");
            }
        }
    }
}

#[test]
fn test_streaming_callback_order() {
    let deals: Vec<Deal> = deals().into_iter().cycle().take(6).collect();
    let requests: Vec<SolveRequest> = deals.into_iter().map(SolveRequest::all_strains).collect();
    let delays = vec![40, 0, 30, 0, 20, 0];
    let scheduler = BatchScheduler::new(context(BackendKind::WorkStealing, 3))
        .with_observer(Arc::new(DelayObserver { delays }));

    let mut seen = Vec::new();
    scheduler
        .solve_streaming(&requests, |index, result| {
            assert!(result.is_ok());
            seen.push(index);
        })
        .unwrap();
    assert_eq!(seen, (0..6usize).collect::<Vec<_>>());
}

#[test]
fn test_per_strain_matches_per_request() {
    let requests: Vec<SolveRequest> = deals().into_iter().map(SolveRequest::all_strains).collect();
    let per_request = BatchScheduler::new(context(BackendKind::WorkerPool, 4))
        .solve(&requests)
        .unwrap();
    let per_strain = BatchScheduler::new(context(BackendKind::WorkerPool, 4))
        .with_granularity(Granularity::PerStrain)
        .solve(&requests)
        .unwrap();
    assert_eq!(per_request, per_strain);
}

#[test]
fn test_targets() {
    let deal = deals().remove(0);
    let requests = vec![
        SolveRequest::board(deal.clone(), Denomination::Spades, Seat::South),
        SolveRequest::strain(deal.clone(), Denomination::Hearts),
        SolveRequest::all_strains(deal),
    ];
    let results = BatchScheduler::new(context(BackendKind::ThreadPerTask, 2))
        .with_granularity(Granularity::PerStrain)
        .solve(&requests)
        .unwrap();

    let board = results[0].as_ref().unwrap();
    assert_eq!(board.results.len(), 1);
    assert_eq!(board.tricks(Denomination::Spades, Seat::South), Some(13));
    assert_eq!(board.tricks(Denomination::Spades, Seat::North), None);

    let strain = results[1].as_ref().unwrap();
    assert_eq!(strain.results.len(), 4);
    assert_eq!(strain.to_table().row(Denomination::Hearts), [0, 13, 0, 13]);

    assert_eq!(results[2].as_ref().unwrap().results.len(), 20);
}

#[test]
fn test_observer_sees_every_task() {
    let mut deals = deals();
    deals.truncate(2);
    deals.push(broken_deal());
    let requests: Vec<SolveRequest> = deals.into_iter().map(SolveRequest::all_strains).collect();
    let observer = Arc::new(CountingObserver::default());

    let results = BatchScheduler::new(context(BackendKind::DataParallel, 2))
        .with_granularity(Granularity::PerStrain)
        .with_observer(observer.clone())
        .solve(&requests)
        .unwrap();

    assert!(results[2].is_err());
    // Rejected deals never reach a task
    assert_eq!(observer.started.load(Ordering::SeqCst), 10);
    assert_eq!(observer.finished.load(Ordering::SeqCst), 10);
    assert_eq!(observer.failed.load(Ordering::SeqCst), 0);
    let mut requests = observer.requests.lock().unwrap().clone();
    requests.sort_unstable();
    assert_eq!(requests, [vec![0usize; 5], vec![1usize; 5]].concat());
}

#[test]
fn test_log_observer() {
    let _ = env_logger::builder().is_test(true).try_init();
    let deals = deals();
    let requests: Vec<SolveRequest> = deals.iter().cloned().map(SolveRequest::all_strains).collect();

    for granularity in [Granularity::PerRequest, Granularity::PerStrain] {
        let results = BatchScheduler::new(context(BackendKind::WorkStealing, 2))
            .with_granularity(granularity)
            .with_observer(Arc::new(LogObserver))
            .solve(&requests)
            .unwrap();
        for (deal, result) in deals.iter().zip(results) {
            assert_eq!(result.unwrap().to_table(), solve_all_strains(deal).unwrap());
        }
    }
}

#[test]
fn test_solve_batch() {
    let mut deals = deals();
    deals.push(broken_deal());
    let mode = BatchMode {
        config: EngineConfig::default().with_threads(2),
        granularity: Granularity::PerStrain,
    };
    let results = solve_batch(&deals, &mode).unwrap();
    assert_eq!(results.len(), 5);
    for (deal, result) in deals.iter().zip(&results).take(4) {
        assert_eq!(result.as_ref().ok(), solve_all_strains(deal).ok().as_ref());
    }
    assert!(matches!(results[4], Err(SolveError::Deal(_))));
}

#[test]
fn test_empty_batch() {
    let results = BatchScheduler::new(context(BackendKind::WorkerPool, 1)).solve(&[]).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_batch_after_shutdown() {
    let context = context(BackendKind::WorkerPool, 2);
    let scheduler = BatchScheduler::new(context.clone());
    context.shutdown();
    let requests = vec![SolveRequest::all_strains(deals().remove(0))];
    assert!(matches!(scheduler.solve(&requests), Err(EngineError::ShutDown)));
}
