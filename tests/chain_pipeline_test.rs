//! Integration tests for chain composition order.
//!
//! Counters on the request and response record how many interceptors a value
//! has passed, which pins down exactly where each interceptor sits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chain_pipeline::{ChainPipeline, ConfigError, Next, Phase};
use tokio::sync::Notify;

const ROUNDS: usize = 10;
const PHASES: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Request {
    id: usize,
    counter: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Response {
    id: usize,
    request_counter: usize,
    counter: usize,
}

async fn terminal(request: Request) -> Response {
    Response {
        id: request.id,
        request_counter: request.counter,
        counter: 0,
    }
}

async fn counting(next: Next<Request, Response>, mut request: Request) -> Response {
    request.counter += 1;
    let mut response = next.run(request).await;
    response.counter += 1;
    response
}

fn numbered_phases(count: usize) -> Vec<Phase> {
    (0..count).map(|i| Phase::new(i.to_string())).collect()
}

#[tokio::test]
async fn single_phase_without_interceptors_is_terminal() {
    let chain = ChainPipeline::new([Phase::new("1")], terminal).unwrap();

    for id in 0..5 {
        let request = Request { id, counter: id };
        assert_eq!(chain.execute(request).await, terminal(request).await);
    }
}

#[tokio::test]
async fn single_phase_rounds() {
    let phase = Phase::new("1");
    let chain = ChainPipeline::new([phase.clone()], terminal).unwrap();

    for round in 0..ROUNDS {
        chain.intercept(&phase, counting).unwrap();

        let response = chain.execute(Request { id: round, counter: 0 }).await;

        assert_eq!(
            response,
            Response {
                id: round,
                request_counter: round + 1,
                counter: round + 1,
            }
        );
    }
}

#[tokio::test]
async fn multi_phase_rounds() {
    let phases = numbered_phases(PHASES);
    let chain = ChainPipeline::new(phases.clone(), terminal).unwrap();

    for round in 0..ROUNDS {
        for (index, phase) in phases.iter().enumerate() {
            chain.intercept(phase, counting).unwrap();
            let id = round * PHASES + index;

            let response = chain.execute(Request { id, counter: 0 }).await;

            assert_eq!(
                response,
                Response {
                    id,
                    request_counter: id + 1,
                    counter: id + 1,
                }
            );
        }
    }
}

#[tokio::test]
async fn multi_phase_order() {
    let phases = numbered_phases(PHASES);
    let chain = ChainPipeline::new(phases.clone(), terminal).unwrap();

    for round in 0..ROUNDS {
        for (phase, phase_id) in phases.iter().enumerate() {
            chain
                .intercept(phase_id, move |next, mut request: Request| async move {
                    let interceptor_index = phase * ROUNDS + (ROUNDS - round - 1);
                    assert_eq!(
                        request.counter, interceptor_index,
                        "round: {round}, phase: {phase}"
                    );
                    request.counter += 1;

                    let mut response = next.run(request).await;
                    assert_eq!(
                        response.counter,
                        PHASES * ROUNDS - interceptor_index - 1,
                        "round: {round}, phase: {phase}"
                    );
                    response.counter += 1;
                    response
                })
                .unwrap();
        }
    }

    let response = chain.execute(Request { id: 0, counter: 0 }).await;
    assert_eq!(response.request_counter, PHASES * ROUNDS);
    assert_eq!(response.counter, PHASES * ROUNDS);
}

#[tokio::test]
async fn same_interceptor_registered_twice_applies_twice() {
    let phase = Phase::new("P");
    let chain = ChainPipeline::new([phase.clone()], terminal).unwrap();
    let interceptor = Arc::new(counting);

    for _ in 0..2 {
        let interceptor = Arc::clone(&interceptor);
        chain
            .intercept(&phase, move |next, request| interceptor(next, request))
            .unwrap();
    }

    let response = chain.execute(Request { id: 7, counter: 0 }).await;
    assert_eq!(response.request_counter, 2);
    assert_eq!(response.counter, 2);
    assert_eq!(chain.interceptor_count(&phase).unwrap(), 2);
}

#[test]
fn empty_phase_list_is_rejected() {
    let result = ChainPipeline::new(Vec::<Phase>::new(), terminal);
    assert!(matches!(result, Err(ConfigError::EmptyPhases)));
}

#[test]
fn unknown_phase_is_rejected_by_identity() {
    let declared = Phase::new("State");
    let chain = ChainPipeline::new([declared.clone()], terminal).unwrap();

    let result = chain.intercept(&Phase::new("State"), counting);
    assert!(matches!(
        result,
        Err(ConfigError::PhaseNotRegistered { ref phase }) if phase == "State"
    ));

    assert!(chain.intercept(&declared, counting).is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_executions_stay_independent() {
    let phase = Phase::new("P");
    let chain = Arc::new(
        ChainPipeline::new([phase.clone()], |request: Request| async move {
            tokio::time::sleep(std::time::Duration::from_millis((request.id % 5) as u64)).await;
            terminal(request).await
        })
        .unwrap(),
    );
    chain.intercept(&phase, counting).unwrap();

    let handles: Vec<_> = (0..32)
        .map(|id| {
            let chain = Arc::clone(&chain);
            tokio::spawn(async move { chain.execute(Request { id, counter: 0 }).await })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        let response = handle.await.unwrap();
        assert_eq!(
            response,
            Response {
                id,
                request_counter: 1,
                counter: 1,
            }
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_does_not_disturb_entered_phases() {
    let phase = Phase::new("P");
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let chain = Arc::new(
        ChainPipeline::new([phase.clone()], {
            let entered = Arc::clone(&entered);
            let release = Arc::clone(&release);
            move |x: u32| {
                let entered = Arc::clone(&entered);
                let release = Arc::clone(&release);
                async move {
                    if x == 0 {
                        entered.notify_one();
                        release.notified().await;
                    }
                    x
                }
            }
        })
        .unwrap(),
    );

    let in_flight = tokio::spawn({
        let chain = Arc::clone(&chain);
        async move { chain.execute(0).await }
    });

    entered.notified().await;
    chain
        .intercept(&phase, |next, x| async move { next.run(x).await + 100 })
        .unwrap();
    release.notify_one();

    assert_eq!(in_flight.await.unwrap(), 0);
    assert_eq!(chain.execute(1).await, 101);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_reaches_phases_not_yet_entered() {
    let outer = Phase::new("Outer");
    let inner = Phase::new("Inner");
    let paused = Arc::new(Notify::new());
    let resume = Arc::new(Notify::new());

    let chain = Arc::new(
        ChainPipeline::new([outer.clone(), inner.clone()], |x: u32| async move { x }).unwrap(),
    );

    {
        let paused = Arc::clone(&paused);
        let resume = Arc::clone(&resume);
        chain
            .intercept(&outer, move |next, x| {
                let paused = Arc::clone(&paused);
                let resume = Arc::clone(&resume);
                async move {
                    paused.notify_one();
                    resume.notified().await;
                    next.run(x).await
                }
            })
            .unwrap();
    }

    let in_flight = tokio::spawn({
        let chain = Arc::clone(&chain);
        async move { chain.execute(1).await }
    });

    paused.notified().await;
    chain
        .intercept(&inner, |next, x| async move { next.run(x * 10).await })
        .unwrap();
    resume.notify_one();

    assert_eq!(in_flight.await.unwrap(), 10);
}

#[tokio::test]
async fn errors_pass_through_untouched() {
    #[derive(Debug, PartialEq)]
    struct Boom(&'static str);

    let outer = Phase::new("Outer");
    let inner = Phase::new("Inner");
    let seen = Arc::new(AtomicUsize::new(0));

    let chain = ChainPipeline::new([outer.clone(), inner.clone()], |_: u32| async move {
        Err::<u32, Boom>(Boom("terminal"))
    })
    .unwrap();

    for phase in [&outer, &inner] {
        let seen = Arc::clone(&seen);
        chain
            .intercept(phase, move |next, x| {
                let seen = Arc::clone(&seen);
                async move {
                    let result = next.run(x).await;
                    if result.is_err() {
                        seen.fetch_add(1, Ordering::SeqCst);
                    }
                    result
                }
            })
            .unwrap();
    }

    assert_eq!(chain.execute(1).await, Err(Boom("terminal")));
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}
