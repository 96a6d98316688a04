use async_trait::async_trait;
use kusari::prelude::*;
use kusari::FnLink;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn failure(name: &str) -> ChainError {
    ChainError::LinkFailed {
        link_name: LinkName::new(name),
        details: "intentional failure".to_string(),
    }
}

struct Counters {
    completed: AtomicUsize,
    errored: AtomicUsize,
}

impl Counters {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            completed: AtomicUsize::new(0),
            errored: AtomicUsize::new(0),
        })
    }
}

fn attach(counters: &Arc<Counters>, chain: &mut Chain<Vec<usize>>) {
    let completed = Arc::clone(counters);
    chain.on_completed(move |_payload| {
        completed.completed.fetch_add(1, Ordering::SeqCst);
    });
    let errored = Arc::clone(counters);
    chain.on_error(move |_payload, _error| {
        errored.errored.fetch_add(1, Ordering::SeqCst);
    });
}

#[tokio::test]
async fn default_policy_halts_on_first_failure() {
    let mut chain = Chain::builder()
        .add_fn(|cargo: &mut DataCargo<Vec<usize>>| {
            cargo.payload_mut().push(1);
            Ok(())
        })
        .add_fn(|_cargo| Err(failure("second")))
        .add_fn(|cargo| {
            cargo.payload_mut().push(3);
            Ok(())
        })
        .build()
        .unwrap();

    let counters = Counters::new();
    attach(&counters, &mut chain);
    chain.run().await;

    assert_eq!(counters.errored.load(Ordering::SeqCst), 1);
    assert_eq!(counters.completed.load(Ordering::SeqCst), 0);
    // The third link never executed.
    assert_eq!(chain.payload(), &vec![1]);
}

#[tokio::test]
async fn retry_budget_recovers_flaky_link() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&attempts);

    let mut chain = Chain::builder()
        .config(Configuration::retry(3))
        .add_fn(move |cargo: &mut DataCargo<Vec<usize>>| {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                return Err(failure("flaky"));
            }
            cargo.payload_mut().push(99);
            Ok(())
        })
        .build()
        .unwrap();

    let counters = Counters::new();
    attach(&counters, &mut chain);
    chain.run().await;

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(counters.errored.load(Ordering::SeqCst), 2);
    assert_eq!(counters.completed.load(Ordering::SeqCst), 1);
    assert_eq!(chain.payload(), &vec![99]);
}

#[tokio::test]
async fn exhausted_retry_budget_halts_chain() {
    let mut chain = Chain::builder()
        .config(Configuration::retry(2))
        .add_fn(|_cargo: &mut DataCargo<Vec<usize>>| Err(failure("hopeless")))
        .build()
        .unwrap();

    let counters = Counters::new();
    attach(&counters, &mut chain);
    chain.run().await;

    // Attempts 0 and 1, one error notification each.
    assert_eq!(counters.errored.load(Ordering::SeqCst), 2);
    assert_eq!(counters.completed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn zero_budget_without_stop_on_failure_still_halts() {
    let mut chain = Chain::builder()
        .config(Configuration::new(false, 0))
        .add_fn(|_cargo: &mut DataCargo<Vec<usize>>| Err(failure("first")))
        .add_fn(|cargo| {
            cargo.payload_mut().push(2);
            Ok(())
        })
        .build()
        .unwrap();

    let counters = Counters::new();
    attach(&counters, &mut chain);
    chain.run().await;

    assert_eq!(counters.errored.load(Ordering::SeqCst), 1);
    assert_eq!(counters.completed.load(Ordering::SeqCst), 0);
    assert!(chain.payload().is_empty());
}

#[tokio::test]
async fn cancellation_halts_without_failure() {
    let mut chain = Chain::builder()
        .add_fn(|cargo: &mut DataCargo<Vec<usize>>| {
            cargo.payload_mut().push(1);
            Ok(())
        })
        .add_fn(|cargo| {
            cargo.payload_mut().push(2);
            cargo.cancel();
            Ok(())
        })
        .add_fn(|cargo| {
            cargo.payload_mut().push(3);
            Ok(())
        })
        .build()
        .unwrap();

    let counters = Counters::new();
    attach(&counters, &mut chain);
    chain.run().await;

    assert_eq!(counters.errored.load(Ordering::SeqCst), 0);
    assert_eq!(counters.completed.load(Ordering::SeqCst), 0);
    assert_eq!(chain.payload(), &vec![1, 2]);
}

#[test]
fn unknown_link_name_fails_at_build_time() {
    let registry = Arc::new(LinkRegistry::<Vec<usize>>::new());
    let result = Chain::builder().registry(registry).add_link_by_name("X").build();

    match result {
        Err(ChainError::LinkNotFound(name)) => assert_eq!(name.as_str(), "X"),
        _ => panic!("Unexpected result"),
    }
}

#[test]
fn null_link_fails_at_build_time() {
    let result = Chain::<Vec<usize>>::builder().add_link_boxed(None).build();
    assert!(matches!(result, Err(ChainError::NullLink)));
}

#[tokio::test]
async fn links_run_once_each_in_insertion_order() {
    let mut builder = Chain::<Vec<usize>>::builder();
    for index in 0..5 {
        builder = builder.add_fn(move |cargo| {
            cargo.payload_mut().push(index);
            Ok(())
        });
    }
    let mut chain = builder.build().unwrap();

    let counters = Counters::new();
    attach(&counters, &mut chain);
    chain.run().await;

    assert_eq!(counters.completed.load(Ordering::SeqCst), 1);
    assert_eq!(chain.payload(), &vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn cargo_state_carries_across_runs() {
    let mut chain = Chain::builder()
        .add_fn(|cargo: &mut DataCargo<Vec<usize>>| {
            let next = cargo.payload().len();
            cargo.payload_mut().push(next);
            Ok(())
        })
        .build()
        .unwrap();

    chain.run().await;
    chain.run().await;

    assert_eq!(chain.payload(), &vec![0, 1]);
}

#[tokio::test]
async fn last_registered_callback_wins() {
    let mut chain = Chain::<Vec<usize>>::builder()
        .add_fn(|_cargo| Ok(()))
        .build()
        .unwrap();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let count = Arc::clone(&first);
    chain.on_completed(move |_payload| {
        count.fetch_add(1, Ordering::SeqCst);
    });
    let count = Arc::clone(&second);
    chain.on_completed(move |_payload| {
        count.fetch_add(1, Ordering::SeqCst);
    });

    chain.run().await;

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

define_link!(UppercaseLink);

#[async_trait]
impl Link<String> for UppercaseLink {
    async fn execute(&self, cargo: &mut DataCargo<String>) -> Result<(), ChainError> {
        let upper = cargo.payload().to_uppercase();
        *cargo.payload_mut() = upper;
        Ok(())
    }
}

define_link!(ExclaimLink);

#[async_trait]
impl Link<String> for ExclaimLink {
    async fn execute(&self, cargo: &mut DataCargo<String>) -> Result<(), ChainError> {
        cargo.payload_mut().push('!');
        Ok(())
    }
}

#[tokio::test]
async fn registry_resolves_links_by_name() {
    let registry = Arc::new(
        LinkRegistry::new()
            .register::<UppercaseLink>()
            .register::<ExclaimLink>()
            .register_factory("Greet", || {
                Box::new(FnLink::new(|cargo: &mut DataCargo<String>| {
                    cargo.payload_mut().insert_str(0, "hey ");
                    Ok(())
                }))
            }),
    );

    let mut chain = Chain::builder_with("kusari".to_string())
        .registry(registry)
        .add_link_by_name("Greet")
        .add_link_by_name("UppercaseLink")
        .add_link_by_name("ExclaimLink")
        .build()
        .unwrap();

    chain.run().await;
    assert_eq!(chain.payload(), "HEY KUSARI!");
}
