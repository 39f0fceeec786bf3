//! Multi-threaded tests over the shared tree.

use std::thread;

use jsondict::{JsonDict, Value};

#[test]
fn test_concurrent_writers_to_distinct_keys() {
    const THREADS: usize = 8;
    const KEYS_PER_THREAD: usize = 50;

    let dict = JsonDict::new();
    thread::scope(|scope| {
        for t in 0..THREADS {
            let dict = dict.clone();
            scope.spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    dict.set(format!("t{t}-k{i}"), (t * KEYS_PER_THREAD + i) as i64)
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(dict.len().unwrap(), THREADS * KEYS_PER_THREAD);
    for t in 0..THREADS {
        for i in 0..KEYS_PER_THREAD {
            assert_eq!(
                dict.get_or(format!("t{t}-k{i}"), Value::Null).unwrap(),
                (t * KEYS_PER_THREAD + i) as i64
            );
        }
    }
}

#[test]
fn test_concurrent_pushes_to_one_list() {
    const THREADS: usize = 8;
    const PUSHES_PER_THREAD: usize = 100;

    let dict = JsonDict::new();
    dict.set("log", Value::empty_list()).unwrap();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let dict = dict.clone();
            scope.spawn(move || {
                let log = dict.get("log").unwrap().unwrap().into_list().unwrap();
                for i in 0..PUSHES_PER_THREAD {
                    log.push((t * PUSHES_PER_THREAD + i) as i64).unwrap();
                }
            });
        }
    });

    // Every push landed exactly once
    let log = dict.get("log").unwrap().unwrap().into_list().unwrap();
    assert_eq!(log.len().unwrap(), THREADS * PUSHES_PER_THREAD);
    let mut seen: Vec<i64> = log
        .iter()
        .unwrap()
        .map(|v| v.as_int().unwrap())
        .collect();
    seen.sort_unstable();
    let expected: Vec<i64> = (0..(THREADS * PUSHES_PER_THREAD) as i64).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_mixed_operations_keep_the_tree_structurally_sound() {
    const ROUNDS: usize = 200;

    let dict = JsonDict::new();
    dict.set("queue", Value::empty_list()).unwrap();
    dict.set("meta", Value::empty_map()).unwrap();

    thread::scope(|scope| {
        let producer = dict.clone();
        scope.spawn(move || {
            let queue = producer.get("queue").unwrap().unwrap().into_list().unwrap();
            for i in 0..ROUNDS as i64 {
                queue.push(i).unwrap();
            }
        });

        let consumer = dict.clone();
        scope.spawn(move || {
            let queue = consumer.get("queue").unwrap().unwrap().into_list().unwrap();
            let mut drained = 0;
            while drained < ROUNDS {
                match queue.pop_at(0) {
                    Ok(_) => drained += 1,
                    // Empty queue while the producer is behind
                    Err(err) => assert!(err.is_out_of_range()),
                }
            }
        });

        let annotator = dict.clone();
        scope.spawn(move || {
            let meta = annotator.get("meta").unwrap().unwrap().into_map().unwrap();
            for i in 0..ROUNDS as i64 {
                meta.set("last", i).unwrap();
            }
        });
    });

    let queue = dict.get("queue").unwrap().unwrap().into_list().unwrap();
    assert!(queue.is_empty().unwrap());
    assert_eq!(
        dict.get_or("meta", Value::Null)
            .unwrap()
            .as_map()
            .unwrap()["last"],
        (ROUNDS - 1) as i64
    );
}

#[test]
fn test_readers_see_complete_batches() {
    let dict = JsonDict::new();
    dict.set("pair", Value::empty_map()).unwrap();
    let pair = dict.get("pair").unwrap().unwrap().into_map().unwrap();
    pair.update([("a", 0), ("b", 0)]).unwrap();

    thread::scope(|scope| {
        let writer = pair.clone();
        scope.spawn(move || {
            for i in 1..=200i64 {
                // Both keys move together in one batch
                writer.update([("a", i), ("b", i)]).unwrap();
            }
        });

        let reader = pair.clone();
        scope.spawn(move || {
            for _ in 0..200 {
                let snapshot = reader.to_value().unwrap();
                let map = snapshot.as_map().unwrap();
                // A reader never observes a half-applied batch
                assert_eq!(map["a"], map["b"]);
            }
        });
    });
}

#[test]
fn test_close_races_with_writers() {
    let dict = JsonDict::new();
    dict.set("k", 0).unwrap();

    thread::scope(|scope| {
        let writer = dict.clone();
        scope.spawn(move || {
            for i in 0..1000i64 {
                // Fails with Closed at some point; anything else is a bug
                match writer.set("k", i) {
                    Ok(()) => {}
                    Err(err) => {
                        assert!(err.is_closed());
                        break;
                    }
                }
            }
        });

        let closer = dict.clone();
        scope.spawn(move || {
            closer.close();
        });
    });

    assert!(dict.is_closed());
}
