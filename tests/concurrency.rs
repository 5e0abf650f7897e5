//! Concurrent submitters against the single-writer queue.

use std::sync::Arc;
use std::thread;

use coraldb::{Coral, EngineConfig, Reply};

fn started(dir: &tempfile::TempDir) -> Arc<Coral> {
    let config = EngineConfig::new()
        .hash_seed(42)
        .persistence_path(dir.path().join("db.json"));
    Arc::new(Coral::start(config).unwrap())
}

#[test]
fn every_submitter_gets_every_reply_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = started(&dir);

    const THREADS: usize = 8;
    const OPS: usize = 50;

    let mut handles = Vec::new();
    for t in 0..THREADS {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..OPS {
                let set = db.command(&format!("SET t{t}-k{i} v{i}"));
                assert_eq!(set, Reply::Bool(true));
                // A submitter observes its own writes immediately: the SET
                // completed before this GET was enqueued.
                let get = db.command(&format!("GET t{t}-k{i}"));
                assert_eq!(get, Reply::Str(format!("v{i}")));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // One reply per request, nothing lost: all keys exist.
    let keys = db.command("KEYS");
    assert_eq!(keys.as_list().unwrap().len(), THREADS * OPS);

    db.shutdown();
}

#[test]
fn concurrent_counter_pushes_conserve_elements() {
    let dir = tempfile::tempdir().unwrap();
    let db = started(&dir);

    const THREADS: usize = 4;
    const OPS: usize = 100;

    let mut handles = Vec::new();
    for t in 0..THREADS {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..OPS {
                db.command(&format!("RPUSH shared t{t}-{i}"));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        db.command("LLEN shared"),
        Reply::Uint((THREADS * OPS) as u64)
    );

    db.shutdown();
}

#[test]
fn shutdown_races_submitters_safely() {
    let dir = tempfile::tempdir().unwrap();
    let db = started(&dir);

    let mut handles = Vec::new();
    for t in 0..4 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                let reply = db.command(&format!("SET t{t}-k{i} v"));
                // Every request is answered: either it ran, or the engine
                // had already closed.
                assert!(
                    reply == Reply::Bool(true)
                        || reply == Reply::Error("ERR database is closed".into()),
                    "unexpected reply: {reply:?}"
                );
            }
        }));
    }

    // Let the submitters make some progress, then pull the plug.
    thread::sleep(std::time::Duration::from_millis(10));
    db.shutdown();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(!db.is_running());
}

#[test]
fn passive_memory_probe_runs_alongside_writers() {
    let dir = tempfile::tempdir().unwrap();
    let db = started(&dir);

    let writer = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for i in 0..200 {
                db.command(&format!("SET k{i} v"));
            }
        })
    };
    let prober = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            let mut last = 0u64;
            for _ in 0..50 {
                if let Reply::Uint(bytes) = db.command("INFO_DATASET_MEMORY") {
                    last = bytes;
                }
            }
            last
        })
    };

    writer.join().unwrap();
    let probed = prober.join().unwrap();
    assert!(probed > 0);

    db.shutdown();
}
