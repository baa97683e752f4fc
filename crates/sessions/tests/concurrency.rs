use std::sync::{Arc, Barrier};
use std::thread;

use iv_domain::config::ContextConfig;
use iv_domain::interview::Exchange;
use iv_sessions::SessionRegistry;

#[test]
fn concurrent_first_touch_creates_one_session() {
    let reg = Arc::new(SessionRegistry::new(ContextConfig::default()));
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let reg = reg.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                reg.get_or_create("race").unwrap()
            })
        })
        .collect();

    let contexts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(reg.len(), 1);
    for ctx in &contexts[1..] {
        assert!(Arc::ptr_eq(&contexts[0], ctx));
    }
}

#[test]
fn concurrent_appends_keep_window_and_fold_count_consistent() {
    let reg = Arc::new(SessionRegistry::new(ContextConfig::default()));
    let threads = 8;
    let per_thread = 10;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let reg = reg.clone();
            thread::spawn(move || {
                for i in 0..per_thread {
                    let ctx = reg.get_or_create("shared").unwrap();
                    ctx.lock()
                        .add_exchange(Exchange::candidate(format!("thread {t} turn {i}")));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // 80 appends: folds at appends 7, 9, ..., 79 => 37 folds, 10 retained.
    let ctx = reg.get("shared").unwrap();
    let ctx = ctx.lock();
    let stats = ctx.stats();
    assert_eq!(stats.recent_exchanges, 6);
    assert_eq!(stats.compressed_summaries, 10);
    assert!(ctx
        .summaries()
        .all(|s| s.summary.matches(" | ").count() == 1));
}

#[test]
fn independent_sessions_progress_in_parallel() {
    let reg = Arc::new(SessionRegistry::new(ContextConfig::default()));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let reg = reg.clone();
            thread::spawn(move || {
                let id = format!("session-{t}");
                for i in 0..7 {
                    reg.get_or_create(&id)
                        .unwrap()
                        .lock()
                        .add_exchange(Exchange::candidate(format!("turn {i}")));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let stats = reg.stats();
    assert_eq!(stats.active_sessions, 4);
    // The 7th append folds two and leaves five live.
    for s in stats.sessions.values() {
        assert_eq!(s.recent_exchanges, 5);
        assert_eq!(s.compressed_summaries, 1);
    }
}
