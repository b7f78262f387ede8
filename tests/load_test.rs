//! Load tests: the admission ceiling must not deadlock or leak permits, and
//! every connection attempt is eventually served.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use session_server::{ResponseDescriptor, ServerConfig};

mod common;
use common::{start_server, FnDispatcher};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn all_requests_served_under_load_far_beyond_capacity() {
    const CAPACITY: usize = 2;
    const REQUESTS: usize = 64;

    let handled = Arc::new(AtomicUsize::new(0));
    let counter = handled.clone();
    let dispatcher = FnDispatcher::new(move |_, _, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(1));
        Ok(ResponseDescriptor::html("ok"))
    });

    let mut config = ServerConfig::default();
    config.listener.max_pending_accepts = CAPACITY;
    let (addr, shutdown) = start_server(config, dispatcher).await;

    let mut tasks = Vec::with_capacity(REQUESTS);
    for _ in 0..REQUESTS {
        // One client per task forces a fresh connection through the
        // admission cycle instead of reusing a pooled one.
        tasks.push(tokio::spawn(async move {
            let client = reqwest::Client::builder().no_proxy().build().unwrap();
            client
                .get(format!("http://{}/", addr))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap(), 200);
    }
    assert_eq!(handled.load(Ordering::SeqCst), REQUESTS);

    shutdown.trigger();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sequential_bursts_do_not_leak_permits() {
    let dispatcher = FnDispatcher::new(|_, _, _, _| Ok(ResponseDescriptor::html("ok")));

    let mut config = ServerConfig::default();
    config.listener.max_pending_accepts = 1;
    let (addr, shutdown) = start_server(config, dispatcher).await;

    // With a single permit, any leak would wedge the accept cycle after the
    // first burst.
    for _ in 0..3 {
        let mut tasks = Vec::new();
        for _ in 0..8 {
            tasks.push(tokio::spawn(async move {
                let client = reqwest::Client::builder().no_proxy().build().unwrap();
                client
                    .get(format!("http://{}/", addr))
                    .send()
                    .await
                    .unwrap()
                    .status()
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), 200);
        }
    }

    shutdown.trigger();
}
