use reg_queue::{DnsRefresh, QueueError, TaskQueue, TaskQueues};
use std::time::Duration;

#[test]
fn lease_returns_tasks_in_fifo_order() {
    let queue = TaskQueue::new("test");
    for i in 0..5 {
        queue.add(i).unwrap();
    }

    assert_eq!(queue.lease(3), vec![0, 1, 2]);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.lease(10), vec![3, 4]);
    assert!(queue.is_empty());
}

#[test]
fn closed_queue_rejects_new_tasks_but_drains_old_ones() {
    let queues = TaskQueues::new();
    queues.dns.add(DnsRefresh::Domain("a.example".to_owned())).unwrap();
    queues.close();

    let err = queues.dns.add(DnsRefresh::Domain("b.example".to_owned())).unwrap_err();
    assert!(matches!(err, QueueError::Closed { .. }));
    assert!(err.to_string().contains("dns-pull"));
    assert_eq!(queues.dns.lease(10).len(), 1);
}

#[tokio::test]
async fn waiting_worker_wakes_on_add() {
    let queue = TaskQueue::new("wake");
    let producer = queue.clone();

    let waiter = tokio::spawn(async move {
        queue.wait_for_work().await;
        queue.lease(1)
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    producer.add("task").unwrap();

    let leased = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("worker should wake")
        .expect("worker should not panic");
    assert_eq!(leased, vec!["task"]);
}

#[tokio::test]
async fn close_wakes_idle_workers() {
    let queue: TaskQueue<u8> = TaskQueue::new("idle");
    let closer = queue.clone();

    let waiter = tokio::spawn(async move { queue.wait_for_work().await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    closer.close();

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("close should wake the worker")
        .expect("worker should not panic");
}
