//! A fixed number of workers draining one shared queue of tasks.
//!
//! Every worker stops at its first failing task. `join_all` hands back the
//! first failure it sees and aborts the workers still running, which drops
//! (and so kills) any solver they were waiting on.

use {
    crate::error::{HarnessError, Result},
    futures::{
        future::BoxFuture,
        stream::{FuturesUnordered, StreamExt},
    },
    std::{
        future::Future,
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
    },
    tokio::{
        sync::{Mutex, mpsc},
        task::JoinHandle,
    },
    tracing::debug,
};

pub type Task = BoxFuture<'static, Result<()>>;

type Queue = Arc<Mutex<mpsc::UnboundedReceiver<Task>>>;

#[derive(Debug, Default)]
struct Progress {
    aborted: AtomicBool,
    completed: AtomicUsize,
}

pub struct TaskPool {
    sender: Option<mpsc::UnboundedSender<Task>>,
    workers: Vec<JoinHandle<Result<()>>>,
    progress: Arc<Progress>,
}

impl TaskPool {
    /// Start `num_workers` workers on the current tokio runtime.
    pub fn new(num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(HarnessError::Config(
                "a pool needs at least one worker".to_string(),
            ));
        }
        let (sender, receiver) = mpsc::unbounded_channel::<Task>();
        let queue: Queue = Arc::new(Mutex::new(receiver));
        let progress = Arc::new(Progress::default());
        let workers = (0..num_workers)
            .map(|id| tokio::spawn(worker(id, Arc::clone(&queue), Arc::clone(&progress))))
            .collect();
        Ok(TaskPool {
            sender: Some(sender),
            workers,
            progress,
        })
    }

    /// Enqueue a task. Fails once every worker has quit on an error.
    pub fn submit<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        if self.progress.aborted.load(Ordering::Acquire) {
            return Err(HarnessError::PoolClosed);
        }
        self.sender
            .as_ref()
            .ok_or(HarnessError::PoolClosed)?
            .send(Box::pin(task))
            .map_err(|_| HarnessError::PoolClosed)
    }

    /// Wait for every submitted task, returning how many succeeded, or the
    /// first error.
    pub async fn join_all(mut self) -> Result<usize> {
        drop(self.sender.take());
        let mut pending: FuturesUnordered<_> = self.workers.drain(..).collect();
        while let Some(joined) = pending.next().await {
            let failure = match joined {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(e) => HarnessError::WorkerPanic(e.to_string()),
            };
            for handle in pending.iter() {
                handle.abort();
            }
            return Err(failure);
        }
        Ok(self.progress.completed.load(Ordering::Acquire))
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        for handle in &self.workers {
            handle.abort();
        }
    }
}

async fn worker(id: usize, queue: Queue, progress: Arc<Progress>) -> Result<()> {
    loop {
        if progress.aborted.load(Ordering::Acquire) {
            debug!(worker = id, "stop after a sibling failed");
            return Ok(());
        }
        let next = queue.lock().await.recv().await;
        let Some(task) = next else {
            return Ok(());
        };
        if let Err(e) = task.await {
            progress.aborted.store(true, Ordering::Release);
            return Err(e);
        }
        progress.completed.fetch_add(1, Ordering::AcqRel);
    }
}
