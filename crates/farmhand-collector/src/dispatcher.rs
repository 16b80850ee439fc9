use crate::source::DependencySource;
use farmhand_core::{AutoDetectAction, CompletionPolicy, JobInstance, SceneReference};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A finished collection waiting to be written back to its job.
#[derive(Debug, Clone)]
struct Completion {
    job: Uuid,
    request: u64,
    files: Vec<PathBuf>,
}

/// Requests of one job that are still running or waiting to be applied.
#[derive(Debug, Default)]
struct JobRequests {
    latest: u64,
    outstanding: HashSet<u64>,
}

/// Runs dependency collection off the UI thread and hands the results back.
///
/// Work is spawned on a tokio runtime; results only reach a job when the
/// owning thread calls [`AutoDetectDispatcher::apply_completed`].
pub struct AutoDetectDispatcher {
    source: Arc<dyn DependencySource>,
    policy: CompletionPolicy,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    /// Received but not yet applied, in arrival order.
    pending: Vec<Completion>,
    /// Jobs with requests not yet received or applied. Dropped once settled.
    requests: HashMap<Uuid, JobRequests>,
    next_request: u64,
    in_flight: usize,
}

impl AutoDetectDispatcher {
    pub fn new(source: Arc<dyn DependencySource>, policy: CompletionPolicy, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            policy,
            runtime,
            tx,
            rx,
            pending: Vec::new(),
            requests: HashMap::new(),
            next_request: 0,
            in_flight: 0,
        }
    }

    /// Uses the runtime the caller is running on.
    pub fn on_current_runtime(
        source: Arc<dyn DependencySource>,
        policy: CompletionPolicy,
    ) -> anyhow::Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::new(source, policy, runtime))
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// Collections started and not yet received.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Reacts to what a job edit asked for.
    ///
    /// Returns the request id when a collection was started.
    pub fn handle_action(&mut self, job: &JobInstance, action: AutoDetectAction) -> Option<u64> {
        match action {
            AutoDetectAction::Collect(scene) => Some(self.dispatch(job.id(), scene)),
            AutoDetectAction::Cleared => {
                if self.policy == CompletionPolicy::LatestRequestOnly {
                    // Requests still running for this job are now outdated.
                    let request = self.next_request_id();
                    if let Some(entry) = self.requests.get_mut(&job.id()) {
                        entry.latest = request;
                    }
                }
                None
            }
        }
    }

    /// Starts a collection for `scene` on behalf of job `job`.
    #[tracing::instrument(skip(self, scene), fields(map = ?scene.map, sequence = ?scene.sequence))]
    pub fn dispatch(&mut self, job: Uuid, scene: SceneReference) -> u64 {
        let request = self.next_request_id();
        let entry = self.requests.entry(job).or_default();
        entry.latest = request;
        entry.outstanding.insert(request);
        self.in_flight += 1;

        let source = self.source.clone();
        let tx = self.tx.clone();
        let runtime = self.runtime.clone();
        self.runtime.spawn(async move {
            // Collection runs in its own task so a panicking source still
            // produces a completion.
            let work = runtime.spawn(async move { source.job_dependencies(&scene).await });
            let files = match work.await {
                Ok(Ok(files)) => files,
                Ok(Err(e)) => {
                    tracing::warn!(%job, request, error = %e, "Dependency collection failed");
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!(%job, request, error = %e, "Dependency collection task aborted");
                    Vec::new()
                }
            };
            if tx.send(Completion { job, request, files }).is_err() {
                tracing::debug!(%job, request, "Dispatcher dropped before completion");
            }
        });

        tracing::debug!(%job, request, "Dependency collection started");
        request
    }

    /// Writes finished collections for `job` into it, without blocking.
    ///
    /// Returns how many completions were applied.
    pub fn apply_completed(&mut self, job: &mut JobInstance) -> usize {
        while let Ok(completion) = self.rx.try_recv() {
            self.receive(completion);
        }
        self.apply_pending(job)
    }

    /// Waits until every started collection has been received, then applies
    /// those belonging to `job`.
    pub async fn settle(&mut self, job: &mut JobInstance) -> usize {
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(completion) => self.receive(completion),
                None => break,
            }
        }
        self.apply_pending(job)
    }

    /// Drops everything tracked for `job`, including results still running.
    pub fn forget(&mut self, job: Uuid) {
        self.requests.remove(&job);
        self.pending.retain(|completion| completion.job != job);
    }

    /// Jobs with results still running or waiting to be applied.
    pub fn tracked_jobs(&self) -> usize {
        self.requests.len()
    }

    fn receive(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let tracked = self
            .requests
            .get_mut(&completion.job)
            .is_some_and(|entry| entry.outstanding.remove(&completion.request));
        if tracked {
            self.pending.push(completion);
        } else {
            tracing::debug!(
                job = %completion.job,
                request = completion.request,
                "Dropping result for a forgotten job"
            );
        }
    }

    fn apply_pending(&mut self, job: &mut JobInstance) -> usize {
        let id = job.id();
        let (mine, others): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|completion| completion.job == id);
        self.pending = others;

        let mut applied = 0;
        for completion in mine {
            if !self.should_apply(&completion) {
                tracing::debug!(job = %id, request = completion.request, "Dropping stale dependency result");
                continue;
            }
            job.replace_auto_detected_files(completion.files);
            applied += 1;
        }

        if self.requests.get(&id).is_some_and(|entry| entry.outstanding.is_empty()) {
            self.requests.remove(&id);
        }
        applied
    }

    fn should_apply(&self, completion: &Completion) -> bool {
        match self.policy {
            CompletionPolicy::LastWriteWins => true,
            CompletionPolicy::LatestRequestOnly => {
                self.requests.get(&completion.job).map(|entry| entry.latest) == Some(completion.request)
            }
        }
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request += 1;
        self.next_request
    }
}
