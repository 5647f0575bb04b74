//! Reconciliation loop.
//!
//! One cycle:
//! fetch → single-subset check → classify → probe every address → diff →
//! (if changed) mutate in memory → persist under conflict retry.
//! Cycles never overlap and the snapshot mutated in a cycle is owned by it alone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use k8s_openapi::api::core::v1::Endpoints;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, instrument, warn};

use crate::cluster::{EndpointStore, StoreError};
use crate::config::{ConflictPolicy, ProbeConfig};
use crate::endpoints::{diff, AddressPool, Mutation};
use crate::error::{Error, Result};
use crate::health::{probe_all, Prober};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::resilience::{retry_on_conflict, Backoff, Conflict, RetryError};

/// Where the reconciler currently is within its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the next tick.
    Idle,
    /// Fetching state and waiting on the probe fan-in.
    Probing,
    /// Writing changed state back, possibly across retries.
    Committing,
}

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every probe agreed with the recorded state; nothing was written.
    Unchanged,
    /// The listed moves were persisted.
    Persisted { mutations: Vec<Mutation> },
}

/// A computed, not yet persisted, change to the endpoint resource.
struct Plan {
    endpoints: Endpoints,
    mutations: Vec<Mutation>,
}

/// Keeps one endpoint resource's ready/not-ready pools in line with TCP reachability.
pub struct Reconciler<S, P> {
    store: S,
    prober: Arc<P>,
    namespace: String,
    name: String,
    period: Duration,
    backoff: Backoff,
    conflict_policy: ConflictPolicy,
    phase: watch::Sender<Phase>,
    cycles: AtomicU64,
}

impl<S, P> Reconciler<S, P>
where
    S: EndpointStore,
    P: Prober,
{
    pub fn new(config: &ProbeConfig, store: S, prober: P) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            store,
            prober: Arc::new(prober),
            namespace: config.target.namespace.clone(),
            name: config.target.endpoint.clone(),
            period: config.period(),
            backoff: Backoff::from(&config.retry),
            conflict_policy: config.retry.conflict_policy,
            phase,
            cycles: AtomicU64::new(0),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Follow phase transitions.
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Number of cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.send_if_modified(|current| {
            if *current == phase {
                return false;
            }
            debug!(from = ?*current, to = ?phase, "Phase transition");
            *current = phase;
            true
        });
    }

    /// Run cycles until shutdown is triggered.
    ///
    /// The shutdown flag is checked only at the top of a cycle, so a cycle
    /// that has started always completes. Any error is fatal for the caller.
    pub async fn run(&self, mut shutdown: ShutdownSignal) -> Result<()> {
        info!(
            namespace = %self.namespace,
            endpoint = %self.name,
            period_secs = self.period.as_secs(),
            "Reconciler started"
        );

        while !shutdown.is_triggered() {
            self.reconcile_once().await?;

            self.set_phase(Phase::Idle);
            tokio::select! {
                _ = time::sleep(self.period) => {}
                _ = shutdown.triggered() => {}
            }
        }

        info!(cycles = self.cycles(), "Reconciler stopped");
        Ok(())
    }

    /// Run exactly one cycle without the trailing sleep.
    #[instrument(skip(self), fields(namespace = %self.namespace, endpoint = %self.name))]
    pub async fn reconcile_once(&self) -> Result<CycleOutcome> {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(cycle, "Cycle started");

        let result = match self.conflict_policy {
            ConflictPolicy::Resend => self.resend_on_conflict().await,
            ConflictPolicy::Recompute => self.recompute_on_conflict().await,
        };

        let label = match &result {
            Ok(CycleOutcome::Unchanged) => "unchanged",
            Ok(CycleOutcome::Persisted { .. }) => "persisted",
            Err(_) => "failed",
        };
        metrics::record_cycle(label);
        if result.is_ok() {
            self.set_phase(Phase::Idle);
        }
        result
    }

    /// Compute once, then re-send the same payload while the write conflicts.
    async fn resend_on_conflict(&self) -> Result<CycleOutcome> {
        let Some(plan) = self.plan().await? else {
            return Ok(CycleOutcome::Unchanged);
        };

        self.set_phase(Phase::Committing);
        info!(changes = plan.mutations.len(), "Changed state, updating endpoints");

        // Known risk: every retry carries the snapshot read at the top of the
        // cycle, so a concurrent writer's change to the resource can be overwritten.
        let persisted = retry_on_conflict(&self.backoff, |attempt| {
            self.persist(&plan.endpoints, attempt)
        })
        .await;

        match persisted {
            Ok(()) => Ok(CycleOutcome::Persisted {
                mutations: plan.mutations,
            }),
            Err(RetryError::Exhausted { attempts, last }) => Err(Error::RetriesExhausted {
                attempts,
                last: Box::new(Error::Store(last)),
            }),
            Err(RetryError::Aborted(e)) => Err(Error::Store(e)),
        }
    }

    /// Re-run fetch, probe and diff for every attempt.
    async fn recompute_on_conflict(&self) -> Result<CycleOutcome> {
        let outcome =
            retry_on_conflict(&self.backoff, |attempt| self.plan_and_persist(attempt)).await;

        match outcome {
            Ok(outcome) => Ok(outcome),
            Err(RetryError::Exhausted { attempts, last }) => Err(Error::RetriesExhausted {
                attempts,
                last: Box::new(last),
            }),
            Err(RetryError::Aborted(e)) => Err(e),
        }
    }

    async fn plan_and_persist(&self, attempt: u32) -> Result<CycleOutcome> {
        let Some(plan) = self.plan().await? else {
            return Ok(CycleOutcome::Unchanged);
        };

        self.set_phase(Phase::Committing);
        info!(changes = plan.mutations.len(), attempt, "Changed state, updating endpoints");
        self.persist(&plan.endpoints, attempt).await?;

        Ok(CycleOutcome::Persisted {
            mutations: plan.mutations,
        })
    }

    /// Fetch, probe and diff. `None` when nothing has to change.
    async fn plan(&self) -> Result<Option<Plan>> {
        self.set_phase(Phase::Probing);

        let mut endpoints = self.store.fetch(&self.namespace, &self.name).await?;

        let subsets = endpoints.subsets.as_deref().map_or(0, <[_]>::len);
        if subsets > 1 {
            return Err(Error::Topology {
                namespace: self.namespace.clone(),
                name: self.name.clone(),
                subsets,
            });
        }

        let Some(subset) = endpoints.subsets.as_mut().and_then(|s| s.first_mut()) else {
            debug!("Endpoints has no subsets, nothing to probe");
            metrics::record_pool_sizes(0, 0);
            return Ok(None);
        };

        let mut pool = AddressPool::from_subset(subset);
        let current = pool.classification();

        let results = probe_all(&self.prober, current.addresses().map(str::to_owned)).await?;
        let diff = diff(&current, &results)?;

        if !diff.changed() {
            debug!(addresses = current.len(), "No state change");
            metrics::record_pool_sizes(pool.ready().len(), pool.not_ready().len());
            return Ok(None);
        }

        for mutation in &diff.mutations {
            match mutation {
                Mutation::Disable(ip) => info!(ip = %ip, "Disabling address"),
                Mutation::Enable(ip) => info!(ip = %ip, "Enabling address"),
            }
            if pool.apply(mutation) {
                metrics::record_transition(mutation.direction());
            } else {
                warn!(mutation = %mutation, "Address was not in the expected pool");
            }
        }

        metrics::record_pool_sizes(pool.ready().len(), pool.not_ready().len());
        pool.write_into(subset);

        Ok(Some(Plan {
            endpoints,
            mutations: diff.mutations,
        }))
    }

    async fn persist(&self, endpoints: &Endpoints, attempt: u32) -> Result<(), StoreError> {
        match self.store.update(&self.namespace, &self.name, endpoints).await {
            Ok(_) => {
                debug!(attempt, "Endpoints updated");
                Ok(())
            }
            Err(e) => {
                if e.is_conflict() {
                    metrics::record_conflict();
                }
                Err(e)
            }
        }
    }
}
