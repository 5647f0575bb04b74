//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use k8s_openapi::api::core::v1::{EndpointAddress, EndpointPort, EndpointSubset, Endpoints};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use probe_ep::cluster::{EndpointStore, StoreError};
use probe_ep::health::Prober;
use probe_ep::ProbeConfig;
use tokio::net::TcpListener;

pub const NAMESPACE: &str = "default";
pub const NAME: &str = "web";

/// Configuration pointing at [`NAMESPACE`]/[`NAME`] with millisecond retries.
pub fn config() -> ProbeConfig {
    let mut config = ProbeConfig::default();
    config.target.namespace = NAMESPACE.into();
    config.target.endpoint = NAME.into();
    config.target.port = 8080;
    config.period_secs = 60;
    config.retry.initial_delay_ms = 1;
    config
}

pub fn address(ip: &str) -> EndpointAddress {
    EndpointAddress {
        ip: ip.to_string(),
        ..Default::default()
    }
}

pub fn subset(ready: &[&str], not_ready: &[&str]) -> EndpointSubset {
    let list = |ips: &[&str]| {
        if ips.is_empty() {
            None
        } else {
            Some(ips.iter().map(|ip| address(ip)).collect())
        }
    };
    EndpointSubset {
        addresses: list(ready),
        not_ready_addresses: list(not_ready),
        ports: Some(vec![EndpointPort {
            port: 8080,
            ..Default::default()
        }]),
    }
}

/// A single-subset Endpoints resource at resourceVersion "1".
pub fn endpoints(ready: &[&str], not_ready: &[&str]) -> Endpoints {
    endpoints_with_subsets(vec![subset(ready, not_ready)])
}

pub fn endpoints_with_subsets(subsets: Vec<EndpointSubset>) -> Endpoints {
    Endpoints {
        metadata: ObjectMeta {
            name: Some(NAME.into()),
            namespace: Some(NAMESPACE.into()),
            resource_version: Some("1".into()),
            ..Default::default()
        },
        subsets: Some(subsets),
    }
}

/// (ready ips, not-ready ips) of the first subset.
pub fn pools(endpoints: &Endpoints) -> (Vec<String>, Vec<String>) {
    let subset = endpoints
        .subsets
        .as_ref()
        .and_then(|s| s.first())
        .cloned()
        .unwrap_or_default();
    let ips = |list: Option<Vec<EndpointAddress>>| {
        list.unwrap_or_default()
            .into_iter()
            .map(|a| a.ip)
            .collect::<Vec<_>>()
    };
    (ips(subset.addresses), ips(subset.not_ready_addresses))
}

type ConcurrentWrite = Box<dyn FnMut(&mut Endpoints) + Send>;

#[derive(Default)]
pub struct FakeState {
    /// What the "API server" currently stores; `None` answers NotFound.
    pub endpoints: Option<Endpoints>,
    pub fetches: usize,
    /// Every payload passed to `update`, accepted or not.
    pub updates: Vec<Endpoints>,
    /// Number of upcoming updates to reject as conflicts.
    pub conflicts: u32,
    /// Reject updates with NotFound instead of storing them.
    pub reject_updates: bool,
    /// Applied to the stored resource whenever a conflict is reported,
    /// standing in for the other writer that caused it.
    pub concurrent_write: Option<ConcurrentWrite>,
}

/// In-memory [`EndpointStore`] with scriptable conflicts.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub fn new(endpoints: Endpoints) -> Self {
        let store = Self::default();
        store.state().endpoints = Some(endpoints);
        store
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn stored(&self) -> Endpoints {
        self.state().endpoints.clone().expect("endpoints stored")
    }
}

fn not_found(namespace: &str, name: &str) -> StoreError {
    StoreError::NotFound {
        namespace: namespace.into(),
        name: name.into(),
    }
}

impl EndpointStore for FakeStore {
    async fn fetch(&self, namespace: &str, name: &str) -> Result<Endpoints, StoreError> {
        let mut state = self.state();
        state.fetches += 1;
        state.endpoints.clone().ok_or_else(|| not_found(namespace, name))
    }

    async fn update(
        &self,
        namespace: &str,
        name: &str,
        endpoints: &Endpoints,
    ) -> Result<Endpoints, StoreError> {
        let mut guard = self.state();
        let state = &mut *guard;
        state.updates.push(endpoints.clone());

        if state.conflicts > 0 {
            state.conflicts -= 1;
            let pending = (state.concurrent_write.as_mut(), state.endpoints.as_mut());
            if let (Some(write), Some(stored)) = pending {
                write(stored);
            }
            return Err(StoreError::Conflict {
                namespace: namespace.into(),
                name: name.into(),
            });
        }
        if state.reject_updates {
            return Err(not_found(namespace, name));
        }

        state.endpoints = Some(endpoints.clone());
        Ok(endpoints.clone())
    }
}

/// Prober answering from a fixed table; unknown addresses are unreachable.
#[derive(Clone, Default)]
pub struct ScriptedProber {
    outcomes: Arc<HashMap<String, bool>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProber {
    pub fn new(outcomes: &[(&str, bool)]) -> Self {
        Self {
            outcomes: Arc::new(
                outcomes
                    .iter()
                    .map(|(ip, reachable)| (ip.to_string(), *reachable))
                    .collect(),
            ),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self, ip: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes.get(ip).copied().unwrap_or(false)
    }
}

/// Start a backend that accepts connections and keeps them open silently.
pub async fn start_live_backend(addr: SocketAddr) -> SocketAddr {
    let listener = TcpListener::bind(addr).await.unwrap();
    let local = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });

    local
}
