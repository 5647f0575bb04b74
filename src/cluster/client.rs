//! kube-rs backed endpoint store.

use k8s_openapi::api::core::v1::Endpoints;
use kube::api::{Api, PostParams};
use kube::Client;

use crate::cluster::{EndpointStore, StoreError};

/// [`EndpointStore`] talking to the Kubernetes API server.
#[derive(Clone)]
pub struct KubeEndpointStore {
    client: Client,
}

impl KubeEndpointStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the in-cluster service account, falling back to
    /// the local kubeconfig.
    pub async fn try_default() -> Result<Self, kube::Error> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn api(&self, namespace: &str) -> Api<Endpoints> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl EndpointStore for KubeEndpointStore {
    async fn fetch(&self, namespace: &str, name: &str) -> Result<Endpoints, StoreError> {
        match self.api(namespace).get(name).await {
            Ok(endpoints) => Ok(endpoints),
            Err(kube::Error::Api(e)) if e.code == 404 => Err(StoreError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::Api(e)),
        }
    }

    async fn update(
        &self,
        namespace: &str,
        name: &str,
        endpoints: &Endpoints,
    ) -> Result<Endpoints, StoreError> {
        // replace carries metadata.resourceVersion, so a stale write is rejected with 409
        match self
            .api(namespace)
            .replace(name, &PostParams::default(), endpoints)
            .await
        {
            Ok(updated) => Ok(updated),
            Err(kube::Error::Api(e)) if e.code == 409 => Err(StoreError::Conflict {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(kube::Error::Api(e)) if e.code == 404 => Err(StoreError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::Api(e)),
        }
    }
}
