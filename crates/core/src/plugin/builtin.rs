//! Container and cluster plugins shipped with toolbox

use super::{Plugin, file_exists};
use crate::types::{ContextConfig, ContextTable};
use std::path::Path;

/// Docker and docker-compose projects
#[derive(Debug, Clone)]
pub struct DockerPlugin {
    name: String,
    version: String,
}

impl Default for DockerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerPlugin {
    pub fn new() -> Self {
        Self {
            name: "docker".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

impl Plugin for DockerPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn contexts(&self) -> ContextTable {
        // No shell runs these, so anything like `$(pwd)` would reach docker
        // literally. Image names are passed by the caller instead.
        let docker = ContextConfig::new()
            .with_command("build", "docker build .")
            .with_command("run", "docker run -it")
            .with_command("push", "docker push")
            .with_command("compose", "docker-compose up")
            .with_command("stop", "docker-compose down")
            .with_command("logs", "docker-compose logs -f")
            .with_command("shell", "docker exec -it")
            .with_description("build", "Build the image in this directory (pass -t <name>)")
            .with_description("run", "Run an image interactively: run <image>")
            .with_description("shell", "Open a process in a container: shell <container> /bin/bash");

        let compose = ContextConfig::new()
            .with_command("up", "docker-compose up -d")
            .with_command("down", "docker-compose down")
            .with_command("logs", "docker-compose logs -f")
            .with_command("build", "docker-compose build")
            .with_command("restart", "docker-compose restart");

        ContextTable::from([
            ("docker".to_string(), docker),
            ("docker-compose".to_string(), compose),
        ])
    }

    fn detect(&self, dir: &Path) -> Option<String> {
        if file_exists(&dir.join("Dockerfile")) {
            return Some("docker".to_string());
        }

        ["docker-compose.yml", "docker-compose.yaml"]
            .iter()
            .any(|f| file_exists(&dir.join(f)))
            .then(|| "docker-compose".to_string())
    }
}

/// Kubernetes manifests and Helm charts
#[derive(Debug, Clone)]
pub struct KubernetesPlugin {
    name: String,
    version: String,
}

impl Default for KubernetesPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl KubernetesPlugin {
    const MANIFESTS: [&'static str; 4] = [
        "deployment.yaml",
        "deployment.yml",
        "k8s/deployment.yaml",
        "kubernetes/deployment.yaml",
    ];

    pub fn new() -> Self {
        Self {
            name: "kubernetes".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

impl Plugin for KubernetesPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn contexts(&self) -> ContextTable {
        let kubernetes = ContextConfig::new()
            .with_command("apply", "kubectl apply -f .")
            .with_command("delete", "kubectl delete -f .")
            .with_command("get", "kubectl get all")
            .with_command("logs", "kubectl logs -f")
            .with_command("describe", "kubectl describe")
            .with_command("exec", "kubectl exec -it")
            .with_command("port-forward", "kubectl port-forward");

        let helm = ContextConfig::new()
            .with_command("install", "helm install")
            .with_command("upgrade", "helm upgrade")
            .with_command("rollback", "helm rollback")
            .with_command("list", "helm list")
            .with_command("delete", "helm delete");

        ContextTable::from([
            ("kubernetes".to_string(), kubernetes),
            ("helm".to_string(), helm),
        ])
    }

    fn detect(&self, dir: &Path) -> Option<String> {
        if Self::MANIFESTS.iter().any(|m| file_exists(&dir.join(m))) {
            return Some("kubernetes".to_string());
        }

        file_exists(&dir.join("Chart.yaml")).then(|| "helm".to_string())
    }
}
