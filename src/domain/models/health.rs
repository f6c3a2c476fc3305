//! Readiness reporting models.

use serde::{Deserialize, Serialize};

/// Overall service readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// Health of one dependency, with failure detail when unhealthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyHealth {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DependencyHealth {
    pub fn ok() -> Self {
        Self {
            ok: true,
            detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: Some(detail.into()),
        }
    }
}

/// Readiness status distinguishing index failure from backend failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub index: DependencyHealth,
    pub backend: DependencyHealth,
}

impl HealthStatus {
    pub fn new(index: DependencyHealth, backend: DependencyHealth) -> Self {
        let status = if index.ok && backend.ok {
            HealthState::Healthy
        } else {
            HealthState::Degraded
        };

        Self {
            status,
            index,
            backend,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}
