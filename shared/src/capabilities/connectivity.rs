use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::reachability::Reachability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityOperation {
    /// One-shot query of the current state.
    Check,
    /// Open the change stream. The shell keeps resolving it until `Unwatch`.
    Watch,
    /// Close the change stream.
    Unwatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityOutput {
    Status(Reachability),
    Failed { message: String },
}

impl ConnectivityOutput {
    pub fn into_result(self) -> Result<Reachability, ConnectivityError> {
        match self {
            Self::Status(reachability) => Ok(reachability),
            Self::Failed { message } => Err(ConnectivityError::Platform { message }),
        }
    }
}

impl Operation for ConnectivityOperation {
    type Output = ConnectivityOutput;
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityError {
    #[error("platform connectivity query failed: {message}")]
    Platform { message: String },
}

#[derive(Capability)]
pub struct Connectivity<Ev> {
    context: CapabilityContext<ConnectivityOperation, Ev>,
}

impl<Ev> Connectivity<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ConnectivityOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn check<F>(&self, make_event: F)
    where
        F: FnOnce(Result<Reachability, ConnectivityError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context
                .request_from_shell(ConnectivityOperation::Check)
                .await;
            context.update_app(make_event(output.into_result()));
        });
    }

    /// Failures on the stream are delivered as [`Reachability::Unknown`].
    pub fn watch<F>(&self, make_event: F)
    where
        F: Fn(Reachability) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut stream = context.stream_from_shell(ConnectivityOperation::Watch);
            while let Some(output) = stream.next().await {
                let reachability = output.into_result().unwrap_or_else(|e| {
                    warn!(error = %e, "connectivity stream reported a failure");
                    Reachability::Unknown
                });
                context.update_app(make_event(reachability));
            }
        });
    }

    pub fn unwatch(&self) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(ConnectivityOperation::Unwatch).await;
        });
    }
}
