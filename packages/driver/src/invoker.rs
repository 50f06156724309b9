//! Execution of external helper programs.
//!
//! The mounter never spawns processes itself. It goes through [`Invoker`],
//! so tests can record invocations instead of running `fuse-nfs`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::InvokeError;

/// Per-call execution settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvokeContext {
    timeout: Option<Duration>,
}

impl InvokeContext {
    /// No deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Abandon the call once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Trait for running a named program with arguments.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Run `program` with `args`, returning its combined output.
    ///
    /// A non-zero exit status is an error carrying that output.
    async fn invoke(
        &self,
        context: &InvokeContext,
        program: &str,
        args: &[String],
    ) -> Result<Vec<u8>, InvokeError>;
}

/// Production invoker spawning real processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandInvoker;

impl CommandInvoker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Invoker for CommandInvoker {
    async fn invoke(
        &self,
        context: &InvokeContext,
        program: &str,
        args: &[String],
    ) -> Result<Vec<u8>, InvokeError> {
        log::debug!("invoking {} {}", program, args.join(" "));

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let pending = command.output();
        let output = match context.timeout() {
            Some(timeout) => tokio::time::timeout(timeout, pending)
                .await
                .map_err(|_| InvokeError::TimedOut {
                    program: program.to_string(),
                    timeout,
                })?,
            None => pending.await,
        }
        .map_err(|source| InvokeError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if !output.status.success() {
            return Err(InvokeError::Failed {
                program: program.to_string(),
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&combined).trim().to_string(),
            });
        }

        Ok(combined)
    }
}

/// Recording invoker for tests.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// One recorded call.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Invocation {
        pub context: InvokeContext,
        pub program: String,
        pub args: Vec<String>,
    }

    /// An invoker that records calls and returns a configured result.
    #[derive(Clone, Default)]
    pub struct MockInvoker {
        recorded: Arc<Mutex<Vec<Invocation>>>,
        failure: Arc<Mutex<Option<String>>>,
    }

    impl MockInvoker {
        pub fn new() -> Self {
            Self::default()
        }

        /// Configure to fail every call with `message` as output.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.failure.lock().unwrap() = Some(message.into());
            self
        }

        pub fn recorded(&self) -> Vec<Invocation> {
            self.recorded.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Invoker for MockInvoker {
        async fn invoke(
            &self,
            context: &InvokeContext,
            program: &str,
            args: &[String],
        ) -> Result<Vec<u8>, InvokeError> {
            self.recorded.lock().unwrap().push(Invocation {
                context: *context,
                program: program.to_string(),
                args: args.to_vec(),
            });

            match self.failure.lock().unwrap().clone() {
                Some(output) => Err(InvokeError::Failed {
                    program: program.to_string(),
                    status: "exit status: 1".to_string(),
                    output,
                }),
                None => Ok(Vec::new()),
            }
        }
    }
}
