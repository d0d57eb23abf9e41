use anyhow::Result;
use shared::language::{self, LanguageSpec, MIN_MEMORY_MIB};
use std::time::Duration;

use crate::sandbox::{ContainerGuard, DockerSandbox};

/// Result of preparing and running a submission's code against a single
/// input. Compilation failure is reported as its own variant rather than a
/// generic execution result with a nonzero exit code, since it should never
/// be compared against expected output at all.
pub enum ExecutionOutcome {
    CompileFailed { stderr: String },
    Ran {
        exit_code: i64,
        stdout: String,
        stderr: String,
        timed_out: bool,
        duration: String,
    },
}

/// Owns the container for one submission's lifetime: one compile (if any),
/// then one run per test case, then teardown.
pub struct PreparedSubmission {
    sandbox: DockerSandbox,
    container: ContainerGuard,
    spec: LanguageSpec,
}

pub struct Executor {
    sandbox: DockerSandbox,
}

impl Executor {
    pub fn new() -> Result<Self> {
        Ok(Executor {
            sandbox: DockerSandbox::connect()?,
        })
    }

    /// Provisions a container for `language`, injects `source_code`, and
    /// compiles it if the language requires it. Returns `Err` only for
    /// infrastructure failures (docker unreachable, image pull failed);
    /// a failing user compile is folded into the returned outcome.
    pub async fn prepare(
        &self,
        language: &str,
        source_code: &str,
        memory_limit_mib: i64,
    ) -> Result<(PreparedSubmission, Option<ExecutionOutcome>)> {
        let spec = language::lookup(language)
            .ok_or_else(|| anyhow::anyhow!("unsupported language: {language}"))?;

        let effective_memory = memory_limit_mib.max(MIN_MEMORY_MIB);
        let container = self
            .sandbox
            .spawn_container(spec.image, effective_memory, 1_000_000_000, spec.env)
            .await?;

        self.sandbox
            .inject_file(&container, spec.source_file, source_code)
            .await?;

        let prepared = PreparedSubmission {
            sandbox: self.sandbox.clone(),
            container,
            spec,
        };

        let Some(compile_cmd) = spec.compile_cmd else {
            return Ok((prepared, None));
        };

        let output = prepared
            .sandbox
            .exec(
                &prepared.container,
                compile_cmd,
                None,
                Duration::from_secs(15),
                spec.env,
            )
            .await?;

        if output.timed_out || output.exit_code != 0 {
            return Ok((
                prepared,
                Some(ExecutionOutcome::CompileFailed {
                    stderr: format!("Compilation Error:\n{}", output.stderr),
                }),
            ));
        }

        Ok((prepared, None))
    }
}

impl PreparedSubmission {
    /// Runs the already-compiled program against one test case's input,
    /// within `time_limit_s` (plus the language's startup buffer).
    pub async fn run(&self, input: &str, time_limit_s: f64) -> Result<ExecutionOutcome> {
        let effective_timeout =
            Duration::from_secs_f64(time_limit_s + self.spec.time_buffer_secs);

        let output = self
            .sandbox
            .exec(
                &self.container,
                self.spec.run_cmd,
                Some(input),
                effective_timeout,
                self.spec.env,
            )
            .await?;

        Ok(ExecutionOutcome::Ran {
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            timed_out: output.timed_out,
            duration: output.duration,
        })
    }

    pub async fn cleanup(self) {
        self.container.cleanup().await;
    }
}
