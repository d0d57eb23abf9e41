use anyhow::{Context, Result};
use bollard::container::{
    Config as ContainerConfig, CreateContainerOptions, KillContainerOptions,
    RemoveContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::image::CreateImageOptions;
use bollard::service::HostConfig;
use bollard::Docker;
use futures_util::StreamExt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;

fn env_strings(env: &[(&str, &str)]) -> Vec<String> {
    env.iter().map(|(k, v)| format!("{k}={v}")).collect()
}

/// Outcome of running a single command to completion (or timeout) inside a
/// container. Distinct from the higher-level verdict classification that
/// happens in the aggregator.
pub struct ExecOutput {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    /// Human-readable wall-clock duration. For a timed-out run this begins
    /// with `>` and names the limit that was hit, rather than a measured
    /// elapsed time (there is nothing trustworthy to measure past a kill).
    pub duration: String,
}

/// RAII handle on a running container. Every exit path from the executor
/// (success, error, timeout, panic) drops this, which guarantees the
/// container gets killed and removed exactly once.
pub struct ContainerGuard {
    docker: Docker,
    id: String,
    cleaned_up: bool,
}

impl ContainerGuard {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn cleanup(mut self) {
        self.do_cleanup().await;
    }

    async fn do_cleanup(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;

        let _ = self
            .docker
            .kill_container(&self.id, Some(KillContainerOptions { signal: "SIGKILL" }))
            .await;

        let _ = self
            .docker
            .remove_container(
                &self.id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await;
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        let docker = self.docker.clone();
        let id = self.id.clone();
        tokio::spawn(async move {
            let _ = docker
                .kill_container(&id, Some(KillContainerOptions { signal: "SIGKILL" }))
                .await;
            let _ = docker
                .remove_container(
                    &id,
                    Some(RemoveContainerOptions {
                        force: true,
                        ..Default::default()
                    }),
                )
                .await;
        });
    }
}

#[derive(Clone)]
pub struct DockerSandbox {
    docker: Docker,
}

impl DockerSandbox {
    pub fn connect() -> Result<Self> {
        let docker =
            Docker::connect_with_local_defaults().context("failed to connect to docker daemon")?;
        Ok(DockerSandbox { docker })
    }

    /// Pulls `image` if it isn't already present locally.
    pub async fn ensure_image(&self, image: &str) -> Result<()> {
        if self.docker.inspect_image(image).await.is_ok() {
            return Ok(());
        }

        let options = Some(CreateImageOptions {
            from_image: image,
            ..Default::default()
        });

        let mut stream = self.docker.create_image(options, None, None);
        while let Some(progress) = stream.next().await {
            progress.with_context(|| format!("pulling image {image}"))?;
        }

        Ok(())
    }

    pub async fn spawn_container(
        &self,
        image: &str,
        memory_mib: i64,
        nano_cpus: i64,
        env: &[(&str, &str)],
    ) -> Result<ContainerGuard> {
        self.ensure_image(image).await?;

        let host_config = HostConfig {
            memory: Some(memory_mib * 1024 * 1024),
            nano_cpus: Some(nano_cpus),
            network_mode: Some("none".to_string()),
            ..Default::default()
        };

        let config = ContainerConfig {
            image: Some(image.to_string()),
            cmd: Some(vec!["sleep".to_string(), "infinity".to_string()]),
            env: Some(env_strings(env)),
            host_config: Some(host_config),
            network_disabled: Some(true),
            working_dir: Some("/app".to_string()),
            ..Default::default()
        };

        let name = format!("judge-{}", uuid::Uuid::new_v4());
        let created = self
            .docker
            .create_container(
                Some(CreateContainerOptions {
                    name: name.clone(),
                    platform: None,
                }),
                config,
            )
            .await
            .context("failed to create container")?;

        self.docker
            .start_container::<String>(&created.id, None)
            .await
            .context("failed to start container")?;

        Ok(ContainerGuard {
            docker: self.docker.clone(),
            id: created.id,
            cleaned_up: false,
        })
    }

    /// Streams a single file into `/app/<filename>` inside the container
    /// using an in-memory tar archive, mirroring how a source file gets
    /// delivered to a freshly created sandbox.
    pub async fn inject_file(
        &self,
        container: &ContainerGuard,
        filename: &str,
        contents: &str,
    ) -> Result<()> {
        let mut builder = tar::Builder::new(Vec::new());
        let data = contents.as_bytes();
        let mut header = tar::Header::new_gnu();
        header.set_path(filename)?;
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, data)?;
        let archive = builder.into_inner()?;

        self.docker
            .upload_to_container(
                container.id(),
                Some(bollard::container::UploadToContainerOptions {
                    path: "/app",
                    ..Default::default()
                }),
                archive.into(),
            )
            .await
            .context("failed to inject source file into container")?;

        Ok(())
    }

    /// Runs `cmd` inside `container`, optionally piping `stdin`, and collects
    /// demultiplexed stdout/stderr until the process exits or `timeout`
    /// elapses. A timeout never returns an error: it's reported as
    /// `timed_out = true` so the caller can classify it as a verdict, and
    /// whatever stdout/stderr had already been captured before the kill is
    /// preserved rather than discarded with the cancelled future.
    pub async fn exec(
        &self,
        container: &ContainerGuard,
        cmd: &[&str],
        stdin: Option<&str>,
        timeout: Duration,
        env: &[(&str, &str)],
    ) -> Result<ExecOutput> {
        let exec = self
            .docker
            .create_exec(
                container.id(),
                CreateExecOptions {
                    cmd: Some(cmd.iter().map(|s| s.to_string()).collect()),
                    attach_stdin: Some(stdin.is_some()),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    working_dir: Some("/app".to_string()),
                    env: Some(env_strings(env)),
                    ..Default::default()
                },
            )
            .await
            .context("failed to create exec")?;

        let stdout = Arc::new(Mutex::new(String::new()));
        let stderr = Arc::new(Mutex::new(String::new()));
        let stdout_buf = stdout.clone();
        let stderr_buf = stderr.clone();

        let started = Instant::now();
        let run = async move {
            match self.docker.start_exec(&exec.id, None).await? {
                StartExecResults::Attached {
                    mut output,
                    mut input,
                } => {
                    if let Some(data) = stdin {
                        input.write_all(data.as_bytes()).await?;
                        input.shutdown().await?;
                    }

                    while let Some(chunk) = output.next().await {
                        match chunk? {
                            bollard::container::LogOutput::StdOut { message } => {
                                stdout_buf.lock().unwrap().push_str(&String::from_utf8_lossy(&message));
                            }
                            bollard::container::LogOutput::StdErr { message } => {
                                stderr_buf.lock().unwrap().push_str(&String::from_utf8_lossy(&message));
                            }
                            _ => {}
                        }
                    }
                }
                StartExecResults::Detached => {}
            }

            let inspect = self.docker.inspect_exec(&exec.id).await?;
            Ok::<_, anyhow::Error>(inspect.exit_code.unwrap_or(-1))
        };

        match tokio::time::timeout(timeout, run).await {
            Ok(Ok(exit_code)) => Ok(ExecOutput {
                exit_code,
                stdout: stdout.lock().unwrap().clone(),
                stderr: stderr.lock().unwrap().clone(),
                timed_out: false,
                duration: format!("{:.3}", started.elapsed().as_secs_f64()),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                let mut captured_stderr = stderr.lock().unwrap().clone();
                captured_stderr.push_str(&format!(
                    "\nExecution Timed Out (Limit: {}s)",
                    timeout.as_secs_f64()
                ));
                Ok(ExecOutput {
                    exit_code: -1,
                    stdout: stdout.lock().unwrap().clone(),
                    stderr: captured_stderr,
                    timed_out: true,
                    duration: format!(">{}s", timeout.as_secs_f64()),
                })
            }
        }
    }
}
