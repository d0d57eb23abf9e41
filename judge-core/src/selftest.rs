use shared::language::{self, LanguageSpec};

use crate::executor::{Executor, ExecutionOutcome};

struct Probe {
    spec: LanguageSpec,
    source: &'static str,
}

fn probes() -> Vec<Probe> {
    vec![
        Probe { spec: language::PYTHON, source: "print('test')" },
        Probe { spec: language::CPP, source: "#include <cstdio>\nint main(){printf(\"test\");}" },
        Probe {
            spec: language::JAVA,
            source: "public class Main { public static void main(String[] a) { System.out.print(\"test\"); } }",
        },
        Probe {
            spec: language::GO,
            source: "package main\nimport \"fmt\"\nfunc main(){fmt.Print(\"test\")}",
        },
        Probe { spec: language::JAVASCRIPT, source: "process.stdout.write('test')" },
    ]
}

/// Compiles and runs a trivial "print test" program in every supported
/// language at startup, so a broken image or missing compiler is caught
/// before the first real submission reaches a worker.
pub async fn run(executor: &Executor) -> bool {
    let mut all_passed = true;

    for probe in probes() {
        match run_one(executor, &probe).await {
            Ok(true) => tracing::info!(language = probe.spec.name, "self-test passed"),
            Ok(false) => {
                all_passed = false;
                tracing::error!(language = probe.spec.name, "self-test produced wrong output");
            }
            Err(e) => {
                all_passed = false;
                tracing::error!(language = probe.spec.name, error = %e, "self-test failed");
            }
        }
    }

    if all_passed {
        tracing::info!("self-test: all languages passed");
    } else {
        tracing::error!("self-test: one or more languages failed");
    }

    all_passed
}

async fn run_one(executor: &Executor, probe: &Probe) -> anyhow::Result<bool> {
    let (prepared, compile_outcome) = executor.prepare(probe.spec.name, probe.source, 512).await?;

    if let Some(ExecutionOutcome::CompileFailed { stderr }) = compile_outcome {
        prepared.cleanup().await;
        anyhow::bail!("compile failed: {stderr}");
    }

    let outcome = prepared.run("", 10.0).await?;
    prepared.cleanup().await;

    match outcome {
        ExecutionOutcome::Ran { stdout, timed_out, exit_code, .. } => {
            Ok(!timed_out && exit_code == 0 && stdout.trim() == "test")
        }
        ExecutionOutcome::CompileFailed { .. } => Ok(false),
    }
}
