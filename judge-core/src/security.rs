use shared::JudgeError;

/// Substrings disallowed in submitted source, checked before any container
/// work happens. Deliberately coarse: this is a pre-flight guard against
/// gross sandbox escapes, not a substitute for the container boundary itself.
fn denylist(language: &str) -> &'static [&'static str] {
    match language {
        "python" => &[
            "os.system", "subprocess", "exec(", "eval(", "open(", "import os", "import subprocess",
        ],
        "javascript" => &["child_process", "exec(", "spawn(", "fs.", "process.exit"],
        "go" => &["os/exec", "syscall", "net/http", "os.Exit"],
        "cpp" => &["system(", "exec(", "fork(", "popen("],
        "java" => &["Runtime.getRuntime", "ProcessBuilder", "System.exit"],
        _ => &[],
    }
}

pub fn check(language: &str, source_code: &str) -> Result<(), JudgeError> {
    for keyword in denylist(language) {
        if source_code.contains(keyword) {
            return Err(JudgeError::SecurityViolation(keyword.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_known_dangerous_call() {
        let err = check("python", "import os\nos.system('rm -rf /')").unwrap_err();
        assert!(matches!(err, JudgeError::SecurityViolation(_)));
    }

    #[test]
    fn allows_clean_source() {
        assert!(check("python", "print('hello world')").is_ok());
    }

    #[test]
    fn unknown_language_has_no_denylist() {
        assert!(check("brainfuck", "anything at all").is_ok());
    }
}
