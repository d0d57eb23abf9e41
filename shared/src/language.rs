/// Static descriptor for one supported language. Mirrors the fixed table the
/// executor consults to pick an image and compile/run commands; never built
/// from user input.
#[derive(Debug, Clone, Copy)]
pub struct LanguageSpec {
    pub id: i32,
    pub name: &'static str,
    pub image: &'static str,
    pub source_file: &'static str,
    pub compile_cmd: Option<&'static [&'static str]>,
    pub run_cmd: &'static [&'static str],
    /// Extra environment variables set on both the container and every exec
    /// run inside it (e.g. go needs `GOCACHE`/`CGO_ENABLED` set so `go run`
    /// doesn't try to write a cache outside the sandboxed filesystem).
    pub env: &'static [(&'static str, &'static str)],
    /// Extra seconds added on top of a problem's declared time limit to
    /// absorb interpreter/runtime startup cost.
    pub time_buffer_secs: f64,
}

pub const PYTHON: LanguageSpec = LanguageSpec {
    id: 71,
    name: "python",
    image: "python:3.8-slim",
    source_file: "main.py",
    compile_cmd: None,
    run_cmd: &["python3", "main.py"],
    env: &[],
    time_buffer_secs: 0.0,
};

pub const CPP: LanguageSpec = LanguageSpec {
    id: 54,
    name: "cpp",
    image: "gcc:latest",
    source_file: "main.cpp",
    compile_cmd: Some(&["g++", "-o", "main", "main.cpp"]),
    run_cmd: &["./main"],
    env: &[],
    time_buffer_secs: 0.0,
};

pub const JAVA: LanguageSpec = LanguageSpec {
    id: 62,
    name: "java",
    image: "eclipse-temurin:11-jdk-jammy",
    source_file: "Main.java",
    compile_cmd: Some(&["javac", "Main.java"]),
    run_cmd: &["java", "Main"],
    env: &[],
    time_buffer_secs: 2.0,
};

pub const GO: LanguageSpec = LanguageSpec {
    id: 60,
    name: "go",
    image: "golang:1.23-alpine",
    source_file: "main.go",
    compile_cmd: None,
    run_cmd: &["go", "run", "main.go"],
    env: &[("GOCACHE", "/tmp/gocache"), ("CGO_ENABLED", "0")],
    time_buffer_secs: 10.0,
};

pub const JAVASCRIPT: LanguageSpec = LanguageSpec {
    id: 63,
    name: "javascript",
    image: "node:14-alpine",
    source_file: "main.js",
    compile_cmd: None,
    run_cmd: &["node", "main.js"],
    env: &[],
    time_buffer_secs: 0.0,
};

pub const ALL: &[LanguageSpec] = &[PYTHON, CPP, JAVA, GO, JAVASCRIPT];

pub fn lookup(name: &str) -> Option<LanguageSpec> {
    ALL.iter().copied().find(|l| l.name.eq_ignore_ascii_case(name))
}

/// Minimum memory floor the executor always enforces, regardless of what a
/// problem declares.
pub const MIN_MEMORY_MIB: i64 = 512;
