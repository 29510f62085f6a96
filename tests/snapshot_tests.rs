mod env_guard {
    use std::ffi::OsString;
    use std::sync::{Mutex, MutexGuard};

    // NO_COLOR is a process-global environment variable; guard access to avoid
    // racy tests when diagnostics are rendered in parallel.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    pub struct EnvGuard {
        prev: Option<OsString>,
    }

    impl EnvGuard {
        fn set_no_color(value: Option<&str>) -> Self {
            let prev = std::env::var_os("NO_COLOR");
            unsafe {
                match value {
                    Some(val) => std::env::set_var("NO_COLOR", val),
                    None => std::env::remove_var("NO_COLOR"),
                }
            }
            Self { prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            unsafe {
                match &self.prev {
                    Some(val) => std::env::set_var("NO_COLOR", val),
                    None => std::env::remove_var("NO_COLOR"),
                }
            }
        }
    }

    pub fn with_no_color(value: Option<&str>) -> (MutexGuard<'static, ()>, EnvGuard) {
        let lock = ENV_LOCK.lock().unwrap();
        let guard = EnvGuard::set_no_color(value);
        (lock, guard)
    }
}

use trawl::frontend;
use trawl::frontend::diagnostic::{render_diagnostics, strip_ansi, Diagnostic};
use trawl::frontend::position::Position;
use trawl::runtime::error::{ErrorKind, RuntimeError};

fn parse_errors(source: &str) -> Vec<Diagnostic> {
    frontend::parse(source).unwrap_err()
}

#[test]
fn snapshot_parse_error_with_source_line() {
    let (_lock, _guard) = env_guard::with_no_color(Some("1"));

    let source = "push frobnicate";
    let output = parse_errors(source)[0].render(Some(source));

    let expected = "\
-- unknown word `frobnicate` -- [E000]

1 | push frobnicate
  |      ^";

    assert_eq!(output, expected);
}

#[test]
fn snapshot_fallback_without_source_text() {
    let (_lock, _guard) = env_guard::with_no_color(Some("1"));

    let output = parse_errors("push frobnicate")[0].render(None);

    insta::assert_snapshot!(output, @r"
    -- unknown word `frobnicate` -- [E000]

    at 1:6
    ");
}

#[test]
fn snapshot_hint_lines() {
    let (_lock, _guard) = env_guard::with_no_color(Some("1"));

    let source = "push \"abc";
    let output = parse_errors(source)[0].render(Some(source));

    let expected = "\
-- unterminated string -- [E000]

1 | push \"abc
  |      ^

Hint: Close it with `\"`.";

    assert_eq!(output, expected);
}

#[test]
fn snapshot_aggregated_output() {
    let (_lock, _guard) = env_guard::with_no_color(Some("1"));

    let source = "foo dup bar";
    let output = render_diagnostics(&parse_errors(source), Some(source));

    let expected = "\
-- unknown word `foo` -- [E000]

1 | foo dup bar
  | ^

-- unknown word `bar` -- [E000]

1 | foo dup bar
  |         ^";

    assert_eq!(output, expected);
}

#[test]
fn snapshot_colorized_output() {
    let (_lock, _guard) = env_guard::with_no_color(None);

    let source = "push frobnicate";
    let output = parse_errors(source)[0].render(Some(source));

    let expected = "\
\u{1b}[33m-- unknown word `frobnicate` -- [E000]
\u{1b}[0m
1 | push frobnicate
  |      \u{1b}[33m^\u{1b}[0m";

    assert_eq!(output, expected);
}

#[test]
fn strip_ansi_recovers_the_plain_rendering() {
    let (_lock, _guard) = env_guard::with_no_color(None);

    let source = "push frobnicate";
    let colored = parse_errors(source)[0].render(Some(source));

    let expected = "\
-- unknown word `frobnicate` -- [E000]

1 | push frobnicate
  |      ^";

    assert_eq!(strip_ansi(&colored), expected);
}

#[test]
fn snapshot_runtime_error_with_hint() {
    let (_lock, _guard) = env_guard::with_no_color(Some("1"));

    let source = "push [1 2]\npush 9\nmap";
    let error = RuntimeError::new(ErrorKind::UndefinedRegister(9), Position::new(3, 1));
    let output = error.to_diagnostic().render(Some(source));

    let expected = "\
-- undefined register 9 -- [E000]

3 | map
  | ^

Hint: Define it first with `iload`.";

    assert_eq!(output, expected);
}

#[test]
fn snapshot_arity_error() {
    let (_lock, _guard) = env_guard::with_no_color(Some("1"));

    let source = "iload 0 {dup} push [1] push 0 map";
    let error = RuntimeError::new(ErrorKind::ArityMismatch { left: 2 }, Position::new(1, 31));
    let output = error.to_diagnostic().render(Some(source));

    let expected = "\
-- block left 2 values on its stack, expected exactly 1 -- [E000]

1 | iload 0 {dup} push [1] push 0 map
  |                               ^

Hint: A block must leave exactly one result for its caller.";

    assert_eq!(output, expected);
}

#[test]
fn runtime_errors_serialize_for_tooling() {
    let error = RuntimeError::new(ErrorKind::UndefinedRegister(9), Position::new(3, 1));

    let json = serde_json::to_value(&error).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "kind": { "UndefinedRegister": 9 },
            "position": { "line": 3, "column": 1 }
        })
    );
}

#[test]
fn snapshot_program_listing() {
    let source = "push 1 iload 0 {dup *} push [1 \"two\" nil] push 0 map";
    let program = frontend::parse(source).unwrap();

    insta::assert_snapshot!(program.to_string(), @r#"
    push 1
    iload 0 {dup *}
    push [1 "two" nil]
    push 0
    map
    "#);
}
