use crate::runtime::{error::ErrorKind, host::StaticHost, value::Value, vm::VM};

#[test]
fn concat_strings() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::String("fizz".into())).unwrap();
    vm.push(Value::String("buzz".into())).unwrap();

    vm.execute_concat().unwrap();

    assert_eq!(vm.pop().unwrap(), Value::String("fizzbuzz".into()));
}

#[test]
fn concat_lists() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::List(vec![Value::Number(1.0)].into())).unwrap();
    vm.push(Value::List(vec![Value::Number(2.0)].into())).unwrap();

    vm.execute_concat().unwrap();

    assert_eq!(
        vm.pop().unwrap(),
        Value::List(vec![Value::Number(1.0), Value::Number(2.0)].into())
    );
}

#[test]
fn concat_rejects_mixed_operands() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::String("a".into())).unwrap();
    vm.push(Value::List(vec![].into())).unwrap();

    assert!(vm.execute_concat().is_err());
}

#[test]
fn split_on_separator() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::String("a,b,,c".into())).unwrap();
    vm.push(Value::String(",".into())).unwrap();

    vm.execute_split().unwrap();

    assert_eq!(
        vm.pop().unwrap(),
        Value::List(
            vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String("".into()),
                Value::String("c".into()),
            ]
            .into()
        )
    );
}

#[test]
fn split_on_empty_separator_yields_characters() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::String("abc".into())).unwrap();
    vm.push(Value::String("".into())).unwrap();

    vm.execute_split().unwrap();

    assert_eq!(
        vm.pop().unwrap(),
        Value::List(
            vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String("c".into()),
            ]
            .into()
        )
    );
}

#[test]
fn match_tests_a_pattern() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::String("warning: low disk".into())).unwrap();
    vm.push(Value::String("^warn".into())).unwrap();

    vm.execute_match().unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Bool(true));
}

#[test]
fn match_reports_bad_patterns() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::String("anything".into())).unwrap();
    vm.push(Value::String("(unclosed".into())).unwrap();

    let error = vm.execute_match().unwrap_err();

    assert!(matches!(error.kind, ErrorKind::InvalidPattern { .. }));
}

#[test]
fn match_requires_strings() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(1.0)).unwrap();
    vm.push(Value::String("1".into())).unwrap();

    assert!(vm.execute_match().is_err());
}
