use std::cmp::Ordering;

use crate::runtime::{error::ErrorKind, host::StaticHost, value::Value, vm::VM};

#[test]
fn add_numbers() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(2.0)).unwrap();
    vm.push(Value::Number(3.5)).unwrap();

    vm.execute_arithmetic("+", |l, r| l + r).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Number(5.5));
}

#[test]
fn subtraction_order() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(10.0)).unwrap();
    vm.push(Value::Number(4.0)).unwrap();

    vm.execute_arithmetic("-", |l, r| l - r).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Number(6.0));
}

#[test]
fn division_by_zero_is_infinite() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(1.0)).unwrap();
    vm.push(Value::Number(0.0)).unwrap();

    vm.execute_arithmetic("/", |l, r| l / r).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Number(f64::INFINITY));
}

#[test]
fn arithmetic_rejects_strings() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(1.0)).unwrap();
    vm.push(Value::String("2".into())).unwrap();

    let error = vm.execute_arithmetic("+", |l, r| l + r).unwrap_err();

    assert_eq!(
        error.kind,
        ErrorKind::TypeMismatch {
            operation: "+",
            expected: "Number and Number",
            got: "Number and String".to_string(),
        }
    );
}

#[test]
fn compare_numbers() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(2.0)).unwrap();
    vm.push(Value::Number(1.0)).unwrap();

    vm.execute_order(">", Ordering::is_gt).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Bool(true));
}

#[test]
fn compare_strings_lexicographically() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::String("apple".into())).unwrap();
    vm.push(Value::String("banana".into())).unwrap();

    vm.execute_order("<", Ordering::is_lt).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Bool(true));
}

#[test]
fn nan_never_orders() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(f64::NAN)).unwrap();
    vm.push(Value::Number(f64::NAN)).unwrap();

    vm.execute_order(">=", Ordering::is_ge).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Bool(false));
}

#[test]
fn mixed_order_operands_error() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(1.0)).unwrap();
    vm.push(Value::String("x".into())).unwrap();

    assert!(vm.execute_order(">", Ordering::is_gt).is_err());
}

#[test]
fn equality_across_kinds_is_false() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Number(1.0)).unwrap();
    vm.push(Value::String("1".into())).unwrap();

    vm.execute_equality(false).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Bool(false));
}

#[test]
fn inequality_negates() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Null).unwrap();
    vm.push(Value::Null).unwrap();

    vm.execute_equality(true).unwrap();

    assert_eq!(vm.pop().unwrap(), Value::Bool(false));
}

#[test]
fn logic_is_strict_about_booleans() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Bool(true)).unwrap();
    vm.push(Value::Number(1.0)).unwrap();

    let error = vm.execute_logic("and", |l, r| l && r).unwrap_err();

    assert!(matches!(error.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn and_or_not() {
    let mut host = StaticHost::new();
    let mut vm = VM::new(&mut host);
    vm.push(Value::Bool(true)).unwrap();
    vm.push(Value::Bool(false)).unwrap();
    vm.execute_logic("or", |l, r| l || r).unwrap();
    assert_eq!(vm.pop().unwrap(), Value::Bool(true));

    vm.push(Value::Bool(true)).unwrap();
    vm.push(Value::Bool(false)).unwrap();
    vm.execute_logic("and", |l, r| l && r).unwrap();
    assert_eq!(vm.pop().unwrap(), Value::Bool(false));

    vm.push(Value::Bool(false)).unwrap();
    vm.execute_not().unwrap();
    assert_eq!(vm.pop().unwrap(), Value::Bool(true));
}
