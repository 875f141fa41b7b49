use minforth::{
    lang::BOOTSTRAP_SOURCE,
    runtime::{
        data_structures::value::Value,
        error,
        interpreter::{CodeManagement, InterpreterStack, virtual_machine::VirtualMachine},
    },
};
use test_case::test_case;

/// Compile, link and run the code, returning what it printed.
fn run_code(code: &str) -> error::Result<String> {
    let mut vm = VirtualMachine::new();
    let mut output = Vec::new();

    vm.process_source("<test>", code)?;
    vm.run(&mut output)?;

    Ok(String::from_utf8(output).unwrap())
}

/// Like run_code, but with the bootstrap words loaded first.
fn run_with_bootstrap(code: &str) -> error::Result<String> {
    let mut vm = VirtualMachine::new();
    let mut output = Vec::new();

    vm.process_source("<bootstrap>", BOOTSTRAP_SOURCE)?;
    vm.process_source("<test>", code)?;
    vm.run(&mut output)?;

    Ok(String::from_utf8(output).unwrap())
}

#[test_case(": foo 1 2 + ; foo .", "3"; "word round trip")]
#[test_case("31337 1 if . then", "31337"; "if taken")]
#[test_case("31337 0 if . then", ""; "if not taken")]
#[test_case("1 if 31337 else 69105 then .", "31337"; "else not taken")]
#[test_case("0 if 31337 else 69105 then .", "69105"; "else taken")]
#[test_case("13 dup . .", "1313"; "dup")]
#[test_case("1 foo ! foo @ .", "1"; "store and fetch")]
#[test_case("3 2 mod .", "1"; "mod with remainder")]
#[test_case("6 2 mod .", "0"; "mod without remainder")]
#[test_case("-7 2 mod .", "-1"; "mod takes the sign of the dividend")]
#[test_case("6 3 and .", "2"; "bitwise and")]
#[test_case("-5 3 + .", "-2"; "negative addition")]
#[test_case("9223372036854775807 1 + .", "-9223372036854775808"; "addition wraps")]
#[test_case("1 2 over . . .", "121"; "over")]
#[test_case("1 2 drop .", "1"; "drop")]
#[test_case(r#""hello" ."#, "hello"; "print string")]
#[test_case(r#""a" . "\n" . "b" ."#, "a\nb"; "newline string")]
#[test_case("", ""; "empty program")]
#[test_case("1 x ! 2 x ! x @ .", "2"; "variables are overwritten")]
#[test_case(r#""s" x ! x @ ."#, "s"; "variables hold strings")]
#[test_case(": pick-one if 10 else 20 then ; 1 pick-one . 0 pick-one .", "1020"; "conditional in a word")]
#[test_case(r#""yes" if 1 . then"#, "1"; "only integer zero is false")]
#[test_case("1 if 0 if 1 . else 2 . then else 3 . then", "2"; "nested conditionals")]
#[test_case(": one 1 ; : two one one + ; one . two . one .", "121"; "nested calls")]
#[test_case(": countdown dup . dup if -1 + countdown else drop then ; 3 countdown", "3210"; "recursion")]
#[test_case(": later early ; : early 7 . ; later", "7"; "forward reference")]
#[test_case("( comment ) 5 ( another ( nested ) one ) .", "5"; "comments are transparent")]
fn runs(code: &str, expected: &str) {
    assert_eq!(run_code(code).unwrap(), expected);
}

#[test]
fn bootstrap_words() {
    assert_eq!(run_with_bootstrap("1 . cr 5 3 2dup . . . .").unwrap(), "1\n3535");
}

#[test]
fn stack_is_left_for_inspection() {
    let mut vm = VirtualMachine::new();
    let mut output = Vec::new();

    vm.process_source("<test>", "1 \"two\" 3").unwrap();
    vm.run(&mut output).unwrap();

    assert_eq!(vm.stack(), &vec![Value::Int(1), Value::from("two"), Value::Int(3)]);
}

#[test]
fn general_pick_depth() {
    // No source word compiles to a dup deeper than 1, so use the stack interface directly.
    let mut vm = VirtualMachine::new();

    vm.push(Value::Int(1));
    vm.push(Value::Int(2));
    vm.push(Value::Int(3));

    assert_eq!(vm.pick(2).unwrap(), Value::Int(1));
    assert!(vm.pick(3).is_err());

    assert!(vm.drop_values(4).is_err());
    assert_eq!(vm.stack().len(), 3);

    vm.drop_values(3).unwrap();
    assert!(vm.stack().is_empty());
}

#[test]
fn runtime_errors_carry_a_call_stack() {
    let mut vm = VirtualMachine::new();
    let mut output = Vec::new();

    vm.process_source("<test>", ": broken 1 0 mod ; broken").unwrap();

    let error = vm.run(&mut output).unwrap_err();
    let call_stack = error.call_stack().as_ref().unwrap();

    let names: Vec<&str> = call_stack.iter().map(|item| item.word().as_str()).collect();
    assert_eq!(names, vec!["top-level code", "broken"]);
    assert_eq!(error.location().as_ref().map(|location| location.path().as_str()), Some("<test>"));
}

#[test_case("."; "print on empty stack")]
#[test_case("1 +"; "add underflow")]
#[test_case(r#""a" 1 +"#; "add string to integer")]
#[test_case(r#"1 "a" and"#; "and with a string")]
#[test_case("1 0 mod"; "mod by zero")]
#[test_case("x @"; "fetch unbound variable")]
#[test_case("x !"; "store from empty stack")]
#[test_case("dup"; "dup on empty stack")]
#[test_case("1 over"; "over with one value")]
#[test_case("drop"; "drop on empty stack")]
#[test_case("if 1 then"; "conditional on empty stack")]
fn runtime_errors(code: &str) {
    assert!(run_code(code).is_err());
}

#[test]
fn output_before_an_error_is_kept() {
    let mut vm = VirtualMachine::new();
    let mut output = Vec::new();

    vm.process_source("<test>", "1 . .").unwrap();

    assert!(vm.run(&mut output).is_err());
    assert_eq!(output, b"1");
}
