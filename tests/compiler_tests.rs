use minforth::{
    lang::{
        code::{AbstractOp, OpList, Opcode, TOP_LEVEL_WORD},
        compilation::{Compiler, MAX_NESTING, compile_source},
    },
    runtime::data_structures::value::Value,
};
use test_case::test_case;

fn push(value: i64) -> AbstractOp {
    AbstractOp::push(Value::Int(value))
}

fn op(opcode: Opcode) -> AbstractOp {
    AbstractOp::simple(opcode)
}

fn op_with(opcode: Opcode, arg: u32) -> AbstractOp {
    AbstractOp::new(opcode, arg, Value::Void)
}

/// Compile top-level statements only, without wrapping them into a word.
fn compile_ops(code: &str) -> OpList {
    Compiler::new("<test>", code).compile(&[]).unwrap()
}

#[test_case("", vec![]; "nothing")]
#[test_case("1 2 + .", vec![push(1), push(2), op(Opcode::Add), op(Opcode::Print)]; "addition")]
#[test_case(r#""foo" ."#, vec![AbstractOp::push(Value::from("foo")), op(Opcode::Print)]; "print string")]
#[test_case("foo ( n1 n2 -- n' ) 1 2 + .",
            vec![AbstractOp::call("foo"), push(1), push(2), op(Opcode::Add), op(Opcode::Print)];
            "call and comment")]
#[test_case("dup over drop",
            vec![op_with(Opcode::Dup, 0), op_with(Opcode::Dup, 1), op_with(Opcode::Drop, 1)];
            "stack primitives")]
#[test_case("mod and", vec![op(Opcode::Mod), op(Opcode::And)]; "arithmetic primitives")]
#[test_case("foo bar", vec![AbstractOp::call("foo"), AbstractOp::call("bar")]; "calls")]
#[test_case("1 foo ! foo @",
            vec![push(1),
                 AbstractOp::new(Opcode::Store, 0, Value::from("foo")),
                 AbstractOp::new(Opcode::Fetch, 0, Value::from("foo"))];
            "store and fetch")]
#[test_case("1 if 2 then", vec![push(1), AbstractOp::jump_if_not(2), push(2)]; "if")]
#[test_case("1 if then", vec![push(1), AbstractOp::jump_if_not(1)]; "empty if")]
#[test_case("1 if 2 else 3 then",
            vec![push(1), AbstractOp::jump_if_not(3), push(2), AbstractOp::jump(2), push(3)];
            "if else")]
#[test_case("1 if 2 3 else 4 5 6 then",
            vec![push(1), AbstractOp::jump_if_not(4), push(2), push(3), AbstractOp::jump(4),
                 push(4), push(5), push(6)];
            "if else with longer branches")]
#[test_case("if 1 if 2 then then",
            vec![AbstractOp::jump_if_not(4), push(1), AbstractOp::jump_if_not(2), push(2)];
            "nested if")]
fn compiles(code: &str, expected: Vec<AbstractOp>) {
    assert_eq!(compile_ops(code), expected);
}

#[test]
fn word_compile() {
    let mut compiler = Compiler::new("<test>", ": foo 1 . ; foo");

    let ops = compiler.compile(&[]).unwrap();
    assert_eq!(ops, vec![AbstractOp::call("foo")]);

    let words = compiler.words();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].name, "foo");
    assert_eq!(words[0].ops, vec![push(1), op(Opcode::Print), op(Opcode::Return)]);
}

#[test]
fn top_level_word_comes_last() {
    let words = compile_source("<test>", ": foo 1 ; 2 : bar 3 ; foo").unwrap();

    let names: Vec<&str> = words.iter().map(|word| word.name.as_str()).collect();
    assert_eq!(names, vec!["foo", "bar", TOP_LEVEL_WORD]);

    assert_eq!(words[2].ops, vec![push(2), AbstractOp::call("foo"), op(Opcode::Return)]);
}

#[test]
fn every_word_ends_with_return() {
    let words = compile_source("<test>", ": empty ; ").unwrap();

    assert_eq!(words[0].ops, vec![op(Opcode::Return)]);
    assert_eq!(words[1].ops, vec![op(Opcode::Return)]);
}

#[test]
fn compile_stops_at_stop_words() {
    let mut compiler = Compiler::new("<test>", "1 2 then 3");

    assert_eq!(compiler.compile(&["then"]).unwrap(), vec![push(1), push(2)]);
}

#[test_case("; foo 1 . ;"; "spurious semicolon")]
#[test_case(": foo 1 ."; "missing semicolon")]
#[test_case("1 else ."; "spurious else")]
#[test_case("1 then ."; "spurious then")]
#[test_case("1 if foo"; "unterminated if")]
#[test_case("1 if foo else bar"; "unterminated if else")]
#[test_case("1 if 2 else 3 else 4 then"; "double else")]
#[test_case("1 ( 2"; "unterminated comment")]
#[test_case(": foo : bar ; ;"; "nested definition")]
#[test_case(": 1 2 ;"; "number as a word name")]
#[test_case(": if 2 ;"; "keyword as a word name")]
#[test_case(":"; "definition without a name")]
#[test_case(": foo if 1 ; then"; "semicolon inside a conditional")]
#[test_case("1 )"; "stray close paren")]
fn compile_fails(code: &str) {
    assert!(compile_source("<test>", code).is_err());
}

fn nested_ifs(depth: usize) -> String {
    format!("{}1 .{}", "1 if ".repeat(depth), " then".repeat(depth))
}

#[test]
fn nesting_up_to_the_limit_compiles() {
    let words = compile_source("<test>", &nested_ifs(MAX_NESTING)).unwrap();

    // Each level is a push and a conditional jump, then the innermost push, print and the return.
    assert_eq!(words[0].ops.len(), MAX_NESTING * 2 + 3);
}

#[test]
fn nesting_past_the_limit_is_an_error() {
    assert!(compile_source("<test>", &nested_ifs(MAX_NESTING + 1)).is_err());
    assert!(compile_source("<test>", &nested_ifs(20_000)).is_err());
}
