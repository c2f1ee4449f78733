use clox::{InterpretError, Vm, VmConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Expr {
    Num(String),
    Neg(Box<Expr>),
    Bin(Box<Expr>, char, Box<Expr>),
}

impl Expr {
    fn source(&self) -> String {
        match self {
            Expr::Num(text) => text.clone(),
            Expr::Neg(inner) => format!("-{}", inner.source()),
            Expr::Bin(l, op, r) => format!("({} {} {})", l.source(), op, r.source()),
        }
    }

    fn eval(&self) -> f64 {
        match self {
            Expr::Num(text) => parse(text),
            Expr::Neg(inner) => -inner.eval(),
            Expr::Bin(l, op, r) => apply(l.eval(), *op, r.eval()),
        }
    }
}

fn parse(text: &str) -> f64 {
    text.parse().unwrap()
}

fn apply(a: f64, op: char, b: f64) -> f64 {
    match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        other => panic!("unknown operator {}", other),
    }
}

fn literal() -> impl Strategy<Value = String> {
    (0u32..1000, proptest::option::of(0u32..1000)).prop_map(|(whole, frac)| match frac {
        Some(frac) => format!("{}.{}", whole, frac),
        None => whole.to_string(),
    })
}

fn operator() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['+', '-', '*', '/'])
}

fn expr() -> impl Strategy<Value = Expr> {
    literal()
        .prop_map(Expr::Num)
        .prop_recursive(5, 48, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(|e| Expr::Neg(Box::new(e))),
                (inner.clone(), operator(), inner)
                    .prop_map(|(l, op, r)| Expr::Bin(Box::new(l), op, Box::new(r))),
            ]
        })
}

fn run(source: &str) -> Result<String, InterpretError> {
    let mut vm = Vm::with_output(VmConfig::default(), Vec::new());
    vm.interpret(source)?;
    Ok(String::from_utf8(vm.into_output()).unwrap())
}

/// Evaluates `first (op second)*` with `*` and `/` binding tighter than
/// `+` and `-`, everything left to right.
fn eval_flat(first: f64, rest: &[(char, f64)]) -> f64 {
    let mut total: Option<f64> = None;
    let mut pending = '+';
    let mut term = first;

    for &(op, value) in rest {
        match op {
            '*' | '/' => term = apply(term, op, value),
            _ => {
                total = Some(match total {
                    Some(acc) => apply(acc, pending, term),
                    None => term,
                });
                pending = op;
                term = value;
            }
        }
    }

    match total {
        Some(acc) => apply(acc, pending, term),
        None => term,
    }
}

proptest! {
    #[test]
    fn nested_expressions_match_f64(e in expr()) {
        let out = run(&e.source()).unwrap();
        prop_assert_eq!(out, format!("{}\n", e.eval()));
    }

    #[test]
    fn flat_expressions_follow_precedence(
        first in (any::<bool>(), literal()),
        rest in prop::collection::vec((operator(), any::<bool>(), literal()), 0..24),
    ) {
        let signed = |negate: bool, text: &str| {
            let value = parse(text);
            let source = if negate { format!("-{}", text) } else { text.to_string() };
            (source, if negate { -value } else { value })
        };

        let (mut source, first_value) = signed(first.0, &first.1);
        let mut values = Vec::new();
        for (op, negate, text) in &rest {
            let (lit, value) = signed(*negate, text);
            source.push_str(&format!(" {} {}", op, lit));
            values.push((*op, value));
        }

        let out = run(&source).unwrap();
        prop_assert_eq!(out, format!("{}\n", eval_flat(first_value, &values)));
    }
}

#[test]
fn operator_alone_is_a_compile_error() {
    let err = run("+").unwrap_err();
    assert_eq!(err.exit_code(), clox::exit_code::COMPILE_ERROR);
    assert_eq!(
        err.to_string(),
        "[line 1] Error at '+': Expected expression."
    );
}

#[test]
fn three_hundred_literals_sum() {
    let source = (0..300)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" + ");
    assert_eq!(run(&source).unwrap(), "44850\n");
}
