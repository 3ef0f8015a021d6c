use ast::{DataFamily, Ident, PackageName, TypeRef};
use ir::*;

fn normalized(exp: Exp) -> Exp {
    exp.normalize(&mut RewriteBudget::default()).unwrap()
}

fn external(name: &str, typ: &str) -> Exp {
    Exp::ExternalVar(ExternalVar {
        pack: PackageName::from_string("P"),
        name: Ident::from_string(name),
        typ: TypeRef::from_string(typ),
    })
}

#[test]
fn identity_applied_to_a_literal() {
    let exp = Exp::app(Exp::lambda(Exp::var(0)), Exp::int(42));
    assert_eq!(normalized(exp), Exp::int(42));
}

#[test]
fn eta_reduction_of_a_closed_function() {
    let f = external("f", "Int -> Int");
    let exp = Exp::lambda(Exp::app(f.clone(), Exp::var(0)));
    assert_eq!(normalized(exp), f);
}

#[test]
fn match_on_a_known_constructor() {
    let exp = Exp::Match(Match {
        on_exp: Box::new(Exp::nil()),
        cases: vec![
            Case {
                pattern: Pattern::Struct { tag: Some(0), params: vec![], family: DataFamily::Enum },
                body: Exp::int(1),
            },
            Case { pattern: Pattern::WildCard, body: Exp::int(2) },
        ],
    });
    assert_eq!(normalized(exp), Exp::int(1));
}

#[test]
fn match_on_an_opaque_scrutinee_is_left_alone() {
    let exp = Exp::lambda(Exp::Match(Match {
        on_exp: Box::new(Exp::var(0)),
        cases: vec![
            Case {
                pattern: Pattern::Struct { tag: Some(0), params: vec![], family: DataFamily::Enum },
                body: Exp::int(1),
            },
            Case { pattern: Pattern::WildCard, body: Exp::int(2) },
        ],
    }));
    assert_eq!(normalized(exp.clone()), exp);
}

#[test]
fn a_reduced_scrutinee_reenables_the_match() {
    // The scrutinee is an identity redex around nil; only after the child
    // normalizes does the match fire.
    let exp = Exp::Match(Match {
        on_exp: Box::new(Exp::app(Exp::lambda(Exp::var(0)), Exp::nil())),
        cases: vec![
            Case {
                pattern: Pattern::Struct { tag: Some(0), params: vec![], family: DataFamily::Enum },
                body: Exp::int(1),
            },
            Case { pattern: Pattern::WildCard, body: Exp::int(2) },
        ],
    });
    assert_eq!(normalized(exp), Exp::int(1));
}

#[test]
fn match_binding_applies_slots_through_betas() {
    // match [10, 20, 30] { [x, *rest] => x } picks out the head.
    let pattern = Pattern::list(vec![
        ListPart::Item(Pattern::Var(0)),
        ListPart::Splice(Some(1)),
    ])
    .unwrap();
    let exp = Exp::Match(Match {
        on_exp: Box::new(Exp::list([Exp::int(10), Exp::int(20), Exp::int(30)])),
        cases: vec![Case {
            pattern,
            // Two slots, so two lambda wrappers; the body projects slot 0.
            body: Exp::lambda(Exp::lambda(Exp::var(0))),
        }],
    });
    assert_eq!(normalized(exp), Exp::int(10));
}

#[test]
fn fixpoint_unfolds_when_the_self_reference_is_unused() {
    let exp = Exp::Recursion(Recursion { inner: Box::new(Exp::lambda(Exp::int(7))) });
    assert_eq!(normalized(exp), Exp::int(7));
}

#[test]
fn fixpoint_with_a_used_self_reference_stays() {
    let exp = Exp::Recursion(Recursion {
        inner: Box::new(Exp::lambda(Exp::app(Exp::var(0), Exp::int(1)))),
    });
    assert_eq!(normalized(exp.clone()), exp);
}

#[test]
fn applying_a_synthesized_constructor_fills_the_struct() {
    // The constructor term for tag 3 of arity 2.
    let ctor = Exp::lambda(Exp::lambda(Exp::Struct(Struct {
        tag: 3,
        args: vec![Exp::var(1), Exp::var(0)],
        family: DataFamily::Enum,
    })));
    let exp = Exp::app(Exp::app(ctor, Exp::int(1)), Exp::int(2));
    assert_eq!(
        normalized(exp),
        Exp::Struct(Struct {
            tag: 3,
            args: vec![Exp::int(1), Exp::int(2)],
            family: DataFamily::Enum,
        })
    );
}

#[test]
fn normalization_is_idempotent() {
    let samples = vec![
        Exp::app(Exp::lambda(Exp::var(0)), Exp::int(42)),
        Exp::lambda(Exp::app(external("f", "Int -> Int"), Exp::var(0))),
        Exp::lambda(Exp::Match(Match {
            on_exp: Box::new(Exp::var(0)),
            cases: vec![Case { pattern: Pattern::WildCard, body: Exp::str("s") }],
        })),
        Exp::Recursion(Recursion {
            inner: Box::new(Exp::lambda(Exp::app(Exp::var(0), Exp::int(1)))),
        }),
        Exp::list([Exp::int(1), Exp::int(2), Exp::int(3)]),
    ];
    for exp in samples {
        let once = normalized(exp);
        let twice = normalized(once.clone());
        assert_eq!(once, twice);
    }
}

#[test]
fn normal_forms_have_no_free_vars_at_the_top_level() {
    let exp = Exp::app(
        Exp::lambda(Exp::lambda(Exp::app(Exp::var(1), Exp::var(0)))),
        external("f", "Int -> Int"),
    );
    let nf = normalized(exp);
    assert!(nf.var_set().is_empty());
}
