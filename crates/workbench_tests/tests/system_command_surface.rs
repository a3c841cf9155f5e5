//! Drives the `workbench-system` command/query surface the way the headless
//! driver would: build a tiny metamodel through `Command`s, then query it
//! back, checking that every response carries the expected post-state.

use workbench_kernel::{Constructor, ConstructorArg, JudgmentArg, Pattern, Sort, Term};
use workbench_system::{Command, CommandResult, Workbench};

fn expect_sort_id(result: CommandResult) -> workbench_base::Id<Sort> {
    match result {
        CommandResult::SortId(id) => id,
        other => panic!("expected SortId, got {:?}", other),
    }
}

#[test]
fn building_a_metamodel_through_commands_matches_direct_construction() {
    let mut workbench = Workbench::new(10, 3, Some(42));

    let nat_id = expect_sort_id(
        workbench.execute(Command::CreateSort { sort: Sort::new_inductive("Nat") }).unwrap().result,
    );

    let zero = workbench
        .execute(Command::CreateConstructor { constructor: Constructor::nullary(nat_id.clone(), "Z") })
        .unwrap();
    let zero_id = match zero.result {
        CommandResult::ConstructorId(id) => id,
        other => panic!("expected ConstructorId, got {:?}", other),
    };

    let succ = workbench
        .execute(Command::CreateConstructor {
            constructor: Constructor::new(nat_id.clone(), "S", vec![ConstructorArg::new(nat_id.clone()).with_label("n")]),
        })
        .unwrap();
    let succ_id = match succ.result {
        CommandResult::ConstructorId(id) => id,
        other => panic!("expected ConstructorId, got {:?}", other),
    };

    // The post-state snapshot on every response reflects every prior edit.
    assert_eq!(succ.state.metamodel.sorts().count(), 1);
    assert_eq!(succ.state.metamodel.constructor(&zero_id).unwrap().name, "Z");
    assert_eq!(succ.state.metamodel.constructor(&succ_id).unwrap().name, "S");

    let even_id = {
        let response = workbench
            .execute(Command::CreateJudgment {
                name: "even".into(),
                symbol: "even".into(),
                arg_sorts: vec![JudgmentArg { sort_id: nat_id.clone(), label: "n".into() }],
                separators: vec!["".into(), " even".into()],
            })
            .unwrap();
        match response.result {
            CommandResult::JudgmentId(id) => id,
            other => panic!("expected JudgmentId, got {:?}", other),
        }
    };

    let zero_term = Term::construct(zero_id.clone(), vec![]);
    let e_zero = workbench
        .execute(Command::CreateRule {
            name: "E-Zero".into(),
            conclusion: workbench_kernel::JudgmentInstance::new(
                even_id.clone(),
                vec![Pattern::Construct { constructor_id: zero_id.clone(), args: vec![] }],
            ),
        })
        .unwrap();
    assert!(matches!(e_zero.result, CommandResult::RuleId(_)));

    // `Z even` now derives with zero premises.
    let derived = workbench.execute(Command::Derive { judgment_id: even_id.clone(), terms: vec![zero_term] }).unwrap();
    match derived.result {
        CommandResult::Derivation(Some(derivation)) => {
            assert_eq!(derivation.rule_name, "E-Zero");
            assert!(derivation.premises.is_empty());
        }
        other => panic!("expected a successful Derivation, got {:?}", other),
    }

    // Deleting the sort cascades to both constructors, visible in the next
    // response's post-state.
    let after_delete = workbench.execute(Command::DeleteSort { id: nat_id }).unwrap();
    assert!(after_delete.state.metamodel.constructor(&zero_id).is_none());
    assert!(after_delete.state.metamodel.constructor(&succ_id).is_none());
}

#[test]
fn unknown_property_id_surfaces_as_a_not_found_error() {
    let mut workbench = Workbench::new(10, 3, Some(7));
    let bogus: workbench_base::Id<workbench_proof::Property> = workbench_base::Id::fresh();
    let err = workbench.execute(Command::StartProof { property_id: bogus }).unwrap_err();
    assert!(matches!(err, workbench_system::SystemError::NotFound { kind: "Property", .. }));
}
