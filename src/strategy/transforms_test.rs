use super::pipeline::{StageContext, StageResult};
use super::transforms;
use crate::adapters::document::{Element, FormDocument};
use crate::adapters::faker::FakerSource;
use crate::domain::options::{ALLOW_MULTIPLE, COUNT};
use crate::domain::{FillOptions, Generator, Target, TargetKind};
use serde_json::{json, Value};

fn checkboxes(checked: Option<&str>) -> FormDocument {
    let mut elements = vec![
        Element::checkbox("field", "a"),
        Element::checkbox("field", "b"),
        Element::checkbox("field", "c"),
    ];
    if let Some(value) = checked {
        for element in elements.iter_mut() {
            element.checked = element.value.as_deref() == Some(value);
        }
    }
    FormDocument::new(elements)
}

fn with_ctx<R>(
    target: &dyn Target,
    options: &FillOptions,
    seed: u64,
    f: impl FnOnce(&StageContext<'_>) -> R,
) -> R {
    let source = FakerSource::seeded(seed);
    let ctx = StageContext {
        target,
        options,
        source: &source,
        kind: TargetKind::Checkbox,
    };
    f(&ctx)
}

#[test]
fn test_pick_from_values_uses_candidates() {
    let mut doc = checkboxes(None);
    let target = doc.target_at(0).unwrap();
    let options = FillOptions::defaults();
    with_ctx(&target, &options, 1, |ctx| {
        let StageResult::Value(generator) = transforms::pick_from_values(ctx).unwrap() else {
            panic!("expected a generator");
        };
        for _ in 0..20 {
            let value = generator.generate(ctx.source).unwrap();
            assert!(["a", "b", "c"].contains(&value.as_str().unwrap()));
        }
    });
}

#[test]
fn test_pick_from_values_without_candidates() {
    let mut doc = FormDocument::new(vec![Element::select("empty", &[], false)]);
    let target = doc.target_at(0).unwrap();
    let options = FillOptions::defaults();
    with_ctx(&target, &options, 1, |ctx| {
        assert!(matches!(transforms::pick_from_values(ctx).unwrap(), StageResult::NoValue));
    });
}

#[test]
fn test_skip_if_has_value() {
    let options = FillOptions::defaults();
    let generator = Generator::constant(json!("a"));

    let mut empty = checkboxes(None);
    let target = empty.target_at(0).unwrap();
    with_ctx(&target, &options, 1, |ctx| {
        let result = transforms::skip_if_has_value(ctx, &generator).unwrap();
        assert!(matches!(result, StageResult::PassThrough));
    });

    let mut filled = checkboxes(Some("b"));
    let target = filled.target_at(0).unwrap();
    with_ctx(&target, &options, 1, |ctx| {
        let result = transforms::skip_if_has_value(ctx, &generator).unwrap();
        assert!(matches!(result, StageResult::NoValue));
    });
}

fn abc_pick() -> Generator {
    Generator::pick(vec![json!("a"), json!("b"), json!("c")])
}

#[test]
fn test_add_multiple_binds_count_to_pick() {
    let mut doc = checkboxes(None);
    let target = doc.target_at(0).unwrap();
    let options = FillOptions::defaults();
    with_ctx(&target, &options, 3, |ctx| {
        let StageResult::Value(bound) = transforms::add_multiple(ctx, &abc_pick()).unwrap() else {
            panic!("expected a generator");
        };
        let picked = bound.generate(ctx.source).unwrap();
        let count = picked.as_array().unwrap().len();
        assert!((1..=3).contains(&count));
    });
}

#[test]
fn test_add_multiple_respects_forced_count() {
    let mut doc = checkboxes(None);
    let target = doc.target_at(0).unwrap();
    let options = FillOptions::defaults().with(COUNT, 1);
    with_ctx(&target, &options, 3, |ctx| {
        let StageResult::Value(bound) = transforms::add_multiple(ctx, &abc_pick()).unwrap() else {
            panic!("expected a generator");
        };
        assert_eq!(bound.generate(ctx.source).unwrap().as_array().unwrap().len(), 1);
    });
}

#[test]
fn test_add_multiple_leaves_other_generators_alone() {
    let mut doc = checkboxes(None);
    let target = doc.target_at(0).unwrap();
    let options = FillOptions::defaults();
    let echo = Generator::new(|_, args| Ok(Value::Array(args.to_vec())));
    with_ctx(&target, &options, 3, |ctx| {
        let result = transforms::add_multiple(ctx, &echo).unwrap();
        assert!(matches!(result, StageResult::PassThrough));
    });
}

#[test]
fn test_add_multiple_with_zero_candidates() {
    let mut doc = FormDocument::new(vec![Element::select("empty", &[], true)]);
    let target = doc.target_at(0).unwrap();
    let options = FillOptions::defaults();
    let generator = Generator::pick(Vec::new());
    with_ctx(&target, &options, 3, |ctx| {
        assert!(matches!(transforms::add_multiple(ctx, &generator).unwrap(), StageResult::NoValue));
    });
}

#[test]
fn test_add_blank_mixes_in_blank_outcomes() {
    let mut doc = checkboxes(None);
    let target = doc.target_at(0).unwrap();
    let options = FillOptions::defaults().with(ALLOW_MULTIPLE, false);
    let generator = Generator::constant(json!("a"));
    with_ctx(&target, &options, 8, |ctx| {
        let StageResult::Value(blanking) = transforms::add_blank(ctx, &generator).unwrap() else {
            panic!("expected a generator");
        };
        let outcomes: Vec<Value> = (0..400).map(|_| blanking.generate(ctx.source).unwrap()).collect();
        assert!(outcomes.iter().any(Value::is_null));
        assert!(outcomes.iter().any(|v| v == &json!("a")));
    });
}
