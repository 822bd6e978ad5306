//! Property tests over the matcher/generator composition model.

use accord_consumer::combinator::flatten;
use accord_consumer::generator::Generator;
use accord_consumer::matcher::{HttpStatusClass, Matcher};
use accord_consumer::term::Term;
use proptest::prelude::*;

fn status_class() -> impl Strategy<Value = HttpStatusClass> {
    prop::sample::select(HttpStatusClass::ALL.to_vec())
}

proptest! {
    #[test]
    fn at_least_like_serves_exactly_min_copies(min in 0usize..8) {
        let term = Term::from(Matcher::at_least_like("item", min));
        let flat = flatten(&term, "$").unwrap();
        prop_assert_eq!(flat.value.as_array().unwrap().len(), min);
    }

    #[test]
    fn constrained_array_serves_exactly_min_copies(min in 0usize..6, extra in 0usize..6) {
        let max = min + extra;
        let term = Term::from(Matcher::constrained_array_like("item", min, max).unwrap());
        let flat = flatten(&term, "$").unwrap();
        prop_assert_eq!(flat.value.as_array().unwrap().len(), min);
    }

    #[test]
    fn generated_status_always_falls_within_its_class(class in status_class()) {
        let matcher = Matcher::status_code(class, None);
        let term = Term::from(matcher);
        let flat = flatten(&term, "$").unwrap();
        let status = flat.value.as_i64().unwrap();
        let (min, max) = class.bounds();
        prop_assert!((min as i64..=max as i64).contains(&status));
    }

    #[test]
    fn random_int_generator_respects_arbitrary_bounds(min in -1000i64..1000, span in 0i64..1000) {
        let generator = Generator::RandomInt { min, max: min + span };
        let value = generator.generate().unwrap().as_i64().unwrap();
        prop_assert!((min..=min + span).contains(&value));
    }

    #[test]
    fn flattening_is_path_stable(min in 1usize..5, key in "[a-z]{1,8}") {
        let term = Term::object([(
            key.as_str(),
            Term::from(Matcher::at_least_like(
                Term::object([("id", Term::from(Matcher::like(1i64)))]),
                min,
            )),
        )]);
        let first = flatten(&term, "$.body").unwrap();
        let second = flatten(&term, "$.body").unwrap();
        prop_assert_eq!(first.rules, second.rules);
        prop_assert_eq!(first.generators, second.generators);
        prop_assert_eq!(first.value, second.value);
    }

    #[test]
    fn rule_entries_address_every_nested_matcher(min in 1usize..4) {
        let element = Term::object([("name", Term::from(Matcher::like("x")))]);
        let term = Term::object([("items", Term::from(Matcher::at_least_like(element, min)))]);
        let flat = flatten(&term, "$.body").unwrap();

        let paths: Vec<&str> = flat.rules.iter().map(|r| r.path.as_str()).collect();
        prop_assert_eq!(paths, vec!["$.body.items", "$.body.items[*].name"]);
    }
}

#[test]
fn every_status_class_parses_back_from_its_tag() {
    for class in HttpStatusClass::ALL {
        assert_eq!(class.as_str().parse::<HttpStatusClass>().unwrap(), class);
    }
}
