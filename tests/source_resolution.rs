//! Resolution of every source kind into ordered argument sets.

mod common;

use argsource::{
    arguments, resolve, ArgumentSet, ArgumentSource, EngineError, EnumType, ErrorType,
    NumericRange, ParamType, Signature, TabularSource, Value,
};
use common::{chrono_unit, ints, string_and_int, strings};

fn collect(source: &ArgumentSource, signature: &Signature) -> Vec<ArgumentSet> {
    resolve(source, signature).unwrap().collect()
}

fn firsts(sets: &[ArgumentSet]) -> Vec<Value> {
    sets.iter().map(|s| s.values()[0].clone()).collect()
}

#[cfg(test)]
mod literal_sources {
    use super::*;

    #[test]
    fn literal_yields_one_set_per_value_in_order() {
        let values = ["racecar", "radar", "able was I ere I saw elba", "11"];
        let sets = collect(&ArgumentSource::values(values), &strings());
        assert_eq!(sets.len(), values.len());
        for (set, expected) in sets.iter().zip(values) {
            assert_eq!(set.values(), &[Value::from(expected)]);
        }
    }

    #[test]
    fn literal_keeps_duplicates() {
        let sets = collect(&ArgumentSource::values(["a", "a", "b"]), &strings());
        assert_eq!(firsts(&sets), vec![Value::from("a"), Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn empty_literal_is_valid_and_yields_nothing() {
        let sets = collect(&ArgumentSource::Literal(vec![]), &strings());
        assert!(sets.is_empty());
    }

    #[test]
    fn repeated_resolution_is_deterministic() {
        let source = ArgumentSource::values(["x", "y", "z"]);
        assert_eq!(collect(&source, &strings()), collect(&source, &strings()));
    }
}

#[cfg(test)]
mod marker_sources {
    use super::*;

    #[test]
    fn null_and_empty_precede_explicit_values() {
        let source = ArgumentSource::values([" ", "   ", "\t", "\n"]).with_null_and_empty();
        let sets = collect(&source, &strings());
        assert_eq!(
            firsts(&sets),
            vec![
                Value::Null,
                Value::from(""),
                Value::from(" "),
                Value::from("   "),
                Value::from("\t"),
                Value::from("\n"),
            ]
        );
    }

    #[test]
    fn markers_are_hoisted_regardless_of_declaration_order() {
        let source = ArgumentSource::values(["x"])
            .and(ArgumentSource::EmptyMarker)
            .and(ArgumentSource::NullMarker);
        let sets = collect(&source, &strings());
        assert_eq!(firsts(&sets), vec![Value::Null, Value::from(""), Value::from("x")]);
    }

    #[test]
    fn markers_inside_nested_combinations_are_hoisted() {
        let source = ArgumentSource::Combined(vec![
            ArgumentSource::values(["x"]),
            ArgumentSource::Combined(vec![ArgumentSource::NullAndEmptyMarker]),
        ]);
        let sets = collect(&source, &strings());
        assert_eq!(firsts(&sets), vec![Value::Null, Value::from(""), Value::from("x")]);
    }

    #[test]
    fn overlapping_explicit_values_are_not_deduplicated() {
        let source = ArgumentSource::values([""]).with_null_and_empty();
        let sets = collect(&source, &strings());
        assert_eq!(firsts(&sets), vec![Value::Null, Value::from(""), Value::from("")]);
    }

    #[test]
    fn empty_marker_needs_a_single_string_or_list_parameter() {
        let err = resolve(&ArgumentSource::NullAndEmptyMarker, &string_and_int())
            .err()
            .unwrap();
        assert_eq!(err.error_type(), ErrorType::Configuration);
    }
}

#[cfg(test)]
mod enum_sources {
    use super::*;
    use common::ChronoUnit;
    use strum::IntoEnumIterator;

    #[test]
    fn enum_range_yields_every_constant_in_declaration_order() {
        let ty = chrono_unit();
        let sets = collect(&ArgumentSource::enum_of(ty.clone()), &Signature::new([ParamType::Enum(ty)]));
        let names: Vec<String> = sets.iter().map(|s| s.values()[0].to_string()).collect();
        let expected: Vec<String> = ChronoUnit::iter()
            .map(|u| <&'static str>::from(u).to_string())
            .collect();
        assert_eq!(names, expected);
        assert_eq!(names.first().map(String::as_str), Some("NANOS"));
        assert_eq!(names.last().map(String::as_str), Some("FOREVER"));
        assert!(sets.iter().all(|s| !s.values()[0].is_null()));
    }

    #[test]
    fn enum_type_is_inferred_from_the_sole_parameter() {
        let sig = Signature::new([ParamType::Enum(chrono_unit())]);
        let inferred = collect(&ArgumentSource::inferred_enum(), &sig);
        let explicit = collect(&ArgumentSource::enum_of(chrono_unit()), &sig);
        assert_eq!(inferred.len(), 16);
        assert_eq!(inferred, explicit);
    }

    #[test]
    fn inference_fails_for_non_enum_or_ambiguous_signatures() {
        for sig in [strings(), string_and_int(), Signature::default()] {
            let err = resolve(&ArgumentSource::inferred_enum(), &sig).err().unwrap();
            assert!(matches!(err, EngineError::Configuration { .. }), "{sig}");
        }
    }

    #[test]
    fn repeated_enum_resolution_is_deterministic() {
        let source = ArgumentSource::enum_of(chrono_unit());
        let sig = Signature::new([ParamType::Enum(chrono_unit())]);
        let first = collect(&source, &sig);
        assert_eq!(first.len(), 16);
        assert_eq!(first, collect(&source, &sig));
    }

    #[test]
    fn explicit_enum_must_match_an_enum_parameter() {
        let other = EnumType::new("Color", ["RED"]);
        let sig = Signature::new([ParamType::Enum(chrono_unit())]);
        assert!(resolve(&ArgumentSource::enum_of(other), &sig).is_err());
    }
}

#[cfg(test)]
mod numeric_sources {
    use super::*;

    #[test]
    fn skip_drops_the_first_generated_values() {
        let source = ArgumentSource::NumericRange(NumericRange::new(0, 20).skip(10));
        let sets = collect(&source, &ints());
        let values: Vec<i64> = sets.iter().map(|s| s.get::<i64>(0).unwrap()).collect();
        assert_eq!(values, (10..20).collect::<Vec<_>>());
        assert!(!values.contains(&9));
    }

    #[test]
    fn skip_is_applied_after_stepping() {
        let source = ArgumentSource::NumericRange(NumericRange::new(0, 20).step(5).skip(1));
        let values: Vec<i64> = collect(&source, &ints())
            .iter()
            .map(|s| s.get::<i64>(0).unwrap())
            .collect();
        assert_eq!(values, vec![5, 10, 15]);
    }

    #[test]
    fn skipping_past_the_end_yields_nothing() {
        let source = ArgumentSource::NumericRange(NumericRange::new(0, 3).skip(10));
        assert!(collect(&source, &ints()).is_empty());
    }
}

#[cfg(test)]
mod tabular_sources {
    use super::*;

    #[test]
    fn quoted_and_grouped_fields_parse_to_typed_values() {
        let source = ArgumentSource::csv([
            "apple,         1",
            "banana,        2",
            "'lemon, lime', 0xF1",
            "strawberry,    700_000",
        ]);
        let sets = collect(&source, &string_and_int());
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[2], arguments!("lemon, lime", 241));
        assert_eq!(sets[3], arguments!("strawberry", 700_000));
    }

    #[test]
    fn malformed_number_fails_resolution_with_location() {
        let err = resolve(&ArgumentSource::csv(["banana,notanumber"]), &string_and_int())
            .err()
            .unwrap();
        assert_eq!(err.error_type(), ErrorType::ArgumentParse);
        assert!(matches!(err, EngineError::ArgumentParse { row: 1, column: 2, .. }));
    }

    #[test]
    fn file_source_skips_the_header_row() {
        let source = ArgumentSource::Tabular(
            TabularSource::file("tests/fixtures/two-column.csv").skip_rows(1),
        );
        let sets = collect(&source, &string_and_int());
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[0], arguments!("Sweden", 1));
        assert_eq!(sets[2], arguments!("United States of America", 3));
        assert_eq!(sets[3], arguments!("France", 700_000));
        assert!(sets.iter().all(|s| s.names().is_none()));
    }

    #[test]
    fn header_names_are_metadata_only() {
        let source = ArgumentSource::Tabular(
            TabularSource::file("tests/fixtures/two-column.csv").with_headers(),
        );
        let sets = collect(&source, &string_and_int());
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[0].len(), 2);
        assert_eq!(sets[0].names(), Some(&["Country".to_string(), "reference".to_string()][..]));
        assert_eq!(sets[0].values(), arguments!("Sweden", 1).values());
        assert_eq!(sets[0].to_string(), "Country = Sweden, reference = 1");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = ArgumentSource::Tabular(TabularSource::file("tests/fixtures/missing.csv"));
        let err = resolve(&source, &string_and_int()).err().unwrap();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}

#[cfg(test)]
mod provider_sources {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn provider_output_is_yielded_unchanged() {
        let source = ArgumentSource::provider("stringIntAndListProvider", || {
            vec![
                arguments!("apple", 1, vec!["a", "b"]),
                arguments!("lemon", 2, vec!["x", "y"]),
            ]
        });
        let sig = Signature::new([
            ParamType::Str,
            ParamType::Int,
            ParamType::list_of(ParamType::Str),
        ]);
        let sets = collect(&source, &sig);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0], arguments!("apple", 1, vec!["a", "b"]));
        assert_eq!(sets[1], arguments!("lemon", 2, vec!["x", "y"]));
    }

    #[test]
    fn each_resolution_invokes_the_provider_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let source = ArgumentSource::provider("counting", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ["111", "banana"].map(|s| arguments!(s))
        });
        assert_eq!(collect(&source, &strings()).len(), 2);
        assert_eq!(collect(&source, &strings()).len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn provider_is_lazy() {
        let source = ArgumentSource::provider("naturals", || (0_i64..).map(|n| arguments!(n)));
        let first: Vec<ArgumentSet> = resolve(&source, &ints()).unwrap().take(3).collect();
        assert_eq!(first, vec![arguments!(0_i64), arguments!(1_i64), arguments!(2_i64)]);
    }
}
