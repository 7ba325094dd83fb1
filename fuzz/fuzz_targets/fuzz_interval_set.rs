#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use atnkit::{Error, IntervalSet};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    AddOne(i8),
    AddRange(i8, i8),
    Remove(i8),
    Union(Vec<i8>),
    Subtract(Vec<i8>),
    Freeze,
}

fn assert_normalized(set: &IntervalSet) {
    for pair in set.intervals().windows(2) {
        assert!(pair[0].start <= pair[0].stop);
        // disjoint and not adjacent
        assert!(pair[0].stop + 1 < pair[1].start, "{set:?}");
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut set = IntervalSet::new();
    let mut model = BTreeSet::new();

    for op in ops {
        let result = match op {
            Op::AddOne(v) => set.add_one(v.into()).map(|()| {
                model.insert(i32::from(v));
            }),
            Op::AddRange(a, b) => set.add_range(a.into(), b.into()).map(|()| {
                model.extend(i32::from(a)..=i32::from(b));
            }),
            Op::Remove(v) => set.remove_one(v.into()).map(|()| {
                model.remove(&i32::from(v));
            }),
            Op::Union(values) => {
                let other = values.iter().map(|&v| i32::from(v)).collect::<IntervalSet>();
                let joined = set.union(&other);
                model.extend(values.iter().map(|&v| i32::from(v)));
                set = joined;
                Ok(())
            }
            Op::Subtract(values) => {
                let other = values.iter().map(|&v| i32::from(v)).collect::<IntervalSet>();
                let rest = set.subtract(&other);
                for v in values {
                    model.remove(&i32::from(v));
                }
                set = rest;
                Ok(())
            }
            Op::Freeze => {
                set.freeze();
                Ok(())
            }
        };

        if let Err(err) = result {
            assert_eq!(err, Error::FrozenSetMutation);
            assert!(set.is_read_only());
        }
        assert_normalized(&set);
        assert!(set.iter().eq(model.iter().copied()));
    }
});
