use super::ZipOrAccumulate as ZipOrAccumulateTrait;
use crate::accumulator::{Collect, Fold};
use crate::report::{AggregateError, Report};

macro_rules! impl_zip_or_accumulate_tuple {
    ($mod_name:ident $(($B:ident $T:ident $value:ident))+) => {
        mod $mod_name {
            use crate::accumulator::Accumulator;
            use crate::report::Report;

            pub(super) fn run<E, A, $($B, $T),+>(
                ($($value,)+): ($($B,)+),
                mut acc: A,
            ) -> Result<($($T,)+), A::Error>
            where
                A: Accumulator<E>,
                $($B: FnOnce() -> Result<$T, Report<E>>,)+
            {
                // Every branch runs, regardless of earlier branches' outcomes.
                $(
                    let $value = match $value() {
                        Ok(value) => Some(value),
                        Err(report) => {
                            acc.push(report);
                            None
                        }
                    };
                )+

                match acc.finish() {
                    Some(error) => Err(error),
                    // No reports were pushed, so every branch succeeded.
                    None => Ok(($($value.unwrap(),)+)),
                }
            }
        }

        impl<E, $($B, $T),+> ZipOrAccumulateTrait for ($($B,)+)
        where
            $($B: FnOnce() -> Result<$T, Report<E>>,)+
        {
            type Value = ($($T,)+);
            type Error = E;

            fn zip_or_accumulate(self) -> Result<Self::Value, AggregateError<E>> {
                $mod_name::run(self, Collect::new())
            }

            fn zip_or_reduce<C>(self, combine: C) -> Result<Self::Value, E>
            where
                C: FnMut(E, E) -> E,
            {
                $mod_name::run(self, Fold::new(combine))
            }
        }
    };
}

impl_zip_or_accumulate_tuple! { zip_2 (B0 T0 b0) (B1 T1 b1) }
impl_zip_or_accumulate_tuple! { zip_3 (B0 T0 b0) (B1 T1 b1) (B2 T2 b2) }
impl_zip_or_accumulate_tuple! { zip_4 (B0 T0 b0) (B1 T1 b1) (B2 T2 b2) (B3 T3 b3) }
impl_zip_or_accumulate_tuple! { zip_5 (B0 T0 b0) (B1 T1 b1) (B2 T2 b2) (B3 T3 b3) (B4 T4 b4) }
impl_zip_or_accumulate_tuple! { zip_6 (B0 T0 b0) (B1 T1 b1) (B2 T2 b2) (B3 T3 b3) (B4 T4 b4) (B5 T5 b5) }
impl_zip_or_accumulate_tuple! { zip_7 (B0 T0 b0) (B1 T1 b1) (B2 T2 b2) (B3 T3 b3) (B4 T4 b4) (B5 T5 b5) (B6 T6 b6) }
impl_zip_or_accumulate_tuple! { zip_8 (B0 T0 b0) (B1 T1 b1) (B2 T2 b2) (B3 T3 b3) (B4 T4 b4) (B5 T5 b5) (B6 T6 b6) (B7 T7 b7) }
impl_zip_or_accumulate_tuple! { zip_9 (B0 T0 b0) (B1 T1 b1) (B2 T2 b2) (B3 T3 b3) (B4 T4 b4) (B5 T5 b5) (B6 T6 b6) (B7 T7 b7) (B8 T8 b8) }

#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::report::{AggregateError, Report};

    fn ok(n: u32) -> Result<u32, Report<&'static str>> {
        Ok(n)
    }

    fn fail(msg: &'static str) -> Result<u32, Report<&'static str>> {
        Err(Report::One(msg))
    }

    #[test]
    fn all_ok() {
        let res = (|| ok(1), || ok(2), || ok(3)).zip_or_accumulate();
        assert_eq!(res.unwrap(), (1, 2, 3));
    }

    #[test]
    fn heterogeneous_values() {
        let res = (
            || Ok::<_, Report<&str>>(1u8),
            || Ok::<_, Report<&str>>("hello"),
        )
            .zip_or_accumulate();
        assert_eq!(res.unwrap(), (1, "hello"));
    }

    #[test]
    fn collects_every_failure_in_branch_order() {
        let res = (
            || fail("first"),
            || ok(2),
            || fail("third"),
            || fail("fourth"),
        )
            .zip_or_accumulate();
        let err = res.unwrap_err();
        assert_eq!(err.into_vec(), vec!["first", "third", "fourth"]);
    }

    #[test]
    fn later_branches_run_after_a_failure() {
        let ran = std::cell::RefCell::new(Vec::new());
        let res = (
            || {
                ran.borrow_mut().push(0);
                fail("nope")
            },
            || {
                ran.borrow_mut().push(1);
                ok(1)
            },
        )
            .zip_or_accumulate();
        assert!(res.is_err());
        assert_eq!(ran.into_inner(), vec![0, 1]);
    }

    #[test]
    fn reduce_folds_every_failure() {
        let res = (
            || Err::<u32, _>(Report::One(1)),
            || Err::<u32, _>(Report::One(1)),
            || Err::<u32, _>(Report::One(1)),
            || Err::<u32, _>(Report::One(1)),
            || Err::<u32, _>(Report::One(1)),
        )
            .zip_or_reduce(|a, b| a + b);
        assert_eq!(res.unwrap_err(), 5);
    }

    #[test]
    fn nested_batches_are_forwarded() {
        let inner: Result<Vec<u32>, AggregateError<&str>> =
            vec![Err("a"), Err("b")].collect_or_accumulate();
        let res = (
            || fail("x"),
            move || -> Result<Vec<u32>, Report<&'static str>> {
                Ok(inner.map_err(Report::Many)?)
            },
        )
            .zip_or_accumulate();
        assert_eq!(res.unwrap_err().into_vec(), vec!["x", "a", "b"]);
    }

    #[test]
    fn nine_branches() {
        let res = (
            || ok(1),
            || ok(2),
            || ok(3),
            || ok(4),
            || ok(5),
            || ok(6),
            || ok(7),
            || ok(8),
            || ok(9),
        )
            .zip_or_accumulate();
        assert_eq!(res.unwrap(), (1, 2, 3, 4, 5, 6, 7, 8, 9));
    }
}
