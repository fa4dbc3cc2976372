use std::fmt::Debug;

use crate::engine::core::filter::DeleteMatch;
use crate::engine::core::index::BloomFilter;
use crate::engine::types::{Datum, FieldType};

/// Query predicate on one column, evaluated against block summaries.
///
/// Both evaluators answer "may any row of the block match?"; returning `false`
/// lets the pruner drop the block, so implementations must only return `false`
/// when that is certain.
pub trait ColumnPredicate: Send + Sync + Debug {
    fn eval_stats(&self, min: &Datum, max: &Datum) -> bool;
    /// `field_type` is the type of the column the filter was built over.
    fn eval_bloom(&self, bloom: &BloomFilter<'_>, field_type: FieldType) -> bool;
}

/// Delete predicate on one column, evaluated against a block's min/max.
pub trait DeletePredicate: Send + Sync + Debug {
    fn del_eval(&self, min: &Datum, max: &Datum) -> DeleteMatch;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompareOp {
    Eq(Datum),
    Ne(Datum),
    Lt(Datum),
    Le(Datum),
    Gt(Datum),
    Ge(Datum),
    In(Vec<Datum>),
    NotIn(Vec<Datum>),
    IsNull,
    IsNotNull,
}

/// A single comparison against a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Cond {
    pub op: CompareOp,
}

impl Cond {
    pub fn new(op: CompareOp) -> Self {
        Self { op }
    }

    pub fn equal(v: impl Into<Datum>) -> Self {
        Self::new(CompareOp::Eq(v.into()))
    }

    pub fn not_equal(v: impl Into<Datum>) -> Self {
        Self::new(CompareOp::Ne(v.into()))
    }

    pub fn less(v: impl Into<Datum>) -> Self {
        Self::new(CompareOp::Lt(v.into()))
    }

    pub fn less_eq(v: impl Into<Datum>) -> Self {
        Self::new(CompareOp::Le(v.into()))
    }

    pub fn greater(v: impl Into<Datum>) -> Self {
        Self::new(CompareOp::Gt(v.into()))
    }

    pub fn greater_eq(v: impl Into<Datum>) -> Self {
        Self::new(CompareOp::Ge(v.into()))
    }

    pub fn in_list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Datum>,
    {
        Self::new(CompareOp::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn not_in_list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Datum>,
    {
        Self::new(CompareOp::NotIn(values.into_iter().map(Into::into).collect()))
    }

    fn operand_is_null(&self) -> bool {
        match &self.op {
            CompareOp::Eq(v)
            | CompareOp::Ne(v)
            | CompareOp::Lt(v)
            | CompareOp::Le(v)
            | CompareOp::Gt(v)
            | CompareOp::Ge(v) => v.is_null(),
            CompareOp::In(_) | CompareOp::NotIn(_) | CompareOp::IsNull | CompareOp::IsNotNull => {
                false
            }
        }
    }

    fn in_range(v: &Datum, min: &Datum, max: &Datum) -> bool {
        !v.is_null() && min <= v && v <= max
    }
}

impl ColumnPredicate for Cond {
    fn eval_stats(&self, min: &Datum, max: &Datum) -> bool {
        // A null max means every row in the block is null.
        let all_null = max.is_null();
        match &self.op {
            CompareOp::IsNull => min.is_null(),
            CompareOp::IsNotNull => !all_null,
            _ if all_null || self.operand_is_null() => false,
            CompareOp::Eq(v) => Self::in_range(v, min, max),
            CompareOp::Ne(v) => !(min == v && max == v),
            CompareOp::Lt(v) => min < v,
            CompareOp::Le(v) => min <= v,
            CompareOp::Gt(v) => max > v,
            CompareOp::Ge(v) => max >= v,
            CompareOp::In(set) => set.iter().any(|v| Self::in_range(v, min, max)),
            CompareOp::NotIn(set) => !(min == max && set.contains(min)),
        }
    }

    fn eval_bloom(&self, bloom: &BloomFilter<'_>, field_type: FieldType) -> bool {
        let may_contain = |v: &Datum| {
            !v.is_null()
                && v
                    .coerce_to(field_type)
                    .is_none_or(|key| bloom.test(&key))
        };
        match &self.op {
            CompareOp::Eq(v) => may_contain(v),
            CompareOp::In(set) => set.iter().any(may_contain),
            _ => true,
        }
    }
}

impl DeletePredicate for Cond {
    fn del_eval(&self, min: &Datum, max: &Datum) -> DeleteMatch {
        let has_null = min.is_null();
        let all_null = max.is_null();
        let verdict = match &self.op {
            CompareOp::IsNull => {
                return if all_null {
                    DeleteMatch::Excluded
                } else if has_null {
                    DeleteMatch::Partial
                } else {
                    DeleteMatch::NotMatched
                };
            }
            CompareOp::IsNotNull => {
                return if !has_null {
                    DeleteMatch::Excluded
                } else if all_null {
                    DeleteMatch::NotMatched
                } else {
                    DeleteMatch::Partial
                };
            }
            _ if all_null || self.operand_is_null() => return DeleteMatch::NotMatched,
            CompareOp::Eq(v) => {
                if min == v && max == v {
                    DeleteMatch::Excluded
                } else if Self::in_range(v, min, max) {
                    DeleteMatch::Partial
                } else {
                    DeleteMatch::NotMatched
                }
            }
            CompareOp::Ne(v) => {
                if v < min || v > max {
                    DeleteMatch::Excluded
                } else if min == v && max == v {
                    DeleteMatch::NotMatched
                } else {
                    DeleteMatch::Partial
                }
            }
            CompareOp::Lt(v) => ordered_verdict(max < v, min < v),
            CompareOp::Le(v) => ordered_verdict(max <= v, min <= v),
            CompareOp::Gt(v) => ordered_verdict(min > v, max > v),
            CompareOp::Ge(v) => ordered_verdict(min >= v, max >= v),
            CompareOp::In(set) => {
                if min == max && set.contains(min) {
                    DeleteMatch::Excluded
                } else if set.iter().any(|v| Self::in_range(v, min, max)) {
                    DeleteMatch::Partial
                } else {
                    DeleteMatch::NotMatched
                }
            }
            CompareOp::NotIn(set) => {
                if min == max {
                    if set.contains(min) {
                        DeleteMatch::NotMatched
                    } else {
                        DeleteMatch::Excluded
                    }
                } else if set.iter().any(|v| Self::in_range(v, min, max)) {
                    DeleteMatch::Partial
                } else {
                    DeleteMatch::Excluded
                }
            }
        };
        // Null rows never satisfy a comparison, so a block holding nulls cannot
        // be fully deleted by one.
        if has_null && verdict == DeleteMatch::Excluded {
            DeleteMatch::Partial
        } else {
            verdict
        }
    }
}

fn ordered_verdict(all_rows: bool, some_rows: bool) -> DeleteMatch {
    if all_rows {
        DeleteMatch::Excluded
    } else if some_rows {
        DeleteMatch::Partial
    } else {
        DeleteMatch::NotMatched
    }
}

/// All conditions placed on one column, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CondColumn {
    conds: Vec<Cond>,
}

impl CondColumn {
    pub fn new(conds: Vec<Cond>) -> Self {
        Self { conds }
    }

    pub fn single(cond: Cond) -> Self {
        Self { conds: vec![cond] }
    }

    pub fn push(&mut self, cond: Cond) {
        self.conds.push(cond);
    }

    pub fn conds(&self) -> &[Cond] {
        &self.conds
    }
}

impl ColumnPredicate for CondColumn {
    fn eval_stats(&self, min: &Datum, max: &Datum) -> bool {
        self.conds.iter().all(|c| c.eval_stats(min, max))
    }

    fn eval_bloom(&self, bloom: &BloomFilter<'_>, field_type: FieldType) -> bool {
        self.conds.iter().all(|c| c.eval_bloom(bloom, field_type))
    }
}

impl DeletePredicate for CondColumn {
    fn del_eval(&self, min: &Datum, max: &Datum) -> DeleteMatch {
        self.conds
            .iter()
            .fold(DeleteMatch::Excluded, |acc, c| acc.and(c.del_eval(min, max)))
    }
}
