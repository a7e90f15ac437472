use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

use log::{debug, log_enabled, trace, warn, Level};

use crate::record::{Field, OptionalField, Record, Value};

/// A compiled clause: reads its field off the record and tests it.
pub type FilterFn<'a, R, E> = Box<dyn Fn(&R) -> Result<bool, E> + 'a>;

/// How clause results combine into a record match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Match {
    /// The first field whose clause returns true includes the record.
    #[default]
    Any,
    /// Every clause must be keyed to a present field and return true.
    /// With no clauses at all, every record matches.
    All,
}

/// Declarative predicates over a dynamic [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Isolator {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Ge(Value),
    Lt(Value),
    Le(Value),
    /// Substring test, string values only.
    Contains(String),
    /// Any non-null value.
    Exists,
}

impl Isolator {
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Isolator::Eq(v) => value == v,
            Isolator::Ne(v) => value != v,
            Isolator::Gt(v) => value > v,
            Isolator::Ge(v) => value >= v,
            Isolator::Lt(v) => value < v,
            Isolator::Le(v) => value <= v,
            Isolator::Contains(needle) => value
                .as_str()
                .is_some_and(|haystack| haystack.contains(needle.as_str())),
            Isolator::Exists => !value.is_null(),
        }
    }
}

pub struct Query<'a, R, E = Infallible> {
    clauses: HashMap<String, FilterFn<'a, R, E>>,
    mode: Match,
}

impl<'a, R, E> Default for Query<'a, R, E> {
    fn default() -> Self {
        Query {
            clauses: HashMap::new(),
            mode: Match::default(),
        }
    }
}

impl<'a, R, E> fmt::Debug for Query<'a, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&String> = self.clauses.keys().collect();
        fields.sort();
        f.debug_struct("Query")
            .field("fields", &fields)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<'a, R: 'a, E: 'a> Query<'a, R, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(&mut self, mode: Match) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> Match {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn has_clause(&self, field: &str) -> bool {
        self.clauses.contains_key(field)
    }

    /// Keys `predicate` to `field`.
    pub fn field<V, P>(&mut self, field: Field<R, V>, predicate: P) -> &mut Self
    where
        V: ?Sized + 'a,
        P: Fn(&V) -> bool + 'a,
    {
        self.clause(
            field.name(),
            Box::new(move |record: &R| Ok(predicate(field.get(record)))),
        )
    }

    /// An unset value never matches.
    pub fn optional_field<V, P>(&mut self, field: OptionalField<R, V>, predicate: P) -> &mut Self
    where
        V: ?Sized + 'a,
        P: Fn(&V) -> bool + 'a,
    {
        self.clause(
            field.name(),
            Box::new(move |record: &R| Ok(field.get(record).is_some_and(|value| predicate(value)))),
        )
    }

    /// Keys a fallible predicate to `field`. Its first error ends the filter.
    pub fn try_field<V, P>(&mut self, field: Field<R, V>, predicate: P) -> &mut Self
    where
        V: ?Sized + 'a,
        P: Fn(&V) -> Result<bool, E> + 'a,
    {
        self.clause(
            field.name(),
            Box::new(move |record: &R| predicate(field.get(record))),
        )
    }

    pub fn isolate(&mut self, name: &str, isolator: Isolator) -> &mut Self
    where
        R: Record,
    {
        let field = name.to_string();
        self.clause(
            name,
            Box::new(move |record: &R| {
                Ok(record
                    .value(&field)
                    .is_some_and(|value| isolator.test(&value)))
            }),
        )
    }

    fn clause(&mut self, name: &str, filter: FilterFn<'a, R, E>) -> &mut Self {
        if self.clauses.insert(name.to_string(), filter).is_some() {
            warn!("Replaced existing clause for field `{name}`");
        }
        self
    }
}

impl<'a, R: Record, E> Query<'a, R, E> {
    pub fn try_matches(&self, record: &R) -> Result<bool, E> {
        match self.mode {
            Match::Any => {
                for field in record.field_names() {
                    if let Some(filter) = self.clauses.get(field) {
                        trace!("Testing field `{field}`");
                        if filter(record)? {
                            return Ok(true);
                        }
                    }
                }
                Ok(false)
            }
            Match::All => {
                let mut satisfied = 0;
                for field in record.field_names() {
                    if let Some(filter) = self.clauses.get(field) {
                        trace!("Testing field `{field}`");
                        if !filter(record)? {
                            return Ok(false);
                        }
                        satisfied += 1;
                    }
                }
                Ok(satisfied == self.clauses.len())
            }
        }
    }

    /// Clause keys that name no field of any record in `records`, sorted.
    pub fn unknown_fields(&self, records: &[R]) -> Vec<&str> {
        let mut unseen: Vec<&str> = self.clauses.keys().map(String::as_str).collect();
        for record in records {
            if unseen.is_empty() {
                break;
            }
            let names = record.field_names();
            unseen.retain(|key| !names.contains(key));
        }
        unseen.sort_unstable();
        unseen
    }

    fn warn_unknown_fields(&self, records: &[R]) {
        if records.is_empty() || !log_enabled!(Level::Warn) {
            return;
        }
        for key in self.unknown_fields(records) {
            warn!("No record has field `{key}`, its clause never runs");
        }
    }

    pub fn try_apply<'r>(&self, records: &'r [R]) -> Result<Vec<&'r R>, E> {
        let mut matched = Vec::new();
        for record in records {
            if self.try_matches(record)? {
                matched.push(record);
            }
        }

        self.warn_unknown_fields(records);
        debug!("Query matched {} of {} records", matched.len(), records.len());
        Ok(matched)
    }

    pub fn try_apply_owned<I>(&self, records: I) -> Result<Vec<R>, E>
    where
        I: IntoIterator<Item = R>,
    {
        let records: Vec<R> = records.into_iter().collect();
        let keep = records
            .iter()
            .map(|record| self.try_matches(record))
            .collect::<Result<Vec<bool>, E>>()?;

        self.warn_unknown_fields(&records);
        let total = records.len();
        let matched: Vec<R> = records
            .into_iter()
            .zip(keep)
            .filter_map(|(record, keep)| keep.then_some(record))
            .collect();

        debug!("Query matched {} of {total} records", matched.len());
        Ok(matched)
    }
}

impl<'a, R: Record> Query<'a, R> {
    pub fn matches(&self, record: &R) -> bool {
        infallible(self.try_matches(record))
    }

    pub fn apply<'r>(&self, records: &'r [R]) -> Vec<&'r R> {
        infallible(self.try_apply(records))
    }

    pub fn apply_owned<I>(&self, records: I) -> Vec<R>
    where
        I: IntoIterator<Item = R>,
    {
        infallible(self.try_apply_owned(records))
    }
}

/// Records in `items` matched by `query`, in input order.
pub fn query<'r, R: Record>(items: &'r [R], query: &Query<'_, R>) -> Vec<&'r R> {
    query.apply(items)
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
