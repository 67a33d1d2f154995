//! Optional values with an explicit presence tag.

use std::fmt;
use std::future::{ready, IntoFuture, Ready};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::either::Either;

/// Error produced when an absent [`Maybe`] is awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Absent;

impl fmt::Display for Absent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value is absent")
    }
}

impl std::error::Error for Absent {}

/// Zero or one value of type `T`.
///
/// Presence is fixed when the value is built. `Maybe::new(Some(0))` and
/// `Maybe::new(Some(String::new()))` are both present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Maybe<T> {
    Some(T),
    None,
}

impl<T> Maybe<T> {
    /// Wraps an `Option`, the only entry point for values that may be missing.
    pub fn new(value: Option<T>) -> Self {
        match value {
            Some(value) => Maybe::Some(value),
            None => Maybe::None,
        }
    }

    pub fn is_some(&self) -> bool {
        matches!(self, Maybe::Some(_))
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn as_ref(&self) -> Maybe<&T> {
        match self {
            Maybe::Some(value) => Maybe::Some(value),
            Maybe::None => Maybe::None,
        }
    }

    /// Returns the held value or `default`.
    pub fn get_or_insert(self, default: T) -> T {
        match self {
            Maybe::Some(value) => value,
            Maybe::None => default,
        }
    }

    /// Returns the held value or computes one; `default` only runs when absent.
    pub fn get_or_insert_with<F>(self, default: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Maybe::Some(value) => value,
            Maybe::None => default(),
        }
    }

    /// Converts back to a plain `Option` at an API boundary.
    pub fn into_nullable(self) -> Option<T> {
        match self {
            Maybe::Some(value) => Some(value),
            Maybe::None => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Maybe::Some(value) => Maybe::Some(f(value)),
            Maybe::None => Maybe::None,
        }
    }

    /// Keeps the value only if `predicate` accepts it.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Maybe::Some(value) if predicate(&value) => Maybe::Some(value),
            _ => Maybe::None,
        }
    }

    /// Chains a computation that may itself produce nothing.
    pub fn then<U, F>(self, next: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Maybe<U>,
    {
        match self {
            Maybe::Some(value) => next(value),
            Maybe::None => Maybe::None,
        }
    }

    /// Recovers from absence; a present value passes through untouched.
    pub fn catch<F>(self, recover: F) -> Self
    where
        F: FnOnce() -> Maybe<T>,
    {
        match self {
            Maybe::Some(value) => Maybe::Some(value),
            Maybe::None => recover(),
        }
    }

    /// Runs exactly one of the two branches.
    pub fn match_with<U, S, N>(self, some: S, none: N) -> U
    where
        S: FnOnce(T) -> U,
        N: FnOnce() -> U,
    {
        match self {
            Maybe::Some(value) => some(value),
            Maybe::None => none(),
        }
    }

    pub fn ok_or<L>(self, err: L) -> Either<L, T> {
        match self {
            Maybe::Some(value) => Either::Right(value),
            Maybe::None => Either::Left(err),
        }
    }

    pub fn ok_or_else<L, F>(self, err: F) -> Either<L, T>
    where
        F: FnOnce() -> L,
    {
        match self {
            Maybe::Some(value) => Either::Right(value),
            Maybe::None => Either::Left(err()),
        }
    }

    /// Collects the present values in order, dropping the absent ones.
    pub fn flatten_array<I>(items: I) -> Vec<T>
    where
        I: IntoIterator<Item = Maybe<T>>,
    {
        items.into_iter().filter_map(Maybe::into_nullable).collect()
    }
}

impl<T> Maybe<Maybe<T>> {
    /// Absent if either level is absent.
    pub fn flatten(self) -> Maybe<T> {
        self.then(|inner| inner)
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::None
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Maybe::new(value)
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        value.into_nullable()
    }
}

/// Awaiting resolves with the value, or fails with [`Absent`].
impl<T> IntoFuture for Maybe<T> {
    type Output = Result<T, Absent>;
    type IntoFuture = Ready<Result<T, Absent>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.into_nullable().ok_or(Absent))
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Maybe::Some(value) => value.fmt(f),
            Maybe::None => write!(f, "<None>"),
        }
    }
}

impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ref().into_nullable().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Maybe::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_falsy_values_are_present() {
        assert!(Maybe::new(Some(0)).is_some());
        assert!(Maybe::new(Some(String::new())).is_some());
        assert!(Maybe::new(Some(false)).is_some());
        assert!(Maybe::<i32>::new(None).is_none());
    }

    #[test]
    fn test_map_and_then_skip_callback_when_absent() {
        let calls = Cell::new(0);
        let mapped = Maybe::<i32>::None.map(|x| {
            calls.set(calls.get() + 1);
            x + 1
        });
        let chained = Maybe::<i32>::None.then(|x| {
            calls.set(calls.get() + 1);
            Maybe::Some(x + 1)
        });
        assert_eq!(mapped, Maybe::None);
        assert_eq!(chained, Maybe::None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_map_and_then_when_present() {
        assert_eq!(Maybe::Some(2).map(|x| x * 10), Maybe::Some(20));
        assert_eq!(Maybe::Some(2).then(|x| Maybe::Some(x + 1)), Maybe::Some(3));
        assert_eq!(Maybe::Some(2).then(|_| Maybe::<i32>::None), Maybe::None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Maybe::Some(1).get_or_insert(5), 1);
        assert_eq!(Maybe::None.get_or_insert(5), 5);

        let called = Cell::new(false);
        let value = Maybe::Some(1).get_or_insert_with(|| {
            called.set(true);
            9
        });
        assert_eq!(value, 1);
        assert!(!called.get(), "default generator ran for a present value");
        assert_eq!(Maybe::None.get_or_insert_with(|| 9), 9);
    }

    #[test]
    fn test_filter() {
        assert_eq!(Maybe::Some(4).filter(|x| x % 2 == 0), Maybe::Some(4));
        assert_eq!(Maybe::Some(3).filter(|x| x % 2 == 0), Maybe::None);
        assert_eq!(Maybe::<i32>::None.filter(|_| true), Maybe::None);
    }

    #[test]
    fn test_catch_recovers_only_absence() {
        assert_eq!(Maybe::None.catch(|| Maybe::Some(7)), Maybe::Some(7));
        assert_eq!(Maybe::Some(1).catch(|| Maybe::Some(7)), Maybe::Some(1));
    }

    #[test]
    fn test_match_with_runs_one_branch() {
        let some = Maybe::Some(3).match_with(|x| format!("some {}", x), || "none".to_string());
        let none = Maybe::<i32>::None.match_with(|x| format!("some {}", x), || "none".to_string());
        assert_eq!(some, "some 3");
        assert_eq!(none, "none");
    }

    #[test]
    fn test_ok_or() {
        assert_eq!(Maybe::Some(1).ok_or("missing"), Either::Right(1));
        assert_eq!(Maybe::<i32>::None.ok_or("missing"), Either::Left("missing"));
        assert_eq!(Maybe::<i32>::None.ok_or_else(|| 42), Either::Left(42));
    }

    #[test]
    fn test_flatten() {
        assert_eq!(Maybe::Some(Maybe::Some(1)).flatten(), Maybe::Some(1));
        assert_eq!(Maybe::Some(Maybe::<i32>::None).flatten(), Maybe::None);
        assert_eq!(Maybe::<Maybe<i32>>::None.flatten(), Maybe::None);
    }

    #[test]
    fn test_flatten_array_preserves_order() {
        let values = Maybe::flatten_array(vec![Maybe::Some(1), Maybe::None, Maybe::Some(2)]);
        assert_eq!(values, vec![1, 2]);
        assert!(Maybe::<i32>::flatten_array(vec![Maybe::None, Maybe::None]).is_empty());
    }

    #[test]
    fn test_display_and_json() {
        assert_eq!(Maybe::Some(5).to_string(), "5");
        assert_eq!(Maybe::<i32>::None.to_string(), "<None>");
        assert_eq!(serde_json::to_string(&Maybe::<i32>::None).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Maybe::Some(5)).unwrap(), "5");
        let parsed: Maybe<i32> = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Maybe::None);
    }

    #[tokio::test]
    async fn test_await_resolves_or_rejects() {
        assert_eq!(Maybe::Some("x").await, Ok("x"));
        assert_eq!(Maybe::<&str>::None.await, Err(Absent));
    }
}
