//! Error-or-value results without unwinding.

use std::future::{ready, IntoFuture, Ready};

use crate::maybe::Maybe;

/// Exactly one of a left (error) value or a right (success) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Transforms the right channel; a left value passes through.
    pub fn map<U, F>(self, f: F) -> Either<L, U>
    where
        F: FnOnce(R) -> U,
    {
        match self {
            Either::Left(err) => Either::Left(err),
            Either::Right(value) => Either::Right(f(value)),
        }
    }

    /// Transforms the left channel; a right value passes through.
    pub fn map_left<U, F>(self, f: F) -> Either<U, R>
    where
        F: FnOnce(L) -> U,
    {
        match self {
            Either::Left(err) => Either::Left(f(err)),
            Either::Right(value) => Either::Right(value),
        }
    }

    /// Chains on the right channel, short-circuiting on left.
    pub fn then<U, F>(self, next: F) -> Either<L, U>
    where
        F: FnOnce(R) -> Either<L, U>,
    {
        match self {
            Either::Left(err) => Either::Left(err),
            Either::Right(value) => next(value),
        }
    }

    /// Recovers from the left channel, passing right values through.
    pub fn catch<U, F>(self, recover: F) -> Either<U, R>
    where
        F: FnOnce(L) -> Either<U, R>,
    {
        match self {
            Either::Left(err) => recover(err),
            Either::Right(value) => Either::Right(value),
        }
    }

    pub fn left(self) -> Maybe<L> {
        match self {
            Either::Left(err) => Maybe::Some(err),
            Either::Right(_) => Maybe::None,
        }
    }

    pub fn right(self) -> Maybe<R> {
        match self {
            Either::Left(_) => Maybe::None,
            Either::Right(value) => Maybe::Some(value),
        }
    }

    pub fn left_or_none(self) -> Option<L> {
        self.left().into_nullable()
    }

    pub fn right_or_none(self) -> Option<R> {
        self.right().into_nullable()
    }

    pub fn into_result(self) -> Result<R, L> {
        match self {
            Either::Left(err) => Err(err),
            Either::Right(value) => Ok(value),
        }
    }

    /// Collects every right value in order, or returns the first left one.
    pub fn flatten_array<I>(items: I) -> Either<L, Vec<R>>
    where
        I: IntoIterator<Item = Either<L, R>>,
    {
        let mut values = Vec::new();
        for item in items {
            match item {
                Either::Left(err) => return Either::Left(err),
                Either::Right(value) => values.push(value),
            }
        }
        Either::Right(values)
    }
}

impl<L, R> Either<L, Either<L, R>> {
    /// Left-biased: an outer left wins, otherwise the inner result is returned.
    pub fn flatten(self) -> Either<L, R> {
        self.then(|inner| inner)
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(value) => Either::Right(value),
            Err(err) => Either::Left(err),
        }
    }
}

impl<L, R> From<Either<L, R>> for Result<R, L> {
    fn from(either: Either<L, R>) -> Self {
        either.into_result()
    }
}

/// Awaiting resolves with the right value, or fails with the left one.
impl<L, R> IntoFuture for Either<L, R> {
    type Output = Result<R, L>;
    type IntoFuture = Ready<Result<R, L>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.into_result())
    }
}
