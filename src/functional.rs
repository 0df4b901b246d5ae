use std::{iter, num::NonZeroUsize, ops::Deref};

mod sealed {
    pub trait Sealed {}
}

/// Abstracts over `Vec<T>`, `[T; N]` and [Single] for length-prefixed groups.
///
/// Commands whose reply has one entry per input entry (the `GetValues`
/// family, [InstanceCounts](crate::spec::virtual_machine::InstanceCounts))
/// are generic over this, so that passing an array gets an array of the same
/// size back.
pub trait Coll: sealed::Sealed + Sized {
    type Item;
    type Map<U>: Coll<Item = U>;
    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    const STATIC_SIZE: Option<NonZeroUsize>;

    fn size(&self) -> usize;

    fn iter(&self) -> Self::Iter<'_>;

    /// Returns `None` when the number of items does not fit the collection.
    fn from_vec(vec: Vec<Self::Item>) -> Option<Self>;
}

/// A collection of exactly one element.
///
/// Handy when a command takes one input and the reply has a matching single
/// entry, the value comes back without a destructuring step.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Single<T>(pub T);

impl<T> Deref for Single<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> sealed::Sealed for Single<T> {}
impl<T> Coll for Single<T> {
    type Item = T;
    type Map<U> = Single<U>;
    type Iter<'a> = iter::Once<&'a T> where T: 'a;

    const STATIC_SIZE: Option<NonZeroUsize> = NonZeroUsize::new(1);

    fn size(&self) -> usize {
        1
    }

    fn iter(&self) -> Self::Iter<'_> {
        iter::once(&self.0)
    }

    fn from_vec(mut vec: Vec<T>) -> Option<Self> {
        (vec.len() == 1).then(|| Single(vec.remove(0)))
    }
}

impl<const N: usize, T> sealed::Sealed for [T; N] {}
impl<const N: usize, T> Coll for [T; N] {
    type Item = T;
    type Map<U> = [U; N];
    type Iter<'a> = <&'a Self as IntoIterator>::IntoIter where T: 'a;

    const STATIC_SIZE: Option<NonZeroUsize> = NonZeroUsize::new(N);

    fn size(&self) -> usize {
        N
    }

    fn iter(&self) -> Self::Iter<'_> {
        <&Self as IntoIterator>::into_iter(self)
    }

    fn from_vec(vec: Vec<T>) -> Option<Self> {
        vec.try_into().ok()
    }
}

impl<T> sealed::Sealed for Vec<T> {}
impl<T> Coll for Vec<T> {
    type Item = T;
    type Map<U> = Vec<U>;
    type Iter<'a> = <&'a Self as IntoIterator>::IntoIter where T: 'a;

    const STATIC_SIZE: Option<NonZeroUsize> = None;

    fn size(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        <&Self as IntoIterator>::into_iter(self)
    }

    fn from_vec(vec: Vec<T>) -> Option<Self> {
        Some(vec)
    }
}
