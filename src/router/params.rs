use std::iter::{DoubleEndedIterator, ExactSizeIterator, FusedIterator};
use std::str::FromStr;

use smallvec::SmallVec;

/// Route parameters in the order their names were first bound.
///
/// A value is `None` when the parameter is declared optional (or is a regex
/// group that did not participate) and the path omitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    buf: SmallVec<[(Box<str>, Option<String>); 8]>,
}

impl Params {
    pub fn new() -> Self {
        Self {
            buf: SmallVec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .find_map(|(k, v)| if &**k == name { v.as_deref() } else { None })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buf.iter().any(|(k, _)| &**k == name)
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    /// Binds `name`, overwriting an earlier value in place so the first
    /// position is kept.
    pub fn insert(&mut self, name: &str, value: Option<String>) {
        match self.buf.iter_mut().find(|(k, _)| &**k == name) {
            Some((_, v)) => *v = value,
            None => self.buf.push((name.into(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.buf.iter(),
        }
    }

    /// Values in binding order, as passed positionally to direct handlers.
    pub fn values(&self) -> SmallVec<[Option<&str>; 8]> {
        self.buf.iter().map(|(_, v)| v.as_deref()).collect()
    }
}

pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (Box<str>, Option<String>)>,
}

macro_rules! delegate {
    ($method:tt) => {
        fn $method(&mut self) -> Option<Self::Item> {
            let (n, v) = self.inner.$method()?;
            Some((&**n, v.as_deref()))
        }
    };
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, Option<&'a str>);
    delegate!(next);

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    delegate!(next_back);
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, Option<&'a str>);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
