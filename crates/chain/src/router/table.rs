//! Storage for registered middleware.

use super::path::PathPrefix;
use crate::middleware::Middleware;
use http::Method;
use std::fmt;

/// Which group of registrations an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// entries that apply to every verb
    All,
    Get,
    Post,
}

impl Bucket {
    /// The verb specific bucket for `method`, if there is one.
    ///
    /// Only GET and POST have their own bucket; every other verb runs `All` entries only.
    /// Verbs are compared ignoring ASCII case.
    pub fn for_method(method: &Method) -> Option<Self> {
        let method = method.as_str();
        if method.eq_ignore_ascii_case(Method::GET.as_str()) {
            Some(Bucket::Get)
        } else if method.eq_ignore_ascii_case(Method::POST.as_str()) {
            Some(Bucket::Post)
        } else {
            None
        }
    }
}

/// One registration: a path prefix and the middleware registered with it.
pub struct MiddlewareEntry {
    path: PathPrefix,
    middlewares: Vec<Box<dyn Middleware>>,
}

impl MiddlewareEntry {
    pub(crate) fn new(path: PathPrefix, middlewares: Vec<Box<dyn Middleware>>) -> Self {
        Self { path, middlewares }
    }

    /// Gets the path prefix this entry was registered with
    pub fn path(&self) -> &PathPrefix {
        &self.path
    }

    /// Gets the middleware of this entry, in registration order
    pub fn middlewares(&self) -> &[Box<dyn Middleware>] {
        &self.middlewares
    }

    /// Returns true if this entry applies to `url`.
    #[inline]
    pub fn matches(&self, url: &str) -> bool {
        self.path.matches(url)
    }
}

impl fmt::Debug for MiddlewareEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareEntry").field("path", &self.path).field("middlewares", &self.middlewares.len()).finish()
    }
}

/// Registered entries, kept in registration order per bucket.
#[derive(Debug, Default)]
pub struct RouterTable {
    all: Vec<MiddlewareEntry>,
    get: Vec<MiddlewareEntry>,
    post: Vec<MiddlewareEntry>,
}

impl RouterTable {
    pub(crate) fn push(&mut self, bucket: Bucket, entry: MiddlewareEntry) {
        self.bucket_mut(bucket).push(entry);
    }

    pub fn entries(&self, bucket: Bucket) -> &[MiddlewareEntry] {
        match bucket {
            Bucket::All => &self.all,
            Bucket::Get => &self.get,
            Bucket::Post => &self.post,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<MiddlewareEntry> {
        match bucket {
            Bucket::All => &mut self.all,
            Bucket::Get => &mut self.get,
            Bucket::Post => &mut self.post,
        }
    }

    /// Entries that may apply to a request with `method`: every `All` entry, then
    /// the entries of the method's own bucket.
    pub fn candidates<'t>(&'t self, method: &Method) -> impl Iterator<Item = &'t MiddlewareEntry> + use<'t> {
        let verb_entries = Bucket::for_method(method).map_or(&[][..], |bucket| self.entries(bucket));
        self.all.iter().chain(verb_entries)
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.all.len() + self.get.len() + self.post.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Bucket, MiddlewareEntry, RouterTable};
    use crate::router::PathPrefix;
    use http::Method;

    fn entry(path: &str) -> MiddlewareEntry {
        MiddlewareEntry::new(PathPrefix::new(path).unwrap(), vec![])
    }

    fn table() -> RouterTable {
        let mut table = RouterTable::default();
        table.push(Bucket::Get, entry("/get"));
        table.push(Bucket::All, entry("/all-1"));
        table.push(Bucket::Post, entry("/post"));
        table.push(Bucket::All, entry("/all-2"));
        table
    }

    fn candidate_paths(table: &RouterTable, method: &Method) -> Vec<String> {
        table.candidates(method).map(|entry| entry.path().to_string()).collect()
    }

    #[test]
    fn test_bucket_for_method() {
        assert_eq!(Bucket::for_method(&Method::GET), Some(Bucket::Get));
        assert_eq!(Bucket::for_method(&Method::POST), Some(Bucket::Post));
        assert_eq!(Bucket::for_method(&Method::PUT), None);
        assert_eq!(Bucket::for_method(&Method::HEAD), None);
        assert_eq!(Bucket::for_method(&Method::from_bytes(b"get").unwrap()), Some(Bucket::Get));
        assert_eq!(Bucket::for_method(&Method::from_bytes(b"Post").unwrap()), Some(Bucket::Post));
    }

    #[test]
    fn test_candidates_all_first() {
        let table = table();

        assert_eq!(candidate_paths(&table, &Method::GET), vec!["/all-1", "/all-2", "/get"]);
        assert_eq!(candidate_paths(&table, &Method::POST), vec!["/all-1", "/all-2", "/post"]);
    }

    #[test]
    fn test_candidates_other_verbs() {
        let table = table();

        assert_eq!(candidate_paths(&table, &Method::PUT), vec!["/all-1", "/all-2"]);
        assert_eq!(candidate_paths(&table, &Method::DELETE), vec!["/all-1", "/all-2"]);
    }

    #[test]
    fn test_len() {
        assert!(RouterTable::default().is_empty());
        assert_eq!(table().len(), 4);
        assert_eq!(table().entries(Bucket::All).len(), 2);
    }
}
