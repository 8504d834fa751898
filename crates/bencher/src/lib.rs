use http::Method;

#[derive(Debug, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    method: Method,
    url: &'static str,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, method: Method, url: &'static str) -> Self {
        Self { name, group, method, url }
    }

    pub fn small(name: &'static str, method: Method, url: &'static str) -> Self {
        Self::new(name, TestGroup::Small, method, url)
    }

    pub fn normal(name: &'static str, method: Method, url: &'static str) -> Self {
        Self::new(name, TestGroup::Normal, method, url)
    }

    pub fn large(name: &'static str, method: Method, url: &'static str) -> Self {
        Self::new(name, TestGroup::Large, method, url)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &'static str {
        self.url
    }

    /// Number of registrations per bucket the router for this case is built with.
    pub fn registrations(&self) -> usize {
        self.group.registrations()
    }
}

/// Router sizes benchmarks are run against.
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    pub fn registrations(self) -> usize {
        match self {
            TestGroup::Small => 4,
            TestGroup::Normal => 32,
            TestGroup::Large => 256,
        }
    }
}
