//! src/case.rs
//!
//! The authoring side of the harness: the `TestCase` trait a test type
//! implements, the `Context` its hooks receive, and the `Suite` that
//! registers case types for the runner.
//!
//! The runner never sees concrete case types. Each registered case is erased
//! behind `RegisteredCase`, which can list its method names and build a fresh
//! `Fixture` (one instance plus its methods) for every test.

use crate::domain::{CaseResult, Fault};
use std::fmt::{self, Write as _};
use std::io::{self, Write as _};

/// A test body or hook bound to a case type.
pub type TestFn<C> = fn(&mut C, &mut Context) -> CaseResult;

/// A named method declared by a case.
pub struct TestMethod<C> {
    pub name: &'static str,
    pub run: TestFn<C>,
}

impl<C> TestMethod<C> {
    pub fn new(name: &'static str, run: TestFn<C>) -> Self {
        Self { name, run }
    }
}

impl<C> Clone for TestMethod<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for TestMethod<C> {}

/// A group of related test methods sharing `set_up` and `tear_down`.
///
/// A new value is constructed for every test method, so nothing carries over
/// from one test to the next.
pub trait TestCase: Sized + 'static {
    const NAME: &'static str;

    /// Every method the case declares. Only those whose names start with the
    /// configured prefix are discovered; the rest run only when named.
    fn methods() -> Vec<TestMethod<Self>>;

    fn set_up(&mut self, _ctx: &mut Context) -> CaseResult {
        Ok(())
    }

    fn tear_down(&mut self, _ctx: &mut Context) -> CaseResult {
        Ok(())
    }
}

/// Per-test handle passed to hooks and bodies.
#[derive(Debug, Default)]
pub struct Context {
    buffer: Option<String>,
}

impl Context {
    /// With `buffered`, output is kept in memory instead of going to stdout.
    pub fn new(buffered: bool) -> Self {
        Self {
            buffer: buffered.then(String::new),
        }
    }

    /// Writes `line` and a newline to the test's output.
    pub fn println(&mut self, line: impl fmt::Display) -> CaseResult {
        match &mut self.buffer {
            Some(buffer) => {
                writeln!(buffer, "{line}").map_err(|e| Fault::error(e.to_string()))?;
            }
            None => {
                let mut out = io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()?;
            }
        }
        Ok(())
    }

    pub fn captured(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    pub fn into_captured(self) -> Option<String> {
        self.buffer
    }
}

/// One live case instance, driven through its lifecycle by the runner.
pub trait Fixture {
    fn set_up(&mut self, ctx: &mut Context) -> CaseResult;
    fn call(&mut self, method: &str, ctx: &mut Context) -> CaseResult;
    fn tear_down(&mut self, ctx: &mut Context) -> CaseResult;
}

/// A case type as registered in a `Suite`.
pub trait RegisteredCase: Send + Sync {
    fn name(&self) -> &'static str;
    fn method_names(&self) -> Vec<&'static str>;
    fn has_method(&self, method: &str) -> bool {
        self.method_names().iter().any(|m| *m == method)
    }
    fn instantiate(&self) -> Box<dyn Fixture>;
}

struct Instance<C> {
    case: C,
    methods: Vec<TestMethod<C>>,
}

impl<C: TestCase> Fixture for Instance<C> {
    fn set_up(&mut self, ctx: &mut Context) -> CaseResult {
        self.case.set_up(ctx)
    }

    fn call(&mut self, method: &str, ctx: &mut Context) -> CaseResult {
        let run = self
            .methods
            .iter()
            .find(|m| m.name == method)
            .map(|m| m.run)
            .ok_or_else(|| Fault::error(format!("{} has no method '{method}'", C::NAME)))?;
        run(&mut self.case, ctx)
    }

    fn tear_down(&mut self, ctx: &mut Context) -> CaseResult {
        self.case.tear_down(ctx)
    }
}

struct Entry<C, F> {
    factory: F,
    methods: Vec<TestMethod<C>>,
}

impl<C, F> RegisteredCase for Entry<C, F>
where
    C: TestCase,
    F: Fn() -> C + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        C::NAME
    }

    fn method_names(&self) -> Vec<&'static str> {
        self.methods.iter().map(|m| m.name).collect()
    }

    fn instantiate(&self) -> Box<dyn Fixture> {
        Box::new(Instance {
            case: (self.factory)(),
            methods: self.methods.clone(),
        })
    }
}

/// The ordered set of case types a run can draw from.
#[derive(Default)]
pub struct Suite {
    cases: Vec<Box<dyn RegisteredCase>>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<C: TestCase + Default>(self) -> Self {
        self.add_with(C::default)
    }

    /// Registers `C`, building each instance with `factory`.
    pub fn add_with<C, F>(mut self, factory: F) -> Self
    where
        C: TestCase,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.cases.push(Box::new(Entry {
            factory,
            methods: C::methods(),
        }));
        self
    }

    pub fn cases(&self) -> impl Iterator<Item = &dyn RegisteredCase> {
        self.cases.iter().map(|c| &**c)
    }

    pub fn case(&self, name: &str) -> Option<&dyn RegisteredCase> {
        self.cases().find(|c| c.name() == name)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
