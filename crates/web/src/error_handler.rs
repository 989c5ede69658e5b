use bytes::Bytes;
use http::StatusCode;
use std::collections::HashMap;
use std::fmt;

type BodyProducer = dyn Fn() -> Bytes + Send + Sync;

/// Bodies for error responses, keyed by status code.
///
/// Consulted only for errors that carry no explicit data.
#[derive(Default)]
pub struct ErrorHandlers {
    handlers: HashMap<StatusCode, Box<BodyProducer>>,
}

impl ErrorHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the body producer for `code`, replacing any previous one.
    pub fn register<F, B>(&mut self, code: StatusCode, producer: F)
    where
        F: Fn() -> B + Send + Sync + 'static,
        B: Into<Bytes> + 'static,
    {
        self.handlers.insert(code, Box::new(move || -> Bytes { producer().into() }));
    }

    pub fn contains(&self, code: StatusCode) -> bool {
        self.handlers.contains_key(&code)
    }

    /// Produces the body registered for `code`.
    pub fn render(&self, code: StatusCode) -> Option<Bytes> {
        self.handlers.get(&code).map(|producer| producer())
    }
}

impl fmt::Debug for ErrorHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
