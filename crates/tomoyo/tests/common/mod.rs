#![allow(dead_code)]

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tomoyo::{App, Environ, Response, RouterError};

pub fn get(app: &App, path: &str) -> Arc<Response> {
    request(app, Environ::new("GET", path), b"")
}

pub fn get_err(app: &App, path: &str) -> RouterError {
    app.dispatch(&Environ::new("GET", path), &mut io::empty())
        .expect_err(&format!("Expected dispatch error for: GET {path}"))
}

pub fn post(app: &App, path: &str, form: &str) -> Arc<Response> {
    let environ = Environ::new("POST", path).content_length(form.len().to_string());
    request(app, environ, form.as_bytes())
}

pub fn request(app: &App, environ: Environ, mut payload: &[u8]) -> Arc<Response> {
    app.dispatch(&environ, &mut payload).unwrap_or_else(|e| {
        panic!(
            "Failed to dispatch: {} {}\nError: {e:?}",
            environ.request_method, environ.path_info
        )
    })
}

/// Counts handler invocations.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
