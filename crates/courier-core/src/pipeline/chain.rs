//! Chain - middleware を terminal action の周りに畳み込む
//!
//! The fold runs from the last middleware to the first. Each step wraps the
//! continuation built so far, so the finished chain runs middlewares in
//! registration order and reaches the terminal only if every middleware calls
//! `next`. Commands and notifications share this fold; only the terminal and
//! the result type differ.

use std::sync::Arc;

use crate::error::CourierError;
use crate::typed::Next;

/// A zero-argument step of the chain.
pub type Continuation<'a, T> = Box<dyn Fn() -> Result<T, CourierError> + 'a>;

/// Compose `middlewares` around `terminal`.
///
/// `invoke` calls one middleware with the continuation that follows it.
/// No middleware means the terminal itself is returned.
pub fn build<'a, M, T, F>(
    middlewares: &'a [Arc<M>],
    terminal: Continuation<'a, T>,
    invoke: F,
) -> Continuation<'a, T>
where
    M: ?Sized + 'a,
    T: 'a,
    F: Fn(&'a M, Next<'_, T>) -> Result<T, CourierError> + Copy + 'a,
{
    middlewares.iter().rev().fold(terminal, |next, middleware| {
        let middleware: &'a M = middleware;
        Box::new(move || invoke(middleware, Next::new(&*next)))
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    trait Step {
        fn call(&self, next: Next<'_, String>) -> Result<String, CourierError>;
    }

    /// Records `<id>-before` / `<id>-after` around `next`.
    struct Traced {
        id: &'static str,
        trace: Rc<RefCell<Vec<String>>>,
    }

    impl Step for Traced {
        fn call(&self, next: Next<'_, String>) -> Result<String, CourierError> {
            self.trace.borrow_mut().push(format!("{}-before", self.id));
            let result = next.run();
            self.trace.borrow_mut().push(format!("{}-after", self.id));
            result
        }
    }

    struct Wrap {
        id: &'static str,
    }

    impl Step for Wrap {
        fn call(&self, next: Next<'_, String>) -> Result<String, CourierError> {
            let inner = next.run()?;
            Ok(format!("{}({inner})", self.id))
        }
    }

    struct ShortCircuit;

    impl Step for ShortCircuit {
        fn call(&self, _next: Next<'_, String>) -> Result<String, CourierError> {
            Ok("cached".to_string())
        }
    }

    struct Failing;

    impl Step for Failing {
        fn call(&self, _next: Next<'_, String>) -> Result<String, CourierError> {
            Err(CourierError::handler("boom"))
        }
    }

    struct Twice;

    impl Step for Twice {
        fn call(&self, next: Next<'_, String>) -> Result<String, CourierError> {
            let first = next.run()?;
            let second = next.run()?;
            Ok(format!("{first}+{second}"))
        }
    }

    fn run(steps: &[Arc<dyn Step>], terminal: Continuation<'_, String>) -> Result<String, CourierError> {
        let chain = build(steps, terminal, |step, next| step.call(next));
        chain()
    }

    #[test]
    fn runs_middlewares_in_registration_order() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let steps: Vec<Arc<dyn Step>> = ["A", "B", "C"]
            .into_iter()
            .map(|id| {
                Arc::new(Traced {
                    id,
                    trace: Rc::clone(&trace),
                }) as Arc<dyn Step>
            })
            .collect();

        let handler_trace = Rc::clone(&trace);
        run(
            &steps,
            Box::new(move || {
                handler_trace.borrow_mut().push("handler".to_string());
                Ok(String::new())
            }),
        )
        .unwrap();

        assert_eq!(
            *trace.borrow(),
            vec!["A-before", "B-before", "C-before", "handler", "C-after", "B-after", "A-after"]
        );
    }

    #[test]
    fn wraps_outermost_first() {
        let steps: Vec<Arc<dyn Step>> = vec![Arc::new(Wrap { id: "a" }), Arc::new(Wrap { id: "b" })];

        let out = run(&steps, Box::new(|| Ok("h".to_string()))).unwrap();
        assert_eq!(out, "a(b(h))");
    }

    #[test]
    fn no_middlewares_is_the_terminal_itself() {
        let out = run(&[], Box::new(|| Ok("terminal".to_string()))).unwrap();
        assert_eq!(out, "terminal");
    }

    #[test]
    fn short_circuit_skips_the_rest() {
        let reached = RefCell::new(false);
        let steps: Vec<Arc<dyn Step>> = vec![
            Arc::new(Wrap { id: "a" }),
            Arc::new(ShortCircuit),
            Arc::new(Wrap { id: "c" }),
        ];

        let out = run(
            &steps,
            Box::new(|| {
                *reached.borrow_mut() = true;
                Ok("h".to_string())
            }),
        )
        .unwrap();

        assert_eq!(out, "a(cached)");
        assert!(!*reached.borrow());
    }

    #[test]
    fn error_unwinds_without_reaching_terminal() {
        let reached = RefCell::new(false);
        let steps: Vec<Arc<dyn Step>> = vec![Arc::new(Wrap { id: "a" }), Arc::new(Failing)];

        let err = run(
            &steps,
            Box::new(|| {
                *reached.borrow_mut() = true;
                Ok("h".to_string())
            }),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "boom");
        assert!(!*reached.borrow());
    }

    #[test]
    fn next_can_be_called_more_than_once() {
        let calls = RefCell::new(0);
        let steps: Vec<Arc<dyn Step>> = vec![Arc::new(Twice)];

        let out = run(
            &steps,
            Box::new(|| {
                *calls.borrow_mut() += 1;
                Ok(calls.borrow().to_string())
            }),
        )
        .unwrap();

        assert_eq!(out, "1+2");
    }
}
