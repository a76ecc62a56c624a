//! Ordered execution of named steps that stops at the first failure.

use std::error::Error;
use std::fmt;

/// A step in a sequence: a descriptive name and the action to run.
pub struct Step<'a, E> {
    pub name: String,
    action: Box<dyn FnMut() -> Result<(), E> + 'a>,
}

impl<'a, E> Step<'a, E> {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut() -> Result<(), E> + 'a,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }

    fn run(&mut self) -> Result<(), E> {
        (self.action)()
    }
}

impl<E> fmt::Debug for Step<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// The step that halted a [`sequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceError<E> {
    /// Position of the failed step (0 based) in the slice given to [`sequence`].
    pub index: usize,
    /// Name of the failed step.
    pub step: String,
    /// Error returned by the step's action.
    pub cause: E,
}

impl<E: fmt::Display> fmt::Display for SequenceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.step, self.cause)
    }
}

impl<E: Error + 'static> Error for SequenceError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

/// Runs `steps` in order and stops at the first one that fails.
/// Steps after the failing one are never invoked.
pub fn sequence<E>(steps: &mut [Step<'_, E>]) -> Result<(), SequenceError<E>> {
    for (index, step) in steps.iter_mut().enumerate() {
        if let Err(cause) = step.run() {
            tracing::debug!(index, step = %step.name, "sequence stopped");
            return Err(SequenceError {
                index,
                step: step.name.clone(),
                cause,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn step(name: &str, result: Result<(), &'static str>) -> Step<'static, &'static str> {
        Step::new(name, move || result)
    }

    #[test]
    fn one_step_no_error() {
        assert!(sequence(&mut [step("one", Ok(()))]).is_ok());
    }

    #[test]
    fn no_steps_is_ok() {
        let mut steps: Vec<Step<'_, &str>> = Vec::new();
        assert!(sequence(&mut steps).is_ok());
    }

    #[test]
    fn one_step_one_error() {
        let err = sequence(&mut [step("one", Err("Foo"))]).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.step, "one");
        assert_eq!(err.cause, "Foo");
    }

    #[test]
    fn two_steps_first_error() {
        let err = sequence(&mut [step("one", Err("Foo")), step("two", Ok(()))]).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.step, "one");
    }

    #[test]
    fn two_steps_second_error() {
        let mut steps = [step("one", Ok(())), step("two", Err("Foo"))];
        let err = sequence(&mut steps).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(steps[err.index].name, err.step);
        assert_eq!(err.cause, "Foo");
    }

    #[test]
    fn steps_after_failure_never_run() {
        let ran = Cell::new([false; 3]);
        let mark = |i: usize| {
            let mut seen = ran.get();
            seen[i] = true;
            ran.set(seen);
        };
        let mut steps = [
            Step::new("first", || {
                mark(0);
                Ok(())
            }),
            Step::new("second", || {
                mark(1);
                Err("Y")
            }),
            Step::new("third", || {
                mark(2);
                Ok(())
            }),
        ];
        let err = sequence(&mut steps).unwrap_err();
        assert_eq!((err.index, err.cause), (1, "Y"));
        assert_eq!(ran.get(), [true, true, false]);
    }

    #[test]
    fn display_names_step_and_cause() {
        let err = SequenceError {
            index: 1,
            step: "step".to_string(),
            cause: "Foo",
        };
        assert_eq!(err.to_string(), "step failed: Foo");
    }
}
