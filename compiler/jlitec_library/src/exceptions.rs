//! The standard throwable hierarchy.

use jlitec_reflection::{Executable, Frame, LibraryClass, Throw, Value};

/// The root of everything that can be thrown; stores the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Throwable;

impl Throwable {
    fn construct(frame: &mut Frame) -> Result<Value, Throw> {
        let message = frame.argument(0)?.clone();
        frame.set_attribute(0, message)?;

        Ok(frame.this.clone())
    }

    fn message(frame: &mut Frame) -> Result<Value, Throw> {
        frame.attribute(0)
    }
}

impl LibraryClass for Throwable {
    fn signature(&self) -> String { "class Throwable".to_owned() }

    fn methods(&self) -> Vec<(String, Executable)> {
        vec![
            (
                "public Throwable(String message)".to_owned(),
                Executable::Native(Self::construct),
            ),
            (
                "public String getMessage()".to_owned(),
                Executable::Native(Self::message),
            ),
        ]
    }

    fn attributes(&self) -> Vec<String> {
        vec!["private String message".to_owned()]
    }
}

/// Declares a memberless exception class.
macro_rules! exception {
    ($(#[$attribute:meta])* $name:ident extends $superclass:literal) => {
        $(#[$attribute])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl LibraryClass for $name {
            fn signature(&self) -> String {
                concat!("class ", stringify!($name), " extends ", $superclass)
                    .to_owned()
            }

            fn methods(&self) -> Vec<(String, Executable)> { Vec::new() }

            fn attributes(&self) -> Vec<String> { Vec::new() }
        }
    };
}

exception! {
    /// The base of all recoverable exceptions.
    Exception extends "Throwable"
}

exception! {
    /// Thrown by integral division by zero.
    ArithmeticException extends "Exception"
}

exception! {
    /// Thrown by a failing reference cast.
    ClassCastException extends "Exception"
}

exception! {
    /// Thrown by indexed access outside the valid range.
    IndexOutOfBoundsException extends "Exception"
}
