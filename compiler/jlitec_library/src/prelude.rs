//! `Object`, `String` and the boxed wrapper classes.

use std::sync::Arc;

use jlitec_reflection::{
    Executable, Frame, LibraryClass, Object, Throw, Value,
};

/// The root class. Its only method, `toString()`, answers the runtime class
/// identifier of the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectClass;

impl ObjectClass {
    fn class_identifier(frame: &mut Frame) -> Result<Value, Throw> {
        match &frame.this {
            Value::Object(object) => {
                Ok(Value::String(object.read().class_identifier.clone()))
            }
            Value::String(_) => Ok(Value::from("String")),
            Value::Null => Err(Throw::NullReceiver),
            other => Err(Throw::ArgumentType { index: 0, found: other.to_string() }),
        }
    }
}

impl LibraryClass for ObjectClass {
    fn signature(&self) -> String { "public class Object".to_owned() }

    fn methods(&self) -> Vec<(String, Executable)> {
        vec![(
            "public String toString()".to_owned(),
            Executable::Native(Self::class_identifier),
        )]
    }

    fn attributes(&self) -> Vec<String> { Vec::new() }
}

/// Strings are immutable values of the runtime; the class only exposes the
/// methods that can be called on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringClass;

fn receiver_string(frame: &Frame) -> Result<Arc<str>, Throw> {
    match &frame.this {
        Value::String(string) => Ok(string.clone()),
        Value::Null => Err(Throw::NullReceiver),
        other => Err(Throw::ArgumentType { index: 0, found: other.to_string() }),
    }
}

impl StringClass {
    fn length(frame: &mut Frame) -> Result<Value, Throw> {
        let string = receiver_string(frame)?;

        Ok(Value::Int(i32::try_from(string.chars().count()).unwrap_or(i32::MAX)))
    }

    fn char_at(frame: &mut Frame) -> Result<Value, Throw> {
        let string = receiver_string(frame)?;

        let index = match frame.argument(0)? {
            Value::Int(index) => *index,
            other => {
                return Err(Throw::ArgumentType {
                    index: 0,
                    found: other.to_string(),
                })
            }
        };

        usize::try_from(index)
            .ok()
            .and_then(|x| string.chars().nth(x))
            .map(Value::Char)
            .ok_or_else(|| {
                Throw::exception(
                    "IndexOutOfBoundsException",
                    format!(
                        "index {index} out of bounds for length {}",
                        string.chars().count()
                    ),
                )
            })
    }

    fn is_empty(frame: &mut Frame) -> Result<Value, Throw> {
        Ok(Value::Boolean(receiver_string(frame)?.is_empty()))
    }

    fn equals(frame: &mut Frame) -> Result<Value, Throw> {
        let string = receiver_string(frame)?;

        Ok(Value::Boolean(*frame.argument(0)? == Value::String(string)))
    }

    fn identity(frame: &mut Frame) -> Result<Value, Throw> {
        receiver_string(frame).map(Value::String)
    }
}

impl LibraryClass for StringClass {
    fn signature(&self) -> String { "public final class String".to_owned() }

    fn methods(&self) -> Vec<(String, Executable)> {
        vec![
            ("public int length()".to_owned(), Executable::Native(Self::length)),
            (
                "public char charAt(int index)".to_owned(),
                Executable::Native(Self::char_at),
            ),
            (
                "public boolean isEmpty()".to_owned(),
                Executable::Native(Self::is_empty),
            ),
            (
                "public boolean equals(Object other)".to_owned(),
                Executable::Native(Self::equals),
            ),
            (
                "public String toString()".to_owned(),
                Executable::Native(Self::identity),
            ),
        ]
    }

    fn attributes(&self) -> Vec<String> { Vec::new() }
}

/// Declares a boxed wrapper class: one private `value` attribute, an
/// unboxing accessor, a static `valueOf` factory and optional static
/// constants.
macro_rules! boxed {
    (
        $(#[$attribute:meta])*
        $name:ident {
            identifier: $identifier:literal,
            primitive: $primitive:literal,
            variant: $variant:ident,
            accessor: $accessor:literal,
            statics: [$($constant:literal = $value:expr),* $(,)?] $(,)?
        }
    ) => {
        $(#[$attribute])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl $name {
            fn unbox(frame: &mut Frame) -> Result<Value, Throw> {
                frame.attribute(0)
            }

            fn value_of(frame: &mut Frame) -> Result<Value, Throw> {
                match frame.argument(0)? {
                    value @ Value::$variant(_) => Ok(Value::Object(
                        Object::new_ref($identifier, vec![value.clone()]),
                    )),
                    other => Err(Throw::ArgumentType {
                        index: 0,
                        found: other.to_string(),
                    }),
                }
            }
        }

        impl LibraryClass for $name {
            fn signature(&self) -> String {
                concat!("public final class ", $identifier).to_owned()
            }

            fn methods(&self) -> Vec<(String, Executable)> {
                vec![
                    (
                        concat!("public ", $primitive, " ", $accessor, "()")
                            .to_owned(),
                        Executable::Native(Self::unbox),
                    ),
                    (
                        concat!(
                            "public static ",
                            $identifier,
                            " valueOf(",
                            $primitive,
                            " value)"
                        )
                        .to_owned(),
                        Executable::Native(Self::value_of),
                    ),
                ]
            }

            fn attributes(&self) -> Vec<String> {
                vec![
                    concat!("private ", $primitive, " value").to_owned(),
                    $(
                        concat!(
                            "public static final ",
                            $primitive,
                            " ",
                            $constant
                        )
                        .to_owned(),
                    )*
                ]
            }

            fn static_values(&self) -> Vec<(String, Value)> {
                vec![$(($constant.to_owned(), Value::$variant($value))),*]
            }
        }
    };
}

boxed! {
    /// Boxes `int`.
    IntegerClass {
        identifier: "Integer",
        primitive: "int",
        variant: Int,
        accessor: "intValue",
        statics: ["MAX_VALUE" = i32::MAX, "MIN_VALUE" = i32::MIN],
    }
}

boxed! {
    /// Boxes `long`.
    LongClass {
        identifier: "Long",
        primitive: "long",
        variant: Long,
        accessor: "longValue",
        statics: ["MAX_VALUE" = i64::MAX, "MIN_VALUE" = i64::MIN],
    }
}

boxed! {
    /// Boxes `float`.
    FloatClass {
        identifier: "Float",
        primitive: "float",
        variant: Float,
        accessor: "floatValue",
        statics: [],
    }
}

boxed! {
    /// Boxes `double`.
    DoubleClass {
        identifier: "Double",
        primitive: "double",
        variant: Double,
        accessor: "doubleValue",
        statics: [],
    }
}

boxed! {
    /// Boxes `boolean`.
    BooleanClass {
        identifier: "Boolean",
        primitive: "boolean",
        variant: Boolean,
        accessor: "booleanValue",
        statics: [],
    }
}

boxed! {
    /// Boxes `char`.
    CharacterClass {
        identifier: "Character",
        primitive: "char",
        variant: Char,
        accessor: "charValue",
        statics: [],
    }
}
