use std::sync::Arc;

use jlitec_arena::ID;
use jlitec_handler::Storage;
use jlitec_reflection::{
    Declaration, Executable, Frame, LibraryClass, Throw, Value,
};
use jlitec_term::{
    class_like::{ClassLike, Visibility},
    library::{Invocation, Library},
    r#type::{Primitive, Type},
};
use proptest::{prop_assert, prop_assert_eq, prop_assert_ne, proptest};

use crate::{
    diagnostic::{
        CyclicInheritance, Diagnostic, ExpectedType, ImplementsOnInterface,
        InvalidSupertype, MismatchedGenericArgumentCount, MisplacedEllipsis,
        MultipleSuperclasses, RedefinedClassLike, SpecializationDepthExceeded,
        SupertypeKind, UnknownStaticValue, UnknownType,
        UnrecognizedDeclarationKeyword,
    },
    Error, Options,
};

#[allow(clippy::unnecessary_wraps)]
fn nothing(_: &mut Frame) -> Result<Value, Throw> { Ok(Value::Null) }

fn native() -> Executable { Executable::Native(nothing) }

fn compile_with(
    declarations: impl IntoIterator<Item = Arc<dyn LibraryClass>>,
    options: &Options,
) -> (Result<Library, Error>, Vec<Box<dyn Diagnostic>>) {
    let declarations = declarations.into_iter().collect::<Vec<_>>();
    let storage = Storage::<Box<dyn Diagnostic>>::new();

    let result = crate::compile(&declarations, options, &storage);

    (result, storage.into_vec())
}

/// Compiles the declarations on top of the prelude with default options.
fn build_library(
    declarations: impl IntoIterator<Item = Declaration>,
) -> (Library, Vec<Box<dyn Diagnostic>>) {
    let (library, diagnostics) = compile_with(
        declarations
            .into_iter()
            .map(|x| Arc::new(x) as Arc<dyn LibraryClass>),
        &Options::default(),
    );

    (library.unwrap(), diagnostics)
}

fn find<T: 'static>(diagnostics: &[Box<dyn Diagnostic>]) -> Vec<&T> {
    diagnostics.iter().filter_map(|x| x.as_any().downcast_ref::<T>()).collect()
}

fn id(library: &Library, identifier: &str) -> ID<ClassLike> {
    library.get_by_identifier(identifier).unwrap()
}

fn class_like<'a>(library: &'a Library, identifier: &str) -> &'a ClassLike {
    library.class_like(id(library, identifier)).unwrap()
}

fn attribute_type(library: &Library, class: &str, attribute: &str) -> Type {
    class_like(library, class).attribute(attribute).unwrap().r#type.clone()
}

#[test]
fn prelude_compiles_without_diagnostics() {
    let (library, diagnostics) = build_library([]);

    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let object = id(&library, "Object");
    assert_eq!(class_like(&library, "Object").superclass(), None);
    assert_eq!(class_like(&library, "String").superclass(), Some(object));
    assert!(class_like(&library, "String").is_final);
    assert_eq!(
        library.static_value(id(&library, "Integer"), "MAX_VALUE"),
        Some(&Value::Int(i32::MAX))
    );
    assert_eq!(
        library.static_value(id(&library, "Long"), "MIN_VALUE"),
        Some(&Value::Long(i64::MIN))
    );

    // every `toString()` override makes the root method virtual
    assert!(class_like(&library, "Object").method("toString()").unwrap().is_virtual);
    assert!(!class_like(&library, "String").method("toString()").unwrap().is_virtual);
}

#[test]
fn exception_round_trip() {
    let (result, diagnostics) = compile_with(
        jlitec_library::standard_library(),
        &Options::default(),
    );
    let library = result.unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let throwable = id(&library, "Throwable");
    let exception = id(&library, "Exception");

    assert_eq!(class_like(&library, "Throwable").layout.first_attribute_index, 0);
    assert_eq!(class_like(&library, "Exception").layout.first_attribute_index, 1);
    assert_eq!(
        class_like(&library, "ArithmeticException").layout.first_attribute_index,
        1
    );

    let effective = library
        .effective_methods(exception)
        .into_iter()
        .map(|(declarer, x)| (declarer, x.signature.clone()))
        .collect::<Vec<_>>();
    assert!(effective.contains(&(throwable, "Throwable(String)".to_owned())));
    assert!(effective.contains(&(throwable, "getMessage()".to_owned())));

    let object = library.instantiate(exception).unwrap();
    let frame = Frame {
        this: Value::Object(object.clone()),
        arguments: vec![Value::from("division by zero")],
        first_attribute_index: 0,
    };

    assert_eq!(
        library.invoke(exception, "Throwable(String)", frame),
        Ok(Invocation::Returned(Value::Object(object.clone())))
    );
    assert_eq!(
        library.invoke(
            exception,
            "getMessage()",
            Frame {
                this: Value::Object(object),
                arguments: Vec::new(),
                first_attribute_index: 0,
            }
        ),
        Ok(Invocation::Returned(Value::from("division by zero")))
    );
}

#[test]
fn layout_follows_superclass() {
    let (library, diagnostics) = build_library([
        Declaration::new("class Square extends Shape")
            .with_attribute("private int side")
            .with_attribute("public static int count"),
        Declaration::new("abstract class Shape")
            .with_attribute("private String name")
            .with_attribute("private double area"),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let shape = class_like(&library, "Shape");
    let square = class_like(&library, "Square");

    assert_eq!(shape.attribute_count(), 2);
    assert_eq!(square.layout.first_attribute_index, 2);
    assert_eq!(square.attribute("side").unwrap().index, 2);
    assert_eq!(square.attribute("count").unwrap().index, 0);
    assert_eq!(square.layout.initial_values, vec![
        Value::Null,
        Value::Double(0.0),
        Value::Int(0)
    ]);
    assert_eq!(square.layout.static_values, vec![Value::Int(0)]);
    assert!(shape.is_abstract());
}

proptest! {
    #[test]
    fn layout_is_monotonic(counts in proptest::collection::vec(0usize..4, 1..6)) {
        let declarations = counts.iter().enumerate().map(|(level, count)| {
            let header = if level == 0 {
                "class C0".to_owned()
            } else {
                format!("class C{level} extends C{}", level - 1)
            };

            (0..*count).fold(Declaration::new(header), |declaration, slot| {
                declaration
                    .with_attribute(format!("public int a{slot}"))
                    .with_attribute(format!("public static long s{slot}"))
            })
        });

        let (library, diagnostics) = build_library(declarations.rev());
        prop_assert!(diagnostics.is_empty());

        let mut expected_first = 0;
        for (level, count) in counts.iter().enumerate() {
            let class = class_like(&library, &format!("C{level}"));

            prop_assert_eq!(class.layout.first_attribute_index, expected_first);
            for slot in 0..*count {
                prop_assert_eq!(
                    class.attribute(&format!("a{slot}")).unwrap().index,
                    expected_first + slot
                );
                prop_assert_eq!(
                    class.attribute(&format!("s{slot}")).unwrap().index,
                    slot
                );
            }

            expected_first += count;
            prop_assert_eq!(class.attribute_count(), expected_first);
            prop_assert_eq!(class.layout.initial_values.len(), expected_first);
        }
    }
}

#[test]
fn mutually_recursive_bounds_in_either_order() {
    let a = || Declaration::new("class A<T extends B<Integer>>");
    let b = || Declaration::new("class B<T extends A<Integer>>");

    for declarations in [[a(), b()], [b(), a()]] {
        let (library, diagnostics) = build_library(declarations);
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");

        for (owner, bound) in [("A", "B"), ("B", "A")] {
            let parameter = class_like(&library, owner).generic_parameters[0];
            let extends =
                &library.generic_parameter(parameter).unwrap().extends;

            let [Type::ClassLike(bound_id)] = extends.as_slice() else {
                panic!("unexpected bounds {extends:?}");
            };

            assert_eq!(library.base_of(*bound_id), id(&library, bound));
            assert_eq!(
                library.class_like(*bound_id).unwrap().signature(),
                format!("{bound}<Integer>")
            );
            assert_eq!(
                library.cached(&format!("{bound}<Integer>")),
                Some(*bound_id)
            );
        }
    }
}

#[test]
fn forward_references_between_members() {
    let (library, diagnostics) = build_library([
        Declaration::new("class Node")
            .with_attribute("public Tree owner")
            .with_method("public Node next()", native()),
        Declaration::new("class Tree").with_attribute("public Node root"),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    assert_eq!(
        attribute_type(&library, "Node", "owner"),
        Type::ClassLike(id(&library, "Tree"))
    );
    assert_eq!(
        attribute_type(&library, "Tree", "root"),
        Type::ClassLike(id(&library, "Node"))
    );
}

#[test]
fn generic_bounds() {
    let (library, diagnostics) = build_library([
        Declaration::new("interface Comparable<T>"),
        Declaration::new("interface Cloneable"),
        Declaration::new(
            "class Sorted<T extends Comparable<T> & Cloneable, U super T>",
        ),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let sorted = class_like(&library, "Sorted");
    let [t, u] = sorted.generic_parameters.as_slice() else {
        panic!("expected two generic parameters");
    };

    let t_parameter = library.generic_parameter(*t).unwrap();
    assert_eq!(t_parameter.identifier, "T");
    assert_eq!(t_parameter.owner, id(&library, "Sorted"));
    assert_eq!(t_parameter.extends.len(), 2);
    assert_eq!(library.signature_of(&t_parameter.extends[0]), "Comparable<T>");
    assert_eq!(t_parameter.extends[1], Type::ClassLike(id(&library, "Cloneable")));

    // `Comparable<T>` mentions `T`, so it's cached by `Sorted` only
    assert!(library.cached("Comparable<T>").is_none());
    assert_eq!(
        sorted.local_cache.get("Comparable<Sorted.T>").copied().map(Type::ClassLike),
        Some(t_parameter.extends[0].clone())
    );

    let u_parameter = library.generic_parameter(*u).unwrap();
    assert_eq!(u_parameter.super_bound, Some(Type::Parameter(*t)));
    assert!(u_parameter.extends.is_empty());
}

#[test]
fn generic_parameter_shadowing_a_class_like() {
    let (library, diagnostics) = build_library([
        Declaration::new("class T"),
        Declaration::new("class List<E>"),
        Declaration::new("class Holder").with_attribute("public List<T> a"),
        Declaration::new("class Foo<T>").with_attribute("public List<T> b"),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let a = *attribute_type(&library, "Holder", "a").as_class_like().unwrap();
    let b = *attribute_type(&library, "Foo", "b").as_class_like().unwrap();
    assert_ne!(a, b);

    let arguments_of = |specialized| {
        library
            .class_like(specialized)
            .and_then(|x| x.specialization.as_ref())
            .map(|x| x.arguments.clone())
            .unwrap()
    };

    let foo = class_like(&library, "Foo");
    assert_eq!(arguments_of(a), vec![Type::ClassLike(id(&library, "T"))]);
    assert_eq!(arguments_of(b), vec![Type::Parameter(foo.generic_parameters[0])]);

    assert_eq!(library.cached("List<T>"), Some(a));
    assert_eq!(foo.local_cache.get("List<Foo.T>").copied(), Some(b));
}

#[test]
fn open_instantiations_are_cached_per_context() {
    let (library, diagnostics) = build_library([
        Declaration::new("interface List<E>")
            .with_method("public abstract E get(int index)", native()),
        Declaration::new("class ArrayList<E> implements List<E>")
            .with_method("public E get(int index)", native()),
        Declaration::new("class Bag<E>").with_attribute("public List<E> items"),
        Declaration::new("class Registry")
            .with_attribute("public List<String> first")
            .with_attribute("public List<String> second")
            .with_attribute("public ArrayList<String> concrete"),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let array_list = class_like(&library, "ArrayList");
    let from_array_list = array_list.local_cache["List<ArrayList.E>"];
    let from_bag = class_like(&library, "Bag").local_cache["List<Bag.E>"];

    assert_ne!(from_array_list, from_bag);
    assert_eq!(array_list.kind.as_class().unwrap().interfaces, vec![
        from_array_list
    ]);

    let first = attribute_type(&library, "Registry", "first");
    assert_eq!(first, attribute_type(&library, "Registry", "second"));
    assert_eq!(Some(first.clone()), library.cached("List<String>").map(Type::ClassLike));

    // `ArrayList<String>` implements the very same `List<String>`
    let concrete = *attribute_type(&library, "Registry", "concrete")
        .as_class_like()
        .unwrap();
    let concrete_class = library.class_like(concrete).unwrap();
    assert_eq!(
        concrete_class.kind.as_class().unwrap().interfaces,
        vec![*first.as_class_like().unwrap()]
    );
    assert!(library.can_cast_to(&Type::ClassLike(concrete), &first));
    assert!(!library.can_cast_to(&first, &Type::ClassLike(concrete)));
}

#[test]
fn materialized_members_are_substituted() {
    let (library, diagnostics) = build_library([
        Declaration::new("class Box<T>")
            .with_attribute("private T value")
            .with_method("public Box(T value)", native())
            .with_method("public T get()", native())
            .with_method("public Box<T> with(T value)", native()),
        Declaration::new("class Holder").with_attribute("public Box<Integer> boxed"),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let integer = Type::ClassLike(id(&library, "Integer"));
    let boxed = *attribute_type(&library, "Holder", "boxed").as_class_like().unwrap();
    let specialization = library.class_like(boxed).unwrap();

    assert!(specialization.specialization.as_ref().unwrap().is_materialized);
    assert_eq!(specialization.signature(), "Box<Integer>");
    assert_eq!(specialization.identifier, "Box");
    assert!(specialization.generic_parameters.is_empty());
    assert_eq!(specialization.attribute("value").unwrap().r#type, integer);
    assert_eq!(
        specialization.method("get()").unwrap().return_type,
        Some(integer.clone())
    );
    assert!(specialization.method("Box(Integer)").unwrap().is_constructor());

    // `Box<T>` inside `Box<Integer>` becomes `Box<Integer>` itself
    assert_eq!(
        specialization.method("with(Integer)").unwrap().return_type,
        Some(Type::ClassLike(boxed))
    );
    assert_eq!(
        specialization.superclass(),
        Some(id(&library, "Object"))
    );
    assert_eq!(
        specialization.layout,
        class_like(&library, "Box").layout
    );

    let object = library.instantiate(boxed).unwrap();
    assert_eq!(object.read().attributes, vec![Value::Null]);
    assert!(library.is_subtype(boxed, id(&library, "Box")));
}

proptest! {
    #[test]
    fn canonicalization_identity(first in 0usize..4, second in 0usize..4) {
        const ARGUMENTS: [&str; 4] = ["Integer", "String", "Box<Integer>", "Box<String>"];

        let (x, y) = (ARGUMENTS[first], ARGUMENTS[second]);
        let (library, diagnostics) = build_library([
            Declaration::new("class Box<T>"),
            Declaration::new("class Pair<A, B>"),
            Declaration::new("class Holder")
                .with_attribute(format!("public Pair<{x}, {y}> left"))
                .with_attribute(format!("public Pair<{x},{y}> right"))
                .with_attribute(format!("public Pair<{y}, {x}> swapped")),
        ]);
        prop_assert!(diagnostics.is_empty());

        let left = attribute_type(&library, "Holder", "left");
        let right = attribute_type(&library, "Holder", "right");
        let swapped = attribute_type(&library, "Holder", "swapped");

        prop_assert_eq!(&left, &right);
        prop_assert_eq!(library.signature_of(&left), format!("Pair<{x}, {y}>"));

        if x == y {
            prop_assert_eq!(&left, &swapped);
        } else {
            prop_assert_ne!(&left, &swapped);
        }
    }
}

#[test]
fn overriding_flags_virtual_methods() {
    let (library, diagnostics) = build_library([
        Declaration::new("interface Comparable<T>")
            .with_method("public abstract int compareTo(T other)", native()),
        Declaration::new("class Version implements Comparable<Version>")
            .with_method("public int compareTo(Version other)", native())
            .with_method("public static Version parse(String text)", native()),
        Declaration::new("class Base").with_method("public Object describe()", native()),
        Declaration::new("class Derived extends Base")
            .with_method("public String describe()", native()),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let comparable = class_like(&library, "Comparable");
    assert!(comparable.method("compareTo(T)").unwrap().is_virtual);

    let version = id(&library, "Version");
    let comparable_version = library.cached("Comparable<Version>").unwrap();
    assert!(library
        .class_like(comparable_version)
        .unwrap()
        .method("compareTo(Version)")
        .unwrap()
        .is_virtual);
    assert!(library.is_subtype(version, comparable_version));
    assert!(library.is_subtype(version, id(&library, "Comparable")));

    assert!(class_like(&library, "Base").method("describe()").unwrap().is_virtual);
    assert!(!class_like(&library, "Derived").method("describe()").unwrap().is_virtual);
    assert!(!class_like(&library, "Version").method("parse(String)").unwrap().is_virtual);
}

#[test]
fn modifier_order_does_not_matter() {
    let (library, diagnostics) = build_library([
        Declaration::new("class First").with_attribute("protected static final int x"),
        Declaration::new("class Second").with_attribute("static protected final int x"),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let first = class_like(&library, "First").attribute("x").unwrap();
    let second = class_like(&library, "Second").attribute("x").unwrap();

    assert_eq!(first, second);
    assert_eq!(first.visibility, Visibility::Protected);
    assert!(first.is_static);
    assert!(first.is_final);
    assert!(!first.is_transient);
    assert_eq!(first.r#type, Type::Primitive(Primitive::Int));
}

#[test]
fn unknown_type_falls_back_to_object() {
    let (library, diagnostics) = build_library([Declaration::new("class Widget")
        .with_attribute("public Gadget gadget")
        .with_attribute("public Gadget[] gadgets")]);

    let unknown = find::<UnknownType>(&diagnostics);
    assert_eq!(unknown.len(), 2);
    assert_eq!(unknown[0].identifier, "Gadget");

    let object = Type::ClassLike(id(&library, "Object"));
    assert_eq!(attribute_type(&library, "Widget", "gadget"), object);
    assert_eq!(
        attribute_type(&library, "Widget", "gadgets"),
        Type::array(object, 1)
    );
}

#[test]
fn missing_type_is_void() {
    let (library, diagnostics) = build_library([Declaration::new("class Widget")
        .with_method("public (int size)", native())]);

    assert_eq!(find::<ExpectedType>(&diagnostics).len(), 1);
    assert!(class_like(&library, "Widget").methods[0]
        .return_type
        .as_ref()
        .is_some_and(Type::is_void));
}

#[test]
fn constructors_and_variadics() {
    let (library, diagnostics) = build_library([Declaration::new("class Formatter")
        .with_method("public Formatter(String pattern)", native())
        .with_method(
            "public static String format(String pattern, Object... arguments)",
            native(),
        )
        .with_method("public void broken(int... values, int last)", native())]);

    let formatter = class_like(&library, "Formatter");

    let constructor = formatter.method("Formatter(String)").unwrap();
    assert!(constructor.is_constructor());
    assert_eq!(constructor.parameters[0].stack_position, 1);

    let format = formatter.method("format(String,Object...)").unwrap();
    assert!(format.has_ellipsis());
    assert!(format.is_static);
    assert_eq!(
        format.parameters.iter().map(|x| x.stack_position).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let misplaced = find::<MisplacedEllipsis>(&diagnostics);
    assert_eq!(misplaced.len(), 1);
    assert_eq!(misplaced[0].parameter, "values");
    assert!(!formatter.method("broken(int,int)").unwrap().has_ellipsis());
}

#[test]
fn enums() {
    let (library, diagnostics) = build_library([
        Declaration::new("interface Shade"),
        Declaration::new("public enum Color implements Shade")
            .with_enum_constant("RED")
            .with_enum_constant("GREEN")
            .with_method("public int ordinal()", native()),
        Declaration::new("enum Broken extends Object"),
    ]);

    let color = class_like(&library, "Color");
    let enumeration = color.kind.as_enum().unwrap();

    assert_eq!(enumeration.interfaces, vec![id(&library, "Shade")]);
    assert_eq!(
        enumeration
            .constants
            .iter()
            .map(|x| (x.identifier.as_str(), x.ordinal))
            .collect::<Vec<_>>(),
        vec![("RED", 0), ("GREEN", 1)]
    );
    assert!(library.instantiate(id(&library, "Color")).is_err());

    let invalid = find::<InvalidSupertype>(&diagnostics);
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].expected, SupertypeKind::Nothing);
}

#[test]
fn every_class_like_inherits_to_string() {
    let (library, diagnostics) = build_library([
        Declaration::new("interface Shape"),
        Declaration::new("enum Color").with_enum_constant("RED"),
    ]);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");

    let object = id(&library, "Object");

    for identifier in ["Shape", "Color"] {
        let effective = library
            .effective_methods(id(&library, identifier))
            .into_iter()
            .map(|(declarer, x)| (declarer, x.signature.clone()))
            .collect::<Vec<_>>();

        assert!(
            effective.contains(&(object, "toString()".to_owned())),
            "{identifier}: {effective:?}"
        );
    }
}

#[test]
fn second_superclass_is_reported() {
    let (library, diagnostics) = build_library([
        Declaration::new("class A"),
        Declaration::new("class B"),
        Declaration::new("class C extends A, B"),
    ]);

    let multiple = find::<MultipleSuperclasses>(&diagnostics);
    assert_eq!(multiple.len(), 1);
    assert_eq!(multiple[0].existing, id(&library, "A"));
    assert_eq!(multiple[0].ignored, id(&library, "B"));

    assert_eq!(class_like(&library, "C").superclass(), Some(id(&library, "A")));
}

#[test]
fn invalid_supertype_clauses() {
    let (library, diagnostics) = build_library([
        Declaration::new("interface Runnable"),
        Declaration::new("interface Task implements Runnable"),
        Declaration::new("class Job extends Runnable implements Object"),
        Declaration::new("interface Step extends String"),
    ]);

    assert_eq!(find::<ImplementsOnInterface>(&diagnostics).len(), 1);

    let expected = find::<InvalidSupertype>(&diagnostics)
        .into_iter()
        .map(|x| x.expected)
        .collect::<Vec<_>>();
    assert_eq!(expected, vec![
        SupertypeKind::Class,
        SupertypeKind::Interface,
        SupertypeKind::Interface
    ]);

    // rejected clauses leave the default hierarchy in place
    let job = class_like(&library, "Job");
    assert_eq!(job.superclass(), Some(id(&library, "Object")));
    assert!(job.kind.as_class().unwrap().interfaces.is_empty());
    assert!(class_like(&library, "Task").supertypes().is_empty());
}

#[test]
fn redefinition_keeps_first_declaration() {
    let (library, diagnostics) = build_library([
        Declaration::new("class Point").with_attribute("public int x"),
        Declaration::new("interface Point"),
    ]);

    let redefined = find::<RedefinedClassLike>(&diagnostics);
    assert_eq!(redefined.len(), 1);
    assert_eq!(redefined[0].existing, id(&library, "Point"));
    assert!(class_like(&library, "Point").kind.is_class());
}

#[test]
fn cyclic_inheritance_is_broken() {
    let (library, diagnostics) = build_library([
        Declaration::new("class A extends B").with_attribute("public int a"),
        Declaration::new("class B extends A").with_attribute("public int b"),
    ]);

    assert_eq!(find::<CyclicInheritance>(&diagnostics).len(), 1);
    assert_eq!(class_like(&library, "A").superclass(), Some(id(&library, "Object")));
    assert_eq!(class_like(&library, "B").layout.first_attribute_index, 1);
}

#[test]
fn static_values() {
    let (library, diagnostics) = build_library([Declaration::new("class Limits")
        .with_attribute("public static final int LIMIT")
        .with_attribute("public int current")
        .with_static_value("LIMIT", Value::Int(64))
        .with_static_value("current", Value::Int(1))]);

    let limits = id(&library, "Limits");
    assert_eq!(library.static_value(limits, "LIMIT"), Some(&Value::Int(64)));
    assert_eq!(library.static_value(limits, "current"), None);
    assert_eq!(class_like(&library, "Limits").layout.initial_values, vec![
        Value::Int(0)
    ]);

    let unknown = find::<UnknownStaticValue>(&diagnostics);
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].identifier, "current");
}

#[test]
fn generic_argument_count_mismatch() {
    let (library, diagnostics) = build_library([
        Declaration::new("class Pair<A, B>"),
        Declaration::new("class Holder")
            .with_attribute("public Pair<Integer> half")
            .with_attribute("public Pair<Integer, String, Long> extra")
            .with_attribute("public String<Integer> plain"),
    ]);

    let mismatched = find::<MismatchedGenericArgumentCount>(&diagnostics);
    assert_eq!(
        mismatched.iter().map(|x| (x.expected, x.found)).collect::<Vec<_>>(),
        vec![(2, 1), (2, 3), (0, 1)]
    );
    assert!(mismatched.iter().all(|x| !x.strict));

    assert_eq!(
        library.signature_of(&attribute_type(&library, "Holder", "half")),
        "Pair<Integer, Object>"
    );
    assert_eq!(
        library.signature_of(&attribute_type(&library, "Holder", "extra")),
        "Pair<Integer, String>"
    );
    assert_eq!(
        attribute_type(&library, "Holder", "plain"),
        Type::ClassLike(id(&library, "String"))
    );
}

#[test]
fn strict_mode_aborts() {
    let declarations = || -> Vec<Arc<dyn LibraryClass>> {
        vec![
            Arc::new(Declaration::new("record Point")),
            Arc::new(Declaration::new("class Valid")),
        ]
    };

    let (result, diagnostics) = compile_with(declarations(), &Options::default());
    let library = result.unwrap();
    assert!(library.get_by_identifier("Valid").is_some());
    assert!(library.get_by_identifier("Point").is_none());
    assert!(!find::<UnrecognizedDeclarationKeyword>(&diagnostics)[0].strict);

    let strict = Options { strict: true, ..Options::default() };
    let (result, diagnostics) = compile_with(declarations(), &strict);

    assert_eq!(result.err(), Some(Error::Aborted(1)));
    assert!(find::<UnrecognizedDeclarationKeyword>(&diagnostics)[0].strict);
}

#[test]
fn specialization_depth_is_bounded() {
    let options = Options { max_specialization_depth: 3, ..Options::default() };
    let (result, diagnostics) = compile_with(
        [
            Declaration::new("class Node<T>").with_attribute("public Node<Node<T>> child"),
            Declaration::new("class Holder").with_attribute("public Node<Integer> root"),
        ]
        .map(|x| Arc::new(x) as Arc<dyn LibraryClass>),
        &options,
    );
    let library = result.unwrap();

    let exceeded = find::<SpecializationDepthExceeded>(&diagnostics);
    assert!(!exceeded.is_empty());
    assert!(exceeded.iter().all(|x| x.maximum == 3));

    let node = id(&library, "Node");
    assert!(library.class_likes().all(|(_, x)| {
        x.specialization.as_ref().is_none_or(|x| x.depth <= 3 && x.base == node)
    }));
    assert!(library.cached("Node<Node<Integer>>").is_some());
}

#[test]
fn options_from_toml() {
    let options = toml::from_str::<Options>("strict = true").unwrap();
    assert_eq!(options, Options { strict: true, max_specialization_depth: 8 });

    let options =
        toml::from_str::<Options>("max-specialization-depth = 2").unwrap();
    assert_eq!(options, Options { strict: false, max_specialization_depth: 2 });
}
