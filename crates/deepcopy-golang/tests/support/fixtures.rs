use deepcopy_core::types::{Field, Primitive, TypeArena, TypeId, TypeKind};

pub const LOCAL: &str = "github.com/cpuguy83/go-generate/deepcopy";
pub const FIXTURES: &str = "github.com/cpuguy83/go-generate/deepcopy/fixtures";
pub const FIXTURES_ALIAS: &str = "github_com_cpuguy83_go_generate_deepcopy_fixtures";

/// A local package plus a `fixtures` package mirroring the kinds of types callers
/// usually import: exported and unexported types, types with their own `Copy`, and
/// structs hiding reference-typed fields.
pub struct Fixtures {
    pub arena: TypeArena,
    pub string: TypeId,
    pub int: TypeId,
    /// `type simpleStruct struct { A string; b string }`
    pub simple: TypeId,
    /// `fixtures.Foo { A string; B map[string]string }`
    pub foo: TypeId,
    /// `fixtures.bar { Z string }`
    pub bar: TypeId,
    /// `fixtures.Baz { B *bar }`
    pub baz: TypeId,
    /// `fixtures.Quux { a string }`
    pub quux: TypeId,
    /// `fixtures.Banana { a map[string]string }`
    pub banana: TypeId,
    /// `fixtures.Apple { A string }` with `func (*Apple) Copy() *Apple`
    pub apple: TypeId,
    pub apple_ptr: TypeId,
    /// `fixtures.Apricot { A string }` with `func (Apricot) Copy() Apricot`
    pub apricot: TypeId,
    /// `fixtures.StrSlice []string`
    pub str_slice: TypeId,
}

impl Fixtures {
    pub fn new() -> Self {
        let mut arena = TypeArena::new();
        let string = arena.string();
        let int = arena.primitive(Primitive::Int);
        let string_map = arena.map(string, string);

        let simple = arena.named(
            LOCAL,
            "simpleStruct",
            TypeKind::Record {
                fields: vec![Field::new("A", string), Field::new("b", string)],
            },
        );
        let foo = arena.named(
            FIXTURES,
            "Foo",
            TypeKind::Record {
                fields: vec![Field::new("A", string), Field::new("B", string_map)],
            },
        );
        let bar = arena.named(
            FIXTURES,
            "bar",
            TypeKind::Record {
                fields: vec![Field::new("Z", string)],
            },
        );
        let bar_ptr = arena.pointer(bar);
        let baz = arena.named(
            FIXTURES,
            "Baz",
            TypeKind::Record {
                fields: vec![Field::new("B", bar_ptr)],
            },
        );
        let quux = arena.named(
            FIXTURES,
            "Quux",
            TypeKind::Record {
                fields: vec![Field::new("a", string)],
            },
        );
        let banana = arena.named(
            FIXTURES,
            "Banana",
            TypeKind::Record {
                fields: vec![Field::new("a", string_map)],
            },
        );
        let apple = arena.named(
            FIXTURES,
            "Apple",
            TypeKind::Record {
                fields: vec![Field::new("A", string)],
            },
        );
        let apple_ptr = arena.pointer(apple);
        arena.add_copy_method(apple_ptr, "Copy");
        let apricot = arena.named(
            FIXTURES,
            "Apricot",
            TypeKind::Record {
                fields: vec![Field::new("A", string)],
            },
        );
        arena.add_copy_method(apricot, "Copy");
        let str_slice = arena.named(FIXTURES, "StrSlice", TypeKind::Sequence { elem: string });

        Self {
            arena,
            string,
            int,
            simple,
            foo,
            bar,
            baz,
            quux,
            banana,
            apple,
            apple_ptr,
            apricot,
            str_slice,
        }
    }

    /// Declares a type in the local package.
    pub fn local(&mut self, name: &str, kind: TypeKind) -> TypeId {
        self.arena.named(LOCAL, name, kind)
    }

    pub fn local_struct(&mut self, name: &str, fields: Vec<Field>) -> TypeId {
        self.local(name, TypeKind::Record { fields })
    }
}
