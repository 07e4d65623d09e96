use deepcopy_core::error::TypeErrorKind;
use deepcopy_core::types::{Field, Primitive, TypeDocument, TypeKind};
use deepcopy_core::{Result, RootNilPolicy, SynthesisOptions};
use deepcopy_golang::{synthesize, Synthesizer};
use support::assertions::{assert_go_eq, brace_balance};
use support::fixtures::{Fixtures, FIXTURES, LOCAL};

mod support;

#[test]
fn synthesis_is_deterministic() -> Result<()> {
    let mut fx = Fixtures::new();
    let foo_seq = fx.arena.sequence(fx.foo);
    let other = fx.arena.named(
        "example.com/other",
        "Thing",
        TypeKind::Record {
            fields: vec![Field::new("N", fx.int)],
        },
    );
    let other_map = fx.arena.map(fx.string, other);
    let root = fx.local_struct(
        "mixed",
        vec![
            Field::new("A", other_map),
            Field::new("B", foo_seq),
            Field::new("C", fx.str_slice),
        ],
    );

    let first = synthesize("o", &fx.arena, root, &[])?;
    let second = synthesize("o", &fx.arena, root, &[])?;
    assert_eq!(first, second);

    // imports are listed by path, not in the order they were met
    let fixtures_at = first.imports.find(FIXTURES).unwrap();
    let other_at = first.imports.find("example.com/other").unwrap();
    assert!(other_at < fixtures_at, "{}", first.imports);
    assert_eq!(first.imports.matches(FIXTURES).count(), 1);
    Ok(())
}

#[test]
fn nested_blocks_match_type_depth() -> Result<()> {
    let mut fx = Fixtures::new();
    let simple_ptr = fx.arena.pointer(fx.simple);
    let inner = fx.arena.sequence(simple_ptr);
    let root = fx.local("doubleSliceWithStructPtr", TypeKind::Sequence { elem: inner });

    let out = synthesize("o", &fx.arena, root, &[])?;
    assert_go_eq(
        &out.body,
        r#"
        func (o doubleSliceWithStructPtr) Copy() doubleSliceWithStructPtr {
            oCopy := make(doubleSliceWithStructPtr, len(o))
            for i0, v0 := range o {
                if v0 != nil {
                    oCopy[i0] = make([]*simpleStruct, len(v0))
                    for i1, v1 := range v0 {
                        if v1 != nil {
                            var oCopy01 simpleStruct
                            oCopy01 = *v1
                            oCopy[i0][i1] = &oCopy01
                        }
                    }
                }
            }

            return oCopy
        }
        "#,
    );
    assert_eq!(out.body.matches("!= nil {").count(), 2);
    assert_eq!(brace_balance(&out.body), 0);

    // closing braces come back out one indentation level at a time
    let depths: Vec<usize> = out
        .body
        .lines()
        .filter(|line| line.trim() == "}")
        .map(|line| line.len() - line.trim_start().len())
        .collect();
    assert_eq!(depths, vec![4, 3, 2, 1, 0]);
    Ok(())
}

#[test]
fn skipped_fields_never_appear() -> Result<()> {
    let mut fx = Fixtures::new();
    let map = fx.arena.map(fx.string, fx.string);
    let map_ptr = fx.arena.pointer(map);
    let empty = fx.arena.record(Vec::new());
    let chan = fx.arena.channel(empty);
    let root = fx.local_struct(
        "withSkips",
        vec![
            Field::new("Cache", map).skipped(),
            Field::new("Kept", map),
            Field::new("Ptr", map_ptr).with_tag(r#"json:"ptr" deepcopy:"skip""#),
            Field::new("Done", chan).skipped(),
        ],
    );

    let out = synthesize("o", &fx.arena, root, &[])?;
    assert!(!out.body.contains("Cache"));
    assert!(!out.body.contains("Ptr"));
    assert!(!out.body.contains("Done"));
    assert!(out.body.contains("oCopy.Kept = make(map[string]string, len(o.Kept))"));
    Ok(())
}

#[test]
fn custom_tag_key_controls_skipping() -> Result<()> {
    let mut fx = Fixtures::new();
    let map = fx.arena.map(fx.string, fx.string);
    let root = fx.local_struct(
        "tagged",
        vec![Field::new("A", map).with_tag(r#"clone:"skip""#)],
    );

    let default = synthesize("o", &fx.arena, root, &[])?;
    assert!(default.body.contains("o.A"));

    let options = SynthesisOptions {
        tag_key: "clone".to_string(),
        ..Default::default()
    };
    let custom = Synthesizer::new(options).synthesize("o", &fx.arena, root, &[])?;
    assert!(!custom.body.contains("o.A"));
    Ok(())
}

#[test]
fn copy_method_short_circuits_expansion() -> Result<()> {
    let mut fx = Fixtures::new();
    let map = fx.arena.map(fx.string, fx.string);
    let inner = fx.local_struct("inner", vec![Field::new("M", map)]);
    fx.arena.add_copy_method(inner, "Copy");
    let inner_seq = fx.arena.sequence(inner);
    let root = fx.local_struct(
        "outer",
        vec![Field::new("I", inner), Field::new("S", inner_seq)],
    );

    let out = synthesize("o", &fx.arena, root, &[])?;
    let lines: Vec<&str> = out
        .body
        .lines()
        .map(str::trim)
        .filter(|line| line.contains("o.I") || line.contains(".M"))
        .collect();
    assert_eq!(lines, vec!["oCopy.I = o.I.Copy()"]);
    assert!(out.body.contains("oCopy.S[i0] = v0.Copy()"));
    Ok(())
}

#[test]
fn mismatched_copy_signature_is_expanded() -> Result<()> {
    let mut fx = Fixtures::new();
    let map = fx.arena.map(fx.string, fx.string);
    let inner = fx.local_struct("inner", vec![Field::new("M", map)]);
    let inner_ptr = fx.arena.pointer(inner);
    // func (inner) Copy() *inner
    fx.arena.add_method(
        inner,
        deepcopy_core::types::Method {
            name: "Copy".to_string(),
            params: Vec::new(),
            results: vec![inner_ptr],
        },
    );
    let root = fx.local_struct("outer", vec![Field::new("I", inner)]);

    let out = synthesize("o", &fx.arena, root, &[])?;
    assert!(!out.body.contains(".Copy()"));
    assert!(out.body.contains("oCopy.I.M = make(map[string]string, len(o.I.M))"));
    Ok(())
}

#[test]
fn channels_are_rejected_anywhere() {
    let mut fx = Fixtures::new();
    let chan = fx.arena.channel(fx.int);
    let root_chan = fx.local(
        "events",
        TypeKind::Channel {
            elem: fx.int,
            dir: Default::default(),
        },
    );
    let chan_map = fx.arena.map(fx.string, chan);
    let chan_map_ptr = fx.arena.pointer(chan_map);
    let nested = fx.local_struct("nested", vec![Field::new("Subs", chan_map_ptr)]);

    for root in [root_chan, nested] {
        let err = synthesize("o", &fx.arena, root, &[]).unwrap_err();
        assert_eq!(err.cause(), Some(TypeErrorKind::UnsupportedType), "{}", err);
    }
}

#[test]
fn ignoring_an_unrelated_type_does_not_hide_errors() {
    let mut fx = Fixtures::new();
    let baz_ptr = fx.arena.pointer(fx.baz);
    let root = fx.local_struct("holder", vec![Field::new("A", baz_ptr)]);

    let err = synthesize("o", &fx.arena, root, &[fx.banana]).unwrap_err();
    assert!(err.is(TypeErrorKind::UnexportedType));
}

#[test]
fn pointer_root_is_nil_guarded_by_default() -> Result<()> {
    let mut fx = Fixtures::new();
    let root = fx.arena.pointer(fx.simple);

    let out = synthesize("o", &fx.arena, root, &[])?;
    assert_go_eq(
        &out.body,
        r#"
        func (o *simpleStruct) Copy() *simpleStruct {
            if o == nil {
                return nil
            }
            var oCopy simpleStruct
            oCopy = *o

            return &oCopy
        }
        "#,
    );
    Ok(())
}

#[test]
fn pointer_root_can_assume_non_nil() -> Result<()> {
    let mut fx = Fixtures::new();
    let root = fx.arena.pointer(fx.simple);
    let options = SynthesisOptions {
        root_nil: RootNilPolicy::Assume,
        ..Default::default()
    };

    let out = Synthesizer::new(options).synthesize("o", &fx.arena, root, &[])?;
    assert_go_eq(
        &out.body,
        r#"
        func (o *simpleStruct) Copy() *simpleStruct {
            var oCopy simpleStruct
            oCopy = *o

            return &oCopy
        }
        "#,
    );
    Ok(())
}

#[test]
fn pointer_root_fields_are_copied_into_the_local() -> Result<()> {
    let mut fx = Fixtures::new();
    let map = fx.arena.map(fx.string, fx.string);
    let node = fx.local_struct("node", vec![Field::new("Labels", map)]);
    let root = fx.arena.pointer(node);

    let out = synthesize("n", &fx.arena, root, &[])?;
    assert!(out.body.contains("nCopy.Labels = make(map[string]string, len(n.Labels))"));
    assert!(out.body.contains("return &nCopy"));
    Ok(())
}

#[test]
fn self_referential_types_are_reported() {
    let mut fx = Fixtures::new();
    let list = fx.arena.declare(LOCAL, "list");
    let list_ptr = fx.arena.pointer(list);
    fx.arena.define(
        list,
        TypeKind::Record {
            fields: vec![Field::new("Val", fx.int), Field::new("Next", list_ptr)],
        },
    );

    let err = synthesize("o", &fx.arena, list, &[]).unwrap_err();
    assert_eq!(err.cause(), Some(TypeErrorKind::CyclicType));
    assert!(err.to_string().contains("o.Next"), "{}", err);
}

#[test]
fn self_referential_type_with_copy_method_calls_through() -> Result<()> {
    let mut fx = Fixtures::new();
    let list = fx.arena.declare(LOCAL, "list");
    let list_ptr = fx.arena.pointer(list);
    fx.arena.define(
        list,
        TypeKind::Record {
            fields: vec![Field::new("Val", fx.int), Field::new("Next", list_ptr)],
        },
    );
    fx.arena.add_copy_method(list, "Copy");

    let out = synthesize("o", &fx.arena, list, &[])?;
    assert_go_eq(
        &out.body,
        r#"
        func (o list) Copy() list {
            oCopy := o
            if o.Next != nil {
                var oCopy_Next list
                oCopy_Next = *o.Next
                oCopy.Next = &oCopy_Next
                oCopy_Next = o.Next.Copy()
            }

            return oCopy
        }
        "#,
    );
    Ok(())
}

#[test]
fn method_name_is_configurable() -> Result<()> {
    let mut fx = Fixtures::new();
    let inner = fx.local_struct("inner", vec![Field::new("A", fx.string)]);
    fx.arena.add_copy_method(inner, "DeepCopy");
    let root = fx.local_struct("outer", vec![Field::new("I", inner)]);
    let options = SynthesisOptions {
        method_name: "DeepCopy".to_string(),
        ..Default::default()
    };

    let out = Synthesizer::new(options).synthesize("o", &fx.arena, root, &[])?;
    assert!(out.body.starts_with("func (o outer) DeepCopy() outer {"));
    assert!(out.body.contains("oCopy.I = o.I.DeepCopy()"));
    Ok(())
}

#[test]
fn invalid_receiver_is_rejected() {
    let fx = Fixtures::new();
    let err = synthesize("not valid", &fx.arena, fx.simple, &[]).unwrap_err();
    assert!(matches!(err, deepcopy_core::Error::Descriptor(_)));
}

#[test]
fn document_drives_a_run() -> Result<()> {
    let json = format!(
        r#"{{
            "types": [
                {{ "kind": "primitive", "primitive": "string" }},
                {{ "kind": "map", "key": 0, "value": 0 }},
                {{ "name": "Foo", "namespace": "{fixtures}", "kind": "record",
                   "fields": [{{ "name": "A", "ty": 0 }}, {{ "name": "B", "ty": 1 }}] }},
                {{ "kind": "pointer", "elem": 2 }},
                {{ "name": "holder", "namespace": "{local}", "kind": "record",
                   "fields": [{{ "name": "F", "ty": 3 }}] }}
            ],
            "root": 4,
            "receiver": "h"
        }}"#,
        fixtures = FIXTURES,
        local = LOCAL
    );
    let document = TypeDocument::from_json(&json)?;

    let out = Synthesizer::default().synthesize_document(&document)?;
    assert!(out.body.starts_with("func (h holder) Copy() holder {"));
    assert!(out.body.contains("hCopy_F.B = make(map[string]string, len(h.F.B))"));
    assert!(out.to_source().starts_with("import ("));
    Ok(())
}

#[test]
fn repeated_leaf_types_are_not_cycles() -> Result<()> {
    let mut fx = Fixtures::new();
    let id = fx.local(
        "id",
        TypeKind::Primitive {
            primitive: Primitive::Int64,
        },
    );
    let id_seq = fx.arena.sequence(id);
    let id_map = fx.arena.map(id, id);
    let id_ptr = fx.arena.pointer(id);
    let root = fx.local_struct(
        "ids",
        vec![
            Field::new("A", id),
            Field::new("B", id_seq),
            Field::new("C", id_map),
            Field::new("D", id_ptr),
        ],
    );

    let out = synthesize("o", &fx.arena, root, &[])?;
    assert!(out.body.contains("oCopy.B[i0] = v0"));
    assert!(out.body.contains("oCopy.C[i0] = v0"));
    assert!(out.body.contains("var oCopy_D id"));
    assert_eq!(brace_balance(&out.body), 0);
    Ok(())
}
