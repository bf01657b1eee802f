//! Integration tests for the name algebra and namespace policy

use fidlgen_cpp::ir::LibraryIdentifier;
use fidlgen_cpp::names::{
    change_if_reserved, format_library_path, format_library_prefix, LibraryNamespaces, Name,
    NameVariants, Namespace,
};
use fidlgen_cpp::{compile_json, Error, Flavor, RenderContext};

fn gadget() -> Name {
    Namespace::new("acme::widgets").member("Gadget")
}

#[test]
fn test_name_composition() {
    let gadget = gadget();
    assert_eq!(gadget.to_string(), "::acme::widgets::Gadget");
    assert_eq!(gadget.no_leading(), "acme::widgets::Gadget");
    assert_eq!(gadget.self_name(), "Gadget");

    let tag = gadget.nest("Tag");
    assert_eq!(tag.to_string(), "::acme::widgets::Gadget::Tag");
    assert_eq!(tag.self_name(), "Tag");

    assert_eq!(
        gadget.append_name("_Proxy").unwrap().to_string(),
        "::acme::widgets::Gadget_Proxy"
    );
    assert_eq!(
        tag.prepend_name("Wire").unwrap().to_string(),
        "::acme::widgets::Gadget::WireTag"
    );
    assert_eq!(
        gadget.append_namespace("testing").to_string(),
        "::acme::widgets::testing::Gadget"
    );
}

#[test]
fn test_templates() {
    let vector = Name::from_path("std::vector").template(&gadget()).unwrap();
    assert_eq!(vector.to_string(), "::std::vector<::acme::widgets::Gadget>");
    assert_eq!(vector.self_name(), "vector");

    let array = Name::from_path("fidl::Array")
        .array_template(&Name::leaf("uint8_t"), 16)
        .unwrap();
    assert_eq!(array.to_string(), "::fidl::Array<uint8_t, 16>");

    let tuple = Name::tuple(&[Name::leaf("bool"), Name::from_path("std::string")]);
    assert_eq!(tuple.to_string(), "::std::tuple<bool, ::std::string>");
}

#[test]
fn test_template_composition_is_rejected() {
    let vector = Name::from_path("std::vector").template(&gadget()).unwrap();
    for result in [
        vector.template(&gadget()),
        vector.append_name("Ptr"),
        vector.prepend_name("Wire"),
    ] {
        assert!(
            matches!(result, Err(Error::TemplateComposition { .. })),
            "{:?}",
            result
        );
    }
}

#[test]
fn test_library_namespaces() {
    let ns = LibraryNamespaces::for_library(&LibraryIdentifier::parse("acme.widgets"));
    assert_eq!(ns.natural.to_string(), "::acme::widgets");
    assert_eq!(ns.unified.to_string(), "::acme_widgets");
    assert_eq!(ns.wire.to_string(), "::acme_widgets::wire");
    assert_eq!(ns.wire.no_leading(), "acme_widgets::wire");

    for flavor in Flavor::ALL {
        let cx = RenderContext::for_flavor(flavor);
        assert_eq!(ns.select(&cx).unwrap(), ns.get(flavor));
    }
    assert!(matches!(
        ns.select(&RenderContext::default()),
        Err(Error::NoFlavorSelected { .. })
    ));
}

#[test]
fn test_reserved_library_parts() {
    let lib = LibraryIdentifier::parse("acme.union");
    let ns = LibraryNamespaces::for_library(&lib);
    assert_eq!(ns.natural.to_string(), "::acme::union_");
    assert_eq!(ns.unified.to_string(), "::acme_union");
    assert_eq!(ns.wire.to_string(), "::acme_union::wire");

    let single = LibraryNamespaces::for_library(&LibraryIdentifier::parse("union"));
    assert_eq!(single.natural.to_string(), "::union_");
    assert_eq!(single.unified.to_string(), "::union_");
    assert_eq!(single.wire.to_string(), "::union_::wire");

    assert_eq!(format_library_prefix(&lib), "acme_union");
    assert_eq!(format_library_path(&lib), "acme/union");
}

#[test]
fn test_reserved_declaration_names() {
    let ir = r#"{
        "name": "acme.union",
        "struct_declarations": [{ "name": "acme.union/this", "members": [] }],
        "declarations": { "acme.union/this": "struct" },
        "declaration_order": ["acme.union/this"]
    }"#;
    let root = compile_json(ir).unwrap();
    let names = root.decls[0].names();
    let spell = |flavor| names.render(&RenderContext::for_flavor(flavor)).unwrap();
    assert_eq!(spell(Flavor::Natural), "::acme::union_::this_");
    assert_eq!(spell(Flavor::Unified), "::acme_union::this_");
    assert_eq!(spell(Flavor::Wire), "::acme_union::wire::this_");
    assert_eq!(root.library.to_string(), "acme.union_");
}

#[test]
fn test_name_variants_render_accessors() {
    let names = NameVariants {
        natural: Namespace::new("acme::widgets").member("Gadget"),
        unified: Namespace::new("acme_widgets").member("Gadget"),
        wire: Namespace::new("acme_widgets::wire").member("Gadget"),
    };
    let wire = RenderContext::for_flavor(Flavor::Wire);
    assert_eq!(names.no_leading(&wire).unwrap(), "acme_widgets::wire::Gadget");
    assert_eq!(names.self_name(&wire).unwrap(), "Gadget");
    assert_eq!(
        names.namespace(&wire).unwrap().to_string(),
        "::acme_widgets::wire"
    );

    let vectors = names.with_templates("std::vector", "fidl::VectorView").unwrap();
    let unified = RenderContext::for_flavor(Flavor::Unified);
    assert_eq!(
        vectors.render(&unified).unwrap(),
        "::std::vector<::acme_widgets::Gadget>"
    );
    assert_eq!(
        vectors.render(&wire).unwrap(),
        "::fidl::VectorView<::acme_widgets::wire::Gadget>"
    );
}

#[test]
fn test_escaping_examples() {
    assert_eq!(change_if_reserved("assert"), "assert_");
    assert_eq!(change_if_reserved("int8_t"), "int8_t_");
    assert_eq!(change_if_reserved("gadget"), "gadget");
}
