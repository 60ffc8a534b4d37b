//! 类型层级跨 crate 集成测试

use std::io::Write;
use tang_common::{
    ConstructorDescriptor, HierarchyError, NamedParameterMeta, ParameterDescriptor,
    TypeDescriptor, TypeName,
};
use tang_composition::HierarchyBuilder;
use tang_di_abstractions::HierarchyReader;
use tang_di_impl::{
    NamedParameterNode, NamespaceTree, Node, NodeId, TypeCatalog, TypeHierarchy,
};

fn hierarchy_of<I>(types: I) -> TypeHierarchy<TypeCatalog>
where
    I: IntoIterator<Item = TypeDescriptor>,
{
    let mut catalog = TypeCatalog::from_descriptors(types).unwrap();
    catalog.declare("int").unwrap();
    catalog.declare("core.String").unwrap();
    TypeHierarchy::new(catalog)
}

fn name(value: &str) -> TypeName {
    TypeName::new(value)
}

/// 只通过只读接口校验树中没有悬空引用
fn assert_closed<R: HierarchyReader>(reader: &R, expected: &[&str]) {
    assert!(reader.find_unresolved_classes().is_empty());
    for path in expected {
        assert!(reader.contains_path(path), "{path} should resolve");
    }
}

#[test]
fn test_register_twice_is_idempotent() {
    let mut hierarchy = hierarchy_of([
        TypeDescriptor::new("app.Service")
            .implements("app.Api")
            .with_constructor(ConstructorDescriptor::injectable(vec![
                ParameterDescriptor::named("int", "app.Port"),
            ])),
        TypeDescriptor::new("app.Api"),
        TypeDescriptor::new("app.Port").named_parameter(
            NamedParameterMeta::new()
                .with_value_type("int")
                .with_short_name("port"),
        ),
    ]);

    let first = hierarchy.register_class(&name("app.Service")).unwrap();
    let export = hierarchy.export_namespace();
    let nodes = hierarchy.tree().len();
    let api = hierarchy.get_node("app.Api").unwrap();
    let impls = hierarchy.known_impls(api).to_vec();

    let second = hierarchy.register_class(&name("app.Service")).unwrap();
    assert_eq!(first, second);
    assert_eq!(hierarchy.export_namespace(), export);
    assert_eq!(hierarchy.tree().len(), nodes);
    assert_eq!(hierarchy.known_impls(api), impls.as_slice());
}

#[test]
fn test_reordered_argument_sets_are_ambiguous() {
    let mut hierarchy = hierarchy_of([TypeDescriptor::new("app.Pair")
        .inject_all()
        .with_constructor(ConstructorDescriptor::plain(vec![
            ParameterDescriptor::positional("int"),
            ParameterDescriptor::positional("core.String"),
        ]))
        .with_constructor(ConstructorDescriptor::plain(vec![
            ParameterDescriptor::positional("core.String"),
            ParameterDescriptor::positional("int"),
        ]))]);

    assert!(matches!(
        hierarchy.register_class(&name("app.Pair")),
        Err(HierarchyError::AmbiguousConstructor { .. })
    ));
}

#[test]
fn test_different_sized_argument_sets_are_accepted() {
    let mut hierarchy = hierarchy_of([TypeDescriptor::new("app.Pair")
        .with_constructor(ConstructorDescriptor::injectable(vec![
            ParameterDescriptor::positional("int"),
        ]))
        .with_constructor(ConstructorDescriptor::injectable(vec![
            ParameterDescriptor::positional("int"),
            ParameterDescriptor::positional("core.String"),
        ]))]);

    let id = hierarchy.register_class(&name("app.Pair")).unwrap();
    let class = hierarchy.node(id).as_class().unwrap();
    assert_eq!(class.constructors().len(), 2);
}

#[test]
fn test_named_parameter_specificity_merge() {
    let mut tree = NamespaceTree::new();
    let package = tree.ensure_path(&["app"]).unwrap();
    let meta = NamedParameterMeta::new().with_value_type("int").with_default("1");
    let parameter = |meta: NamedParameterMeta| {
        Node::named_parameter(NamedParameterNode::new("app.Size", Some(meta)))
    };

    let first = tree.put(package, parameter(meta.clone())).unwrap();
    let second = tree.put(package, parameter(meta.clone())).unwrap();
    assert_eq!(first, second);
    assert_eq!(tree.len(), 3);

    let other = meta.with_default("2");
    assert!(matches!(
        tree.put(package, parameter(other)),
        Err(HierarchyError::Conflict { .. })
    ));
}

#[test]
fn test_short_name_uniqueness() {
    let short = NamedParameterMeta::new().with_short_name("n");
    let mut hierarchy = hierarchy_of([
        TypeDescriptor::new("app.First").named_parameter(short.clone()),
        TypeDescriptor::new("app.Second").named_parameter(short),
    ]);

    let first = hierarchy.register_class(&name("app.First")).unwrap();
    assert_eq!(hierarchy.register_class(&name("app.First")).unwrap(), first);
    assert_eq!(hierarchy.node_from_short_name("n"), Some(first));

    assert!(matches!(
        hierarchy.register_class(&name("app.Second")),
        Err(HierarchyError::DuplicateShortName { .. })
    ));
    assert_eq!(hierarchy.node_from_short_name("n"), Some(first));
}

#[test]
fn test_closure_terminates_on_chain() {
    let mut hierarchy = hierarchy_of([
        TypeDescriptor::new("app.A").with_constructor(ConstructorDescriptor::injectable(vec![
            ParameterDescriptor::positional("app.B"),
        ])),
        TypeDescriptor::new("app.B").with_constructor(ConstructorDescriptor::injectable(vec![
            ParameterDescriptor::positional("app.C"),
        ])),
        TypeDescriptor::new("app.C"),
    ]);

    hierarchy.register_class(&name("app.A")).unwrap();
    assert!(!hierarchy.contains("app.C"));
    hierarchy.resolve_all_classes().unwrap();
    assert_closed(&hierarchy, &["app.A", "app.B", "app.C"]);
}

#[test]
fn test_closure_covers_supertypes_and_parameter_values() {
    let mut hierarchy = hierarchy_of([
        TypeDescriptor::new("app.Impl")
            .extends("app.Base")
            .implements("app.Api")
            .with_constructor(ConstructorDescriptor::injectable(vec![
                ParameterDescriptor::named("app.Codec", "app.Choice"),
            ])),
        TypeDescriptor::new("app.Base"),
        TypeDescriptor::new("app.Api"),
        TypeDescriptor::new("app.Codec"),
        TypeDescriptor::new("app.JsonCodec").implements("app.Codec"),
        TypeDescriptor::new("app.Choice")
            .named_parameter(NamedParameterMeta::new().with_value_type("app.JsonCodec")),
    ]);

    hierarchy.register_class(&name("app.Impl")).unwrap();
    let rounds = hierarchy.resolve_all_classes().unwrap();
    assert_eq!(rounds, 1);
    assert_closed(
        &hierarchy,
        &["app.Impl", "app.Base", "app.Api", "app.Codec", "app.JsonCodec", "app.Choice"],
    );

    let codec = hierarchy.get_node("app.Codec").unwrap();
    let json = hierarchy.get_node("app.JsonCodec").unwrap();
    assert_eq!(hierarchy.known_impls(codec), &[json]);
}

#[test]
fn test_known_impls_recorded_once() {
    let mut hierarchy = hierarchy_of([
        TypeDescriptor::new("app.I"),
        TypeDescriptor::new("app.B").implements("app.I"),
    ]);

    hierarchy.register_class(&name("app.I")).unwrap();
    hierarchy.register_class(&name("app.B")).unwrap();
    hierarchy.register_class(&name("app.B")).unwrap();

    let i = hierarchy.get_node("app.I").unwrap();
    let b = hierarchy.get_node("app.B").unwrap();
    assert_eq!(hierarchy.known_impls(i), &[b]);
    assert!(hierarchy.known_impls(b).is_empty());
}

#[test]
fn test_prefix_alias_reaches_same_node() {
    let mut hierarchy = hierarchy_of([TypeDescriptor::new("app.Pool").with_namespace("ns.alias")]);

    let pool = hierarchy.register_class(&name("app.Pool")).unwrap();
    assert_eq!(hierarchy.get_node("app.Pool").unwrap(), pool);
    assert_eq!(hierarchy.get_node("ns.alias").unwrap(), pool);

    let reader: &dyn HierarchyReader<NodeRef = NodeId> = &hierarchy;
    assert_eq!(reader.lookup("ns.alias").unwrap(), pool);
}

#[test]
fn test_name_resolution_reports_prefix() {
    let mut hierarchy = hierarchy_of([TypeDescriptor::new("app.Pool")]);
    hierarchy.register_class(&name("app.Pool")).unwrap();

    match hierarchy.get_node("app.Pool.Missing") {
        Err(error @ HierarchyError::NameResolution { .. }) => {
            assert!(error.is_name_resolution());
            if let HierarchyError::NameResolution { resolved_prefix, .. } = error {
                assert_eq!(resolved_prefix, "app.Pool");
            }
        }
        other => panic!("unexpected lookup result: {other:?}"),
    }
}

#[test]
fn test_independent_hierarchies_do_not_share_state() {
    let types = || [TypeDescriptor::new("app.A")];
    let mut first = hierarchy_of(types());
    let second = hierarchy_of(types());

    first.register_class(&name("app.A")).unwrap();
    assert!(first.contains("app.A"));
    assert!(!second.contains("app.A"));
    assert!(second.tree().is_empty());
}

#[tokio::test]
async fn test_builder_resolves_toml_catalog() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    write!(
        file,
        r#"
        [[types]]
        name = "app.Server"
        namespace = "server"
        nested = ["app.Server$Port"]

        [[types.constructors]]
        injectable = true
        parameters = [{{ type = "int", named = "app.Server$Port" }}]

        [[types]]
        name = "app.Server$Port"
        enclosing = "app.Server"

        [types.named_parameter]
        value_type = "int"
        default_value = "8080"
        doc = "listen port"
        short_name = "port"

        [[types]]
        name = "int"
        "#
    )?;

    let hierarchy = HierarchyBuilder::new()
        .add_catalog_toml(file.path())?
        .add_root("app.Server")
        .build()
        .await?;

    let port = hierarchy.get_node("server.Port")?;
    assert_eq!(port, hierarchy.get_node("app.Server$Port")?);
    assert_eq!(hierarchy.named_parameter_nodes(), vec![port]);

    let expected = "[NamespaceNode ]\n\
                    \t[NamespaceNode app]\n\
                    \t\t[ClassNode Server]: (int Port), \n\
                    \t\t\tint [NamedParameterNode Port] default=8080 Documentation: listen port\n\
                    \t[ClassNode int]: \n\
                    \t[ConfigurationPrefixNode server] -> [ClassNode Server]: (int Port), \n";
    assert_eq!(hierarchy.export_namespace(), expected);
    Ok(())
}
