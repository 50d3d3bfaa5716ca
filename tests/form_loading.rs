//! Loading whole forms through the loader.

mod common;

use std::sync::Arc;
use std::thread;

use formdef::model::{CanvasType, ScreenType};
use formdef::{BindingTable, DefinitionKind, FieldValue, LoaderConfig, MessageKey};
use pretty_assertions::assert_eq;

#[test]
fn test_orders_form_is_read_completely() {
    let loader = common::loader(common::source());
    let form = loader.load_form("ORDERS").unwrap();

    assert_eq!(form.name, "ORDERS");
    assert_eq!(form.title.as_deref(), Some("Orders"));
    assert_eq!(form.renderer_name.as_deref(), Some("StandardForm"));
    assert_eq!(form.first_navigable_block.as_deref(), Some("ORDER"));
    assert!(form.parameters.contains("ORDER_ID"));

    let names: Vec<&str> = form.blocks.names().collect();
    assert_eq!(names, vec!["ORDER", "LINE"]);
    let order = form.require_block("ORDER").unwrap();
    assert_eq!(order.canvas_name.as_deref(), Some("HEADER_CONTENT"));
    let items: Vec<&str> = order.items.names().collect();
    assert_eq!(items, vec!["ID", "STATUS"]);
    let line = form.require_block("LINE").unwrap();
    let items: Vec<&str> = line.items.names().collect();
    assert_eq!(items, vec!["ORDER_ID", "PRODUCT"]);
    assert_eq!(order.item("STATUS").unwrap().block_name, "ORDER");
    assert_eq!(
        order.lov_mappings.get("STATUS_MAP").unwrap().lov_definition_name,
        "STATUSES"
    );
}

#[test]
fn test_canvas_tree_and_pages() {
    let loader = common::loader(common::source());
    let form = loader.load_form("ORDERS").unwrap();

    let roots: Vec<&str> = form.canvases.roots().map(|c| c.name.as_str()).collect();
    assert_eq!(roots, vec!["MAIN"]);
    let popups: Vec<&str> = form.canvases.popups().map(|c| c.name.as_str()).collect();
    assert_eq!(popups, vec!["CONFIRM"]);

    let main = form.require_canvas("MAIN").unwrap();
    assert_eq!(main.geometry.width, 800);

    let tabs = form.require_canvas("TABS").unwrap();
    assert_eq!(tabs.canvas_type, CanvasType::Tab);
    assert_eq!(tabs.content_canvas_name.as_deref(), Some("MAIN"));
    assert_eq!(tabs.pages.len(), 2);
    assert_eq!(tabs.page("HEADER").unwrap().title.as_deref(), Some("Header"));

    let header = form.require_canvas("HEADER_CONTENT").unwrap();
    assert_eq!(header.content_canvas_name.as_deref(), Some("TABS"));
    assert_eq!(header.content_canvas_page_name.as_deref(), Some("HEADER"));

    // канва без type считается CONTENT
    let lines = form.require_canvas("LINES_CONTENT").unwrap();
    assert_eq!(lines.canvas_type, CanvasType::Content);
    assert_eq!(lines.content_canvas_page_name.as_deref(), Some("LINES"));

    let on_header: Vec<&str> = form.blocks_on_canvas("HEADER_CONTENT").map(|b| b.name.as_str()).collect();
    assert_eq!(on_header, vec!["ORDER"]);
}

#[test]
fn test_screen_groups_and_spacers() {
    let loader = common::loader(common::source());
    let form = loader.load_form("ORDERS").unwrap();
    let order = form.require_block("ORDER").unwrap();

    let main = order.screen(ScreenType::Main);
    assert_eq!(main.num_cols, 2);
    let group = main.find_group("G1").unwrap();
    let items: Vec<_> = group.items.iter().collect();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].referenced_item_name.as_deref(), Some("ID"));
    assert_eq!(items[0].label.as_deref(), Some("Id"));
    assert!(items[1].is_spacer);
    assert!(items[1].name.starts_with("_spacer_"));
    assert_eq!(items[2].name, "STATUS");

    assert!(order.screen(ScreenType::Query).item_groups.is_empty());
}

#[test]
fn test_relation_is_resolved_to_blocks() {
    let loader = common::loader(common::source());
    let form = loader.load_form("ORDERS").unwrap();

    let relation = form.relations.get("ORDER_LINES").unwrap();
    assert_eq!(form.master_block(relation).unwrap().name, "ORDER");
    assert_eq!(form.detail_block(relation).unwrap().name, "LINE");
    assert!(relation.prevent_masterless_operations);
    assert!(relation.auto_query);
    assert!(!relation.deferred_query);
    assert_eq!(form.relations_for_master("ORDER").count(), 1);
}

#[test]
fn test_relation_before_its_detail_block_fails() {
    let body = r#"
      <blockList>
        <block name="MASTER"><itemList><item name="ID"/></itemList></block>
      </blockList>
      <relationList>
        <relation name="R" masterBlockName="MASTER" detailBlockName="DETAIL"/>
      </relationList>
      <blockList>
        <block name="DETAIL"><itemList><item name="ID"/></itemList></block>
      </blockList>"#;
    let source = common::source().with(DefinitionKind::Form, "EARLY", common::form("EARLY", body));
    let loader = common::loader(source);

    let err = loader.load_form("EARLY").unwrap_err();
    assert_eq!(err.key(), MessageKey::BlockNotFound);
    assert!(err.message().contains("DETAIL"));
}

#[test]
fn test_duplicate_item_is_rejected() {
    let body = r#"
      <blockList>
        <block name="B">
          <itemList><item name="X"/><item name="X"/></itemList>
        </block>
      </blockList>"#;
    let source = common::source().with(DefinitionKind::Form, "DUP", common::form("DUP", body));
    let loader = common::loader(source);

    let err = loader.load_form("DUP").unwrap_err();
    assert_eq!(err.key(), MessageKey::DuplicateName);
    // ошибка указывает на место в исходнике
    let location = err.location().unwrap();
    assert_eq!(location.definition, "DUP.form");
    assert!(location.position.is_some());
}

#[test]
fn test_screen_item_must_reference_a_block_item() {
    let body = r#"
      <blockList>
        <block name="B">
          <itemList><item name="X"/></itemList>
          <mainScreen>
            <itemGroupList>
              <itemGroup name="G"><itemList><item referencedItemName="Y"/></itemList></itemGroup>
            </itemGroupList>
          </mainScreen>
        </block>
      </blockList>"#;
    let source = common::source().with(DefinitionKind::Form, "BAD", common::form("BAD", body));
    let err = common::loader(source).load_form("BAD").unwrap_err();
    assert_eq!(err.key(), MessageKey::NoItemOnBlock);
}

#[test]
fn test_undeclared_renderer_depends_on_validation() {
    let body = r#"<formRendererName>Fancy</formRendererName>"#;
    let source = || common::source().with(DefinitionKind::Form, "FANCY", common::form("FANCY", body));

    let err = common::loader(source()).load_form("FANCY").unwrap_err();
    assert_eq!(err.key(), MessageKey::RendererNotDefined);

    let mut config = LoaderConfig::default();
    config.validation.renderers = false;
    let form = common::loader_with(config, source()).load_form("FANCY").unwrap();
    assert_eq!(form.renderer_name.as_deref(), Some("Fancy"));
}

#[test]
fn test_declared_name_must_match_stream() {
    let source = common::source().with(DefinitionKind::Form, "A", common::form("B", ""));
    let err = common::loader(source).load_form("A").unwrap_err();
    assert_eq!(err.key(), MessageKey::FormNameMismatch);
}

#[test]
fn test_wrong_root_element() {
    let source = common::source().with(DefinitionKind::Form, "ROOT", "<blockDefinition/>");
    let err = common::loader(source).load_form("ROOT").unwrap_err();
    assert_eq!(err.key(), MessageKey::UnexpectedRootElement);
}

#[test]
fn test_truncated_definition_is_malformed() {
    let source = common::source().with(DefinitionKind::Form, "CUT", r#"<form name="CUT"><blockList>"#);
    let err = common::loader(source).load_form("CUT").unwrap_err();
    assert_eq!(err.key(), MessageKey::MalformedSource);
}

#[test]
fn test_missing_form() {
    let err = common::loader(common::source()).load_form("NOPE").unwrap_err();
    assert_eq!(err.key(), MessageKey::DefinitionNotFound);
}

#[test]
fn test_concurrent_loads_share_one_parse() {
    let loader = common::loader(common::source());

    let forms: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| loader.load_form("ORDERS"))).collect();
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
    });

    for form in &forms[1..] {
        assert!(Arc::ptr_eq(&forms[0], form));
    }
    let stats = loader.cache_stats().forms;
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 7);
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_invalidated_form_is_parsed_again() {
    let loader = common::loader(common::source());
    let first = loader.load_form("ORDERS").unwrap();
    assert!(loader.invalidate_form("ORDERS"));
    let second = loader.load_form("ORDERS").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);
}

#[derive(Debug, Default)]
struct Order {
    id: i64,
    status: String,
}

#[test]
fn test_loaded_block_against_binding_table() {
    let loader = common::loader(common::source());
    let form = loader.load_form("ORDERS").unwrap();
    let block = form.require_block("ORDER").unwrap();

    let table = BindingTable::new("Order").field(
        "ID",
        |o: &Order| FieldValue::Integer(o.id),
        |o: &mut Order, v| {
            o.id = v.as_integer()?.unwrap_or_default();
            Ok(())
        },
    );
    let err = table.verify_block(block).unwrap_err();
    assert_eq!(err.key(), MessageKey::UnboundField);

    let table = table.read_only("STATUS", |o: &Order| FieldValue::Text(o.status.clone()));
    table.verify_block(block).unwrap();
}
